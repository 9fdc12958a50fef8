//! # scan 命令实现
//!
//! 预检扫描：按照与 convert 相同的收集与跳过规则，
//! 列出每个源文件将要执行的动作，不调用 msconvert。
//!
//! ## 功能
//! - 收集匹配的源文件并计算镜像目标路径
//! - 判定 convert / skip 动作
//! - 终端表格展示，可导出 CSV
//!
//! ## 依赖关系
//! - 使用 `cli/scan.rs` 定义的参数
//! - 使用 `batch/collector.rs`, `convert/check.rs`, `models/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::batch::FileCollector;
use crate::cli::scan::ScanArgs;
use crate::convert::needs_conversion;
use crate::error::{MzbatchError, Result};
use crate::models::ConversionTask;
use crate::utils::{output, progress};

use serde::Serialize;
use std::path::Path;
use tabled::{Table, Tabled};

/// 扫描结果行
#[derive(Debug, Clone, Tabled, Serialize)]
struct ScanRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Action")]
    action: String,
}

/// 执行 scan 命令
pub fn execute(args: ScanArgs) -> Result<()> {
    output::print_header("Scanning for convertible files (dry run)");

    // 验证输入根目录
    if !args.input.is_dir() {
        return Err(MzbatchError::DirectoryNotFound {
            path: args.input.display().to_string(),
        });
    }

    let spinner = progress::create_spinner("Collecting files");
    let sources = FileCollector::new(&args.input)
        .with_suffix(args.suffix.as_deref())
        .with_prefix(args.prefix.as_deref())
        .with_contains(args.contains.as_deref())
        .with_pattern(args.pattern.as_deref())?
        .recursive(!args.no_recursive)
        .collect();
    spinner.finish_and_clear();

    if sources.is_empty() {
        output::print_warning(&format!(
            "No convertible files found under {}",
            args.input.display()
        ));
        return Ok(());
    }

    let tasks = super::convert::build_tasks(&sources, &args.input, &args.output, args.target)?;

    let rows: Vec<ScanRow> = tasks
        .iter()
        .map(|task| ScanRow {
            source: task.source.display().to_string(),
            destination: task.dest.display().to_string(),
            action: plan_action(task, &args).to_string(),
        })
        .collect();

    let table = Table::new(&rows);
    println!("{}", table);

    let pending = rows.iter().filter(|r| r.action == "convert").count();
    output::print_info(&format!(
        "{} file(s) would be converted, {} already up to date",
        pending,
        rows.len() - pending
    ));

    if let Some(csv_path) = &args.csv {
        export_csv(csv_path, &rows)?;
        output::print_success(&format!("Scan result exported to '{}'", csv_path.display()));
    }

    Ok(())
}

/// convert 运行时会对该任务执行的动作
fn plan_action(task: &ConversionTask, args: &ScanArgs) -> &'static str {
    if needs_conversion(task, args.overwrite, args.redo_threshold, args.check_tail) {
        "convert"
    } else {
        "skip"
    }
}

/// 导出扫描结果到 CSV
fn export_csv(path: &Path, rows: &[ScanRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|e| MzbatchError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}
