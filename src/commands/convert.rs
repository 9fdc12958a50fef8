//! # convert 命令实现
//!
//! 批量转换厂商原始数据为 mzML/mzXML。
//!
//! ## 功能
//! - 递归收集匹配的源文件
//! - 在输出根目录下镜像输入目录结构
//! - 已有完整输出默认跳过，重复执行幂等
//! - 通过工作池并行调用 msconvert
//! - 可选输出逐文件结果 CSV 报告
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `batch/`, `convert/`, `models/`
//! - 使用 `utils/output.rs`

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::convert::{ConvertArgs, TargetFormat};
use crate::convert::{needs_conversion, MsconvertRunner};
use crate::error::{MzbatchError, Result};
use crate::models::{ConversionTask, TaskStatus};
use crate::utils::output;

use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// 报告中的一行
#[derive(Debug, Serialize)]
struct ReportRow {
    source: String,
    destination: String,
    status: TaskStatus,
    detail: String,
}

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    output::print_header(&format!("Converting to {} format", args.target));

    // 验证输入根目录
    if !args.input.is_dir() {
        return Err(MzbatchError::DirectoryNotFound {
            path: args.input.display().to_string(),
        });
    }

    // 创建输出根目录，不可写时在任何转换前失败
    fs::create_dir_all(&args.output).map_err(|e| MzbatchError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    // 收集源文件
    let sources = FileCollector::new(&args.input)
        .with_suffix(args.suffix.as_deref())
        .with_prefix(args.prefix.as_deref())
        .with_contains(args.contains.as_deref())
        .with_pattern(args.pattern.as_deref())?
        .recursive(!args.no_recursive)
        .collect();

    if sources.is_empty() {
        output::print_warning(&format!(
            "No convertible files found under {}",
            args.input.display()
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} files to convert", sources.len()));

    // 计算镜像目标路径
    let tasks = build_tasks(&sources, &args.input, &args.output, args.target)?;

    // 预先创建目标目录，worker 之间不再写共享路径
    for task in &tasks {
        fs::create_dir_all(task.dest_dir()).map_err(|e| MzbatchError::FileWriteError {
            path: task.dest_dir().display().to_string(),
            source: e,
        })?;
    }

    let msconvert = MsconvertRunner::new(&args.msconvert, args.target)
        .with_extra_args(&args.msconvert_args)
        .save_log(args.save_log);

    // 并行转换
    let result = BatchRunner::new(args.workers)
        .verbose(args.verbose)
        .run(&tasks, |task| convert_task(task, &msconvert, &args));

    output::print_done(&format!(
        "Converted {} file(s) into '{}' ({} skipped, {} failed)",
        result.converted,
        args.output.display(),
        result.skipped,
        result.failed
    ));

    if result.failed > 0 {
        output::print_warning(&format!(
            "{} conversion(s) failed, see messages above",
            result.failed
        ));
    }

    // 逐文件报告
    if let Some(report_path) = &args.report {
        write_report(report_path, &tasks, &result.results)?;
        output::print_success(&format!("Report written to '{}'", report_path.display()));
    }

    Ok(())
}

/// 转换单个任务
///
/// 已有完整输出且未要求覆盖时跳过，不调用子进程。
/// 失败只标记该任务，批次继续。
fn convert_task(
    task: &ConversionTask,
    msconvert: &MsconvertRunner,
    args: &ConvertArgs,
) -> ProcessResult {
    if !needs_conversion(task, args.overwrite, args.redo_threshold, args.check_tail) {
        return ProcessResult::Skipped(task.dest.display().to_string());
    }

    match msconvert.run(task) {
        Ok(()) => ProcessResult::Converted(
            task.source.display().to_string(),
            task.dest.display().to_string(),
        ),
        Err(e) => ProcessResult::Failed(task.source.display().to_string(), e.to_string()),
    }
}

/// 由源路径列表计算任务列表
///
/// 目标路径互不相同是并行模型的前提，冲突视为致命错误。
pub(crate) fn build_tasks(
    sources: &[PathBuf],
    in_root: &Path,
    out_root: &Path,
    target: TargetFormat,
) -> Result<Vec<ConversionTask>> {
    let mut tasks = Vec::with_capacity(sources.len());
    let mut seen = HashSet::new();

    for source in sources {
        let task = ConversionTask::new(source, in_root, out_root, target)?;
        if !seen.insert(task.dest.clone()) {
            return Err(MzbatchError::InvalidArgument(format!(
                "Two sources map to the same output '{}'",
                task.dest.display()
            )));
        }
        tasks.push(task);
    }

    Ok(tasks)
}

/// 保存逐文件报告到 CSV
fn write_report(
    path: &Path,
    tasks: &[ConversionTask],
    results: &[ProcessResult],
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for (task, result) in tasks.iter().zip(results) {
        let (status, detail) = match result {
            ProcessResult::Converted(_, _) => (TaskStatus::Converted, String::new()),
            ProcessResult::Skipped(_) => (TaskStatus::Skipped, String::new()),
            ProcessResult::Failed(_, err) => (TaskStatus::Failed, err.clone()),
        };
        wtr.serialize(ReportRow {
            source: task.source.display().to_string(),
            destination: task.dest.display().to_string(),
            status,
            detail,
        })?;
    }

    wtr.flush().map_err(|e| MzbatchError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_tasks_mirror_input_tree() {
        let dir = tempfile::tempdir().unwrap();
        let in_root = dir.path().join("in");
        let out_root = dir.path().join("out");
        touch(&in_root.join("a/x.raw"));
        touch(&in_root.join("b/y.raw"));

        let sources = FileCollector::new(&in_root).collect();
        let tasks = build_tasks(&sources, &in_root, &out_root, TargetFormat::Mzml).unwrap();

        let dests: Vec<_> = tasks.iter().map(|t| t.dest.clone()).collect();
        assert_eq!(
            dests,
            vec![out_root.join("a/x.mzML"), out_root.join("b/y.mzML")]
        );
    }

    #[test]
    fn test_colliding_destinations_are_fatal() {
        let sources = vec![PathBuf::from("/in/x.raw"), PathBuf::from("/in/x.wiff")];
        let result = build_tasks(
            &sources,
            Path::new("/in"),
            Path::new("/out"),
            TargetFormat::Mzml,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_second_pass_plans_no_conversions() {
        let dir = tempfile::tempdir().unwrap();
        let in_root = dir.path().join("in");
        let out_root = dir.path().join("out");
        touch(&in_root.join("a/x.raw"));
        touch(&in_root.join("b/y.raw"));

        let sources = FileCollector::new(&in_root).collect();
        let tasks = build_tasks(&sources, &in_root, &out_root, TargetFormat::Mzml).unwrap();

        // 第一轮会转换所有任务
        for task in &tasks {
            assert!(needs_conversion(task, false, 0, false));
        }

        // 模拟第一轮完成后的输出
        for task in &tasks {
            fs::create_dir_all(task.dest_dir()).unwrap();
            fs::write(&task.dest, b"<mzML>\n</mzML>\n").unwrap();
        }

        // 第二轮全部跳过
        for task in &tasks {
            assert!(!needs_conversion(task, false, 0, false));
        }
        // overwrite 则全部重做
        for task in &tasks {
            assert!(needs_conversion(task, true, 0, false));
        }
    }

    #[test]
    fn test_missing_input_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let args = ConvertArgs {
            input: dir.path().join("does-not-exist"),
            output: dir.path().join("out"),
            target: TargetFormat::Mzml,
            suffix: None,
            prefix: None,
            contains: None,
            pattern: None,
            workers: 1,
            overwrite: false,
            no_recursive: false,
            redo_threshold: 0,
            check_tail: false,
            msconvert: "msconvert".to_string(),
            save_log: false,
            report: None,
            verbose: false,
            msconvert_args: vec![],
        };
        let result = execute(args);
        assert!(matches!(
            result,
            Err(MzbatchError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let in_root = dir.path().join("in");
        fs::create_dir_all(&in_root).unwrap();
        let args = ConvertArgs {
            input: in_root,
            output: dir.path().join("out"),
            target: TargetFormat::Mzml,
            suffix: None,
            prefix: None,
            contains: None,
            pattern: None,
            workers: 1,
            overwrite: false,
            no_recursive: false,
            redo_threshold: 0,
            check_tail: false,
            msconvert: "msconvert".to_string(),
            save_log: false,
            report: None,
            verbose: false,
            msconvert_args: vec![],
        };
        assert!(execute(args).is_ok());
    }

    #[test]
    fn test_report_rows_follow_task_order() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("report.csv");
        let tasks = vec![
            ConversionTask {
                source: PathBuf::from("/in/a.raw"),
                dest: PathBuf::from("/out/a.mzML"),
            },
            ConversionTask {
                source: PathBuf::from("/in/b.raw"),
                dest: PathBuf::from("/out/b.mzML"),
            },
        ];
        let results = vec![
            ProcessResult::Converted("/in/a.raw".into(), "/out/a.mzML".into()),
            ProcessResult::Failed("/in/b.raw".into(), "exit code 1".into()),
        ];

        write_report(&report_path, &tasks, &results).unwrap();

        let content = fs::read_to_string(&report_path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "source,destination,status,detail");
        assert!(lines[1].starts_with("/in/a.raw,/out/a.mzML,converted"));
        assert!(lines[2].contains("failed"));
        assert!(lines[2].contains("exit code 1"));
    }
}
