//! # 输出完整性判定
//!
//! 决定一个任务是跳过还是重新转换。默认仅看目标文件是否存在，
//! 可选地把过小的输出或缺少 XML 结束标签的输出视为不完整
//! (转换中断后留下的半成品会被重新调度)。
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs`, `commands/scan.rs` 调用
//! - 使用 `regex` 匹配结束标签

use regex::Regex;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::models::ConversionTask;

/// 判断任务是否需要执行转换
///
/// overwrite 时总是转换；否则目标缺失、小于 redo_threshold 字节、
/// 或 (check_tail 开启时) 末行不是结束标签的目标会被重新转换。
pub fn needs_conversion(
    task: &ConversionTask,
    overwrite: bool,
    redo_threshold: u64,
    check_tail: bool,
) -> bool {
    if overwrite {
        return true;
    }

    let metadata = match fs::metadata(&task.dest) {
        Ok(m) => m,
        Err(_) => return true,
    };

    if redo_threshold > 0 && metadata.len() < redo_threshold {
        return true;
    }

    if check_tail && !ends_with_closing_tag(&task.dest) {
        return true;
    }

    false
}

/// 末行 (最后一个非空行) 是否为 XML 结束标签
///
/// mzML/mzXML 文档以 `</indexedmzML>` 之类的结束标签收尾，
/// 中途被打断的输出不会有。
fn ends_with_closing_tag(path: &Path) -> bool {
    let closing_tag = Regex::new(r"^</.*>$").unwrap();
    match last_content_line(path) {
        Some(line) => closing_tag.is_match(line.trim()),
        None => false,
    }
}

/// 读取文件最后一个非空行
fn last_content_line(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let reader = BufReader::new(file);

    let mut last = None;
    for line in reader.lines() {
        let line = line.ok()?;
        if !line.trim().is_empty() {
            last = Some(line);
        }
    }
    last
}
