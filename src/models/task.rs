//! # 转换任务数据模型
//!
//! 一个任务对应一个源文件及其镜像目标路径。
//! 目标路径是 (源路径, 输入根目录, 输出根目录, 目标格式) 的纯函数，
//! 重复扫描必须得到相同的结果。
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs`, `commands/scan.rs` 使用
//! - 使用 `cli/convert.rs` 的 `TargetFormat`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::convert::TargetFormat;
use crate::error::{MzbatchError, Result};

/// 单个任务的最终状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// 已调用 msconvert 并成功完成
    Converted,
    /// 目标文件已存在且完整，未执行转换
    Skipped,
    /// 转换失败
    Failed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Converted => write!(f, "converted"),
            TaskStatus::Skipped => write!(f, "skipped"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

/// 一次文件转换：源路径与计算出的镜像目标路径
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionTask {
    /// 源文件 (或 .d 目录) 的路径
    pub source: PathBuf,
    /// 输出根目录下的镜像目标路径
    pub dest: PathBuf,
}

impl ConversionTask {
    /// 由源路径计算镜像目标路径并构造任务
    ///
    /// 源文件相对输入根目录的位置在输出根目录下保持不变，
    /// 仅替换扩展名为目标格式的规范写法。
    pub fn new(
        source: &Path,
        in_root: &Path,
        out_root: &Path,
        target: TargetFormat,
    ) -> Result<Self> {
        let relative =
            source
                .strip_prefix(in_root)
                .map_err(|_| MzbatchError::PathOutsideRoot {
                    path: source.display().to_string(),
                    root: in_root.display().to_string(),
                })?;

        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| MzbatchError::InvalidSourceName {
                path: source.display().to_string(),
            })?;

        let out_name = format!("{}.{}", stem, target.extension());
        let dest = match relative.parent() {
            Some(parent) => out_root.join(parent).join(out_name),
            None => out_root.join(out_name),
        };

        Ok(Self {
            source: source.to_path_buf(),
            dest,
        })
    }

    /// 目标文件所在目录
    pub fn dest_dir(&self) -> &Path {
        // dest 总是 out_root 下至少一层的文件路径
        self.dest.parent().unwrap_or_else(|| Path::new(""))
    }

    /// 目标文件名
    pub fn dest_name(&self) -> &str {
        self.dest
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}
