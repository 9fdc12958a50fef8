//! # convert 子命令 CLI 定义
//!
//! 批量转换厂商原始数据 (.raw/.d/.wiff/... -> mzML/mzXML)
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 支持的目标格式
///
/// 社区格式的规范写法为混合大小写 (mzML / mzXML)，
/// 命令行输入统一接受小写，由 `extension()` 归一化。
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TargetFormat {
    /// HUPO-PSI mzML format
    Mzml,
    /// Legacy mzXML format
    Mzxml,
}

impl TargetFormat {
    /// 规范文件扩展名 (不含点)
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Mzml => "mzML",
            TargetFormat::Mzxml => "mzXML",
        }
    }

    /// msconvert 的格式选择参数
    pub fn msconvert_flag(&self) -> String {
        format!("--{}", self.extension())
    }
}

impl std::fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// convert 子命令参数
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input root directory containing vendor raw files
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output root directory (input tree is mirrored below it)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Target open format
    #[arg(short, long, value_enum, default_value = "mzml")]
    pub target: TargetFormat,

    /// Only match sources with this suffix (default: known vendor suffixes)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Only match sources whose file name starts with this prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Only match sources whose file name contains this substring
    #[arg(long)]
    pub contains: Option<String>,

    /// Glob pattern for source file names
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Number of parallel workers (1 = sequential, 0 = all cores)
    #[arg(short, long, default_value_t = 1)]
    pub workers: usize,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Do not recurse into subdirectories
    #[arg(long, default_value_t = false)]
    pub no_recursive: bool,

    /// Existing outputs smaller than this many bytes are re-converted
    #[arg(long, default_value_t = 0)]
    pub redo_threshold: u64,

    /// Re-convert outputs whose last line is not a closing XML tag
    #[arg(long, default_value_t = false)]
    pub check_tail: bool,

    /// Path to the msconvert executable
    #[arg(long, default_value = "msconvert")]
    pub msconvert: String,

    /// Save msconvert output next to each converted file
    #[arg(long, default_value_t = false)]
    pub save_log: bool,

    /// Write a per-file outcome report to this CSV file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Print per-file progress
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Additional arguments passed through to msconvert
    #[arg(last = true)]
    pub msconvert_args: Vec<String>,
}
