//! # scan 子命令 CLI 定义
//!
//! 预检扫描：按照与 convert 相同的规则收集文件并计算目标路径，
//! 但只列出将要执行的动作，不调用 msconvert。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/scan.rs`

use clap::Args;
use std::path::PathBuf;

use super::convert::TargetFormat;

/// scan 子命令参数
#[derive(Args, Debug)]
pub struct ScanArgs {
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

    /// Do not recurse into subdirectories
    #[arg(long, default_value_t = false)]
    pub no_recursive: bool,

    /// Treat existing outputs as stale (every match would be converted)
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Existing outputs smaller than this many bytes count as incomplete
    #[arg(long, default_value_t = 0)]
    pub redo_threshold: u64,

    /// Count outputs without a closing XML tag as incomplete
    #[arg(long, default_value_t = false)]
    pub check_tail: bool,

    /// Export the scan result to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
