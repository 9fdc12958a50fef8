//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `convert`: 批量转换厂商原始数据
//! - `scan`: 预检扫描，列出将要执行的动作
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: convert, scan

pub mod convert;
pub mod scan;

use clap::{Parser, Subcommand};

/// mzbatch - 质谱数据批量转换工具箱
#[derive(Parser)]
#[command(name = "mzbatch")]
#[command(version)]
#[command(about = "A batch vendor-to-mzML conversion toolkit for mass spectrometry data", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Convert vendor raw files to mzML/mzXML via msconvert
    Convert(convert::ConvertArgs),

    /// List matched files and planned actions without converting
    Scan(scan::ScanArgs),
}
