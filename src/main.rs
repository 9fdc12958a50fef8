//! # mzbatch - 质谱数据批量转换工具箱
//!
//! 将厂商格式的质谱原始数据批量转换为开放格式 (mzML / mzXML)。
//! 转换本身由外部 `msconvert` 完成，本工具负责扫描、筛选、调度与汇总。
//!
//! ## 子命令
//! - `convert` - 批量转换 (递归扫描、镜像目录结构、并行调度)
//! - `scan`    - 预检 (列出将要转换/跳过的文件，不执行转换)
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/    (文件收集与并行执行)
//!   │     ├── convert/  (msconvert 调用封装)
//!   │     └── models/   (转换任务数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod convert;
mod error;
mod models;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
