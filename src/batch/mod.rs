//! # 批量处理模块
//!
//! 提供源文件收集与并行转换调度能力。
//!
//! ## 功能
//! - 按厂商后缀/前缀/子串/glob 收集源文件
//! - .d 目录整体作为单个源处理
//! - 基于 rayon 的固定大小工作池
//! - 进度反馈与结果统计
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchResult, BatchRunner, ProcessResult};
