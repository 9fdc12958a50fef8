//! # 数据模型模块
//!
//! 定义批量转换的核心数据结构。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/`, `convert/` 使用
//! - 子模块: task

pub mod task;

pub use task::{ConversionTask, TaskStatus};
