//! # msconvert 子进程封装
//!
//! 为单个任务构造并执行 msconvert 命令行。
//! msconvert 的安装与 PATH 配置是环境前提，不由本工具负责。
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 调用
//! - 使用 `models/task.rs`

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use crate::cli::convert::TargetFormat;
use crate::error::{MzbatchError, Result};
use crate::models::ConversionTask;

/// msconvert 执行器
pub struct MsconvertRunner {
    /// 可执行文件路径或命令名
    exec_path: String,
    /// 目标格式
    target: TargetFormat,
    /// 透传给 msconvert 的附加参数
    extra_args: Vec<String>,
    /// 是否把 msconvert 输出保存到目标文件旁
    save_log: bool,
}

impl MsconvertRunner {
    /// 创建新的执行器
    pub fn new(exec_path: &str, target: TargetFormat) -> Self {
        Self {
            exec_path: exec_path.to_string(),
            target,
            extra_args: Vec::new(),
            save_log: false,
        }
    }

    /// 设置附加参数
    pub fn with_extra_args(mut self, args: &[String]) -> Self {
        self.extra_args = args.to_vec();
        self
    }

    /// 设置是否保存日志
    pub fn save_log(mut self, save_log: bool) -> Self {
        self.save_log = save_log;
        self
    }

    /// 为任务构造命令行参数 (不含可执行文件名)
    ///
    /// 输出文件名显式用 --outfile 指定，避免依赖 msconvert
    /// 自身的命名规则。
    pub fn build_args(&self, task: &ConversionTask) -> Vec<String> {
        let mut args = vec![
            self.target.msconvert_flag(),
            "--64".to_string(),
            "--zlib".to_string(),
            "-o".to_string(),
            task.dest_dir().display().to_string(),
            "--outfile".to_string(),
            task.dest_name().to_string(),
            task.source.display().to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// 执行一次转换，阻塞直到子进程退出
    pub fn run(&self, task: &ConversionTask) -> Result<()> {
        let args = self.build_args(task);

        let output = Command::new(&self.exec_path).args(&args).output().map_err(
            |e| match e.kind() {
                std::io::ErrorKind::NotFound => MzbatchError::CommandNotFound {
                    command: self.exec_path.clone(),
                },
                _ => MzbatchError::CommandFailed {
                    command: self.exec_path.clone(),
                    stderr: e.to_string(),
                },
            },
        )?;

        if self.save_log {
            self.write_log(task, &output.stdout, &output.stderr);
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(MzbatchError::CommandFailed {
                command: format!("{} {}", self.exec_path, args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        }
    }

    /// 把 msconvert 的 stdout/stderr 写到目标文件旁
    fn write_log(&self, task: &ConversionTask, stdout: &[u8], stderr: &[u8]) {
        let log_path = self.log_path(task);
        let mut content = Vec::with_capacity(stdout.len() + stderr.len());
        content.extend_from_slice(stdout);
        content.extend_from_slice(stderr);
        // 日志写入失败不影响转换结果
        fs::write(log_path, content).ok();
    }

    /// 日志文件路径: <目标文件>.msconvert.log
    fn log_path(&self, task: &ConversionTask) -> PathBuf {
        task.dest_dir()
            .join(format!("{}.msconvert.log", task.dest_name()))
    }
}
