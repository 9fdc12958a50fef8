//! # 批量执行器
//!
//! 在固定大小的工作池上并行执行转换任务。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代，每个 worker 阻塞等待其子进程
//! - 进度条显示，verbose 模式下逐文件输出
//! - 错误收集与汇总报告，单个任务失败不影响其余任务
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `utils/output.rs` 输出逐文件信息
//! - 使用 `rayon` 进行并行计算

use crate::models::ConversionTask;
use crate::utils::{output, progress};

use rayon::prelude::*;

/// 单个任务处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult {
    /// 转换完成 (源路径, 目标路径)
    Converted(String, String),
    /// 跳过，目标已存在且完整 (目标路径)
    Skipped(String),
    /// 转换失败 (源路径, 错误信息)
    Failed(String, String),
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 转换数量
    pub converted: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情 (源路径, 错误信息)
    pub failures: Vec<(String, String)>,
    /// 按任务顺序保存的逐个结果
    pub results: Vec<ProcessResult>,
}

impl BatchResult {
    /// 合并单个处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match &result {
            ProcessResult::Converted(_, _) => self.converted += 1,
            ProcessResult::Skipped(_) => self.skipped += 1,
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path.clone(), err.clone()));
            }
        }
        self.results.push(result);
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.converted + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行 worker 数
    workers: usize,
    /// 是否逐文件输出
    verbose: bool,
}

impl BatchRunner {
    /// 创建新的批量执行器 (0 = 使用全部核心)
    pub fn new(workers: usize) -> Self {
        let workers = if workers == 0 {
            num_cpus::get()
        } else {
            workers
        };
        Self {
            workers,
            verbose: false,
        }
    }

    /// 设置 verbose 模式
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// 并行处理任务列表，返回聚合统计
    ///
    /// 各任务的目标路径互不相同，worker 之间无共享可变状态，
    /// 完成顺序不保证，仅最终统计有序。
    pub fn run<F>(&self, tasks: &[ConversionTask], processor: F) -> BatchResult
    where
        F: Fn(&ConversionTask) -> ProcessResult + Sync + Send,
    {
        let pb = progress::create_progress_bar(tasks.len() as u64, "Converting");
        let verbose = self.verbose;

        // 独立线程池，避免污染全局 rayon 配置
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                pb.finish_and_clear();
                output::print_warning(&format!(
                    "Failed to build thread pool ({}), falling back to sequential",
                    e
                ));
                return self.run_sequential(tasks, processor);
            }
        };

        let results: Vec<ProcessResult> = pool.install(|| {
            tasks
                .par_iter()
                .map(|task| {
                    let result = processor(task);

                    match &result {
                        ProcessResult::Converted(from, to) if verbose => {
                            pb.suspend(|| output::print_conversion(from, to));
                        }
                        ProcessResult::Skipped(path) if verbose => {
                            pb.suspend(|| {
                                output::print_skip(&format!("{} (already converted)", path))
                            });
                        }
                        ProcessResult::Failed(path, err) => {
                            pb.suspend(|| output::print_error(&format!("{}: {}", path, err)));
                        }
                        _ => {}
                    }

                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();

        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }

        batch_result
    }

    fn run_sequential<F>(&self, tasks: &[ConversionTask], processor: F) -> BatchResult
    where
        F: Fn(&ConversionTask) -> ProcessResult + Sync + Send,
    {
        let mut batch_result = BatchResult::default();
        for task in tasks {
            batch_result.merge(processor(task));
        }
        batch_result
    }
}
