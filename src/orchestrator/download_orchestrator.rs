//! 并行下载编排 - 编排层
//!
//! ## 职责
//!
//! 1. **任务规划**：为每个题目计算目标文件，已存在或目标重复的直接记为跳过
//! 2. **并发控制**：使用 Semaphore 限制同时执行的任务数
//! 3. **派发**：每个任务一个 tokio 任务，派发前检查取消标志
//! 4. **汇总**：收集所有结果，生成运行摘要
//!
//! 单个任务失败不会中断其他任务，也不会自动重试。

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use crate::models::{DownloadResult, DownloadTask, Outcome, PuzzleDescriptor, RunSummary, SkipReason};
use crate::orchestrator::progress::{CancelFlag, ProgressEvent, ProgressTracker};
use crate::services::{path_resolver, PuzzleExtractor};
use crate::utils::logging::log_plan;
use crate::workflow::{DownloadCtx, DownloadFlow};

/// 任务规划结果
#[derive(Debug, Default)]
pub struct RunPlan {
    /// 不需要派发的题目（已存在 / 目标重复）
    pub skipped: Vec<DownloadResult>,
    /// 需要派发的任务，目标文件互不相同
    pub tasks: Vec<DownloadTask>,
}

/// 并行下载编排器
pub struct Orchestrator {
    flow: DownloadFlow,
    max_workers: usize,
}

impl Orchestrator {
    pub fn new(extractor: Arc<dyn PuzzleExtractor>, max_workers: usize) -> Self {
        Self {
            flow: DownloadFlow::new(extractor),
            max_workers: max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// 规划任务：先判断是否跳过，再决定是否派发
    pub async fn plan(descriptors: &[PuzzleDescriptor], output_dir: &Path) -> RunPlan {
        let mut plan = RunPlan::default();
        let mut claimed = HashSet::new();

        for descriptor in descriptors {
            let destination = path_resolver::resolve(descriptor, output_dir);
            let task = DownloadTask {
                descriptor: descriptor.clone(),
                destination,
            };

            if path_resolver::exists(&task.destination).await {
                plan.skipped
                    .push(DownloadResult::new(task, Outcome::Skipped(SkipReason::AlreadyExists)));
            } else if !claimed.insert(task.destination.clone()) {
                warn!(
                    "⚠️ {} 与其他题目的目标文件相同，已跳过: {}",
                    descriptor.label,
                    task.destination.display()
                );
                plan.skipped
                    .push(DownloadResult::new(task, Outcome::Skipped(SkipReason::DuplicateTarget)));
            } else {
                plan.tasks.push(task);
            }
        }

        plan
    }

    /// 执行一次完整的下载运行
    ///
    /// # 参数
    /// - `descriptors`: 已按日期过滤的题目
    /// - `output_dir`: 输出目录
    /// - `events`: 进度事件接收端（可选）
    /// - `cancel`: 取消标志
    pub async fn run(
        &self,
        descriptors: &[PuzzleDescriptor],
        output_dir: &Path,
        events: Option<UnboundedSender<ProgressEvent>>,
        cancel: &CancelFlag,
    ) -> RunSummary {
        let total = descriptors.len();
        let tracker = Arc::new(ProgressTracker::new(total, events));

        let plan = Self::plan(descriptors, output_dir).await;
        log_plan(total, plan.skipped.len(), plan.tasks.len(), self.max_workers);

        for skipped in &plan.skipped {
            debug!("⚡ 跳过: {}", skipped.task.destination.display());
            tracker.record(skipped);
        }
        let mut results = plan.skipped;

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let task_total = plan.tasks.len();
        let mut handles = Vec::with_capacity(task_total);

        for (idx, task) in plan.tasks.into_iter().enumerate() {
            if cancel.is_cancelled() {
                break;
            }
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };
            // 等待空闲 worker 期间可能已被取消
            if cancel.is_cancelled() {
                break;
            }

            let ctx = DownloadCtx::new(idx + 1, task_total, task.descriptor.label.clone());
            let flow = self.flow.clone();
            let tracker_clone = Arc::clone(&tracker);
            let task_clone = task.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                flow.run(task, &ctx, &tracker_clone).await
            });
            handles.push((task_clone, handle));
        }

        let dispatched = handles.len();
        if dispatched < task_total {
            warn!(
                "⚠️ 下载已取消，{} 个任务未派发，等待 {} 个进行中的任务结束",
                task_total - dispatched,
                semaphore_in_use(&semaphore, self.max_workers)
            );
        }

        // 等待所有已派发任务完成
        for (task, handle) in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!("[{}] 任务执行失败: {}", task.descriptor.label, e);
                    let result = DownloadResult::new(task, Outcome::Failed(e.to_string()));
                    tracker.record(&result);
                    results.push(result);
                }
            }
        }

        results.sort_by_key(|r| r.task.descriptor.date);
        RunSummary::from_results(total, results)
    }
}

fn semaphore_in_use(semaphore: &Semaphore, max_workers: usize) -> usize {
    max_workers.saturating_sub(semaphore.available_permits())
}
