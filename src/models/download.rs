use std::path::PathBuf;

use crate::models::puzzle::PuzzleDescriptor;

/// 下载任务：一个题目 + 它的目标文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub descriptor: PuzzleDescriptor,
    pub destination: PathBuf,
}

/// 跳过原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 目标文件已存在
    AlreadyExists,
    /// 本次运行中已有其他题目占用了同一目标文件
    DuplicateTarget,
}

/// 任务结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Skipped(SkipReason),
    Failed(String),
}

impl Outcome {
    /// 日志中的状态标记
    pub fn marker(&self) -> &'static str {
        match self {
            Outcome::Success => "✓",
            Outcome::Skipped(_) => "⚡",
            Outcome::Failed(_) => "✗",
        }
    }
}

/// 单个题目的最终结果，每个任务恰好产生一次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub task: DownloadTask,
    pub outcome: Outcome,
}

impl DownloadResult {
    pub fn new(task: DownloadTask, outcome: Outcome) -> Self {
        Self { task, outcome }
    }

    pub fn label(&self) -> &str {
        &self.task.descriptor.label
    }
}

/// 运行摘要
///
/// `succeeded + skipped + failed + not_dispatched == total`。
/// `not_dispatched` 只有在运行被取消时才可能非零，此时 `complete == false`。
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub not_dispatched: usize,
    pub complete: bool,
    pub results: Vec<DownloadResult>,
}

impl RunSummary {
    /// 空运行（没有任何题目）
    pub fn empty() -> Self {
        Self {
            complete: true,
            ..Default::default()
        }
    }

    /// 由全部结果汇总，`total` 是过滤后的题目总数
    pub fn from_results(total: usize, results: Vec<DownloadResult>) -> Self {
        let mut summary = Self {
            total,
            ..Default::default()
        };
        for result in &results {
            match result.outcome {
                Outcome::Success => summary.succeeded += 1,
                Outcome::Skipped(_) => summary.skipped += 1,
                Outcome::Failed(_) => summary.failed += 1,
            }
        }
        summary.not_dispatched = total.saturating_sub(results.len());
        summary.complete = summary.not_dispatched == 0;
        summary.results = results;
        summary
    }

    /// 实际派发给 worker 的任务数
    pub fn dispatched(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn failures(&self) -> impl Iterator<Item = (&DownloadResult, &str)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            Outcome::Failed(reason) => Some((r, reason.as_str())),
            _ => None,
        })
    }
}
