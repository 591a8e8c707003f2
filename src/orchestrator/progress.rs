//! 进度计数与取消标志
//!
//! 进度只通过 channel 发给展示层（CLI），worker 从不直接操作展示状态。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedSender;

use crate::models::DownloadResult;

/// 进度事件
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// 任务开始执行（仅派发的任务）
    Started {
        index: usize,
        total: usize,
        label: String,
    },
    /// 任务到达终态（成功 / 跳过 / 失败都算）
    Finished {
        completed: usize,
        total: usize,
        result: DownloadResult,
    },
}

/// 单次运行的进度计数器
///
/// 每次运行新建一个，运行结束即丢弃。计数加一和发送 `Finished` 在同一把锁内完成，
/// 所以接收方看到的 `completed` 严格递增，最后一条等于 `total`。
pub struct ProgressTracker {
    total: usize,
    completed: Mutex<usize>,
    events: Option<UnboundedSender<ProgressEvent>>,
}

impl ProgressTracker {
    pub fn new(total: usize, events: Option<UnboundedSender<ProgressEvent>>) -> Self {
        Self {
            total,
            completed: Mutex::new(0),
            events,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        *self.completed.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// `index` / `total` 是在已派发任务中的位置
    pub fn started(&self, index: usize, total: usize, label: &str) {
        self.send(ProgressEvent::Started {
            index,
            total,
            label: label.to_string(),
        });
    }

    /// 记录一个终态结果，返回记录后的完成数
    pub fn record(&self, result: &DownloadResult) -> usize {
        let mut completed = self.completed.lock().unwrap_or_else(|e| e.into_inner());
        *completed += 1;
        self.send(ProgressEvent::Finished {
            completed: *completed,
            total: self.total,
            result: result.clone(),
        });
        *completed
    }

    fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.events {
            // 接收方已关闭时静默丢弃
            let _ = tx.send(event);
        }
    }
}

/// 协作式取消标志
///
/// 编排层在派发每个任务前检查；已经在执行的任务会正常结束。
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
