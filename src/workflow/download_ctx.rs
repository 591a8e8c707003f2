//! 下载任务上下文
//!
//! 封装"我正在处理第几个题目"这一信息

use std::fmt::Display;

/// 下载任务上下文
#[derive(Debug, Clone)]
pub struct DownloadCtx {
    /// 任务序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 本次运行的题目总数
    pub total: usize,

    /// 题目在归档中的文本
    pub label: String,
}

impl DownloadCtx {
    /// 创建新的任务上下文
    pub fn new(index: usize, total: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            total,
            label: label.into(),
        }
    }
}

impl Display for DownloadCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[任务 {}/{}] {}", self.index, self.total, self.label)
    }
}
