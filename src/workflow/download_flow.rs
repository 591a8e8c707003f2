//! 单个题目的下载流程 - 流程层
//!
//! 流程顺序：
//! 1. 通知开始
//! 2. 调用提取器（每次调用使用独立的浏览器会话）
//! 3. 归类结果并记录进度

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{error, info, warn};

use crate::models::{DownloadResult, DownloadTask, Outcome};
use crate::orchestrator::ProgressTracker;
use crate::services::PuzzleExtractor;
use crate::workflow::download_ctx::DownloadCtx;

/// 单个题目的下载流程
///
/// - 不持有任何浏览器资源
/// - 不重试，失败只影响当前任务
#[derive(Clone)]
pub struct DownloadFlow {
    extractor: Arc<dyn PuzzleExtractor>,
}

impl DownloadFlow {
    pub fn new(extractor: Arc<dyn PuzzleExtractor>) -> Self {
        Self { extractor }
    }

    pub async fn run(
        &self,
        task: DownloadTask,
        ctx: &DownloadCtx,
        tracker: &ProgressTracker,
    ) -> DownloadResult {
        tracker.started(ctx.index, ctx.total, &ctx.label);
        info!("{} ⬇️ 开始下载", ctx);

        let attempt = AssertUnwindSafe(
            self.extractor
                .extract(&task.descriptor, &task.destination),
        )
        .catch_unwind()
        .await;

        let outcome = match attempt {
            Ok(Ok(())) => {
                info!("{} ✓ 已保存: {}", ctx, task.destination.display());
                Outcome::Success
            }
            Ok(Err(e)) => {
                warn!("{} ✗ 下载失败: {}", ctx, e);
                Outcome::Failed(e.to_string())
            }
            Err(payload) => {
                let reason = format!("提取过程中发生 panic: {}", panic_message(payload.as_ref()));
                error!("{} ❌ {}", ctx, reason);
                Outcome::Failed(reason)
            }
        };

        let result = DownloadResult::new(task, outcome);
        tracker.record(&result);
        result
    }
}

/// 取出 panic 携带的消息，非字符串负载返回占位文本
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "未知错误"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::models::{Difficulty, PuzzleDescriptor};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::path::{Path, PathBuf};

    struct PanickingExtractor;

    #[async_trait]
    impl PuzzleExtractor for PanickingExtractor {
        async fn extract(&self, _: &PuzzleDescriptor, _: &Path) -> Result<(), ExtractionError> {
            panic!("页面结构异常");
        }
    }

    struct MissingButtonExtractor;

    #[async_trait]
    impl PuzzleExtractor for MissingButtonExtractor {
        async fn extract(&self, _: &PuzzleDescriptor, _: &Path) -> Result<(), ExtractionError> {
            Err(ExtractionError::PrintButtonNotFound)
        }
    }

    fn task() -> DownloadTask {
        DownloadTask {
            descriptor: PuzzleDescriptor::new(
                NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
                Difficulty::Hard,
                "4412",
            ),
            destination: PathBuf::from("31-Oct-2025 - Hard.pdf"),
        }
    }

    #[tokio::test]
    async fn test_panic_becomes_failed_result() {
        let tracker = ProgressTracker::new(1, None);
        let flow = DownloadFlow::new(Arc::new(PanickingExtractor));
        let ctx = DownloadCtx::new(1, 1, "31 October 2025 - Hard");

        let result = flow.run(task(), &ctx, &tracker).await;

        match &result.outcome {
            Outcome::Failed(reason) => assert!(reason.contains("页面结构异常"), "{reason}"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(tracker.completed(), 1);
    }

    #[test]
    fn test_panic_message_handles_formatted_payload() {
        let payload: Box<dyn Any + Send> = Box::new(format!("选项 {} 不存在", 4412));
        assert_eq!(panic_message(payload.as_ref()), "选项 4412 不存在");

        let opaque: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(opaque.as_ref()), "未知错误");
    }

    #[tokio::test]
    async fn test_error_message_is_kept_as_reason() {
        let tracker = ProgressTracker::new(1, None);
        let flow = DownloadFlow::new(Arc::new(MissingButtonExtractor));
        let ctx = DownloadCtx::new(1, 1, "31 October 2025 - Hard");

        let result = flow.run(task(), &ctx, &tracker).await;

        assert_eq!(result.outcome, Outcome::Failed("找不到打印按钮".to_string()));
    }
}
