//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 校验日期范围、加载目录、过滤排序
//! - 输出全局统计信息
//!
//! ### `download_orchestrator` - 并行下载编排
//! - 规划任务（跳过已存在 / 重复目标）
//! - 控制并发数量（Semaphore）
//! - 派发、收集结果
//!
//! ### `progress` - 进度计数与取消
//!
//! ## 层次关系
//!
//! ```text
//! app (处理整次运行)
//!     ↓
//! download_orchestrator (处理 Vec<PuzzleDescriptor>)
//!     ↓
//! workflow::DownloadFlow (处理单个题目)
//!     ↓
//! services (能力层：catalog / filter / path / extractor)
//!     ↓
//! infrastructure + browser (JsExecutor / BrowserSession)
//! ```

pub mod app;
pub mod download_orchestrator;
pub mod progress;

pub use app::{App, RunRequest};
pub use download_orchestrator::{Orchestrator, RunPlan};
pub use progress::{CancelFlag, ProgressEvent, ProgressTracker};
