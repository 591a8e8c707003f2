//! # Samurai Sudoku Downloader
//!
//! 按日期范围从 samurai-sudoku.com 归档批量下载题目 PDF
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - 启动独立的浏览器会话（每个会话一个临时 profile）
//! - `infrastructure/` - `JsExecutor`，唯一的 page owner，提供 eval / 打印 PDF 能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个题目
//! - `CatalogSource` - 读取归档目录
//! - `date_filter` - 日期范围过滤
//! - `path_resolver` - 计算目标文件路径
//! - `PuzzleExtractor` - 把一个题目导出为 PDF
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个题目"的完整处理流程
//! - `DownloadCtx` - 上下文封装（序号 + 标签）
//! - `DownloadFlow` - 流程编排（提取 → 结果 → 进度）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 整次运行：校验 → 目录 → 过滤 → 下载 → 统计
//! - `orchestrator/download_orchestrator` - 跳过判断、并发控制、结果收集
//!
//! 外围的 `cli` / `interactive` / `settings` / `logger` 只在二进制入口中使用。
//!
//! ## 模块结构

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod interactive;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod settings;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::JsExecutor;
pub use models::{DownloadResult, Outcome, PuzzleDescriptor, RunSummary};
pub use orchestrator::{App, CancelFlag, ProgressEvent, RunRequest};
pub use services::{CatalogSource, PuzzleExtractor};
pub use workflow::{DownloadCtx, DownloadFlow};
