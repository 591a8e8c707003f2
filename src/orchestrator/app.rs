//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **参数校验**：日期范围非法时在任何 I/O 之前失败
//! 2. **加载目录**：从归档页获取全部题目
//! 3. **过滤排序**：按日期范围过滤，再按日期排序
//! 4. **向下委托**：交给 [`Orchestrator`] 并行下载
//! 5. **全局统计**：输出运行摘要
//!
//! 目录获取失败、日期范围非法会终止整次运行；单个题目失败只记录在摘要里。

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppResult, FileError};
use crate::models::RunSummary;
use crate::orchestrator::download_orchestrator::Orchestrator;
use crate::orchestrator::progress::{CancelFlag, ProgressEvent};
use crate::services::{date_filter, BrowserCatalog, BrowserExtractor, CatalogSource, PuzzleExtractor};
use crate::utils::logging::{log_startup, print_final_stats};

/// 一次下载请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub output_dir: PathBuf,
}

/// 应用主结构
pub struct App {
    config: Config,
    catalog: Arc<dyn CatalogSource>,
    extractor: Arc<dyn PuzzleExtractor>,
}

impl App {
    /// 使用浏览器实现初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;
        let catalog = Arc::new(BrowserCatalog::new(&config));
        let extractor = Arc::new(BrowserExtractor::new(&config));
        Ok(Self::with_collaborators(config, catalog, extractor))
    }

    /// 使用自定义的目录来源和提取器
    pub fn with_collaborators(
        config: Config,
        catalog: Arc<dyn CatalogSource>,
        extractor: Arc<dyn PuzzleExtractor>,
    ) -> Self {
        Self {
            config,
            catalog,
            extractor,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行应用主逻辑
    pub async fn run(
        &self,
        request: &RunRequest,
        events: Option<UnboundedSender<ProgressEvent>>,
        cancel: &CancelFlag,
    ) -> AppResult<RunSummary> {
        date_filter::validate_range(request.start, request.end)?;
        log_startup(&self.config, request);

        tokio::fs::create_dir_all(&request.output_dir)
            .await
            .map_err(|source| FileError::CreateDir {
                path: request.output_dir.clone(),
                source,
            })?;

        let catalog = self.catalog.fetch_catalog().await?;
        let mut selected = date_filter::filter(&catalog, request.start, request.end)?;

        if selected.is_empty() {
            warn!("⚠️ 指定日期范围内没有题目，程序结束");
            if let Some((earliest, latest)) = date_filter::date_span(&catalog) {
                info!("归档中可用的日期范围: {} 至 {}", earliest, latest);
            }
            return Ok(RunSummary::empty());
        }

        selected.sort_by_key(|d| d.date);
        info!("✓ 日期范围内共有 {} 个题目", selected.len());

        let orchestrator = Orchestrator::new(Arc::clone(&self.extractor), self.config.max_workers);
        let summary = orchestrator
            .run(&selected, &request.output_dir, events, cancel)
            .await;

        print_final_stats(&summary, &request.output_dir);
        Ok(summary)
    }
}
