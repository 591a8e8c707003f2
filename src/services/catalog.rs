//! 题目目录 - 业务能力层
//!
//! 打开归档页，读取 `select#ai` 下拉框，得到全部可下载的题目

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::browser::{BrowserSession, LaunchOptions};
use crate::config::Config;
use crate::error::{BrowserError, CatalogFetchError};
use crate::models::{parse_archive_date, Difficulty, PuzzleDescriptor};

/// 归档下拉框
pub const ARCHIVE_SELECT: &str = "select#ai";

/// 题目目录来源
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// 获取归档中的全部题目，保持页面上的顺序
    async fn fetch_catalog(&self) -> Result<Vec<PuzzleDescriptor>, CatalogFetchError>;
}

/// 通过浏览器读取归档页
pub struct BrowserCatalog {
    archive_url: String,
    launch: LaunchOptions,
    element_timeout: Duration,
}

impl BrowserCatalog {
    pub fn new(config: &Config) -> Self {
        Self {
            archive_url: config.archive_url.clone(),
            launch: LaunchOptions::from_config(config),
            element_timeout: Duration::from_secs(config.element_timeout_secs),
        }
    }

    async fn load_archive_html(&self, session: &BrowserSession) -> Result<String, CatalogFetchError> {
        let page = session.open(&self.archive_url).await?;
        match page.wait_for_selector(ARCHIVE_SELECT, self.element_timeout).await {
            Ok(()) => {}
            Err(BrowserError::Timeout { .. }) => {
                return Err(CatalogFetchError::LayoutChanged {
                    url: self.archive_url.clone(),
                })
            }
            Err(e) => return Err(e.into()),
        }
        let html = page.content().await?;
        page.close().await;
        Ok(html)
    }
}

#[async_trait]
impl CatalogSource for BrowserCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<PuzzleDescriptor>, CatalogFetchError> {
        info!("📚 正在加载归档页: {}", self.archive_url);

        let session = BrowserSession::launch(&self.launch).await?;
        let html = self.load_archive_html(&session).await;
        session.close().await;

        let puzzles = parse_archive_html(&html?, &self.archive_url)?;
        info!("✓ 从归档中解析出 {} 个题目", puzzles.len());
        Ok(puzzles)
    }
}

/// 解析归档页 HTML
pub fn parse_archive_html(html: &str, url: &str) -> Result<Vec<PuzzleDescriptor>, CatalogFetchError> {
    let document = Html::parse_document(html);
    let select_sel =
        Selector::parse(ARCHIVE_SELECT).map_err(|e| CatalogFetchError::Parse(e.to_string()))?;
    let option_sel = Selector::parse("option").map_err(|e| CatalogFetchError::Parse(e.to_string()))?;

    let select = document
        .select(&select_sel)
        .next()
        .ok_or_else(|| CatalogFetchError::LayoutChanged {
            url: url.to_string(),
        })?;

    let options: Vec<_> = select.select(&option_sel).collect();
    debug!("下拉框中共有 {} 个选项", options.len());

    let puzzles: Vec<PuzzleDescriptor> = options
        .iter()
        .filter_map(|option| {
            let value = option.value().attr("value").unwrap_or_default();
            let text = option.text().collect::<String>();
            parse_option(value, &text)
        })
        .collect();

    if puzzles.is_empty() {
        return Err(CatalogFetchError::Empty {
            url: url.to_string(),
        });
    }
    Ok(puzzles)
}

/// 解析单个下拉选项，例如 `value="4412"`、文本 `"31st October 2025 - Hard"`
///
/// 占位选项（value 为空或 "0"）、没有日期部分或日期无法解析的选项返回 None。
pub fn parse_option(value: &str, text: &str) -> Option<PuzzleDescriptor> {
    let value = value.trim();
    if value.is_empty() || value == "0" {
        return None;
    }

    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let (date_text, difficulty) = text.split_once(" - ")?;

    match parse_archive_date(date_text) {
        Some(date) => Some(
            PuzzleDescriptor::new(date, Difficulty::parse(difficulty), value).with_label(text.clone()),
        ),
        None => {
            warn!("⚠️ 无法解析日期 '{}'，已跳过", date_text);
            None
        }
    }
}
