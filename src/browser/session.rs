use std::collections::HashSet;
use std::hash::Hash;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::target::TargetId;
use chromiumoxide::Browser;
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use crate::browser::launch::{build_browser_config, LaunchOptions};
use crate::error::BrowserError;
use crate::infrastructure::JsExecutor;

/// 一个独立的浏览器会话
///
/// 每个会话有自己的浏览器进程和数据目录，不在任务之间共享。
/// 用完必须调用 [`BrowserSession::close`]。
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    _profile: TempDir,
}

impl BrowserSession {
    /// 启动浏览器
    pub async fn launch(options: &LaunchOptions) -> Result<Self, BrowserError> {
        debug!("🚀 启动浏览器...");

        let profile = tempfile::Builder::new()
            .prefix("samurai-sudoku-")
            .tempdir()
            .map_err(|e| BrowserError::LaunchFailed {
                source: Box::new(e),
            })?;
        let config = build_browser_config(options, profile.path())?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            error!("启动浏览器失败: {}", e);
            BrowserError::LaunchFailed {
                source: Box::new(e),
            }
        })?;

        // 在后台处理浏览器事件
        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        // 添加短暂延迟以等待浏览器状态同步
        sleep(Duration::from_millis(300)).await;
        debug!("浏览器启动成功");

        Ok(Self {
            browser,
            handler,
            _profile: profile,
        })
    }

    /// 打开新页面并导航到指定 URL
    pub async fn open(&self, url: &str) -> Result<JsExecutor, BrowserError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageCreationFailed {
                source: Box::new(e),
            })?;
        page.goto(url).await.map_err(|e| {
            error!("导航到 {} 失败: {}", url, e);
            BrowserError::navigation_failed(url, e)
        })?;
        info!("已打开: {}", url);
        Ok(JsExecutor::new(page))
    }

    /// 当前所有页面的 target id
    pub async fn page_ids(&self) -> Result<HashSet<TargetId>, BrowserError> {
        let pages = self.browser.pages().await?;
        Ok(pages.iter().map(|p| p.target_id().clone()).collect())
    }

    /// 等待 `known` 之外的页面出现（例如点击打印后弹出的窗口）
    ///
    /// `known` 要在触发新窗口之前取得，否则启动时就存在的空白标签页也会被当成新窗口。
    pub async fn wait_for_new_page(
        &self,
        known: &HashSet<TargetId>,
        timeout: Duration,
    ) -> Result<JsExecutor, BrowserError> {
        let deadline = Instant::now() + timeout;
        loop {
            let pages = self.browser.pages().await?;
            if let Some(page) = first_unknown(pages, known, |p| p.target_id()) {
                debug!("✓ 切换到新窗口");
                return Ok(JsExecutor::new(page));
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::timeout("新窗口", timeout.as_secs()));
            }
            sleep(Duration::from_millis(200)).await;
        }
    }

    /// 关闭浏览器并回收后台任务
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("等待浏览器进程退出失败: {}", e);
        }
        self.handler.abort();
    }
}

/// 第一个 key 不在 `known` 中的元素
fn first_unknown<T, K, F>(items: Vec<T>, known: &HashSet<K>, key: F) -> Option<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> &K,
{
    items.into_iter().find(|item| !known.contains(key(item)))
}
