//! 题目提取 - 业务能力层
//!
//! 在归档页选中题目 → 点击打印 → 在打印窗口导出 PDF。
//! 每次调用都启动自己的浏览器会话，结束后关闭，可以安全地并发调用。

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::browser::{BrowserSession, LaunchOptions};
use crate::config::Config;
use crate::error::{BrowserError, ExtractionError};
use crate::infrastructure::JsExecutor;
use crate::models::PuzzleDescriptor;
use crate::services::catalog::ARCHIVE_SELECT;
use crate::services::path_resolver;

/// 查找并点击打印按钮，返回命中的选择器描述；找不到时返回空字符串
const CLICK_PRINT_BUTTON_JS: &str = r#"
(() => {
    const bySelector = ['#print', '#btnPrint', '.print', 'button.print', 'a.print'];
    for (const sel of bySelector) {
        const el = document.querySelector(sel);
        if (el) { el.click(); return sel; }
    }
    const candidates = document.querySelectorAll('button, a, input[type="button"]');
    for (const el of candidates) {
        const text = (el.innerText || el.value || '').trim();
        if (text.includes('Print')) { el.click(); return 'text:' + text; }
    }
    return '';
})()
"#;

/// 尝试选择"整页"打印选项，返回是否点击成功
const CLICK_FULL_PAGE_JS: &str = r#"
(() => {
    const byId = document.querySelector('#fullPage, #full-page');
    if (byId) { byId.click(); return true; }
    const radio = document.querySelector('input[type="radio"][value*="full"]');
    if (radio) { radio.click(); return true; }
    for (const el of document.querySelectorAll('button, label')) {
        if ((el.innerText || '').trim().toLowerCase().includes('full page')) { el.click(); return true; }
    }
    return false;
})()
"#;

/// 题目提取能力
#[async_trait]
pub trait PuzzleExtractor: Send + Sync {
    /// 把题目保存为 `destination` 处的 PDF
    async fn extract(
        &self,
        descriptor: &PuzzleDescriptor,
        destination: &Path,
    ) -> Result<(), ExtractionError>;
}

/// 基于浏览器打印的提取器
///
/// 只持有不可变的启动参数；浏览器会话在每次 `extract` 内部创建和销毁。
pub struct BrowserExtractor {
    archive_url: String,
    launch: LaunchOptions,
    element_timeout: Duration,
    settle_delay: Duration,
    save_fallback_snapshot: bool,
}

impl BrowserExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            archive_url: config.archive_url.clone(),
            launch: LaunchOptions::from_config(config),
            element_timeout: Duration::from_secs(config.element_timeout_secs),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            save_fallback_snapshot: config.save_fallback_snapshot,
        }
    }

    async fn run_in_session(
        &self,
        session: &BrowserSession,
        descriptor: &PuzzleDescriptor,
        destination: &Path,
    ) -> Result<(), ExtractionError> {
        let main = session.open(&self.archive_url).await?;
        main.wait_for_selector(ARCHIVE_SELECT, self.element_timeout)
            .await?;

        select_puzzle(&main, &descriptor.identifier).await?;
        sleep(self.settle_delay).await;

        // 点击前记下已有页面，打印窗口是之后新出现的那个
        let known_pages = session.page_ids().await?;
        debug!("  正在查找打印按钮...");
        let clicked: String = main.eval_as(CLICK_PRINT_BUTTON_JS).await?;
        match clicked.as_str() {
            "" => {
                if self.save_fallback_snapshot {
                    self.save_snapshot(&main, destination).await;
                }
                return Err(ExtractionError::PrintButtonNotFound);
            }
            how => debug!("  ✓ 已点击打印按钮 ({})", how),
        }

        let print_page = session
            .wait_for_new_page(&known_pages, self.element_timeout)
            .await
            .map_err(|e| match e {
                BrowserError::Timeout { secs, .. } => ExtractionError::PrintWindowMissing { secs },
                other => other.into(),
            })?;
        sleep(self.settle_delay).await;

        // 整页选项不存在时使用默认布局
        match print_page.eval_as::<bool>(CLICK_FULL_PAGE_JS).await {
            Ok(true) => {
                debug!("  ✓ 已选择整页选项");
                sleep(Duration::from_millis(300)).await;
            }
            Ok(false) => debug!("  未找到整页选项，使用默认布局"),
            Err(e) => debug!("  无法设置整页选项: {}", e),
        }

        let pdf = print_page.print_pdf().await?;
        write_atomically(destination, &pdf).await
    }

    async fn save_snapshot(&self, page: &JsExecutor, destination: &Path) {
        let path = path_resolver::snapshot_path(destination);
        match page.screenshot_png().await {
            Ok(png) => match fs::write(&path, png).await {
                Ok(()) => info!("  已保存页面截图: {}", path.display()),
                Err(e) => warn!("  ⚠️ 保存截图失败 ({}): {}", path.display(), e),
            },
            Err(e) => warn!("  ⚠️ 无法截图: {}", e),
        }
    }
}

#[async_trait]
impl PuzzleExtractor for BrowserExtractor {
    async fn extract(
        &self,
        descriptor: &PuzzleDescriptor,
        destination: &Path,
    ) -> Result<(), ExtractionError> {
        let session = BrowserSession::launch(&self.launch).await?;
        let result = self.run_in_session(&session, descriptor, destination).await;
        session.close().await;
        result
    }
}

/// 在归档下拉框中选中题目并触发 change 事件
async fn select_puzzle(page: &JsExecutor, identifier: &str) -> Result<(), ExtractionError> {
    let value = serde_json::to_string(identifier).map_err(BrowserError::from)?;
    let script = format!(
        r#"(() => {{
            const select = document.querySelector('{ARCHIVE_SELECT}');
            if (!select) return false;
            const found = Array.from(select.options).some(o => o.value === {value});
            if (!found) return false;
            select.value = {value};
            select.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()"#
    );
    let selected: bool = page.eval_as(script).await?;
    if !selected {
        return Err(ExtractionError::PuzzleNotInArchive {
            identifier: identifier.to_string(),
        });
    }
    Ok(())
}

/// 先写临时文件再改名，中途失败不会留下看起来已完成的 PDF
pub async fn write_atomically(destination: &Path, bytes: &[u8]) -> Result<(), ExtractionError> {
    let partial = path_resolver::partial_path(destination);
    fs::write(&partial, bytes)
        .await
        .map_err(|e| ExtractionError::io(&partial, e))?;
    if let Err(e) = fs::rename(&partial, destination).await {
        let _ = fs::remove_file(&partial).await;
        return Err(ExtractionError::io(destination, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_atomically_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("31-Oct-2025 - Hard.pdf");

        write_atomically(&dest, b"%PDF-1.4").await.unwrap();

        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"%PDF-1.4");
        assert!(!path_resolver::exists(&path_resolver::partial_path(&dest)).await);
    }

    #[tokio::test]
    async fn test_write_atomically_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing").join("x.pdf");

        let err = write_atomically(&dest, b"%PDF").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Io { .. }));
        assert!(!path_resolver::exists(&dest).await);
    }
}
