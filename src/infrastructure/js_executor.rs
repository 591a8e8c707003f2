//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露页面能力：执行 JS、等待元素、导出 PDF / 截图

use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, PrintToPdfParams};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::BrowserError;

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 等页面能力
/// - 不认识题目 / 归档
/// - 不处理业务流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue, BrowserError> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(
        &self,
        js_code: impl Into<String>,
    ) -> Result<T, BrowserError> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 轮询等待 CSS 选择器出现
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                debug!("✓ 找到元素: {}", selector);
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::timeout(selector, timeout.as_secs()));
            }
            sleep(Duration::from_millis(200)).await;
        }
    }

    /// 当前页面 HTML
    pub async fn content(&self) -> Result<String, BrowserError> {
        Ok(self.page.content().await?)
    }

    /// 把当前页面打印为 PDF（竖版、无页眉页脚、保留背景、使用 CSS 页面尺寸）
    pub async fn print_pdf(&self) -> Result<Vec<u8>, BrowserError> {
        let params = PrintToPdfParams {
            landscape: Some(false),
            display_header_footer: Some(false),
            print_background: Some(true),
            prefer_css_page_size: Some(true),
            ..Default::default()
        };
        Ok(self.page.pdf(params).await?)
    }

    /// 整页 PNG 截图
    pub async fn screenshot_png(&self) -> Result<Vec<u8>, BrowserError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        Ok(self.page.screenshot(params).await?)
    }

    /// 关闭页面
    pub async fn close(self) {
        if let Err(e) = self.page.close().await {
            debug!("关闭页面失败: {}", e);
        }
    }
}
