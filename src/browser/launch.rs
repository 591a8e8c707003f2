use std::path::{Path, PathBuf};

use chromiumoxide::BrowserConfig;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::BrowserError;

/// 浏览器启动参数
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
    pub window_size: (u32, u32),
}

impl LaunchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            headless: config.headless,
            chrome_executable: config.chrome_executable.as_ref().map(PathBuf::from),
            window_size: (1920, 1080),
        }
    }
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// 构建浏览器配置
///
/// `user_data_dir` 必须是本会话私有的目录，多个浏览器共用一个目录会互相锁住。
pub fn build_browser_config(
    options: &LaunchOptions,
    user_data_dir: &Path,
) -> Result<BrowserConfig, BrowserError> {
    debug!(
        "浏览器配置: headless={}, 数据目录={}",
        options.headless,
        user_data_dir.display()
    );

    let mut builder = BrowserConfig::builder();
    builder = if options.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };

    if let Some(executable) = &options.chrome_executable {
        builder = builder.chrome_executable(executable);
    }

    let (width, height) = options.window_size;
    builder
        .window_size(width, height)
        .user_data_dir(user_data_dir)
        .args(vec![
            "--disable-gpu",           // 无头模式下禁用 GPU
            "--no-sandbox",            // 禁用沙盒，防止权限问题导致的崩溃
            "--disable-dev-shm-usage", // 防止共享内存不足
        ])
        .build()
        .map_err(|e| {
            error!("配置浏览器失败: {}", e);
            BrowserError::ConfigurationFailed(e)
        })
}
