//! 用户偏好设置
//!
//! 保存在 `~/.samurai_sudoku_downloader/settings.json`，目前只使用上次的输出目录。
//! 读写失败都只记录警告，不影响下载。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::FileError;

/// 设置内容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// 上次使用的输出目录
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,
    /// 其他未知字段原样保留
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// 设置文件读写
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 默认位置，找不到用户目录时返回 None
    pub fn default_location() -> Option<Self> {
        dirs::home_dir().map(|home| {
            Self::new(
                home.join(".samurai_sudoku_downloader")
                    .join("settings.json"),
            )
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取设置，文件不存在或损坏时返回默认值
    pub async fn load(&self) -> Settings {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("设置文件不存在: {}", self.path.display());
                return Settings::default();
            }
            Err(e) => {
                warn!("⚠️ 无法读取设置 ({}): {}", self.path.display(), e);
                return Settings::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("⚠️ 设置文件格式错误 ({}): {}", self.path.display(), e);
            Settings::default()
        })
    }

    pub async fn save(&self, settings: &Settings) -> Result<(), FileError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| FileError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| FileError::write_failed(&self.path, e))?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| FileError::write_failed(&self.path, e))
    }
}

/// 没有任何设置时的默认输出目录
pub fn default_output_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Downloads")
        .join("SamuraiSudoku")
}
