use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// 程序配置文件
///
/// 优先级：默认值 < TOML 配置文件 < 环境变量 < 命令行参数
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 题目归档页 URL
    pub archive_url: String,
    /// 同时下载的题目数量（每个任务一个独立浏览器）
    pub max_workers: usize,
    /// 是否以无头模式运行浏览器
    pub headless: bool,
    /// 浏览器可执行文件路径，为空时由 chromiumoxide 自动查找
    pub chrome_executable: Option<String>,
    /// 等待页面元素的超时时间（秒）
    pub element_timeout_secs: u64,
    /// 选择题目、打开打印窗口后的等待时间（毫秒）
    pub settle_delay_ms: u64,
    /// 找不到打印按钮时是否保存整页截图
    pub save_fallback_snapshot: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive_url: "https://www.samurai-sudoku.com/classic/".to_string(),
            max_workers: 3,
            headless: true,
            chrome_executable: None,
            element_timeout_secs: 10,
            settle_delay_ms: 500,
            save_fallback_snapshot: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// 读取配置文件（可选），再用环境变量覆盖
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 用环境变量覆盖当前配置，无法解析的值保持原样
    pub fn with_env(self) -> Self {
        Self {
            archive_url: std::env::var("SUDOKU_ARCHIVE_URL").unwrap_or(self.archive_url),
            max_workers: std::env::var("MAX_WORKERS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_workers),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(self.chrome_executable),
            element_timeout_secs: std::env::var("ELEMENT_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.element_timeout_secs),
            settle_delay_ms: std::env::var("SETTLE_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.settle_delay_ms),
            save_fallback_snapshot: std::env::var("SAVE_FALLBACK_SNAPSHOT").ok().and_then(|v| v.parse().ok()).unwrap_or(self.save_fallback_snapshot),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_workers == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_workers".to_string(),
                value: self.max_workers.to_string(),
            });
        }
        if self.element_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "element_timeout_secs".to_string(),
                value: self.element_timeout_secs.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_workers = 5\nheadless = false").unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        assert_eq!(config.max_workers, 5);
        assert!(!config.headless);
        assert_eq!(config.archive_url, Config::default().archive_url);
        assert_eq!(config.element_timeout_secs, 10);
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_workers = \"three\"").unwrap();

        let err = Config::from_toml_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = Config {
            max_workers: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "max_workers"
        ));
    }
}
