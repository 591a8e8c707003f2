use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
///
/// 只包含会让整次运行终止的错误；单个题目的下载失败见 [`ExtractionError`]，
/// 它被记录在运行摘要里，不会冒泡到这里。
#[derive(Debug, Error)]
pub enum AppError {
    /// 日期范围错误
    #[error("日期范围错误: {0}")]
    InvalidRange(#[from] InvalidRangeError),
    /// 题目目录获取失败
    #[error("题目目录获取失败: {0}")]
    CatalogFetch(#[from] CatalogFetchError),
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 起始日期晚于结束日期
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("起始日期 {start} 晚于结束日期 {end}")]
pub struct InvalidRangeError {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// 题目目录（归档下拉框）获取失败
#[derive(Debug, Error)]
pub enum CatalogFetchError {
    /// 浏览器无法打开归档页
    #[error(transparent)]
    Browser(#[from] BrowserError),
    /// 页面上找不到归档下拉框，网站结构可能已改变
    #[error("在 {url} 找不到归档下拉框 (select#ai)，网站结构可能已改变")]
    LayoutChanged { url: String },
    /// 下拉框里没有任何可用的题目
    #[error("归档页 {url} 中没有找到任何题目")]
    Empty { url: String },
    /// HTML 解析失败
    #[error("归档页解析失败: {0}")]
    Parse(String),
}

/// 单个题目的提取失败
///
/// 只影响当前任务，由编排层记录为 `Failed(reason)`。
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 浏览器交互失败（超时、脚本执行失败等）
    #[error(transparent)]
    Browser(#[from] BrowserError),
    /// 下拉框里不存在该题目
    #[error("归档中不存在题目 {identifier}")]
    PuzzleNotInArchive { identifier: String },
    /// 找不到打印按钮
    #[error("找不到打印按钮")]
    PrintButtonNotFound,
    /// 点击打印后没有弹出新窗口
    #[error("等待打印窗口超时 ({secs}秒)")]
    PrintWindowMissing { secs: u64 },
    /// 写入 PDF 失败
    #[error("写入文件失败 ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 浏览器配置失败
    #[error("浏览器配置失败: {0}")]
    ConfigurationFailed(String),
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed {
        #[source]
        source: BoxError,
    },
    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed {
        #[source]
        source: BoxError,
    },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: BoxError,
    },
    /// 执行脚本或 CDP 命令失败
    #[error("执行脚本失败: {source}")]
    ScriptExecutionFailed {
        #[source]
        source: BoxError,
    },
    /// 等待页面元素超时
    #[error("等待 {what} 超时 ({secs}秒)")]
    Timeout { what: String, secs: u64 },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({}): {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件格式错误
    #[error("配置文件解析失败 ({}): {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// 配置项取值非法
    #[error("配置项 {key} 的值 '{value}' 非法")]
    InvalidValue { key: String, value: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 创建目录失败
    #[error("创建目录失败 ({}): {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({}): {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        }
    }
}

impl From<serde_json::Error> for BrowserError {
    fn from(err: serde_json::Error) -> Self {
        BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        }
    }
}

// ========== 便捷构造函数 ==========

impl BrowserError {
    /// 创建导航失败错误
    pub fn navigation_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        BrowserError::NavigationFailed {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// 创建等待超时错误
    pub fn timeout(what: impl Into<String>, secs: u64) -> Self {
        BrowserError::Timeout {
            what: what.into(),
            secs,
        }
    }
}

impl ExtractionError {
    /// 创建文件写入错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractionError::Io {
            path: path.into(),
            source,
        }
    }
}

impl FileError {
    /// 创建文件写入错误
    pub fn write_failed(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        FileError::Write {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
