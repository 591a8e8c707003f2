//! 命令行参数与进度展示

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::config::Config;
use crate::orchestrator::ProgressEvent;
use crate::utils::logging::format_progress;

/// 从 samurai-sudoku.com 下载指定日期范围的题目 PDF
#[derive(Parser, Debug)]
#[command(
    name = "samurai-sudoku",
    version,
    after_help = "示例:\n  \
        samurai-sudoku --start 2024-01-01 --end 2024-01-31 --output ./puzzles\n  \
        samurai-sudoku -s 2024-10-01 -e 2024-10-07 -o ./october --visible\n\n\
        不带 --start/--end 时进入交互模式。"
)]
pub struct Cli {
    /// 开始日期 (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date, requires = "end")]
    pub start: Option<NaiveDate>,

    /// 结束日期 (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date, requires = "start")]
    pub end: Option<NaiveDate>,

    /// 输出目录
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 并行下载数
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// 显示浏览器窗口
    #[arg(long)]
    pub visible: bool,

    /// TOML 配置文件
    #[arg(short, long, env = "SUDOKU_CONFIG")]
    pub config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 两个日期都给出时返回 Some，否则走交互模式
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start.zip(self.end)
    }

    /// 命令行参数覆盖配置文件和环境变量
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(workers) = self.workers {
            config.max_workers = workers;
        }
        if self.visible {
            config.headless = false;
        }
        if self.verbose {
            config.verbose_logging = true;
        }
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("无效日期 '{value}'，请使用 YYYY-MM-DD 格式"))
}

/// 消费进度事件并打印，发送端全部关闭后返回
pub async fn report_progress(mut events: UnboundedReceiver<ProgressEvent>) {
    while let Some(event) = events.recv().await {
        match format_progress(&event) {
            Some(line) => info!("{}", line),
            None => {
                if let ProgressEvent::Started { index, total, label } = &event {
                    debug!("▶ [任务 {}/{}] {}", index, total, label);
                }
            }
        }
    }
}
