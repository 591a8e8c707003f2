/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::path::Path;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::{Outcome, RunSummary, SkipReason};
use crate::orchestrator::{ProgressEvent, RunRequest};

/// 记录程序启动信息
pub fn log_startup(config: &Config, request: &RunRequest) {
    info!("{}", "=".repeat(60));
    info!("🚀 Samurai Sudoku 下载器启动");
    info!("📅 日期范围: {} 至 {}", request.start, request.end);
    info!("📁 输出目录: {}", request.output_dir.display());
    info!("📊 并行下载数: {}", config.max_workers);
    info!("{}", "=".repeat(60));
}

/// 记录任务规划信息
///
/// # 参数
/// - `total`: 题目总数
/// - `skipped`: 跳过数量
/// - `dispatching`: 待派发数量
/// - `max_workers`: 最大并发数
pub fn log_plan(total: usize, skipped: usize, dispatching: usize, max_workers: usize) {
    info!("✓ 共 {} 个题目，{} 个已存在或重复", total, skipped);
    if dispatching > 0 {
        info!("📋 使用 {} 个并行任务下载 {} 个题目\n", max_workers, dispatching);
    }
}

/// 把进度事件格式化为一行日志；开始事件返回 None
pub fn format_progress(event: &ProgressEvent) -> Option<String> {
    let ProgressEvent::Finished {
        completed,
        total,
        result,
    } = event
    else {
        return None;
    };

    let detail = match &result.outcome {
        Outcome::Success => String::new(),
        Outcome::Skipped(SkipReason::AlreadyExists) => " - 已存在".to_string(),
        Outcome::Skipped(SkipReason::DuplicateTarget) => " - 目标文件重复".to_string(),
        Outcome::Failed(reason) => format!(" - {}", truncate_text(reason, 120)),
    };
    Some(format!(
        "[{}/{}] {} {}{}",
        completed,
        total,
        result.outcome.marker(),
        result.label(),
        detail
    ))
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &RunSummary, output_dir: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", summary.succeeded, summary.total);
    info!("⚡ 跳过: {}", summary.skipped);
    info!("❌ 失败: {}", summary.failed);
    if !summary.complete {
        warn!("⏹ 已取消，未派发: {}", summary.not_dispatched);
    }
    for (result, reason) in summary.failures() {
        error!("  ✗ {} - {}", result.label(), reason);
    }
    info!("{}", "=".repeat(60));
    info!("\n文件已保存至: {}", output_dir.display());
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
