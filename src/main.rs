use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, warn};

use samurai_sudoku_downloader::cli::{self, Cli};
use samurai_sudoku_downloader::interactive::{self, PromptDefaults};
use samurai_sudoku_downloader::settings::{self, Settings, SettingsStore};
use samurai_sudoku_downloader::{logger, App, CancelFlag, Config, RunRequest};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    // 加载配置：文件 → 环境变量 → 命令行
    let mut config = Config::load(args.config.as_deref())?;
    args.apply_to(&mut config);

    // 初始化日志
    logger::init(config.verbose_logging);

    let store = SettingsStore::default_location();
    let mut user_settings = match &store {
        Some(store) => store.load().await,
        None => Settings::default(),
    };

    let request = resolve_request(&args, &user_settings)?;

    let cancel = CancelFlag::new();
    spawn_interrupt_watcher(cancel.clone());

    let (tx, rx) = mpsc::unbounded_channel();
    let reporter = tokio::spawn(cli::report_progress(rx));

    // 初始化并运行应用
    let app = App::initialize(config)?;
    let outcome = app.run(&request, Some(tx), &cancel).await;
    let _ = reporter.await;

    user_settings.output_directory = Some(request.output_dir.display().to_string());
    if let Some(store) = &store {
        if let Err(e) = store.save(&user_settings).await {
            warn!("⚠️ 保存设置失败: {}", e);
        }
    }

    let summary = match outcome {
        Ok(summary) => summary,
        Err(e) => {
            error!("❌ {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    Ok(if summary.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn resolve_request(args: &Cli, user_settings: &Settings) -> Result<RunRequest> {
    let output_dir = args.output.clone().unwrap_or_else(|| {
        user_settings
            .output_directory
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(settings::default_output_dir)
    });

    if let Some((start, end)) = args.date_range() {
        return Ok(RunRequest {
            start,
            end,
            output_dir,
        });
    }

    let defaults = PromptDefaults {
        today: Local::now().date_naive(),
        output_dir,
    };
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    interactive::prompt_request(&mut input, &mut output, &defaults).context("读取交互输入失败")
}

/// 第一次 Ctrl+C 停止派发新任务，第二次直接退出
fn spawn_interrupt_watcher(cancel: CancelFlag) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("⏹ 收到中断信号，停止派发新任务，等待进行中的下载完成（再按一次 Ctrl+C 立即退出）");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}
