use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则默认 info（verbose 时为 debug）。
/// chromiumoxide 的日志很多，默认只保留 warn 以上。
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "debug,chromiumoxide=warn"
    } else {
        "info,chromiumoxide=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // 重复初始化（例如测试中）时忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}
