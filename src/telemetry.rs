use tracing_subscriber::EnvFilter;

/// 初始化日志输出
///
/// 日志写到 stderr，级别默认 `info`，可通过 `RUST_LOG` 覆盖。
/// 重复调用不会报错（测试和嵌入场景中可能已经安装了 subscriber）
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
