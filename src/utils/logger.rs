use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 初始化 CLI 日誌，輸出到 stderr 以保留 stdout 給處理結果
///
/// `RUST_LOG` 優先，其次是設定檔指定的等級。
pub fn init_cli_logger(verbose: bool, level: Option<&str>, json: bool) {
    let default_directive = match (verbose, level) {
        (true, _) => "bill_splitter=debug,info".to_string(),
        (false, Some(level)) => level_directive(level),
        (false, None) => "bill_splitter=info".to_string(),
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&default_directive))
        .unwrap_or_else(|_| EnvFilter::new("bill_splitter=info"));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .init();
    }
}

/// 設定檔中的 `[logging] level` 對應的過濾指令
pub fn level_directive(level: &str) -> String {
    format!("bill_splitter={}", level)
}
