use crate::progress::SharedBar;
use std::env;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "./logs/drive-duper.log";

/// Console gets one compact line per decision, written around the sweep
/// spinner. The file keeps timestamps and targets for later audit.
pub fn init_logger(bar: SharedBar) -> WorkerGuard {
    let filter = env::var("TRACING_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_file_path = env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

    let file_appender = tracing_appender::rolling::never("./", &log_file_path);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console = fmt::layer()
        .compact()
        .with_target(false)
        .without_time()
        .with_writer(bar);

    let audit = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(console)
        .with(audit)
        .with(EnvFilter::new(filter))
        .init();

    debug!("Logging to stdout and {}", log_file_path);

    guard
}
