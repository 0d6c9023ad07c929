use std::path::Path;

use thiserror::Error;
use tracing::{
    Level, info,
    subscriber::{SetGlobalDefaultError, set_global_default},
};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt};

const LOG_FILE_PREFIX: &str = "hdr-fusion";

/// Flushes the log writers when dropped, hold until exit.
pub struct LoggerGuards {
    _stdout: WorkerGuard,
    _file: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// Logs INFO to stdout, or TRACE with `debug`. When `log_directory` is set a
/// daily rolling log file is written there too.
pub fn setup_logger(debug: bool, log_directory: Option<&Path>) -> Result<LoggerGuards, Error> {
    let level = if debug { Level::TRACE } else { Level::INFO };
    let filter = tracing_subscriber::filter::Targets::new()
        .with_default(level)
        .with_target("png", Level::WARN)
        .with_target("jpeg_encoder", Level::WARN);

    // stdout logger
    let (std_writer, std_guard) = tracing_appender::non_blocking(std::io::stdout());
    let std_logger = tracing_subscriber::fmt::layer()
        .with_writer(std_writer)
        .with_target(false)
        .with_span_events(if debug { FmtSpan::CLOSE } else { FmtSpan::NONE });

    // file logger
    let (file_logger, file_guard) = match log_directory {
        Some(directory) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix("log")
                .build(directory)?;
            let (file_writer, file_guard) = tracing_appender::non_blocking(appender);
            let file_logger = tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE);

            (Some(file_logger), Some(file_guard))
        }
        None => (None, None),
    };

    // Register loggers
    let collector = tracing_subscriber::registry()
        .with(std_logger)
        .with(file_logger)
        .with(filter);

    set_global_default(collector)?;

    info!("HDR Fusion v{}", env!("CARGO_PKG_VERSION"));
    Ok(LoggerGuards {
        _stdout: std_guard,
        _file: file_guard,
    })
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to create log file:\n{0}")]
    LogFile(#[from] InitError),

    #[error("Failed to set global logger:\n{0}")]
    SetGlobalDefault(#[from] SetGlobalDefaultError),
}
