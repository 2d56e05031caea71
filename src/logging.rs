use std::path::Path;

use chrono::{DateTime, Local};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::{Directive, ParseError},
    fmt,
    prelude::*,
    EnvFilter, Registry,
};

use crate::error::RateWindowError;

pub const DEFAULT_LOG_DIR: &str = "logs";
const CONSOLE_DIRECTIVE: &str = "info";
const FILE_DIRECTIVE: &str = "ratewindow=debug";

/// One file per run, named after the time the run started.
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("ratewindow_{}.log", started.format("%Y-%m-%d_%H-%M-%S"))
}

/// `RUST_LOG` plus `directive` on top.
fn layer_filter(directive: &str) -> Result<EnvFilter, RateWindowError> {
    let parsed = directive.parse::<Directive>().map_err(|e: ParseError| {
        RateWindowError::LoggingError(format!("Invalid log directive '{}': {}", directive, e))
    })?;
    Ok(EnvFilter::from_default_env().add_directive(parsed))
}

/**
Install the global subscriber.

INFO and above goes to stderr. DEBUG and above from this crate goes to a per-run file, with
thread ids so rayon workers can be told apart.

## Arguments
* `log_dir` - Directory for the log file, `logs` when `None`. Created if missing.

## Returns
The guard that flushes the file writer. Hold it until the program exits.
 */
pub fn setup_tracing(log_dir: Option<&str>) -> Result<WorkerGuard, RateWindowError> {
    let log_dir = Path::new(log_dir.unwrap_or(DEFAULT_LOG_DIR));
    std::fs::create_dir_all(log_dir)?;

    let log_file = log_file_name(Local::now());
    let appender = tracing_appender::rolling::never(log_dir, &log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(layer_filter(CONSOLE_DIRECTIVE)?);
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_filter(layer_filter(FILE_DIRECTIVE)?);

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| RateWindowError::LoggingError(e.to_string()))?;

    info!("Logging to {}", log_dir.join(&log_file).display());
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_file_name() {
        let started = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(log_file_name(started), "ratewindow_2024-03-09_14-05-07.log");
    }

    #[test]
    fn test_layer_filter() {
        assert!(layer_filter(FILE_DIRECTIVE).is_ok());
        assert!(layer_filter(CONSOLE_DIRECTIVE).is_ok());
        let result = layer_filter("ratewindow=loud");
        assert!(matches!(result, Err(RateWindowError::LoggingError(_))));
    }
}
