//! Logging Infrastructure
//!
//! Console logging by default, daily rolling files when a log directory
//! is configured.

use std::path::Path;

/// Initialize the logger with optional file output
///
/// `log_level` falls back to `info` when missing or unparsable. A
/// missing `log_dir` keeps output on stderr.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = parse_level(log_level);

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .with_writer(std::io::stderr);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "inlove-desk");
            subscriber.with_ansi(false).with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}

fn parse_level(log_level: Option<&str>) -> tracing::Level {
    log_level
        .and_then(|l| l.trim().parse().ok())
        .unwrap_or(tracing::Level::INFO)
}
