//! Logging configuration and initialization for ttybbs.
//!
//! Events go to stdout and, when `logging.file` is set, are appended to that
//! file as well. A blank `file` keeps logging on the console only.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Parse log level string to tracing Level.
fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(parse_level(level).into())
}

/// Configured log file, or `None` for console-only logging.
fn log_file_path(config: &LoggingConfig) -> Option<&Path> {
    match config.file.trim() {
        "" => None,
        path => Some(Path::new(path)),
    }
}

/// Open the log file for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Initialize logging from the configuration.
///
/// `RUST_LOG` directives are honored on top of the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let Some(path) = log_file_path(config) else {
        init_console_only(&config.level);
        return Ok(());
    };

    let log_file = Arc::new(open_log_file(path)?);
    let writer = std::io::stdout.and(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(env_filter(&config.level))
        .init();

    Ok(())
}

/// Initialize console-only logging.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(true)
                .with_target(true),
        )
        .with(env_filter(level))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn logging_config(file: &str) -> LoggingConfig {
        LoggingConfig {
            file: file.to_string(),
            ..LoggingConfig::default()
        }
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("info"), Level::INFO);
        assert_eq!(parse_level("warning"), Level::WARN);
        assert_eq!(parse_level(" Error "), Level::ERROR);
    }

    #[test]
    fn test_parse_level_default() {
        assert_eq!(parse_level("verbose"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }

    #[test]
    fn test_blank_file_means_console_only() {
        assert_eq!(log_file_path(&logging_config("")), None);
        assert_eq!(log_file_path(&logging_config("   ")), None);
        assert_eq!(
            log_file_path(&logging_config(" logs/bbs.log ")),
            Some(Path::new("logs/bbs.log"))
        );
    }

    #[test]
    fn test_open_log_file_creates_dirs_and_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("logs").join("ttybbs.log");

        writeln!(open_log_file(&path).unwrap(), "first start").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second start").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first start\nsecond start\n");
    }
}
