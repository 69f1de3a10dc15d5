//! Structured logging setup for jvmscan
//!
//! Logs always go to stderr so a report written to stdout stays parseable.
//! `RUST_LOG` takes precedence over the configured level when set.
//!
//! ```no_run
//! use jvmscan::util::logging;
//!
//! // JVMSCAN_LOG_LEVEL=debug JVMSCAN_LOG_FORMAT=json
//! logging::init_from_env();
//!
//! tracing::info!(project = "/repo/app", "Building project");
//! ```

use std::env;
use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for the jvmscan target
    pub level: Level,

    pub format: LogFormat,

    /// Include the module target (e.g. jvmscan::build_systems) in logs
    pub include_target: bool,

    /// Include file and line number
    pub include_location: bool,

    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            include_target: false,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Pretty,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }

    /// Filter directive for this crate's events
    pub fn directive(&self) -> String {
        format!("jvmscan={}", self.level.as_str().to_lowercase())
    }
}

/// Parses a log level (case-insensitive), falling back to INFO
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// `json` selects JSON output; anything else is pretty console output
pub fn parse_format(format_str: &str) -> LogFormat {
    if format_str.trim().eq_ignore_ascii_case("json") {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    }
}

fn build_filter(config: &LoggingConfig) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }
    EnvFilter::new(format!("warn,{}", config.directive()))
}

/// Installs the global subscriber. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(&config);

        match config.format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(
                        fmt::layer()
                            .json()
                            .with_writer(io::stderr)
                            .with_target(config.include_target)
                            .with_file(config.include_location)
                            .with_line_number(config.include_location)
                            .with_thread_ids(config.include_thread_ids)
                            .with_thread_names(config.include_thread_ids),
                    )
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(
                        fmt::layer()
                            .with_writer(io::stderr)
                            .with_target(config.include_target)
                            .with_file(config.include_location)
                            .with_line_number(config.include_location)
                            .with_thread_ids(config.include_thread_ids)
                            .with_thread_names(config.include_thread_ids),
                    )
                    .init();
            }
        }
    });
}

/// Reads `JVMSCAN_LOG_LEVEL` (default `info`) and `JVMSCAN_LOG_FORMAT`
/// (`json` or `pretty`).
pub fn init_from_env() {
    init_logging(config_from_env());
}

fn config_from_env() -> LoggingConfig {
    let level = env::var("JVMSCAN_LOG_LEVEL")
        .map(|l| parse_level(&l))
        .unwrap_or(Level::INFO);
    let format = env::var("JVMSCAN_LOG_FORMAT")
        .map(|f| parse_format(&f))
        .unwrap_or(LogFormat::Pretty);

    LoggingConfig {
        level,
        format,
        ..Default::default()
    }
}

/// Initializes logging at the given level, keeping the format from the
/// environment
pub fn with_level(level_str: &str) {
    init_logging(LoggingConfig {
        level: parse_level(level_str),
        ..config_from_env()
    });
}
