//! Utility modules for jvmscan

pub mod logging;

pub use logging::{init_from_env, init_logging, LogFormat, LoggingConfig};
