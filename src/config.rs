//! Configuration for a scan
//!
//! Settings are loaded from environment variables with defaults, then the CLI
//! overrides individual fields.
//!
//! # Environment Variables
//!
//! ## Build tools
//! - `ANT_PATH`, `ANT_HOME`: Ant executable and optional `ANT_HOME` - default: "ant"
//! - `GRADLE_PATH`: Gradle executable - default: "gradle"
//! - `MAVEN_PATH`: Maven executable - default: "mvn"
//! - `MAVEN_CLI_OPTS`: Extra Maven arguments - default: "--batch-mode -DskipTests=true"
//! - `MAVEN_REPO_PATH`: Maven local repository - default: "$HOME/.m2/repository"
//! - `SBT_PATH`: SBT executable - default: "sbt"
//! - `GRADLE_STATIC_OVERLAY`: Gradle snippet enabling Groovy static compilation
//! - `COMPILE`: Build projects before analysis (true|false) - default: "true"
//! - `FAIL_NEVER`: Keep going when a build fails (true|false) - default: "false"
//!
//! ## Analyzer
//! - `JAVA_PATH`, `JAVA_OPTS`: JVM used to run SpotBugs - default: "java", "-Xmx1900M"
//! - `SPOTBUGS_HOME`: SpotBugs distribution - default: "/spotbugs/dist"
//! - `SPOTBUGS_PLUGIN_LIST`: Plugin jars - default: "/fsb/lib/findsecbugs-plugin.jar"
//! - `SPOTBUGS_INCLUDE`, `SPOTBUGS_EXCLUDE`: Filter files
//! - `JVMSCAN_WORK_DIR`: Where the jar list and the raw report are written
//! - `JVMSCAN_LOG_LEVEL`: Logging level - default: "info"

use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_ANT_PATH: &str = "ant";
const DEFAULT_GRADLE_PATH: &str = "gradle";
const DEFAULT_MAVEN_PATH: &str = "mvn";
const DEFAULT_MAVEN_CLI_OPTS: &str = "--batch-mode -DskipTests=true";
const DEFAULT_SBT_PATH: &str = "sbt";
const DEFAULT_JAVA_PATH: &str = "java";
const DEFAULT_JAVA_OPTS: &str = "-Xmx1900M";
const DEFAULT_SPOTBUGS_HOME: &str = "/spotbugs/dist";
const DEFAULT_PLUGIN_LIST: &str = "/fsb/lib/findsecbugs-plugin.jar";
const DEFAULT_INCLUDE_FILTER: &str = "/spotbugs/include.xml";
const DEFAULT_EXCLUDE_FILTER: &str = "/spotbugs/exclude.xml";
const DEFAULT_STATIC_OVERLAY: &str = "/spotbugs/build.gradle";
const DEFAULT_LOG_LEVEL: &str = "info";

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub ant_path: String,
    pub ant_home: Option<String>,
    pub compile: bool,
    pub fail_never: bool,
    pub gradle_path: String,
    pub maven_path: String,
    pub maven_cli_opts: String,
    pub maven_repo_path: PathBuf,
    pub sbt_path: String,
    pub static_compilation_overlay: PathBuf,
    pub java_path: String,
    pub java_opts: String,
    pub spotbugs_home: PathBuf,
    pub plugin_list: PathBuf,
    pub include_filter: PathBuf,
    pub exclude_filter: PathBuf,
    pub work_dir: PathBuf,
    pub log_level: String,
}

impl Default for ScanConfig {
    /// Built-in defaults overridden by environment variables
    fn default() -> Self {
        let builtin = Self::builtin();

        Self {
            ant_path: env_or("ANT_PATH", &builtin.ant_path),
            ant_home: env::var("ANT_HOME").ok().filter(|v| !v.is_empty()),
            compile: env_bool("COMPILE").unwrap_or(builtin.compile),
            fail_never: env_bool("FAIL_NEVER").unwrap_or(builtin.fail_never),
            gradle_path: env_or("GRADLE_PATH", &builtin.gradle_path),
            maven_path: env_or("MAVEN_PATH", &builtin.maven_path),
            maven_cli_opts: env_or("MAVEN_CLI_OPTS", &builtin.maven_cli_opts),
            maven_repo_path: env_path("MAVEN_REPO_PATH", builtin.maven_repo_path),
            sbt_path: env_or("SBT_PATH", &builtin.sbt_path),
            static_compilation_overlay: env_path(
                "GRADLE_STATIC_OVERLAY",
                builtin.static_compilation_overlay,
            ),
            java_path: env_or("JAVA_PATH", &builtin.java_path),
            java_opts: env_or("JAVA_OPTS", &builtin.java_opts),
            spotbugs_home: env_path("SPOTBUGS_HOME", builtin.spotbugs_home),
            plugin_list: env_path("SPOTBUGS_PLUGIN_LIST", builtin.plugin_list),
            include_filter: env_path("SPOTBUGS_INCLUDE", builtin.include_filter),
            exclude_filter: env_path("SPOTBUGS_EXCLUDE", builtin.exclude_filter),
            work_dir: env_path("JVMSCAN_WORK_DIR", builtin.work_dir),
            log_level: env_or("JVMSCAN_LOG_LEVEL", &builtin.log_level).to_lowercase(),
        }
    }
}

impl ScanConfig {
    /// Defaults without consulting the environment
    pub fn builtin() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));

        Self {
            ant_path: DEFAULT_ANT_PATH.to_string(),
            ant_home: None,
            compile: true,
            fail_never: false,
            gradle_path: DEFAULT_GRADLE_PATH.to_string(),
            maven_path: DEFAULT_MAVEN_PATH.to_string(),
            maven_cli_opts: DEFAULT_MAVEN_CLI_OPTS.to_string(),
            maven_repo_path: home.join(".m2").join("repository"),
            sbt_path: DEFAULT_SBT_PATH.to_string(),
            static_compilation_overlay: PathBuf::from(DEFAULT_STATIC_OVERLAY),
            java_path: DEFAULT_JAVA_PATH.to_string(),
            java_opts: DEFAULT_JAVA_OPTS.to_string(),
            spotbugs_home: PathBuf::from(DEFAULT_SPOTBUGS_HOME),
            plugin_list: PathBuf::from(DEFAULT_PLUGIN_LIST),
            include_filter: PathBuf::from(DEFAULT_INCLUDE_FILTER),
            exclude_filter: PathBuf::from(DEFAULT_EXCLUDE_FILTER),
            work_dir: env::temp_dir().join("jvmscan"),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// Checks that tool paths are set and the log level is known
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tools = [
            ("ant_path", &self.ant_path),
            ("gradle_path", &self.gradle_path),
            ("maven_path", &self.maven_path),
            ("sbt_path", &self.sbt_path),
            ("java_path", &self.java_path),
        ];

        for (field, value) in tools {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: {}",
                self.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Path of the file listing auxiliary classpath jars
    pub fn jars_list_path(&self) -> PathBuf {
        self.work_dir.join("jars.list")
    }

    /// Path the analyzer writes its XML report to
    pub fn report_path(&self) -> PathBuf {
        self.work_dir.join("SpotBugs.xml")
    }
}

/// Parses the boolean spellings accepted in environment variables
pub fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::ParseError {
            field: field.to_string(),
            error: format!("'{}' is not a boolean", other),
        }),
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_path(key: &str, default: PathBuf) -> PathBuf {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or(default)
}

fn env_bool(key: &str) -> Option<bool> {
    let value = env::var(key).ok()?;
    match parse_bool(key, &value) {
        Ok(b) => Some(b),
        Err(e) => {
            tracing::warn!("{}, using default", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = [
            EnvGuard::unset("ANT_PATH"),
            EnvGuard::unset("ANT_HOME"),
            EnvGuard::unset("COMPILE"),
            EnvGuard::unset("FAIL_NEVER"),
            EnvGuard::unset("MAVEN_PATH"),
            EnvGuard::unset("MAVEN_CLI_OPTS"),
            EnvGuard::unset("MAVEN_REPO_PATH"),
            EnvGuard::unset("JAVA_OPTS"),
            EnvGuard::unset("JVMSCAN_LOG_LEVEL"),
        ];

        let config = ScanConfig::default();

        assert_eq!(config.ant_path, DEFAULT_ANT_PATH);
        assert_eq!(config.ant_home, None);
        assert!(config.compile);
        assert!(!config.fail_never);
        assert_eq!(config.maven_path, DEFAULT_MAVEN_PATH);
        assert_eq!(config.maven_cli_opts, DEFAULT_MAVEN_CLI_OPTS);
        assert!(config.maven_repo_path.ends_with(".m2/repository"));
        assert_eq!(config.java_opts, DEFAULT_JAVA_OPTS);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = [
            EnvGuard::set("ANT_HOME", "/opt/ant"),
            EnvGuard::set("COMPILE", "false"),
            EnvGuard::set("FAIL_NEVER", "1"),
            EnvGuard::set("MAVEN_PATH", "/usr/bin/mvn"),
            EnvGuard::set("MAVEN_REPO_PATH", ".m2"),
            EnvGuard::set("JVMSCAN_LOG_LEVEL", "DEBUG"),
            EnvGuard::set("JVMSCAN_WORK_DIR", "/tmp/work"),
        ];

        let config = ScanConfig::default();

        assert_eq!(config.ant_home.as_deref(), Some("/opt/ant"));
        assert!(!config.compile);
        assert!(config.fail_never);
        assert_eq!(config.maven_path, "/usr/bin/mvn");
        assert_eq!(config.maven_repo_path, PathBuf::from(".m2"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.jars_list_path(), PathBuf::from("/tmp/work/jars.list"));
        assert_eq!(config.report_path(), PathBuf::from("/tmp/work/SpotBugs.xml"));
    }

    #[test]
    #[serial]
    fn test_invalid_boolean_falls_back_to_default() {
        let _guard = EnvGuard::set("FAIL_NEVER", "sometimes");
        assert!(!ScanConfig::default().fail_never);
    }

    #[test]
    #[serial]
    fn test_builtin_ignores_environment() {
        let _guard = EnvGuard::set("MAVEN_PATH", "/usr/local/bin/mvn");

        assert_eq!(ScanConfig::builtin().maven_path, DEFAULT_MAVEN_PATH);
        assert_eq!(ScanConfig::default().maven_path, "/usr/local/bin/mvn");
    }

    #[test]
    #[serial]
    fn test_empty_environment_value_uses_default() {
        let _guard = EnvGuard::set("SBT_PATH", "");
        assert_eq!(ScanConfig::default().sbt_path, DEFAULT_SBT_PATH);
    }

    #[test]
    fn test_validation_rejects_empty_tool() {
        let config = ScanConfig {
            maven_path: "  ".to_string(),
            ..ScanConfig::builtin()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(msg)) if msg.contains("maven_path")
        ));
    }

    #[test]
    fn test_validation_rejects_log_level() {
        let config = ScanConfig {
            log_level: "verbose".to_string(),
            ..ScanConfig::builtin()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("x", "TRUE").unwrap());
        assert!(!parse_bool("x", "0").unwrap());
        assert!(parse_bool("x", "maybe").is_err());
    }
}
