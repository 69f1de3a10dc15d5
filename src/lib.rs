//! jvmscan - security scanning for JVM repositories
//!
//! This library finds the JVM projects in a repository, compiles each with the
//! build tool it declares, runs SpotBugs with the Find Security Bugs plugin
//! over the compiled classes and turns the findings into a security report
//! whose paths are relative to the repository.
//!
//! # Core Concepts
//!
//! - **Project**: A directory holding a build signature file (`pom.xml`,
//!   `build.gradle`, `build.sbt`, ...) together with an index of the Java,
//!   Scala and Groovy sources below it
//! - **Builder**: One supported build system. The [`BuilderRegistry`] orders
//!   them by priority so `gradlew` beats `build.gradle` in the same directory
//! - **Partial path**: The package-relative path SpotBugs reports
//!   (`com/acme/Repo.java`), resolved back to a file inside the project
//!
//! # Example Usage
//!
//! ```no_run
//! use jvmscan::{output, Pipeline, ScanConfig};
//! use std::path::Path;
//!
//! fn scan(repo: &Path) -> anyhow::Result<String> {
//!     let pipeline = Pipeline::with_defaults(ScanConfig::default());
//!     let findings = pipeline.run(repo)?;
//!     output::to_report(&findings, "").to_json()
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`project`]: Discovery and per-project source indexes
//! - [`build_systems`]: Build tool commands and build procedures
//! - [`analyzer`]: SpotBugs invocation and XML report parsing
//! - [`output`]: Report schema and conversion
//! - [`pipeline`]: The end-to-end scan

pub mod analyzer;
pub mod build_systems;
pub mod cli;
pub mod config;
pub mod directory;
pub mod exec;
pub mod fs;
pub mod output;
pub mod pipeline;
pub mod project;
pub mod util;

pub use analyzer::{Analyzer, AnalyzerError, BugInstance, SourceLine, SpotBugs};
pub use build_systems::{BuildError, Builder, BuilderRegistry};
pub use config::{ConfigError, ScanConfig};
pub use directory::{DirectoryError, DirectoryTree, NodeId};
pub use exec::{CommandOutput, CommandRunner, CommandSpec, ProcessRunner, RunError};
pub use output::Report;
pub use pipeline::{Pipeline, PipelineError};
pub use project::{find_projects, Project, ProjectError};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
