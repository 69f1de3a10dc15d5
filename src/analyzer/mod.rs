//! Static analysis of compiled projects
//!
//! The [`Analyzer`] trait is the seam between the pipeline and the external
//! engine. [`SpotBugs`] drives the real tool; tests substitute their own.

pub mod classpath;
pub mod report;
pub mod spotbugs;

pub use report::{parse_report, BugInstance, SourceLine};
pub use spotbugs::SpotBugs;

use crate::exec::RunError;
use crate::project::Project;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("SpotBugs analysis failed for {} (exit status {}):\n{output}", .project.display(), describe_status(.exit_status))]
    Exit {
        project: PathBuf,
        exit_status: Option<i32>,
        output: String,
    },

    #[error(transparent)]
    Spawn(#[from] RunError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk directory: {0}")]
    Walk(String),

    #[error("Unable to parse XML report: {0}")]
    Report(String),
}

impl AnalyzerError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        AnalyzerError::Io {
            context: context.into(),
            source,
        }
    }
}

fn describe_status(status: &Option<i32>) -> String {
    status.map_or_else(|| "unknown".to_string(), |code| code.to_string())
}

/// Runs static analysis on one built project
pub trait Analyzer: Send + Sync {
    /// Findings with paths as the engine reports them (package-relative)
    fn analyze(&self, project: &Project) -> Result<Vec<BugInstance>, AnalyzerError>;
}
