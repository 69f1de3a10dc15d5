//! Scan pipeline: discover, build, analyze, then map findings to
//! repository paths.

pub mod correction;
pub mod orchestrator;

pub use correction::{correct_paths, sort_findings};
pub use orchestrator::Pipeline;

use crate::analyzer::AnalyzerError;
use crate::build_systems::BuildError;
use crate::project::ProjectError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Repository {} is not accessible: {error:#}", .path.display())]
    Repository { path: PathBuf, error: anyhow::Error },

    #[error(transparent)]
    Discovery(#[from] ProjectError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    #[error("{} is not inside repository {}", .path.display(), .repository.display())]
    PathJoin { path: PathBuf, repository: PathBuf },
}
