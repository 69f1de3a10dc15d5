use super::correction::{correct_paths, sort_findings};
use super::PipelineError;
use crate::analyzer::{Analyzer, BugInstance, SpotBugs};
use crate::build_systems::BuilderRegistry;
use crate::config::ScanConfig;
use crate::exec::{CommandRunner, ProcessRunner};
use crate::fs::{FileSystem, RealFileSystem};
use crate::project::{find_projects, Project};
use anyhow::anyhow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Runs a whole scan. Projects are handled one at a time, in discovery
/// order.
pub struct Pipeline {
    config: Arc<ScanConfig>,
    registry: Arc<BuilderRegistry>,
    fs: Arc<dyn FileSystem>,
    runner: Arc<dyn CommandRunner>,
    analyzer: Arc<dyn Analyzer>,
}

impl Pipeline {
    pub fn new(
        config: Arc<ScanConfig>,
        registry: Arc<BuilderRegistry>,
        fs: Arc<dyn FileSystem>,
        runner: Arc<dyn CommandRunner>,
        analyzer: Arc<dyn Analyzer>,
    ) -> Self {
        Self {
            config,
            registry,
            fs,
            runner,
            analyzer,
        }
    }

    /// Real file system, real processes and SpotBugs
    pub fn with_defaults(config: ScanConfig) -> Self {
        let config = Arc::new(config);
        let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner::new());
        let analyzer = Arc::new(SpotBugs::new(config.clone(), runner.clone()));

        Self::new(
            config,
            Arc::new(BuilderRegistry::with_defaults()),
            Arc::new(RealFileSystem::new()),
            runner,
            analyzer,
        )
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Resolves `repository` to the absolute form findings are made
    /// relative to
    pub fn canonical_repository(&self, repository: &Path) -> Result<PathBuf, PipelineError> {
        let canonical =
            self.fs
                .canonicalize(repository)
                .map_err(|error| PipelineError::Repository {
                    path: repository.to_path_buf(),
                    error,
                })?;

        if !self.fs.is_dir(&canonical) {
            return Err(PipelineError::Repository {
                path: repository.to_path_buf(),
                error: anyhow!("not a directory"),
            });
        }
        Ok(canonical)
    }

    pub fn discover(&self, repository: &Path) -> Result<Vec<Project>, PipelineError> {
        let projects = find_projects(repository, self.fs.as_ref(), &self.registry)?;
        info!("Found {} analyzable projects", projects.len());
        Ok(projects)
    }

    /// Builds every project in order. Without `fail_never` the first
    /// failure stops the run.
    pub fn compile(&self, projects: &[Project]) -> Result<(), PipelineError> {
        for project in projects {
            if let Err(e) = project.build(&self.config, self.runner.as_ref()) {
                if !self.config.fail_never {
                    return Err(e.into());
                }
                warn!(
                    project = %project.root().display(),
                    error = %e,
                    "Building failed for {}. Attempting scan anyway",
                    project.root().display()
                );
            }
        }
        Ok(())
    }

    /// Discover, build (when enabled), analyze and return sorted findings
    /// with repository-relative paths.
    pub fn run(&self, repository: &Path) -> Result<Vec<BugInstance>, PipelineError> {
        let start = Instant::now();
        let repository = self.canonical_repository(repository)?;
        info!("Starting scan of {}", repository.display());

        let projects = self.discover(&repository)?;

        if self.config.compile {
            self.compile(&projects)?;
        } else {
            info!("Compilation disabled, analyzing existing class files");
        }

        let mut findings = Vec::new();
        for project in &projects {
            let bugs = self.analyzer.analyze(project)?;
            findings.extend(correct_paths(&repository, project, bugs)?);
        }

        sort_findings(&mut findings);

        info!(
            findings = findings.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Scan complete"
        );
        Ok(findings)
    }
}
