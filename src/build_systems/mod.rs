//! Build system definitions
//!
//! Each supported build tool is a [`Builder`] variant identified by a single
//! signature file. Detection and priority live in [`BuilderRegistry`]; the
//! per-tool command lines live in the family modules.

pub mod ant;
pub mod gradle;
pub mod maven;
pub mod procedures;
pub mod registry;

pub use registry::BuilderRegistry;

use crate::config::ScanConfig;
use crate::exec::{CommandOutput, CommandRunner, CommandSpec, RunError};
use crate::project::Project;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{builder} build failed for {} (exit status {}):\n{output}", .project.display(), describe_status(.exit_status))]
    Failed {
        builder: &'static str,
        project: PathBuf,
        exit_status: Option<i32>,
        output: String,
    },

    #[error("{builder} build failed for {}: {message}\n{output}", .project.display())]
    TextDetected {
        builder: &'static str,
        project: PathBuf,
        message: String,
        output: String,
    },

    #[error(transparent)]
    Run(#[from] RunError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        BuildError::Io {
            context: context.into(),
            source,
        }
    }
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "unknown".to_string(),
    }
}

/// How a builder is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildFamily {
    /// Tries a static-compilation build first when Groovy sources exist
    Gradle,
    /// Single attempt
    Generic,
}

/// Supported build tools, declared in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Builder {
    Sbt,
    Grailsw,
    Gradlew,
    Gradle,
    Mvnw,
    Maven,
    Ant,
}

impl Builder {
    /// Default registry order; earlier entries win when several signatures
    /// are present in the same directory.
    pub fn all() -> &'static [Builder] {
        &[
            Builder::Sbt,
            Builder::Grailsw,
            Builder::Gradlew,
            Builder::Gradle,
            Builder::Mvnw,
            Builder::Maven,
            Builder::Ant,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builder::Sbt => "SBT",
            Builder::Grailsw => "Grailsw",
            Builder::Gradlew => "Gradlew",
            Builder::Gradle => "Gradle",
            Builder::Mvnw => "Mvnw",
            Builder::Maven => "Maven",
            Builder::Ant => "Ant",
        }
    }

    /// File whose presence identifies this build system
    pub fn signature_file(&self) -> &'static str {
        match self {
            Builder::Sbt => "build.sbt",
            Builder::Grailsw => "grailsw",
            Builder::Gradlew => "gradlew",
            Builder::Gradle => "build.gradle",
            Builder::Mvnw => "mvnw",
            Builder::Maven => "pom.xml",
            Builder::Ant => "build.xml",
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        file_name == self.signature_file()
    }

    pub fn family(&self) -> BuildFamily {
        match self {
            Builder::Sbt | Builder::Grailsw | Builder::Gradlew | Builder::Gradle => {
                BuildFamily::Gradle
            }
            Builder::Mvnw | Builder::Maven | Builder::Ant => BuildFamily::Generic,
        }
    }

    /// True for the builders that populate the local Maven repository
    pub fn uses_maven(&self) -> bool {
        matches!(self, Builder::Maven | Builder::Mvnw)
    }

    /// Command line compiling a project rooted at `root`
    pub fn command(&self, config: &ScanConfig, root: &Path) -> CommandSpec {
        match self {
            Builder::Sbt => gradle::sbt_command(config, root),
            Builder::Grailsw => gradle::grailsw_command(root),
            Builder::Gradlew => gradle::gradlew_command(root),
            Builder::Gradle => gradle::gradle_command(config, root),
            Builder::Mvnw => maven::mvnw_command(config, root),
            Builder::Maven => maven::maven_command(config, root),
            Builder::Ant => ant::ant_command(config, root),
        }
    }

    /// Output text meaning the build failed even though the tool exited 0
    fn failure_marker(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Builder::Grailsw => Some(gradle::GRAILS_FAILURE_MARKER),
            _ => None,
        }
    }

    /// Builds `project` with this tool.
    pub fn build(
        &self,
        config: &ScanConfig,
        project: &Project,
        runner: &dyn CommandRunner,
    ) -> Result<(), BuildError> {
        let root = project.root();
        let spec = self.command(config, root);
        let mut action = || self.run(runner, &spec, root);

        match self.family() {
            BuildFamily::Gradle => procedures::build_with_static_fallback(
                *self,
                root,
                project.is_groovy(),
                &config.static_compilation_overlay,
                &mut action,
            ),
            BuildFamily::Generic => procedures::build_generic(*self, root, &mut action),
        }
    }

    fn run(
        &self,
        runner: &dyn CommandRunner,
        spec: &CommandSpec,
        root: &Path,
    ) -> Result<(), BuildError> {
        let CommandOutput {
            exit_status,
            output,
        } = runner.run(spec)?;

        if exit_status != Some(0) {
            return Err(BuildError::Failed {
                builder: self.name(),
                project: root.to_path_buf(),
                exit_status,
                output,
            });
        }

        if let Some((marker, message)) = self.failure_marker() {
            if output.contains(marker) {
                return Err(BuildError::TextDetected {
                    builder: self.name(),
                    project: root.to_path_buf(),
                    message: message.to_string(),
                    output,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
