//! SpotBugs with the Find Security Bugs plugin

use super::classpath::{target_dirs, write_jars_list};
use super::report::{parse_report, BugInstance};
use super::{Analyzer, AnalyzerError};
use crate::config::ScanConfig;
use crate::exec::{CommandRunner, CommandSpec};
use crate::project::Project;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Printed by SpotBugs when the project has no compiled classes, usually
/// because the build failed
pub const NO_CLASSES_MARKER: &str = "No classfiles specified; output will have no warnings";

pub struct SpotBugs {
    config: Arc<ScanConfig>,
    runner: Arc<dyn CommandRunner>,
}

impl SpotBugs {
    pub fn new(config: Arc<ScanConfig>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// Command line for analyzing `project`
    pub fn command(&self, project: &Project, jars_list: &Path, targets: &[PathBuf]) -> CommandSpec {
        let config = &self.config;
        let lib = config.spotbugs_home.join("lib");

        let mut spec = CommandSpec::new(&config.java_path, project.root())
            .arg("-cp")
            .arg(lib.join("*").to_string_lossy())
            .args(config.java_opts.split_whitespace())
            .arg("-jar")
            .arg(lib.join("spotbugs.jar").to_string_lossy())
            .arg("-pluginList")
            .arg(config.plugin_list.to_string_lossy())
            .arg("-exclude")
            .arg(config.exclude_filter.to_string_lossy())
            .arg("-include")
            .arg(config.include_filter.to_string_lossy());

        // Restrict analysis to the project's own code, not its dependencies
        let packages: Vec<String> = project.packages().map(|p| format!("{}.*", p)).collect();
        if !packages.is_empty() {
            spec = spec.arg("-onlyAnalyze").arg(packages.join(","));
        }

        spec.args(["-quiet", "-effort:max", "-low", "-noClassOk", "-xml:withMessages"])
            .arg("-auxclasspathFromFile")
            .arg(jars_list.to_string_lossy())
            .arg("-output")
            .arg(config.report_path().to_string_lossy())
            .arg(project.root().to_string_lossy())
            .args(targets.iter().map(|t| t.to_string_lossy().into_owned()))
    }

    fn clear_previous_report(&self) -> Result<(), AnalyzerError> {
        let report = self.config.report_path();
        match fs::remove_file(&report) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(AnalyzerError::io(
                format!("Failed to remove stale report {}", report.display()),
                e,
            )),
            _ => Ok(()),
        }
    }
}

impl Analyzer for SpotBugs {
    fn analyze(&self, project: &Project) -> Result<Vec<BugInstance>, AnalyzerError> {
        let jars_list = write_jars_list(&self.config, project)?;
        let targets = target_dirs(project.root())?;
        let spec = self.command(project, &jars_list, &targets);

        self.clear_previous_report()?;

        let output = self.runner.run(&spec)?;
        if !output.success() {
            error!(project = %project.root().display(), "SpotBugs analysis failed");
            return Err(AnalyzerError::Exit {
                project: project.root().to_path_buf(),
                exit_status: output.exit_status,
                output: output.output,
            });
        }
        debug!(command = %spec, "{}", output.output);

        if output.output.contains(NO_CLASSES_MARKER) {
            warn!(project = %project.root().display(), "SpotBugs didn't find any class file to analyze");
        } else {
            info!(project = %project.root().display(), "SpotBugs analysis succeeded");
        }

        let report = self.config.report_path();
        let xml = fs::read_to_string(&report).map_err(|e| {
            AnalyzerError::io(format!("Unable to open XML report {}", report.display()), e)
        })?;

        parse_report(&xml)
    }
}
