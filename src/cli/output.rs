use crate::output::Report;
use crate::project::Project;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

/// What `detect` prints for one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub path: String,
    pub builder: String,
    pub source_files: usize,
    pub packages: Vec<String>,
}

impl ProjectSummary {
    /// `path` is relative to `repository`, `.` for the repository itself
    pub fn new(repository: &Path, project: &Project) -> Self {
        let path = match project.root().strip_prefix(repository) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.to_string_lossy().into_owned(),
            Err(_) => project.root().to_string_lossy().into_owned(),
        };

        Self {
            path,
            builder: project.builder().to_string(),
            source_files: project.tree().file_count(),
            packages: project.packages().map(str::to_string).collect(),
        }
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Reports have no human rendering; `Human` falls back to JSON.
    pub fn format_report(&self, report: &Report) -> Result<String> {
        match self.format {
            OutputFormat::Yaml => report.to_yaml(),
            OutputFormat::Json | OutputFormat::Human => report.to_json(),
        }
    }

    pub fn format_projects(&self, projects: &[ProjectSummary]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(projects)
                .context("Failed to serialize projects to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(projects).context("Failed to serialize projects to YAML")
            }
            OutputFormat::Human => Ok(self.format_projects_human(projects)),
        }
    }

    fn format_projects_human(&self, projects: &[ProjectSummary]) -> String {
        if projects.is_empty() {
            return "No analyzable projects found\n".to_string();
        }

        let mut output = format!("Found {} project(s)\n", projects.len());
        output.push_str(&"\u{2501}".repeat(42));
        output.push_str("\n\n");

        for project in projects {
            output.push_str(&format!("{}\n", project.path));
            output.push_str(&format!("\u{251C}\u{2500} Builder:  {}\n", project.builder));
            output.push_str(&format!(
                "\u{251C}\u{2500} Sources:  {}\n",
                project.source_files
            ));
            if project.packages.is_empty() {
                output.push_str("\u{2514}\u{2500} Packages: (none)\n\n");
            } else {
                output.push_str(&format!(
                    "\u{2514}\u{2500} Packages: {}\n\n",
                    project.packages.join(", ")
                ));
            }
        }

        output
    }
}
