//! Auxiliary classpath and compiled output discovery

use super::AnalyzerError;
use crate::config::ScanConfig;
use crate::project::Project;
use ignore::WalkBuilder;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory name build tools write compiled classes under
pub const TARGET_DIR: &str = "target";

/// Writes the `-auxclasspathFromFile` list: one absolute jar path per line.
///
/// Only Maven-family projects get entries, taken from the local repository.
/// Other projects get an empty list.
pub fn write_jars_list(config: &ScanConfig, project: &Project) -> Result<PathBuf, AnalyzerError> {
    let path = config.jars_list_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AnalyzerError::io(format!("Failed to create {}", parent.display()), e))?;
    }

    let mut file = fs::File::create(&path)
        .map_err(|e| AnalyzerError::io(format!("Failed to create {}", path.display()), e))?;

    if project.uses_maven() {
        let repo = local_repository(&config.maven_repo_path, project.root());
        for jar in find_jars(&repo)? {
            writeln!(file, "{}", jar.display())
                .map_err(|e| AnalyzerError::io(format!("Failed to write {}", path.display()), e))?;
        }
    }

    Ok(path)
}

/// A relative repository path is relative to the project being analyzed
pub fn local_repository(repo: &Path, project_root: &Path) -> PathBuf {
    if repo.is_absolute() {
        repo.to_path_buf()
    } else {
        project_root.join(repo)
    }
}

/// Every `*.jar` file under `repo`, sorted. A missing repository yields
/// no jars.
pub fn find_jars(repo: &Path) -> Result<Vec<PathBuf>, AnalyzerError> {
    if !repo.is_dir() {
        warn!(repository = %repo.display(), "Local Maven repository not found, no jars added to the classpath");
        return Ok(Vec::new());
    }

    let mut jars = Vec::new();
    for entry in walker(repo) {
        let entry = entry.map_err(|e| AnalyzerError::Walk(e.to_string()))?;
        let is_file = entry.file_type().map(|ft| ft.is_file()).unwrap_or(false);
        if is_file && entry.path().extension().is_some_and(|ext| ext == "jar") {
            jars.push(entry.into_path());
        }
    }

    jars.sort();
    debug!(repository = %repo.display(), count = jars.len(), "Collected classpath jars");
    Ok(jars)
}

/// Directories named `target` anywhere under `root`, in walk order
pub fn target_dirs(root: &Path) -> Result<Vec<PathBuf>, AnalyzerError> {
    let mut targets = Vec::new();
    for entry in walker(root) {
        let entry = entry.map_err(|e| AnalyzerError::Walk(e.to_string()))?;
        let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
        if is_dir && entry.file_name() == TARGET_DIR {
            targets.push(entry.into_path());
        }
    }
    Ok(targets)
}

fn walker(root: &Path) -> ignore::Walk {
    WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build()
}
