//! Files-first directory traversal and project discovery

use super::{Project, ProjectError};
use crate::build_systems::BuilderRegistry;
use crate::fs::{DirEntry, FileSystem};
use std::path::Path;
use tracing::info;

/// Gradle keeps wrapper and version-catalog files here; never a project
pub const GRADLE_CONFIG_DIR: &str = "gradle";

/// Walks `root`, calling `visit` with each directory's non-directory entries
/// before descending into its subdirectories.
///
/// Entries are visited in name order. Symlinks are reported as files and
/// never followed. `gradle` directories are skipped. Any listing error or
/// visitor error aborts the walk.
pub fn files_first_walk<F>(
    root: &Path,
    fs: &dyn FileSystem,
    visit: &mut F,
) -> Result<(), ProjectError>
where
    F: FnMut(&Path, &[DirEntry]) -> Result<(), ProjectError>,
{
    let mut entries = fs.read_dir(root).map_err(ProjectError::Walk)?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let (dirs, files): (Vec<DirEntry>, Vec<DirEntry>) =
        entries.into_iter().partition(|e| e.is_dir());

    visit(root, &files)?;

    for dir in dirs {
        if dir.file_name() == GRADLE_CONFIG_DIR {
            continue;
        }
        files_first_walk(dir.path(), fs, visit)?;
    }

    Ok(())
}

/// Every directory under `root` holding a builder signature file becomes a
/// [`Project`]. Nested projects are reported independently, parents first.
pub fn find_projects(
    root: &Path,
    fs: &dyn FileSystem,
    registry: &BuilderRegistry,
) -> Result<Vec<Project>, ProjectError> {
    let mut projects = Vec::new();

    files_first_walk(root, fs, &mut |dir, files| {
        if !registry.any_matches(files.iter().map(DirEntry::file_name)) {
            return Ok(());
        }

        let project = Project::new(dir, fs, registry)?;
        info!(
            builder = %project.builder(),
            path = %dir.display(),
            "Found {} project in {} directory",
            project.builder(),
            dir.display()
        );
        projects.push(project);
        Ok(())
    })?;

    Ok(projects)
}
