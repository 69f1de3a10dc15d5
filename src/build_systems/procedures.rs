//! Reusable build procedures
//!
//! Builds mutate the project directory: the static-compilation attempt edits
//! `build.gradle` and every attempt can leave outputs behind. These wrappers
//! put the tree back the way it was when an attempt fails.

use super::{BuildError, Builder};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Build file the static-compilation overlay is appended to
pub const GRADLE_BUILD_FILE: &str = "build.gradle";

/// Runs `action` with `file` backed up, then restores the original content
/// whatever the outcome.
///
/// A failed restore is reported in preference to the action's own result.
pub fn with_file_restoration<F>(file: &Path, action: F) -> Result<(), BuildError>
where
    F: FnOnce() -> Result<(), BuildError>,
{
    let backup = backup_path(file);

    fs::copy(file, &backup).map_err(|e| {
        BuildError::io(format!("Failed to back up {}", file.display()), e)
    })?;

    let result = action();

    fs::copy(&backup, file).map_err(|e| {
        BuildError::io(
            format!("Failed to restore {} from {}", file.display(), backup.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(&backup) {
        warn!(backup = %backup.display(), error = %e, "Failed to remove backup file");
    }

    result
}

/// Appends the overlay to the project's `build.gradle` for the duration of
/// `action`.
pub fn with_static_compilation<F>(root: &Path, overlay: &Path, action: F) -> Result<(), BuildError>
where
    F: FnOnce() -> Result<(), BuildError>,
{
    let build_file = root.join(GRADLE_BUILD_FILE);

    with_file_restoration(&build_file, || {
        let extra = fs::read(overlay).map_err(|e| {
            BuildError::io(
                format!("Failed to read static compilation overlay {}", overlay.display()),
                e,
            )
        })?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&build_file)
            .map_err(|e| BuildError::io(format!("Failed to open {}", build_file.display()), e))?;
        file.write_all(&extra)
            .map_err(|e| BuildError::io(format!("Failed to extend {}", build_file.display()), e))?;

        action()
    })
}

/// Runs `action` and, if it fails, removes every entry of `dir` that did
/// not exist beforehand. Only direct children are compared.
pub fn with_cleanup<F>(dir: &Path, action: F) -> Result<(), BuildError>
where
    F: FnOnce() -> Result<(), BuildError>,
{
    let before = snapshot(dir)?;

    let result = action();
    if result.is_ok() {
        return result;
    }

    for entry in fs::read_dir(dir)
        .map_err(|e| BuildError::io(format!("Failed to list {}", dir.display()), e))?
    {
        let entry =
            entry.map_err(|e| BuildError::io(format!("Failed to list {}", dir.display()), e))?;
        if before.contains(&entry.file_name()) {
            continue;
        }

        let path = entry.path();
        let removed = match entry.file_type() {
            Ok(t) if t.is_dir() => fs::remove_dir_all(&path),
            _ => fs::remove_file(&path),
        };
        match removed {
            Ok(()) => debug!(path = %path.display(), "Removed build leftover"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove build leftover"),
        }
    }

    result
}

/// Gradle-family strategy: when the project has Groovy sources, first try a
/// build with the static-compilation overlay, then fall back to a plain
/// build. Each attempt is isolated with [`with_cleanup`].
pub fn build_with_static_fallback(
    builder: Builder,
    root: &Path,
    groovy: bool,
    overlay: &Path,
    action: &mut dyn FnMut() -> Result<(), BuildError>,
) -> Result<(), BuildError> {
    if groovy {
        info!(builder = %builder, project = %root.display(), "Building project with static compilation");

        match with_cleanup(root, || with_static_compilation(root, overlay, || action())) {
            Ok(()) => {
                info!(builder = %builder, project = %root.display(), "Project built");
                return Ok(());
            }
            Err(e) => {
                warn!(
                    builder = %builder,
                    project = %root.display(),
                    error = %e,
                    "Building failed, trying building without static compilation"
                );
            }
        }
    }

    build_generic(builder, root, action)
}

/// Single isolated attempt
pub fn build_generic(
    builder: Builder,
    root: &Path,
    action: &mut dyn FnMut() -> Result<(), BuildError>,
) -> Result<(), BuildError> {
    info!(builder = %builder, project = %root.display(), "Building project");

    match with_cleanup(root, || action()) {
        Ok(()) => {
            info!(builder = %builder, project = %root.display(), "Project built");
            Ok(())
        }
        Err(e) => {
            error!(builder = %builder, project = %root.display(), error = %e, "Building failed");
            Err(e)
        }
    }
}

fn backup_path(file: &Path) -> PathBuf {
    let mut name = file.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

fn snapshot(dir: &Path) -> Result<HashSet<OsString>, BuildError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| BuildError::io(format!("Failed to list {}", dir.display()), e))?;

    entries
        .map(|entry| {
            entry
                .map(|e| e.file_name())
                .map_err(|e| BuildError::io(format!("Failed to list {}", dir.display()), e))
        })
        .collect()
}
