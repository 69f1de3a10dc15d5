//! Gradle-family builders: SBT, Grails wrapper, Gradle wrapper and Gradle

use crate::config::ScanConfig;
use crate::exec::CommandSpec;
use std::path::Path;

/// Grails reports some failures on stdout while still exiting 0
pub(crate) const GRAILS_FAILURE_MARKER: (&str, &str) =
    ("BUILD FAILED", "Grails reported BUILD FAILED");

pub fn sbt_command(config: &ScanConfig, root: &Path) -> CommandSpec {
    CommandSpec::new(&config.sbt_path, root).arg("compile")
}

pub fn grailsw_command(root: &Path) -> CommandSpec {
    CommandSpec::new(wrapper(root, "grailsw"), root).arg("compile")
}

pub fn gradlew_command(root: &Path) -> CommandSpec {
    CommandSpec::new(wrapper(root, "gradlew"), root).arg("build")
}

pub fn gradle_command(config: &ScanConfig, root: &Path) -> CommandSpec {
    CommandSpec::new(&config.gradle_path, root).arg("build")
}

/// Wrapper scripts are invoked by absolute path from the project root
pub(crate) fn wrapper(root: &Path, script: &str) -> String {
    root.join(script).to_string_lossy().into_owned()
}
