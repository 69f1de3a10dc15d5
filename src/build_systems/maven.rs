//! Maven and Maven wrapper builders

use super::gradle::wrapper;
use crate::config::ScanConfig;
use crate::exec::CommandSpec;
use std::path::Path;

/// Arguments for an `install` run against the configured local repository.
///
/// `MAVEN_CLI_OPTS` is split on whitespace and empty fragments are dropped.
pub fn maven_args(config: &ScanConfig) -> Vec<String> {
    let mut args = vec![format!(
        "-Dmaven.repo.local={}",
        config.maven_repo_path.display()
    )];
    args.extend(config.maven_cli_opts.split_whitespace().map(str::to_string));
    args.push("install".to_string());
    args
}

pub fn maven_command(config: &ScanConfig, root: &Path) -> CommandSpec {
    CommandSpec::new(&config.maven_path, root).args(maven_args(config))
}

pub fn mvnw_command(config: &ScanConfig, root: &Path) -> CommandSpec {
    CommandSpec::new(wrapper(root, "mvnw"), root).args(maven_args(config))
}
