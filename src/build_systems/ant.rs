//! Ant builder

use crate::config::ScanConfig;
use crate::exec::CommandSpec;
use std::path::Path;

/// Plain `ant` invocation; `ANT_HOME` is passed to the child only when
/// configured.
pub fn ant_command(config: &ScanConfig, root: &Path) -> CommandSpec {
    let spec = CommandSpec::new(&config.ant_path, root);
    match &config.ant_home {
        Some(home) => spec.env("ANT_HOME", home.as_str()),
        None => spec,
    }
}
