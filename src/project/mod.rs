//! Buildable projects
//!
//! A [`Project`] is a directory holding a builder signature file, together
//! with an index of every source file below it and the packages those files
//! declare. The index is what turns the analyzer's package-relative paths
//! back into project-relative ones.

pub mod discovery;
pub mod sources;

pub use discovery::{files_first_walk, find_projects};

use crate::build_systems::{BuildError, Builder, BuilderRegistry};
use crate::config::ScanConfig;
use crate::directory::{DirectoryError, DirectoryTree};
use crate::exec::CommandRunner;
use crate::fs::FileSystem;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Cannot find compatible builder for project path: {}", .path.display())]
    NoCompatibleBuilder { path: PathBuf },

    #[error("Failed to walk project tree: {0:#}")]
    Walk(anyhow::Error),

    #[error(transparent)]
    Resolve(#[from] DirectoryError),
}

#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    tree: DirectoryTree,
    builder: Builder,
    packages: BTreeSet<String>,
}

impl Project {
    /// Indexes the source files under `root`.
    ///
    /// The builder is the best match among the files of the first directory
    /// (in walk order) holding any signature file, normally `root` itself.
    pub fn new(
        root: impl Into<PathBuf>,
        fs: &dyn FileSystem,
        registry: &BuilderRegistry,
    ) -> Result<Self, ProjectError> {
        let root = root.into();
        let mut tree = DirectoryTree::new();
        let mut packages = BTreeSet::new();
        let mut builder = None;

        files_first_walk(&root, fs, &mut |_dir, files| {
            if builder.is_none() {
                builder = registry.best_match(files.iter().map(|f| f.file_name()));
            }

            for file in files {
                if !sources::is_source_file(file.file_name()) {
                    continue;
                }

                let components = relative_components(&root, file.path());
                tree.insert(&components)?;
                debug!(file = %file.path().display(), "Recorded source file");

                let content = fs.read(file.path()).map_err(ProjectError::Walk)?;
                if let Some(package) = sources::extract_package(&content) {
                    packages.insert(package);
                }
            }
            Ok(())
        })?;

        let builder = builder.ok_or_else(|| ProjectError::NoCompatibleBuilder { path: root.clone() })?;

        Ok(Self {
            root,
            tree,
            builder,
            packages,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn builder(&self) -> Builder {
        self.builder
    }

    pub fn tree(&self) -> &DirectoryTree {
        &self.tree
    }

    /// Distinct package declarations, sorted
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.iter().map(String::as_str)
    }

    pub fn uses_maven(&self) -> bool {
        self.builder.uses_maven()
    }

    /// True when the project is built by the named builder
    /// (case-insensitive, e.g. `"gradle"`).
    pub fn uses_builder(&self, name: &str) -> bool {
        self.builder.name().eq_ignore_ascii_case(name)
    }

    pub fn is_groovy(&self) -> bool {
        self.tree
            .has_descendant_matching(self.tree.root(), sources::is_groovy_file)
    }

    pub fn build(&self, config: &ScanConfig, runner: &dyn CommandRunner) -> Result<(), BuildError> {
        self.builder.build(config, self, runner)
    }

    /// Maps an analyzer path such as `com/acme/App.java` to its path
    /// relative to the project root, e.g. `src/main/java/com/acme/App.java`.
    pub fn relative_path(&self, partial_path: &str) -> Result<String, ProjectError> {
        let (node, file_name) = self.tree.resolve(partial_path)?;
        let dir = self.tree.path_relative_to(node, self.tree.root())?;

        if dir.is_empty() {
            Ok(file_name)
        } else {
            Ok(format!("{}/{}", dir, file_name))
        }
    }
}

fn relative_components(root: &Path, path: &Path) -> Vec<String> {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    fn maven_project() -> MockFileSystem {
        let fs = MockFileSystem::new();
        fs.add_file("pom.xml", "<project/>");
        fs.add_file(
            "src/main/java/com/acme/App.java",
            "package com.acme;\n\npublic class App {}\n",
        );
        fs.add_file(
            "src/main/java/com/acme/util/Strings.java",
            "package com.acme.util;\n",
        );
        fs.add_file("src/test/java/com/acme/AppTest.java", "package com.acme;\n");
        fs.add_file("README.md", "# app");
        fs
    }

    #[test]
    fn test_maven_project() {
        let fs = maven_project();
        let registry = BuilderRegistry::with_defaults();
        let project = Project::new("/mock", &fs, &registry).unwrap();

        assert_eq!(project.builder(), Builder::Maven);
        assert!(project.uses_maven());
        assert!(project.uses_builder("maven"));
        assert!(!project.is_groovy());
        assert_eq!(
            project.packages().collect::<Vec<_>>(),
            vec!["com.acme", "com.acme.util"]
        );
        assert_eq!(project.tree().file_count(), 3);
        assert_eq!(
            project.relative_path("com/acme/App.java").unwrap(),
            "src/main/java/com/acme/App.java"
        );
        assert_eq!(
            project.relative_path("com/acme/AppTest.java").unwrap(),
            "src/test/java/com/acme/AppTest.java"
        );
    }

    #[test]
    fn test_unresolved_path() {
        let fs = maven_project();
        let registry = BuilderRegistry::with_defaults();
        let project = Project::new("/mock", &fs, &registry).unwrap();

        assert!(matches!(
            project.relative_path("com/acme/Missing.java"),
            Err(ProjectError::Resolve(DirectoryError::NotFound { .. }))
        ));
        assert!(project.relative_path("org/other/App.java").is_err());
    }

    #[test]
    fn test_source_at_project_root() {
        let fs = MockFileSystem::new();
        fs.add_file("build.xml", "<project/>");
        fs.add_file("Main.java", "public class Main {}");

        let registry = BuilderRegistry::with_defaults();
        let project = Project::new("/mock", &fs, &registry).unwrap();

        assert_eq!(project.builder(), Builder::Ant);
        assert_eq!(project.packages().count(), 0);
        assert_eq!(project.relative_path("Main.java").unwrap(), "Main.java");
    }

    #[test]
    fn test_no_compatible_builder() {
        let fs = MockFileSystem::new();
        fs.add_file("src/App.java", "package com.acme;");

        let registry = BuilderRegistry::with_defaults();
        let err = Project::new("/mock", &fs, &registry).unwrap_err();
        assert!(matches!(err, ProjectError::NoCompatibleBuilder { .. }));
        assert!(err.to_string().contains("/mock"));
    }

    #[test]
    fn test_builder_priority_in_same_directory() {
        let fs = MockFileSystem::new();
        fs.add_file("build.gradle", "");
        fs.add_file("build.sbt", "");
        fs.add_file("src/main/scala/Main.scala", "package org.example");

        let registry = BuilderRegistry::with_defaults();
        let project = Project::new("/mock", &fs, &registry).unwrap();
        assert_eq!(project.builder(), Builder::Sbt);
    }

    #[test]
    fn test_groovy_detection() {
        let fs = MockFileSystem::new();
        fs.add_file("build.gradle", "");
        fs.add_file("src/main/groovy/org/acme/Service.groovy", "package org.acme");

        let registry = BuilderRegistry::with_defaults();
        let project = Project::new("/mock", &fs, &registry).unwrap();
        assert!(project.is_groovy());
        assert!(!project.uses_maven());
    }

    #[test]
    fn test_gradle_config_dir_not_indexed() {
        let fs = MockFileSystem::new();
        fs.add_file("build.gradle", "");
        fs.add_file("gradle/plugins/Helper.groovy", "package build.helpers");

        let registry = BuilderRegistry::with_defaults();
        let project = Project::new("/mock", &fs, &registry).unwrap();
        assert!(!project.is_groovy());
        assert_eq!(project.packages().count(), 0);
    }

    #[test]
    fn test_nested_project_sources_belong_to_parent_too() {
        let fs = MockFileSystem::new();
        fs.add_file("pom.xml", "");
        fs.add_file("module/pom.xml", "");
        fs.add_file("module/src/main/java/com/acme/mod/Mod.java", "package com.acme.mod;");

        let registry = BuilderRegistry::with_defaults();
        let parent = Project::new("/mock", &fs, &registry).unwrap();
        assert_eq!(
            parent.relative_path("com/acme/mod/Mod.java").unwrap(),
            "module/src/main/java/com/acme/mod/Mod.java"
        );

        let child = Project::new("/mock/module", &fs, &registry).unwrap();
        assert_eq!(
            child.relative_path("com/acme/mod/Mod.java").unwrap(),
            "src/main/java/com/acme/mod/Mod.java"
        );
    }

    #[test]
    fn test_non_utf8_source() {
        let fs = MockFileSystem::new();
        fs.add_file("pom.xml", "");
        fs.add_bytes("src/Latin.java", b"// \xe9t\xe9\npackage com.latin;\n");

        let registry = BuilderRegistry::with_defaults();
        let project = Project::new("/mock", &fs, &registry).unwrap();
        assert_eq!(project.packages().collect::<Vec<_>>(), vec!["com.latin"]);
    }
}
