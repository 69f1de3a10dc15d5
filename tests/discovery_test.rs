//! Project discovery against real directory trees

use jvmscan::build_systems::{Builder, BuilderRegistry};
use jvmscan::fs::RealFileSystem;
use jvmscan::project::find_projects;
use jvmscan::Project;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn discover(root: &Path) -> Vec<Project> {
    find_projects(root, &RealFileSystem::new(), &BuilderRegistry::with_defaults()).unwrap()
}

fn relative_roots(root: &Path, projects: &[Project]) -> Vec<String> {
    projects
        .iter()
        .map(|p| {
            p.root()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

#[test]
fn test_nested_projects_parents_first() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "pom.xml", "<project/>");
    write(root, "core/pom.xml", "<project/>");
    write(root, "core/src/main/java/com/acme/core/Core.java", "package com.acme.core;");
    write(root, "web/build.gradle", "apply plugin: 'java'");
    write(root, "web/src/main/groovy/com/acme/web/Controller.groovy", "package com.acme.web");
    write(root, "docs/index.md", "# docs");

    let projects = discover(root);

    assert_eq!(relative_roots(root, &projects), vec!["", "core", "web"]);
    assert_eq!(projects[0].builder(), Builder::Maven);
    assert_eq!(projects[1].builder(), Builder::Maven);
    assert_eq!(projects[2].builder(), Builder::Gradle);
    assert!(projects[2].is_groovy());
    assert!(!projects[1].is_groovy());
}

#[test]
fn test_wrapper_beats_build_file() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "build.gradle", "");
    write(root, "gradlew", "#!/bin/sh");
    write(root, "pom.xml", "");
    write(root, "mvnw", "#!/bin/sh");

    let projects = discover(root);

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].builder(), Builder::Gradlew);
}

#[test]
fn test_gradle_directory_is_skipped() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "settings.gradle", "");
    write(root, "gradle/wrapper/build.gradle", "");
    write(root, "gradle/libs/pom.xml", "");
    write(root, "gradle/Helper.java", "package helper;");

    assert!(discover(root).is_empty());
}

#[test]
fn test_project_indexes_sources_and_packages() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "build.sbt", "name := \"shop\"");
    write(
        root,
        "src/main/scala/com/shop/Cart.scala",
        "package com.shop\n\nclass Cart\n",
    );
    write(
        root,
        "src/main/java/com/shop/legacy/Order.java",
        "// legacy\npackage com.shop.legacy;\n",
    );
    write(root, "src/main/kotlin/com/shop/Api.kt", "package com.shop\n");
    write(root, "src/main/resources/application.conf", "db.url = \"x\"");

    let projects = discover(root);
    assert_eq!(projects.len(), 1);
    let project = &projects[0];

    assert_eq!(project.builder(), Builder::Sbt);
    assert!(project.uses_builder("sbt"));
    assert_eq!(project.tree().file_count(), 2);
    assert_eq!(
        project.packages().collect::<Vec<_>>(),
        vec!["com.shop", "com.shop.legacy"]
    );
    assert_eq!(
        project.relative_path("com/shop/legacy/Order.java").unwrap(),
        "src/main/java/com/shop/legacy/Order.java"
    );
    assert_eq!(
        project.relative_path("shop/Cart.scala").unwrap(),
        "src/main/scala/com/shop/Cart.scala"
    );
    assert!(project.relative_path("com/shop/application.conf").is_err());
}

#[test]
fn test_source_at_project_root() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "build.xml", "<project/>");
    write(root, "Main.java", "public class Main {}");

    let projects = discover(root);
    assert_eq!(projects[0].builder(), Builder::Ant);
    assert_eq!(projects[0].relative_path("Main.java").unwrap(), "Main.java");
    assert_eq!(projects[0].packages().count(), 0);
}

#[test]
fn test_signature_must_be_exact_name() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "pom.xml.orig", "");
    write(root, "Build.gradle", "");
    write(root, "build.gradle.kts", "");

    assert!(discover(root).is_empty());
}

#[test]
fn test_missing_root_is_an_error() {
    let result = find_projects(
        Path::new("/nonexistent/jvmscan/discovery"),
        &RealFileSystem::new(),
        &BuilderRegistry::with_defaults(),
    );
    assert!(result.is_err());
}
