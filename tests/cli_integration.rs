//! CLI integration tests
//!
//! These run the built binary and check parsing, output formats and exit
//! codes for the commands that need neither a build tool nor a JVM.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const SPOTBUGS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<BugCollection version="4.0.2">
  <BugInstance type="PREDICTABLE_RANDOM" priority="2" rank="12" abbrev="SECPR" cweid="330" instanceHash="9f2c">
    <ShortMessage>Predictable pseudorandom number generator</ShortMessage>
    <LongMessage>The use of java.util.Random is predictable</LongMessage>
    <Class classname="com.acme.Tokens"/>
    <Method name="next"/>
    <SourceLine start="21" end="21" sourcepath="com/acme/Tokens.java"/>
  </BugInstance>
</BugCollection>"#;

fn jvmscan(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jvmscan"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute jvmscan")
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_cli_help() {
    let output = jvmscan(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["analyze", "detect", "match", "convert"] {
        assert!(stdout.contains(command), "help should list {}", command);
    }
}

#[test]
fn test_cli_version() {
    let output = jvmscan(&["--version"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_match_exit_codes() {
    let output = jvmscan(&["match", "pom.xml"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "pom.xml: Maven");

    let output = jvmscan(&["match", "package.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_detect_json() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pom.xml", "<project/>");
    write(
        dir.path(),
        "src/main/java/com/acme/App.java",
        "package com.acme;\n",
    );
    write(dir.path(), "tools/build.sbt", "");

    let output = jvmscan(&["-q", "detect", dir.path().to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success());

    let projects: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let projects = projects.as_array().unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["path"], ".");
    assert_eq!(projects[0]["builder"], "Maven");
    assert_eq!(projects[0]["packages"][0], "com.acme");
    assert_eq!(projects[1]["path"], "tools");
    assert_eq!(projects[1]["builder"], "SBT");
}

#[test]
fn test_detect_human_empty_repository() {
    let dir = TempDir::new().unwrap();

    let output = jvmscan(&["detect", dir.path().to_str().unwrap()]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No analyzable projects found"));
}

#[test]
fn test_detect_missing_path() {
    let output = jvmscan(&["detect", "/nonexistent/jvmscan/repo"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_convert_to_stdout() {
    let dir = TempDir::new().unwrap();
    let xml = dir.path().join("SpotBugs.xml");
    fs::write(&xml, SPOTBUGS_XML).unwrap();

    let output = jvmscan(&["-q", "convert", xml.to_str().unwrap(), "--prepend-path", "svc"]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let issue = &report["vulnerabilities"][0];
    assert_eq!(report["version"], "2.3");
    assert_eq!(issue["severity"], "Medium");
    assert_eq!(issue["confidence"], "Medium");
    assert_eq!(issue["location"]["file"], "svc/com/acme/Tokens.java");
    assert_eq!(issue["location"]["start_line"], 21);
}

#[test]
fn test_convert_yaml_to_file() {
    let dir = TempDir::new().unwrap();
    let xml = dir.path().join("SpotBugs.xml");
    fs::write(&xml, SPOTBUGS_XML).unwrap();
    let out = dir.path().join("report.yml");

    let output = jvmscan(&[
        "-q",
        "convert",
        xml.to_str().unwrap(),
        "--format",
        "yaml",
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let yaml = fs::read_to_string(out).unwrap();
    assert!(yaml.contains("PREDICTABLE_RANDOM"));
    assert!(yaml.contains("file: com/acme/Tokens.java"));
}

#[test]
fn test_convert_invalid_xml() {
    let dir = TempDir::new().unwrap();
    let xml = dir.path().join("SpotBugs.xml");
    fs::write(&xml, "<BugCollection>").unwrap();

    let output = jvmscan(&["convert", xml.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_analyze_missing_path() {
    let output = jvmscan(&["analyze", "/nonexistent/jvmscan/repo", "--no-compile"]);
    assert_eq!(output.status.code(), Some(1));
}
