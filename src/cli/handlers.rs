//! Subcommand handlers. Each returns the process exit code.

use super::commands::{AnalyzeArgs, ConvertArgs, DetectArgs, MatchArgs, ToolArgs};
use super::output::{OutputFormatter, ProjectSummary};
use crate::build_systems::BuilderRegistry;
use crate::config::ScanConfig;
use crate::fs::RealFileSystem;
use crate::output::{convert_xml, to_report};
use crate::pipeline::Pipeline;
use crate::project::find_projects;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub fn handle_analyze(args: &AnalyzeArgs, quiet: bool) -> i32 {
    let repo_path = match resolve_repository(args.repository_path.as_deref()) {
        Some(path) => path,
        None => return 1,
    };

    let config = scan_config(args, ScanConfig::default());
    if args.no_compile {
        debug!("Compilation disabled by --no-compile");
    }

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your environment variables and command-line arguments.");
        return 1;
    }

    let pipeline = Pipeline::with_defaults(config);
    let findings = match pipeline.run(&repo_path) {
        Ok(findings) => findings,
        Err(e) => {
            error!("Scan failed: {}", e);
            return 1;
        }
    };

    let report = to_report(&findings, &args.prepend_path);
    let formatter = OutputFormatter::new(args.format.into());
    let output = match formatter.format_report(&report) {
        Ok(out) => out,
        Err(e) => {
            error!("Failed to format report: {:#}", e);
            return 1;
        }
    };

    emit(&output, args.output.as_deref(), quiet)
}

pub fn handle_detect(args: &DetectArgs) -> i32 {
    let repo_path = match resolve_repository(args.repository_path.as_deref()) {
        Some(path) => path,
        None => return 1,
    };

    let fs = RealFileSystem::new();
    let registry = BuilderRegistry::with_defaults();
    let projects = match find_projects(&repo_path, &fs, &registry) {
        Ok(projects) => projects,
        Err(e) => {
            error!("Project discovery failed: {}", e);
            return 1;
        }
    };
    info!("Detection complete: {} projects detected", projects.len());

    let summaries: Vec<ProjectSummary> = projects
        .iter()
        .map(|p| ProjectSummary::new(&repo_path, p))
        .collect();

    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format_projects(&summaries) {
        Ok(out) => {
            print!("{}", out);
            if !out.ends_with('\n') {
                println!();
            }
            0
        }
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            1
        }
    }
}

pub fn handle_match(args: &MatchArgs, quiet: bool) -> i32 {
    let registry = BuilderRegistry::with_defaults();

    match registry.best_match([args.file_name.as_str()]) {
        Some(builder) => {
            if !quiet {
                println!("{}: {}", args.file_name, builder);
            }
            0
        }
        None => {
            let known: Vec<&str> = registry.iter().map(|b| b.signature_file()).collect();
            debug!(
                "{} is not a build file (known: {})",
                args.file_name,
                known.join(", ")
            );
            1
        }
    }
}

pub fn handle_convert(args: &ConvertArgs, quiet: bool) -> i32 {
    let xml = match std::fs::read_to_string(&args.report) {
        Ok(xml) => xml,
        Err(e) => {
            error!("Failed to read {}: {}", args.report.display(), e);
            return 1;
        }
    };

    let report = match convert_xml(&xml, &args.prepend_path) {
        Ok(report) => report,
        Err(e) => {
            error!("Failed to convert {}: {}", args.report.display(), e);
            return 1;
        }
    };
    info!(
        vulnerabilities = report.vulnerabilities.len(),
        "Converted {}",
        args.report.display()
    );

    let formatter = OutputFormatter::new(args.format.into());
    let output = match formatter.format_report(&report) {
        Ok(out) => out,
        Err(e) => {
            error!("Failed to format report: {:#}", e);
            return 1;
        }
    };

    emit(&output, args.output.as_deref(), quiet)
}

/// Applies the analyze flags over `base`. Flags only ever disable
/// compilation or enable fail-never; tool overrides replace the value as
/// given, so an explicitly empty path reaches validation.
fn scan_config(args: &AnalyzeArgs, base: ScanConfig) -> ScanConfig {
    let ToolArgs {
        ant_path,
        ant_home,
        gradle_path,
        maven_path,
        maven_repo_path,
        maven_cli_opts,
        sbt_path,
        java_path,
        java_opts,
    } = args.tools.clone();

    ScanConfig {
        compile: base.compile && !args.no_compile,
        fail_never: base.fail_never || args.fail_never,
        ant_path: ant_path.unwrap_or(base.ant_path),
        ant_home: ant_home.filter(|v| !v.is_empty()).or(base.ant_home),
        gradle_path: gradle_path.unwrap_or(base.gradle_path),
        maven_path: maven_path.unwrap_or(base.maven_path),
        maven_repo_path: maven_repo_path.unwrap_or(base.maven_repo_path),
        maven_cli_opts: maven_cli_opts.unwrap_or(base.maven_cli_opts),
        sbt_path: sbt_path.unwrap_or(base.sbt_path),
        java_path: java_path.unwrap_or(base.java_path),
        java_opts: java_opts.unwrap_or(base.java_opts),
        ..base
    }
}

/// Defaults to the current directory. Logs and returns `None` when the
/// path is unusable.
fn resolve_repository(path: Option<&Path>) -> Option<PathBuf> {
    let repo_path = match path {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from("."),
    };
    debug!("Repository path: {}", repo_path.display());

    if !repo_path.exists() {
        error!("Repository path does not exist: {}", repo_path.display());
        return None;
    }

    if !repo_path.is_dir() {
        error!(
            "Repository path is not a directory: {}",
            repo_path.display()
        );
        return None;
    }

    match repo_path.canonicalize() {
        Ok(path) => {
            debug!("Canonicalized repository path: {}", path.display());
            Some(path)
        }
        Err(e) => {
            error!("Failed to canonicalize repository path: {}", e);
            None
        }
    }
}

fn emit(output: &str, destination: Option<&Path>, quiet: bool) -> i32 {
    match destination {
        Some(output_file) => match std::fs::write(output_file, output) {
            Ok(_) => {
                info!("Report written to: {}", output_file.display());
                if !quiet {
                    eprintln!("Report written to: {}", output_file.display());
                }
                0
            }
            Err(e) => {
                error!("Failed to write report to file: {}", e);
                1
            }
        },
        None => {
            println!("{}", output);
            0
        }
    }
}
