use super::PipelineError;
use crate::analyzer::BugInstance;
use crate::project::Project;
use std::path::Path;
use tracing::debug;

/// Rewrites each finding's package-relative path into a path relative to
/// `repository`.
///
/// Findings whose file isn't part of the project (typically code inside a
/// dependency jar) are dropped.
pub fn correct_paths(
    repository: &Path,
    project: &Project,
    bugs: Vec<BugInstance>,
) -> Result<Vec<BugInstance>, PipelineError> {
    let mut corrected = Vec::with_capacity(bugs.len());

    for mut bug in bugs {
        let reported = &bug.source_line.source_path;
        let project_relative = match project.relative_path(reported) {
            Ok(path) => path,
            Err(e) => {
                debug!(path = %reported, error = %e, "Dropping finding outside project sources");
                continue;
            }
        };

        let full = project.root().join(project_relative);
        let relative = full
            .strip_prefix(repository)
            .map_err(|_| PipelineError::PathJoin {
                path: full.clone(),
                repository: repository.to_path_buf(),
            })?;

        bug.source_line.source_path = relative.to_string_lossy().into_owned();
        corrected.push(bug);
    }

    Ok(corrected)
}

/// Orders findings by path, then start line, then short message
pub fn sort_findings(bugs: &mut [BugInstance]) {
    bugs.sort_by(|a, b| {
        a.source_line
            .source_path
            .cmp(&b.source_line.source_path)
            .then(a.source_line.start.cmp(&b.source_line.start))
            .then_with(|| a.short_message.cmp(&b.short_message))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SourceLine;
    use crate::build_systems::BuilderRegistry;
    use crate::fs::MockFileSystem;

    fn bug(path: &str, start: i64, message: &str) -> BugInstance {
        BugInstance {
            short_message: message.to_string(),
            source_line: SourceLine {
                start,
                end: start,
                source_path: path.to_string(),
            },
            ..BugInstance::default()
        }
    }

    fn module_project(fs: &MockFileSystem) -> Project {
        fs.add_file("services/api/pom.xml", "");
        fs.add_file(
            "services/api/src/main/java/com/acme/api/Handler.java",
            "package com.acme.api;",
        );
        let registry = BuilderRegistry::with_defaults();
        Project::new("/mock/services/api", fs, &registry).unwrap()
    }

    #[test]
    fn test_correct_paths() {
        let fs = MockFileSystem::new();
        let project = module_project(&fs);

        let corrected = correct_paths(
            Path::new("/mock"),
            &project,
            vec![
                bug("com/acme/api/Handler.java", 12, "SQL injection"),
                bug("org/springframework/web/Servlet.java", 3, "XSS"),
            ],
        )
        .unwrap();

        assert_eq!(corrected.len(), 1);
        assert_eq!(
            corrected[0].source_line.source_path,
            "services/api/src/main/java/com/acme/api/Handler.java"
        );
    }

    #[test]
    fn test_project_outside_repository() {
        let fs = MockFileSystem::new();
        let project = module_project(&fs);

        let err = correct_paths(
            Path::new("/elsewhere"),
            &project,
            vec![bug("com/acme/api/Handler.java", 1, "")],
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::PathJoin { .. }));
    }

    #[test]
    fn test_sort_findings() {
        let mut bugs = vec![
            bug("src/B.java", 1, "a"),
            bug("src/A.java", 20, "a"),
            bug("src/A.java", 3, "z"),
            bug("src/A.java", 3, "m"),
        ];
        sort_findings(&mut bugs);

        let keys: Vec<(&str, i64, &str)> = bugs
            .iter()
            .map(|b| {
                (
                    b.source_line.source_path.as_str(),
                    b.source_line.start,
                    b.short_message.as_str(),
                )
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                ("src/A.java", 3, "m"),
                ("src/A.java", 3, "z"),
                ("src/A.java", 20, "a"),
                ("src/B.java", 1, "a"),
            ]
        );
    }
}
