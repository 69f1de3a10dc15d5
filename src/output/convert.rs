//! Conversion of SpotBugs findings into report issues

use super::schema::{Confidence, Identifier, Issue, Location, Report, Scanner, Severity};
use crate::analyzer::{parse_report, AnalyzerError, BugInstance};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

const SPOTBUGS_URL: &str = "https://spotbugs.readthedocs.io/en/latest/bugDescriptions.html#";
const FIND_SEC_BUGS_URL: &str = "https://find-sec-bugs.github.io/bugs.htm#";

/// Bug types documented by SpotBugs itself rather than by Find Security Bugs
const SPOTBUGS_TYPES: &[&str] = &[
    "DMI_CONSTANT_DB_PASSWORD",
    "DMI_EMPTY_DB_PASSWORD",
    "HRS_REQUEST_PARAMETER_TO_COOKIE",
    "HRS_REQUEST_PARAMETER_TO_HTTP_HEADER",
    "PT_ABSOLUTE_PATH_TRAVERSAL",
    "PT_RELATIVE_PATH_TRAVERSAL",
    "SQL_NONCONSTANT_STRING_PASSED_TO_EXECUTE",
    "SQL_PREPARED_STATEMENT_GENERATED_FROM_NONCONSTANT_STRING",
    "XSS_REQUEST_PARAMETER_TO_JSP_WRITER",
    "XSS_REQUEST_PARAMETER_TO_SEND_ERROR",
    "XSS_REQUEST_PARAMETER_TO_SERVLET_WRITER",
];

/// `hash:type:path:start`, or empty when the bug carries none of these
pub fn compare_key(bug: &BugInstance) -> String {
    let key = format!(
        "{}:{}:{}:{}",
        bug.instance_hash, bug.bug_type, bug.source_line.source_path, bug.source_line.start
    );

    if key == ":::0" {
        String::new()
    } else {
        key
    }
}

pub fn location(bug: &BugInstance, prepend_path: &str) -> Location {
    let file = if prepend_path.is_empty() {
        bug.source_line.source_path.clone()
    } else {
        Path::new(prepend_path)
            .join(&bug.source_line.source_path)
            .to_string_lossy()
            .into_owned()
    };

    Location {
        file,
        start_line: bug.source_line.start,
        end_line: bug.source_line.end,
        class: bug.class_name.clone(),
        method: bug.method_name.clone(),
    }
}

/// Bug type identifier, plus the CWE when SpotBugs reports one
pub fn identifiers(bug: &BugInstance) -> Vec<Identifier> {
    let mut ids = vec![Identifier {
        kind: "find_sec_bugs_type".to_string(),
        name: format!("Find Security Bugs-{}", bug.bug_type),
        value: bug.bug_type.clone(),
        url: bug_url(bug),
    }];

    if bug.cwe_id != 0 {
        ids.push(Identifier::cwe(bug.cwe_id));
    }

    ids
}

pub fn bug_url(bug: &BugInstance) -> String {
    if SPOTBUGS_TYPES.contains(&bug.bug_type.as_str()) {
        let anchor = format!(
            "{}-{}-{}",
            bug.abbrev,
            bug.short_message,
            bug.bug_type.replace('_', "-")
        );
        format!("{}{}", SPOTBUGS_URL, slugify(&anchor))
    } else {
        format!("{}{}", FIND_SEC_BUGS_URL, bug.bug_type)
    }
}

fn unauthorized_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9_-]").expect("valid regex"))
}

fn repeated_dashes() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-{2,}").expect("valid regex"))
}

/// URL anchor slug: lowercase ASCII letters, digits, `_` and single dashes.
/// Non-ASCII text is transliterated first (`é` becomes `e`).
pub fn slugify(text: &str) -> String {
    let lowered = deunicode::deunicode(text)
        .to_lowercase()
        .replace('&', " and ");
    let dashed = unauthorized_chars().replace_all(&lowered, "-");
    let collapsed = repeated_dashes().replace_all(&dashed, "-");
    collapsed.trim_matches(|c| c == '-' || c == '_').to_string()
}

pub fn to_issue(bug: &BugInstance, prepend_path: &str) -> Issue {
    Issue {
        category: "sast".to_string(),
        name: bug.short_message.clone(),
        message: bug.short_message.clone(),
        description: bug.long_message.clone(),
        compare_key: compare_key(bug),
        severity: Severity::from_rank(bug.rank),
        confidence: Confidence::from_priority(bug.priority),
        scanner: Scanner::default(),
        location: location(bug, prepend_path),
        identifiers: identifiers(bug),
    }
}

pub fn to_report(bugs: &[BugInstance], prepend_path: &str) -> Report {
    Report::new(bugs.iter().map(|b| to_issue(b, prepend_path)).collect())
}

/// Converts a raw SpotBugs XML report. Paths are used as reported.
pub fn convert_xml(xml: &str, prepend_path: &str) -> Result<Report, AnalyzerError> {
    let bugs = parse_report(xml)?;
    Ok(to_report(&bugs, prepend_path))
}
