//! Security report data structures
//!
//! The report layout follows the common SAST report format: a list of
//! vulnerabilities plus a `scan` section describing the scanner.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Report format version
pub const REPORT_VERSION: &str = "2.3";

pub const SCANNER_ID: &str = "find_sec_bugs";
pub const SCANNER_NAME: &str = "Find Security Bugs";
pub const SCANNER_VERSION: &str = "4.0.2";
pub const SCANNER_URL: &str = "https://spotbugs.github.io";
pub const SCANNER_VENDOR: &str = "GitLab";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl Severity {
    /// Maps a SpotBugs bug rank (1 = scariest, 20 = least)
    pub fn from_rank(rank: i64) -> Self {
        match rank {
            1..=4 => Severity::Critical,
            5..=9 => Severity::High,
            10..=14 => Severity::Medium,
            15..=20 => Severity::Low,
            _ => Severity::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
    Experimental,
    Ignore,
    Unknown,
}

impl Confidence {
    /// Maps a SpotBugs priority
    pub fn from_priority(priority: i64) -> Self {
        match priority {
            1 => Confidence::High,
            2 => Confidence::Medium,
            3 => Confidence::Low,
            4 => Confidence::Experimental,
            5 => Confidence::Ignore,
            _ => Confidence::Unknown,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scanner {
    pub id: String,
    pub name: String,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            id: SCANNER_ID.to_string(),
            name: SCANNER_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub start_line: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub end_line: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

impl Identifier {
    pub fn cwe(id: i64) -> Self {
        Self {
            kind: "cwe".to_string(),
            name: format!("CWE-{}", id),
            value: id.to_string(),
            url: format!("https://cwe.mitre.org/data/definitions/{}.html", id),
        }
    }
}

/// One finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub category: String,
    pub name: String,
    pub message: String,
    pub description: String,
    /// Stable key used to tell whether two findings are the same
    pub compare_key: String,
    pub severity: Severity,
    pub confidence: Confidence,
    pub scanner: Scanner,
    pub location: Location,
    pub identifiers: Vec<Identifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerDetails {
    pub id: String,
    pub name: String,
    pub version: String,
    pub url: String,
    pub vendor: Vendor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
    pub scanner: ScannerDetails,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
}

impl Default for Scan {
    fn default() -> Self {
        Self {
            scanner: ScannerDetails {
                id: SCANNER_ID.to_string(),
                name: SCANNER_NAME.to_string(),
                version: SCANNER_VERSION.to_string(),
                url: SCANNER_URL.to_string(),
                vendor: Vendor {
                    name: SCANNER_VENDOR.to_string(),
                },
            },
            kind: "sast".to_string(),
            status: "success".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub version: String,
    pub vulnerabilities: Vec<Issue>,
    pub scan: Scan,
}

impl Report {
    pub fn new(vulnerabilities: Vec<Issue>) -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            vulnerabilities,
            scan: Scan::default(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report to JSON")
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize report to YAML")
    }
}
