//! Source file classification and package extraction

use regex::bytes::Regex as BytesRegex;
use regex::Regex;
use std::sync::OnceLock;

fn package_regex() -> &'static BytesRegex {
    static RE: OnceLock<BytesRegex> = OnceLock::new();
    RE.get_or_init(|| BytesRegex::new(r"package\s+([a-z][a-z0-9_\.]*)").expect("valid regex"))
}

fn source_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\.groovy|\.java|\.scala)$").expect("valid regex"))
}

fn groovy_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.groovy$").expect("valid regex"))
}

/// Java, Groovy and Scala sources are indexed
pub fn is_source_file(file_name: &str) -> bool {
    source_file_regex().is_match(file_name)
}

pub fn is_groovy_file(file_name: &str) -> bool {
    groovy_file_regex().is_match(file_name)
}

/// First package declaration found in `content`.
///
/// Works on raw bytes so sources in legacy encodings are still scanned.
pub fn extract_package(content: &[u8]) -> Option<String> {
    package_regex()
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
}
