//! SpotBugs XML report parsing

use super::AnalyzerError;
use roxmltree::{Document, Node};
use std::str::FromStr;

/// Location of a bug instance as reported by SpotBugs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLine {
    pub start: i64,
    pub end: i64,
    /// Package-relative path (`com/acme/App.java`) until corrected against
    /// the project index
    pub source_path: String,
}

/// One `<BugInstance>` of a SpotBugs report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugInstance {
    pub bug_type: String,
    pub cwe_id: i64,
    pub rank: i64,
    pub abbrev: String,
    pub priority: i64,
    pub instance_hash: String,
    pub short_message: String,
    pub long_message: String,
    pub class_name: String,
    pub method_name: String,
    pub source_line: SourceLine,
}

/// Parses every `BugInstance` element of a report.
///
/// Missing attributes default to empty or zero; a numeric attribute that
/// doesn't parse is an error.
pub fn parse_report(xml: &str) -> Result<Vec<BugInstance>, AnalyzerError> {
    let doc = Document::parse(xml).map_err(|e| AnalyzerError::Report(e.to_string()))?;

    doc.root_element()
        .children()
        .filter(|n| n.has_tag_name("BugInstance"))
        .map(parse_bug_instance)
        .collect()
}

fn parse_bug_instance(node: Node) -> Result<BugInstance, AnalyzerError> {
    let class_name = first_child(node, "Class")
        .and_then(|c| c.attribute("classname"))
        .unwrap_or_default()
        .to_string();
    let method_name = first_child(node, "Method")
        .and_then(|m| m.attribute("name"))
        .unwrap_or_default()
        .to_string();

    let source_line = match primary_source_line(node) {
        Some(line) => SourceLine {
            start: number(line, "start")?,
            end: number(line, "end")?,
            source_path: text_attr(line, "sourcepath"),
        },
        None => SourceLine::default(),
    };

    Ok(BugInstance {
        bug_type: text_attr(node, "type"),
        cwe_id: number(node, "cweid")?,
        rank: number(node, "rank")?,
        abbrev: text_attr(node, "abbrev"),
        priority: number(node, "priority")?,
        instance_hash: text_attr(node, "instanceHash"),
        short_message: child_text(node, "ShortMessage"),
        long_message: child_text(node, "LongMessage"),
        class_name,
        method_name,
        source_line,
    })
}

fn first_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.has_tag_name(tag))
}

/// The bug's own `SourceLine` (a direct child, the one flagged primary
/// when there are several), not the ones nested under `Class`/`Method`.
fn primary_source_line<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    let mut lines = node.children().filter(|c| c.has_tag_name("SourceLine"));
    let first = lines.next()?;
    if first.attribute("primary") == Some("true") {
        return Some(first);
    }
    Some(
        lines
            .find(|l| l.attribute("primary") == Some("true"))
            .unwrap_or(first),
    )
}

fn child_text(node: Node, tag: &str) -> String {
    first_child(node, tag)
        .and_then(|c| c.text())
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

fn text_attr(node: Node, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

fn number<T>(node: Node, name: &str) -> Result<T, AnalyzerError>
where
    T: FromStr + Default,
    T::Err: std::fmt::Display,
{
    match node.attribute(name) {
        None => Ok(T::default()),
        Some(value) => value.trim().parse().map_err(|e| {
            AnalyzerError::Report(format!(
                "invalid {} attribute '{}' on <{}>: {}",
                name,
                value,
                node.tag_name().name(),
                e
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<BugCollection version="4.0.2" sequence="0" timestamp="1527802621000">
  <Project projectName="java-maven">
    <Jar>/repo/target/classes</Jar>
  </Project>
  <BugInstance instanceHash="e6449b89335daf53c0db4c0219bc1634" cweid="353" rank="10" abbrev="CIPINT" category="SECURITY" priority="1" type="CIPHER_INTEGRITY">
    <ShortMessage>Cipher with no integrity</ShortMessage>
    <LongMessage>The cipher does not provide data integrity</LongMessage>
    <Class classname="com.acme.App" primary="true">
      <SourceLine classname="com.acme.App" start="14" end="48" sourcepath="com/acme/App.java" sourcefile="App.java"/>
    </Class>
    <Method classname="com.acme.App" name="insecureCypher" signature="()V" primary="true">
      <SourceLine classname="com.acme.App" start="29" end="37" sourcepath="com/acme/App.java"/>
    </Method>
    <SourceLine classname="com.acme.App" start="29" end="29" sourcepath="com/acme/App.java" primary="true">
      <Message>At App.java:[line 29]</Message>
    </SourceLine>
  </BugInstance>
  <BugInstance instanceHash="818bf5dacb291e15d9e6dc3c5ac32178" rank="12" abbrev="SECPR" priority="2" type="PREDICTABLE_RANDOM">
    <ShortMessage>Predictable pseudorandom number generator</ShortMessage>
    <LongMessage>The use of java.util.Random is predictable</LongMessage>
    <Class classname="com.acme.Tokens"/>
  </BugInstance>
  <BugPattern type="CIPHER_INTEGRITY" abbrev="CIPINT" category="SECURITY"/>
</BugCollection>
"#;

    #[test]
    fn test_parse_report() {
        let bugs = parse_report(REPORT).unwrap();
        assert_eq!(bugs.len(), 2);

        let first = &bugs[0];
        assert_eq!(first.bug_type, "CIPHER_INTEGRITY");
        assert_eq!(first.cwe_id, 353);
        assert_eq!(first.rank, 10);
        assert_eq!(first.priority, 1);
        assert_eq!(first.abbrev, "CIPINT");
        assert_eq!(first.instance_hash, "e6449b89335daf53c0db4c0219bc1634");
        assert_eq!(first.short_message, "Cipher with no integrity");
        assert_eq!(first.long_message, "The cipher does not provide data integrity");
        assert_eq!(first.class_name, "com.acme.App");
        assert_eq!(first.method_name, "insecureCypher");
        assert_eq!(
            first.source_line,
            SourceLine {
                start: 29,
                end: 29,
                source_path: "com/acme/App.java".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let bugs = parse_report(REPORT).unwrap();
        let second = &bugs[1];

        assert_eq!(second.cwe_id, 0);
        assert_eq!(second.method_name, "");
        assert_eq!(second.source_line, SourceLine::default());
    }

    #[test]
    fn test_empty_collection() {
        let bugs = parse_report("<BugCollection/>").unwrap();
        assert!(bugs.is_empty());
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse_report("<BugCollection><BugInstance></BugCollection>").unwrap_err();
        assert!(matches!(err, AnalyzerError::Report(_)));
    }

    #[test]
    fn test_invalid_number() {
        let err = parse_report(r#"<BugCollection><BugInstance rank="high"/></BugCollection>"#)
            .unwrap_err();
        assert!(err.to_string().contains("rank"));
    }
}
