//! Report generation

pub mod convert;
pub mod schema;

pub use convert::{convert_xml, to_issue, to_report};
pub use schema::{Confidence, Identifier, Issue, Location, Report, Scanner, Severity, Vendor};
