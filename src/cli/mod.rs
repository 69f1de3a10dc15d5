pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{AnalyzeArgs, CliArgs, Commands, ConvertArgs, DetectArgs, MatchArgs, ToolArgs};
pub use output::{OutputFormat, OutputFormatter, ProjectSummary};
