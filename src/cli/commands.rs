use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Security scanner for JVM projects built with Maven, Gradle, SBT or Ant
#[derive(Parser, Debug)]
#[command(
    name = "jvmscan",
    about = "Security scanner for JVM projects built with Maven, Gradle, SBT or Ant",
    version,
    author,
    long_about = "jvmscan finds every JVM project in a repository, compiles it with the \
                  build tool it declares, runs SpotBugs with the Find Security Bugs plugin \
                  over the compiled classes and writes a security report with paths \
                  relative to the repository."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Build and scan every project in a repository",
        long_about = "Discovers projects, builds each one with its build tool, runs SpotBugs \
                      and writes the security report.\n\n\
                      Examples:\n  \
                      jvmscan analyze\n  \
                      jvmscan analyze /path/to/repo\n  \
                      jvmscan analyze --no-compile --format yaml\n  \
                      jvmscan analyze --fail-never -o gl-sast-report.json"
    )]
    Analyze(AnalyzeArgs),

    #[command(
        about = "List the projects found in a repository",
        long_about = "Walks the repository and prints each project root with the build tool \
                      that would build it and the Java packages it declares. Nothing is \
                      built.\n\n\
                      Examples:\n  \
                      jvmscan detect\n  \
                      jvmscan detect /path/to/repo --format json"
    )]
    Detect(DetectArgs),

    #[command(
        about = "Check whether a file name marks a project root",
        long_about = "Exits with status 0 when FILE_NAME is the signature file of a supported \
                      build tool and 1 otherwise.\n\n\
                      Examples:\n  \
                      jvmscan match pom.xml\n  \
                      jvmscan match build.sbt"
    )]
    Match(MatchArgs),

    #[command(
        about = "Convert a SpotBugs XML report into a security report",
        long_about = "Reads an existing SpotBugs XML report and converts it without building \
                      or analyzing anything.\n\n\
                      Examples:\n  \
                      jvmscan convert SpotBugs.xml\n  \
                      jvmscan convert SpotBugs.xml --prepend-path services/api"
    )]
    Convert(ConvertArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to repository (defaults to current directory)"
    )]
    pub repository_path: Option<PathBuf>,

    #[arg(long, help = "Analyze existing class files without building")]
    pub no_compile: bool,

    #[arg(long, help = "Keep going when a project fails to build")]
    pub fail_never: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "json",
        help = "Report format"
    )]
    pub format: ReportFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the report to file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PREFIX",
        default_value = "",
        help = "Prefix added to every file path in the report"
    )]
    pub prepend_path: String,

    #[command(flatten)]
    pub tools: ToolArgs,
}

/// Build tool and JVM overrides. Each falls back to its environment
/// variable, then to the built-in default.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolArgs {
    #[arg(long, env = "ANT_PATH", value_name = "PATH", help = "Ant executable")]
    pub ant_path: Option<String>,

    #[arg(long, env = "ANT_HOME", value_name = "DIR", help = "ANT_HOME passed to Ant")]
    pub ant_home: Option<String>,

    #[arg(long, env = "GRADLE_PATH", value_name = "PATH", help = "Gradle executable")]
    pub gradle_path: Option<String>,

    #[arg(long, env = "MAVEN_PATH", value_name = "PATH", help = "Maven executable")]
    pub maven_path: Option<String>,

    #[arg(
        long,
        env = "MAVEN_REPO_PATH",
        value_name = "DIR",
        help = "Maven local repository"
    )]
    pub maven_repo_path: Option<PathBuf>,

    #[arg(
        long,
        env = "MAVEN_CLI_OPTS",
        value_name = "OPTS",
        allow_hyphen_values = true,
        help = "Extra Maven arguments"
    )]
    pub maven_cli_opts: Option<String>,

    #[arg(long, env = "SBT_PATH", value_name = "PATH", help = "SBT executable")]
    pub sbt_path: Option<String>,

    #[arg(long, env = "JAVA_PATH", value_name = "PATH", help = "Java executable running SpotBugs")]
    pub java_path: Option<String>,

    #[arg(
        long,
        env = "JAVA_OPTS",
        value_name = "OPTS",
        allow_hyphen_values = true,
        help = "JVM options for SpotBugs"
    )]
    pub java_opts: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to repository (defaults to current directory)"
    )]
    pub repository_path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct MatchArgs {
    #[arg(value_name = "FILE_NAME", help = "Bare file name, e.g. pom.xml")]
    pub file_name: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    #[arg(value_name = "REPORT", help = "SpotBugs XML report")]
    pub report: PathBuf,

    #[arg(
        long,
        value_name = "PREFIX",
        default_value = "",
        help = "Prefix added to every file path in the report"
    )]
    pub prepend_path: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "json",
        help = "Report format"
    )]
    pub format: ReportFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the report to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

/// Reports are machine-readable only
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormatArg {
    Json,
    Yaml,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

impl From<ReportFormatArg> for super::output::OutputFormat {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Json => super::output::OutputFormat::Json,
            ReportFormatArg::Yaml => super::output::OutputFormat::Yaml,
        }
    }
}
