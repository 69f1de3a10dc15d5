use jvmscan::cli::commands::{CliArgs, Commands};
use jvmscan::cli::handlers::{handle_analyze, handle_convert, handle_detect, handle_match};
use jvmscan::util::logging::{self, LoggingConfig};
use jvmscan::VERSION;

use clap::Parser;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("jvmscan v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Analyze(analyze_args) => handle_analyze(analyze_args, args.quiet),
        Commands::Detect(detect_args) => handle_detect(detect_args),
        Commands::Match(match_args) => handle_match(match_args, args.quiet),
        Commands::Convert(convert_args) => handle_convert(convert_args, args.quiet),
    };

    std::process::exit(exit_code);
}

/// `--log-level` wins over `-v`/`-q`, which win over `JVMSCAN_LOG_LEVEL`
fn init_logging_from_args(args: &CliArgs) {
    if let Some(level_str) = &args.log_level {
        logging::with_level(level_str);
    } else if args.verbose {
        logging::init_logging(LoggingConfig::development());
    } else if args.quiet {
        logging::init_logging(LoggingConfig::with_level(Level::ERROR));
    } else {
        logging::init_from_env();
    }
}
