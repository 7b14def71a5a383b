//! osu-analyzer - Replay hit error analysis for osu!
//!
//! Usage:
//!   osu-analyzer replay <file.osr>                 Show a replay summary
//!   osu-analyzer beatmap <file.osu>                Show a beatmap summary
//!   osu-analyzer analyze <file.osr> <file.osu>     Measure hit errors
//!   osu-analyzer list                              List configured replays and beatmaps
//!   osu-analyzer --help                            Show help

use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        cli::print_help();
        return Ok(());
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("osu-analyzer v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    match cli::parse_args(&args) {
        Ok((command, options)) => {
            init_logging(options.verbose);
            cli::run(command, options)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            cli::print_help();
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    // Logging is simply disabled if a subscriber is already installed
    let _ = tracing::subscriber::set_global_default(subscriber);
}
