//! RedAlert CLI — drive an alert switch on a persisted colony map.

use std::path::PathBuf;

use clap::Parser;

mod cli;
mod sound;

#[derive(Parser)]
#[command(
    name = "redalert-cli",
    version,
    about = "Alert switch that floods a colony map with red light"
)]
struct Args {
    /// Output as JSON (for status, config and the switch commands)
    #[arg(long, global = true)]
    json: bool,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default one
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Map snapshot to operate on (overrides `state_file` from the config)
    #[arg(long, global = true, value_name = "PATH")]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: cli::Command,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let opts = cli::GlobalOpts {
        json: args.json,
        config: args.config,
        state: args.state,
    };

    if let Err(e) = cli::run(args.command, &opts) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
