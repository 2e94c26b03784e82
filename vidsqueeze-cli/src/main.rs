// vidsqueeze-cli/src/main.rs
//
// Entry point for the vidsqueeze binary: parses arguments, installs logging
// and dispatches to the command implementations. Any error ends the process
// with exit code 1.

use clap::Parser;
use console::style;
use std::process;

use vidsqueeze_cli::logging::init_logging;
use vidsqueeze_cli::{Cli, Commands, run_encode, run_stronger};
use vidsqueeze_core::CoreResult;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {e}", style("Error:").red().bold());
        process::exit(1);
    }
}

fn run(cli: Cli) -> CoreResult<()> {
    let command_name = match &cli.command {
        Commands::Encode(_) => "encode",
        Commands::Stronger(_) => "stronger",
    };
    let log_path = init_logging(cli.verbose, cli.log_dir.as_deref(), command_name)?;

    match cli.command {
        Commands::Encode(args) => run_encode(args, log_path.as_deref()),
        Commands::Stronger(args) => run_stronger(args, log_path.as_deref()),
    }
}
