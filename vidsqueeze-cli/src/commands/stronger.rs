//! Implementation of the 'stronger' subcommand.
//!
//! Works through a needs-stronger tree left by an earlier `encode
//! --skip-stronger` run without touching the main pass.

use std::path::Path;

use vidsqueeze_core::external::{FfmpegEncoder, FfprobeMediaProbe};
use vidsqueeze_core::processing::filing::scan_relative;
use vidsqueeze_core::{process_stronger_backlog, terminal};

use super::{build_config, check_tools, print_settings};
use crate::cli::StrongerArgs;
use crate::error::CliResult;
use crate::output;

/// Runs only the stronger pass.
pub fn run_stronger(args: StrongerArgs, log_path: Option<&Path>) -> CliResult<()> {
    let config = build_config(&args.library)?;

    let backlog = scan_relative(&config.layout.needs_stronger_root)?;
    if backlog.is_empty() {
        terminal::print_success(&format!(
            "Nothing waiting in {}",
            config.layout.needs_stronger_root.display()
        ));
        return Ok(());
    }

    check_tools()?;
    print_settings(&config);
    if let Some(path) = log_path {
        terminal::print_status("Run log", &path.display().to_string(), false);
    }
    terminal::print_status("Waiting", &format!("{} file(s)", backlog.len()), true);

    let probe = FfprobeMediaProbe::new();
    let encoder = FfmpegEncoder::new().show_progress(!args.library.no_progress);
    let report = process_stronger_backlog(&probe, &encoder, &config)?;

    output::print_report(&report);
    if let Some(path) = &args.library.json_report {
        output::write_json_report(&report, path)?;
    }
    Ok(())
}
