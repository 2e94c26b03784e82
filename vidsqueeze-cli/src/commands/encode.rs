//! Implementation of the 'encode' subcommand.
//!
//! Discovers the library, runs the main pass and then the stronger pass, and
//! renders the run report.

use std::path::Path;
use std::time::Instant;

use log::info;
use vidsqueeze_core::external::{FfmpegEncoder, FfprobeMediaProbe};
use vidsqueeze_core::{
    CoreError, RunOptions, find_processable_files, format_bytes, format_duration, process_videos,
    terminal,
};

use super::{build_config, check_tools, print_settings};
use crate::cli::EncodeArgs;
use crate::error::CliResult;
use crate::output;

/// Runs the full two-pass pipeline over one library.
pub fn run_encode(args: EncodeArgs, log_path: Option<&Path>) -> CliResult<()> {
    let started = Instant::now();
    let config = build_config(&args.library)?;

    let items = match find_processable_files(&config.source_root, &config.layout) {
        Ok(items) => items,
        Err(CoreError::NoFilesFound) => {
            info!(
                "No processable video files found in {}",
                config.source_root.display()
            );
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    check_tools()?;
    print_settings(&config);
    if let Some(path) = log_path {
        terminal::print_status("Run log", &path.display().to_string(), false);
    }

    let total: u64 = items.iter().map(|item| item.size).sum();
    terminal::print_status(
        "Discovered",
        &format!("{} file(s), {}", items.len(), format_bytes(total)),
        true,
    );

    let probe = FfprobeMediaProbe::new();
    let encoder = FfmpegEncoder::new().show_progress(!args.library.no_progress);
    let options = RunOptions {
        skip_stronger: args.skip_stronger,
    };
    let report = process_videos(&probe, &encoder, &config, &items, options)?;

    output::print_report(&report);
    if let Some(path) = &args.library.json_report {
        output::write_json_report(&report, path)?;
    }

    terminal::print_success(&format!(
        "Encode run finished in {}",
        format_duration(started.elapsed().as_secs_f64())
    ));
    Ok(())
}
