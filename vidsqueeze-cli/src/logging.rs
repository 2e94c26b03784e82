// ============================================================================
// vidsqueeze-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and Run Log File
//
// Without a log directory the CLI uses env_logger, honouring RUST_LOG. With
// one, a fern dispatch writes plain messages to stderr and timestamped lines
// with ANSI codes stripped to `vidsqueeze_<command>_<timestamp>.log`.
//
// USAGE:
// - RUST_LOG=info (default): Normal operation logs
// - RUST_LOG=debug or -v: Detailed debugging information
// - RUST_LOG=trace: ffmpeg log lines as well

use crate::error::{CliErrorContext, CliResult};

use log::LevelFilter;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use vidsqueeze_core::CoreError;

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let log_filename = format!("vidsqueeze_encode_{}.log", vidsqueeze_cli::logging::get_timestamp());
/// assert!(log_filename.ends_with(".log"));
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Installs the global logger. Returns the run log path when one is written.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>, command: &str) -> CliResult<Option<PathBuf>> {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    let Some(log_dir) = log_dir else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
            .format(|buf, record| writeln!(buf, "{}", record.args()))
            .init();
        return Ok(None);
    };

    fs::create_dir_all(log_dir)
        .cli_with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join(format!("vidsqueeze_{}_{}.log", command, get_timestamp()));
    let log_file = fern::log_file(&log_path)
        .cli_with_context(|| format!("Failed to create log file {}", log_path.display()))?;

    let console = fern::Dispatch::new()
        .format(|out, message, _record| out.finish(format_args!("{message}")))
        .chain(std::io::stderr());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            let plain = strip_ansi_escapes::strip_str(message.to_string());
            out.finish(format_args!(
                "{} {:<5} {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                plain
            ))
        })
        .chain(log_file);

    fern::Dispatch::new()
        .level(level)
        .level_for("ffmpeg_log", if verbose { LevelFilter::Trace } else { LevelFilter::Warn })
        .chain(console)
        .chain(file)
        .apply()
        .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize logging: {e}")))?;

    Ok(Some(log_path))
}
