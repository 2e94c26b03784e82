// vidsqueeze-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use vidsqueeze_core::config::{
    DEFAULT_FRAME_RATE_LIMIT, DEFAULT_MAIN_PRESET, DEFAULT_MAIN_QUALITY, DEFAULT_SHORT_SIDE_LIMIT,
    DEFAULT_STRONGER_PRESET, DEFAULT_STRONGER_QUALITY,
};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Vidsqueeze: two-pass video library compression",
    long_about = "Re-encodes a video library to AV1 with ffmpeg, keeps only results that are \
                  no larger than their originals, and retries the rest with a stronger profile."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write a run log file into this directory
    #[arg(long, global = true, value_name = "LOG_DIR", env = "VIDSQUEEZE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Runs the main pass over a library, then the stronger pass over what grew
    Encode(EncodeArgs),
    /// Runs only the stronger pass over the existing needs-stronger tree
    Stronger(StrongerArgs),
}

#[derive(Args, Debug, Clone)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub library: LibraryArgs,

    /// Stop after the main pass
    #[arg(long, env = "VIDSQUEEZE_SKIP_STRONGER")]
    pub skip_stronger: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StrongerArgs {
    #[command(flatten)]
    pub library: LibraryArgs,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct LibraryArgs {
    /// Root directory of the library to compress (never modified)
    #[arg(required = true, value_name = "SOURCE", env = "VIDSQUEEZE_SOURCE")]
    pub source_root: PathBuf,

    // --- Holding areas ---
    /// Finalized artifacts (default: <SOURCE>_final)
    #[arg(long, value_name = "DIR", env = "VIDSQUEEZE_FINAL_DIR")]
    pub final_dir: Option<PathBuf>,

    /// Copies of originals that failed (default: <SOURCE>_failed)
    #[arg(long, value_name = "DIR", env = "VIDSQUEEZE_FAILED_DIR")]
    pub failed_dir: Option<PathBuf>,

    /// Best attempt for files that did not shrink (default: <SOURCE>_larger)
    #[arg(long, value_name = "DIR", env = "VIDSQUEEZE_LARGER_DIR")]
    pub larger_dir: Option<PathBuf>,

    /// Copies of originals awaiting the stronger pass (default: <SOURCE>_needs_stronger)
    #[arg(long, value_name = "DIR", env = "VIDSQUEEZE_NEEDS_STRONGER_DIR")]
    pub needs_stronger_dir: Option<PathBuf>,

    /// Base directory for scratch files (default: parent of SOURCE)
    #[arg(long, value_name = "DIR", env = "VIDSQUEEZE_TEMP_DIR")]
    pub temp_dir: Option<PathBuf>,

    // --- Limits ---
    /// Shorter side of the output frame in pixels
    #[arg(long, value_name = "PIXELS", env = "VIDSQUEEZE_SHORT_SIDE",
          default_value_t = DEFAULT_SHORT_SIDE_LIMIT,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub short_side: u32,

    /// Frame rates above this value are capped to it
    #[arg(long, value_name = "FPS", env = "VIDSQUEEZE_MAX_FPS",
          default_value_t = DEFAULT_FRAME_RATE_LIMIT,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub max_fps: u32,

    // --- Profiles ---
    /// CRF for the main pass (0-63, lower is better quality)
    #[arg(long, value_name = "CRF", env = "VIDSQUEEZE_QUALITY",
          default_value_t = DEFAULT_MAIN_QUALITY,
          value_parser = clap::value_parser!(u8).range(0..=63))]
    pub quality: u8,

    /// libsvtav1 preset for the main pass (0-13, lower is slower)
    #[arg(long, value_name = "PRESET", env = "VIDSQUEEZE_PRESET",
          default_value_t = DEFAULT_MAIN_PRESET,
          value_parser = clap::value_parser!(u8).range(0..=13))]
    pub preset: u8,

    /// CRF for the stronger pass (0-63)
    #[arg(long, value_name = "CRF", env = "VIDSQUEEZE_STRONGER_QUALITY",
          default_value_t = DEFAULT_STRONGER_QUALITY,
          value_parser = clap::value_parser!(u8).range(0..=63))]
    pub stronger_quality: u8,

    /// libsvtav1 preset for the stronger pass (0-13)
    #[arg(long, value_name = "PRESET", env = "VIDSQUEEZE_STRONGER_PRESET",
          default_value_t = DEFAULT_STRONGER_PRESET,
          value_parser = clap::value_parser!(u8).range(0..=13))]
    pub stronger_preset: u8,

    // --- Output ---
    /// Write the run report as JSON to this file
    #[arg(long, value_name = "PATH", env = "VIDSQUEEZE_JSON_REPORT")]
    pub json_report: Option<PathBuf>,

    /// Never draw a progress bar
    #[arg(long)]
    pub no_progress: bool,
}
