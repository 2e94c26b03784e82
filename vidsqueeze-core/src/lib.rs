//! Core library for two-pass adaptive video compression using ffmpeg and ffprobe.
//!
//! A run discovers the videos below a source root, encodes each one with the
//! main profile and keeps the result only if it is no larger than the
//! original. Files that grew are retried once with a stronger profile. Every
//! item ends the run in exactly one holding area (final, failed, larger or
//! needs-stronger); the source tree itself is never modified.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vidsqueeze_core::{CoreConfig, find_processable_files, process_videos};
//! use vidsqueeze_core::external::{FfmpegEncoder, FfprobeMediaProbe};
//! use vidsqueeze_core::processing::RunOptions;
//! use std::path::PathBuf;
//!
//! let mut config = CoreConfig::new(PathBuf::from("/path/to/library"));
//! config.short_side_limit = 720;
//! config.frame_rate_limit = 30;
//! config.validate().unwrap();
//!
//! let items = find_processable_files(&config.source_root, &config.layout).unwrap();
//! let report = process_videos(
//!     &FfprobeMediaProbe::new(),
//!     &FfmpegEncoder::new().show_progress(true),
//!     &config,
//!     &items,
//!     RunOptions::default(),
//! )
//! .unwrap();
//! println!("{} finalized, {} failed", report.statistics.finalized, report.statistics.failed);
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod processing;
pub mod progress;
pub mod temp_files;
pub mod terminal;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder, EncodeProfile};
pub use discovery::{SourceItem, find_processable_files};
pub use error::{CoreError, CoreResult};
pub use external::{Encoder, EncodeRequest, MediaProbe, check_dependency};
pub use processing::{
    FilingLayout, FilingState, RunOptions, RunReport, RunStatistics, process_stronger_backlog,
    process_videos,
};
pub use utils::{calculate_size_reduction, format_bytes, format_duration, parse_ffmpeg_time};
