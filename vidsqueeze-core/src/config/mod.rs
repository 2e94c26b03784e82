//! Configuration structures and constants for the vidsqueeze-core library.
//!
//! This module provides the configuration for a run: where the source library
//! lives, where the four holding areas are, the shared downscale and frame-rate
//! limits, and the two encode profiles (main and stronger).

mod builder;

use std::fmt;
use std::path::PathBuf;

use log::warn;
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::processing::filing::FilingLayout;

pub use builder::CoreConfigBuilder;

// Default constants

/// Default limit for the shorter side of the output frame, in pixels.
pub const DEFAULT_SHORT_SIDE_LIMIT: u32 = 720;

/// Default frame-rate cap, in frames per second.
pub const DEFAULT_FRAME_RATE_LIMIT: u32 = 30;

/// Default CRF for the main pass.
/// Range: 0-63, lower values produce higher quality but larger files.
pub const DEFAULT_MAIN_QUALITY: u8 = 30;

/// Default encoder preset for the main pass (0-13, lower is slower/denser).
pub const DEFAULT_MAIN_PRESET: u8 = 8;

/// Default CRF for the stronger pass. Higher than the main pass so the
/// second attempt trades quality for size.
pub const DEFAULT_STRONGER_QUALITY: u8 = 38;

/// Default encoder preset for the stronger pass. Slower than the main pass
/// for better compression efficiency.
pub const DEFAULT_STRONGER_PRESET: u8 = 5;

/// Highest CRF accepted by the encoder.
pub const MAX_QUALITY: u8 = 63;

/// Highest preset accepted by the encoder.
pub const MAX_PRESET: u8 = 13;

/// Quality/speed pair for one encode attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncodeProfile {
    /// Constant rate factor (0-63, lower = better quality)
    pub quality: u8,

    /// Encoder preset (0-13, lower = slower and denser)
    pub preset: u8,
}

impl EncodeProfile {
    pub const fn new(quality: u8, preset: u8) -> Self {
        Self { quality, preset }
    }

    /// The default profile used by the main pass.
    pub const fn main() -> Self {
        Self::new(DEFAULT_MAIN_QUALITY, DEFAULT_MAIN_PRESET)
    }

    /// The default profile used by the stronger pass.
    pub const fn stronger() -> Self {
        Self::new(DEFAULT_STRONGER_QUALITY, DEFAULT_STRONGER_PRESET)
    }

    fn validate(&self, name: &str) -> CoreResult<()> {
        if self.quality > MAX_QUALITY {
            return Err(CoreError::Config(format!(
                "{name} quality (CRF) must be between 0 and {MAX_QUALITY}, got {}",
                self.quality
            )));
        }
        if self.preset > MAX_PRESET {
            return Err(CoreError::Config(format!(
                "{name} preset must be between 0 and {MAX_PRESET}, got {}",
                self.preset
            )));
        }
        Ok(())
    }
}

impl fmt::Display for EncodeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "crf {} / preset {}", self.quality, self.preset)
    }
}

/// Main configuration structure for the vidsqueeze-core library.
///
/// Created by the consumer of the library (e.g., vidsqueeze-cli) and passed to
/// [`crate::process_videos`]. Only `source_root` is required; everything else
/// has a documented default.
///
/// # Examples
///
/// ```rust,no_run
/// use vidsqueeze_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .source_root(PathBuf::from("/media/library"))
///     .short_side_limit(720)
///     .frame_rate_limit(30)
///     .main_profile(30, 8)
///     .stronger_profile(38, 5)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Root of the library being compressed. Never modified by a run.
    pub source_root: PathBuf,

    /// The four holding areas the pipeline files items into
    pub layout: FilingLayout,

    /// Shorter output side in pixels; larger sources are downscaled to it
    pub short_side_limit: u32,

    /// Frame rates above this value are capped to it
    pub frame_rate_limit: u32,

    /// Profile used for the first attempt on every file
    pub main_profile: EncodeProfile,

    /// Profile used for the second attempt on files that grew
    pub stronger_profile: EncodeProfile,

    /// Base directory for per-run scratch files (defaults to the parent of `source_root`)
    pub temp_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Creates a configuration with default limits and profiles and the
    /// holding areas placed beside `source_root`.
    pub fn new(source_root: PathBuf) -> Self {
        let layout = FilingLayout::beside(&source_root);
        Self {
            source_root,
            layout,
            short_side_limit: DEFAULT_SHORT_SIDE_LIMIT,
            frame_rate_limit: DEFAULT_FRAME_RATE_LIMIT,
            main_profile: EncodeProfile::main(),
            stronger_profile: EncodeProfile::stronger(),
            temp_dir: None,
        }
    }

    /// Directory under which the per-run scratch directory is created.
    pub fn scratch_base(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(|| {
            self.source_root
                .parent()
                .map(PathBuf::from)
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }

    /// Validates the configuration before any file is touched.
    ///
    /// Every error returned here is fatal for the run.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.source_root.is_dir() {
            return Err(CoreError::Config(format!(
                "Source root '{}' does not exist or is not a directory",
                self.source_root.display()
            )));
        }

        if self.short_side_limit == 0 {
            return Err(CoreError::Config(
                "Short side limit must be a positive integer".to_string(),
            ));
        }

        if self.frame_rate_limit == 0 {
            return Err(CoreError::Config(
                "Frame rate limit must be a positive integer".to_string(),
            ));
        }

        self.main_profile.validate("Main")?;
        self.stronger_profile.validate("Stronger")?;

        for (name, root) in self.layout.roots() {
            if root == self.source_root {
                return Err(CoreError::Config(format!(
                    "The {name} tree must not be the source root '{}'",
                    root.display()
                )));
            }
        }

        if self.stronger_profile.quality <= self.main_profile.quality
            && self.stronger_profile.preset >= self.main_profile.preset
        {
            warn!(
                "Stronger profile ({}) is not more aggressive than the main profile ({})",
                self.stronger_profile, self.main_profile
            );
        }

        Ok(())
    }
}
