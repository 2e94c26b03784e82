// ============================================================================
// vidsqueeze-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent construction of CoreConfig. The source root is the only required
// field; holding-area overrides are applied on top of the default layout that
// places every tree beside the source root.

use std::path::PathBuf;

use super::{CoreConfig, EncodeProfile};
use crate::error::{CoreError, CoreResult};
use crate::processing::filing::FilingLayout;

/// Builder for creating CoreConfig instances.
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    source_root: Option<PathBuf>,

    // Holding-area overrides
    final_root: Option<PathBuf>,
    failed_root: Option<PathBuf>,
    larger_root: Option<PathBuf>,
    needs_stronger_root: Option<PathBuf>,
    temp_dir: Option<PathBuf>,

    short_side_limit: Option<u32>,
    frame_rate_limit: Option<u32>,
    main_profile: Option<EncodeProfile>,
    stronger_profile: Option<EncodeProfile>,
}

impl CoreConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root of the library to compress.
    pub fn source_root(mut self, source_root: PathBuf) -> Self {
        self.source_root = Some(source_root);
        self
    }

    /// Overrides where finalized artifacts are written.
    pub fn final_root(mut self, dir: PathBuf) -> Self {
        self.final_root = Some(dir);
        self
    }

    /// Overrides where originals of failed items are copied.
    pub fn failed_root(mut self, dir: PathBuf) -> Self {
        self.failed_root = Some(dir);
        self
    }

    /// Overrides where artifacts that did not shrink are kept.
    pub fn larger_root(mut self, dir: PathBuf) -> Self {
        self.larger_root = Some(dir);
        self
    }

    /// Overrides where originals awaiting the stronger pass are copied.
    pub fn needs_stronger_root(mut self, dir: PathBuf) -> Self {
        self.needs_stronger_root = Some(dir);
        self
    }

    /// Sets the base directory for scratch files.
    pub fn temp_dir(mut self, dir: PathBuf) -> Self {
        self.temp_dir = Some(dir);
        self
    }

    pub fn short_side_limit(mut self, pixels: u32) -> Self {
        self.short_side_limit = Some(pixels);
        self
    }

    pub fn frame_rate_limit(mut self, fps: u32) -> Self {
        self.frame_rate_limit = Some(fps);
        self
    }

    pub fn main_profile(mut self, quality: u8, preset: u8) -> Self {
        self.main_profile = Some(EncodeProfile::new(quality, preset));
        self
    }

    pub fn stronger_profile(mut self, quality: u8, preset: u8) -> Self {
        self.stronger_profile = Some(EncodeProfile::new(quality, preset));
        self
    }

    /// Builds the configuration. Fails only when no source root was given;
    /// call [`CoreConfig::validate`] to check the values themselves.
    pub fn build(self) -> CoreResult<CoreConfig> {
        let source_root = self
            .source_root
            .ok_or_else(|| CoreError::Config("A source root is required".to_string()))?;

        let mut config = CoreConfig::new(source_root);
        let FilingLayout {
            final_root,
            failed_root,
            larger_root,
            needs_stronger_root,
        } = config.layout.clone();

        config.layout = FilingLayout {
            final_root: self.final_root.unwrap_or(final_root),
            failed_root: self.failed_root.unwrap_or(failed_root),
            larger_root: self.larger_root.unwrap_or(larger_root),
            needs_stronger_root: self.needs_stronger_root.unwrap_or(needs_stronger_root),
        };
        config.temp_dir = self.temp_dir;

        if let Some(pixels) = self.short_side_limit {
            config.short_side_limit = pixels;
        }
        if let Some(fps) = self.frame_rate_limit {
            config.frame_rate_limit = fps;
        }
        if let Some(profile) = self.main_profile {
            config.main_profile = profile;
        }
        if let Some(profile) = self.stronger_profile {
            config.stronger_profile = profile;
        }

        Ok(config)
    }
}
