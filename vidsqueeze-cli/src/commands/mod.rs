//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command. Both
//! commands share the translation of `LibraryArgs` into a validated
//! `CoreConfig`.

pub mod encode;
pub mod stronger;

use log::{debug, info};
use vidsqueeze_core::{CoreConfig, CoreConfigBuilder, check_dependency, terminal};

use crate::cli::LibraryArgs;
use crate::error::CliResult;

/// Builds and validates the core configuration from the shared options.
pub fn build_config(args: &LibraryArgs) -> CliResult<CoreConfig> {
    let mut builder = CoreConfigBuilder::new()
        .source_root(args.source_root.clone())
        .short_side_limit(args.short_side)
        .frame_rate_limit(args.max_fps)
        .main_profile(args.quality, args.preset)
        .stronger_profile(args.stronger_quality, args.stronger_preset);

    if let Some(dir) = &args.final_dir {
        builder = builder.final_root(dir.clone());
    }
    if let Some(dir) = &args.failed_dir {
        builder = builder.failed_root(dir.clone());
    }
    if let Some(dir) = &args.larger_dir {
        builder = builder.larger_root(dir.clone());
    }
    if let Some(dir) = &args.needs_stronger_dir {
        builder = builder.needs_stronger_root(dir.clone());
    }
    if let Some(dir) = &args.temp_dir {
        builder = builder.temp_dir(dir.clone());
    }

    let config = builder.build()?;
    config.validate()?;
    debug!("Configuration: {config:?}");
    Ok(config)
}

/// Fails fast when ffmpeg or ffprobe is not installed.
pub fn check_tools() -> CliResult<()> {
    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")?;
    Ok(())
}

/// Logs the resolved run settings.
pub(crate) fn print_settings(config: &CoreConfig) {
    terminal::print_section("Settings");
    terminal::print_status("Source", &config.source_root.display().to_string(), false);
    for (name, root) in config.layout.roots() {
        terminal::print_status(name, &root.display().to_string(), false);
    }
    terminal::print_status(
        "Limits",
        &format!("{}p short side, {} fps", config.short_side_limit, config.frame_rate_limit),
        false,
    );
    terminal::print_status("Main profile", &config.main_profile.to_string(), false);
    terminal::print_status("Stronger profile", &config.stronger_profile.to_string(), false);
    info!("");
}
