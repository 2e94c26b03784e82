//! Temporary file management utilities.
//!
//! Encoder output is written into a per-run scratch directory and promoted
//! into a holding area only once the attempt is complete. The directory is a
//! [`TempDir`], so it is removed when the run ends, even on error.

use crate::config::CoreConfig;
use crate::error::CoreResult;
use std::path::{Path, PathBuf};
use tempfile::{Builder as TempFileBuilder, TempDir};

/// Prefix of the per-run scratch directory.
pub const SCRATCH_PREFIX: &str = ".vidsqueeze_scratch_";

/// Creates the per-run scratch directory under [`CoreConfig::scratch_base`].
pub fn create_scratch_dir(config: &CoreConfig) -> CoreResult<TempDir> {
    let base = config.scratch_base();
    std::fs::create_dir_all(&base)?;

    let dir = TempFileBuilder::new().prefix(SCRATCH_PREFIX).tempdir_in(&base)?;
    log::debug!("Scratch directory: {}", dir.path().display());
    Ok(dir)
}

/// Returns a scratch file path with a random suffix. Does not create the file.
pub fn create_temp_file_path(dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    use rand::distributions::Alphanumeric;
    use rand::{Rng, thread_rng};

    let random_suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    let filename = format!("{prefix}_{random_suffix}.{extension}");
    dir.join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_dir_uses_configured_base() {
        let base = tempfile::tempdir().unwrap();
        let mut config = CoreConfig::new(base.path().join("library"));
        config.temp_dir = Some(base.path().join("scratch"));

        let scratch = create_scratch_dir(&config).unwrap();
        assert!(scratch.path().starts_with(base.path().join("scratch")));
        let name = scratch.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(SCRATCH_PREFIX));

        let kept = scratch.path().to_path_buf();
        drop(scratch);
        assert!(!kept.exists());
    }

    #[test]
    fn test_temp_file_path_is_unique() {
        let dir = Path::new("/tmp/x");
        let a = create_temp_file_path(dir, "main", "mp4");
        let b = create_temp_file_path(dir, "main", "mp4");
        assert_ne!(a, b);
        assert_eq!(a.extension().unwrap(), "mp4");
        assert!(a.file_name().unwrap().to_string_lossy().starts_with("main_"));
    }
}
