// ============================================================================
// vidsqueeze-core/src/processing/filing.rs
// ============================================================================
//
// FILING: Holding Areas and Their Filesystem Primitives
//
// Every source item ends a run in exactly one resting state. The state is
// tracked in memory by the pipeline as a `FilingState` and persisted by which
// holding area contains a copy:
//
//   Finalized          -> artifact in the final tree
//   Failed             -> original copied into the failed tree
//   PendingStronger    -> artifact in the larger tree + original in needs-stronger
//   StrongerExhausted  -> same layout, artifact refreshed by the stronger attempt
//
// All trees mirror the relative layout of the source root. Artifacts always
// carry the `.mp4` extension; copies of originals keep their own name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::{DirEntry, WalkDir};

use crate::error::{CoreError, CoreResult};

/// Extension of every artifact written by the encoder.
pub const ARTIFACT_EXTENSION: &str = "mp4";

/// Resting state of a source item after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingState {
    /// Final artifact in the output tree; no copies elsewhere
    Finalized,
    /// Original copied into the failed tree; no artifact produced
    Failed,
    /// Oversized artifact in the larger tree and original in the needs-stronger tree
    PendingStronger,
    /// Stronger attempt still did not beat the original; never retried in this run
    StrongerExhausted,
}

impl FilingState {
    pub fn label(&self) -> &'static str {
        match self {
            FilingState::Finalized => "finalized",
            FilingState::Failed => "failed",
            FilingState::PendingStronger => "pending stronger",
            FilingState::StrongerExhausted => "stronger exhausted",
        }
    }
}

/// Locations of the four holding areas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingLayout {
    /// Finalized artifacts
    pub final_root: PathBuf,
    /// Copies of originals that could not be probed or encoded
    pub failed_root: PathBuf,
    /// Best artifact so far for items that did not shrink
    pub larger_root: PathBuf,
    /// Copies of originals awaiting (or exhausted by) the stronger pass
    pub needs_stronger_root: PathBuf,
}

impl FilingLayout {
    /// Places every tree beside `source_root`, e.g. `/media/tv` gives
    /// `/media/tv_final`, `/media/tv_failed`, `/media/tv_larger` and
    /// `/media/tv_needs_stronger`.
    pub fn beside(source_root: &Path) -> Self {
        let name = source_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "library".to_string());
        let parent = source_root.parent().unwrap_or_else(|| Path::new(""));
        let sibling = |suffix: &str| parent.join(format!("{name}_{suffix}"));

        Self {
            final_root: sibling("final"),
            failed_root: sibling("failed"),
            larger_root: sibling("larger"),
            needs_stronger_root: sibling("needs_stronger"),
        }
    }

    /// Names and roots of every tree, in a fixed order.
    pub fn roots(&self) -> [(&'static str, &Path); 4] {
        [
            ("final", self.final_root.as_path()),
            ("failed", self.failed_root.as_path()),
            ("larger", self.larger_root.as_path()),
            ("needs-stronger", self.needs_stronger_root.as_path()),
        ]
    }

    /// Returns true if `path` is the root of one of the holding areas.
    pub fn is_filing_root(&self, path: &Path) -> bool {
        self.roots().iter().any(|(_, root)| *root == path)
    }

    /// Canonical location of the finalized artifact for a relative path.
    pub fn final_path(&self, relative: &Path) -> PathBuf {
        self.final_root.join(artifact_name(relative))
    }

    /// Location of the oversized artifact for a relative path.
    pub fn larger_path(&self, relative: &Path) -> PathBuf {
        self.larger_root.join(artifact_name(relative))
    }

    pub fn failed_path(&self, relative: &Path) -> PathBuf {
        self.failed_root.join(relative)
    }

    pub fn needs_stronger_path(&self, relative: &Path) -> PathBuf {
        self.needs_stronger_root.join(relative)
    }
}

/// `<relative path without extension>.mp4`
pub fn artifact_name(relative: &Path) -> PathBuf {
    relative.with_extension(ARTIFACT_EXTENSION)
}

/// Size of a file, or `None` if it cannot be read.
pub fn file_size(path: &Path) -> Option<u64> {
    fs::metadata(path).ok().filter(|m| m.is_file()).map(|m| m.len())
}

/// Copies `src` to `dest`, creating parent directories.
///
/// The data is written to a hidden sibling first and renamed into place, so
/// an interrupted copy never leaves a file at `dest`.
pub fn copy_into(src: &Path, dest: &Path) -> CoreResult<u64> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let staging = staging_path(dest);
    let copied = match fs::copy(src, &staging) {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
    };
    fs::rename(&staging, dest)?;
    log::debug!("Copied {} -> {}", src.display(), dest.display());
    Ok(copied)
}

/// Moves `src` to `dest`, replacing any existing file there.
///
/// Falls back to copy + remove when a rename is not possible (e.g. across
/// filesystems). The source is removed only after the destination is complete.
pub fn move_file(src: &Path, dest: &Path) -> CoreResult<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::rename(src, dest) {
        Ok(()) => {}
        Err(e) => {
            log::debug!(
                "Rename {} -> {} failed ({}), falling back to copy",
                src.display(),
                dest.display(),
                e
            );
            copy_into(src, dest)?;
            fs::remove_file(src)?;
        }
    }
    log::debug!("Moved {} -> {}", src.display(), dest.display());
    Ok(())
}

/// Deletes a file if present. Returns whether something was removed.
pub fn remove_if_exists(path: &Path) -> CoreResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Lists every visible file below `root` as a path relative to it, in
/// file-name order. A missing root yields an empty list; a root that is not a
/// directory is an error. Entries that cannot be read are skipped with a
/// warning.
pub fn scan_relative(root: &Path) -> CoreResult<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    if !root.is_dir() {
        return Err(CoreError::PathError(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry below {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}

pub(crate) fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn staging_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{name}.part"))
}
