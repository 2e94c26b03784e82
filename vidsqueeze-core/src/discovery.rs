//! File discovery module for finding video files to process.
//!
//! Walks the source root recursively and returns every visible file with a
//! known video extension (case-insensitive). Hidden files and directories are
//! skipped, and so is any holding area that happens to live inside the source
//! root, so a run never picks up its own output.

use crate::error::{CoreError, CoreResult};
use crate::processing::filing::{FilingLayout, is_hidden};
use crate::utils::has_video_extension;

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A discovered source file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceItem {
    /// Path relative to the source root; used to place the item in every tree
    pub relative: PathBuf,
    /// Full path of the original
    pub path: PathBuf,
    /// Size at discovery time (0 if it could not be read)
    pub size: u64,
}

impl SourceItem {
    pub fn new(source_root: &Path, relative: PathBuf, size: u64) -> Self {
        Self {
            path: source_root.join(&relative),
            relative,
            size,
        }
    }

    /// File name for log output.
    pub fn display_name(&self) -> String {
        self.relative.display().to_string()
    }
}

/// Finds video files eligible for processing below `source_root`.
///
/// # Returns
///
/// * `Ok(Vec<SourceItem>)` - Discovered files, ordered by relative path
/// * `Err(CoreError::Walkdir)` - If an error occurs during directory traversal
/// * `Err(CoreError::NoFilesFound)` - If no video files are found
///
/// # Examples
///
/// ```rust,no_run
/// use vidsqueeze_core::find_processable_files;
/// use vidsqueeze_core::processing::filing::FilingLayout;
/// use std::path::Path;
///
/// let root = Path::new("/path/to/videos");
/// let layout = FilingLayout::beside(root);
/// match find_processable_files(root, &layout) {
///     Ok(items) => println!("Found {} video files", items.len()),
///     Err(e) => println!("Error finding video files: {}", e),
/// }
/// ```
pub fn find_processable_files(source_root: &Path, layout: &FilingLayout) -> CoreResult<Vec<SourceItem>> {
    let walker = WalkDir::new(source_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !(is_hidden(entry) || layout.is_filing_root(entry.path()))
        });

    let mut items = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_video_extension(entry.path()) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(source_root) {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            items.push(SourceItem::new(source_root, relative.to_path_buf(), size));
        }
    }

    if items.is_empty() {
        return Err(CoreError::NoFilesFound);
    }
    items.sort();
    log::debug!("Discovered {} video files under {}", items.len(), source_root.display());
    Ok(items)
}
