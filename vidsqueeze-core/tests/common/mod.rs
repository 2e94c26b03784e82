// vidsqueeze-core/tests/common/mod.rs
//
// In-memory MediaProbe and Encoder doubles plus library fixtures shared by
// the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use vidsqueeze_core::config::CoreConfig;
use vidsqueeze_core::error::{CoreError, CoreResult};
use vidsqueeze_core::external::{EncodeRequest, Encoder, MediaProbe};
use vidsqueeze_core::processing::video_properties::{AudioStream, FrameRate, MediaProperties};

/// 1920x1080 @ 60 fps with 96 kb/s audio.
pub fn hd_properties() -> MediaProperties {
    MediaProperties {
        width: 1920,
        height: 1080,
        frame_rate: FrameRate::new(60, 1),
        audio: AudioStream::Bitrate(96_000),
        duration_secs: Some(10.0),
    }
}

/// Probe that answers from a table keyed by file name.
pub struct FakeProbe {
    default: MediaProperties,
    overrides: HashMap<String, MediaProperties>,
    failing: HashSet<String>,
    pub probed: RefCell<Vec<PathBuf>>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self {
            default: hd_properties(),
            overrides: HashMap::new(),
            failing: HashSet::new(),
            probed: RefCell::new(Vec::new()),
        }
    }

    pub fn with_properties(mut self, name: &str, properties: MediaProperties) -> Self {
        self.overrides.insert(name.to_string(), properties);
        self
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }
}

impl MediaProbe for FakeProbe {
    fn probe(&self, path: &Path) -> CoreResult<MediaProperties> {
        self.probed.borrow_mut().push(path.to_path_buf());
        let name = file_name(path);
        if self.failing.contains(&name) {
            return Err(CoreError::ProbeFailure(format!("unreadable metadata in {name}")));
        }
        Ok(self.overrides.get(&name).cloned().unwrap_or_else(|| self.default.clone()))
    }
}

/// What the fake encoder does for one (file, quality) pair.
#[derive(Debug, Clone, Copy)]
pub enum Attempt {
    /// Write an output of this many bytes
    Bytes(usize),
    /// Write a partial file and report failure
    Fail,
}

/// A recorded encoder invocation.
#[derive(Debug, Clone)]
pub struct EncodeCall {
    pub name: String,
    pub quality: u8,
    pub preset: u8,
    pub filter_chain: String,
    pub audio: String,
    pub output: PathBuf,
}

/// Encoder that writes files of scripted sizes. Every byte of an output is
/// the CRF of the attempt, so tests can tell attempts apart by content.
pub struct FakeEncoder {
    attempts: HashMap<(String, u8), Attempt>,
    pub calls: RefCell<Vec<EncodeCall>>,
}

impl FakeEncoder {
    pub fn new() -> Self {
        Self {
            attempts: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Scripts the attempt for `name` encoded at `quality`. Unscripted
    /// attempts write a single byte.
    pub fn on(mut self, name: &str, quality: u8, attempt: Attempt) -> Self {
        self.attempts.insert((name.to_string(), quality), attempt);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Encoder for FakeEncoder {
    fn encode(&self, request: &EncodeRequest<'_>) -> CoreResult<()> {
        let name = file_name(request.input);
        let quality = request.profile.quality;
        self.calls.borrow_mut().push(EncodeCall {
            name: name.clone(),
            quality,
            preset: request.profile.preset,
            filter_chain: request.plan.filters.to_filter_chain(),
            audio: request.plan.audio.to_string(),
            output: request.output.to_path_buf(),
        });

        match self.attempts.get(&(name.clone(), quality)).copied().unwrap_or(Attempt::Bytes(1)) {
            Attempt::Bytes(size) => {
                fs::write(request.output, vec![quality; size])?;
                Ok(())
            }
            Attempt::Fail => {
                fs::write(request.output, b"partial")?;
                Err(CoreError::EncodeFailure(format!("simulated failure for {name}")))
            }
        }
    }
}

/// A library root inside a temporary directory with scratch files kept in
/// `<tmp>/scratch`.
pub struct Library {
    pub dir: TempDir,
    pub config: CoreConfig,
}

impl Library {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let source_root = dir.path().join("library");
        fs::create_dir_all(&source_root).expect("create source root");

        let mut config = CoreConfig::new(source_root);
        config.temp_dir = Some(dir.path().join("scratch"));
        Self { dir, config }
    }

    /// Writes a source file of `size` bytes (all 0xAB) at `relative`.
    pub fn add_video(&self, relative: &str, size: usize) -> PathBuf {
        let path = self.config.source_root.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        fs::write(&path, vec![0xAB; size]).expect("write source");
        path
    }

    /// Relative paths of every visible file in a tree.
    pub fn files_in(&self, root: &Path) -> Vec<String> {
        vidsqueeze_core::processing::filing::scan_relative(root)
            .expect("scan")
            .into_iter()
            .map(|p| p.display().to_string())
            .collect()
    }

    pub fn final_files(&self) -> Vec<String> {
        self.files_in(&self.config.layout.final_root)
    }

    pub fn failed_files(&self) -> Vec<String> {
        self.files_in(&self.config.layout.failed_root)
    }

    pub fn larger_files(&self) -> Vec<String> {
        self.files_in(&self.config.layout.larger_root)
    }

    pub fn needs_stronger_files(&self) -> Vec<String> {
        self.files_in(&self.config.layout.needs_stronger_root)
    }

    /// Entries left in the scratch base (should be none after a run).
    pub fn scratch_leftovers(&self) -> usize {
        match fs::read_dir(self.dir.path().join("scratch")) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
