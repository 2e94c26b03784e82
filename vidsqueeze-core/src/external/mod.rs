// ============================================================================
// vidsqueeze-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Media Probe and Encoder Collaborators
//
// The pipeline never talks to ffprobe or ffmpeg directly. It depends on two
// narrow traits, `MediaProbe` and `Encoder`, so that runs can be driven by the
// real tools in production and by in-process fakes in tests.
//
// KEY COMPONENTS:
// - MediaProbe: reads width, height, frame rate and audio bitrate of a file
// - Encoder: writes an artifact for a source file according to an EncodePlan
// - FfprobeMediaProbe / FfmpegEncoder: implementations backed by the ffprobe
//   and ffmpeg-sidecar crates
// - check_dependency: verifies a required command is on PATH

use crate::config::EncodeProfile;
use crate::error::{CoreError, CoreResult};
use crate::processing::planner::EncodePlan;
use crate::processing::video_properties::MediaProperties;

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// ffmpeg argument building for an encode plan
pub mod ffmpeg;

/// Traits and implementations for running ffmpeg processes
pub mod ffmpeg_executor;

/// ffprobe-backed media probing
pub mod ffprobe_executor;

pub use ffmpeg_executor::{FfmpegEncoder, FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::FfprobeMediaProbe;

// ============================================================================
// COLLABORATOR TRAITS
// ============================================================================

/// Reads the media properties the planner needs.
pub trait MediaProbe {
    /// Probes `path`. Unreadable or non-numeric metadata is a
    /// [`CoreError::ProbeFailure`].
    fn probe(&self, path: &Path) -> CoreResult<MediaProperties>;
}

/// Everything an encoder needs for one attempt.
#[derive(Debug, Clone, Copy)]
pub struct EncodeRequest<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub plan: &'a EncodePlan,
    pub profile: EncodeProfile,
    /// Source duration, used only for progress display
    pub duration_secs: Option<f64>,
}

/// Produces an artifact at `request.output`.
///
/// An implementation must either leave a complete file at the output path and
/// return `Ok`, or return an error. The pipeline removes partial output.
pub trait Encoder {
    fn encode(&self, request: &EncodeRequest<'_>) -> CoreResult<()>;
}

impl<T: MediaProbe + ?Sized> MediaProbe for &T {
    fn probe(&self, path: &Path) -> CoreResult<MediaProperties> {
        (**self).probe(path)
    }
}

impl<T: Encoder + ?Sized> Encoder for &T {
    fn encode(&self, request: &EncodeRequest<'_>) -> CoreResult<()> {
        (**self).encode(request)
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that a required external command is available and executable.
///
/// Runs `<cmd_name> -version` with output discarded. Only a failure to start
/// the command counts; its exit status is ignored.
///
/// # Returns
///
/// * `Ok(())` - The command could be started
/// * `Err(CoreError::DependencyNotFound)` - The command is not on PATH
/// * `Err(CoreError::CommandStart)` - The command exists but failed to start
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}
