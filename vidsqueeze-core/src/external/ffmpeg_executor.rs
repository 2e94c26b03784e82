// ============================================================================
// vidsqueeze-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and the Encoder Implementation
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes, and the `FfmpegEncoder` that implements the pipeline's `Encoder`
// trait on top of them.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
// - FfmpegEncoder: Encoder that runs one libsvtav1 encode per request

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error, command_wait_error};
use crate::progress::EncodeProgress;

use super::ffmpeg::build_encode_command;
use super::{EncodeRequest, Encoder};

use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            command_failed_error(
                "ffmpeg (sidecar - get iter)",
                ExitStatus::default(),
                e.to_string(),
            )
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}

// --- Encoder ---

/// [`Encoder`] that runs ffmpeg with libsvtav1.
#[derive(Debug, Clone, Default)]
pub struct FfmpegEncoder<S: FfmpegSpawner = SidecarSpawner> {
    spawner: S,
    show_progress: bool,
}

impl FfmpegEncoder<SidecarSpawner> {
    pub fn new() -> Self {
        Self::with_spawner(SidecarSpawner)
    }
}

impl<S: FfmpegSpawner> FfmpegEncoder<S> {
    pub fn with_spawner(spawner: S) -> Self {
        Self {
            spawner,
            show_progress: false,
        }
    }

    /// Draws a progress bar on interactive terminals.
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }
}

impl<S: FfmpegSpawner> Encoder for FfmpegEncoder<S> {
    fn encode(&self, request: &EncodeRequest<'_>) -> CoreResult<()> {
        let filename = request
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| request.input.display().to_string());

        let cmd = build_encode_command(request);
        log::debug!("FFmpeg command: {:?}", cmd);

        let mut progress = EncodeProgress::new(&filename, request.duration_secs, self.show_progress);
        let mut child = self.spawner.spawn(cmd)?;
        child.handle_events(|event| {
            progress.handle_event(event);
            Ok(())
        })?;
        let status = child.wait()?;
        progress.finish();

        if !status.success() {
            let stderr = progress.error_output();
            log::debug!("ffmpeg exited with {} for {}", status, filename);
            return Err(CoreError::EncodeFailure(format!(
                "ffmpeg exited with {status} for {filename}: {}",
                stderr.lines().last().unwrap_or("no error output")
            )));
        }

        if !request.output.is_file() {
            return Err(CoreError::EncodeFailure(format!(
                "ffmpeg reported success but wrote no output for {filename}"
            )));
        }
        Ok(())
    }
}
