//! FFprobe integration for media analysis.
//!
//! Implements [`MediaProbe`] with the `ffprobe` crate. Every failure, whether
//! ffprobe could not run, exited non-zero, or reported unusable values, is
//! surfaced as [`CoreError::ProbeFailure`] so the pipeline can file the item.

use crate::error::{CoreError, CoreResult};
use crate::processing::video_properties::{AudioStream, FrameRate, MediaProperties};
use ffprobe::{FfProbeError, Stream, ffprobe};
use std::path::Path;

use super::MediaProbe;

/// [`MediaProbe`] backed by the ffprobe binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfprobeMediaProbe;

impl FfprobeMediaProbe {
    pub fn new() -> Self {
        Self
    }
}

impl MediaProbe for FfprobeMediaProbe {
    fn probe(&self, path: &Path) -> CoreResult<MediaProperties> {
        log::debug!("Running ffprobe (via crate) on: {}", path.display());
        let metadata = ffprobe(path).map_err(|err| {
            log::debug!("ffprobe failed on {}: {:?}", path.display(), err);
            map_ffprobe_error(err, path)
        })?;

        let duration_secs = metadata
            .format
            .duration
            .as_deref()
            .and_then(|d| d.parse::<f64>().ok());

        let video_stream = metadata
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| {
                CoreError::ProbeFailure(format!("No video stream found in {}", path.display()))
            })?;
        let audio_stream = metadata
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("audio"));

        let properties = MediaProperties {
            width: dimension(video_stream.width, "width", path)?,
            height: dimension(video_stream.height, "height", path)?,
            frame_rate: frame_rate(video_stream, path)?,
            audio: audio_description(audio_stream),
            duration_secs,
        };
        properties.validate()?;
        Ok(properties)
    }
}

fn dimension(value: Option<i64>, name: &str, path: &Path) -> CoreResult<u32> {
    let value = value.ok_or_else(|| {
        CoreError::ProbeFailure(format!("Video stream missing {name} in {}", path.display()))
    })?;
    u32::try_from(value).map_err(|_| {
        CoreError::ProbeFailure(format!("Invalid {name} {value} in {}", path.display()))
    })
}

/// Uses `r_frame_rate`, falling back to `avg_frame_rate` when the former is
/// unusable.
fn frame_rate(stream: &Stream, path: &Path) -> CoreResult<FrameRate> {
    [stream.r_frame_rate.as_str(), stream.avg_frame_rate.as_str()]
        .into_iter()
        .filter_map(FrameRate::parse)
        .find(FrameRate::is_valid)
        .ok_or_else(|| {
            CoreError::ProbeFailure(format!(
                "Unusable frame rate '{}' in {}",
                stream.r_frame_rate,
                path.display()
            ))
        })
}

fn audio_description(stream: Option<&Stream>) -> AudioStream {
    match stream {
        None => AudioStream::Absent,
        Some(s) => match s.bit_rate.as_deref().map(|b| b.trim().parse::<u64>()) {
            Some(Ok(bps)) => AudioStream::Bitrate(bps),
            _ => AudioStream::Unparsed(s.bit_rate.clone()),
        },
    }
}

fn map_ffprobe_error(err: FfProbeError, path: &Path) -> CoreError {
    let detail = match err {
        FfProbeError::Io(io_err) => format!("could not run ffprobe: {io_err}"),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.lines().last().unwrap_or("").trim()
            )
        }
        FfProbeError::Deserialize(err) => format!("could not parse ffprobe output: {err}"),
        other => format!("unknown ffprobe error: {other:?}"),
    };
    CoreError::ProbeFailure(format!("{}: {detail}", path.display()))
}
