// ============================================================================
// vidsqueeze-core/src/processing/planner.rs
// ============================================================================
//
// PARAMETER PLANNING: Filters and Audio Handling for One Attempt
//
// Pure mapping from probed media properties and the configured limits to the
// video filter chain and the audio decision. No I/O happens here; the inputs
// are validated by the pipeline before planning.
//
// - Scale: sources whose shorter side exceeds the limit are downscaled so the
//   shorter side equals the limit and the longer side keeps the aspect ratio,
//   rounded to the nearest even number. Smaller sources are only trimmed down
//   to even dimensions (required for 4:2:0 chroma subsampling).
// - Frame rate: capped only when num > limit * den, comparing the exact
//   rational instead of a rounded float.
// - Audio: dropped when absent, re-encoded above 128 kb/s, otherwise copied.

use std::fmt;

use crate::processing::video_properties::{AudioStream, FrameRate, MediaProperties};

/// Audio bitrate ceiling; streams above it are re-encoded down to it.
pub const AUDIO_BITRATE_CEILING: u64 = 128_000;

/// Which axis ffmpeg would treat as the free (aspect-derived) one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeAxis {
    Width,
    Height,
}

/// Scaling directive; always present in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDirective {
    /// Shorter side brought down to the limit, longer side derived from the aspect ratio
    Downscale {
        width: u32,
        height: u32,
        free_axis: FreeAxis,
    },
    /// No downscale needed; dimensions only rounded down to even values
    EvenOnly { width: u32, height: u32 },
}

impl ScaleDirective {
    /// Planned output dimensions as (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        match *self {
            ScaleDirective::Downscale { width, height, .. } => (width, height),
            ScaleDirective::EvenOnly { width, height } => (width, height),
        }
    }
}

impl fmt::Display for ScaleDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        write!(f, "scale={width}:{height}")
    }
}

/// Ordered video filter directives: scale first, then the optional rate cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub scale: ScaleDirective,
    /// Output frame rate when the source exceeds the limit
    pub frame_rate_cap: Option<u32>,
}

impl FilterSpec {
    /// Renders the ffmpeg `-vf` filter chain.
    pub fn to_filter_chain(&self) -> String {
        match self.frame_rate_cap {
            Some(fps) => format!("{},fps={fps}", self.scale),
            None => self.scale.to_string(),
        }
    }
}

/// How the audio stream is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioDecision {
    Drop,
    Copy,
    /// Re-encode with the given bitrate ceiling in bits per second
    Transcode(u64),
}

impl fmt::Display for AudioDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioDecision::Drop => write!(f, "drop"),
            AudioDecision::Copy => write!(f, "copy"),
            AudioDecision::Transcode(bps) => write!(f, "transcode @ {}k", bps / 1000),
        }
    }
}

/// Everything the encoder needs besides the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodePlan {
    pub filters: FilterSpec,
    pub audio: AudioDecision,
}

/// Plans filters and audio handling for validated media properties.
pub fn plan_encode(
    media: &MediaProperties,
    short_side_limit: u32,
    frame_rate_limit: u32,
) -> EncodePlan {
    EncodePlan {
        filters: plan_filters(
            media.width,
            media.height,
            media.frame_rate,
            short_side_limit,
            frame_rate_limit,
        ),
        audio: decide_audio(&media.audio),
    }
}

/// Derives the scale and frame-rate directives.
pub fn plan_filters(
    width: u32,
    height: u32,
    frame_rate: FrameRate,
    short_side_limit: u32,
    frame_rate_limit: u32,
) -> FilterSpec {
    FilterSpec {
        scale: plan_scale(width, height, short_side_limit),
        frame_rate_cap: plan_frame_rate_cap(frame_rate, frame_rate_limit),
    }
}

/// Derives the scale directive for one frame size.
pub fn plan_scale(width: u32, height: u32, short_side_limit: u32) -> ScaleDirective {
    let min_side = width.min(height);
    if min_side <= short_side_limit {
        return ScaleDirective::EvenOnly {
            width: floor_even(width),
            height: floor_even(height),
        };
    }

    if width >= height {
        // Landscape (or square): height pinned to the limit, width follows.
        ScaleDirective::Downscale {
            width: scaled_even(width, short_side_limit, height),
            height: short_side_limit,
            free_axis: FreeAxis::Width,
        }
    } else {
        ScaleDirective::Downscale {
            width: short_side_limit,
            height: scaled_even(height, short_side_limit, width),
            free_axis: FreeAxis::Height,
        }
    }
}

/// Emits a cap iff `num > limit * den`.
pub fn plan_frame_rate_cap(frame_rate: FrameRate, frame_rate_limit: u32) -> Option<u32> {
    let limit = u128::from(frame_rate_limit) * u128::from(frame_rate.den);
    (u128::from(frame_rate.num) > limit).then_some(frame_rate_limit)
}

/// Maps the probed audio stream to a decision. Anything unreadable is copied.
pub fn decide_audio(audio: &AudioStream) -> AudioDecision {
    match audio {
        AudioStream::Absent => AudioDecision::Drop,
        AudioStream::Bitrate(bps) if *bps > AUDIO_BITRATE_CEILING => {
            AudioDecision::Transcode(AUDIO_BITRATE_CEILING)
        }
        AudioStream::Bitrate(_) => AudioDecision::Copy,
        AudioStream::Unparsed(_) => AudioDecision::Copy,
    }
}

/// Rounds down to an even value, never below 2.
fn floor_even(value: u32) -> u32 {
    (value & !1).max(2)
}

/// `long * limit / short` rounded to the nearest even integer, never below 2.
fn scaled_even(long: u32, limit: u32, short: u32) -> u32 {
    let numerator = u64::from(long) * u64::from(limit);
    let denominator = u64::from(short);
    // round(numerator / (2 * denominator)) * 2, halves rounded up
    let even = (numerator + denominator) / (2 * denominator) * 2;
    u32::try_from(even).unwrap_or(u32::MAX & !1).max(2)
}
