//! Probed media properties.
//!
//! This file defines the structures a `MediaProbe` returns for a source file:
//! frame dimensions, the rational frame rate, and what is known about the
//! first audio stream. The pipeline validates them before planning an encode.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// A frame rate kept as the exact rational reported by the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate {
    pub num: u64,
    pub den: u64,
}

impl FrameRate {
    pub const fn new(num: u64, den: u64) -> Self {
        Self { num, den }
    }

    /// Parses "30000/1001", "25/1" or a plain integer such as "24".
    ///
    /// Decimal strings are not accepted because they cannot be compared
    /// exactly against the frame-rate limit.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.split_once('/') {
            Some((num, den)) => {
                let num = num.trim().parse::<u64>().ok()?;
                let den = den.trim().parse::<u64>().ok()?;
                Some(Self::new(num, den))
            }
            None => value.parse::<u64>().ok().map(|num| Self::new(num, 1)),
        }
    }

    /// True when the rate is usable: a non-zero numerator over a non-zero denominator.
    pub fn is_valid(&self) -> bool {
        self.num > 0 && self.den > 0
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// What the probe found out about the first audio stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioStream {
    /// The file has no audio stream
    Absent,
    /// Audio present with a numeric bitrate in bits per second
    Bitrate(u64),
    /// Audio present but its bitrate is missing or not a number
    Unparsed(Option<String>),
}

/// Video metadata needed to plan an encode.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaProperties {
    /// Width of the video in pixels
    pub width: u32,

    /// Height of the video in pixels
    pub height: u32,

    /// Exact frame rate of the first video stream
    pub frame_rate: FrameRate,

    /// First audio stream description
    pub audio: AudioStream,

    /// Duration in seconds, when the container reports one (progress only)
    pub duration_secs: Option<f64>,
}

impl MediaProperties {
    /// Rejects properties the planner cannot work with: zero dimensions or an
    /// unusable frame rate (including 0/0).
    pub fn validate(&self) -> CoreResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::ProbeFailure(format!(
                "invalid dimensions {}x{}",
                self.width, self.height
            )));
        }
        if !self.frame_rate.is_valid() {
            return Err(CoreError::ProbeFailure(format!(
                "invalid frame rate {}",
                self.frame_rate
            )));
        }
        Ok(())
    }
}
