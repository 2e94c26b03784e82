//! Outcome classification for a finished encode attempt.
//!
//! An attempt "shrunk" when the artifact is no larger than the original.
//! When the original size is unknown (0) the attempt is treated as shrunk so
//! that an unreadable size never sends a file to the stronger pass.

use std::fmt;

/// Result of comparing an artifact against its original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Shrunk,
    Grew,
}

/// Classification plus the reporting side channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub outcome: Outcome,
    /// `|original - new| * 100 / original`, truncated; `None` when the original size is unknown
    pub percent_delta: Option<u64>,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.outcome, self.percent_delta) {
            (Outcome::Shrunk, Some(pct)) => write!(f, "shrunk by {pct}%"),
            (Outcome::Grew, Some(pct)) => write!(f, "grew by {pct}%"),
            (Outcome::Shrunk, None) => write!(f, "original size unknown"),
            (Outcome::Grew, None) => write!(f, "grew"),
        }
    }
}

/// Classifies an attempt. Total and deterministic.
pub fn classify(original_size: u64, new_size: u64) -> Classification {
    let outcome = if original_size == 0 || new_size <= original_size {
        Outcome::Shrunk
    } else {
        Outcome::Grew
    };
    Classification {
        outcome,
        percent_delta: percent_delta(original_size, new_size),
    }
}

/// Absolute size change as a truncated percentage of the original.
pub fn percent_delta(original_size: u64, new_size: u64) -> Option<u64> {
    if original_size == 0 {
        return None;
    }
    let delta = u128::from(original_size.abs_diff(new_size)) * 100;
    Some(u64::try_from(delta / u128::from(original_size)).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(0, 12345).outcome, Outcome::Shrunk);
        assert_eq!(classify(0, 0).outcome, Outcome::Shrunk);
        assert_eq!(classify(100, 100).outcome, Outcome::Shrunk);
        assert_eq!(classify(100, 99).outcome, Outcome::Shrunk);
        assert_eq!(classify(100, 101).outcome, Outcome::Grew);
    }

    #[test]
    fn test_percent_delta() {
        assert_eq!(percent_delta(0, 50), None);
        assert_eq!(percent_delta(100, 100), Some(0));
        assert_eq!(percent_delta(100, 40), Some(60));
        assert_eq!(percent_delta(100, 150), Some(50));
        // Truncated toward zero
        assert_eq!(percent_delta(3, 2), Some(33));
        assert_eq!(percent_delta(3, 4), Some(33));
        assert_eq!(percent_delta(u64::MAX, 0), Some(100));
        assert_eq!(percent_delta(1, u64::MAX), Some(u64::MAX));
    }

    #[test]
    fn test_classification_display() {
        assert_eq!(classify(200, 50).to_string(), "shrunk by 75%");
        assert_eq!(classify(100, 120).to_string(), "grew by 20%");
        assert_eq!(classify(0, 120).to_string(), "original size unknown");
    }
}
