//! Core video processing logic and orchestration.
//!
//! This module organizes the steps of a run into submodules: probed media
//! properties, parameter planning, outcome classification, the filing layout
//! of the four holding areas, the two-pass pipeline and its report.

/// Holding areas and filesystem primitives
pub mod filing;

/// Shrunk/grew classification of an attempt
pub mod outcome;

/// Main pass and stronger pass orchestration
pub mod pipeline;

/// Scale, frame-rate and audio planning
pub mod planner;

/// Run statistics and report
pub mod reporting;

/// Probed media properties
pub mod video_properties;

pub use filing::{FilingLayout, FilingState};
pub use pipeline::{RunOptions, process_stronger_backlog, process_videos};
pub use reporting::{RunReport, RunStatistics};
pub use video_properties::MediaProperties;
