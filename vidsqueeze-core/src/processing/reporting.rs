//! Run statistics and the end-of-run report.
//!
//! `RunStatistics` is owned by the pipeline for the duration of a run and
//! only ever grows. `RunReport` is what a run hands back to its caller: the
//! counters, the resting state of every item it touched, and timing.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};

use super::filing::FilingState;
use crate::utils::calculate_size_reduction;

/// Counters accumulated over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Source items handed to the main pass
    pub files_discovered: usize,
    /// Combined size of the discovered originals
    pub total_input_bytes: u64,
    /// Items finalized by either pass in this run
    pub finalized: usize,
    /// Items filed into the failed tree
    pub failed: usize,
    /// Original sizes of the items counted in `finalized`
    pub processed_original_bytes: u64,
    /// Artifact sizes of the items counted in `finalized`
    pub processed_final_bytes: u64,

    /// Items whose final artifact already existed; not part of `finalized`
    pub skipped_existing: usize,
    /// Items the main pass left for the stronger pass
    pub sent_to_stronger: usize,
    /// Items the stronger pass finalized (also counted in `finalized`)
    pub stronger_finalized: usize,
    /// Items whose stronger attempt still did not shrink
    pub stronger_exhausted: usize,
    /// Needs-stronger entries left untouched (inconsistent, unprobeable or failed encode)
    pub stronger_skipped: usize,
}

impl RunStatistics {
    /// Records a finalized item and its byte totals.
    pub fn record_finalized(&mut self, original_size: u64, final_size: u64) {
        self.finalized += 1;
        self.processed_original_bytes += original_size;
        self.processed_final_bytes += final_size;
    }

    /// Overall reduction of the finalized items, in percent.
    pub fn reduction_percent(&self) -> u64 {
        calculate_size_reduction(self.processed_original_bytes, self.processed_final_bytes)
    }
}

/// Result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub statistics: RunStatistics,
    /// Resting state of every item touched, keyed by relative path
    pub items: BTreeMap<String, FilingState>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub started_at: DateTime<Local>,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_duration_secs")]
    pub elapsed: Duration,
}

impl RunReport {
    /// Number of items resting in `state`.
    pub fn count(&self, state: FilingState) -> usize {
        self.items.values().filter(|s| **s == state).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn serialize_timestamp<S: Serializer>(value: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339())
}

fn serialize_duration_secs<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}
