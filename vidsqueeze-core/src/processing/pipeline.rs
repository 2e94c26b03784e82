// ============================================================================
// vidsqueeze-core/src/processing/pipeline.rs
// ============================================================================
//
// PIPELINE: Main Pass and Stronger Pass Orchestration
//
// The pipeline drives every discovered item through the main pass, then
// re-encodes whatever the main pass left in the needs-stronger tree with the
// stronger profile. Items are handled one at a time in discovery order.
//
// MAIN PASS (per item):
//   final artifact exists         -> Finalized (skipped, nothing re-encoded)
//   larger + needs-stronger exist -> PendingStronger (resumed)
//   probe fails                   -> copy original to failed tree -> Failed
//   encode fails                  -> copy original to failed tree -> Failed
//   shrunk                        -> move artifact to final tree -> Finalized
//   grew                          -> move artifact to larger tree,
//                                    copy original to needs-stronger tree
//                                    -> PendingStronger
//
// STRONGER PASS (per needs-stronger entry, fresh scan):
//   final artifact exists               -> stale copies removed, no encode
//   original or larger artifact missing -> untouched (consistency skip)
//   probe or encode fails               -> untouched
//   shrunk  -> move attempt to final tree, delete larger artifact, then
//              delete needs-stronger copy -> Finalized
//   grew    -> attempt replaces the larger artifact -> StrongerExhausted
//
// Encoder output always lands in the per-run scratch directory first and is
// moved into a holding area only after the attempt completed. Once an item is
// filed, copies an earlier run left in other trees are removed, the
// needs-stronger copy last. Per-item errors never escape the pipeline, and
// neither does a failed scan of the needs-stronger tree.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Local};
use log::{debug, error, info, warn};
use tempfile::TempDir;

use super::filing::{self, FilingState};
use super::outcome::{Classification, Outcome, classify};
use super::planner::{EncodePlan, plan_encode};
use super::reporting::{RunReport, RunStatistics};
use crate::config::{CoreConfig, EncodeProfile};
use crate::discovery::SourceItem;
use crate::error::{CoreError, CoreResult};
use crate::external::{EncodeRequest, Encoder, MediaProbe};
use crate::processing::video_properties::MediaProperties;
use crate::temp_files::{create_scratch_dir, create_temp_file_path};
use crate::terminal;
use crate::utils::format_bytes;

/// Which passes a run performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop after the main pass, leaving the needs-stronger tree for later
    pub skip_stronger: bool,
}

/// Runs the main pass over `items` and then, unless disabled, the stronger pass.
///
/// Only setup errors (the scratch directory cannot be created) are returned.
/// Every per-item failure is filed and counted instead.
///
/// # Examples
///
/// ```rust,no_run
/// use vidsqueeze_core::{CoreConfig, find_processable_files, process_videos};
/// use vidsqueeze_core::external::{FfmpegEncoder, FfprobeMediaProbe};
/// use vidsqueeze_core::processing::RunOptions;
/// use std::path::PathBuf;
///
/// let config = CoreConfig::new(PathBuf::from("/media/library"));
/// config.validate().unwrap();
/// let items = find_processable_files(&config.source_root, &config.layout).unwrap();
///
/// let report = process_videos(
///     &FfprobeMediaProbe::new(),
///     &FfmpegEncoder::new(),
///     &config,
///     &items,
///     RunOptions::default(),
/// )
/// .unwrap();
/// println!("finalized {}", report.statistics.finalized);
/// ```
pub fn process_videos<P: MediaProbe, E: Encoder>(
    probe: &P,
    encoder: &E,
    config: &CoreConfig,
    items: &[SourceItem],
    options: RunOptions,
) -> CoreResult<RunReport> {
    let mut pipeline = Pipeline::new(probe, encoder, config)?;
    pipeline.main_pass(items);
    if options.skip_stronger {
        info!("Stronger pass skipped; the needs-stronger tree is left as is");
    } else {
        pipeline.stronger_pass();
    }
    Ok(pipeline.finish())
}

/// Runs only the stronger pass over the current needs-stronger tree.
pub fn process_stronger_backlog<P: MediaProbe, E: Encoder>(
    probe: &P,
    encoder: &E,
    config: &CoreConfig,
) -> CoreResult<RunReport> {
    let mut pipeline = Pipeline::new(probe, encoder, config)?;
    pipeline.stronger_pass();
    Ok(pipeline.finish())
}

/// State of one run. Owns the statistics and the in-memory state index.
struct Pipeline<'a, P, E> {
    probe: &'a P,
    encoder: &'a E,
    config: &'a CoreConfig,
    scratch: TempDir,
    stats: RunStatistics,
    states: BTreeMap<PathBuf, FilingState>,
    /// Artifact path claimed by each item this run, to detect name collisions
    claimed: HashMap<PathBuf, PathBuf>,
    started_at: DateTime<Local>,
    started: Instant,
}

impl<'a, P: MediaProbe, E: Encoder> Pipeline<'a, P, E> {
    fn new(probe: &'a P, encoder: &'a E, config: &'a CoreConfig) -> CoreResult<Self> {
        Ok(Self {
            probe,
            encoder,
            config,
            scratch: create_scratch_dir(config)?,
            stats: RunStatistics::default(),
            states: BTreeMap::new(),
            claimed: HashMap::new(),
            started_at: Local::now(),
            started: Instant::now(),
        })
    }

    // ------------------------------------------------------------------------
    // Main pass
    // ------------------------------------------------------------------------

    fn main_pass(&mut self, items: &[SourceItem]) {
        terminal::print_section("Main pass");
        self.stats.files_discovered += items.len();
        self.stats.total_input_bytes += items.iter().map(|i| i.size).sum::<u64>();
        info!(
            "{} file(s), {} total, profile {}",
            items.len(),
            format_bytes(self.stats.total_input_bytes),
            self.config.main_profile
        );

        for (index, item) in items.iter().enumerate() {
            terminal::print_processing(&format!(
                "[{}/{}] {}",
                index + 1,
                items.len(),
                item.display_name()
            ));
            let state = self.main_pass_item(item);
            terminal::print_status("Result", state.label(), false);
            self.states.insert(item.relative.clone(), state);
        }
    }

    fn main_pass_item(&mut self, item: &SourceItem) -> FilingState {
        let config = self.config;
        let layout = &config.layout;

        let artifact = filing::artifact_name(&item.relative);
        if let Some(owner) = self.claimed.get(&artifact) {
            let reason = CoreError::PathError(format!(
                "artifact name {} is already used by {}",
                artifact.display(),
                owner.display()
            ));
            return self.fail_item(item, &reason);
        }
        self.claimed.insert(artifact, item.relative.clone());

        let final_path = layout.final_path(&item.relative);
        if final_path.is_file() {
            info!("Final artifact already exists at {}, skipping", final_path.display());
            self.stats.skipped_existing += 1;
            self.clear_stale_copies(&item.relative, FilingState::Finalized);
            return FilingState::Finalized;
        }

        if layout.larger_path(&item.relative).is_file()
            && layout.needs_stronger_path(&item.relative).is_file()
        {
            info!("Already waiting for the stronger pass, not re-encoding");
            self.stats.sent_to_stronger += 1;
            self.clear_stale_copies(&item.relative, FilingState::PendingStronger);
            return FilingState::PendingStronger;
        }

        let temp_output = create_temp_file_path(self.scratch.path(), "main", filing::ARTIFACT_EXTENSION);
        let result = self.attempt_main(item, &temp_output);
        if let Err(e) = filing::remove_if_exists(&temp_output) {
            warn!("Could not remove scratch file {}: {}", temp_output.display(), e);
        }

        match result {
            Ok(state) => state,
            Err(e) => self.fail_item(item, &e),
        }
    }

    fn attempt_main(&mut self, item: &SourceItem, temp_output: &Path) -> CoreResult<FilingState> {
        let media = self.probe_original(&item.path)?;
        let plan = self.plan(&media);
        let original_size = filing::file_size(&item.path).unwrap_or(0);

        let new_size = self.encode(item.path.as_path(), temp_output, &plan, self.config.main_profile, &media)?;
        let classification = classify(original_size, new_size);
        report_sizes(original_size, new_size, classification);

        let config = self.config;
        let layout = &config.layout;
        match classification.outcome {
            Outcome::Shrunk => {
                filing::move_file(temp_output, &layout.final_path(&item.relative))?;
                self.stats.record_finalized(original_size, new_size);
                self.clear_stale_copies(&item.relative, FilingState::Finalized);
                terminal::print_success(&format!("Finalized ({classification})"));
                Ok(FilingState::Finalized)
            }
            Outcome::Grew => {
                let larger_path = layout.larger_path(&item.relative);
                filing::move_file(temp_output, &larger_path)?;
                if let Err(e) = filing::copy_into(&item.path, &layout.needs_stronger_path(&item.relative)) {
                    // Without the original copy the larger artifact would be inconsistent
                    if let Err(remove_err) = filing::remove_if_exists(&larger_path) {
                        warn!("Could not remove {}: {}", larger_path.display(), remove_err);
                    }
                    return Err(e);
                }
                self.stats.sent_to_stronger += 1;
                self.clear_stale_copies(&item.relative, FilingState::PendingStronger);
                terminal::print_warning(&format!("Output {classification}, queued for the stronger pass"));
                Ok(FilingState::PendingStronger)
            }
        }
    }

    /// Copies the original into the failed tree. The original is never touched.
    fn fail_item(&mut self, item: &SourceItem, reason: &CoreError) -> FilingState {
        terminal::print_error("Failed", &reason.to_string());
        let failed_path = self.config.layout.failed_path(&item.relative);
        match filing::copy_into(&item.path, &failed_path) {
            Ok(_) => debug!("Original copied to {}", failed_path.display()),
            Err(e) => error!(
                "Could not copy {} into the failed tree: {}",
                item.path.display(),
                e
            ),
        }
        self.stats.failed += 1;
        FilingState::Failed
    }

    // ------------------------------------------------------------------------
    // Stronger pass
    // ------------------------------------------------------------------------

    fn stronger_pass(&mut self) {
        terminal::print_section("Stronger pass");
        let config = self.config;
        let root = &config.layout.needs_stronger_root;
        let entries = match filing::scan_relative(root) {
            Ok(entries) => entries,
            Err(e) => {
                error!("Could not scan {}: {}", root.display(), e);
                self.stats.stronger_skipped += 1;
                return;
            }
        };
        if entries.is_empty() {
            info!("Nothing waiting for the stronger pass");
            return;
        }
        info!(
            "{} file(s) waiting, profile {}",
            entries.len(),
            self.config.stronger_profile
        );

        for (index, relative) in entries.iter().enumerate() {
            terminal::print_processing(&format!(
                "[{}/{}] {}",
                index + 1,
                entries.len(),
                relative.display()
            ));

            let temp_output =
                create_temp_file_path(self.scratch.path(), "stronger", filing::ARTIFACT_EXTENSION);
            let result = self.attempt_stronger(relative, &temp_output);
            if let Err(e) = filing::remove_if_exists(&temp_output) {
                warn!("Could not remove scratch file {}: {}", temp_output.display(), e);
            }

            match result {
                Ok(state) => {
                    terminal::print_status("Result", state.label(), false);
                    self.states.insert(relative.clone(), state);
                }
                Err(e) => {
                    terminal::print_warning(&format!("Left untouched: {e}"));
                    self.stats.stronger_skipped += 1;
                }
            }
        }
    }

    fn attempt_stronger(&mut self, relative: &Path, temp_output: &Path) -> CoreResult<FilingState> {
        let config = self.config;
        let layout = &config.layout;
        let original = config.source_root.join(relative);
        let larger_path = layout.larger_path(relative);

        let final_path = layout.final_path(relative);
        if final_path.is_file() {
            info!("Final artifact already exists at {}, clearing leftovers", final_path.display());
            self.clear_stale_copies(relative, FilingState::Finalized);
            return Ok(FilingState::Finalized);
        }

        if !original.is_file() {
            return Err(CoreError::ConsistencyFailure(format!(
                "original {} is missing",
                original.display()
            )));
        }
        if !larger_path.is_file() {
            return Err(CoreError::ConsistencyFailure(format!(
                "first attempt {} is missing",
                larger_path.display()
            )));
        }

        let media = self.probe_original(&original)?;
        let plan = self.plan(&media);
        let new_size = self.encode(&original, temp_output, &plan, config.stronger_profile, &media)?;
        let original_size = filing::file_size(&original).unwrap_or(0);
        let classification = classify(original_size, new_size);
        report_sizes(original_size, new_size, classification);

        match classification.outcome {
            Outcome::Shrunk => {
                filing::move_file(temp_output, &final_path)?;
                self.stats.record_finalized(original_size, new_size);
                self.stats.stronger_finalized += 1;
                self.clear_stale_copies(relative, FilingState::Finalized);
                terminal::print_success(&format!("Finalized by the stronger pass ({classification})"));
                Ok(FilingState::Finalized)
            }
            Outcome::Grew => {
                filing::move_file(temp_output, &larger_path)?;
                self.stats.stronger_exhausted += 1;
                terminal::print_warning(&format!(
                    "Stronger attempt still {classification}, kept as the best attempt"
                ));
                Ok(FilingState::StrongerExhausted)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Shared steps
    // ------------------------------------------------------------------------

    /// Removes copies an earlier run left for an item that now rests in
    /// `state`. Removal failures only warn.
    fn clear_stale_copies(&self, relative: &Path, state: FilingState) {
        let layout = &self.config.layout;
        let mut stale = vec![layout.failed_path(relative)];
        if state == FilingState::Finalized {
            stale.push(layout.larger_path(relative));
            // The needs-stronger copy goes last; it is what marks the item as pending
            stale.push(layout.needs_stronger_path(relative));
        }

        for path in stale {
            match filing::remove_if_exists(&path) {
                Ok(true) => debug!("Removed stale {}", path.display()),
                Ok(false) => {}
                Err(e) => warn!("Could not remove {}: {}", path.display(), e),
            }
        }
    }

    fn probe_original(&self, path: &Path) -> CoreResult<MediaProperties> {
        let media = self.probe.probe(path)?;
        media.validate()?;
        debug!(
            "Probed {}x{} @ {} fps, audio {:?}",
            media.width, media.height, media.frame_rate, media.audio
        );
        Ok(media)
    }

    fn plan(&self, media: &MediaProperties) -> EncodePlan {
        let plan = plan_encode(media, self.config.short_side_limit, self.config.frame_rate_limit);
        terminal::print_status("Filters", &plan.filters.to_filter_chain(), false);
        terminal::print_status("Audio", &plan.audio.to_string(), false);
        plan
    }

    /// Runs one attempt and returns the size of the produced file.
    fn encode(
        &self,
        input: &Path,
        output: &Path,
        plan: &EncodePlan,
        profile: EncodeProfile,
        media: &MediaProperties,
    ) -> CoreResult<u64> {
        terminal::print_status("Profile", &profile.to_string(), false);
        let request = EncodeRequest {
            input,
            output,
            plan,
            profile,
            duration_secs: media.duration_secs,
        };
        self.encoder.encode(&request)?;
        filing::file_size(output).ok_or_else(|| {
            CoreError::EncodeFailure(format!("no output written to {}", output.display()))
        })
    }

    fn finish(self) -> RunReport {
        let items = self
            .states
            .into_iter()
            .map(|(path, state)| (path.display().to_string(), state))
            .collect();
        RunReport {
            statistics: self.stats,
            items,
            started_at: self.started_at,
            elapsed: self.started.elapsed(),
        }
    }
}

fn report_sizes(original_size: u64, new_size: u64, classification: Classification) {
    terminal::print_status("Original size", &format_bytes(original_size), false);
    terminal::print_status("Encoded size", &format_bytes(new_size), false);
    terminal::print_status("Change", &classification.to_string(), true);
}
