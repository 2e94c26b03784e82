// ============================================================================
// vidsqueeze-core/src/progress.rs
// ============================================================================
//
// ENCODE PROGRESS: ffmpeg Event Handling for a Single Attempt
//
// Turns the event stream of one ffmpeg run into user feedback: an indicatif
// bar on interactive terminals, coarse log lines otherwise, and a buffer of
// error output used when the encode fails.

use std::io::IsTerminal;
use std::time::Duration;

use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel as FfmpegLogLevel};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::utils::parse_ffmpeg_time;

/// Progress is logged every time it crosses another multiple of this value.
const LOG_STEP_PERCENT: u64 = 25;

/// Lines of ffmpeg error output kept for failure messages.
const MAX_ERROR_LINES: usize = 20;

/// Progress state for one encode attempt.
pub struct EncodeProgress {
    label: String,
    duration_secs: Option<f64>,
    bar: Option<ProgressBar>,
    last_logged_step: u64,
    errors: Vec<String>,
}

impl EncodeProgress {
    /// Creates the handler. A bar is drawn only when `show_bar` is set,
    /// stderr is a terminal and the duration is known.
    pub fn new(label: &str, duration_secs: Option<f64>, show_bar: bool) -> Self {
        let duration_secs = duration_secs.filter(|d| *d > 0.0);
        let bar = match duration_secs {
            Some(total) if show_bar && std::io::stderr().is_terminal() => Some(init_bar(total)),
            _ => None,
        };
        Self {
            label: label.to_string(),
            duration_secs,
            bar,
            last_logged_step: 0,
            errors: Vec::new(),
        }
    }

    pub fn handle_event(&mut self, event: FfmpegEvent) {
        match event {
            FfmpegEvent::Progress(progress) => self.on_time(&progress.time),
            FfmpegEvent::Log(level, message) => self.on_log(level, message),
            FfmpegEvent::Error(message) => self.push_error(message),
            _ => {}
        }
    }

    /// Error output collected so far, oldest first.
    pub fn error_output(&self) -> String {
        self.errors.join("\n")
    }

    /// Removes the bar from the terminal.
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn on_time(&mut self, time: &str) {
        let (Some(total), Some(current)) = (self.duration_secs, parse_ffmpeg_time(time)) else {
            return;
        };
        let percent = (current / total * 100.0).clamp(0.0, 100.0);

        if let Some(bar) = &self.bar {
            bar.set_position((current * 1000.0) as u64);
            return;
        }

        let step = (percent as u64 / LOG_STEP_PERCENT) * LOG_STEP_PERCENT;
        if step > self.last_logged_step {
            self.last_logged_step = step;
            log::info!("{}: {}% encoded", self.label, step);
        }
    }

    fn on_log(&mut self, level: FfmpegLogLevel, message: String) {
        match level {
            FfmpegLogLevel::Error | FfmpegLogLevel::Fatal => self.push_error(message),
            FfmpegLogLevel::Warning => log::debug!(target: "ffmpeg_log", "{message}"),
            _ => log::trace!(target: "ffmpeg_log", "{message}"),
        }
    }

    fn push_error(&mut self, message: String) {
        log::debug!("ffmpeg error output: {message}");
        if self.errors.len() == MAX_ERROR_LINES {
            self.errors.remove(0);
        }
        self.errors.push(message);
    }
}

impl Drop for EncodeProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

fn init_bar(total_secs: f64) -> ProgressBar {
    let bar = ProgressBar::new((total_secs * 1000.0) as u64);
    let style = ProgressStyle::default_bar()
        .template("  ⧖ Encoding: {percent:>3}% [{bar:30}] ({elapsed_precise} / {eta_precise})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##.");
    bar.set_style(style);
    bar.set_draw_target(ProgressDrawTarget::stderr());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
