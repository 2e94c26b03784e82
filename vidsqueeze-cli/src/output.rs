//! End-of-run report rendering.
//!
//! The summary is a pure projection of the `RunReport` returned by the core:
//! counts, byte totals and elapsed time. The same report can be written as JSON.

use std::fs;
use std::path::Path;

use console::style;
use log::info;
use unicode_width::UnicodeWidthStr;
use vidsqueeze_core::{RunReport, format_bytes, format_duration, terminal};

use crate::error::{CliErrorContext, CliResult};

/// Label/value rows of the summary, in display order.
pub fn summary_rows(report: &RunReport) -> Vec<(&'static str, String)> {
    let stats = &report.statistics;
    let mut rows = vec![
        ("Discovered", stats.files_discovered.to_string()),
        ("Finalized", stats.finalized.to_string()),
        ("Failed", stats.failed.to_string()),
        ("Already final", stats.skipped_existing.to_string()),
        ("Sent to stronger", stats.sent_to_stronger.to_string()),
        ("Stronger finalized", stats.stronger_finalized.to_string()),
        ("Stronger exhausted", stats.stronger_exhausted.to_string()),
        ("Stronger skipped", stats.stronger_skipped.to_string()),
        ("Input size", format_bytes(stats.total_input_bytes)),
        ("Processed original", format_bytes(stats.processed_original_bytes)),
        ("Processed final", format_bytes(stats.processed_final_bytes)),
    ];
    if stats.processed_original_bytes > 0 {
        rows.push(("Reduction", format!("{}%", stats.reduction_percent())));
    }
    rows.push(("Elapsed", format_duration(report.elapsed.as_secs_f64())));
    rows
}

/// Logs the summary table.
pub fn print_report(report: &RunReport) {
    terminal::print_section("Summary");
    let rows = summary_rows(report);
    let width = rows.iter().map(|(label, _)| label.width()).max().unwrap_or(0);

    for (label, value) in rows {
        let padding = " ".repeat(width - label.width() + 1);
        info!("  {}:{}{}", label, padding, style(value).bold());
    }

    let stats = &report.statistics;
    if stats.failed > 0 {
        info!("");
        info!("  {}", style(format!("{} file(s) copied to the failed tree", stats.failed)).yellow());
    }
}

/// Writes the report as pretty-printed JSON.
pub fn write_json_report(report: &RunReport, path: &Path) -> CliResult<()> {
    let json = report
        .to_json()
        .cli_with_context(|| "Failed to serialize run report")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .cli_with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, json).cli_with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("Run report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use std::collections::BTreeMap;
    use std::time::Duration;
    use vidsqueeze_core::RunStatistics;

    fn report(stats: RunStatistics) -> RunReport {
        RunReport {
            statistics: stats,
            items: BTreeMap::new(),
            started_at: Local::now(),
            elapsed: Duration::from_secs(3725),
        }
    }

    #[test]
    fn test_summary_rows() {
        let stats = RunStatistics {
            files_discovered: 3,
            total_input_bytes: 3 * 1024 * 1024,
            finalized: 2,
            failed: 1,
            processed_original_bytes: 2000,
            processed_final_bytes: 500,
            ..Default::default()
        };
        let rows = summary_rows(&report(stats));
        let get = |label: &str| {
            rows.iter()
                .find(|(l, _)| *l == label)
                .map(|(_, v)| v.clone())
                .unwrap()
        };

        assert_eq!(get("Discovered"), "3");
        assert_eq!(get("Failed"), "1");
        assert_eq!(get("Input size"), "3.00 MiB");
        assert_eq!(get("Reduction"), "75%");
        assert_eq!(get("Elapsed"), "01:02:05");
    }

    #[test]
    fn test_no_reduction_row_without_finalized_bytes() {
        let rows = summary_rows(&report(RunStatistics::default()));
        assert!(rows.iter().all(|(label, _)| *label != "Reduction"));
    }

    #[test]
    fn test_write_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/run.json");
        write_json_report(&report(RunStatistics::default()), &path).unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["statistics"]["files_discovered"], 0);
        assert_eq!(json["elapsed_secs"], 3725.0);
    }
}
