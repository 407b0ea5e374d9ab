//! Human-readable and JSON output of the removal statistics

use gpx_redact_lib::{RegionKind, RegionReport, RegionSet, RemovalStats};
use std::path::Path;

/// Log the configured regions, one line each
pub fn log_regions(regions: &RegionSet) {
    if regions.rectangles().is_empty() {
        tracing::info!("No manual rectangle removal regions specified.");
    }
    for (index, rect) in regions.rectangles().iter().enumerate() {
        tracing::info!("Manual rectangle {}: {}", index + 1, rect);
    }

    if regions.circles().is_empty() {
        tracing::info!("No manual circle removal regions specified.");
    }
    for (index, circle) in regions.circles().iter().enumerate() {
        tracing::info!("Manual circle {}: {}", index + 1, circle);
    }
}

/// Log point removal and stray segment statistics
pub fn log_stats(stats: &RemovalStats) {
    tracing::info!("Total points removed: {}", stats.total_removed);
    for report in &stats.regions {
        tracing::info!(
            "Manual {} {}: Removed {} points",
            report.kind,
            report.number,
            report.points_removed
        );
    }

    for kind in [RegionKind::Rectangle, RegionKind::Circle] {
        for report in stats.regions_of(kind) {
            log_stray(report, stats.max_stray_length);
        }
    }

    if stats.stray_removed {
        tracing::info!(
            "Removing stray segments within vicinity (total segments to remove: {})",
            stats.stray_segments
        );
    } else {
        tracing::info!("Stray segments are retained in the output.");
    }
    tracing::debug!(
        split_segments = stats.split_segments,
        output_segments = stats.output_segments(),
        "Segments written"
    );
}

fn log_stray(report: &RegionReport, max_stray_length: f64) {
    match &report.stray_summary {
        Some(summary) => {
            tracing::info!(
                "Manual {} {}: Stray segments (length <= {:.2} m) in vicinity: {} segments",
                report.kind,
                report.number,
                max_stray_length,
                summary.count
            );
            tracing::info!(
                "    Lengths: min={:.2} m, max={:.2} m, avg={:.2} m",
                summary.min,
                summary.max,
                summary.average
            );
        }
        None => {
            tracing::info!(
                "Manual {} {}: No stray segments (length <= {:.2} m) found in vicinity.",
                report.kind,
                report.number,
                max_stray_length
            );
        }
    }
}

/// Serialize the statistics as pretty JSON
pub fn to_json(stats: &RemovalStats) -> serde_json::Result<String> {
    serde_json::to_string_pretty(stats)
}

/// Write the statistics as JSON to a file
pub fn write_json(stats: &RemovalStats, path: &Path) -> Result<(), super::AppError> {
    let json = to_json(stats)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpx_redact_lib::{RedactConfig, Redactor, Rectangle, io};

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="gpx-redact tests" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><trkseg>
    <trkpt lat="0.0" lon="-0.0005"></trkpt>
    <trkpt lat="0.0" lon="0.0005"></trkpt>
  </trkseg></trk>
</gpx>"#;

    fn sample_stats() -> RemovalStats {
        let document = io::read(SAMPLE.as_bytes()).unwrap();
        let mut regions = RegionSet::new();
        regions.push(Rectangle::new(0.0, 0.0, 0.0, 0.001).unwrap());
        let config = RedactConfig {
            max_stray_vicinity: Some(100.0),
            ..RedactConfig::default()
        };
        Redactor::new(regions, config)
            .inspect(document.gpx())
            .unwrap()
    }

    #[test]
    fn test_json_report_fields() {
        let stats = sample_stats();
        let json: serde_json::Value = serde_json::from_str(&to_json(&stats).unwrap()).unwrap();

        assert_eq!(json["total_removed"], 1);
        assert_eq!(json["regions"][0]["kind"], "rectangle");
        assert_eq!(json["regions"][0]["number"], 1);
        assert_eq!(json["regions"][0]["points_removed"], 1);
        assert_eq!(json["regions"][0]["stray_summary"]["count"], 1);
        assert_eq!(json["stray_removed"], false);
    }

    #[test]
    fn test_json_report_file() {
        let stats = sample_stats();
        let path = std::env::temp_dir().join(format!(
            "gpx-redact-report-{}.json",
            std::process::id()
        ));
        write_json(&stats, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: RemovalStats = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, stats);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_log_functions_handle_empty_stats() {
        log_regions(&RegionSet::new());
        log_stats(&RemovalStats::default());
    }
}
