//! CSV export of detection results for review in a spreadsheet.

use crate::detection::DetectionResult;
use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column names, in output order
pub const CSV_HEADER: [&str; 9] = [
    "frame_index",
    "video_time",
    "position",
    "confidence",
    "spine",
    "arm_to_vertical",
    "wrist_height",
    "is_arm_peak",
    "is_spine_peak",
];

/// Write one row per result. Frames without a position get an empty cell.
///
/// # Errors
///
/// Returns `Csv` if writing to `writer` fails
pub fn write_csv<W: Write>(writer: W, results: &[DetectionResult]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    for result in results {
        csv.write_record([
            result.frame_index.to_string(),
            format!("{:.3}", result.video_time),
            result.detected_position.map(|p| p.to_string()).unwrap_or_default(),
            format!("{:.2}", result.confidence),
            format!("{:.1}", result.angles.spine),
            format!("{:.1}", result.angles.arm_to_vertical),
            format!("{:.1}", result.angles.arm_height()),
            result.is_arm_peak.to_string(),
            result.is_spine_peak.to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Write results to a CSV file, replacing it if present
///
/// # Errors
///
/// Returns `Io` if the file cannot be created, otherwise as [`write_csv`]
pub fn export_csv<P: AsRef<Path>>(path: P, results: &[DetectionResult]) -> Result<()> {
    write_csv(File::create(path)?, results)
}
