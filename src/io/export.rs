//! File outputs: JSON classification records, the batch report and
//! generated sample traces.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

use crate::domain::{CardHeader, ClassificationRecord, RawSample};
use crate::error::AppError;

/// One row of the batch report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub file: String,
    pub well_id: String,
    pub pump_state: String,
    pub peak_load: Option<f64>,
    pub comments: String,
}

/// Write a classification record as pretty JSON.
pub fn write_record_json(path: &Path, record: &ClassificationRecord) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create JSON export '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, record)
        .map_err(|e| AppError::new(2, format!("Failed to write JSON export: {e}")))?;
    Ok(())
}

/// `<prefix>_<YYYYMMDDHH>.csv`
pub fn report_file_name<Tz: TimeZone>(prefix: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{prefix}_{}.csv", at.format("%Y%m%d%H"))
}

/// True for file names [`report_file_name`] produces with this prefix.
pub fn is_report_file(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix(".csv"))
        .is_some_and(|stamp| stamp.len() == 10 && stamp.bytes().all(|b| b.is_ascii_digit()))
}

/// Write the batch report into `dir` and return its path.
pub fn write_batch_report(dir: &Path, prefix: &str, rows: &[ReportRow]) -> Result<PathBuf, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create report dir '{}': {e}", dir.display())))?;
    let path = dir.join(report_file_name(prefix, &Local::now()));

    let mut writer = csv::Writer::from_path(&path)
        .map_err(|e| AppError::new(2, format!("Failed to create report '{}': {e}", path.display())))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write report row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush report: {e}")))?;

    Ok(path)
}

/// Write samples in the ingest format, header metadata first.
pub fn write_samples_csv(out: &mut impl Write, header: &CardHeader, samples: &[RawSample]) -> Result<(), AppError> {
    let fields = [
        ("Well ID Number", &header.well_id),
        ("Timestamp", &header.timestamp),
        ("Device Serial Number", &header.device_serial),
        ("Sensor Serial Number", &header.sensor_serial),
    ];
    for (key, value) in fields {
        if let Some(v) = value {
            writeln!(out, "# {key}: {v}").map_err(|e| AppError::new(2, format!("Failed to write samples: {e}")))?;
        }
    }

    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(["angle", "displacement", "load"])
        .map_err(|e| AppError::new(2, format!("Failed to write samples: {e}")))?;
    for s in samples {
        writer
            .write_record([s.angle.to_string(), format!("{:.4}", s.displacement), format!("{:.4}", s.load)])
            .map_err(|e| AppError::new(2, format!("Failed to write samples: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write samples: {e}")))?;
    Ok(())
}
