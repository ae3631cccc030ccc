//! Sample-file ingest.
//!
//! A sample file is a plain CSV of `angle,displacement,load` rows. Lines
//! starting with `#` are comments; four of them carry header metadata:
//!
//! ```text
//! # Well ID Number: 42-501-20130
//! # Timestamp: 2019-03-08T14:05:00
//! # Device Serial Number: 1022
//! # Sensor Serial Number: A-77
//! position,length,weight
//! 0,0.12,4051.7
//! 15,1.80,6420.3
//! ```
//!
//! Row-level problems are collected rather than fatal: a bad row is skipped
//! and reported, the rest of the file is still used.

use std::fs;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{CardHeader, RawSample};
use crate::error::AppError;

const WELL_ID_KEY: &str = "Well ID Number";
const TIMESTAMP_KEY: &str = "Timestamp";
const DEVICE_SERIAL_KEY: &str = "Device Serial Number";
const SENSOR_SERIAL_KEY: &str = "Sensor Serial Number";

/// Column-name rows that are skipped wherever they appear.
const HEADER_ROWS: [[&str; 3]; 2] = [
    ["position", "length", "weight"],
    ["angle", "displacement", "load"],
];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: header metadata + samples in file order + row errors.
#[derive(Debug, Clone)]
pub struct IngestedCard {
    pub header: CardHeader,
    pub samples: Vec<RawSample>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a sample file.
pub fn load_card_file(path: &Path) -> Result<IngestedCard, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read sample file '{}': {e}", path.display())))?;
    let card = parse_card(&text)?;
    tracing::info!(
        path = %path.display(),
        rows_read = card.rows_read,
        rows_used = card.rows_used,
        row_errors = card.row_errors.len(),
        "loaded sample file"
    );
    Ok(card)
}

/// Parse sample-file contents.
pub fn parse_card(text: &str) -> Result<IngestedCard, AppError> {
    let header = parse_header(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut samples = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                rows_read += 1;
                let line = e.position().map_or(0, |p| p.line() as usize);
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        if is_blank(&record) || is_header_row(&record) {
            continue;
        }
        rows_read += 1;

        let line = record.position().map_or(0, |p| p.line() as usize);
        match parse_row(&record) {
            Ok(sample) => samples.push(sample),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = samples.len();
    if rows_used == 0 {
        return Err(AppError::new(3, "No valid sample rows found."));
    }

    Ok(IngestedCard {
        header,
        samples,
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Collect header metadata from `#` comment lines.
///
/// Each field is the text after the first `:` following its key, trimmed.
/// The first occurrence of a key wins.
pub fn parse_header(text: &str) -> CardHeader {
    let mut header = CardHeader::default();

    for line in text.lines().filter(|l| l.trim_start().starts_with('#')) {
        let slot = if line.contains(WELL_ID_KEY) {
            (&mut header.well_id, WELL_ID_KEY)
        } else if line.contains(DEVICE_SERIAL_KEY) {
            (&mut header.device_serial, DEVICE_SERIAL_KEY)
        } else if line.contains(SENSOR_SERIAL_KEY) {
            (&mut header.sensor_serial, SENSOR_SERIAL_KEY)
        } else if line.contains(TIMESTAMP_KEY) {
            (&mut header.timestamp, TIMESTAMP_KEY)
        } else {
            continue;
        };

        let (field, key) = slot;
        if field.is_some() {
            continue;
        }
        *field = header_value(line, key);
    }

    header
}

fn header_value(line: &str, key: &str) -> Option<String> {
    let after_key = &line[line.find(key)? + key.len()..];
    let value = after_key[after_key.find(':')? + 1..].trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

fn is_header_row(record: &StringRecord) -> bool {
    record.len() == 3
        && HEADER_ROWS.iter().any(|names| {
            names
                .iter()
                .zip(record.iter())
                .all(|(name, field)| field.trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
        })
}

fn parse_row(record: &StringRecord) -> Result<RawSample, String> {
    if record.len() != 3 {
        return Err(format!("Expected 3 fields (angle,displacement,load), found {}.", record.len()));
    }

    let angle = parse_angle(&record[0])?;
    let displacement = parse_f64(&record[1], "displacement")?;
    let load = parse_f64(&record[2], "load")?;
    Ok(RawSample::new(angle, displacement, load))
}

fn parse_angle(s: &str) -> Result<i32, String> {
    if let Ok(a) = s.parse::<i32>() {
        return Ok(a);
    }
    // Some loggers write the angle as `15.0`.
    let v = parse_f64(s, "angle")?;
    if v.fract() != 0.0 || v.abs() > i32::MAX as f64 {
        return Err(format!("Invalid angle '{s}': expected whole degrees."));
    }
    Ok(v as i32)
}

fn parse_f64(s: &str, name: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid {name} '{s}'.")),
    }
}
