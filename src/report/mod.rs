//! Reporting utilities: classification records, batch rows and formatted
//! terminal output.

pub mod format;

pub use format::*;

use crate::card::Diagnosis;
use crate::domain::{CardHeader, ClassificationRecord};
use crate::io::export::ReportRow;

/// Apply command-line overrides on top of the file header.
pub fn effective_header(
    file_header: &CardHeader,
    device_serial: Option<&str>,
    timestamp: Option<&str>,
) -> CardHeader {
    CardHeader {
        device_serial: device_serial.map(str::to_string).or_else(|| file_header.device_serial.clone()),
        timestamp: timestamp.map(str::to_string).or_else(|| file_header.timestamp.clone()),
        ..file_header.clone()
    }
}

pub fn classification_record(
    header: &CardHeader,
    diagnosis: &Diagnosis,
    file: &str,
    generated_at: String,
) -> ClassificationRecord {
    ClassificationRecord {
        well_id: header.well_id.clone(),
        pump_status: diagnosis.shape,
        device_serial: header.device_serial.clone(),
        sensor_serial: header.sensor_serial.clone(),
        timestamp: header.timestamp.clone(),
        file: file.to_string(),
        peak_load: diagnosis.peak_load,
        generated_at,
    }
}

/// Batch report row for a classified file.
pub fn report_row(file: &str, header: &CardHeader, diagnosis: &Diagnosis, row_errors: usize) -> ReportRow {
    ReportRow {
        file: file.to_string(),
        well_id: header.well_id.clone().unwrap_or_default(),
        pump_state: diagnosis.shape.to_string(),
        peak_load: Some(diagnosis.peak_load),
        comments: if row_errors > 0 {
            format!("{row_errors} malformed row(s) skipped")
        } else {
            String::new()
        },
    }
}

/// Batch report row for a file that could not be classified.
pub fn error_row(file: &str, message: &str) -> ReportRow {
    ReportRow {
        file: file.to_string(),
        well_id: String::new(),
        pump_state: "error".to_string(),
        peak_load: None,
        comments: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CardShape;

    fn flowing(peak: f64) -> Diagnosis {
        Diagnosis {
            shape: CardShape::FlowingWell,
            peak_load: peak,
            cycle_len: 0,
            card: None,
        }
    }

    #[test]
    fn overrides_replace_header_fields() {
        let file = CardHeader {
            well_id: Some("W".to_string()),
            timestamp: Some("t0".to_string()),
            device_serial: Some("d0".to_string()),
            sensor_serial: Some("s0".to_string()),
        };
        let h = effective_header(&file, Some("d1"), None);
        assert_eq!(h.device_serial.as_deref(), Some("d1"));
        assert_eq!(h.timestamp.as_deref(), Some("t0"));
        assert_eq!(h.sensor_serial.as_deref(), Some("s0"));

        let h = effective_header(&CardHeader::default(), None, Some("t9"));
        assert_eq!(h.timestamp.as_deref(), Some("t9"));
        assert!(h.device_serial.is_none());
    }

    #[test]
    fn record_carries_header_and_diagnosis() {
        let header = CardHeader {
            well_id: Some("W-3".to_string()),
            ..CardHeader::default()
        };
        let rec = classification_record(&header, &flowing(55.0), "w3.csv", "now".to_string());
        assert_eq!(rec.pump_status, CardShape::FlowingWell);
        assert_eq!(rec.well_id.as_deref(), Some("W-3"));
        assert_eq!(rec.peak_load, 55.0);
        assert_eq!(rec.file, "w3.csv");
    }

    #[test]
    fn report_rows_describe_outcome() {
        let row = report_row("a.csv", &CardHeader::default(), &flowing(10.0), 2);
        assert_eq!(row.pump_state, "flowing well");
        assert_eq!(row.comments, "2 malformed row(s) skipped");

        let err = error_row("b.csv", "boom");
        assert_eq!(err.pump_state, "error");
        assert_eq!(err.peak_load, None);
    }
}
