//! Formatted terminal output.
//!
//! We keep formatting code in one place so the card pipeline stays free of
//! presentation concerns and output changes are localized.

use crate::card::{BoundarySegment, Diagnosis, DynaCard};
use crate::domain::{CardHeader, ClassifyConfig};
use crate::io::ingest::IngestedCard;

/// Format the run summary: file metadata, diagnosis and segment diagnostics.
pub fn format_summary(
    ingest: &IngestedCard,
    header: &CardHeader,
    diagnosis: &Diagnosis,
    config: &ClassifyConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== dyna - Dynamometer Card Classification ===\n");
    out.push_str(&format!("File: {}\n", config.path.display()));
    out.push_str(&format!(
        "Well: {} | Timestamp: {}\n",
        or_dash(&header.well_id),
        or_dash(&header.timestamp)
    ));
    out.push_str(&format!(
        "Device: {} | Sensor: {}\n",
        or_dash(&header.device_serial),
        or_dash(&header.sensor_serial)
    ));
    out.push_str(&format!(
        "Rows: read={} used={} errors={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.row_errors.len()
    ));
    for e in ingest.row_errors.iter().take(5) {
        out.push_str(&format!("  line {}: {}\n", e.line, e.message));
    }
    if ingest.row_errors.len() > 5 {
        out.push_str(&format!("  ... {} more\n", ingest.row_errors.len() - 5));
    }
    out.push_str(&format!(
        "Peak load: {:.2} (minimum {:.2})\n",
        diagnosis.peak_load, config.min_weight
    ));

    out.push_str(&format!("\nDiagnosis: {}\n", diagnosis.shape));

    match &diagnosis.card {
        Some(geometry) => {
            out.push_str(&format!("Cycle: n={}\n\n", diagnosis.cycle_len));
            out.push_str(&format_segment_table(&geometry.card));
        }
        None => out.push_str("Peak load below minimum; card geometry not evaluated.\n"),
    }

    out
}

/// One row per side with fit statistics and predicate flags.
pub fn format_segment_table(card: &DynaCard) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<7} {:>6} {:>7} {:>10} {:>10} {:>10} {:>10} {:<}\n",
            "side", "points", "length", "fwd_slope", "fwd_err", "inv_slope", "inv_err", "flags"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<7} {:-<6} {:-<7} {:-<10} {:-<10} {:-<10} {:-<10} {:-<16}\n",
            "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for seg in card.segments() {
        let (fwd_slope, fwd_err) = fit_columns(seg.forward_fit().map(|f| (f.slope, f.fit_error)));
        let (inv_slope, inv_err) = fit_columns(seg.inverse_fit().map(|f| (f.slope, f.fit_error)));
        out.push_str(
            format!(
                "{:<7} {:>6} {:>7.3} {:>10} {:>10} {:>10} {:>10} {:<}\n",
                seg.side().name(),
                seg.points().len(),
                seg.length(),
                fwd_slope,
                fwd_err,
                inv_slope,
                inv_err,
                flags(seg),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn fit_columns(fit: Option<(f64, f64)>) -> (String, String) {
    match fit {
        Some((slope, err)) => (format!("{slope:.3}"), format!("{err:.5}")),
        None => ("-".to_string(), "-".to_string()),
    }
}

fn flags(seg: &BoundarySegment) -> String {
    let checks = [
        (seg.is_good_fit(), "good"),
        (seg.is_vertical(), "vertical"),
        (seg.is_flat(), "flat"),
        (seg.is_slope_up(), "up"),
        (seg.is_slope_down(), "down"),
    ];
    let set: Vec<&str> = checks.iter().filter(|(on, _)| *on).map(|(_, name)| *name).collect();
    if set.is_empty() { "-".to_string() } else { set.join(",") }
}

fn or_dash(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Point, Side};

    fn side(s: Side, pts: &[(f64, f64)]) -> BoundarySegment {
        BoundarySegment::from_points(s.name(), s, pts.iter().map(|&(x, y)| Point::new(x, y))).unwrap()
    }

    #[test]
    fn segment_table_golden_snapshot() {
        let card = DynaCard::new(
            side(Side::Left, &[(0.0, 0.0), (0.0, 0.5)]),
            side(Side::Top, &[(0.0, 1.0), (0.5, 1.0)]),
            side(Side::Right, &[(1.0, 1.0), (1.0, 0.5)]),
            side(Side::Bottom, &[(1.0, 0.0), (0.5, 0.0)]),
        );
        let expected = concat!(
            "side    points  length  fwd_slope    fwd_err  inv_slope    inv_err flags\n",
            "------- ------ ------- ---------- ---------- ---------- ---------- ----------------\n",
            "left         2   0.500          -          -      0.000    0.00000 good,vertical\n",
            "top          2   0.500      0.000    0.00000          -          - good,flat\n",
            "right        2   0.500          -          -      0.000    0.00000 good,vertical\n",
            "bottom       2   0.500      0.000    0.00000          -          - good,flat\n",
        );
        assert_eq!(format_segment_table(&card), expected);
    }
}
