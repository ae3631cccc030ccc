//! Stroke-cycle extraction.
//!
//! Recordings usually span several strokes and may start mid-stroke. Only the
//! first complete cycle is classified.

use crate::domain::RawSample;

/// Displacement at or below which a stroke is considered at its bottom.
pub const DISPLACEMENT_START_THRESHOLD: f64 = 1.0;
/// Displacement at or above which the stroke has clearly left the bottom.
pub const DISPLACEMENT_STARTED_THRESHOLD: f64 = 5.0;

/// Cut the first cycle out of an angle-indexed series.
///
/// The cycle runs from the first sample with `angle == 0` through the next
/// one (inclusive). Without a second zero the cycle ends at the last sample;
/// without any zero the whole input is returned.
pub fn extract_cycle(samples: &[RawSample]) -> &[RawSample] {
    let Some(start) = samples.iter().position(|s| s.angle == 0) else {
        return samples;
    };

    let end = samples[start + 1..]
        .iter()
        .position(|s| s.angle == 0)
        .map_or(samples.len() - 1, |offset| start + 1 + offset);

    &samples[start..=end]
}

/// Cut the first cycle out of a series using displacement alone.
///
/// Leading samples above the start threshold are skipped (the recording began
/// mid-stroke). The cycle opens at the first sample at or below
/// [`DISPLACEMENT_START_THRESHOLD`], is considered under way once displacement
/// reaches [`DISPLACEMENT_STARTED_THRESHOLD`], and closes (inclusive) at the
/// next sample back at or below the start threshold. This tolerates jitter
/// around the bottom of the stroke.
pub fn extract_cycle_by_displacement(samples: &[RawSample]) -> &[RawSample] {
    let Some(start) = samples
        .iter()
        .position(|s| s.displacement <= DISPLACEMENT_START_THRESHOLD)
    else {
        return &samples[..0];
    };

    let mut under_way = false;
    for (i, s) in samples.iter().enumerate().skip(start + 1) {
        if !under_way {
            under_way = s.displacement >= DISPLACEMENT_STARTED_THRESHOLD;
        } else if s.displacement <= DISPLACEMENT_START_THRESHOLD {
            return &samples[start..=i];
        }
    }

    &samples[start..]
}
