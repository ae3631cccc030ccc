//! Entry point from raw samples to a diagnosis.

use crate::card::classify::DynaCard;
use crate::card::cycle::extract_cycle;
use crate::card::split::{Corners, split_loop};
use crate::domain::{CardShape, Point, RawSample};
use crate::error::CardError;

/// A diagnosis plus the artefacts that produced it.
///
/// `card` is `None` when the peak-load check short-circuited the geometry.
#[derive(Debug, Clone)]
pub struct Diagnosis {
    pub shape: CardShape,
    pub peak_load: f64,
    pub cycle_len: usize,
    pub card: Option<CardGeometry>,
}

/// Geometry of the classified cycle.
#[derive(Debug, Clone)]
pub struct CardGeometry {
    pub card: DynaCard,
    /// The cycle in normalized [0, 1] card space, in travel order.
    pub normalized: Vec<Point>,
    pub corners: Corners,
}

/// Largest load in the series, `None` for an empty series.
pub fn peak_load(samples: &[RawSample]) -> Option<f64> {
    samples.iter().map(|s| s.load).reduce(f64::max)
}

/// Diagnose a recording and keep the intermediate geometry.
///
/// A recording whose peak load never reaches `min_weight` is a flowing well;
/// no cycle is cut and no geometry is computed.
pub fn diagnose(samples: &[RawSample], min_weight: f64) -> Result<Diagnosis, CardError> {
    let peak = peak_load(samples).ok_or(CardError::InsufficientSamples {
        needed: 1,
        available: 0,
    })?;

    if peak < min_weight {
        tracing::debug!(peak, min_weight, "peak load below minimum, flowing well");
        return Ok(Diagnosis {
            shape: CardShape::FlowingWell,
            peak_load: peak,
            cycle_len: 0,
            card: None,
        });
    }

    let cycle = extract_cycle(samples);
    let points: Vec<Point> = cycle.iter().map(RawSample::point).collect();
    let split = split_loop(&points)?;
    let normalized = split.normalized.clone();
    let corners = split.corners;
    let card = DynaCard::from(split);
    let shape = card.classify();
    tracing::debug!(%shape, cycle_len = cycle.len(), "classified card");

    Ok(Diagnosis {
        shape,
        peak_load: peak,
        cycle_len: cycle.len(),
        card: Some(CardGeometry {
            card,
            normalized,
            corners,
        }),
    })
}

/// Diagnose a recording.
pub fn select_shape(samples: &[RawSample], min_weight: f64) -> Result<CardShape, CardError> {
    diagnose(samples, min_weight).map(|d| d.shape)
}
