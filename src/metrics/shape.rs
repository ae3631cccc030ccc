//! Geometric shape properties of a card.
//!
//! An ideal card lies on a four-sided figure that looks the same after a 180°
//! turn. These numbers measure how far a recorded cycle is from that ideal,
//! in normalized card space.

use serde::Serialize;

use crate::card::{DynaCard, extract_cycle, extract_cycle_by_displacement, split_loop};
use crate::domain::{CycleMode, Point, RawSample};
use crate::error::CardError;
use crate::metrics::quad::Quadrilateral;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeProperties {
    pub area: f64,
    pub distance_from_shape: f64,
    pub distance_from_rotated_shape: f64,
    pub cycle_len: usize,
    pub quadrilateral: Quadrilateral,
}

/// Enclosed area by Green's theorem (trapezoid sum over the closed polygon).
///
/// Positive for clockwise traversal, which is how cards are recorded.
pub fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            0.5 * (a.x + b.x) * (a.y - b.y)
        })
        .sum()
}

/// Cut one cycle from `samples` and measure its shape.
pub fn shape_properties(samples: &[RawSample], mode: CycleMode) -> Result<ShapeProperties, CardError> {
    let cycle = match mode {
        CycleMode::Angle => extract_cycle(samples),
        CycleMode::Displacement => extract_cycle_by_displacement(samples),
    };
    let points: Vec<Point> = cycle.iter().map(RawSample::point).collect();

    let split = split_loop(&points)?;
    let normalized = split.normalized.clone();
    let c = split.corners;
    let fallback = [c.lower_left, c.upper_left, c.upper_right, c.lower_right].map(|i| normalized[i]);

    let card = DynaCard::from(split);
    let quadrilateral = Quadrilateral::from_card(&card, fallback);
    let rotated = quadrilateral.rotated_180();
    tracing::debug!(?quadrilateral, "fitted quadrilateral");

    Ok(ShapeProperties {
        area: polygon_area(&normalized),
        distance_from_shape: quadrilateral.mean_distance(&normalized),
        distance_from_rotated_shape: rotated.mean_distance(&normalized),
        cycle_len: cycle.len(),
        quadrilateral,
    })
}
