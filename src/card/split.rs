//! Splitting one cycle's closed loop into four fitted sides.
//!
//! Steps:
//! 1. normalize displacement and load independently to [0, 1]
//! 2. find the four corners as extremes of `x + 2y` and `x - 2y`
//! 3. walk the loop circularly from the lower-left corner, handing points to
//!    left, top, right and bottom as each following corner is reached
//! 4. fit every side
//!
//! All steps are pure functions over slices.

use serde::Serialize;

use crate::card::segment::{BoundarySegment, SegmentBuilder};
use crate::domain::{Point, Side};
use crate::error::CardError;

/// Smallest loop that can have four distinct corners.
pub const MIN_CYCLE_SAMPLES: usize = 4;

/// Weight of the load axis in the corner projections.
const CORNER_LOAD_WEIGHT: f64 = 2.0;

/// Indices (into the cycle) of the four loop corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Corners {
    pub lower_left: usize,
    pub upper_left: usize,
    pub upper_right: usize,
    pub lower_right: usize,
}

impl Corners {
    /// Corner that opens each side, in travel order.
    pub fn opening(&self, side: Side) -> usize {
        match side {
            Side::Left => self.lower_left,
            Side::Top => self.upper_left,
            Side::Right => self.upper_right,
            Side::Bottom => self.lower_right,
        }
    }
}

/// Scale values to [0, 1] by `(v - min) / (max - min)`.
pub fn normalize(values: &[f64], axis: &'static str) -> Result<Vec<f64>, CardError> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if values.is_empty() || !range.is_finite() || range <= 0.0 {
        return Err(CardError::DegenerateRange {
            axis,
            value: if values.is_empty() { f64::NAN } else { min },
        });
    }

    Ok(values.iter().map(|v| (v - min) / range).collect())
}

/// Normalize a cycle's points axis by axis.
pub fn normalize_points(points: &[Point]) -> Result<Vec<Point>, CardError> {
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let nxs = normalize(&xs, "displacement")?;
    let nys = normalize(&ys, "load")?;
    Ok(nxs.into_iter().zip(nys).map(|(x, y)| Point::new(x, y)).collect())
}

/// Locate the corners of a normalized loop. Ties go to the earliest index.
pub fn detect_corners(points: &[Point]) -> Option<Corners> {
    let upper_right: Vec<f64> = points.iter().map(|p| p.x + CORNER_LOAD_WEIGHT * p.y).collect();
    let lower_right: Vec<f64> = points.iter().map(|p| p.x - CORNER_LOAD_WEIGHT * p.y).collect();

    Some(Corners {
        lower_left: argmin(&upper_right)?,
        upper_right: argmax(&upper_right)?,
        upper_left: argmin(&lower_right)?,
        lower_right: argmax(&lower_right)?,
    })
}

/// Walk the loop from the lower-left corner and collect each side's points.
///
/// A corner is the first point of the side it opens. The walk wraps from the
/// last index to 0.
pub fn partition(points: &[Point], corners: &Corners) -> [SegmentBuilder; 4] {
    let n = points.len();
    let mut index = corners.lower_left;

    Side::ALL.map(|side| {
        let mut builder = SegmentBuilder::new(side.name(), side);
        let stop = next_side(side).map_or(corners.lower_left, |next| corners.opening(next));
        while index != stop && index < n {
            builder.add_point(points[index]);
            index = (index + 1) % n;
        }
        builder
    })
}

/// Normalize, detect corners, partition and fit one cycle.
///
/// Returns the fitted sides in the order left, top, right, bottom together
/// with the normalized points and corner indices.
pub fn split_loop(points: &[Point]) -> Result<SplitLoop, CardError> {
    if points.len() < MIN_CYCLE_SAMPLES {
        return Err(CardError::InsufficientSamples {
            needed: MIN_CYCLE_SAMPLES,
            available: points.len(),
        });
    }

    let normalized = normalize_points(points)?;
    let corners = detect_corners(&normalized).ok_or_else(|| CardError::InsufficientSamples {
        needed: MIN_CYCLE_SAMPLES,
        available: 0,
    })?;
    tracing::debug!(?corners, n = normalized.len(), "detected card corners");

    let [left, top, right, bottom] = partition(&normalized, &corners);
    Ok(SplitLoop {
        segments: [left.fit()?, top.fit()?, right.fit()?, bottom.fit()?],
        normalized,
        corners,
    })
}

/// Output of [`split_loop`].
#[derive(Debug, Clone)]
pub struct SplitLoop {
    /// Left, top, right, bottom.
    pub segments: [BoundarySegment; 4],
    pub normalized: Vec<Point>,
    pub corners: Corners,
}

fn next_side(side: Side) -> Option<Side> {
    match side {
        Side::Left => Some(Side::Top),
        Side::Top => Some(Side::Right),
        Side::Right => Some(Side::Bottom),
        Side::Bottom => None,
    }
}

fn argmin(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.is_none_or(|(_, b)| v < b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.is_none_or(|(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Closed rectangle with `k` points per side, starting at the lower-left
    /// corner and running clockwise (up the left side first).
    fn rectangle(k: usize) -> Vec<Point> {
        let step = |j: usize| j as f64 / k as f64;
        let mut pts = Vec::with_capacity(4 * k);
        pts.extend((0..k).map(|j| Point::new(0.0, step(j))));
        pts.extend((0..k).map(|j| Point::new(step(j), 1.0)));
        pts.extend((0..k).map(|j| Point::new(1.0, 1.0 - step(j))));
        pts.extend((0..k).map(|j| Point::new(1.0 - step(j), 0.0)));
        pts
    }

    /// Trapezoid through `(0,0) -> (0.2,1) -> (0.8,1) -> (1,0)` with `k`
    /// points per side.
    fn trapezoid(k: usize) -> Vec<Point> {
        let vertices = [(0.0, 0.0), (0.2, 1.0), (0.8, 1.0), (1.0, 0.0)];
        let mut pts = Vec::with_capacity(4 * k);
        for s in 0..4 {
            let (x0, y0) = vertices[s];
            let (x1, y1) = vertices[(s + 1) % 4];
            for j in 0..k {
                let t = j as f64 / k as f64;
                pts.push(Point::new(x0 + t * (x1 - x0), y0 + t * (y1 - y0)));
            }
        }
        pts
    }

    #[test]
    fn normalize_scales_to_unit_range() {
        let out = normalize(&[10.0, 15.0, 20.0], "load").unwrap();
        assert_eq!(out, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn normalize_rejects_constant_axis() {
        let err = normalize(&[3.0, 3.0, 3.0], "load").unwrap_err();
        assert_eq!(err, CardError::DegenerateRange { axis: "load", value: 3.0 });
    }

    #[test]
    fn rectangle_partition_gives_k_points_per_side() {
        for k in [2usize, 3, 6, 10] {
            let pts = rectangle(k);
            let corners = detect_corners(&pts).unwrap();
            assert_eq!(
                corners,
                Corners { lower_left: 0, upper_left: k, upper_right: 2 * k, lower_right: 3 * k }
            );

            let sides = partition(&pts, &corners);
            let mut seen = Vec::new();
            for (s, side) in sides.iter().enumerate() {
                assert_eq!(side.len(), k, "side {s} for k={k}");
            }
            for side in sides {
                let seg = side.fit().unwrap();
                for p in seg.points() {
                    assert!(!seen.contains(p), "point {p:?} assigned twice");
                    seen.push(*p);
                }
            }
            assert_eq!(seen.len(), 4 * k);
        }
    }

    #[test]
    fn partition_wraps_around_the_end_of_the_cycle() {
        // Same rectangle, rotated so the recording starts halfway up the left side.
        let k = 4;
        let mut pts = rectangle(k);
        pts.rotate_left(2);
        let corners = detect_corners(&pts).unwrap();
        assert_eq!(corners.lower_left, 4 * k - 2);

        let sides = partition(&pts, &corners);
        assert!(sides.iter().all(|s| s.len() == k));
        let left = sides[0].clone().fit().unwrap();
        assert_eq!(left.points()[0], Point::new(0.0, 0.0));
        assert_eq!(left.points()[k - 1], Point::new(0.0, 0.75));
    }

    #[test]
    fn trapezoid_trace_recovers_corner_indices() {
        // 24 samples, angles 0..345 step 15, six per side.
        let pts = trapezoid(6);
        assert_eq!(pts.len(), 24);
        let raw: Vec<Point> = pts
            .iter()
            .map(|p| Point::new(20.0 + 100.0 * p.x, 3_000.0 + 9_000.0 * p.y))
            .collect();

        let split = split_loop(&raw).unwrap();
        let upper_right: Vec<f64> = split.normalized.iter().map(|p| p.x + 2.0 * p.y).collect();
        let lower_right: Vec<f64> = split.normalized.iter().map(|p| p.x - 2.0 * p.y).collect();
        let max_of = |v: &[f64]| v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_of = |v: &[f64]| v.iter().copied().fold(f64::INFINITY, f64::min);

        assert_eq!(
            split.corners,
            Corners { lower_left: 0, upper_left: 6, upper_right: 12, lower_right: 18 }
        );
        assert_eq!(upper_right[split.corners.lower_left], min_of(&upper_right));
        assert_eq!(upper_right[split.corners.upper_right], max_of(&upper_right));
        assert_eq!(lower_right[split.corners.upper_left], min_of(&lower_right));
        assert_eq!(lower_right[split.corners.lower_right], max_of(&lower_right));

        let [left, top, right, bottom] = &split.segments;
        assert_eq!(left.side(), Side::Left);
        assert!(left.is_slope_up() && !left.is_vertical());
        assert!(top.is_flat() && bottom.is_flat());
        assert!(right.is_slope_down() && !right.is_vertical());
    }

    #[test]
    fn ties_resolve_to_first_index() {
        assert_eq!(argmin(&[1.0, 0.0, 0.0]), Some(1));
        assert_eq!(argmax(&[2.0, 5.0, 5.0, 1.0]), Some(1));
        assert_eq!(argmin(&[]), None);
    }

    #[test]
    fn too_few_samples_fail_before_corner_detection() {
        let pts = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(1.0, 0.0)];
        assert_eq!(
            split_loop(&pts).unwrap_err(),
            CardError::InsufficientSamples { needed: 4, available: 3 }
        );
    }

    #[test]
    fn flat_load_fails_normalization() {
        let pts: Vec<Point> = (0..8).map(|i| Point::new(i as f64, 42.0)).collect();
        assert!(matches!(
            split_loop(&pts),
            Err(CardError::DegenerateRange { axis: "load", .. })
        ));
    }
}
