//! Boundary segments: one side of the card loop plus its fitted lines.
//!
//! A segment has a two-phase lifecycle:
//!
//! 1. `SegmentBuilder` collects points in travel order.
//! 2. `SegmentBuilder::fit` produces an immutable `BoundarySegment` carrying the
//!    forward fit (`y` on `x`), the inverse fit (`x` on `y`) and the endpoint
//!    length. Shape predicates exist only on the fitted type.

use serde::Serialize;

use crate::domain::{FittedLine, Point, Side};
use crate::error::CardError;
use crate::math::{fit_inverse_line, fit_line};

/// Fit error (mean squared residual, card space) below which a line is trusted.
pub const GOOD_FIT_MAX_ERROR: f64 = 0.002;
/// |slope| below which a side counts as flat (forward) or vertical (inverse).
pub const LEVEL_MAX_SLOPE: f64 = 0.1;
/// |slope| above which a side counts as sloping up or down.
pub const SLOPED_MIN_SLOPE: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct SegmentBuilder {
    name: String,
    side: Side,
    points: Vec<Point>,
}

impl SegmentBuilder {
    pub fn new(name: impl Into<String>, side: Side) -> Self {
        Self {
            name: name.into(),
            side,
            points: Vec::new(),
        }
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fit both regressions and measure the endpoint length.
    ///
    /// Only an empty segment is an error. A direction whose regression is
    /// degenerate (e.g. the forward fit of a perfectly vertical side) is kept
    /// as `None` and never counts as a good fit.
    pub fn fit(self) -> Result<BoundarySegment, CardError> {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return Err(CardError::DegenerateFit(format!(
                "segment '{}' has no points",
                self.name
            )));
        };
        let length = first.distance(last);

        Ok(BoundarySegment {
            forward_fit: fit_line(&self.points).ok(),
            inverse_fit: fit_inverse_line(&self.points).ok(),
            length,
            name: self.name,
            side: self.side,
            points: self.points,
        })
    }
}

/// A fitted side of the card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundarySegment {
    name: String,
    side: Side,
    points: Vec<Point>,
    forward_fit: Option<FittedLine>,
    inverse_fit: Option<FittedLine>,
    length: f64,
}

impl BoundarySegment {
    /// Build and fit a segment from points in travel order.
    pub fn from_points(
        name: impl Into<String>,
        side: Side,
        points: impl IntoIterator<Item = Point>,
    ) -> Result<Self, CardError> {
        let mut builder = SegmentBuilder::new(name, side);
        for p in points {
            builder.add_point(p);
        }
        builder.fit()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Regression of y on x, if it exists.
    pub fn forward_fit(&self) -> Option<&FittedLine> {
        self.forward_fit.as_ref()
    }

    /// Regression of x on y, if it exists.
    pub fn inverse_fit(&self) -> Option<&FittedLine> {
        self.inverse_fit.as_ref()
    }

    /// Straight-line distance between the first and last point.
    ///
    /// Intermediate points are ignored; the classifier thresholds assume this.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Forward fit error, `None` when the forward fit is degenerate.
    pub fn forward_error(&self) -> Option<f64> {
        self.forward_fit.map(|f| f.fit_error)
    }

    pub fn is_good_fit(&self) -> bool {
        let good = |fit: &Option<FittedLine>| fit.is_some_and(|f| f.fit_error < GOOD_FIT_MAX_ERROR);
        good(&self.forward_fit) || good(&self.inverse_fit)
    }

    pub fn is_vertical(&self) -> bool {
        self.is_good_fit() && self.inverse_fit.is_some_and(|f| f.slope.abs() < LEVEL_MAX_SLOPE)
    }

    pub fn is_slope_up(&self) -> bool {
        self.is_good_fit() && self.forward_fit.is_some_and(|f| f.slope > SLOPED_MIN_SLOPE)
    }

    pub fn is_slope_down(&self) -> bool {
        self.is_good_fit() && self.forward_fit.is_some_and(|f| f.slope < -SLOPED_MIN_SLOPE)
    }

    pub fn is_flat(&self) -> bool {
        self.is_good_fit() && self.forward_fit.is_some_and(|f| f.slope.abs() < LEVEL_MAX_SLOPE)
    }

    /// Leading points within half the endpoint length of the first point.
    ///
    /// Scanning stops at the first point farther than that, even if later
    /// points come back within range.
    pub fn first_half(&self) -> Result<BoundarySegment, CardError> {
        let half = 0.5 * self.length;
        let mut builder = SegmentBuilder::new(format!("first half of {}", self.name), self.side);
        if let Some(start) = self.points.first() {
            for p in self.points.iter().take_while(|p| start.distance(p) <= half) {
                builder.add_point(*p);
            }
        }
        builder.fit()
    }

    /// Trailing points within half the endpoint length of the last point,
    /// returned in forward order.
    pub fn second_half(&self) -> Result<BoundarySegment, CardError> {
        let half = 0.5 * self.length;
        let mut tail: Vec<Point> = match self.points.last() {
            Some(end) => self
                .points
                .iter()
                .rev()
                .take_while(|p| end.distance(p) <= half)
                .copied()
                .collect(),
            None => Vec::new(),
        };
        tail.reverse();
        BoundarySegment::from_points(format!("second half of {}", self.name), self.side, tail)
    }
}
