//! Rule-based card diagnosis.
//!
//! The rules are checked top to bottom and the first match wins, so their
//! order matters as much as their conditions. Thresholds are in normalized card
//! space and were tuned against endpoint segment lengths.

use serde::Serialize;

use crate::card::segment::BoundarySegment;
use crate::card::split::SplitLoop;
use crate::domain::CardShape;

/// Bottom/top length below which the stroke is considered short.
const SHORT_STROKE: f64 = 0.8;
/// Top/bottom length below which a worn pump is suspected.
const WORN_STROKE: f64 = 0.9;
/// Left/right length above which friction is suspected.
const FRICTION_SIDE: f64 = 0.7;
/// Right-side fit error above which the downstroke is too irregular for gas.
const POUND_RIGHT_ERROR: f64 = 0.015;

/// The four fitted sides of one card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynaCard {
    left: BoundarySegment,
    top: BoundarySegment,
    right: BoundarySegment,
    bottom: BoundarySegment,
}

impl DynaCard {
    pub fn new(
        left: BoundarySegment,
        top: BoundarySegment,
        right: BoundarySegment,
        bottom: BoundarySegment,
    ) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn left(&self) -> &BoundarySegment {
        &self.left
    }

    pub fn top(&self) -> &BoundarySegment {
        &self.top
    }

    pub fn right(&self) -> &BoundarySegment {
        &self.right
    }

    pub fn bottom(&self) -> &BoundarySegment {
        &self.bottom
    }

    /// Left, top, right, bottom.
    pub fn segments(&self) -> [&BoundarySegment; 4] {
        [&self.left, &self.top, &self.right, &self.bottom]
    }

    /// Diagnose the card.
    ///
    /// Conditions use non-short-circuit `&` so every predicate of a rule is
    /// evaluated, as the rule table reads.
    pub fn classify(&self) -> CardShape {
        let (l, t, r, b) = (&self.left, &self.top, &self.right, &self.bottom);

        if l.is_vertical() & r.is_vertical() & t.is_flat() & b.is_flat() {
            CardShape::FullPump
        } else if t.is_flat()
            & b.is_flat()
            & l.is_slope_up()
            & l.is_good_fit()
            & r.is_slope_up()
            & r.is_good_fit()
        {
            CardShape::TubingMovement
        } else if t.is_flat()
            & b.is_flat()
            & l.is_vertical()
            & (b.length() < SHORT_STROKE)
            & r.forward_error().is_some_and(|e| e > POUND_RIGHT_ERROR)
        {
            CardShape::FluidPound
        } else if t.is_flat() & l.is_vertical() & b.is_flat() & (b.length() < SHORT_STROKE) {
            CardShape::GasInterference
        } else if l.is_vertical() & r.is_vertical() & first_half_flat(t) & first_half_flat(b) {
            CardShape::PumpHitting
        } else if l.is_vertical()
            & r.is_vertical()
            & (b.length() > SHORT_STROKE)
            & (t.length() > SHORT_STROKE)
        {
            CardShape::BentBarrel
        } else if b.is_flat() & !l.is_vertical() & !r.is_vertical() & (t.length() < WORN_STROKE) {
            CardShape::WornPlunger
        } else if t.is_flat() & !l.is_vertical() & !r.is_vertical() & (b.length() < WORN_STROKE) {
            CardShape::WornStanding
        } else if b.is_flat() & l.is_vertical() {
            CardShape::WornOrSplitBarrel
        } else if r.is_vertical() & l.is_vertical() {
            CardShape::FluidFriction
        } else if (r.length() > FRICTION_SIDE) & (l.length() > FRICTION_SIDE) {
            CardShape::DragFriction
        } else {
            CardShape::Other
        }
    }
}

impl From<SplitLoop> for DynaCard {
    fn from(split: SplitLoop) -> Self {
        let [left, top, right, bottom] = split.segments;
        DynaCard::new(left, top, right, bottom)
    }
}

fn first_half_flat(segment: &BoundarySegment) -> bool {
    segment.first_half().is_ok_and(|half| half.is_flat())
}
