//! A four-sided figure fitted to a card and distances to it.
//!
//! Vertices are numbered from the lower-left corner in travel order:
//! `v1` lower-left, `v2` upper-left, `v3` upper-right, `v4` lower-right.
//! Side `k` runs from `v_k` to `v_{k+1}` (side 4 closes back to `v1`).

use nalgebra::{Matrix2, Vector2};
use serde::Serialize;

use crate::card::{BoundarySegment, DynaCard};
use crate::domain::Point;

/// |det| below which two fitted lines are treated as parallel.
const PARALLEL_DET: f64 = 1e-9;

/// Line in implicit form `a·x + b·y = c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImplicitLine {
    pub normal: Vector2<f64>,
    pub offset: f64,
}

impl ImplicitLine {
    /// Best straight-line description of a fitted segment.
    ///
    /// Uses whichever of the forward (`y = m·x + q`) and inverse
    /// (`x = m·y + q`) regressions has the lower error.
    pub fn from_segment(segment: &BoundarySegment) -> Option<Self> {
        let forward = segment.forward_fit().map(|f| {
            (f.fit_error, ImplicitLine { normal: Vector2::new(-f.slope, 1.0), offset: f.intercept })
        });
        let inverse = segment.inverse_fit().map(|f| {
            (f.fit_error, ImplicitLine { normal: Vector2::new(1.0, -f.slope), offset: f.intercept })
        });

        match (forward, inverse) {
            (Some(a), Some(b)) => Some(if b.0 < a.0 { b.1 } else { a.1 }),
            (a, b) => a.or(b).map(|(_, line)| line),
        }
    }

    /// Intersection with another line, `None` when (nearly) parallel.
    pub fn intersect(&self, other: &ImplicitLine) -> Option<Point> {
        let m = Matrix2::new(self.normal.x, self.normal.y, other.normal.x, other.normal.y);
        if m.determinant().abs() < PARALLEL_DET {
            return None;
        }
        let solution = m.lu().solve(&Vector2::new(self.offset, other.offset))?;
        let p = Point::new(solution.x, solution.y);
        (p.x.is_finite() && p.y.is_finite()).then_some(p)
    }
}

/// Distance from `p` to the closed segment `a`–`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = Vector2::new(b.x - a.x, b.y - a.y);
    let ap = Vector2::new(p.x - a.x, p.y - a.y);
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return p.distance(&a);
    }
    let t = (ap.dot(&ab) / len_sq).clamp(0.0, 1.0);
    p.distance(&Point::new(a.x + t * ab.x, a.y + t * ab.y))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quadrilateral {
    pub vertices: [Point; 4],
}

impl Quadrilateral {
    pub fn new(vertices: [Point; 4]) -> Self {
        Self { vertices }
    }

    /// Intersect adjacent side lines of a card.
    ///
    /// `fallback` holds the detected corner samples; a vertex whose two lines
    /// are parallel or unfittable falls back to its corner sample.
    pub fn from_card(card: &DynaCard, fallback: [Point; 4]) -> Self {
        let [left, top, right, bottom] = card.segments().map(ImplicitLine::from_segment);
        let pairs = [(left, bottom), (left, top), (top, right), (right, bottom)];

        let mut vertices = fallback;
        for (vertex, (a, b)) in vertices.iter_mut().zip(pairs) {
            if let Some(p) = a.zip(b).and_then(|(a, b)| a.intersect(&b)) {
                *vertex = p;
            }
        }
        Self { vertices }
    }

    /// Rotate the figure 180° about the midpoint of its `v1`–`v3` diagonal.
    pub fn rotated_180(&self) -> Self {
        let [v1, v2, v3, v4] = self.vertices;
        let new_v2 = Point::new(v3.x - (v4.x - v1.x), v3.y - (v4.y - v1.y));
        let new_v4 = Point::new(v3.x - (v2.x - v1.x), v3.y - (v2.y - v1.y));
        Self::new([v1, new_v2, v3, new_v4])
    }

    /// Distance from `p` to the nearest side.
    pub fn distance(&self, p: Point) -> f64 {
        (0..4)
            .map(|k| distance_to_segment(p, self.vertices[k], self.vertices[(k + 1) % 4]))
            .fold(f64::INFINITY, f64::min)
    }

    /// Mean distance of `points` to the figure, 0 for no points.
    pub fn mean_distance(&self, points: &[Point]) -> f64 {
        if points.is_empty() {
            return 0.0;
        }
        points.iter().map(|&p| self.distance(p)).sum::<f64>() / points.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Side;

    fn unit_square() -> Quadrilateral {
        Quadrilateral::new([
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ])
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert!((distance_to_segment(Point::new(0.5, 0.3), a, b) - 0.3).abs() < 1e-12);
        assert!((distance_to_segment(Point::new(-3.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        assert!((distance_to_segment(Point::new(4.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        assert!((distance_to_segment(Point::new(2.0, 0.0), a, a) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn square_distance_uses_nearest_side() {
        let sq = unit_square();
        assert!((sq.distance(Point::new(0.5, 0.5)) - 0.5).abs() < 1e-12);
        assert!((sq.distance(Point::new(0.1, 0.6)) - 0.1).abs() < 1e-12);
        assert!(sq.distance(Point::new(1.0, 0.3)) < 1e-12);
        assert_eq!(sq.mean_distance(&[]), 0.0);
    }

    #[test]
    fn rotation_keeps_parallelograms_and_flips_trapezoids() {
        let sq = unit_square();
        assert_eq!(sq.rotated_180(), sq);

        let trap = Quadrilateral::new([
            Point::new(0.0, 0.0),
            Point::new(0.2, 1.0),
            Point::new(0.8, 1.0),
            Point::new(1.0, 0.0),
        ]);
        let rotated = trap.rotated_180();
        assert_eq!(rotated.vertices[0], trap.vertices[0]);
        assert_eq!(rotated.vertices[2], trap.vertices[2]);
        assert!((rotated.vertices[1].x + 0.2).abs() < 1e-12);
        assert!((rotated.vertices[1].y - 1.0).abs() < 1e-12);
        assert!((rotated.vertices[3].x - 0.6).abs() < 1e-12);
        assert!((rotated.vertices[3].y - 0.0).abs() < 1e-12);
    }

    #[test]
    fn lines_intersect_at_shared_point() {
        // y = x and x = 1 - y (inverse form) meet at (0.5, 0.5).
        let a = ImplicitLine { normal: Vector2::new(-1.0, 1.0), offset: 0.0 };
        let b = ImplicitLine { normal: Vector2::new(1.0, 1.0), offset: 1.0 };
        let p = a.intersect(&b).unwrap();
        assert!((p.x - 0.5).abs() < 1e-12 && (p.y - 0.5).abs() < 1e-12);
        assert!(a.intersect(&a).is_none());
    }

    #[test]
    fn vertical_side_line_comes_from_inverse_fit() {
        let seg = BoundarySegment::from_points(
            "left",
            Side::Left,
            (0..5).map(|i| Point::new(0.25, i as f64 / 4.0)),
        )
        .unwrap();
        let line = ImplicitLine::from_segment(&seg).unwrap();
        assert_eq!(line.normal, Vector2::new(1.0, -0.0));
        assert!((line.offset - 0.25).abs() < 1e-12);
    }

    #[test]
    fn card_vertices_are_side_intersections() {
        let side = |s: Side, pts: Vec<(f64, f64)>| {
            BoundarySegment::from_points(s.name(), s, pts.into_iter().map(|(x, y)| Point::new(x, y))).unwrap()
        };
        let card = DynaCard::new(
            side(Side::Left, vec![(0.0, 0.1), (0.0, 0.5), (0.0, 0.9)]),
            side(Side::Top, vec![(0.1, 1.0), (0.5, 1.0), (0.9, 1.0)]),
            side(Side::Right, vec![(1.0, 0.9), (1.0, 0.5), (1.0, 0.1)]),
            side(Side::Bottom, vec![(0.9, 0.0), (0.5, 0.0), (0.1, 0.0)]),
        );
        let fallback = [Point::new(9.0, 9.0); 4];
        let quad = Quadrilateral::from_card(&card, fallback);
        let expected = unit_square();
        for (got, want) in quad.vertices.iter().zip(expected.vertices) {
            assert!(got.distance(&want) < 1e-9, "{got:?} vs {want:?}");
        }
    }
}
