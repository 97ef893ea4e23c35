//! Closed loops of sketch-plane curves: point classification, area, bounds.

use serde::{Deserialize, Serialize};

use super::curves::Curve2d;
use super::point::Point2d;
use super::transform::BoundingBox2d;
use crate::Tolerance;

/// Position of a point relative to a closed loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointLoopPosition {
    OnVertex,
    OnEdge,
    Inside,
    Outside,
}

impl PointLoopPosition {
    pub fn is_on_boundary(self) -> bool {
        matches!(self, PointLoopPosition::OnVertex | PointLoopPosition::OnEdge)
    }
}

/// Classify `point` against the closed loop formed by `curves`.
///
/// Boundary tests use `tol.coincidence`; interior tests use an even-odd
/// crossing count over the discretized loop.
pub fn classify_point(point: &Point2d, curves: &[Curve2d], tol: &Tolerance) -> PointLoopPosition {
    let on_vertex = curves.iter().any(|c| {
        tol.points_coincident_2d(point, &c.start_point()) || tol.points_coincident_2d(point, &c.end_point())
    });
    if on_vertex {
        return PointLoopPosition::OnVertex;
    }
    if curves
        .iter()
        .any(|c| c.distance_to_point(point) <= tol.coincidence)
    {
        return PointLoopPosition::OnEdge;
    }
    if point_in_polyline(point, &loop_polyline(curves)) {
        PointLoopPosition::Inside
    } else {
        PointLoopPosition::Outside
    }
}

/// Discretized loop without the closing duplicate point.
pub fn loop_polyline(curves: &[Curve2d]) -> Vec<Point2d> {
    let mut points = Vec::new();
    for curve in curves {
        let samples = curve.sample_points();
        points.extend_from_slice(&samples[..samples.len() - 1]);
    }
    points
}

/// Shoelace area of the discretized loop. Positive for counter-clockwise loops.
pub fn loop_signed_area(curves: &[Curve2d]) -> f64 {
    polyline_signed_area(&loop_polyline(curves))
}

pub fn polyline_signed_area(points: &[Point2d]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice_area += a.x * b.y - b.x * a.y;
    }
    twice_area * 0.5
}

pub fn loop_bounding_box(curves: &[Curve2d]) -> BoundingBox2d {
    let mut bb = BoundingBox2d::empty();
    for curve in curves {
        for p in curve.sample_points() {
            bb.expand_to_include(&p);
        }
    }
    bb
}

/// Whether consecutive curves connect end-to-start, including last to first.
pub fn is_loop_closed(curves: &[Curve2d], tol: &Tolerance) -> bool {
    if curves.is_empty() {
        return false;
    }
    (0..curves.len()).all(|i| {
        let next = &curves[(i + 1) % curves.len()];
        tol.points_coincident_2d(&curves[i].end_point(), &next.start_point())
    })
}

/// Reverse the traversal direction of a closed loop.
pub fn reverse_loop(curves: &[Curve2d]) -> Vec<Curve2d> {
    curves.iter().rev().map(Curve2d::reversed).collect()
}

fn point_in_polyline(p: &Point2d, poly: &[Point2d]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (poly[i], poly[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
