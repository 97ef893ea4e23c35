use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use super::point::{Point2d, Point3d};
use super::vector::{Vec2, Vec3};
use crate::Tolerance;

// ─── 2D curves ───────────────────────────────────────────────────────────────

/// Bounded sketch-plane curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Curve2d {
    Line(Segment2d),
    Arc(Arc2d),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment2d {
    pub start: Point2d,
    pub end: Point2d,
}

/// A circular arc from `start_angle` to `end_angle` (radians, measured from +x).
/// A positive sweep runs counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc2d {
    pub center: Point2d,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Segment2d {
    pub fn new(start: Point2d, end: Point2d) -> Self {
        Self { start, end }
    }

    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    /// Normalized parameter of the orthogonal projection of `p` (0 at start, 1 at end).
    pub fn param_at(&self, p: &Point2d) -> f64 {
        let d = self.direction();
        let len_sq = d.length_squared();
        if len_sq < 1e-30 {
            return 0.0;
        }
        (*p - self.start).dot(&d) / len_sq
    }

    pub fn distance_to_point(&self, p: &Point2d) -> f64 {
        let t = self.param_at(p).clamp(0.0, 1.0);
        p.distance_to(&self.start.lerp(&self.end, t))
    }
}

impl Arc2d {
    pub fn new(center: Point2d, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// A full counter-clockwise circle starting at angle zero.
    pub fn circle(center: Point2d, radius: f64) -> Self {
        Self::new(center, radius, 0.0, TAU)
    }

    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn is_full_circle(&self, tol: &Tolerance) -> bool {
        (self.sweep().abs() - TAU).abs() <= tol.parametric
    }

    pub fn point_at_angle(&self, angle: f64) -> Point2d {
        self.center + Vec2::new(angle.cos(), angle.sin()) * self.radius
    }

    /// Normalized parameter of the angular position of `p` along the sweep.
    pub fn param_at(&self, p: &Point2d) -> f64 {
        angle_fraction(self.start_angle, self.sweep(), (*p - self.center).angle())
    }

    pub fn distance_to_point(&self, p: &Point2d) -> f64 {
        let t = self.param_at(p);
        if (0.0..=1.0).contains(&t) {
            ((*p - self.center).length() - self.radius).abs()
        } else {
            let s = self.point_at_angle(self.start_angle);
            let e = self.point_at_angle(self.end_angle);
            p.distance_to(&s).min(p.distance_to(&e))
        }
    }
}

impl Curve2d {
    pub fn line(start: Point2d, end: Point2d) -> Self {
        Curve2d::Line(Segment2d::new(start, end))
    }

    pub fn arc(center: Point2d, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Curve2d::Arc(Arc2d::new(center, radius, start_angle, end_angle))
    }

    pub fn start_point(&self) -> Point2d {
        match self {
            Curve2d::Line(l) => l.start,
            Curve2d::Arc(a) => a.point_at_angle(a.start_angle),
        }
    }

    pub fn end_point(&self) -> Point2d {
        match self {
            Curve2d::Line(l) => l.end,
            Curve2d::Arc(a) => a.point_at_angle(a.end_angle),
        }
    }

    /// Evaluate at normalized parameter `t` (0 at start, 1 at end).
    pub fn point_at(&self, t: f64) -> Point2d {
        match self {
            Curve2d::Line(l) => l.start.lerp(&l.end, t),
            Curve2d::Arc(a) => a.point_at_angle(a.start_angle + a.sweep() * t),
        }
    }

    pub fn midpoint(&self) -> Point2d {
        self.point_at(0.5)
    }

    /// Normalized parameter of the projection of `p` onto this curve.
    pub fn param_at(&self, p: &Point2d) -> f64 {
        match self {
            Curve2d::Line(l) => l.param_at(p),
            Curve2d::Arc(a) => a.param_at(p),
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            Curve2d::Line(l) => l.direction().length(),
            Curve2d::Arc(a) => a.sweep().abs() * a.radius,
        }
    }

    pub fn distance_to_point(&self, p: &Point2d) -> f64 {
        match self {
            Curve2d::Line(l) => l.distance_to_point(p),
            Curve2d::Arc(a) => a.distance_to_point(p),
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Curve2d::Line(l) => Curve2d::line(l.end, l.start),
            Curve2d::Arc(a) => Curve2d::arc(a.center, a.radius, a.end_angle, a.start_angle),
        }
    }

    pub fn is_degenerate(&self, tol: &Tolerance) -> bool {
        tol.is_zero_length(self.length())
    }

    /// Polyline approximation with `segments + 1` points, start and end included.
    pub fn discretize(&self, segments: usize) -> Vec<Point2d> {
        let n = segments.max(1);
        (0..=n).map(|i| self.point_at(i as f64 / n as f64)).collect()
    }

    /// Polyline approximation with a sample count suited to the curve kind.
    pub fn sample_points(&self) -> Vec<Point2d> {
        match self {
            Curve2d::Line(_) => self.discretize(1),
            Curve2d::Arc(a) => self.discretize(arc_segments(a.sweep())),
        }
    }

    /// Tolerant geometric equality, independent of orientation.
    ///
    /// Lines match when each endpoint lies on one of the other's endpoints.
    /// Arcs match when centers and radii coincide, the (start, end)
    /// angles equal the other's (start, end) or (end, start), and both arcs
    /// pass through the same midpoint.
    pub fn geometrically_equals(&self, other: &Self, tol: &Tolerance) -> bool {
        match (self, other) {
            (Curve2d::Line(a), Curve2d::Line(b)) => {
                endpoints_match(&a.start, &a.end, &b.start, &b.end, |p, q| {
                    tol.points_coincident_2d(p, q)
                })
            }
            (Curve2d::Arc(a), Curve2d::Arc(b)) => {
                if !tol.points_coincident_2d(&a.center, &b.center)
                    || !tol.is_zero_length(a.radius - b.radius)
                {
                    return false;
                }
                if a.is_full_circle(tol) && b.is_full_circle(tol) {
                    return true;
                }
                if (a.sweep().abs() - b.sweep().abs()).abs() > tol.parametric {
                    return false;
                }
                let same = angles_equal(a.start_angle, b.start_angle, tol.parametric)
                    && angles_equal(a.end_angle, b.end_angle, tol.parametric);
                let flipped = angles_equal(a.start_angle, b.end_angle, tol.parametric)
                    && angles_equal(a.end_angle, b.start_angle, tol.parametric);
                // half circles share both endpoints with their complement
                (same || flipped) && tol.points_coincident_2d(&self.midpoint(), &other.midpoint())
            }
            _ => false,
        }
    }

    pub fn curve_type_name(&self) -> &'static str {
        match self {
            Curve2d::Line(_) => "Line",
            Curve2d::Arc(_) => "Arc",
        }
    }
}

// ─── 3D curves ───────────────────────────────────────────────────────────────

/// Bounded curves carried by B-Rep edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Curve3d {
    Line(Segment3d),
    Arc(Arc3d),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment3d {
    pub start: Point3d,
    pub end: Point3d,
}

/// A circular arc in the plane through `center` perpendicular to `normal`.
/// Angles are measured from `x_axis` towards `normal × x_axis`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc3d {
    pub center: Point3d,
    pub normal: Vec3,
    pub x_axis: Vec3,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Segment3d {
    pub fn new(start: Point3d, end: Point3d) -> Self {
        Self { start, end }
    }
}

impl Arc3d {
    /// `normal` and `x_axis` are normalized; they are expected to be perpendicular.
    pub fn new(
        center: Point3d,
        normal: Vec3,
        x_axis: Vec3,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Self {
        Self {
            center,
            normal: normal.normalized().unwrap_or(normal),
            x_axis: x_axis.normalized().unwrap_or(x_axis),
            radius,
            start_angle,
            end_angle,
        }
    }

    pub fn y_axis(&self) -> Vec3 {
        self.normal.cross(&self.x_axis)
    }

    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn point_at_angle(&self, angle: f64) -> Point3d {
        self.center + self.x_axis * (self.radius * angle.cos()) + self.y_axis() * (self.radius * angle.sin())
    }

    pub fn is_full_circle(&self, tol: &Tolerance) -> bool {
        (self.sweep().abs() - TAU).abs() <= tol.parametric
    }
}

impl Curve3d {
    pub fn line(start: Point3d, end: Point3d) -> Self {
        Curve3d::Line(Segment3d::new(start, end))
    }

    pub fn start_point(&self) -> Point3d {
        match self {
            Curve3d::Line(l) => l.start,
            Curve3d::Arc(a) => a.point_at_angle(a.start_angle),
        }
    }

    pub fn end_point(&self) -> Point3d {
        match self {
            Curve3d::Line(l) => l.end,
            Curve3d::Arc(a) => a.point_at_angle(a.end_angle),
        }
    }

    pub fn point_at(&self, t: f64) -> Point3d {
        match self {
            Curve3d::Line(l) => l.start.lerp(&l.end, t),
            Curve3d::Arc(a) => a.point_at_angle(a.start_angle + a.sweep() * t),
        }
    }

    pub fn midpoint(&self) -> Point3d {
        self.point_at(0.5)
    }

    pub fn length(&self) -> f64 {
        match self {
            Curve3d::Line(l) => l.start.distance_to(&l.end),
            Curve3d::Arc(a) => a.sweep().abs() * a.radius,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Curve3d::Line(l) => Curve3d::line(l.end, l.start),
            Curve3d::Arc(a) => Curve3d::Arc(Arc3d {
                start_angle: a.end_angle,
                end_angle: a.start_angle,
                ..*a
            }),
        }
    }

    pub fn translated(&self, v: Vec3) -> Self {
        match self {
            Curve3d::Line(l) => Curve3d::line(l.start + v, l.end + v),
            Curve3d::Arc(a) => Curve3d::Arc(Arc3d {
                center: a.center + v,
                ..*a
            }),
        }
    }

    pub fn discretize(&self, segments: usize) -> Vec<Point3d> {
        let n = segments.max(1);
        (0..=n).map(|i| self.point_at(i as f64 / n as f64)).collect()
    }

    pub fn sample_points(&self) -> Vec<Point3d> {
        match self {
            Curve3d::Line(_) => self.discretize(1),
            Curve3d::Arc(a) => self.discretize(arc_segments(a.sweep())),
        }
    }

    /// Tolerant geometric equality, independent of orientation.
    ///
    /// Arc frames may differ between two kernels' outputs, so the arc
    /// parameter comparison is carried out on the arc endpoints, which
    /// coincide exactly when the angles match in a shared frame.
    pub fn geometrically_equals(&self, other: &Self, tol: &Tolerance) -> bool {
        match (self, other) {
            (Curve3d::Line(a), Curve3d::Line(b)) => {
                endpoints_match(&a.start, &a.end, &b.start, &b.end, |p, q| {
                    tol.points_coincident(p, q)
                })
            }
            (Curve3d::Arc(a), Curve3d::Arc(b)) => {
                if !tol.points_coincident(&a.center, &b.center)
                    || !tol.is_zero_length(a.radius - b.radius)
                    || !tol.directions_parallel(&a.normal, &b.normal)
                {
                    return false;
                }
                if a.is_full_circle(tol) && b.is_full_circle(tol) {
                    return true;
                }
                if (a.sweep().abs() - b.sweep().abs()).abs() > tol.parametric {
                    return false;
                }
                endpoints_match(
                    &self.start_point(),
                    &self.end_point(),
                    &other.start_point(),
                    &other.end_point(),
                    |p, q| tol.points_coincident(p, q),
                ) && tol.points_coincident(&self.midpoint(), &other.midpoint())
            }
            _ => false,
        }
    }

    pub fn curve_type_name(&self) -> &'static str {
        match self {
            Curve3d::Line(_) => "Line",
            Curve3d::Arc(_) => "Arc",
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn endpoints_match<P>(s1: &P, e1: &P, s2: &P, e2: &P, eq: impl Fn(&P, &P) -> bool) -> bool {
    (eq(s1, s2) || eq(s1, e2)) && (eq(e1, s2) || eq(e1, e2))
}

/// Compare two angles modulo a full turn.
pub fn angles_equal(a: f64, b: f64, tol: f64) -> bool {
    let d = (a - b).rem_euclid(TAU);
    d <= tol || TAU - d <= tol
}

/// Fraction of `sweep` covered when travelling from `start` to `angle` in the sweep direction.
fn angle_fraction(start: f64, sweep: f64, angle: f64) -> f64 {
    if sweep.abs() < 1e-15 {
        return 0.0;
    }
    let delta = angle - start;
    let delta = if sweep >= 0.0 {
        delta.rem_euclid(TAU)
    } else {
        -(-delta).rem_euclid(TAU)
    };
    delta / sweep
}

fn arc_segments(sweep: f64) -> usize {
    ((sweep.abs() / (PI / 16.0)).ceil() as usize).max(4)
}
