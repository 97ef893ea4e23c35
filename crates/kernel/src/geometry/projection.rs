//! Orthogonal projection between 3D model space and a sketch plane.

use serde::{Deserialize, Serialize};

use super::curves::{Arc2d, Arc3d, Curve2d, Curve3d};
use super::point::{Point2d, Point3d};
use super::vector::Vec3;
use crate::Tolerance;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("sketch plane frame is degenerate")]
    DegeneratePlane,

    #[error("{curve} lies in a plane oblique to the sketch plane")]
    Oblique { curve: &'static str },

    #[error("projection produced no geometry")]
    Empty,
}

/// A plane with an orthonormal frame. Sketch coordinates are measured
/// along `x_axis` and `y_axis` from `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SketchPlane {
    pub origin: Point3d,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub normal: Vec3,
}

impl Default for SketchPlane {
    fn default() -> Self {
        Self::xoy()
    }
}

impl SketchPlane {
    /// The world XY plane through the origin.
    pub fn xoy() -> Self {
        Self {
            origin: Point3d::ORIGIN,
            x_axis: Vec3::X,
            y_axis: Vec3::Y,
            normal: Vec3::Z,
        }
    }

    /// Build a plane from a normal and a hint for the x direction.
    /// The hint is orthogonalized against the normal.
    pub fn new(origin: Point3d, normal: Vec3, x_hint: Vec3) -> Result<Self, ProjectionError> {
        let normal = normal.normalized().ok_or(ProjectionError::DegeneratePlane)?;
        let x_axis = (x_hint - normal * x_hint.dot(&normal))
            .normalized()
            .ok_or(ProjectionError::DegeneratePlane)?;
        Ok(Self {
            origin,
            x_axis,
            y_axis: normal.cross(&x_axis),
            normal,
        })
    }

    pub fn project_point(&self, p: &Point3d) -> Point2d {
        let d = *p - self.origin;
        Point2d::new(d.dot(&self.x_axis), d.dot(&self.y_axis))
    }

    /// Signed distance of `p` above the plane.
    pub fn height_of(&self, p: &Point3d) -> f64 {
        (*p - self.origin).dot(&self.normal)
    }

    pub fn lift_point(&self, p: &Point2d) -> Point3d {
        self.origin + self.x_axis * p.x + self.y_axis * p.y
    }

    /// Project a 3D curve into sketch coordinates.
    ///
    /// Lines always project (possibly onto a single point, which the caller
    /// detects as a degenerate segment). Arcs project only when their plane
    /// is parallel to the sketch plane.
    pub fn project_curve(&self, curve: &Curve3d, tol: &Tolerance) -> Result<Curve2d, ProjectionError> {
        match curve {
            Curve3d::Line(l) => Ok(Curve2d::line(
                self.project_point(&l.start),
                self.project_point(&l.end),
            )),
            Curve3d::Arc(a) => {
                if !tol.directions_parallel(&a.normal, &self.normal) {
                    return Err(ProjectionError::Oblique { curve: "Arc" });
                }
                let phase = a.x_axis.dot(&self.y_axis).atan2(a.x_axis.dot(&self.x_axis));
                let sense = if a.normal.dot(&self.normal) > 0.0 { 1.0 } else { -1.0 };
                Ok(Curve2d::Arc(Arc2d::new(
                    self.project_point(&a.center),
                    a.radius,
                    phase + sense * a.start_angle,
                    phase + sense * a.end_angle,
                )))
            }
        }
    }

    /// Place a sketch curve on this plane.
    pub fn lift_curve(&self, curve: &Curve2d) -> Curve3d {
        match curve {
            Curve2d::Line(l) => Curve3d::line(self.lift_point(&l.start), self.lift_point(&l.end)),
            Curve2d::Arc(a) => Curve3d::Arc(Arc3d::new(
                self.lift_point(&a.center),
                self.normal,
                self.x_axis,
                a.radius,
                a.start_angle,
                a.end_angle,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    #[test]
    fn test_project_and_lift_point() {
        let plane = SketchPlane::new(Point3d::new(0.0, 0.0, 2.0), Vec3::Z, Vec3::X).unwrap();
        let p = Point3d::new(3.0, 4.0, 7.0);
        let q = plane.project_point(&p);
        assert!((q.x - 3.0).abs() < 1e-12 && (q.y - 4.0).abs() < 1e-12);
        assert!((plane.height_of(&p) - 5.0).abs() < 1e-12);
        assert!(plane.lift_point(&q).distance_to(&Point3d::new(3.0, 4.0, 2.0)) < 1e-12);
    }

    #[test]
    fn test_degenerate_plane() {
        assert_eq!(
            SketchPlane::new(Point3d::ORIGIN, Vec3::Z, Vec3::Z),
            Err(ProjectionError::DegeneratePlane)
        );
    }

    #[test]
    fn test_vertical_line_projects_to_point() {
        let plane = SketchPlane::xoy();
        let line = Curve3d::line(Point3d::new(1.0, 2.0, 0.0), Point3d::new(1.0, 2.0, 5.0));
        let projected = plane.project_curve(&line, &tol()).unwrap();
        assert!(projected.is_degenerate(&tol()));
    }

    #[test]
    fn test_arc_roundtrip_through_plane() {
        let plane = SketchPlane::xoy();
        let arc = Curve2d::arc(Point2d::new(1.0, 1.0), 2.0, 0.0, FRAC_PI_2);
        let lifted = plane.lift_curve(&arc);
        let back = plane.project_curve(&lifted, &tol()).unwrap();
        assert!(arc.geometrically_equals(&back, &tol()));
    }

    #[test]
    fn test_arc_with_flipped_normal_projects_mirrored_angles() {
        let plane = SketchPlane::xoy();
        let arc = Curve3d::Arc(Arc3d::new(Point3d::ORIGIN, -Vec3::Z, Vec3::X, 1.0, 0.0, FRAC_PI_2));
        let projected = plane.project_curve(&arc, &tol()).unwrap();
        // Travelling +90° about -Z ends at -Y in plane coordinates.
        let end = projected.end_point();
        assert!((end.x).abs() < 1e-12 && (end.y + 1.0).abs() < 1e-12);
        assert!(tol().points_coincident_2d(&projected.end_point(), &plane.project_point(&arc.end_point())));
    }

    #[test]
    fn test_oblique_arc_rejected() {
        let plane = SketchPlane::xoy();
        let arc = Curve3d::Arc(Arc3d::new(Point3d::ORIGIN, Vec3::X, Vec3::Y, 1.0, 0.0, PI));
        assert_eq!(
            plane.project_curve(&arc, &tol()),
            Err(ProjectionError::Oblique { curve: "Arc" })
        );
    }
}
