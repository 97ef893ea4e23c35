use serde::{Deserialize, Serialize};

use super::curves::Curve3d;
use super::point::{Point2d, Point3d};
use super::vector::Vec3;

/// Rigid correspondence between two shells.
///
/// Regenerated geometry is assumed to drift by a pure translation, so
/// no rotational part is carried.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
        }
    }

    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self::from_translation_vec(Vec3::new(dx, dy, dz))
    }

    pub fn from_translation_vec(v: Vec3) -> Self {
        Self { translation: v }
    }

    /// Translation carrying the center of `from` onto the center of `to`.
    pub fn between_centers(from: &BoundingBox, to: &BoundingBox) -> Self {
        Self::from_translation_vec(to.center() - from.center())
    }

    pub fn transform_point(&self, p: &Point3d) -> Point3d {
        *p + self.translation
    }

    /// Directions are unaffected by a translation.
    pub fn transform_vector(&self, v: &Vec3) -> Vec3 {
        *v
    }

    pub fn transform_curve(&self, curve: &Curve3d) -> Curve3d {
        curve.translated(self.translation)
    }

    /// Apply `self` first, then `other`.
    pub fn then(&self, other: &Transform) -> Transform {
        Self::from_translation_vec(self.translation + other.translation)
    }

    pub fn inverse(&self) -> Self {
        Self::from_translation_vec(-self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3d,
    pub max: Point3d,
}

impl BoundingBox {
    pub fn new(min: Point3d, max: Point3d) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Point3d::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3d::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: &[Point3d]) -> Self {
        let mut bb = Self::empty();
        for p in points {
            bb.expand_to_include(p);
        }
        bb
    }

    pub fn expand_to_include(&mut self, p: &Point3d) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut bb = *self;
        bb.expand_to_include(&other.min);
        bb.expand_to_include(&other.max);
        bb
    }

    pub fn center(&self) -> Point3d {
        self.min.midpoint(&self.max)
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}

/// Axis-aligned bounding box in the sketch plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2d {
    pub min: Point2d,
    pub max: Point2d,
}

impl BoundingBox2d {
    pub fn new(min: Point2d, max: Point2d) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Point2d::new(f64::INFINITY, f64::INFINITY),
            max: Point2d::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: &[Point2d]) -> Self {
        let mut bb = Self::empty();
        for p in points {
            bb.expand_to_include(p);
        }
        bb
    }

    pub fn expand_to_include(&mut self, p: &Point2d) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn center(&self) -> Point2d {
        self.min.midpoint(&self.max)
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }
}
