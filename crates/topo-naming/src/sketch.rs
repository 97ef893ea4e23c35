//! Sketch-side data the namer matches shells against.

use serde::{Deserialize, Serialize};

use cad_kernel::geometry::curves::Curve2d;
use cad_kernel::geometry::point::Point2d;
use cad_kernel::geometry::polygon::loop_bounding_box;
use cad_kernel::geometry::projection::SketchPlane;
use cad_kernel::geometry::transform::BoundingBox2d;

use crate::error::NamingError;

/// A closed sketch region that an extrusion's bottom face is built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchFace {
    pub id: String,
    pub outer_loop: Vec<Curve2d>,
    #[serde(default)]
    pub holes: Vec<Vec<Curve2d>>,
}

impl SketchFace {
    pub fn bounding(&self) -> BoundingBox2d {
        loop_bounding_box(&self.outer_loop)
    }

    /// Points along the outer loop that must lie on a matching polygon's
    /// boundary: start and midpoint of each segment, the first sample of
    /// each arc.
    pub fn boundary_test_points(&self) -> Vec<Point2d> {
        let mut points = Vec::with_capacity(self.outer_loop.len() * 2);
        for curve in &self.outer_loop {
            match curve {
                Curve2d::Line(l) => {
                    points.push(l.start);
                    points.push(l.start.midpoint(&l.end));
                }
                Curve2d::Arc(_) => points.push(curve.start_point()),
            }
        }
        points
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchCurve {
    pub id: String,
    pub curve: Curve2d,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchPoint {
    pub id: String,
    pub position: Point2d,
}

/// Everything a sketch contributes to naming: the plane it was drawn on and
/// its faces, curves and points.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SketchData {
    #[serde(default)]
    pub plane: SketchPlane,
    #[serde(default)]
    pub faces: Vec<SketchFace>,
    #[serde(default)]
    pub curves: Vec<SketchCurve>,
    #[serde(default)]
    pub points: Vec<SketchPoint>,
}

impl SketchData {
    pub fn from_json(json: &str) -> Result<Self, NamingError> {
        serde_json::from_str(json).map_err(|e| NamingError::SketchParse(e.to_string()))
    }

    pub fn all_curves(&self) -> &[SketchCurve] {
        &self.curves
    }

    pub fn all_points(&self) -> &[SketchPoint] {
        &self.points
    }

    /// Register a face and give each of its boundary curves and corners an
    /// id derived from the face id.
    pub fn add_face_with_boundary(&mut self, id: impl Into<String>, outer_loop: Vec<Curve2d>) {
        let id = id.into();
        for (i, curve) in outer_loop.iter().enumerate() {
            self.curves.push(SketchCurve {
                id: format!("{id}-c{i}"),
                curve: *curve,
            });
            self.points.push(SketchPoint {
                id: format!("{id}-p{i}"),
                position: curve.start_point(),
            });
        }
        self.faces.push(SketchFace {
            id,
            outer_loop,
            holes: Vec::new(),
        });
    }
}
