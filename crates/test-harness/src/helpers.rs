//! Helper functions: error type, sketch profile builders, region fixtures.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use cad_kernel::geometry::curves::Curve2d;
use cad_kernel::geometry::point::Point2d;
use cad_kernel::geometry::projection::SketchPlane;
use cad_kernel::topology::builders::BuildError;
use region_graph::{RegionError, RegionGraph, RegionId};
use topo_naming::{NamingError, SketchData};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("part not found: {name}")]
    PartNotFound { name: String },

    #[error("duplicate name: {name}")]
    DuplicateName { name: String },

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error("build error: {0}")]
    Build(#[from] BuildError),

    #[error("naming error: {0}")]
    Naming(#[from] NamingError),

    #[error("region error: {0}")]
    Region(#[from] RegionError),

    #[error("serialization error: {0}")]
    Serialize(String),
}

// ── Profile Builders ────────────────────────────────────────────────────────

/// Counter-clockwise rectangle with its lower-left corner at (x, y).
/// Curves run bottom, right, top, left.
pub fn rect_profile(x: f64, y: f64, w: f64, h: f64) -> Vec<Curve2d> {
    let p = [
        Point2d::new(x, y),
        Point2d::new(x + w, y),
        Point2d::new(x + w, y + h),
        Point2d::new(x, y + h),
    ];
    (0..4).map(|i| Curve2d::line(p[i], p[(i + 1) % 4])).collect()
}

/// A single full circle.
pub fn circle_profile(cx: f64, cy: f64, r: f64) -> Vec<Curve2d> {
    vec![Curve2d::arc(Point2d::new(cx, cy), r, 0.0, TAU)]
}

/// A stadium: two straight sides of `length` joined by half circles of
/// radius `r`, starting at the lower-left end of the straight part.
pub fn slot_profile(x: f64, y: f64, length: f64, r: f64) -> Vec<Curve2d> {
    let left = Point2d::new(x, y + r);
    let right = Point2d::new(x + length, y + r);
    vec![
        Curve2d::line(Point2d::new(x, y), Point2d::new(x + length, y)),
        Curve2d::arc(right, r, -FRAC_PI_2, FRAC_PI_2),
        Curve2d::line(Point2d::new(x + length, y + 2.0 * r), Point2d::new(x, y + 2.0 * r)),
        Curve2d::arc(left, r, FRAC_PI_2, PI + FRAC_PI_2),
    ]
}

/// Sketch with one face per profile, each face's curves and corner points
/// registered under ids derived from the face id.
pub fn sketch_from_profiles(plane: SketchPlane, profiles: &[(&str, Vec<Curve2d>)]) -> SketchData {
    let mut sketch = SketchData {
        plane,
        ..SketchData::default()
    };
    for (id, curves) in profiles {
        sketch.add_face_with_boundary(*id, curves.clone());
    }
    sketch
}

// ── Region Fixtures ─────────────────────────────────────────────────────────

/// Axis-aligned square region with its lower-left corner at (x, y).
pub fn square_region(
    graph: &mut RegionGraph,
    depth: i32,
    x: f64,
    y: f64,
    size: f64,
) -> Result<RegionId, RegionError> {
    graph.add_polygon_region(
        depth,
        &[
            Point2d::new(x, y),
            Point2d::new(x + size, y),
            Point2d::new(x + size, y + size),
            Point2d::new(x, y + size),
        ],
    )
}

/// A `cols` × `rows` grid of unit cells at `depth`, linked through their
/// shared edges. Cells are returned row by row from the origin.
pub fn cell_grid(graph: &mut RegionGraph, cols: usize, rows: usize, depth: i32) -> Result<Vec<RegionId>, RegionError> {
    let mut cells = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            cells.push(square_region(graph, depth, col as f64, row as f64, 1.0)?);
        }
    }
    graph.relink_all();
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use cad_kernel::geometry::polygon::{is_loop_closed, loop_signed_area};
    use cad_kernel::Tolerance;

    use super::*;

    #[test]
    fn test_profiles_close_counter_clockwise() {
        let tol = Tolerance::default();
        for profile in [
            rect_profile(1.0, 2.0, 3.0, 4.0),
            circle_profile(0.0, 0.0, 2.0),
            slot_profile(0.0, 0.0, 4.0, 1.0),
        ] {
            assert!(is_loop_closed(&profile, &tol));
            assert!(loop_signed_area(&profile) > 0.0);
        }
    }

    #[test]
    fn test_slot_area() {
        let area = loop_signed_area(&slot_profile(0.0, 0.0, 4.0, 1.0));
        // polyline approximation of the round ends falls slightly short
        assert!(area < 8.0 + PI && area > 8.0 + PI - 0.05, "area {area}");
    }

    #[test]
    fn test_cell_grid_links_neighbours() {
        let mut g = RegionGraph::new(Tolerance::default());
        let cells = cell_grid(&mut g, 3, 2, 1).unwrap();
        assert_eq!(cells.len(), 6);
        // the middle cell of the first row touches left, right and above
        assert_eq!(g.regions[cells[1]].link.len(), 3);
        assert_eq!(g.regions[cells[0]].link.len(), 2);
    }
}
