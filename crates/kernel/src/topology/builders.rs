//! Shell construction for fixtures: boxes and extruded sketch profiles.

use thiserror::Error;
use tracing::{debug, info, instrument};

use super::brep::*;
use crate::Tolerance;
use crate::geometry::curves::{Curve2d, Curve3d};
use crate::geometry::point::{Point2d, Point3d};
use crate::geometry::polygon::{is_loop_closed, loop_signed_area, reverse_loop};
use crate::geometry::projection::SketchPlane;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("profile has no curves")]
    EmptyProfile,

    #[error("profile loop {index} is not closed")]
    OpenProfile { index: usize },

    #[error("extrusion height must be positive, got {0}")]
    NonPositiveHeight(f64),
}

/// Incremental shell assembly. Vertices and edges are shared between faces
/// whenever their geometry coincides, and half-edges on a shared edge are
/// linked as twins.
pub struct ShellBuilder<'a> {
    store: &'a mut EntityStore,
    shell: ShellId,
    tol: Tolerance,
    vertices: Vec<VertexId>,
    edges: Vec<EdgeId>,
}

impl<'a> ShellBuilder<'a> {
    pub fn new(store: &'a mut EntityStore, tol: Tolerance) -> Self {
        let shell = store.shells.insert(Shell::default());
        Self {
            store,
            shell,
            tol,
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn shell(&self) -> ShellId {
        self.shell
    }

    pub fn vertex(&mut self, point: Point3d) -> VertexId {
        let existing = self
            .vertices
            .iter()
            .copied()
            .find(|&v| self.tol.points_coincident(&self.store.vertices[v].point, &point));
        if let Some(v) = existing {
            return v;
        }
        let v = self.store.vertices.insert(Vertex { point });
        self.vertices.push(v);
        v
    }

    /// Find or create the edge carrying `curve`; returns the edge and
    /// whether `curve` runs along it.
    pub fn edge(&mut self, curve: Curve3d) -> (EdgeId, bool) {
        let start = self.vertex(curve.start_point());
        let end = self.vertex(curve.end_point());

        for &e in &self.edges {
            let edge = &self.store.edges[e];
            let same_ends = (edge.start_vertex == start && edge.end_vertex == end)
                || (edge.start_vertex == end && edge.end_vertex == start);
            if same_ends && edge.curve.geometrically_equals(&curve, &self.tol) {
                let forward = self
                    .tol
                    .points_coincident(&edge.curve.point_at(0.25), &curve.point_at(0.25));
                return (e, forward);
            }
        }

        let e = self.store.edges.insert(Edge {
            curve,
            half_edges: Vec::with_capacity(2),
            start_vertex: start,
            end_vertex: end,
            shell: self.shell,
            tag: String::new(),
            provenance: None,
        });
        self.edges.push(e);
        (e, true)
    }

    /// Add a face bounded by closed loops of oriented curves. The first loop
    /// is the outer boundary, counter-clockwise seen against the outward normal.
    pub fn face(&mut self, outer: &[Curve3d], holes: &[Vec<Curve3d>]) -> FaceId {
        let outer_loop = self.store.loops.insert(Loop {
            half_edges: vec![],
            face: FaceId::default(),
        });
        let face = self.store.faces.insert(Face {
            outer_loop,
            inner_loops: vec![],
            shell: self.shell,
            tag: String::new(),
            provenance: None,
        });
        self.store.loops[outer_loop].face = face;
        self.store.shells[self.shell].faces.push(face);

        self.fill_loop(outer_loop, face, outer);
        for hole in holes {
            let l = self.store.loops.insert(Loop {
                half_edges: vec![],
                face,
            });
            self.store.faces[face].inner_loops.push(l);
            self.fill_loop(l, face, hole);
        }
        face
    }

    fn fill_loop(&mut self, loop_id: LoopId, face: FaceId, curves: &[Curve3d]) {
        for curve in curves {
            let (edge_id, forward) = self.edge(*curve);
            let edge = &self.store.edges[edge_id];
            let (start_vertex, end_vertex) = if forward {
                (edge.start_vertex, edge.end_vertex)
            } else {
                (edge.end_vertex, edge.start_vertex)
            };
            let twin = edge.half_edges.first().copied();

            let he = self.store.half_edges.insert(HalfEdge {
                edge: edge_id,
                twin,
                face,
                loop_id,
                start_vertex,
                end_vertex,
                forward,
                tag: String::new(),
            });
            if let Some(t) = twin {
                self.store.half_edges[t].twin = Some(he);
            }
            self.store.edges[edge_id].half_edges.push(he);
            self.store.loops[loop_id].half_edges.push(he);
        }
    }

    pub fn finish(self) -> ShellId {
        self.shell
    }
}

/// Build an axis-aligned box between two opposite corners.
#[instrument(skip(store))]
pub fn make_box(store: &mut EntityStore, min: Point3d, max: Point3d) -> ShellId {
    info!(min = ?[min.x, min.y, min.z], max = ?[max.x, max.y, max.z], "creating box shell");
    let (x0, y0, z0) = (min.x, min.y, min.z);
    let (x1, y1, z1) = (max.x, max.y, max.z);
    let v = [
        Point3d::new(x0, y0, z0),
        Point3d::new(x1, y0, z0),
        Point3d::new(x1, y1, z0),
        Point3d::new(x0, y1, z0),
        Point3d::new(x0, y0, z1),
        Point3d::new(x1, y0, z1),
        Point3d::new(x1, y1, z1),
        Point3d::new(x0, y1, z1),
    ];

    // Counter-clockwise seen from outside.
    let face_defs: [[usize; 4]; 6] = [
        [0, 3, 2, 1], // z = z0
        [4, 5, 6, 7], // z = z1
        [0, 4, 7, 3], // x = x0
        [1, 2, 6, 5], // x = x1
        [0, 1, 5, 4], // y = y0
        [3, 7, 6, 2], // y = y1
    ];

    let mut builder = ShellBuilder::new(store, Tolerance::default());
    for def in &face_defs {
        let outer: Vec<Curve3d> = (0..4)
            .map(|i| Curve3d::line(v[def[i]], v[def[(i + 1) % 4]]))
            .collect();
        builder.face(&outer, &[]);
    }
    builder.finish()
}

/// Extrude closed sketch profiles along the plane normal.
///
/// The bottom face lies on the sketch plane and the top face at `height`
/// above it. Every profile curve sweeps one side face; a full circle sweeps
/// a single side face closed by a seam edge.
pub fn make_extrusion(
    store: &mut EntityStore,
    plane: &SketchPlane,
    outer: &[Curve2d],
    holes: &[Vec<Curve2d>],
    height: f64,
    tol: &Tolerance,
) -> Result<ShellId, BuildError> {
    extrude(store, plane, outer, holes, height, tol, true)
}

/// Like [`make_extrusion`] without the top face, leaving the top edges as
/// open boundary.
pub fn make_open_extrusion(
    store: &mut EntityStore,
    plane: &SketchPlane,
    outer: &[Curve2d],
    holes: &[Vec<Curve2d>],
    height: f64,
    tol: &Tolerance,
) -> Result<ShellId, BuildError> {
    extrude(store, plane, outer, holes, height, tol, false)
}

#[instrument(skip(store, outer, holes, tol), fields(curves = outer.len(), holes = holes.len()))]
fn extrude(
    store: &mut EntityStore,
    plane: &SketchPlane,
    outer: &[Curve2d],
    holes: &[Vec<Curve2d>],
    height: f64,
    tol: &Tolerance,
    top_cap: bool,
) -> Result<ShellId, BuildError> {
    if outer.is_empty() || holes.iter().any(Vec::is_empty) {
        return Err(BuildError::EmptyProfile);
    }
    if height <= 0.0 {
        return Err(BuildError::NonPositiveHeight(height));
    }
    for (index, profile) in std::iter::once(outer).chain(holes.iter().map(Vec::as_slice)).enumerate() {
        if !is_loop_closed(profile, tol) {
            return Err(BuildError::OpenProfile { index });
        }
    }

    // Material on the left: outer counter-clockwise, holes clockwise.
    let outer = oriented(outer, true);
    let holes: Vec<Vec<Curve2d>> = holes.iter().map(|h| oriented(h, false)).collect();

    let offset = plane.normal * height;
    let lift = |curves: &[Curve2d]| -> Vec<Curve3d> { curves.iter().map(|c| plane.lift_curve(c)).collect() };
    let raise = |curves: &[Curve3d]| -> Vec<Curve3d> { curves.iter().map(|c| c.translated(offset)).collect() };

    let bottom_outer = lift(outer.as_slice());
    let bottom_holes: Vec<Vec<Curve3d>> = holes.iter().map(|h| lift(h.as_slice())).collect();
    let top_outer = raise(bottom_outer.as_slice());
    let top_holes: Vec<Vec<Curve3d>> = bottom_holes.iter().map(|h| raise(h.as_slice())).collect();

    let mut builder = ShellBuilder::new(store, *tol);

    builder.face(
        &reverse_loop_3d(&bottom_outer),
        &bottom_holes.iter().map(|h| reverse_loop_3d(h)).collect::<Vec<_>>(),
    );
    if top_cap {
        builder.face(&top_outer, &top_holes);
    }

    for bottom in std::iter::once(&bottom_outer).chain(bottom_holes.iter()) {
        for curve in bottom {
            let start = curve.start_point();
            let end = curve.end_point();
            let side = [
                *curve,
                Curve3d::line(end, end + offset),
                curve.translated(offset).reversed(),
                Curve3d::line(start + offset, start),
            ];
            builder.face(&side, &[]);
        }
    }

    let shell = builder.finish();
    debug!(counts = %store.count_topology(shell), "extrusion built");
    Ok(shell)
}

fn oriented(curves: &[Curve2d], counter_clockwise: bool) -> Vec<Curve2d> {
    if (loop_signed_area(curves) > 0.0) == counter_clockwise {
        curves.to_vec()
    } else {
        reverse_loop(curves)
    }
}

fn reverse_loop_3d(curves: &[Curve3d]) -> Vec<Curve3d> {
    curves.iter().rev().map(Curve3d::reversed).collect()
}

/// Closed rectangle profile with corners `min` and `max`, counter-clockwise.
pub fn rectangle_profile(min: Point2d, max: Point2d) -> Vec<Curve2d> {
    let corners = [
        min,
        Point2d::new(max.x, min.y),
        max,
        Point2d::new(min.x, max.y),
    ];
    (0..4)
        .map(|i| Curve2d::line(corners[i], corners[(i + 1) % 4]))
        .collect()
}
