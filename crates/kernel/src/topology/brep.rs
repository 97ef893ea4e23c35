use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use topo_types::{Provenance, TopoCounts};

use crate::geometry::curves::Curve3d;
use crate::geometry::point::Point3d;
use crate::geometry::transform::BoundingBox;
use crate::geometry::vector::Vec3;

// ─── Entity Keys ─────────────────────────────────────────────────────────────

new_key_type! {
    pub struct VertexId;
    pub struct EdgeId;
    pub struct HalfEdgeId;
    pub struct LoopId;
    pub struct FaceId;
    pub struct ShellId;
}

// ─── Topological Entities ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    pub point: Point3d,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Runs from `start_vertex` to `end_vertex`.
    pub curve: Curve3d,
    /// One half-edge for a boundary edge, two for a manifold edge.
    pub half_edges: Vec<HalfEdgeId>,
    pub start_vertex: VertexId,
    pub end_vertex: VertexId,
    pub shell: ShellId,
    pub tag: String,
    pub provenance: Option<Provenance>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HalfEdge {
    pub edge: EdgeId,
    pub twin: Option<HalfEdgeId>,
    pub face: FaceId,
    pub loop_id: LoopId,
    pub start_vertex: VertexId,
    pub end_vertex: VertexId,
    /// true if this half-edge traverses the edge curve in its own direction.
    pub forward: bool,
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loop {
    pub half_edges: Vec<HalfEdgeId>,
    pub face: FaceId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Face {
    pub outer_loop: LoopId,
    pub inner_loops: Vec<LoopId>,
    pub shell: ShellId,
    pub tag: String,
    pub provenance: Option<Provenance>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Shell {
    pub faces: Vec<FaceId>,
}

// ─── Entity Store ────────────────────────────────────────────────────────────

/// Arena-based storage for all topological entities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStore {
    pub vertices: SlotMap<VertexId, Vertex>,
    pub edges: SlotMap<EdgeId, Edge>,
    pub half_edges: SlotMap<HalfEdgeId, HalfEdge>,
    pub loops: SlotMap<LoopId, Loop>,
    pub faces: SlotMap<FaceId, Face>,
    pub shells: SlotMap<ShellId, Shell>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shell_faces(&self, shell_id: ShellId) -> &[FaceId] {
        &self.shells[shell_id].faces
    }

    /// Outer loop first, then inner loops in order.
    pub fn face_loops(&self, face_id: FaceId) -> Vec<LoopId> {
        let face = &self.faces[face_id];
        let mut loops = Vec::with_capacity(1 + face.inner_loops.len());
        loops.push(face.outer_loop);
        loops.extend_from_slice(&face.inner_loops);
        loops
    }

    pub fn face_half_edges(&self, face_id: FaceId) -> Vec<HalfEdgeId> {
        self.face_loops(face_id)
            .into_iter()
            .flat_map(|l| self.loops[l].half_edges.iter().copied())
            .collect()
    }

    pub fn shell_half_edges(&self, shell_id: ShellId) -> Vec<HalfEdgeId> {
        self.shell_faces(shell_id)
            .iter()
            .flat_map(|&f| self.face_half_edges(f))
            .collect()
    }

    /// Edges of a shell in first-encounter order.
    pub fn shell_edges(&self, shell_id: ShellId) -> Vec<EdgeId> {
        let mut seen = HashSet::new();
        self.shell_half_edges(shell_id)
            .into_iter()
            .map(|he| self.half_edges[he].edge)
            .filter(|e| seen.insert(*e))
            .collect()
    }

    /// Vertices of a shell in first-encounter order.
    pub fn shell_vertices(&self, shell_id: ShellId) -> Vec<VertexId> {
        let mut seen = HashSet::new();
        let mut vertices = Vec::new();
        for he_id in self.shell_half_edges(shell_id) {
            let he = &self.half_edges[he_id];
            for v in [he.start_vertex, he.end_vertex] {
                if seen.insert(v) {
                    vertices.push(v);
                }
            }
        }
        vertices
    }

    /// Count topological entities for a shell.
    pub fn count_topology(&self, shell_id: ShellId) -> TopoCounts {
        TopoCounts::new(
            self.shell_vertices(shell_id).len(),
            self.shell_edges(shell_id).len(),
            self.shell_faces(shell_id).len(),
        )
    }

    /// Axis-aligned bounds of a shell, sampling curved edges.
    pub fn shell_bounding_box(&self, shell_id: ShellId) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        for edge_id in self.shell_edges(shell_id) {
            for p in self.edges[edge_id].curve.sample_points() {
                bb.expand_to_include(&p);
            }
        }
        bb
    }

    pub fn face_vertices(&self, face_id: FaceId) -> Vec<VertexId> {
        let mut seen = HashSet::new();
        self.face_half_edges(face_id)
            .into_iter()
            .map(|he| self.half_edges[he].start_vertex)
            .filter(|v| seen.insert(*v))
            .collect()
    }

    pub fn face_points(&self, face_id: FaceId) -> Vec<Point3d> {
        self.face_vertices(face_id)
            .into_iter()
            .map(|v| self.vertices[v].point)
            .collect()
    }

    /// The edge curve oriented along the half-edge.
    pub fn half_edge_curve(&self, he_id: HalfEdgeId) -> Curve3d {
        let he = &self.half_edges[he_id];
        let curve = self.edges[he.edge].curve;
        if he.forward { curve } else { curve.reversed() }
    }

    /// Discretized loop boundary in traversal order, without the closing point.
    pub fn loop_points(&self, loop_id: LoopId) -> Vec<Point3d> {
        let mut points = Vec::new();
        for &he_id in &self.loops[loop_id].half_edges {
            let samples = self.half_edge_curve(he_id).sample_points();
            points.extend_from_slice(&samples[..samples.len() - 1]);
        }
        points
    }

    /// Unit normal of a face from its outer loop winding (Newell's method).
    pub fn face_normal(&self, face_id: FaceId) -> Option<Vec3> {
        let points = self.loop_points(self.faces[face_id].outer_loop);
        let mut n = Vec3::ZERO;
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            n.x += (a.y - b.y) * (a.z + b.z);
            n.y += (a.z - b.z) * (a.x + b.x);
            n.z += (a.x - b.x) * (a.y + b.y);
        }
        // a loop enclosing no area (a cylinder wall seen through its seam)
        // has no normal, whatever rounding leaves behind
        let extent = BoundingBox::from_points(&points);
        if n.length() <= 1e-9 * (extent.max - extent.min).length_squared() {
            return None;
        }
        n.normalized()
    }

    /// Bounding-box center of a face's outer loop.
    pub fn face_center(&self, face_id: FaceId) -> Point3d {
        BoundingBox::from_points(&self.loop_points(self.faces[face_id].outer_loop)).center()
    }

    pub fn face_center_normal(&self, face_id: FaceId) -> (Point3d, Option<Vec3>) {
        (self.face_center(face_id), self.face_normal(face_id))
    }

    /// Faces bordering an edge, without repeats (a seam edge borders one face twice).
    pub fn edge_faces(&self, edge_id: EdgeId) -> Vec<FaceId> {
        let mut faces = Vec::with_capacity(2);
        for he_id in &self.edges[edge_id].half_edges {
            let face = self.half_edges[*he_id].face;
            if !faces.contains(&face) {
                faces.push(face);
            }
        }
        faces
    }

    /// Rename an edge in place, returning its previous tag.
    pub fn replace_edge_tag(&mut self, edge_id: EdgeId, tag: String) -> String {
        std::mem::replace(&mut self.edges[edge_id].tag, tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::builders::make_box;

    #[test]
    fn test_entity_store_creation() {
        let store = EntityStore::new();
        assert_eq!(store.vertices.len(), 0);
        assert_eq!(store.edges.len(), 0);
    }

    #[test]
    fn test_box_counts_and_bounds() {
        let mut store = EntityStore::new();
        let shell = make_box(&mut store, Point3d::ORIGIN, Point3d::new(1.0, 2.0, 3.0));
        assert_eq!(store.count_topology(shell), TopoCounts::new(8, 12, 6));
        let bb = store.shell_bounding_box(shell);
        assert!((bb.center().z - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_box_normals_point_outward() {
        let mut store = EntityStore::new();
        let shell = make_box(&mut store, Point3d::ORIGIN, Point3d::new(2.0, 2.0, 2.0));
        let solid_center = store.shell_bounding_box(shell).center();
        for &face in store.shell_faces(shell) {
            let n = store.face_normal(face).unwrap();
            let outward = store.face_center(face) - solid_center;
            assert!(n.dot(&outward) > 0.0, "face normal {:?} points inward", n);
        }
    }

    #[test]
    fn test_every_box_edge_has_two_faces() {
        let mut store = EntityStore::new();
        let shell = make_box(&mut store, Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0));
        for edge in store.shell_edges(shell) {
            assert_eq!(store.edge_faces(edge).len(), 2);
            let hes = &store.edges[edge].half_edges;
            assert_eq!(store.half_edges[hes[0]].twin, Some(hes[1]));
        }
    }

    #[test]
    fn test_replace_edge_tag_returns_previous() {
        let mut store = EntityStore::new();
        let shell = make_box(&mut store, Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0));
        let edge = store.shell_edges(shell)[0];
        assert_eq!(store.replace_edge_tag(edge, "a".into()), "");
        assert_eq!(store.replace_edge_tag(edge, "b".into()), "a");
    }
}
