use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use cad_kernel::geometry::curves::Curve2d;
use cad_kernel::geometry::point::Point2d;
use cad_kernel::geometry::polygon;
use cad_kernel::geometry::transform::BoundingBox2d;
use cad_kernel::Tolerance;

use crate::error::RegionError;

new_key_type! {
    pub struct VertexId;
    pub struct EdgeId;
    pub struct CoedgeId;
    pub struct RegionId;
}

/// Depth of the unbounded area outside every region. Region depths are
/// non-negative, so the exterior sorts below all of them.
pub const EXTERIOR_DEPTH: i32 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub curve: Curve2d,
    pub start: VertexId,
    pub end: VertexId,
    /// One coedge on the subdivision boundary, two between regions.
    pub coedges: Vec<CoedgeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coedge {
    pub edge: EdgeId,
    /// Traverses the edge from `end` to `start`.
    pub is_rev: bool,
    pub region: RegionId,
    /// Ids of the coedges this one descends from.
    pub old_ids: Vec<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Region {
    pub depth: i32,
    pub link: Vec<RegionId>,
    pub outer: Vec<CoedgeId>,
    pub holes: Vec<Vec<CoedgeId>>,
    /// Ids of the regions this one descends from.
    pub old_ids: Vec<u32>,
}

impl Region {
    /// Outer loop first (when present), then holes.
    pub fn loops(&self) -> impl Iterator<Item = &Vec<CoedgeId>> {
        std::iter::once(&self.outer)
            .filter(|l| !l.is_empty())
            .chain(self.holes.iter())
    }

    pub fn coedges(&self) -> impl Iterator<Item = CoedgeId> + '_ {
        self.loops().flat_map(|l| l.iter().copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopRole {
    Outer,
    Hole,
}

/// Arena-backed planar subdivision. Regions refer to each other only by id,
/// so cyclic adjacency needs no shared ownership.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionGraph {
    pub vertices: SlotMap<VertexId, Point2d>,
    pub edges: SlotMap<EdgeId, Edge>,
    pub coedges: SlotMap<CoedgeId, Coedge>,
    pub regions: SlotMap<RegionId, Region>,
    pub tol: Tolerance,
}

impl RegionGraph {
    pub fn new(tol: Tolerance) -> Self {
        Self {
            tol,
            ..Default::default()
        }
    }

    // ── Construction ────────────────────────────────────────────────────────

    /// Insert a vertex, reusing an existing one within tolerance.
    pub fn add_vertex(&mut self, p: Point2d) -> VertexId {
        let existing = self
            .vertices
            .iter()
            .find(|(_, q)| self.tol.points_coincident_2d(q, &p))
            .map(|(id, _)| id);
        match existing {
            Some(id) => id,
            None => self.vertices.insert(p),
        }
    }

    pub fn add_edge(&mut self, curve: Curve2d) -> EdgeId {
        let start = self.add_vertex(curve.start_point());
        let end = self.add_vertex(curve.end_point());
        self.edges.insert(Edge {
            curve,
            start,
            end,
            coedges: Vec::with_capacity(2),
        })
    }

    /// Find the edge carrying `curve`, or add it. Returns the edge and
    /// whether `curve` runs against the edge's direction.
    pub fn find_or_add_edge(&mut self, curve: Curve2d) -> (EdgeId, bool) {
        let start = self.add_vertex(curve.start_point());
        let end = self.add_vertex(curve.end_point());
        let found = self.edges.iter().find(|(_, e)| {
            ((e.start == start && e.end == end) || (e.start == end && e.end == start))
                && e.curve.geometrically_equals(&curve, &self.tol)
        });
        if let Some((id, e)) = found {
            let is_rev = !self
                .tol
                .points_coincident_2d(&e.curve.point_at(0.25), &curve.point_at(0.25));
            return (id, is_rev);
        }
        (self.add_edge(curve), false)
    }

    pub fn add_region(&mut self, depth: i32) -> RegionId {
        self.regions.insert(Region {
            depth,
            ..Default::default()
        })
    }

    /// Bind a closed loop of oriented edges to a region, creating one coedge
    /// per entry. An outer loop replaces any previous outer loop.
    pub fn attach_loop(
        &mut self,
        region: RegionId,
        edges: &[(EdgeId, bool)],
        role: LoopRole,
    ) -> Result<Vec<CoedgeId>, RegionError> {
        if !self.regions.contains_key(region) {
            return Err(RegionError::UnknownRegion(region));
        }
        if edges.is_empty() {
            return Err(RegionError::invariant("cannot attach an empty loop"));
        }
        for &(e, is_rev) in edges {
            let edge = self
                .edges
                .get(e)
                .ok_or_else(|| RegionError::invariant(format!("unknown edge {e:?}")))?;
            if edge.coedges.len() >= 2 {
                return Err(RegionError::invariant(format!(
                    "edge {e:?} already bounds two regions"
                )));
            }
            if edge.coedges.iter().any(|&c| self.coedges[c].is_rev == is_rev) {
                return Err(RegionError::invariant(format!(
                    "edge {e:?} traversed twice in the same direction"
                )));
            }
        }
        for i in 0..edges.len() {
            let (a, a_rev) = edges[i];
            let (b, b_rev) = edges[(i + 1) % edges.len()];
            if self.oriented_end(a, a_rev) != self.oriented_start(b, b_rev) {
                return Err(RegionError::invariant(format!(
                    "loop does not close between edges {a:?} and {b:?}"
                )));
            }
        }

        let ids: Vec<CoedgeId> = edges
            .iter()
            .map(|&(edge, is_rev)| {
                let c = self.coedges.insert(Coedge {
                    edge,
                    is_rev,
                    region,
                    old_ids: vec![],
                });
                self.edges[edge].coedges.push(c);
                c
            })
            .collect();

        let r = &mut self.regions[region];
        match role {
            LoopRole::Outer => r.outer = ids.clone(),
            LoopRole::Hole => r.holes.push(ids.clone()),
        }
        Ok(ids)
    }

    /// Build a region bounded by a closed curve loop, sharing edges already
    /// in the graph.
    pub fn add_loop_region(&mut self, depth: i32, curves: &[Curve2d]) -> Result<RegionId, RegionError> {
        let region = self.add_region(depth);
        let edges: Vec<(EdgeId, bool)> = curves.iter().map(|c| self.find_or_add_edge(*c)).collect();
        if let Err(e) = self.attach_loop(region, &edges, LoopRole::Outer) {
            self.regions.remove(region);
            return Err(e);
        }
        Ok(region)
    }

    /// Region bounded by a closed polyline through `points`.
    pub fn add_polygon_region(&mut self, depth: i32, points: &[Point2d]) -> Result<RegionId, RegionError> {
        let curves: Vec<Curve2d> = (0..points.len())
            .map(|i| Curve2d::line(points[i], points[(i + 1) % points.len()]))
            .collect();
        self.add_loop_region(depth, &curves)
    }

    /// Symmetric, deduplicated adjacency.
    pub fn link_regions(&mut self, a: RegionId, b: RegionId) -> Result<(), RegionError> {
        for r in [a, b] {
            if !self.regions.contains_key(r) {
                return Err(RegionError::UnknownRegion(r));
            }
        }
        if a == b {
            return Ok(());
        }
        if !self.regions[a].link.contains(&b) {
            self.regions[a].link.push(b);
        }
        if !self.regions[b].link.contains(&a) {
            self.regions[b].link.push(a);
        }
        Ok(())
    }

    /// Rebuild every region's adjacency from edges shared between regions.
    /// Links added by hand for non-adjacent regions are dropped.
    pub fn relink_all(&mut self) {
        for r in self.regions.values_mut() {
            r.link.clear();
        }
        let pairs: Vec<(RegionId, RegionId)> = self
            .edges
            .values()
            .filter(|e| e.coedges.len() == 2)
            .map(|e| (self.coedges[e.coedges[0]].region, self.coedges[e.coedges[1]].region))
            .filter(|(a, b)| a != b)
            .collect();
        for (a, b) in pairs {
            // both ends were just read from live coedges
            let _ = self.link_regions(a, b);
        }
        debug!(regions = self.regions.len(), "relinked region graph");
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    pub fn region(&self, id: RegionId) -> Result<&Region, RegionError> {
        self.regions.get(id).ok_or(RegionError::UnknownRegion(id))
    }

    fn oriented_start(&self, e: EdgeId, is_rev: bool) -> VertexId {
        let edge = &self.edges[e];
        if is_rev { edge.end } else { edge.start }
    }

    fn oriented_end(&self, e: EdgeId, is_rev: bool) -> VertexId {
        let edge = &self.edges[e];
        if is_rev { edge.start } else { edge.end }
    }

    pub fn coedge_tail(&self, c: CoedgeId) -> VertexId {
        let co = &self.coedges[c];
        self.oriented_start(co.edge, co.is_rev)
    }

    pub fn coedge_head(&self, c: CoedgeId) -> VertexId {
        let co = &self.coedges[c];
        self.oriented_end(co.edge, co.is_rev)
    }

    /// The edge curve oriented along the coedge.
    pub fn coedge_curve(&self, c: CoedgeId) -> Curve2d {
        let co = &self.coedges[c];
        let curve = self.edges[co.edge].curve;
        if co.is_rev { curve.reversed() } else { curve }
    }

    /// The other coedge on the same edge, if any.
    pub fn mate(&self, c: CoedgeId) -> Option<CoedgeId> {
        self.edges[self.coedges[c].edge]
            .coedges
            .iter()
            .copied()
            .find(|&other| other != c)
    }

    /// Depths on both sides of an edge; a missing side is the exterior.
    pub fn edge_side_depths(&self, e: EdgeId) -> (i32, i32) {
        let depth = |i: usize| {
            self.edges[e]
                .coedges
                .get(i)
                .and_then(|&c| self.regions.get(self.coedges[c].region))
                .map_or(EXTERIOR_DEPTH, |r| r.depth)
        };
        (depth(0), depth(1))
    }

    pub fn region_edges(&self, r: RegionId) -> Result<Vec<EdgeId>, RegionError> {
        let region = self.region(r)?;
        let mut edges: Vec<EdgeId> = Vec::new();
        for c in region.coedges() {
            let e = self.coedges[c].edge;
            if !edges.contains(&e) {
                edges.push(e);
            }
        }
        Ok(edges)
    }

    pub fn loop_curves(&self, coedges: &[CoedgeId]) -> Vec<Curve2d> {
        coedges.iter().map(|&c| self.coedge_curve(c)).collect()
    }

    /// Positive for counter-clockwise loops.
    pub fn loop_signed_area(&self, coedges: &[CoedgeId]) -> f64 {
        polygon::loop_signed_area(&self.loop_curves(coedges))
    }

    pub fn region_bounding_box(&self, r: RegionId) -> Result<BoundingBox2d, RegionError> {
        let region = self.region(r)?;
        let mut bb = BoundingBox2d::empty();
        for c in region.coedges() {
            for p in self.coedge_curve(c).sample_points() {
                bb.expand_to_include(&p);
            }
        }
        Ok(bb)
    }

    /// Whether consecutive coedges share endpoints, including last to first.
    pub fn is_loop_closed(&self, coedges: &[CoedgeId]) -> bool {
        !coedges.is_empty()
            && (0..coedges.len())
                .all(|i| self.coedge_head(coedges[i]) == self.coedge_tail(coedges[(i + 1) % coedges.len()]))
    }
}
