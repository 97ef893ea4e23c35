use tracing::debug;

use cad_kernel::geometry::curves::Curve2d;

use crate::error::RegionError;
use crate::graph::{Coedge, CoedgeId, EdgeId, RegionGraph, RegionId, VertexId};

/// A fusion of two consecutive line coedges meeting at `vertex`.
struct Fusion {
    first: CoedgeId,
    second: CoedgeId,
    vertex: VertexId,
    /// The opposite coedges, listed `(mate of second, mate of first)` in
    /// traversal order of the neighbouring loop.
    mates: Option<(CoedgeId, CoedgeId)>,
}

impl RegionGraph {
    /// Fuse consecutive collinear line coedges in a region's loops that meet
    /// at a vertex no other edge uses. Neighbouring loops sharing the fused
    /// edges are updated to match. Returns the number of fusions.
    pub fn simplify_collinear(&mut self, region: RegionId) -> Result<usize, RegionError> {
        self.region(region)?;
        let mut fused = 0;
        while let Some(fusion) = self.find_fusion(region) {
            self.apply_fusion(fusion);
            fused += 1;
        }
        debug!(?region, fused, "simplified collinear coedges");
        Ok(fused)
    }

    fn find_fusion(&self, region: RegionId) -> Option<Fusion> {
        let r = self.regions.get(region)?;
        for l in r.loops() {
            if l.len() < 3 {
                continue;
            }
            for i in 0..l.len() {
                let first = l[i];
                let second = l[(i + 1) % l.len()];
                if let Some(f) = self.fusion_at(first, second) {
                    return Some(f);
                }
            }
        }
        None
    }

    fn fusion_at(&self, first: CoedgeId, second: CoedgeId) -> Option<Fusion> {
        let (Curve2d::Line(l1), Curve2d::Line(l2)) = (self.coedge_curve(first), self.coedge_curve(second)) else {
            return None;
        };
        let (d1, d2) = (l1.direction(), l2.direction());
        let scale = d1.length() * d2.length();
        if scale <= 0.0 || 1.0 - d1.dot(&d2) / scale > self.tol.angular {
            return None;
        }

        let vertex = self.coedge_head(first);
        let (e1, e2) = (self.coedges[first].edge, self.coedges[second].edge);
        let users = self
            .edges
            .values()
            .filter(|e| e.start == vertex || e.end == vertex)
            .count();
        if e1 == e2 || users != 2 {
            return None;
        }

        let mates = match (self.mate(first), self.mate(second)) {
            (None, None) => None,
            (Some(m1), Some(m2)) => {
                if self.coedges[m1].region != self.coedges[m2].region {
                    return None;
                }
                // the neighbour walks the seam the other way: m2 then m1
                let neighbour = self.regions.get(self.coedges[m2].region)?;
                let adjacent = neighbour.loops().any(|l| {
                    l.iter()
                        .position(|&c| c == m2)
                        .is_some_and(|k| l[(k + 1) % l.len()] == m1)
                });
                if !adjacent {
                    return None;
                }
                Some((m2, m1))
            }
            _ => return None,
        };

        Some(Fusion {
            first,
            second,
            vertex,
            mates,
        })
    }

    fn apply_fusion(&mut self, f: Fusion) {
        let start = self.vertices[self.coedge_tail(f.first)];
        let end = self.vertices[self.coedge_head(f.second)];
        let edge = self.add_edge(Curve2d::line(start, end));

        let fused = self.replace_pair(f.first, f.second, edge, false);
        if let Some((m2, m1)) = f.mates {
            let mate = self.replace_pair(m2, m1, edge, true);
            self.edges[edge].coedges.push(mate);
        }
        self.edges[edge].coedges.insert(0, fused);
        self.vertices.remove(f.vertex);
    }

    /// Replace two consecutive coedges of one loop by a single coedge on
    /// `edge`, deleting the old coedges and their edges.
    fn replace_pair(&mut self, first: CoedgeId, second: CoedgeId, edge: EdgeId, is_rev: bool) -> CoedgeId {
        let region = self.coedges[first].region;
        let mut old_ids = self.coedges[first].old_ids.clone();
        for id in &self.coedges[second].old_ids {
            if !old_ids.contains(id) {
                old_ids.push(*id);
            }
        }
        let replacement = self.coedges.insert(Coedge {
            edge,
            is_rev,
            region,
            old_ids,
        });

        let r = &mut self.regions[region];
        for l in std::iter::once(&mut r.outer).chain(r.holes.iter_mut()) {
            if let Some(i) = l.iter().position(|&c| c == first) {
                l[i] = replacement;
                l.retain(|&c| c != second);
                break;
            }
        }

        for c in [first, second] {
            if let Some(old) = self.coedges.remove(c) {
                // the edge may already be gone when its mate was replaced first
                self.edges.remove(old.edge);
            }
        }
        replacement
    }
}
