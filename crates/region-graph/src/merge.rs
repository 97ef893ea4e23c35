use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use cad_kernel::geometry::curves::Curve2d;

use crate::error::RegionError;
use crate::graph::{CoedgeId, EdgeId, Region, RegionGraph, RegionId, VertexId};

/// An edge removed by a merge because it separated the two merged regions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedEdge {
    pub id: EdgeId,
    pub curve: Curve2d,
}

/// Everything a merge will change, computed before the graph is touched.
struct MergePlan {
    shared: Vec<EdgeId>,
    loops: Vec<Vec<CoedgeId>>,
    outer: Option<usize>,
    depth: i32,
}

impl RegionGraph {
    /// Merge region `b` into region `a` across the edges they share.
    ///
    /// The surviving boundary coedges of both regions are re-walked into
    /// closed loops. The loop touching the shallowest neighbour, when that
    /// neighbour is shallower than both regions, becomes the outer loop and
    /// the rest become holes. `b` is removed and every reference to it is
    /// redirected to `a`. Returns the removed shared edges.
    #[instrument(skip(self))]
    pub fn merge_dual_region(&mut self, a: RegionId, b: RegionId) -> Result<Vec<SharedEdge>, RegionError> {
        let plan = self.plan_merge(a, b)?;
        Ok(self.apply_merge(a, b, plan))
    }

    fn plan_merge(&self, a: RegionId, b: RegionId) -> Result<MergePlan, RegionError> {
        if a == b {
            return Err(RegionError::NotDistinct(a));
        }
        let ra = self.region(a)?;
        let rb = self.region(b)?;

        let mut shared: Vec<EdgeId> = Vec::new();
        for c in ra.coedges().chain(rb.coedges()) {
            let e = self.coedges[c].edge;
            let edge = &self.edges[e];
            if edge.coedges.len() != 2 || shared.contains(&e) {
                continue;
            }
            let r0 = self.coedges[edge.coedges[0]].region;
            let r1 = self.coedges[edge.coedges[1]].region;
            if (r0 == a && r1 == b) || (r0 == b && r1 == a) {
                shared.push(e);
            }
        }

        let pool: Vec<CoedgeId> = ra
            .coedges()
            .chain(rb.coedges())
            .filter(|&c| !shared.contains(&self.coedges[c].edge))
            .collect();
        if pool.is_empty() {
            return Err(RegionError::invariant(format!(
                "merging {a:?} and {b:?} leaves no boundary"
            )));
        }

        let loops = self.walk_loops(&pool)?;

        let depth = ra.depth.min(rb.depth);
        let mut best: Option<(usize, i32, f64)> = None;
        for (i, l) in loops.iter().enumerate() {
            let Some(lowest) = l
                .iter()
                .map(|&c| {
                    let (d0, d1) = self.edge_side_depths(self.coedges[c].edge);
                    d0.min(d1)
                })
                .min()
            else {
                continue;
            };
            if lowest >= depth {
                continue;
            }
            let area = self.loop_signed_area(l).abs();
            let better = match best {
                None => true,
                Some((_, d, best_area)) => lowest < d || (lowest == d && area > best_area),
            };
            if better {
                best = Some((i, lowest, area));
            }
        }

        Ok(MergePlan {
            shared,
            loops,
            outer: best.map(|(i, _, _)| i),
            depth,
        })
    }

    /// Chain coedges head-to-tail into maximal closed loops.
    fn walk_loops(&self, pool: &[CoedgeId]) -> Result<Vec<Vec<CoedgeId>>, RegionError> {
        let mut by_tail: HashMap<VertexId, Vec<usize>> = HashMap::new();
        for (i, &c) in pool.iter().enumerate() {
            by_tail.entry(self.coedge_tail(c)).or_default().push(i);
        }

        let mut used = vec![false; pool.len()];
        let mut loops = Vec::new();
        for start in 0..pool.len() {
            if used[start] {
                continue;
            }
            used[start] = true;
            let origin = self.coedge_tail(pool[start]);
            let mut current = pool[start];
            let mut walked = vec![current];
            loop {
                let head = self.coedge_head(current);
                if head == origin {
                    break;
                }
                let next = by_tail
                    .get(&head)
                    .and_then(|candidates| candidates.iter().copied().find(|&i| !used[i]));
                let Some(i) = next else {
                    return Err(RegionError::invariant(format!(
                        "boundary loop is open at vertex {head:?}"
                    )));
                };
                used[i] = true;
                current = pool[i];
                walked.push(current);
            }
            loops.push(walked);
        }
        Ok(loops)
    }

    fn apply_merge(&mut self, a: RegionId, b: RegionId, plan: MergePlan) -> Vec<SharedEdge> {
        let MergePlan {
            shared,
            mut loops,
            outer,
            depth,
        } = plan;

        for &c in loops.iter().flatten() {
            self.coedges[c].region = a;
        }
        let outer_loop = outer.map(|i| loops.remove(i)).unwrap_or_default();

        let b_old_ids = self.regions.remove(b).map(|r| r.old_ids).unwrap_or_default();

        let mut removed = Vec::with_capacity(shared.len());
        for e in shared {
            if let Some(edge) = self.edges.remove(e) {
                for c in &edge.coedges {
                    self.coedges.remove(*c);
                }
                self.remove_if_unused(edge.start);
                self.remove_if_unused(edge.end);
                removed.push(SharedEdge {
                    id: e,
                    curve: edge.curve,
                });
            }
        }

        let mut link: Vec<RegionId> = Vec::new();
        for &c in outer_loop.iter().chain(loops.iter().flatten()) {
            if let Some(m) = self.mate(c) {
                let r = self.coedges[m].region;
                if r != a && !link.contains(&r) {
                    link.push(r);
                }
            }
        }

        for (id, region) in self.regions.iter_mut() {
            if id == a || !region.link.contains(&b) {
                continue;
            }
            region.link.retain(|&r| r != b);
            if !region.link.contains(&a) {
                region.link.push(a);
            }
        }

        let survivor = &mut self.regions[a];
        survivor.depth = depth;
        survivor.outer = outer_loop;
        survivor.holes = loops;
        survivor.link = link;
        for id in b_old_ids {
            if !survivor.old_ids.contains(&id) {
                survivor.old_ids.push(id);
            }
        }

        debug!(
            outer = survivor.outer.len(),
            holes = survivor.holes.len(),
            shared = removed.len(),
            "merged regions"
        );
        removed
    }

    fn remove_if_unused(&mut self, v: VertexId) {
        if !self.edges.values().any(|e| e.start == v || e.end == v) {
            self.vertices.remove(v);
        }
    }

    /// Repeatedly merge a region satisfying both predicates with a linked
    /// region satisfying only the secondary one, until no such pair is left.
    /// Regions at depth zero never take part. Returns the number of merges.
    pub fn merge_until_fixed_point(
        &mut self,
        is_primary: impl Fn(&Region) -> bool,
        is_secondary: impl Fn(&Region) -> bool,
    ) -> Result<usize, RegionError> {
        let mut merges = 0;
        while let Some((x, y)) = self.find_merge_pair(&is_primary, &is_secondary) {
            self.merge_dual_region(x, y)?;
            merges += 1;
        }
        info!(merges, remaining = self.regions.len(), "region merging reached a fixed point");
        Ok(merges)
    }

    fn find_merge_pair(
        &self,
        is_primary: &impl Fn(&Region) -> bool,
        is_secondary: &impl Fn(&Region) -> bool,
    ) -> Option<(RegionId, RegionId)> {
        self.regions
            .iter()
            .filter(|(_, r)| r.depth != 0 && is_primary(r) && is_secondary(r))
            .find_map(|(x, rx)| {
                rx.link
                    .iter()
                    .copied()
                    .find(|&y| {
                        self.regions
                            .get(y)
                            .is_some_and(|ry| ry.depth != 0 && is_secondary(ry) && !is_primary(ry))
                    })
                    .map(|y| (x, y))
            })
    }
}
