use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use cad_kernel::geometry::curves::Curve2d;

use crate::error::RegionError;
use crate::graph::{EdgeId, RegionGraph, RegionId};

/// A coedge as it existed before an edit: its historical id and curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorCoedge {
    pub id: u32,
    pub curve: Curve2d,
}

impl RegionGraph {
    /// Map each historical region id to the current regions descended from it.
    pub fn collect_by_provenance(&self, root: RegionId) -> Result<BTreeMap<u32, Vec<RegionId>>, RegionError> {
        let mut map: BTreeMap<u32, Vec<RegionId>> = BTreeMap::new();
        self.traverse_region(root, |id, region| {
            for &old in &region.old_ids {
                let entry = map.entry(old).or_default();
                if !entry.contains(&id) {
                    entry.push(id);
                }
            }
        })?;
        Ok(map)
    }

    /// For each prior coedge, the current edges that replaced it, ordered
    /// along the prior curve.
    ///
    /// Every current coedge naming a prior id contributes its edge, placed by
    /// projecting the edge midpoint onto the prior curve. Consecutive repeats
    /// of the same edge collapse into one entry.
    pub fn reorder_by_provenance(
        &self,
        root: RegionId,
        originals: &[PriorCoedge],
    ) -> Result<BTreeMap<u32, Vec<EdgeId>>, RegionError> {
        let mut placed: BTreeMap<u32, Vec<(f64, EdgeId)>> =
            originals.iter().map(|o| (o.id, Vec::new())).collect();

        self.traverse_coedge(root, |_, coedge| {
            for original in originals {
                if coedge.old_ids.contains(&original.id) {
                    let mid = self.edges[coedge.edge].curve.midpoint();
                    let t = original.curve.param_at(&mid);
                    if let Some(list) = placed.get_mut(&original.id) {
                        list.push((t, coedge.edge));
                    }
                }
            }
        })?;

        let ordered: BTreeMap<u32, Vec<EdgeId>> = placed
            .into_iter()
            .map(|(id, mut list)| {
                list.sort_by(|a, b| a.0.total_cmp(&b.0));
                let mut edges: Vec<EdgeId> = list.into_iter().map(|(_, e)| e).collect();
                edges.dedup();
                (id, edges)
            })
            .collect();
        debug!(originals = originals.len(), "reordered edges by provenance");
        Ok(ordered)
    }
}

#[cfg(test)]
mod tests {
    use cad_kernel::geometry::point::Point2d;
    use cad_kernel::Tolerance;

    use super::*;

    /// Three squares in a row under a single root, as if a 3x1 strip had been
    /// re-meshed from one rectangle (region 7) whose bottom edge was coedge 70.
    fn strip() -> (RegionGraph, RegionId, Vec<RegionId>) {
        let mut g = RegionGraph::new(Tolerance::default());
        let root = g
            .add_polygon_region(
                0,
                &[
                    Point2d::new(-1.0, -1.0),
                    Point2d::new(4.0, -1.0),
                    Point2d::new(4.0, 3.0),
                    Point2d::new(-1.0, 3.0),
                ],
            )
            .unwrap();
        // insert right to left so arena order differs from geometric order
        let cells: Vec<RegionId> = [2.0, 1.0, 0.0]
            .iter()
            .map(|&x| {
                g.add_polygon_region(
                    1,
                    &[
                        Point2d::new(x, 0.0),
                        Point2d::new(x + 1.0, 0.0),
                        Point2d::new(x + 1.0, 1.0),
                        Point2d::new(x, 1.0),
                    ],
                )
                .unwrap()
            })
            .collect();
        for &c in &cells {
            g.regions[c].old_ids = vec![7];
            let bottom = g.regions[c].outer[0];
            g.coedges[bottom].old_ids = vec![70];
        }
        g.relink_all();
        for &c in &cells {
            g.link_regions(root, c).unwrap();
        }
        (g, root, cells)
    }

    #[test]
    fn test_collect_by_provenance() {
        let (g, root, cells) = strip();
        let map = g.collect_by_provenance(root).unwrap();
        assert_eq!(map.len(), 1);
        let mut found = map[&7].clone();
        found.sort();
        let mut expected = cells.clone();
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_reorder_by_provenance_sorts_along_prior_curve() {
        let (g, root, cells) = strip();
        let prior = PriorCoedge {
            id: 70,
            curve: Curve2d::line(Point2d::new(0.0, 0.0), Point2d::new(3.0, 0.0)),
        };
        let map = g.reorder_by_provenance(root, &[prior]).unwrap();
        let expected: Vec<EdgeId> = cells
            .iter()
            .rev()
            .map(|&c| g.coedges[g.regions[c].outer[0]].edge)
            .collect();
        assert_eq!(map[&70], expected);
    }

    #[test]
    fn test_reorder_reversed_prior_curve() {
        let (g, root, cells) = strip();
        let prior = PriorCoedge {
            id: 70,
            curve: Curve2d::line(Point2d::new(3.0, 0.0), Point2d::new(0.0, 0.0)),
        };
        let map = g.reorder_by_provenance(root, &[prior]).unwrap();
        let expected: Vec<EdgeId> = cells.iter().map(|&c| g.coedges[g.regions[c].outer[0]].edge).collect();
        assert_eq!(map[&70], expected);
    }

    #[test]
    fn test_reorder_unreferenced_prior_is_empty() {
        let (g, root, _) = strip();
        let prior = PriorCoedge {
            id: 99,
            curve: Curve2d::line(Point2d::new(0.0, 0.0), Point2d::new(1.0, 0.0)),
        };
        let map = g.reorder_by_provenance(root, &[prior]).unwrap();
        assert!(map[&99].is_empty());
    }
}
