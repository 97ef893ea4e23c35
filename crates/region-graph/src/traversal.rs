use std::collections::HashSet;

use crate::error::RegionError;
use crate::graph::{Coedge, CoedgeId, Region, RegionGraph, RegionId};

impl RegionGraph {
    /// Visit `root`, then every region reachable through links that lead to
    /// strictly deeper regions. Each region is visited at most once.
    pub fn traverse_region(
        &self,
        root: RegionId,
        mut visit: impl FnMut(RegionId, &Region),
    ) -> Result<(), RegionError> {
        self.region(root)?;
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let Some(region) = self.regions.get(id) else {
                continue;
            };
            visit(id, region);
            // reversed so children are visited in link order
            for &child in region.link.iter().rev() {
                if let Some(c) = self.regions.get(child) {
                    if c.depth > region.depth && !seen.contains(&child) {
                        stack.push(child);
                    }
                }
            }
        }
        Ok(())
    }

    /// Visit every coedge of every region reached by [`Self::traverse_region`],
    /// outer loop before holes.
    pub fn traverse_coedge(
        &self,
        root: RegionId,
        mut visit: impl FnMut(CoedgeId, &Coedge),
    ) -> Result<(), RegionError> {
        self.traverse_region(root, |_, region| {
            for c in region.coedges() {
                visit(c, &self.coedges[c]);
            }
        })
    }

    /// Regions reached from `root`, in visit order.
    pub fn regions_below(&self, root: RegionId) -> Result<Vec<RegionId>, RegionError> {
        let mut out = Vec::new();
        self.traverse_region(root, |id, _| out.push(id))?;
        Ok(out)
    }
}
