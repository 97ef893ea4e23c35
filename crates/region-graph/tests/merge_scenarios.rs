//! End-to-end region merge scenarios and merge-count properties.

use proptest::prelude::*;

use cad_kernel::geometry::point::Point2d;
use cad_kernel::Tolerance;
use region_graph::{Region, RegionGraph, RegionId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn cell(g: &mut RegionGraph, depth: i32, x: f64, y: f64) -> RegionId {
    g.add_polygon_region(
        depth,
        &[
            Point2d::new(x, y),
            Point2d::new(x + 1.0, y),
            Point2d::new(x + 1.0, y + 1.0),
            Point2d::new(x, y + 1.0),
        ],
    )
    .unwrap()
}

const PRIMARY: u32 = 1;
const SECONDARY: u32 = 2;
const NEUTRAL: u32 = 3;

fn is_primary(r: &Region) -> bool {
    r.old_ids.contains(&PRIMARY)
}

fn is_secondary(r: &Region) -> bool {
    r.old_ids.contains(&PRIMARY) || r.old_ids.contains(&SECONDARY)
}

/// A row of unit cells. Each `true` group is a primary cell followed by its
/// secondary partner and a neutral separator; each `false` group is a single
/// neutral cell.
fn strip(groups: &[bool]) -> (RegionGraph, usize, usize) {
    let mut g = RegionGraph::new(Tolerance::default());
    let mut x = 0.0;
    let mut pairs = 0;
    for &paired in groups {
        let labels: &[u32] = if paired {
            pairs += 1;
            &[PRIMARY, SECONDARY, NEUTRAL]
        } else {
            &[NEUTRAL]
        };
        for &label in labels {
            let r = cell(&mut g, 1, x, 0.0);
            g.regions[r].old_ids = vec![label];
            x += 1.0;
        }
    }
    g.relink_all();
    let n = g.regions.len();
    (g, n, pairs)
}

// ---------------------------------------------------------------------------
// 1. Two unit squares sharing x = 1
// ---------------------------------------------------------------------------

#[test]
fn two_unit_squares_merge_into_rectangle() {
    let mut g = RegionGraph::new(Tolerance::default());
    let a = cell(&mut g, 0, 0.0, 0.0);
    let b = cell(&mut g, 1, 1.0, 0.0);
    g.relink_all();

    let shared = g.merge_dual_region(a, b).unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(g.regions.len(), 1);
    assert_eq!(g.regions[a].depth, 0);
    assert!(g.coedges.values().all(|c| c.region == a));
    assert_eq!(g.regions[a].outer.len(), 6);

    g.simplify_collinear(a).unwrap();
    let merged = &g.regions[a];
    assert_eq!(merged.outer.len(), 4);
    assert!(merged.holes.is_empty());

    let bb = g.region_bounding_box(a).unwrap();
    assert!((bb.min.x - 0.0).abs() < 1e-12 && (bb.min.y - 0.0).abs() < 1e-12);
    assert!((bb.max.x - 2.0).abs() < 1e-12 && (bb.max.y - 1.0).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// 2. Merged regions stay visible through provenance
// ---------------------------------------------------------------------------

#[test]
fn merged_region_answers_for_both_histories() {
    let mut g = RegionGraph::new(Tolerance::default());
    let root = g
        .add_polygon_region(
            0,
            &[
                Point2d::new(-1.0, -1.0),
                Point2d::new(5.0, -1.0),
                Point2d::new(5.0, 5.0),
                Point2d::new(-1.0, 5.0),
            ],
        )
        .unwrap();
    let a = cell(&mut g, 1, 0.0, 0.0);
    let b = cell(&mut g, 1, 1.0, 0.0);
    g.regions[a].old_ids = vec![10];
    g.regions[b].old_ids = vec![11];
    g.relink_all();
    g.link_regions(root, a).unwrap();
    g.link_regions(root, b).unwrap();

    g.merge_dual_region(a, b).unwrap();
    assert_eq!(g.regions[root].link, vec![a]);

    let map = g.collect_by_provenance(root).unwrap();
    assert_eq!(map[&10], vec![a]);
    assert_eq!(map[&11], vec![a]);
}

// ---------------------------------------------------------------------------
// 3. Fixed-point merging removes exactly one region per qualifying pair
// ---------------------------------------------------------------------------

#[test]
fn fixed_point_on_fixed_strip() {
    let (mut g, n, m) = strip(&[true, false, true, true, false]);
    let merges = g.merge_until_fixed_point(is_primary, is_secondary).unwrap();
    assert_eq!(merges, m);
    assert_eq!(g.regions.len(), n - m);
    for r in g.regions.values() {
        if is_primary(r) {
            assert!(r.old_ids.contains(&SECONDARY));
        }
    }
}

proptest! {
    #[test]
    fn fixed_point_leaves_n_minus_m(groups in proptest::collection::vec(any::<bool>(), 1..12)) {
        let (mut g, n, m) = strip(&groups);
        let merges = g.merge_until_fixed_point(is_primary, is_secondary).unwrap();
        prop_assert_eq!(merges, m);
        prop_assert_eq!(g.regions.len(), n - m);
        for r in g.regions.values() {
            prop_assert!(g.is_loop_closed(&r.outer));
        }
    }
}

// ---------------------------------------------------------------------------
// 4. Boundary count after a merge across one shared edge
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn merge_outer_count_is_sum_minus_two(
        extra_a in 0usize..5,
        extra_b in 0usize..5,
        depth_a in 1i32..4,
        depth_b in 1i32..4,
    ) {
        // A is a fan polygon left of x = 0, B right of it; they share the
        // segment from (0,0) to (0,1).
        let fan = |side: f64, extra: usize| -> Vec<Point2d> {
            let mut pts = vec![Point2d::new(0.0, 0.0)];
            for i in 0..=extra {
                let t = i as f64 / (extra as f64 + 1.0);
                pts.push(Point2d::new(side * (1.0 + t), t));
            }
            pts.push(Point2d::new(side, 1.0));
            pts.push(Point2d::new(0.0, 1.0));
            if side < 0.0 {
                pts.reverse();
            }
            pts
        };
        let pa = fan(-1.0, extra_a);
        let pb = fan(1.0, extra_b);

        let mut g = RegionGraph::new(Tolerance::default());
        let a = g.add_polygon_region(depth_a, &pa).unwrap();
        let b = g.add_polygon_region(depth_b, &pb).unwrap();
        g.relink_all();

        let shared = g.merge_dual_region(a, b).unwrap();
        prop_assert_eq!(shared.len(), 1);
        prop_assert_eq!(g.regions[a].outer.len(), pa.len() + pb.len() - 2);
        prop_assert_eq!(g.regions[a].depth, depth_a.min(depth_b));
        prop_assert!(!g.regions.contains_key(b));
    }
}
