//! Tests for verification oracles.

use cad_kernel::geometry::projection::SketchPlane;
use cad_kernel::topology::builders::make_box;
use cad_kernel::topology::brep::EntityStore;
use cad_kernel::geometry::point::Point3d;
use cad_kernel::Tolerance;
use region_graph::RegionGraph;
use test_harness::helpers::{cell_grid, rect_profile, square_region};
use test_harness::oracle::*;
use test_harness::PartBuilder;

fn block(capped: bool) -> PartBuilder {
    let mut m = PartBuilder::new();
    m.rect_sketch("base", SketchPlane::default(), 0., 0., 10., 10.).unwrap();
    if capped {
        m.extrude("blk", "base", 10.0).unwrap();
    } else {
        m.extrude_open("blk", "base", 10.0).unwrap();
    }
    m
}

// ── Shell Oracle Tests ──────────────────────────────────────────────────

#[test]
fn euler_formula_passes_for_box() {
    let m = block(true);
    let result = check_euler_formula(&m.store, m.shell("blk").unwrap(), 0);
    assert!(result.passed, "Box should satisfy Euler's formula: {}", result.detail);
    assert_eq!(result.value, Some(2.0));
}

#[test]
fn euler_formula_counts_inner_loops() {
    let mut m = PartBuilder::new();
    m.rect_sketch("base", SketchPlane::default(), 0., 0., 4., 4.).unwrap();
    m.add_hole("base", rect_profile(1., 1., 2., 2.)).unwrap();
    m.extrude("plate", "base", 1.0).unwrap();
    m.assert_counts("plate", 16, 24, 10).unwrap();

    let shell = m.shell("plate").unwrap();
    let torus = check_euler_formula(&m.store, shell, 1);
    assert!(torus.passed, "{}", torus.detail);
    assert!(torus.detail.contains("R(2)"), "{}", torus.detail);

    let sphere = check_euler_formula(&m.store, shell, 0);
    assert!(!sphere.passed);
}

#[test]
fn manifold_edges_passes_for_box() {
    let m = block(true);
    let result = check_manifold_edges(&m.store, m.shell("blk").unwrap());
    assert!(result.passed, "Box edges should be manifold: {}", result.detail);
}

#[test]
fn manifold_edges_fails_for_open_block() {
    let m = block(false);
    let result = check_manifold_edges(&m.store, m.shell("blk").unwrap());
    assert!(!result.passed);
    assert!(result.detail.starts_with("4 non-manifold"), "{}", result.detail);
}

#[test]
fn loops_closed_on_kernel_box() {
    let mut store = EntityStore::new();
    let shell = make_box(&mut store, Point3d::new(0., 0., 0.), Point3d::new(1., 2., 3.));
    let result = check_loops_closed(&store, shell, &Tolerance::default());
    assert!(result.passed, "{}", result.detail);
    assert_eq!(result.detail, "all 6 loops closed");
}

#[test]
fn shell_checks_all_pass_for_box() {
    let m = block(true);
    let verdicts = m.check_topology("blk", 0).unwrap();
    assert_eq!(verdicts.len(), 3);
    assert!(verdicts.iter().all(|v| v.passed), "{verdicts:?}");
}

// ── Naming Oracle Tests ─────────────────────────────────────────────────

#[test]
fn unnamed_shell_fails_tags_unique() {
    let m = block(false);
    let result = check_tags_unique(&m.store, m.shell("blk").unwrap());
    assert!(!result.passed);
    assert!(result.detail.starts_with("17 untagged"), "{}", result.detail);
}

#[test]
fn named_open_block_passes_naming_checks() {
    let mut m = block(false);
    m.name_part("blk").unwrap();
    let verdicts = m.check_naming("blk").unwrap();
    assert!(verdicts.iter().all(|v| v.passed), "{verdicts:?}");
    assert_eq!(verdicts[0].value, Some(17.0));
}

#[test]
fn capped_block_repeats_cap_tags() {
    let mut m = block(true);
    m.name_part("blk").unwrap();
    let shell = m.shell("blk").unwrap();
    assert!(!check_tags_unique(&m.store, shell).passed);
    // half-edge tags still derive from whatever the faces and edges carry
    assert!(check_half_edge_tags(&m.store, shell).passed);
}

#[test]
fn half_edge_tags_detect_stale_names() {
    let mut m = block(false);
    m.name_part("blk").unwrap();
    let shell = m.shell("blk").unwrap();
    let face = m.store.shell_faces(shell)[0];
    m.store.faces[face].tag = "renamed".into();

    let result = check_half_edge_tags(&m.store, shell);
    assert!(!result.passed);
    assert!(result.detail.starts_with("4 mismatched"), "{}", result.detail);
}

// ── Region Oracle Tests ─────────────────────────────────────────────────

#[test]
fn region_checks_pass_on_fresh_grid() {
    let mut g = RegionGraph::new(Tolerance::default());
    cell_grid(&mut g, 3, 3, 1).unwrap();
    let verdicts = run_region_checks(&g);
    assert!(verdicts.iter().all(|v| v.passed), "{verdicts:?}");
    assert_eq!(verdicts[2].value, Some(36.0));
}

#[test]
fn region_checks_pass_after_merge() {
    let mut g = RegionGraph::new(Tolerance::default());
    let a = square_region(&mut g, 0, 0., 0., 1.).unwrap();
    let b = square_region(&mut g, 1, 1., 0., 1.).unwrap();
    let c = square_region(&mut g, 1, 2., 0., 1.).unwrap();
    g.relink_all();

    g.merge_dual_region(a, b).unwrap();
    let verdicts = run_region_checks(&g);
    assert!(verdicts.iter().all(|v| v.passed), "{verdicts:?}");
    assert_eq!(g.regions[c].link, vec![a]);
}

#[test]
fn one_way_link_is_flagged() {
    let mut g = RegionGraph::new(Tolerance::default());
    let a = square_region(&mut g, 1, 0., 0., 1.).unwrap();
    let b = square_region(&mut g, 1, 5., 0., 1.).unwrap();
    g.regions[a].link.push(b);

    let result = check_region_links(&g);
    assert!(!result.passed);
    assert!(result.detail.starts_with("1 one-way"), "{}", result.detail);
}

#[test]
fn verdicts_serialize_for_failure_dumps() {
    let m = block(true);
    let verdicts = m.check_topology("blk", 0).unwrap();
    let json = serde_json::to_value(&verdicts).unwrap();
    assert_eq!(json[0]["oracle_name"], "euler_formula");
    assert_eq!(json[0]["passed"], true);
    assert_eq!(json[0]["value"], 2.0);
    assert!(json[1]["value"].is_null());
}
