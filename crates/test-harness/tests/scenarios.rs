//! End-to-end scenarios: sketch, extrude, name, regenerate, match, and
//! region maintenance, verified through the oracles at every step.

use cad_kernel::geometry::point::{Point2d, Point3d};
use cad_kernel::geometry::projection::SketchPlane;
use cad_kernel::geometry::vector::Vec3;
use cad_kernel::Tolerance;
use region_graph::RegionGraph;
use test_harness::assertions::*;
use test_harness::helpers::{cell_grid, square_region};
use test_harness::PartBuilder;

fn raised_plane(z: f64) -> SketchPlane {
    SketchPlane {
        origin: Point3d::new(0.0, 0.0, z),
        ..SketchPlane::default()
    }
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

#[test]
fn slot_tray_is_fully_named() {
    let mut m = PartBuilder::new();
    m.slot_sketch("slot", raised_plane(2.0), 0., 0., 6., 1.).unwrap();
    m.extrude_open("tray", "slot", 3.0).unwrap();
    m.assert_counts("tray", 8, 12, 5).unwrap();

    let report = m.name_part("tray").unwrap();
    assert_naming_complete(&report, "tray").unwrap();
    assert_face_tags(
        &m.store,
        m.shell("tray").unwrap(),
        &["slot", "slot-c0", "slot-c1", "slot-c2", "slot-c3"],
        "tray",
    )
    .unwrap();
    assert_oracles_pass(&m.check_naming("tray").unwrap()).unwrap();
}

#[test]
fn capped_cylinder_passes_shell_checks() {
    let mut m = PartBuilder::new();
    m.circle_sketch("disc", SketchPlane::default(), 1., 1., 2.).unwrap();
    m.extrude("puck", "disc", 0.5).unwrap();
    m.assert_counts("puck", 2, 3, 3).unwrap();
    assert_oracles_pass(&m.check_topology("puck", 0).unwrap()).unwrap();

    let report = m.name_part("puck").unwrap();
    assert_naming_complete(&report, "puck").unwrap();
    m.assert_face_tagged("puck", "disc-c0").unwrap();
}

#[test]
fn plate_with_hole_names_inner_walls() {
    let mut m = PartBuilder::new().with_auto_check();
    m.rect_sketch("plate", SketchPlane::default(), 0., 0., 8., 6.).unwrap();
    m.add_hole("plate", test_harness::helpers::circle_profile(4., 3., 1.)).unwrap();
    m.extrude_open("p", "plate", 1.0).unwrap();
    let report = m.name_part("p").unwrap();
    assert!(report.is_clean(), "{:?}", report.diagnostics);
    m.assert_face_tagged("p", "plate-h0-c0").unwrap();
    assert_oracles_pass(&m.check_naming("p").unwrap()).unwrap();
}

// ---------------------------------------------------------------------------
// Regeneration and matching
// ---------------------------------------------------------------------------

#[test]
fn every_face_survives_regeneration() {
    let mut m = PartBuilder::new();
    m.rect_sketch("base", SketchPlane::default(), 0., 0., 5., 3.).unwrap();
    m.extrude_open("v1", "base", 2.0).unwrap();
    m.regenerate("v2", "v1", Vec3::new(-7.0, 2.5, 1.0)).unwrap();
    m.name_part("v1").unwrap();
    m.name_part("v2").unwrap();

    for tag in m.face_tags("v1").unwrap() {
        let face = m.match_face("v1", "v2", &tag).unwrap();
        assert_eq!(m.store.faces[face].tag, tag);
    }
}

#[test]
fn regenerating_into_another_shape_is_a_mismatch() {
    let mut m = PartBuilder::new();
    m.rect_sketch("a", SketchPlane::default(), 0., 0., 5., 3.).unwrap();
    m.slot_sketch("b", SketchPlane::default(), 0., 0., 5., 1.).unwrap();
    m.extrude("box", "a", 2.0).unwrap();
    m.extrude("rounded", "b", 2.0).unwrap();
    m.name_part("box").unwrap();

    // same counts, but the faces do not line up
    assert_eq!(m.topology_counts("box").unwrap(), m.topology_counts("rounded").unwrap());
    assert!(m.match_face("box", "rounded", "a-c1").is_err());
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

#[test]
fn grid_row_merges_into_strip() {
    let mut g = RegionGraph::new(Tolerance::default());
    let outside = square_region(&mut g, 0, -1., 0., 1.).unwrap();
    let cells = cell_grid(&mut g, 3, 1, 1).unwrap();

    g.merge_dual_region(outside, cells[0]).unwrap();
    g.merge_dual_region(outside, cells[1]).unwrap();
    g.merge_dual_region(outside, cells[2]).unwrap();
    assert_region_count(&g, 1, "strip").unwrap();
    assert_oracles_pass(&test_harness::oracle::run_region_checks(&g)).unwrap();

    let fused = g.simplify_collinear(outside).unwrap();
    assert_eq!(fused, 6);
    assert_eq!(g.regions[outside].outer.len(), 4);
    assert_region_bounds(&g, outside, Point2d::new(-1., 0.), Point2d::new(3., 1.), 1e-9, "strip").unwrap();
    assert_oracles_pass(&test_harness::oracle::run_region_checks(&g)).unwrap();
}

#[test]
fn region_count_assertion_lists_regions() {
    let mut g = RegionGraph::new(Tolerance::default());
    cell_grid(&mut g, 2, 1, 1).unwrap();
    let err = assert_region_count(&g, 1, "pair").unwrap_err();
    assert!(err.to_string().contains("expected 1 regions, got 2"), "{err}");
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[test]
fn report_describes_parts_and_diagnostics() {
    let mut m = PartBuilder::new();
    m.rect_sketch("base", SketchPlane::default(), 0., 0., 2., 2.).unwrap();
    m.extrude_open("tray", "base", 1.0).unwrap();
    m.extrude("blk", "base", 1.0).unwrap();
    m.name_part("tray").unwrap();
    m.name_part("blk").unwrap();

    let report = m.report().unwrap();
    assert_eq!(report.part_entries.len(), 2);
    assert_eq!(report.part_entries[0].tagged_edges, 12);

    let text = report.to_text();
    assert!(text.contains("\"tray\" [OPEN]: V=8 E=12 F=5"), "{text}");
    assert!(text.contains("face base (bottomface from base)"), "{text}");
    assert!(text.contains("[PASS] euler_formula"), "{text}");
    assert!(text.contains("[FAIL] tags_unique"), "{text}");
    assert!(text.contains("Diagnostics (5):"), "{text}");
}

#[test]
fn report_on_unnamed_parts_has_no_naming_checks() {
    let mut m = PartBuilder::new();
    m.rect_sketch("base", SketchPlane::default(), 0., 0., 2., 2.).unwrap();
    m.extrude_open("tray", "base", 1.0).unwrap();

    let report = m.report().unwrap();
    assert!(report.oracle_results.is_empty());
    let text = report.to_string();
    assert!(text.contains("face <untagged> (unnamed)"), "{text}");
    assert!(text.contains("0/12 edges tagged"), "{text}");
    assert!(text.contains("Diagnostics: none"), "{text}");
}
