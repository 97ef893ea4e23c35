//! Tests for the PartBuilder workflow API.

use cad_kernel::geometry::projection::SketchPlane;
use cad_kernel::geometry::vector::Vec3;
use test_harness::helpers::rect_profile;
use test_harness::{HarnessError, PartBuilder};

fn xy() -> SketchPlane {
    SketchPlane::default()
}

#[test]
fn rect_sketch_extrudes_to_box() {
    let mut m = PartBuilder::new();
    m.rect_sketch("sk", xy(), 0., 0., 10., 10.).unwrap();
    let shell = m.extrude("box", "sk", 5.0).unwrap();
    assert_eq!(m.shell("box").unwrap(), shell);
    m.assert_counts("box", 8, 12, 6).unwrap();
}

#[test]
fn extrude_open_leaves_top_off() {
    let mut m = PartBuilder::new();
    m.rect_sketch("sk", xy(), 0., 0., 4., 2.).unwrap();
    m.extrude_open("tray", "sk", 1.0).unwrap();
    m.assert_counts("tray", 8, 12, 5).unwrap();
    assert!(!m.part("tray").unwrap().capped);
}

#[test]
fn duplicate_name_returns_error() {
    let mut m = PartBuilder::new();
    m.rect_sketch("sk", xy(), 0., 0., 10., 10.).unwrap();
    let result = m.rect_sketch("sk", xy(), 0., 0., 5., 5.);
    assert!(matches!(result, Err(HarnessError::DuplicateName { .. })));

    // parts and sketches share one namespace
    let result = m.extrude("sk", "sk", 1.0);
    assert!(matches!(result, Err(HarnessError::DuplicateName { .. })));
}

#[test]
fn unknown_names_are_reported() {
    let mut m = PartBuilder::new();
    assert!(matches!(m.extrude("box", "nope", 1.0), Err(HarnessError::PartNotFound { .. })));
    assert!(m.shell("box").is_err());
    assert!(m.name_part("box").is_err());
}

#[test]
fn build_errors_propagate() {
    let mut m = PartBuilder::new();
    m.rect_sketch("sk", xy(), 0., 0., 1., 1.).unwrap();
    let result = m.extrude("flat", "sk", 0.0);
    assert!(matches!(result, Err(HarnessError::Build(_))), "{result:?}");
}

#[test]
fn history_records_every_step() {
    let mut m = PartBuilder::new();
    m.rect_sketch("sk", xy(), 0., 0., 2., 2.).unwrap();
    m.extrude_open("a", "sk", 1.0).unwrap();
    m.name_part("a").unwrap();
    m.regenerate("b", "a", Vec3::new(3.0, 0.0, 0.0)).unwrap();

    let ops: Vec<&str> = m.history().iter().map(|(_, op)| op.as_str()).collect();
    assert_eq!(ops, ["Sketch", "Extrude", "Name", "Regenerate(a)"]);
}

#[test]
fn name_part_tags_every_face() {
    let mut m = PartBuilder::new();
    m.rect_sketch("base", xy(), 0., 0., 3., 2.).unwrap();
    m.extrude_open("blk", "base", 1.0).unwrap();
    let report = m.name_part("blk").unwrap();
    assert!(report.is_clean(), "{:?}", report.diagnostics);
    assert_eq!(report.faces_named, 5);

    m.assert_face_tagged("blk", "base").unwrap();
    m.assert_face_tagged("blk", "base-c2").unwrap();
    assert!(m.assert_face_tagged("blk", "base-c4").is_err());
    assert_eq!(m.naming_report("blk").map(|r| r.edges_named), Some(12));
}

#[test]
fn regenerated_part_matches_by_tag() {
    let mut m = PartBuilder::new();
    m.rect_sketch("base", xy(), 0., 0., 3., 2.).unwrap();
    m.extrude_open("v1", "base", 1.0).unwrap();
    m.regenerate("v2", "v1", Vec3::new(10.0, -4.0, 2.0)).unwrap();
    m.name_part("v1").unwrap();
    m.name_part("v2").unwrap();

    let face = m.match_face("v1", "v2", "base-c1").unwrap();
    assert_eq!(m.store.faces[face].tag, "base-c1");
    assert!(m.store.shell_faces(m.shell("v2").unwrap()).contains(&face));
}

#[test]
fn match_path_follows_bottom_loop() {
    let mut m = PartBuilder::new();
    m.rect_sketch("base", xy(), 0., 0., 3., 2.).unwrap();
    m.extrude_open("v1", "base", 1.0).unwrap();
    m.regenerate("v2", "v1", Vec3::new(0.0, 0.0, 5.0)).unwrap();
    m.name_part("v1").unwrap();
    m.name_part("v2").unwrap();

    let tags = ["base|base|base-c0|base-c0", "base|base|base-c1|base-c1"];
    let path = m.match_path("v1", "v2", &tags).unwrap();
    let matched: Vec<&str> = path.iter().map(|&he| m.store.half_edges[he].tag.as_str()).collect();
    assert_eq!(matched, tags);
}

#[test]
fn auto_check_accepts_repeated_cap_tags() {
    let mut m = PartBuilder::new().with_auto_check();
    m.rect_sketch("base", xy(), 0., 0., 4., 4.).unwrap();
    m.add_hole("base", rect_profile(1., 1., 2., 2.)).unwrap();
    m.extrude("plate", "base", 1.0).unwrap();
    let report = m.name_part("plate").unwrap();
    assert!(!report.is_clean());
    assert!(report.failures().is_empty());
}

#[test]
fn naming_against_a_shifted_sketch_is_incomplete() {
    let mut m = PartBuilder::new();
    m.rect_sketch("base", xy(), 0., 0., 4., 4.).unwrap();
    m.extrude_open("v1", "base", 1.0).unwrap();

    let mut shifted = m.part("v1").unwrap().sketch.clone();
    shifted.plane.origin = shifted.plane.origin + Vec3::new(0.5, 0.5, 0.0);
    let shell = m.shell("v1").unwrap();
    let report = topo_naming::SketchNamer::default().reconstruct_names(&mut m.store, &[shell], &shifted);

    assert!(!report.failures().is_empty());
    assert!(test_harness::assertions::assert_naming_complete(&report, "v1").is_err());
}

#[test]
fn sketch_json_round_trips() {
    let mut m = PartBuilder::new();
    m.circle_sketch("disc", xy(), 0., 0., 2.).unwrap();
    m.extrude("puck", "disc", 1.0).unwrap();
    let json = m.sketch_json("puck").unwrap();
    let back = topo_naming::SketchData::from_json(&json).unwrap();
    assert_eq!(back.faces[0].id, "disc");
    assert_eq!(back.curves.len(), 1);
}
