//! Rich assertion helpers with diagnostic output.
//!
//! Every failure includes expected vs actual and, where there is one, the
//! naming report or the region list for context.

use cad_kernel::geometry::point::Point2d;
use cad_kernel::topology::brep::{EntityStore, ShellId};
use region_graph::{RegionGraph, RegionId};
use topo_naming::NamingReport;

use crate::helpers::HarnessError;
use crate::oracle::OracleVerdict;

/// Assert exact topology counts (V, E, F) for a shell.
pub fn assert_topology_eq(
    store: &EntityStore,
    shell: ShellId,
    expected_v: usize,
    expected_e: usize,
    expected_f: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    let c = store.count_topology(shell);
    if c.vertices == expected_v && c.edges == expected_e && c.faces == expected_f {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] expected V={} E={} F={}, got {}",
                ctx, expected_v, expected_e, expected_f, c,
            ),
        })
    }
}

/// Assert a naming pass left nothing unnamed. Repeated tags are allowed.
pub fn assert_naming_complete(report: &NamingReport, ctx: &str) -> Result<(), HarnessError> {
    let failures = report.failures();
    if failures.is_empty() {
        return Ok(());
    }
    let lines: Vec<String> = failures.iter().map(|d| format!("  {}", d)).collect();
    Err(HarnessError::AssertionFailed {
        detail: format!("[{}] {} naming failures:\n{}", ctx, failures.len(), lines.join("\n")),
    })
}

/// Assert the shell carries exactly these face tags, in any order.
pub fn assert_face_tags(store: &EntityStore, shell: ShellId, expected: &[&str], ctx: &str) -> Result<(), HarnessError> {
    let mut actual: Vec<&str> = store
        .shell_faces(shell)
        .iter()
        .map(|&f| store.faces[f].tag.as_str())
        .collect();
    let mut expected = expected.to_vec();
    actual.sort_unstable();
    expected.sort_unstable();

    if actual == expected {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!("[{}] face tags: expected {:?}, got {:?}", ctx, expected, actual),
        })
    }
}

/// Assert the number of live regions.
pub fn assert_region_count(graph: &RegionGraph, expected: usize, ctx: &str) -> Result<(), HarnessError> {
    let actual = graph.regions.len();
    if actual == expected {
        Ok(())
    } else {
        let summary: Vec<String> = graph
            .regions
            .iter()
            .map(|(id, r)| format!("  {:?}: depth {} outer {} holes {}", id, r.depth, r.outer.len(), r.holes.len()))
            .collect();
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] expected {} regions, got {}:\n{}",
                ctx,
                expected,
                actual,
                summary.join("\n")
            ),
        })
    }
}

/// Assert a region's bounding box within tolerance.
pub fn assert_region_bounds(
    graph: &RegionGraph,
    region: RegionId,
    expected_min: Point2d,
    expected_max: Point2d,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let bb = graph.region_bounding_box(region)?;
    let checks = [
        ("min.x", bb.min.x, expected_min.x),
        ("min.y", bb.min.y, expected_min.y),
        ("max.x", bb.max.x, expected_max.x),
        ("max.y", bb.max.y, expected_max.y),
    ];
    for (label, actual, expected) in checks {
        if (actual - expected).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box {}: expected {:.4}, got {:.4} (tol={})",
                    ctx, label, expected, actual, tol,
                ),
            });
        }
    }
    Ok(())
}

/// Fail on the first oracle verdict that did not pass.
pub fn assert_oracles_pass(verdicts: &[OracleVerdict]) -> Result<(), HarnessError> {
    match verdicts.iter().find(|v| !v.passed) {
        None => Ok(()),
        Some(v) => Err(HarnessError::OracleFailure {
            oracle: v.oracle_name.clone(),
            detail: v.detail.clone(),
        }),
    }
}
