//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics.
//! This lets a test collect all failures in one pass.

use std::collections::HashMap;

use serde::Serialize;

use cad_kernel::topology::brep::{EntityStore, ShellId};
use cad_kernel::Tolerance;
use region_graph::RegionGraph;
use topo_naming::lookup::is_path_closed;
use topo_types::compose_half_edge_tag;

/// The result of a single oracle check.
#[derive(Debug, Clone, Serialize)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: Some(value),
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: Some(value),
        }
    }
}

// ── Shell Oracles ───────────────────────────────────────────────────────────

/// Check the Euler-Poincaré formula V - E + F - R = 2 - 2g for a closed
/// shell of genus `g`, where R counts the inner loops of faces.
pub fn check_euler_formula(store: &EntityStore, shell: ShellId, genus: i64) -> OracleVerdict {
    let counts = store.count_topology(shell);
    let (v, e, f) = (counts.vertices as i64, counts.edges as i64, counts.faces as i64);
    let r: i64 = store
        .shell_faces(shell)
        .iter()
        .map(|&face| store.faces[face].inner_loops.len() as i64)
        .sum();
    let euler = v - e + f - r;
    let expected = 2 - 2 * genus;

    if euler == expected {
        OracleVerdict::pass_val(
            "euler_formula",
            format!("V({}) - E({}) + F({}) - R({}) = {}", v, e, f, r, expected),
            euler as f64,
        )
    } else {
        OracleVerdict::fail_val(
            "euler_formula",
            format!("V({}) - E({}) + F({}) - R({}) = {} (expected {})", v, e, f, r, euler, expected),
            euler as f64,
        )
    }
}

/// Check that every edge has exactly two half-edges, linked as twins.
pub fn check_manifold_edges(store: &EntityStore, shell: ShellId) -> OracleVerdict {
    let edges = store.shell_edges(shell);
    let mut non_manifold = Vec::new();

    for &edge in &edges {
        let hes = &store.edges[edge].half_edges;
        let twinned = hes.len() == 2
            && store.half_edges[hes[0]].twin == Some(hes[1])
            && store.half_edges[hes[1]].twin == Some(hes[0]);
        if !twinned {
            non_manifold.push((edge, hes.len()));
        }
    }

    if non_manifold.is_empty() {
        OracleVerdict::pass(
            "manifold_edges",
            format!("all {} edges have two twinned half-edges", edges.len()),
        )
    } else {
        OracleVerdict::fail(
            "manifold_edges",
            format!(
                "{} non-manifold edges: {:?}",
                non_manifold.len(),
                &non_manifold[..non_manifold.len().min(5)]
            ),
        )
    }
}

/// Check that every loop of every face forms a closed path.
pub fn check_loops_closed(store: &EntityStore, shell: ShellId, tol: &Tolerance) -> OracleVerdict {
    let mut open = Vec::new();
    let mut total = 0;
    for &face in store.shell_faces(shell) {
        for l in store.face_loops(face) {
            total += 1;
            if !is_path_closed(store, &store.loops[l].half_edges, tol) {
                open.push(l);
            }
        }
    }

    if open.is_empty() {
        OracleVerdict::pass("loops_closed", format!("all {} loops closed", total))
    } else {
        OracleVerdict::fail("loops_closed", format!("{} of {} loops open: {:?}", open.len(), total, open))
    }
}

// ── Naming Oracles ──────────────────────────────────────────────────────────

/// Check that every face and edge carries a tag and no tag repeats.
pub fn check_tags_unique(store: &EntityStore, shell: ShellId) -> OracleVerdict {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut untagged = 0;
    let faces = store.shell_faces(shell).iter().map(|&f| store.faces[f].tag.as_str());
    let edges = store.shell_edges(shell).into_iter().map(|e| store.edges[e].tag.as_str());
    for tag in faces.chain(edges) {
        if tag.is_empty() {
            untagged += 1;
        } else {
            *seen.entry(tag.to_string()).or_default() += 1;
        }
    }

    let mut repeated: Vec<&String> = seen.iter().filter(|(_, &n)| n > 1).map(|(t, _)| t).collect();
    repeated.sort();
    if untagged == 0 && repeated.is_empty() {
        OracleVerdict::pass_val("tags_unique", format!("{} distinct tags", seen.len()), seen.len() as f64)
    } else {
        OracleVerdict::fail(
            "tags_unique",
            format!("{} untagged, repeated: {:?}", untagged, repeated),
        )
    }
}

/// Check that each half-edge tag is its face's tag joined to its edge's tag.
pub fn check_half_edge_tags(store: &EntityStore, shell: ShellId) -> OracleVerdict {
    let mut mismatched = Vec::new();
    for &face in store.shell_faces(shell) {
        for he in store.face_half_edges(face) {
            let h = &store.half_edges[he];
            let expected = compose_half_edge_tag(&store.faces[face].tag, &store.edges[h.edge].tag);
            if h.tag != expected {
                mismatched.push((h.tag.clone(), expected));
            }
        }
    }

    if mismatched.is_empty() {
        OracleVerdict::pass("half_edge_tags", "all half-edge tags derive from face and edge".into())
    } else {
        OracleVerdict::fail(
            "half_edge_tags",
            format!(
                "{} mismatched (got, expected): {:?}",
                mismatched.len(),
                &mismatched[..mismatched.len().min(5)]
            ),
        )
    }
}

// ── Region Oracles ──────────────────────────────────────────────────────────

/// Check that every region's loops are closed.
pub fn check_region_loops_closed(graph: &RegionGraph) -> OracleVerdict {
    let open: Vec<_> = graph
        .regions
        .iter()
        .filter(|(_, r)| r.loops().any(|l| !graph.is_loop_closed(l)))
        .map(|(id, _)| id)
        .collect();

    if open.is_empty() {
        OracleVerdict::pass("region_loops_closed", format!("{} regions closed", graph.regions.len()))
    } else {
        OracleVerdict::fail("region_loops_closed", format!("open regions: {:?}", open))
    }
}

/// Check that region links are symmetric and point at live regions.
pub fn check_region_links(graph: &RegionGraph) -> OracleVerdict {
    let mut bad = Vec::new();
    for (id, region) in &graph.regions {
        for &other in &region.link {
            let back = graph.regions.get(other).is_some_and(|o| o.link.contains(&id));
            if !back {
                bad.push((id, other));
            }
        }
    }

    if bad.is_empty() {
        OracleVerdict::pass("region_links", "links symmetric".into())
    } else {
        OracleVerdict::fail("region_links", format!("{} one-way or dangling links: {:?}", bad.len(), bad))
    }
}

/// Check that every coedge in a region's loops points back at that region
/// and at a live edge.
pub fn check_coedge_ownership(graph: &RegionGraph) -> OracleVerdict {
    let mut bad = Vec::new();
    for (id, region) in &graph.regions {
        for c in region.coedges() {
            let owned = graph
                .coedges
                .get(c)
                .is_some_and(|co| co.region == id && graph.edges.contains_key(co.edge));
            if !owned {
                bad.push(c);
            }
        }
    }

    if bad.is_empty() {
        OracleVerdict::pass_val("coedge_ownership", "all coedges owned".into(), graph.coedges.len() as f64)
    } else {
        OracleVerdict::fail("coedge_ownership", format!("{} stray coedges: {:?}", bad.len(), bad))
    }
}

// ── Combined Checks ─────────────────────────────────────────────────────────

/// Run every structural shell check.
pub fn run_shell_checks(store: &EntityStore, shell: ShellId, genus: i64, tol: &Tolerance) -> Vec<OracleVerdict> {
    vec![
        check_euler_formula(store, shell, genus),
        check_manifold_edges(store, shell),
        check_loops_closed(store, shell, tol),
    ]
}

/// Run the checks a fully named shell must pass.
pub fn run_naming_checks(store: &EntityStore, shell: ShellId) -> Vec<OracleVerdict> {
    vec![check_tags_unique(store, shell), check_half_edge_tags(store, shell)]
}

/// Run every region graph check.
pub fn run_region_checks(graph: &RegionGraph) -> Vec<OracleVerdict> {
    vec![
        check_region_loops_closed(graph),
        check_region_links(graph),
        check_coedge_ownership(graph),
    ]
}
