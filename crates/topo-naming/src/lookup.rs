//! Resolving tags back to topology.

use cad_kernel::topology::brep::{EntityStore, FaceId, HalfEdgeId, ShellId};
use cad_kernel::Tolerance;
use topo_types::{is_composite, tag_suffix};

/// Faces of a shell carrying exactly `tag`, in shell order.
pub fn faces_tagged(store: &EntityStore, shell: ShellId, tag: &str) -> Vec<FaceId> {
    store
        .shell_faces(shell)
        .iter()
        .copied()
        .filter(|&f| store.faces[f].tag == tag)
        .collect()
}

/// Half-edges of a shell carrying exactly `tag`, scanning every loop of
/// every face.
pub fn half_edges_tagged(store: &EntityStore, shell: ShellId, tag: &str) -> Vec<HalfEdgeId> {
    store
        .shell_half_edges(shell)
        .into_iter()
        .filter(|&he| store.half_edges[he].tag == tag)
        .collect()
}

pub fn face_by_tag(store: &EntityStore, shells: &[ShellId], tag: &str) -> Option<FaceId> {
    shells
        .iter()
        .find_map(|&s| faces_tagged(store, s, tag).first().copied())
}

pub fn half_edge_by_tag(store: &EntityStore, shells: &[ShellId], tag: &str) -> Option<HalfEdgeId> {
    shells
        .iter()
        .find_map(|&s| half_edges_tagged(store, s, tag).first().copied())
}

/// The half-edges of the loop of `face` that holds any of `tags`.
///
/// With no tags this is the outer loop. When several loops hold a requested
/// tag the last one wins. If nothing matches and the first tag is composite,
/// the lookup is retried on tag suffixes, which keep the sketch component id
/// when the owning face was renamed.
pub fn loop_by_tags<S: AsRef<str>>(store: &EntityStore, face: FaceId, tags: &[S]) -> Vec<HalfEdgeId> {
    let loops = store.face_loops(face);
    let Some(first) = tags.first() else {
        return store.loops[loops[0]].half_edges.clone();
    };

    let find = |matches: &dyn Fn(&str) -> bool| {
        loops
            .iter()
            .rev()
            .find(|&&l| {
                store.loops[l]
                    .half_edges
                    .iter()
                    .any(|&he| matches(&store.half_edges[he].tag))
            })
            .map(|&l| store.loops[l].half_edges.clone())
    };

    if let Some(found) = find(&|t| tags.iter().any(|q| q.as_ref() == t)) {
        return found;
    }
    if is_composite(first.as_ref()) {
        let suffixes: Vec<&str> = tags.iter().map(|t| tag_suffix(t.as_ref())).collect();
        if let Some(found) = find(&|t| !t.is_empty() && suffixes.iter().any(|s| *s == tag_suffix(t))) {
            return found;
        }
    }
    Vec::new()
}

/// Whether consecutive half-edges share an endpoint, wrapping around at the
/// end. A single closed curve counts as a closed path.
pub fn is_path_closed(store: &EntityStore, half_edges: &[HalfEdgeId], tol: &Tolerance) -> bool {
    let curves: Vec<_> = half_edges.iter().map(|&he| store.half_edge_curve(he)).collect();
    match curves.as_slice() {
        [] => false,
        [only] => tol.points_coincident(&only.start_point(), &only.end_point()),
        _ => (0..curves.len()).all(|i| {
            let a = &curves[i];
            let b = &curves[(i + 1) % curves.len()];
            [a.start_point(), a.end_point()].iter().any(|p| {
                tol.points_coincident(p, &b.start_point()) || tol.points_coincident(p, &b.end_point())
            })
        }),
    }
}
