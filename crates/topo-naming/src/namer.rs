//! Deriving tags for a shell from the sketch it was extruded from.
//!
//! Naming runs in three passes. Faces are projected onto the sketch plane
//! and matched to sketch faces (caps) or sketch curves (sides). Edges are
//! projected and matched to sketch curves, or to sketch points when they
//! collapse onto one; their tag joins the sorted tags of the faces they
//! border with the matched sketch id. Half-edges finally take their face's
//! tag followed by their edge's tag.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info, instrument, warn};

use cad_kernel::geometry::curves::Curve2d;
use cad_kernel::geometry::polygon::{classify_point, loop_bounding_box, loop_signed_area};
use cad_kernel::topology::brep::{EdgeId, EntityStore, FaceId, ShellId};
use cad_kernel::traits::{annotate, Annotated, Tagged};
use cad_kernel::Tolerance;
use topo_types::{compose_edge_tag, compose_half_edge_tag, Provenance, TopoKind};

use crate::error::NamingError;
use crate::sketch::{SketchData, SketchFace};

/// One problem met while naming. Naming carries on past every diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct NamingDiagnostic {
    pub kind: TopoKind,
    /// The element's tag before naming, or its arena key when untagged.
    pub key: String,
    pub error: NamingError,
}

impl fmt::Display for NamingDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.key, self.error)
    }
}

/// Outcome of a naming pass.
#[derive(Debug, Clone, Default)]
pub struct NamingReport {
    pub faces_named: usize,
    pub edges_named: usize,
    pub half_edges_named: usize,
    pub diagnostics: Vec<NamingDiagnostic>,
}

impl NamingReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics other than repeated tags: elements that were left unnamed
    /// or named from a guess.
    pub fn failures(&self) -> Vec<&NamingDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| !matches!(d.error, NamingError::DuplicateTag { .. }))
            .collect()
    }

    fn record(&mut self, kind: TopoKind, key: String, error: NamingError) {
        warn!(%kind, %key, %error, "naming diagnostic");
        self.diagnostics.push(NamingDiagnostic { kind, key, error });
    }
}

/// Tags handed out during one pass, per element kind.
#[derive(Default)]
struct Assigned(HashSet<(TopoKind, String)>);

impl Assigned {
    /// Record `tag`; false if it was already handed out.
    fn claim(&mut self, kind: TopoKind, tag: &str) -> bool {
        self.0.insert((kind, tag.to_string()))
    }
}

/// Assigns sketch-derived tags to the faces, edges and half-edges of shells.
#[derive(Debug, Clone, Default)]
pub struct SketchNamer {
    pub tol: Tolerance,
}

impl SketchNamer {
    pub fn new(tol: Tolerance) -> Self {
        Self { tol }
    }

    /// Rename every face, edge and half-edge of `shells` from `sketch`.
    ///
    /// Running this twice over an unchanged store gives the same tags.
    #[instrument(skip_all, fields(shells = shells.len()))]
    pub fn reconstruct_names(&self, store: &mut EntityStore, shells: &[ShellId], sketch: &SketchData) -> NamingReport {
        let mut report = NamingReport::default();
        let mut assigned = Assigned::default();

        for &shell in shells {
            self.name_faces(store, shell, sketch, &mut assigned, &mut report);
        }
        for &shell in shells {
            self.name_edges(store, shell, sketch, &mut assigned, &mut report);
        }
        for &shell in shells {
            name_half_edges(store, shell, &mut report);
        }

        info!(
            faces = report.faces_named,
            edges = report.edges_named,
            half_edges = report.half_edges_named,
            diagnostics = report.diagnostics.len(),
            "names reconstructed"
        );
        report
    }

    // ─── Faces ───────────────────────────────────────────────────────────

    fn name_faces(
        &self,
        store: &mut EntityStore,
        shell: ShellId,
        sketch: &SketchData,
        assigned: &mut Assigned,
        report: &mut NamingReport,
    ) {
        for face in store.shell_faces(shell).to_vec() {
            let key = element_key(&store.faces[face].tag, face);
            match self.name_face(store, face, sketch, &key, report) {
                Ok((tag, provenance)) => {
                    if !assigned.claim(TopoKind::Face, &tag) {
                        let error = NamingError::DuplicateTag {
                            kind: TopoKind::Face,
                            tag: tag.clone(),
                        };
                        report.record(TopoKind::Face, key, error);
                    }
                    annotate(&mut store.faces[face], tag, provenance);
                    report.faces_named += 1;
                }
                Err(error) => report.record(TopoKind::Face, key, error),
            }
        }
    }

    fn name_face(
        &self,
        store: &EntityStore,
        face: FaceId,
        sketch: &SketchData,
        key: &str,
        report: &mut NamingReport,
    ) -> Result<(String, Provenance), NamingError> {
        let outer = store.faces[face].outer_loop;
        let curves = store.loops[outer]
            .half_edges
            .iter()
            .map(|&he| sketch.plane.project_curve(&store.half_edge_curve(he), &self.tol))
            .collect::<Result<Vec<Curve2d>, _>>()?;

        if loop_signed_area(&curves).abs() > self.tol.coincidence * self.tol.coincidence {
            let matched = self
                .match_sketch_face(&curves, sketch)
                .ok_or_else(|| NamingError::not_found(TopoKind::Face, key))?;
            return Ok((matched.id.clone(), Provenance::bottom_face(&matched.id)));
        }

        // The face stands on the sketch plane: its boundary collapses onto
        // the single sketch curve it was swept from.
        let mut distinct: Vec<Curve2d> = Vec::new();
        for curve in curves.iter().filter(|c| !c.is_degenerate(&self.tol)) {
            if !distinct.iter().any(|d| d.geometrically_equals(curve, &self.tol)) {
                distinct.push(*curve);
            }
        }
        let curve = match distinct.as_slice() {
            [] => {
                return Err(NamingError::ProjectionFailed {
                    reason: "face projects onto a point".into(),
                })
            }
            [only] => *only,
            [first, ..] => {
                let error = NamingError::ProjectionFailed {
                    reason: format!("face projects onto {} distinct curves", distinct.len()),
                };
                report.record(TopoKind::Face, key.to_string(), error);
                *first
            }
        };
        let matched = sketch
            .all_curves()
            .iter()
            .find(|c| c.curve.geometrically_equals(&curve, &self.tol))
            .ok_or_else(|| NamingError::not_found(TopoKind::Face, key))?;
        Ok((matched.id.clone(), Provenance::side_face(&matched.id)))
    }

    /// First sketch face centered on the projected loop whose outer boundary
    /// lies entirely on it.
    fn match_sketch_face<'s>(&self, curves: &[Curve2d], sketch: &'s SketchData) -> Option<&'s SketchFace> {
        let center = loop_bounding_box(curves).center();
        sketch
            .faces
            .iter()
            .filter(|f| f.bounding().center().distance_to(&center) <= self.tol.face_center)
            .find(|f| {
                f.boundary_test_points()
                    .iter()
                    .all(|p| classify_point(p, curves, &self.tol).is_on_boundary())
            })
    }

    // ─── Edges ───────────────────────────────────────────────────────────

    fn name_edges(
        &self,
        store: &mut EntityStore,
        shell: ShellId,
        sketch: &SketchData,
        assigned: &mut Assigned,
        report: &mut NamingReport,
    ) {
        for edge in store.shell_edges(shell) {
            let key = element_key(&store.edges[edge].tag, edge);
            match self.name_edge(store, edge, sketch, &key) {
                Ok((tag, provenance)) => {
                    if !assigned.claim(TopoKind::Edge, &tag) {
                        let error = NamingError::DuplicateTag {
                            kind: TopoKind::Edge,
                            tag: tag.clone(),
                        };
                        report.record(TopoKind::Edge, key, error);
                    }
                    let previous = store.replace_edge_tag(edge, tag);
                    if !previous.is_empty() && previous != store.edges[edge].tag {
                        debug!(%previous, tag = %store.edges[edge].tag, "edge renamed");
                    }
                    store.edges[edge].set_provenance(provenance);
                    report.edges_named += 1;
                }
                Err(error) => report.record(TopoKind::Edge, key, error),
            }
        }
    }

    fn name_edge(
        &self,
        store: &EntityStore,
        edge: EdgeId,
        sketch: &SketchData,
        key: &str,
    ) -> Result<(String, Provenance), NamingError> {
        let projected = sketch.plane.project_curve(&store.edges[edge].curve, &self.tol)?;

        let (id, provenance) = match projected {
            Curve2d::Line(l) if self.tol.points_coincident_2d(&l.start, &l.end) => {
                let point = sketch
                    .all_points()
                    .iter()
                    .find(|p| self.tol.points_coincident_2d(&p.position, &l.start))
                    .ok_or_else(|| NamingError::not_found(TopoKind::Edge, key))?;
                (point.id.as_str(), Provenance::point_edge(&point.id))
            }
            curve => {
                let matched = sketch
                    .all_curves()
                    .iter()
                    .find(|c| c.curve.geometrically_equals(&curve, &self.tol))
                    .ok_or_else(|| NamingError::not_found(TopoKind::Edge, key))?;
                (matched.id.as_str(), Provenance::curve_edge(&matched.id))
            }
        };

        let face_tags: Vec<&str> = store
            .edge_faces(edge)
            .into_iter()
            .map(|f| store.faces[f].tag.as_str())
            .filter(|t| !t.is_empty())
            .collect();
        Ok((compose_edge_tag(&face_tags, id), provenance))
    }
}

// ─── Half-edges ──────────────────────────────────────────────────────────

fn name_half_edges(store: &mut EntityStore, shell: ShellId, report: &mut NamingReport) {
    for face in store.shell_faces(shell).to_vec() {
        for he in store.face_half_edges(face) {
            let face_tag = &store.faces[face].tag;
            let edge_tag = &store.edges[store.half_edges[he].edge].tag;
            if face_tag.is_empty() || edge_tag.is_empty() {
                continue;
            }
            let tag = compose_half_edge_tag(face_tag, edge_tag);
            store.half_edges[he].set_tag(tag);
            report.half_edges_named += 1;
        }
    }
}

fn element_key(tag: &str, id: impl fmt::Debug) -> String {
    if tag.is_empty() {
        format!("{id:?}")
    } else {
        tag.to_string()
    }
}
