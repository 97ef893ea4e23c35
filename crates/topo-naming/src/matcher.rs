//! Face and half-edge correspondence between two regenerations of a shell.

use tracing::{debug, instrument};

use cad_kernel::geometry::point::Point3d;
use cad_kernel::geometry::transform::{BoundingBox, Transform};
use cad_kernel::topology::brep::{EntityStore, FaceId, HalfEdgeId, ShellId};
use cad_kernel::Tolerance;
use topo_types::{TopoCounts, TopoKind};

use crate::error::NamingError;
use crate::lookup::{faces_tagged, half_edges_tagged};

/// A shell inside a store.
#[derive(Debug, Clone, Copy)]
pub struct ShellRef<'a> {
    pub store: &'a EntityStore,
    pub shell: ShellId,
}

impl<'a> ShellRef<'a> {
    pub fn new(store: &'a EntityStore, shell: ShellId) -> Self {
        Self { store, shell }
    }

    pub fn counts(&self) -> TopoCounts {
        self.store.count_topology(self.shell)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.store.shell_bounding_box(self.shell)
    }
}

/// Matches tagged elements of a source shell to a target shell that has the
/// same topology and differs only by a translation.
#[derive(Debug, Clone, Default)]
pub struct BrepMatcher {
    pub tol: Tolerance,
}

impl BrepMatcher {
    pub fn new(tol: Tolerance) -> Self {
        Self { tol }
    }

    /// Translation carrying `source` onto `target`, measured between their
    /// bounding-box centers. Fails when the shells' topology counts differ.
    pub fn correspondence(&self, source: ShellRef<'_>, target: ShellRef<'_>) -> Result<Transform, NamingError> {
        let source_counts = source.counts();
        let target_counts = target.counts();
        if source_counts != target_counts {
            return Err(NamingError::TopologyMismatch {
                source_counts,
                target_counts,
            });
        }
        Ok(Transform::between_centers(&source.bounding_box(), &target.bounding_box()))
    }

    /// Find the target face corresponding to the source face tagged `face_tag`.
    #[instrument(skip(self, source, target))]
    pub fn match_face(&self, source: ShellRef<'_>, face_tag: &str, target: ShellRef<'_>) -> Result<FaceId, NamingError> {
        let xf = self.correspondence(source, target)?;
        let face = unique(TopoKind::Face, face_tag, faces_tagged(source.store, source.shell, face_tag))?;
        self.find_face(&xf, source, face, target)
    }

    pub fn match_face_id(&self, source: ShellRef<'_>, face: FaceId, target: ShellRef<'_>) -> Result<FaceId, NamingError> {
        let xf = self.correspondence(source, target)?;
        self.find_face(&xf, source, face, target)
    }

    /// Match a batch of half-edge tags. Either every tag resolves or the
    /// whole call fails.
    #[instrument(skip_all, fields(tags = coedge_tags.len()))]
    pub fn match_coedge_path<S: AsRef<str>>(
        &self,
        source: ShellRef<'_>,
        coedge_tags: &[S],
        target: ShellRef<'_>,
    ) -> Result<Vec<HalfEdgeId>, NamingError> {
        let xf = self.correspondence(source, target)?;
        let path = coedge_tags
            .iter()
            .map(|tag| self.find_half_edge(&xf, source, tag.as_ref(), target))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(matched = path.len(), "coedge path matched");
        Ok(path)
    }

    fn find_face(
        &self,
        xf: &Transform,
        source: ShellRef<'_>,
        face: FaceId,
        target: ShellRef<'_>,
    ) -> Result<FaceId, NamingError> {
        let (center, normal) = source.store.face_center_normal(face);
        let center = xf.transform_point(&center);
        let normal = normal.map(|n| xf.transform_vector(&n));
        let points: Vec<Point3d> = source
            .store
            .face_points(face)
            .iter()
            .map(|p| xf.transform_point(p))
            .collect();

        target
            .store
            .shell_faces(target.shell)
            .iter()
            .copied()
            .find(|&candidate| {
                let (c, n) = target.store.face_center_normal(candidate);
                let normals_agree = match (normal, n) {
                    (Some(a), Some(b)) => self.tol.directions_equal(&a, &b),
                    (None, None) => true,
                    _ => false,
                };
                if !normals_agree || !self.tol.points_coincident(&center, &c) {
                    return false;
                }
                let theirs = target.store.face_points(candidate);
                points
                    .iter()
                    .all(|p| theirs.iter().any(|q| self.tol.points_coincident(p, q)))
            })
            .ok_or_else(|| {
                let key = match source.store.faces[face].tag.as_str() {
                    "" => format!("{face:?}"),
                    tag => tag.to_string(),
                };
                NamingError::not_found(TopoKind::Face, key)
            })
    }

    fn find_half_edge(
        &self,
        xf: &Transform,
        source: ShellRef<'_>,
        tag: &str,
        target: ShellRef<'_>,
    ) -> Result<HalfEdgeId, NamingError> {
        let he = unique(TopoKind::HalfEdge, tag, half_edges_tagged(source.store, source.shell, tag))?;
        let face = self.find_face(xf, source, source.store.half_edges[he].face, target)?;

        let curve = xf.transform_curve(&source.store.half_edge_curve(he));
        let candidates: Vec<HalfEdgeId> = target
            .store
            .face_half_edges(face)
            .into_iter()
            .filter(|&c| target.store.half_edge_curve(c).geometrically_equals(&curve, &self.tol))
            .collect();

        // a seam edge appears twice in one face; keep the same orientation
        candidates
            .iter()
            .copied()
            .find(|&c| {
                self.tol
                    .points_coincident(&target.store.half_edge_curve(c).start_point(), &curve.start_point())
            })
            .or_else(|| candidates.first().copied())
            .ok_or_else(|| NamingError::not_found(TopoKind::HalfEdge, tag))
    }
}

fn unique<K: Copy>(kind: TopoKind, tag: &str, found: Vec<K>) -> Result<K, NamingError> {
    match found.as_slice() {
        [] => Err(NamingError::not_found(kind, tag)),
        [one] => Ok(*one),
        many => Err(NamingError::AmbiguousTag {
            kind,
            tag: tag.to_string(),
            count: many.len(),
        }),
    }
}
