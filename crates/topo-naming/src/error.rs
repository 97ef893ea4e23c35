use cad_kernel::geometry::projection::ProjectionError;
use topo_types::{TopoCounts, TopoKind};

/// Errors from matching and naming topology.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NamingError {
    #[error("shell topology differs: source has {source_counts}, target has {target_counts}")]
    TopologyMismatch {
        source_counts: TopoCounts,
        target_counts: TopoCounts,
    },

    #[error("no {kind} matches {key}")]
    MatchNotFound { kind: TopoKind, key: String },

    #[error("tag `{tag}` names {count} elements of kind {kind}, expected one")]
    AmbiguousTag {
        kind: TopoKind,
        tag: String,
        count: usize,
    },

    #[error("projection failed: {reason}")]
    ProjectionFailed { reason: String },

    #[error("{kind} tag `{tag}` was already assigned in this pass")]
    DuplicateTag { kind: TopoKind, tag: String },

    #[error("malformed sketch document: {0}")]
    SketchParse(String),
}

impl From<ProjectionError> for NamingError {
    fn from(e: ProjectionError) -> Self {
        NamingError::ProjectionFailed {
            reason: e.to_string(),
        }
    }
}

impl NamingError {
    pub(crate) fn not_found(kind: TopoKind, key: impl Into<String>) -> Self {
        NamingError::MatchNotFound {
            kind,
            key: key.into(),
        }
    }
}
