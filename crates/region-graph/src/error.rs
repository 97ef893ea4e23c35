use crate::graph::RegionId;

/// Errors from region graph maintenance.
///
/// These indicate malformed input from the upstream kernel; an operation
/// that returns one has left the graph unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegionError {
    #[error("region graph invariant violated: {reason}")]
    InvariantViolation { reason: String },

    #[error("unknown region {0:?}")]
    UnknownRegion(RegionId),

    #[error("cannot merge region {0:?} with itself")]
    NotDistinct(RegionId),
}

impl RegionError {
    pub(crate) fn invariant(reason: impl Into<String>) -> Self {
        RegionError::InvariantViolation {
            reason: reason.into(),
        }
    }
}
