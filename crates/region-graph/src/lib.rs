//! Planar region graph: nested regions bounded by coedge loops, with
//! provenance tracking and the dual-region merge used to keep the
//! subdivision consistent after edits.

pub mod error;
pub mod graph;
pub mod merge;
pub mod provenance;
pub mod simplify;
pub mod traversal;

pub use error::RegionError;
pub use graph::{
    Coedge, CoedgeId, Edge, EdgeId, LoopRole, Region, RegionGraph, RegionId, VertexId,
    EXTERIOR_DEPTH,
};
pub use merge::SharedEdge;
pub use provenance::PriorCoedge;
