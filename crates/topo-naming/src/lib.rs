//! Topological naming: stable tags for regenerated B-Rep shells.
//!
//! [`SketchNamer`] derives face, edge and half-edge tags from the sketch a
//! shell was built from. [`BrepMatcher`] carries tagged elements across two
//! regenerations of the same shell that differ by a translation.

pub mod error;
pub mod lookup;
pub mod matcher;
pub mod namer;
pub mod sketch;

pub use error::NamingError;
pub use matcher::{BrepMatcher, ShellRef};
pub use namer::{NamingDiagnostic, NamingReport, SketchNamer};
pub use sketch::{SketchCurve, SketchData, SketchFace, SketchPoint};
