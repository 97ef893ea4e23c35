//! Test harness for topological naming scenarios.
//!
//! Provides programmatic tools for scripting sketch, extrude, name and match
//! sequences, verifying the resulting shells and region graphs at every
//! step, and generating diagnostic output.
//!
//! # Key Components
//!
//! - [`PartBuilder`]: Fluent API for building, naming and matching parts
//! - [`oracle`]: Verification functions returning pass/fail verdicts
//! - [`report`]: Structured text part descriptions
//! - [`helpers`]: Profile builders, sketch constructors, region fixtures
//! - [`assertions`]: Rich assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
pub mod oracle;
pub mod report;
pub mod workflow;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use report::PartReport;
pub use workflow::PartBuilder;
