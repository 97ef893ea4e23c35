pub mod provenance;
pub mod roles;
pub mod tag;
pub mod topo;

pub use provenance::*;
pub use roles::*;
pub use tag::*;
pub use topo::*;
