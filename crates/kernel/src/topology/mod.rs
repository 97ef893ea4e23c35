pub mod brep;
pub mod builders;
