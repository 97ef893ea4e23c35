pub mod curves;
pub mod point;
pub mod polygon;
pub mod projection;
pub mod transform;
pub mod vector;
