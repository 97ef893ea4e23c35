use serde::{Deserialize, Serialize};

/// Which kind of sketch entity a B-Rep element was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SketchType {
    /// A closed sketch region (bottom/top cap of an extrusion).
    Face,
    /// A sketch curve (side face of an extrusion, or a profile edge).
    Curve,
    /// A sketch point (vertical edge of an extrusion).
    Point,
}

/// Semantic role of a named face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceRole {
    /// A cap face whose projection onto the sketch plane is a sketch face.
    BottomFace,
    /// A lateral face swept from a single sketch curve.
    SideFace,
}

/// Semantic role of a named edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeRole {
    Edge,
}
