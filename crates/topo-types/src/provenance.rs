use serde::{Deserialize, Serialize};

use crate::roles::{EdgeRole, FaceRole, SketchType};

/// Sketch provenance recorded on a face after naming.
/// Field spellings follow the upstream document format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceProvenance {
    #[serde(rename = "sketchComId")]
    pub sketch_com_id: String,
    #[serde(rename = "sketchType")]
    pub sketch_type: SketchType,
    #[serde(rename = "faceType")]
    pub face_type: FaceRole,
}

/// Sketch provenance recorded on an edge after naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeProvenance {
    #[serde(rename = "sketchComId")]
    pub sketch_com_id: String,
    #[serde(rename = "sketchType")]
    pub sketch_type: SketchType,
    #[serde(rename = "edgeType")]
    pub edge_type: EdgeRole,
}

/// The `userData` payload attached to a named topology element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Provenance {
    Face(FaceProvenance),
    Edge(EdgeProvenance),
}

impl Provenance {
    pub fn bottom_face(sketch_face_id: impl Into<String>) -> Self {
        Provenance::Face(FaceProvenance {
            sketch_com_id: sketch_face_id.into(),
            sketch_type: SketchType::Face,
            face_type: FaceRole::BottomFace,
        })
    }

    pub fn side_face(sketch_curve_id: impl Into<String>) -> Self {
        Provenance::Face(FaceProvenance {
            sketch_com_id: sketch_curve_id.into(),
            sketch_type: SketchType::Curve,
            face_type: FaceRole::SideFace,
        })
    }

    pub fn curve_edge(sketch_curve_id: impl Into<String>) -> Self {
        Provenance::Edge(EdgeProvenance {
            sketch_com_id: sketch_curve_id.into(),
            sketch_type: SketchType::Curve,
            edge_type: EdgeRole::Edge,
        })
    }

    pub fn point_edge(sketch_point_id: impl Into<String>) -> Self {
        Provenance::Edge(EdgeProvenance {
            sketch_com_id: sketch_point_id.into(),
            sketch_type: SketchType::Point,
            edge_type: EdgeRole::Edge,
        })
    }

    /// Id of the sketch entity this element was derived from.
    pub fn sketch_com_id(&self) -> &str {
        match self {
            Provenance::Face(p) => &p.sketch_com_id,
            Provenance::Edge(p) => &p.sketch_com_id,
        }
    }

    pub fn sketch_type(&self) -> SketchType {
        match self {
            Provenance::Face(p) => p.sketch_type,
            Provenance::Edge(p) => p.sketch_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_provenance_wire_format() {
        let p = Provenance::bottom_face("F1");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["sketchComId"], "F1");
        assert_eq!(json["sketchType"], "face");
        assert_eq!(json["faceType"], "bottomface");
    }

    #[test]
    fn test_edge_provenance_deserializes_as_edge() {
        let json = r#"{"sketchComId":"P3","sketchType":"point","edgeType":"edge"}"#;
        let p: Provenance = serde_json::from_str(json).unwrap();
        assert_eq!(p, Provenance::point_edge("P3"));
        assert_eq!(p.sketch_type(), SketchType::Point);
    }

    #[test]
    fn test_side_face_roundtrip_keeps_role() {
        let p = Provenance::side_face("C7");
        let back: Provenance = serde_json::from_str(&serde_json::to_string(&p).unwrap()).unwrap();
        match back {
            Provenance::Face(face) => assert_eq!(face.face_type, FaceRole::SideFace),
            Provenance::Edge(_) => panic!("face provenance decoded as edge"),
        }
    }
}
