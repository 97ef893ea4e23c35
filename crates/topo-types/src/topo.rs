use serde::{Deserialize, Serialize};

/// The kind of topological entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TopoKind {
    Vertex,
    Edge,
    HalfEdge,
    Face,
    Shell,
    Region,
}

impl std::fmt::Display for TopoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TopoKind::Vertex => "vertex",
            TopoKind::Edge => "edge",
            TopoKind::HalfEdge => "half-edge",
            TopoKind::Face => "face",
            TopoKind::Shell => "shell",
            TopoKind::Region => "region",
        };
        f.write_str(name)
    }
}

/// Entity counts of one shell. Two shells are only compared element-wise
/// when their counts agree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopoCounts {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
}

impl TopoCounts {
    pub fn new(vertices: usize, edges: usize, faces: usize) -> Self {
        Self {
            vertices,
            edges,
            faces,
        }
    }
}

impl std::fmt::Display for TopoCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "V={} E={} F={}", self.vertices, self.edges, self.faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_display() {
        assert_eq!(TopoCounts::new(8, 12, 6).to_string(), "V=8 E=12 F=6");
    }
}
