//! Capability traits through which naming code reads and writes
//! identifiers on topology it does not own.
//!
//! Keeping the surface this small lets the naming engine be tested
//! against lightweight fakes as well as the full `EntityStore`.

use topo_types::Provenance;

use crate::topology::brep::{Edge, Face, HalfEdge};

/// An element carrying a stable string name.
pub trait Tagged {
    fn tag(&self) -> &str;

    fn set_tag(&mut self, tag: String);

    fn is_tagged(&self) -> bool {
        !self.tag().is_empty()
    }
}

/// An element carrying sketch provenance alongside its tag.
pub trait Annotated: Tagged {
    fn provenance(&self) -> Option<&Provenance>;

    fn set_provenance(&mut self, provenance: Provenance);
}

impl Tagged for Face {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn set_tag(&mut self, tag: String) {
        self.tag = tag;
    }
}

impl Annotated for Face {
    fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    fn set_provenance(&mut self, provenance: Provenance) {
        self.provenance = Some(provenance);
    }
}

impl Tagged for Edge {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn set_tag(&mut self, tag: String) {
        self.tag = tag;
    }
}

impl Annotated for Edge {
    fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    fn set_provenance(&mut self, provenance: Provenance) {
        self.provenance = Some(provenance);
    }
}

impl Tagged for HalfEdge {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn set_tag(&mut self, tag: String) {
        self.tag = tag;
    }
}

/// Write a tag and its provenance together.
pub fn annotate<T: Annotated>(element: &mut T, tag: String, provenance: Provenance) {
    element.set_tag(tag);
    element.set_provenance(provenance);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::Point3d;
    use crate::topology::brep::EntityStore;
    use crate::topology::builders::make_box;

    #[test]
    fn test_face_annotation() {
        let mut store = EntityStore::new();
        let shell = make_box(&mut store, Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0));
        let face = store.shell_faces(shell)[0];
        assert!(!store.faces[face].is_tagged());

        annotate(&mut store.faces[face], "f1".into(), Provenance::bottom_face("f1"));
        assert_eq!(store.faces[face].tag(), "f1");
        assert_eq!(store.faces[face].provenance().unwrap().sketch_com_id(), "f1");
    }

    #[test]
    fn test_half_edge_tag() {
        let mut store = EntityStore::new();
        let shell = make_box(&mut store, Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0));
        let he = store.shell_half_edges(shell)[0];
        store.half_edges[he].set_tag("f1|e1".into());
        assert!(store.half_edges[he].is_tagged());
    }
}
