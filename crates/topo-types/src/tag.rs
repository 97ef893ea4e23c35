//! Tag composition.
//!
//! Tags are plain strings. Composite tags join their parts with `|`, so the
//! last segment of an edge or half-edge tag is always the id of the sketch
//! entity it was derived from.

/// Separator between the parts of a composite tag.
pub const TAG_SEPARATOR: char = '|';

/// Build an edge tag from the tags of its adjacent faces and the id of the
/// matched sketch point or curve.
///
/// Face tags are sorted byte-wise before joining, so the result does not
/// depend on the order the kernel reports adjacent faces in.
pub fn compose_edge_tag<S: AsRef<str>>(face_tags: &[S], component_id: &str) -> String {
    let mut sorted: Vec<&str> = face_tags.iter().map(|t| t.as_ref()).collect();
    sorted.sort_unstable();

    let mut tag = String::new();
    for face_tag in sorted {
        tag.push_str(face_tag);
        tag.push(TAG_SEPARATOR);
    }
    tag.push_str(component_id);
    tag
}

/// Build a half-edge tag from its owning face's tag and its edge's tag.
pub fn compose_half_edge_tag(face_tag: &str, edge_tag: &str) -> String {
    format!("{face_tag}{TAG_SEPARATOR}{edge_tag}")
}

/// Final `|`-separated segment of a tag (the whole tag if it has no separator).
pub fn tag_suffix(tag: &str) -> &str {
    tag.rsplit(TAG_SEPARATOR).next().unwrap_or(tag)
}

/// Whether a tag is composed of several parts.
pub fn is_composite(tag: &str) -> bool {
    tag.contains(TAG_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_tag_single_face() {
        assert_eq!(compose_edge_tag(&["F1"], "C2"), "F1|C2");
    }

    #[test]
    fn test_edge_tag_is_order_independent() {
        let a = compose_edge_tag(&["side-b", "side-a"], "P1");
        let b = compose_edge_tag(&["side-a", "side-b"], "P1");
        assert_eq!(a, b);
        assert_eq!(a, "side-a|side-b|P1");
    }

    #[test]
    fn test_edge_tag_many_faces() {
        let tag = compose_edge_tag(&["c".to_string(), "a".to_string(), "b".to_string()], "X");
        assert_eq!(tag, "a|b|c|X");
    }

    #[test]
    fn test_edge_tag_without_faces() {
        assert_eq!(compose_edge_tag::<&str>(&[], "C9"), "C9");
    }

    #[test]
    fn test_half_edge_tag_and_suffix() {
        let tag = compose_half_edge_tag("F1", "F1|S2|C3");
        assert_eq!(tag, "F1|F1|S2|C3");
        assert_eq!(tag_suffix(&tag), "C3");
        assert!(is_composite(&tag));
        assert_eq!(tag_suffix("plain"), "plain");
        assert!(!is_composite("plain"));
    }
}
