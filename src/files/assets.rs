//! Documents compiled into the binary.
//!
//! Root-relative paths such as `/MarkdownGuide.md` that do not exist on disk
//! resolve to these.

/// Path of the bundled markdown writing guide.
pub const GUIDE_PATH: &str = "/MarkdownGuide.md";

const BUNDLED: &[(&str, &str)] = &[(GUIDE_PATH, include_str!("../../assets/MarkdownGuide.md"))];

/// Content of a bundled document, looked up by its root-relative path.
pub fn bundled_document(path: &str) -> Option<&'static str> {
    BUNDLED
        .iter()
        .find(|(bundled, _)| *bundled == path)
        .map(|(_, content)| *content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guide_is_bundled() {
        let guide = bundled_document(GUIDE_PATH).unwrap();
        assert!(guide.starts_with("# "));
        assert!(!crate::editor::extract_toc(guide).is_empty());
    }

    #[test]
    fn test_unknown_asset() {
        assert!(bundled_document("/Nope.md").is_none());
        assert!(bundled_document("MarkdownGuide.md").is_none());
    }
}
