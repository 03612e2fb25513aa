//! Link dispatch for the preview
//!
//! A clicked href resolves to one of three actions: jump to a heading in the
//! current document, open an external URL, or load another markdown/text
//! document. Anything else is ignored.

use std::path::PathBuf;

/// What to do with a clicked link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Scroll the preview to the heading with this anchor id
    ScrollToAnchor(String),
    /// Hand the URL to the system browser
    OpenExternal(String),
    /// Replace the buffer with this document
    LoadDocument(PathBuf),
}

/// Resolve `href` against the path of the current document.
///
/// Rules, first match wins:
/// 1. `#fragment` scrolls to the anchor.
/// 2. `http…` opens externally.
/// 3. `….md` / `….txt` loads the document. Relative hrefs are joined onto
///    the directory part of `current_path` (up to its last `/` or `\`);
///    hrefs starting with `/` or containing a `:` are used as-is.
pub fn resolve_link(href: &str, current_path: Option<&str>) -> Option<LinkAction> {
    if let Some(fragment) = href.strip_prefix('#') {
        return Some(LinkAction::ScrollToAnchor(fragment.to_string()));
    }

    if href.starts_with("http") {
        return Some(LinkAction::OpenExternal(href.to_string()));
    }

    if href.ends_with(".md") || href.ends_with(".txt") {
        let target = match current_path {
            Some(current) if !href.starts_with('/') && !href.contains(':') => {
                format!("{}{}", directory_prefix(current), href)
            }
            _ => href.to_string(),
        };
        return Some(LinkAction::LoadDocument(PathBuf::from(target)));
    }

    None
}

/// `current` up to and including its last path separator, or empty.
fn directory_prefix(current: &str) -> &str {
    match current.rfind(['/', '\\']) {
        Some(idx) => &current[..=idx],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor() {
        assert_eq!(
            resolve_link("#section-1", None),
            Some(LinkAction::ScrollToAnchor("section-1".to_string()))
        );
        assert_eq!(
            resolve_link("#section-1", Some("/docs/a.md")),
            Some(LinkAction::ScrollToAnchor("section-1".to_string()))
        );
    }

    #[test]
    fn test_external() {
        assert_eq!(
            resolve_link("https://example.com", None),
            Some(LinkAction::OpenExternal("https://example.com".to_string()))
        );
        // External wins even for markdown URLs
        assert_eq!(
            resolve_link("http://example.com/readme.md", Some("/docs/index.md")),
            Some(LinkAction::OpenExternal(
                "http://example.com/readme.md".to_string()
            ))
        );
    }

    #[test]
    fn test_relative_document() {
        assert_eq!(
            resolve_link("sub/page.md", Some("/docs/index.md")),
            Some(LinkAction::LoadDocument(PathBuf::from("/docs/sub/page.md")))
        );
    }

    #[test]
    fn test_windows_separator() {
        assert_eq!(
            resolve_link("notes.txt", Some(r"C:\Users\me\index.md")),
            Some(LinkAction::LoadDocument(PathBuf::from(
                r"C:\Users\me\notes.txt"
            )))
        );
    }

    #[test]
    fn test_absolute_and_scheme_paths_unchanged() {
        assert_eq!(
            resolve_link("/MarkdownGuide.md", Some("/docs/index.md")),
            Some(LinkAction::LoadDocument(PathBuf::from("/MarkdownGuide.md")))
        );
        assert_eq!(
            resolve_link(r"D:\other.md", Some("/docs/index.md")),
            Some(LinkAction::LoadDocument(PathBuf::from(r"D:\other.md")))
        );
    }

    #[test]
    fn test_relative_without_current_path() {
        assert_eq!(
            resolve_link("page.md", None),
            Some(LinkAction::LoadDocument(PathBuf::from("page.md")))
        );
    }

    #[test]
    fn test_current_path_without_directory() {
        assert_eq!(
            resolve_link("page.md", Some("index.md")),
            Some(LinkAction::LoadDocument(PathBuf::from("page.md")))
        );
    }

    #[test]
    fn test_unhandled() {
        assert_eq!(resolve_link("mailto:someone@example.com", None), None);
        assert_eq!(resolve_link("image.png", Some("/docs/index.md")), None);
        assert_eq!(resolve_link("", None), None);
    }
}
