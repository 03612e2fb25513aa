//! Table of contents extraction
//!
//! Headings are read straight from the markdown source, one per line, so the
//! outline can be rebuilt on every edit without parsing the whole document.
//! Anchor ids are shared with the preview renderer so that TOC entries and
//! `#fragment` links land on the same heading.

use log::warn;
use regex::Regex;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// TocEntry
// ─────────────────────────────────────────────────────────────────────────────

/// A heading in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (1-6 for H1-H6)
    pub level: u8,
    /// Heading text as written, trimmed
    pub text: String,
    /// Anchor id derived from `text`
    pub anchor_id: String,
}

impl TocEntry {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        let text = text.into();
        let anchor_id = slugify(&text);
        Self {
            level,
            text,
            anchor_id,
        }
    }

    /// Indentation level (0 for H1, 1 for H2, etc.)
    pub fn indent_level(&self) -> usize {
        self.level.saturating_sub(1) as usize
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Extraction
// ─────────────────────────────────────────────────────────────────────────────

fn heading_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^(#{1,6})\s+(.*)$")
                .map_err(|e| warn!("Heading pattern failed to compile: {}", e))
                .ok()
        })
        .as_ref()
}

/// Parse a single source line as a heading.
///
/// The line must start with `#` in its first column. Returns the level and
/// the trimmed heading text.
pub fn parse_heading_line(line: &str) -> Option<(u8, String)> {
    if !line.starts_with('#') {
        return None;
    }

    let caps = heading_pattern()?.captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    let text = caps.get(2)?.as_str().trim();
    if text.is_empty() {
        return None;
    }

    Some((level, text.to_string()))
}

/// Extract the table of contents from a markdown buffer, in document order.
///
/// Headings inside fenced code blocks are still reported; the outline is a
/// plain line scan.
pub fn extract_toc(buffer: &str) -> Vec<TocEntry> {
    buffer
        .lines()
        .filter_map(parse_heading_line)
        .map(|(level, text)| TocEntry::new(level, text))
        .collect()
}

/// Derive an anchor id: lowercase, with each whitespace run replaced by a
/// single hyphen.
///
/// Two headings with the same text get the same id.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('-');
                in_space = true;
            }
        } else {
            slug.extend(ch.to_lowercase());
            in_space = false;
        }
    }

    slug
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_toc() {
        let toc = extract_toc("# A\n\ntext\n## B\n### C\n");
        assert_eq!(
            toc,
            vec![
                TocEntry {
                    level: 1,
                    text: "A".to_string(),
                    anchor_id: "a".to_string()
                },
                TocEntry {
                    level: 2,
                    text: "B".to_string(),
                    anchor_id: "b".to_string()
                },
                TocEntry {
                    level: 3,
                    text: "C".to_string(),
                    anchor_id: "c".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_no_headings() {
        assert!(extract_toc("").is_empty());
        assert!(extract_toc("just text\n\n- a list\n").is_empty());
    }

    #[test]
    fn test_all_levels() {
        let toc = extract_toc("# 1\n## 2\n### 3\n#### 4\n##### 5\n###### 6\n####### 7\n");
        let levels: Vec<u8> = toc.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_requires_space_and_first_column() {
        assert!(extract_toc("#hashtag\n").is_empty());
        assert!(extract_toc("  # indented\n").is_empty());
        assert!(extract_toc("#\n").is_empty());
    }

    #[test]
    fn test_text_is_trimmed() {
        let toc = extract_toc("##   Spaced Out   \r\n");
        assert_eq!(toc[0].text, "Spaced Out");
        assert_eq!(toc[0].anchor_id, "spaced-out");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Many   Spaces\tAnd Tabs"), "many-spaces-and-tabs");
        assert_eq!(slugify("Section 1"), "section-1");
        assert_eq!(slugify("Ünïcode Titel"), "ünïcode-titel");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_duplicate_headings_share_anchor() {
        let toc = extract_toc("# Notes\n## Notes\n");
        assert_eq!(toc[0].anchor_id, toc[1].anchor_id);
    }

    #[test]
    fn test_indent_level() {
        assert_eq!(TocEntry::new(1, "x").indent_level(), 0);
        assert_eq!(TocEntry::new(3, "x").indent_level(), 2);
    }

    #[test]
    fn test_parse_heading_line() {
        assert_eq!(
            parse_heading_line("### Deep dive"),
            Some((3, "Deep dive".to_string()))
        );
        assert_eq!(parse_heading_line("plain"), None);
    }
}
