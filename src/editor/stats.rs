//! Document statistics for the status bar

// ─────────────────────────────────────────────────────────────────────────────
// TextStats
// ─────────────────────────────────────────────────────────────────────────────

/// Character, word and line counts of a buffer.
///
/// # Example
///
/// ```ignore
/// let stats = TextStats::from_text("Hello, World!\nSecond line");
/// assert_eq!(stats.words, 4);
/// assert_eq!(stats.lines, 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    /// Unicode scalar values, whitespace included
    pub characters: usize,
    /// Whitespace-separated words
    pub words: usize,
    /// Newline-separated lines; an empty buffer has one
    pub lines: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        Self {
            characters: text.chars().count(),
            words: text.split_whitespace().count(),
            lines: text.split('\n').count(),
        }
    }

    /// Status bar rendering, e.g. `C:12 W:3 L:1`.
    pub fn format_compact(&self) -> String {
        format!("C:{} W:{} L:{}", self.characters, self.words, self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let stats = TextStats::from_text("");
        assert_eq!(stats.characters, 0);
        assert_eq!(stats.words, 0);
        assert_eq!(stats.lines, 1);
    }

    #[test]
    fn test_counts() {
        let stats = TextStats::from_text("# Title\n\nSome  body text.\n");
        assert_eq!(stats.characters, 26);
        assert_eq!(stats.words, 5);
        assert_eq!(stats.lines, 4);
    }

    #[test]
    fn test_whitespace_only() {
        let stats = TextStats::from_text("   \n\t ");
        assert_eq!(stats.words, 0);
        assert_eq!(stats.lines, 2);
    }

    #[test]
    fn test_multibyte_characters() {
        let stats = TextStats::from_text("héllo wörld");
        assert_eq!(stats.characters, 11);
        assert_eq!(stats.words, 2);
    }

    #[test]
    fn test_format_compact() {
        let stats = TextStats::from_text("one two");
        assert_eq!(stats.format_compact(), "C:7 W:2 L:1");
    }
}
