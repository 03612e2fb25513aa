//! Markdown formatting insertions
//!
//! Every toolbar button and formatting shortcut wraps the current selection
//! in a pair of markers (the closing marker may be empty). The caret ends up
//! after everything that was inserted.
//!
//! # Usage
//! ```ignore
//! let result = apply_format("Hello world", Selection { start: 0, end: 5 }, FormatCommand::Bold);
//! assert_eq!(result.text, "**Hello** world");
//! assert_eq!(result.cursor, 9);
//! ```

use crate::editor::Selection;

/// Snippet inserted by the table button.
pub const TABLE_SNIPPET: &str =
    "\n| Column 1 | Column 2 |\n| -------- | -------- |\n| Item 1 | Item 2 |\n";

/// Inserted by the indent button and the Tab key.
pub const INDENT: &str = "    ";

// ─────────────────────────────────────────────────────────────────────────────
// Format Command Enum
// ─────────────────────────────────────────────────────────────────────────────

/// Formatting insertions offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCommand {
    /// `**text**`
    Bold,
    /// `_text_`
    Italic,
    /// `#`, `##` or `###` prefix
    Heading(u8),
    /// `- ` prefix
    BulletList,
    /// `` `code` ``
    InlineCode,
    /// `[text](url)`
    Link,
    /// Two-column table skeleton
    Table,
    /// Four spaces
    Indent,
}

impl FormatCommand {
    /// Toolbar order, with separators between groups handled by the toolbar.
    pub fn toolbar() -> &'static [&'static [FormatCommand]] {
        &[
            &[FormatCommand::Bold, FormatCommand::Italic],
            &[
                FormatCommand::Heading(1),
                FormatCommand::Heading(2),
                FormatCommand::Heading(3),
            ],
            &[
                FormatCommand::BulletList,
                FormatCommand::InlineCode,
                FormatCommand::Link,
                FormatCommand::Table,
                FormatCommand::Indent,
            ],
        ]
    }

    /// Text inserted before and after the selection.
    pub fn markers(&self) -> (&'static str, &'static str) {
        match self {
            Self::Bold => ("**", "**"),
            Self::Italic => ("_", "_"),
            Self::Heading(1) => ("# ", ""),
            Self::Heading(2) => ("## ", ""),
            Self::Heading(_) => ("### ", ""),
            Self::BulletList => ("- ", ""),
            Self::InlineCode => ("`", "`"),
            Self::Link => ("[", "](url)"),
            Self::Table => (TABLE_SNIPPET, ""),
            Self::Indent => (INDENT, ""),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Bold => "𝐁",
            Self::Italic => "𝐼",
            Self::Heading(1) => "H1",
            Self::Heading(2) => "H2",
            Self::Heading(_) => "H3",
            Self::BulletList => "\u{2022}",
            Self::InlineCode => "</>",
            Self::Link => "🔗",
            Self::Table => "▦",
            Self::Indent => "⇥",
        }
    }

    pub fn shortcut_label(&self) -> Option<&'static str> {
        match self {
            Self::Bold => Some("Ctrl+B"),
            Self::Italic => Some("Ctrl+I"),
            Self::Heading(1) => Some("Ctrl+1"),
            Self::Heading(2) => Some("Ctrl+2"),
            Self::Heading(3) => Some("Ctrl+3"),
            Self::Indent => Some("Tab"),
            _ => None,
        }
    }

    pub fn tooltip(&self) -> String {
        let name = match self {
            Self::Bold => "Bold".to_string(),
            Self::Italic => "Italic".to_string(),
            Self::Heading(n) => format!("Heading {}", n),
            Self::BulletList => "Bullet List".to_string(),
            Self::InlineCode => "Inline Code".to_string(),
            Self::Link => "Insert Link".to_string(),
            Self::Table => "Insert Table".to_string(),
            Self::Indent => "Indent".to_string(),
        };
        match self.shortcut_label() {
            Some(shortcut) => format!("{} ({})", name, shortcut),
            None => name,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Format Result
// ─────────────────────────────────────────────────────────────────────────────

/// Text and caret after an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    pub text: String,
    /// Caret position (character index)
    pub cursor: usize,
}

/// Apply a toolbar command to the selection.
pub fn apply_format(text: &str, selection: Selection, command: FormatCommand) -> FormatResult {
    let (before, after) = command.markers();
    insert_around(text, selection, before, after)
}

/// Wrap the selection in `before` and `after`.
///
/// Selection indices are character indices and are clamped to the text.
pub fn insert_around(text: &str, selection: Selection, before: &str, after: &str) -> FormatResult {
    let start_byte = char_to_byte(text, selection.start);
    let end_byte = char_to_byte(text, selection.end).max(start_byte);
    let selected = &text[start_byte..end_byte];

    let mut result = String::with_capacity(text.len() + before.len() + after.len());
    result.push_str(&text[..start_byte]);
    result.push_str(before);
    result.push_str(selected);
    result.push_str(after);
    result.push_str(&text[end_byte..]);

    let start_chars = text[..start_byte].chars().count();
    let cursor = start_chars
        + before.chars().count()
        + selected.chars().count()
        + after.chars().count();

    FormatResult {
        text: result,
        cursor,
    }
}

/// Byte offset of the `index`-th character, or the text length past the end.
fn char_to_byte(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
