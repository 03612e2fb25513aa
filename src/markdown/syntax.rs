//! Code block syntax highlighting
//!
//! Loads syntect's bundled syntaxes and themes once and turns fenced code
//! into colored segments for the preview.
//!
//! # Example
//! ```ignore
//! let lines = highlight_code("fn main() {}", "rust", true);
//! ```

use eframe::egui::Color32;
use log::{debug, warn};
use std::sync::OnceLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Theme used with the dark palette
pub const DEFAULT_DARK_THEME: &str = "base16-ocean.dark";

/// Theme used with the light palette
pub const DEFAULT_LIGHT_THEME: &str = "InspiredGitHub";

/// Color for unhighlighted code when a theme has no foreground
const PLAIN_FOREGROUND: Color32 = Color32::GRAY;

// ─────────────────────────────────────────────────────────────────────────────
// Highlighted Segment
// ─────────────────────────────────────────────────────────────────────────────

/// A run of code in one color.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightedSegment {
    pub text: String,
    pub foreground: Color32,
    pub bold: bool,
    pub italic: bool,
}

impl HighlightedSegment {
    pub fn plain(text: impl Into<String>, foreground: Color32) -> Self {
        Self {
            text: text.into(),
            foreground,
            bold: false,
            italic: false,
        }
    }
}

/// A line of highlighted segments.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightedLine {
    pub segments: Vec<HighlightedSegment>,
}

impl HighlightedLine {
    fn plain(text: &str, color: Color32) -> Self {
        Self {
            segments: vec![HighlightedSegment::plain(text, color)],
        }
    }

    /// Concatenated text of the line.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Syntax Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Cached syntect syntax and theme sets.
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    /// Load syntect's default syntaxes and themes. Expensive; reuse the result.
    pub fn new() -> Self {
        debug!("Loading syntect syntax and theme sets");
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        debug!(
            "Loaded {} syntaxes and {} themes",
            syntax_set.syntaxes().len(),
            theme_set.themes.len()
        );
        Self {
            syntax_set,
            theme_set,
        }
    }

    /// Theme for the given mode, if syntect ships it.
    pub fn theme_for_mode(&self, dark_mode: bool) -> Option<&Theme> {
        let name = if dark_mode {
            DEFAULT_DARK_THEME
        } else {
            DEFAULT_LIGHT_THEME
        };
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Highlight `code` as `language`. Unknown languages come back as plain
    /// lines in `fallback` color.
    pub fn highlight(
        &self,
        code: &str,
        language: &str,
        dark_mode: bool,
        fallback: Color32,
    ) -> Vec<HighlightedLine> {
        let (Some(syntax), Some(theme)) = (
            self.find_syntax_for_language(language),
            self.theme_for_mode(dark_mode),
        ) else {
            return code
                .lines()
                .map(|line| HighlightedLine::plain(line, fallback))
                .collect();
        };

        let default_color = theme
            .settings
            .foreground
            .map(syntect_to_egui_color)
            .unwrap_or(PLAIN_FOREGROUND);
        let mut highlighter = HighlightLines::new(syntax, theme);

        LinesWithEndings::from(code)
            .map(|line| {
                let content = line.trim_end_matches(['\n', '\r']);
                match highlighter.highlight_line(line, &self.syntax_set) {
                    Ok(ranges) => HighlightedLine {
                        segments: ranges
                            .into_iter()
                            .map(|(style, text)| {
                                style_to_segment(style, text.trim_end_matches(['\n', '\r']))
                            })
                            .filter(|segment| !segment.text.is_empty())
                            .collect(),
                    },
                    Err(e) => {
                        warn!("Failed to highlight line: {}", e);
                        HighlightedLine::plain(content, default_color)
                    }
                }
            })
            .collect()
    }

    /// Background color of the theme for the given mode.
    pub fn background(&self, dark_mode: bool) -> Option<Color32> {
        self.theme_for_mode(dark_mode)?
            .settings
            .background
            .map(syntect_to_egui_color)
    }

    /// Find a syntax by fence info string: common aliases, then extension,
    /// then name.
    fn find_syntax_for_language(&self, language: &str) -> Option<&SyntaxReference> {
        if language.is_empty() {
            return None;
        }

        let lang_lower = language.to_lowercase();
        let extension = match lang_lower.as_str() {
            "rust" => "rs",
            "python" => "py",
            "javascript" => "js",
            "typescript" => "ts",
            "cpp" | "c++" | "cxx" => "cpp",
            "csharp" | "c#" => "cs",
            "golang" => "go",
            "ruby" => "rb",
            "htm" => "html",
            "yml" => "yaml",
            "markdown" => "md",
            "shell" | "bash" | "zsh" => "sh",
            "haskell" => "hs",
            "perl" => "pl",
            "patch" => "diff",
            other => other,
        };

        self.syntax_set
            .find_syntax_by_extension(extension)
            .or_else(|| self.syntax_set.find_syntax_by_name(language))
            .or_else(|| {
                self.syntax_set
                    .syntaxes()
                    .iter()
                    .find(|syntax| syntax.name.to_lowercase() == lang_lower)
            })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Convert syntect Color to egui Color32.
pub fn syntect_to_egui_color(color: syntect::highlighting::Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn style_to_segment(style: Style, text: &str) -> HighlightedSegment {
    HighlightedSegment {
        text: text.to_string(),
        foreground: syntect_to_egui_color(style.foreground),
        bold: style.font_style.contains(FontStyle::BOLD),
        italic: style.font_style.contains(FontStyle::ITALIC),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Highlighter Instance
// ─────────────────────────────────────────────────────────────────────────────

static HIGHLIGHTER: OnceLock<SyntaxHighlighter> = OnceLock::new();

/// Shared highlighter, loaded on first use.
pub fn get_highlighter() -> &'static SyntaxHighlighter {
    HIGHLIGHTER.get_or_init(SyntaxHighlighter::new)
}

/// Highlight with the shared highlighter.
pub fn highlight_code(
    code: &str,
    language: &str,
    dark_mode: bool,
    fallback: Color32,
) -> Vec<HighlightedLine> {
    get_highlighter().highlight(code, language, dark_mode, fallback)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
