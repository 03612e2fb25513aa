//! User preferences for Mark It Down
//!
//! `Settings` holds the reading/writing preferences shown in the settings
//! popup plus the last window geometry. Keys are camelCase on disk.

use eframe::egui;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The opposite theme.
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label shown on the theme toggle button.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "LIGHT MODE",
            Theme::Dark => "DARK MODE",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Accent Color
// ─────────────────────────────────────────────────────────────────────────────

/// Accent color used for the mode label, active buttons and links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    #[default]
    Blue,
    Green,
    Purple,
    Red,
}

impl AccentColor {
    /// All accents in the order the settings popup shows them.
    pub fn all() -> &'static [AccentColor] {
        &[
            AccentColor::Blue,
            AccentColor::Green,
            AccentColor::Purple,
            AccentColor::Red,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccentColor::Blue => "blue",
            AccentColor::Green => "green",
            AccentColor::Purple => "purple",
            AccentColor::Red => "red",
        }
    }

    /// RGB triple for the given theme. Dark themes use the pastel variant.
    pub fn rgb(&self, theme: Theme) -> [u8; 3] {
        match (self, theme) {
            (AccentColor::Blue, Theme::Dark) => [0x89, 0xb4, 0xfa],
            (AccentColor::Blue, Theme::Light) => [0x1e, 0x66, 0xf5],
            (AccentColor::Green, Theme::Dark) => [0xa6, 0xe3, 0xa1],
            (AccentColor::Green, Theme::Light) => [0x40, 0xa0, 0x2b],
            (AccentColor::Purple, Theme::Dark) => [0xcb, 0xa6, 0xf7],
            (AccentColor::Purple, Theme::Light) => [0x88, 0x39, 0xef],
            (AccentColor::Red, Theme::Dark) => [0xf2, 0xcd, 0xcd],
            (AccentColor::Red, Theme::Light) => [0xdd, 0x78, 0x78],
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Font Family Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Typography for both panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
    Mono,
}

impl FontFamily {
    pub fn all() -> &'static [FontFamily] {
        &[FontFamily::Sans, FontFamily::Serif, FontFamily::Mono]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FontFamily::Sans => "sans",
            FontFamily::Serif => "serif",
            FontFamily::Mono => "mono",
        }
    }

    /// Whether text should be set in the monospace family.
    pub fn is_monospace(&self) -> bool {
        matches!(self, FontFamily::Mono)
    }

    /// egui font family used to draw this typography. egui ships no serif
    /// face, so serif falls back to the proportional family.
    pub fn egui_family(&self) -> egui::FontFamily {
        if self.is_monospace() {
            egui::FontFamily::Monospace
        } else {
            egui::FontFamily::Proportional
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 760.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// All persisted user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,

    pub accent_color: AccentColor,

    /// Font size for both panes, in points
    pub font_size: f32,

    pub font_family: FontFamily,

    /// Whether the status bar shows character/word/line counts
    pub show_stats: bool,

    /// Window size and position
    pub window_size: WindowSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            accent_color: AccentColor::default(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: FontFamily::default(),
            show_stats: false,
            window_size: WindowSize::default(),
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    pub const DEFAULT_FONT_SIZE: f32 = 16.0;
    /// Minimum allowed font size.
    pub const MIN_FONT_SIZE: f32 = 12.0;
    /// Maximum allowed font size.
    pub const MAX_FONT_SIZE: f32 = 32.0;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Step the font size by `delta` points, staying within bounds.
    pub fn step_font_size(&mut self, delta: f32) {
        self.font_size = (self.font_size + delta)
            .round()
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);
    }

    /// Clamp values to valid ranges.
    ///
    /// Used after loading settings that might have been edited by hand.
    pub fn sanitize(&mut self) {
        if !self.font_size.is_finite() {
            self.font_size = Self::DEFAULT_FONT_SIZE;
        }
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
    }

    /// Deserialize and sanitize in one step.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
