//! Theme System for Mark It Down
//!
//! Two palettes (light and dark) plus a user-selectable accent color. The
//! `Theme` and `AccentColor` settings in `config::settings` pick the palette
//! at runtime; `ThemeManager` applies it to the egui context.
//!
//! # Usage
//!
//! ```ignore
//! use crate::theme::ThemeColors;
//!
//! let colors = ThemeColors::for_settings(settings.theme, settings.accent_color);
//! ui.label(RichText::new("READING").color(colors.text.muted));
//! ctx.set_visuals(colors.to_visuals());
//! ```

pub mod manager;

pub use manager::ThemeManager;

use crate::config::{AccentColor, Theme};
use eframe::egui::{self, Color32, Rounding, Stroke, Visuals};

/// Corner rounding for buttons and popups.
const WIDGET_ROUNDING: f32 = 4.0;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Colors
// ─────────────────────────────────────────────────────────────────────────────

/// All colors the UI draws with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    pub base: BaseColors,
    pub text: TextColors,
    /// Accent for active buttons, links and the caret
    pub accent: Color32,
    dark: bool,
}

impl ThemeColors {
    /// Palette for a theme/accent pair.
    pub fn for_settings(theme: Theme, accent: AccentColor) -> Self {
        let [r, g, b] = accent.rgb(theme);
        let accent = Color32::from_rgb(r, g, b);
        match theme {
            Theme::Dark => Self::dark(accent),
            Theme::Light => Self::light(accent),
        }
    }

    pub fn light(accent: Color32) -> Self {
        Self {
            base: BaseColors::light(),
            text: TextColors::light(),
            accent,
            dark: false,
        }
    }

    pub fn dark(accent: Color32) -> Self {
        Self {
            base: BaseColors::dark(),
            text: TextColors::dark(),
            accent,
            dark: true,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// Convert the palette into egui `Visuals`.
    pub fn to_visuals(&self) -> Visuals {
        let rounding = Rounding::same(WIDGET_ROUNDING);
        let mut visuals = if self.dark {
            Visuals::dark()
        } else {
            Visuals::light()
        };

        // ─────────────────────────────────────────────────────────────────────
        // Backgrounds
        // ─────────────────────────────────────────────────────────────────────
        visuals.panel_fill = self.base.background;
        visuals.window_fill = self.base.panel;
        visuals.extreme_bg_color = self.base.background;
        visuals.faint_bg_color = self.base.panel;
        visuals.code_bg_color = self.base.code;

        // ─────────────────────────────────────────────────────────────────────
        // Text & Selection
        // ─────────────────────────────────────────────────────────────────────
        visuals.override_text_color = Some(self.text.primary);
        visuals.hyperlink_color = self.accent;
        visuals.selection.bg_fill = self.accent.gamma_multiply(0.35);
        visuals.selection.stroke = Stroke::new(1.0, self.accent);
        visuals.text_cursor.stroke = Stroke::new(2.0, self.accent);

        // ─────────────────────────────────────────────────────────────────────
        // Widgets
        // ─────────────────────────────────────────────────────────────────────
        visuals.widgets.noninteractive.bg_fill = self.base.panel;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.base.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text.primary);
        visuals.widgets.noninteractive.rounding = rounding;

        visuals.widgets.inactive.bg_fill = self.base.panel;
        visuals.widgets.inactive.weak_bg_fill = Color32::TRANSPARENT;
        visuals.widgets.inactive.bg_stroke = Stroke::NONE;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text.muted);
        visuals.widgets.inactive.rounding = rounding;

        visuals.widgets.hovered.bg_fill = self.base.border;
        visuals.widgets.hovered.weak_bg_fill = self.base.border;
        visuals.widgets.hovered.bg_stroke = Stroke::NONE;
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.5, self.text.primary);
        visuals.widgets.hovered.rounding = rounding;

        visuals.widgets.active.bg_fill = self.accent;
        visuals.widgets.active.weak_bg_fill = self.accent.gamma_multiply(0.5);
        visuals.widgets.active.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.active.fg_stroke = Stroke::new(2.0, self.base.background);
        visuals.widgets.active.rounding = rounding;

        visuals.widgets.open = visuals.widgets.hovered;

        // ─────────────────────────────────────────────────────────────────────
        // Windows & Popups
        // ─────────────────────────────────────────────────────────────────────
        visuals.window_rounding = Rounding::same(8.0);
        visuals.window_stroke = Stroke::new(1.0, self.base.border);
        visuals.window_shadow = egui::epaint::Shadow {
            offset: egui::vec2(0.0, 4.0),
            blur: 16.0,
            spread: 0.0,
            color: Color32::from_black_alpha(if self.dark { 100 } else { 40 }),
        };
        visuals.menu_rounding = rounding;
        visuals.button_frame = true;
        visuals.interact_cursor = Some(egui::CursorIcon::PointingHand);
        visuals.dark_mode = self.dark;

        visuals
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Base Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Backgrounds and borders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseColors {
    /// Editor and preview background
    pub background: Color32,
    /// Sidebars, popups and the toolbar
    pub panel: Color32,
    /// Status bar at the bottom of the window
    pub footer: Color32,
    /// Dividers and hovered buttons
    pub border: Color32,
    /// Code block and inline code background
    pub code: Color32,
}

impl BaseColors {
    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(0xef, 0xf1, 0xf5),
            panel: Color32::from_rgb(0xe6, 0xe9, 0xef),
            footer: Color32::from_rgb(0xdc, 0xe0, 0xe8),
            border: Color32::from_rgb(0xba, 0xc2, 0xde),
            code: Color32::from_rgb(0xdc, 0xe0, 0xe8),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(0x1e, 0x1e, 0x2e),
            panel: Color32::from_rgb(0x18, 0x18, 0x25),
            footer: Color32::from_rgb(0x11, 0x11, 0x1b),
            border: Color32::from_rgb(0x31, 0x32, 0x44),
            code: Color32::from_rgb(0x18, 0x18, 0x25),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Colors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextColors {
    pub primary: Color32,
    /// Labels, hints and the status bar
    pub muted: Color32,
    /// Block quote text
    pub quote: Color32,
}

impl TextColors {
    pub fn light() -> Self {
        Self {
            primary: Color32::from_rgb(0x4c, 0x4f, 0x69),
            muted: Color32::from_rgb(0x8c, 0x8f, 0xa1),
            quote: Color32::from_rgb(0x6c, 0x6f, 0x85),
        }
    }

    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(0xcd, 0xd6, 0xf4),
            muted: Color32::from_rgb(0x7f, 0x84, 0x9c),
            quote: Color32::from_rgb(0xa6, 0xad, 0xc8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_follows_theme() {
        let dark = ThemeColors::for_settings(Theme::Dark, AccentColor::Blue);
        assert!(dark.is_dark());
        assert_eq!(dark.base.background, Color32::from_rgb(0x1e, 0x1e, 0x2e));
        assert_eq!(dark.accent, Color32::from_rgb(0x89, 0xb4, 0xfa));

        let light = ThemeColors::for_settings(Theme::Light, AccentColor::Blue);
        assert!(!light.is_dark());
        assert_eq!(light.text.primary, Color32::from_rgb(0x4c, 0x4f, 0x69));
        assert_eq!(light.accent, Color32::from_rgb(0x1e, 0x66, 0xf5));
    }

    #[test]
    fn test_accent_changes_only_accent() {
        let blue = ThemeColors::for_settings(Theme::Dark, AccentColor::Blue);
        let red = ThemeColors::for_settings(Theme::Dark, AccentColor::Red);
        assert_ne!(blue.accent, red.accent);
        assert_eq!(blue.base, red.base);
        assert_eq!(blue.text, red.text);
    }

    #[test]
    fn test_visuals_use_palette() {
        let colors = ThemeColors::for_settings(Theme::Dark, AccentColor::Green);
        let visuals = colors.to_visuals();
        assert!(visuals.dark_mode);
        assert_eq!(visuals.panel_fill, colors.base.background);
        assert_eq!(visuals.hyperlink_color, colors.accent);
        assert_eq!(visuals.override_text_color, Some(colors.text.primary));

        let light = ThemeColors::for_settings(Theme::Light, AccentColor::Green).to_visuals();
        assert!(!light.dark_mode);
    }
}
