//! Theme Manager for Mark It Down
//!
//! Tracks the current theme and accent, and re-applies egui visuals only
//! when one of them changes.
//!
//! # Usage
//!
//! ```ignore
//! let mut manager = ThemeManager::new(Theme::Dark, AccentColor::Blue);
//! manager.apply_if_needed(ctx);
//!
//! manager.set_theme(Theme::Light);
//! manager.apply_if_needed(ctx);
//! ```

use eframe::egui::{Context, Visuals};
use log::{debug, info};

use super::ThemeColors;
use crate::config::{AccentColor, Theme};

// ─────────────────────────────────────────────────────────────────────────────
// Theme Manager
// ─────────────────────────────────────────────────────────────────────────────

/// Applies the selected palette to the egui context.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    current_theme: Theme,
    accent: AccentColor,
    /// Cached visuals for the current theme/accent
    cached_visuals: Option<Visuals>,
    needs_apply: bool,
}

impl ThemeManager {
    pub fn new(theme: Theme, accent: AccentColor) -> Self {
        info!(
            "ThemeManager initialized with theme {:?}, accent {:?}",
            theme, accent
        );
        Self {
            current_theme: theme,
            accent,
            cached_visuals: None,
            needs_apply: true,
        }
    }

    /// Set the theme and mark for reapplication.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.current_theme != theme {
            info!("Theme changed from {:?} to {:?}", self.current_theme, theme);
            self.current_theme = theme;
            self.invalidate();
        }
    }

    pub fn set_accent(&mut self, accent: AccentColor) {
        if self.accent != accent {
            info!("Accent changed from {:?} to {:?}", self.accent, accent);
            self.accent = accent;
            self.invalidate();
        }
    }

    /// Follow both values from settings in one call.
    pub fn sync(&mut self, theme: Theme, accent: AccentColor) {
        self.set_theme(theme);
        self.set_accent(accent);
    }

    /// Apply the current palette to the egui context.
    pub fn apply(&mut self, ctx: &Context) {
        let visuals = self.get_or_create_visuals();
        ctx.set_visuals(visuals);
        self.needs_apply = false;
        debug!(
            "Applied theme {:?} with accent {:?}",
            self.current_theme, self.accent
        );
    }

    /// Apply only after a change. Returns `true` if the theme was applied.
    pub fn apply_if_needed(&mut self, ctx: &Context) -> bool {
        if self.needs_apply {
            self.apply(ctx);
            true
        } else {
            false
        }
    }

    pub fn colors(&self) -> ThemeColors {
        ThemeColors::for_settings(self.current_theme, self.accent)
    }

    fn get_or_create_visuals(&mut self) -> Visuals {
        if let Some(ref visuals) = self.cached_visuals {
            return visuals.clone();
        }
        let visuals = self.colors().to_visuals();
        self.cached_visuals = Some(visuals.clone());
        visuals
    }

    fn invalidate(&mut self) {
        self.cached_visuals = None;
        self.needs_apply = true;
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(Theme::default(), AccentColor::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_manager_new() {
        let manager = ThemeManager::new(Theme::Dark, AccentColor::Purple);
        assert_eq!(manager.current_theme, Theme::Dark);
        assert_eq!(manager.accent, AccentColor::Purple);
        assert!(manager.needs_apply);
    }

    #[test]
    fn test_theme_manager_default() {
        let manager = ThemeManager::default();
        assert_eq!(manager.current_theme, Theme::Light);
        assert_eq!(manager.accent, AccentColor::Blue);
    }

    #[test]
    fn test_theme_manager_set_same_theme() {
        let mut manager = ThemeManager::new(Theme::Light, AccentColor::Blue);
        manager.needs_apply = false;

        manager.set_theme(Theme::Light);
        manager.set_accent(AccentColor::Blue);
        assert!(!manager.needs_apply);
    }

    #[test]
    fn test_theme_manager_change_invalidates_cache() {
        let mut manager = ThemeManager::new(Theme::Light, AccentColor::Blue);
        let _ = manager.get_or_create_visuals();
        manager.needs_apply = false;
        assert!(manager.cached_visuals.is_some());

        manager.sync(Theme::Dark, AccentColor::Blue);
        assert!(manager.needs_apply);
        assert!(manager.cached_visuals.is_none());
        assert!(manager.get_or_create_visuals().dark_mode);
    }

    #[test]
    fn test_theme_manager_accent_change() {
        let mut manager = ThemeManager::new(Theme::Dark, AccentColor::Blue);
        manager.needs_apply = false;

        manager.set_accent(AccentColor::Green);
        assert!(manager.needs_apply);
        assert_eq!(
            manager.colors().accent,
            ThemeColors::for_settings(Theme::Dark, AccentColor::Green).accent
        );
    }
}
