//! Settings Popup Component for Mark It Down
//!
//! A small window anchored above the status bar. Every control edits the
//! settings in place so changes preview live; the app persists them.

use crate::config::{AccentColor, FontFamily, Settings};
use crate::theme::ThemeColors;
use eframe::egui::{self, Color32, RichText, Rounding, Sense, Stroke, Ui, Vec2};

/// Width of the popup.
const POPUP_WIDTH: f32 = 260.0;

/// Diameter of the accent color swatches.
const SWATCH_SIZE: f32 = 18.0;

/// Result of showing the settings popup.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanelOutput {
    /// Whether settings were modified.
    pub changed: bool,
    /// Whether the popup should be closed.
    pub close_requested: bool,
    /// Whether the bundled markdown guide should be loaded.
    pub load_guide_requested: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SettingsPanel;

impl SettingsPanel {
    pub fn new() -> Self {
        Self
    }

    /// Show the popup.
    pub fn show(
        &self,
        ctx: &egui::Context,
        settings: &mut Settings,
        colors: &ThemeColors,
    ) -> SettingsPanelOutput {
        let mut output = SettingsPanelOutput::default();

        egui::Window::new("settings_popup")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .fixed_size(Vec2::new(POPUP_WIDTH, 0.0))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -36.0])
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(colors.base.panel)
                    .stroke(Stroke::new(1.0, colors.base.border)),
            )
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                ui.spacing_mut().item_spacing.y = 10.0;

                // Theme
                setting_row(ui, "Theme", colors, |ui| {
                    if value_button(ui, settings.theme.label(), colors).clicked() {
                        settings.theme = settings.theme.toggle();
                        output.changed = true;
                    }
                });

                // Accent
                setting_row(ui, "Accent", colors, |ui| {
                    for accent in AccentColor::all().iter().rev() {
                        if accent_swatch(ui, *accent, settings, colors) {
                            settings.accent_color = *accent;
                            output.changed = true;
                        }
                    }
                });

                // Font size
                setting_row(ui, "Font Size", colors, |ui| {
                    if value_button(ui, "+", colors).clicked() {
                        settings.step_font_size(1.0);
                        output.changed = true;
                    }
                    ui.label(
                        RichText::new(format!("{}px", settings.font_size as u32))
                            .size(11.0)
                            .color(colors.text.primary),
                    );
                    if value_button(ui, "−", colors).clicked() {
                        settings.step_font_size(-1.0);
                        output.changed = true;
                    }
                });

                // Typography
                setting_row(ui, "Typography", colors, |ui| {
                    for family in FontFamily::all().iter().rev() {
                        let selected = settings.font_family == *family;
                        let color = if selected {
                            colors.accent
                        } else {
                            colors.text.muted
                        };
                        let text = RichText::new(family.label()).size(10.0).strong().color(color);
                        if ui.add(egui::Button::new(text).frame(false)).clicked() && !selected {
                            settings.font_family = *family;
                            output.changed = true;
                        }
                    }
                });

                // Document stats
                setting_row(ui, "Document Stats", colors, |ui| {
                    let label = if settings.show_stats { "SHOW" } else { "HIDE" };
                    if value_button(ui, label, colors).clicked() {
                        settings.show_stats = !settings.show_stats;
                        output.changed = true;
                    }
                });

                ui.separator();

                if ui
                    .add_sized(
                        [ui.available_width(), 24.0],
                        egui::Button::new(
                            RichText::new("Load Markdown Guide")
                                .size(11.0)
                                .color(colors.accent),
                        ),
                    )
                    .clicked()
                {
                    output.load_guide_requested = true;
                }
            });

        output
    }
}

/// Label on the left, controls laid out right-to-left.
fn setting_row(
    ui: &mut Ui,
    label: &str,
    colors: &ThemeColors,
    add_controls: impl FnOnce(&mut Ui),
) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(label.to_uppercase())
                .size(10.0)
                .strong()
                .color(colors.text.muted),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), add_controls);
    });
}

fn value_button(ui: &mut Ui, text: &str, colors: &ThemeColors) -> egui::Response {
    ui.add(
        egui::Button::new(
            RichText::new(text)
                .size(10.0)
                .strong()
                .color(colors.text.primary),
        )
        .frame(false),
    )
}

/// Round swatch; returns `true` when clicked.
fn accent_swatch(
    ui: &mut Ui,
    accent: AccentColor,
    settings: &Settings,
    colors: &ThemeColors,
) -> bool {
    let [r, g, b] = accent.rgb(settings.theme);
    let fill = Color32::from_rgb(r, g, b);
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE), Sense::click());

    ui.painter()
        .rect_filled(rect, Rounding::same(SWATCH_SIZE / 2.0), fill);
    if settings.accent_color == accent {
        ui.painter().rect_stroke(
            rect.expand(2.0),
            Rounding::same(SWATCH_SIZE / 2.0 + 2.0),
            Stroke::new(1.5, colors.text.primary),
        );
    }

    response.on_hover_text(accent.label()).clicked()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_panel_output_default() {
        let output = SettingsPanelOutput::default();
        assert!(!output.changed);
        assert!(!output.close_requested);
        assert!(!output.load_guide_requested);
    }
}
