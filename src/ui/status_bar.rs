//! Status bar at the bottom of the window
//!
//! Left: reading/editing label, OPEN and the optional document stats.
//! Center: `[name *]` or a toast. Right: TOC, SETTINGS and the edit/save
//! buttons.

use crate::editor::TextStats;
use crate::theme::ThemeColors;
use eframe::egui::{self, Color32, Frame, Margin, Response, RichText, Ui};

/// Height of the status bar.
pub const STATUS_BAR_HEIGHT: f32 = 26.0;

const LABEL_SIZE: f32 = 10.0;

/// Actions that can be triggered from the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBarAction {
    Open,
    ToggleToc,
    ToggleSettings,
    /// Switch from reading to editing
    Edit,
    Save,
    SaveAs,
    /// Back to reading without saving
    DontSave,
}

/// What the status bar displays this frame.
#[derive(Debug, Clone)]
pub struct StatusBarInfo<'a> {
    pub editing: bool,
    /// `Some` when document stats are enabled
    pub stats: Option<TextStats>,
    /// `[name]` or `[name *]`
    pub title_label: &'a str,
    pub toast: Option<&'a str>,
    pub toc_open: bool,
    pub settings_open: bool,
}

#[derive(Debug, Clone, Default)]
pub struct StatusBar;

impl StatusBar {
    pub fn new() -> Self {
        Self
    }

    pub fn show(
        &self,
        ui: &mut Ui,
        info: &StatusBarInfo<'_>,
        colors: &ThemeColors,
    ) -> Option<StatusBarAction> {
        let mut action = None;

        Frame::none()
            .fill(colors.base.footer)
            .inner_margin(Margin::symmetric(12.0, 4.0))
            .show(ui, |ui| {
                ui.set_height(STATUS_BAR_HEIGHT - 8.0);
                ui.horizontal_centered(|ui| {
                    ui.spacing_mut().item_spacing.x = 12.0;

                    let mode_label = if info.editing { "EDITING" } else { "READING" };
                    ui.label(label_text(mode_label, colors.text.primary));

                    if text_button(ui, "OPEN", false, colors).clicked() {
                        action = Some(StatusBarAction::Open);
                    }

                    if let Some(stats) = info.stats {
                        ui.label(
                            RichText::new(stats.format_compact())
                                .size(LABEL_SIZE - 1.0)
                                .color(colors.text.muted),
                        );
                    }

                    let center = info.toast.unwrap_or(info.title_label);
                    let center_color = if info.toast.is_some() {
                        colors.accent
                    } else {
                        colors.text.muted
                    };

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        // Right-to-left: last button first
                        if info.editing {
                            if text_button(ui, "DON'T SAVE", false, colors).clicked() {
                                action = Some(StatusBarAction::DontSave);
                            }
                            if text_button(ui, "SAVE AS", false, colors).clicked() {
                                action = Some(StatusBarAction::SaveAs);
                            }
                            if text_button(ui, "SAVE", true, colors).clicked() {
                                action = Some(StatusBarAction::Save);
                            }
                        } else if text_button(ui, "EDIT", true, colors).clicked() {
                            action = Some(StatusBarAction::Edit);
                        }

                        if text_button(ui, "SETTINGS", info.settings_open, colors).clicked() {
                            action = Some(StatusBarAction::ToggleSettings);
                        }
                        if text_button(ui, "TOC", info.toc_open, colors).clicked() {
                            action = Some(StatusBarAction::ToggleToc);
                        }

                        ui.with_layout(
                            egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                            |ui| {
                                ui.add(
                                    egui::Label::new(label_text(center, center_color)).truncate(),
                                );
                            },
                        );
                    });
                });
            });

        action
    }
}

fn label_text(text: &str, color: Color32) -> RichText {
    RichText::new(text).size(LABEL_SIZE).strong().color(color)
}

/// Flat uppercase button; highlighted ones use the primary text color.
fn text_button(ui: &mut Ui, text: &str, highlighted: bool, colors: &ThemeColors) -> Response {
    let color = if highlighted {
        colors.text.primary
    } else {
        colors.text.muted
    };
    ui.add(egui::Button::new(label_text(text, color)).frame(false))
}
