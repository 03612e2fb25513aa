//! Toolbar UI Component for Mark It Down
//!
//! A single row at the top of the window: the File menu, the formatting
//! buttons (only while editing) and the view mode switcher on the right.

use crate::markdown::FormatCommand;
use crate::preview::ViewMode;
use crate::theme::ThemeColors;
use eframe::egui::{self, Color32, Response, RichText, Rounding, Ui, Vec2};

/// Height of the toolbar row.
pub const TOOLBAR_HEIGHT: f32 = 34.0;

/// Size of formatting buttons.
const FORMAT_BUTTON_SIZE: Vec2 = Vec2::new(28.0, 24.0);

/// Actions that can be triggered from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolbarAction {
    New,
    Open,
    Save,
    SaveAs,
    Quit,
    /// Insert markdown around the selection
    Format(FormatCommand),
    SetMode(ViewMode),
}

/// Toolbar rendering.
#[derive(Debug, Clone, Default)]
pub struct Toolbar;

impl Toolbar {
    pub fn new() -> Self {
        Self
    }

    /// Render the toolbar and return any triggered action.
    pub fn show(&self, ui: &mut Ui, colors: &ThemeColors, mode: ViewMode) -> Option<ToolbarAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.set_height(TOOLBAR_HEIGHT);
            ui.spacing_mut().item_spacing.x = 2.0;

            ui.menu_button(RichText::new("File").size(13.0), |ui| {
                let items = [
                    ("New", "Ctrl+N", ToolbarAction::New),
                    ("Open...", "Ctrl+O", ToolbarAction::Open),
                    ("Save", "Ctrl+S", ToolbarAction::Save),
                    ("Save As...", "Ctrl+Shift+S", ToolbarAction::SaveAs),
                ];
                for (index, (label, shortcut, item)) in items.into_iter().enumerate() {
                    if index == 2 {
                        ui.separator();
                    }
                    if ui
                        .add(egui::Button::new(label).shortcut_text(shortcut))
                        .clicked()
                    {
                        action = Some(item);
                        ui.close_menu();
                    }
                }
                ui.separator();
                if ui
                    .add(egui::Button::new("Quit").shortcut_text("Ctrl+Q"))
                    .clicked()
                {
                    action = Some(ToolbarAction::Quit);
                    ui.close_menu();
                }
            });

            if mode.is_editing() {
                ui.add_space(8.0);
                for (index, group) in FormatCommand::toolbar().iter().enumerate() {
                    if index > 0 {
                        ui.add_space(4.0);
                        vertical_separator(ui, colors.base.border, TOOLBAR_HEIGHT - 14.0);
                        ui.add_space(4.0);
                    }
                    for command in group.iter() {
                        if format_button(ui, command, colors).clicked() {
                            action = Some(ToolbarAction::Format(*command));
                        }
                    }
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(8.0);
                // Right-to-left, so iterate backwards to keep the natural order
                for candidate in ViewMode::all().iter().rev() {
                    if mode_button(ui, *candidate, *candidate == mode, colors).clicked() {
                        action = Some(ToolbarAction::SetMode(*candidate));
                    }
                }
            });
        });

        action
    }
}

fn format_button(ui: &mut Ui, command: &FormatCommand, colors: &ThemeColors) -> Response {
    let mut text = RichText::new(command.icon())
        .size(13.0)
        .color(colors.text.primary);
    if matches!(command, FormatCommand::Heading(_) | FormatCommand::Bold) {
        text = text.strong();
    }
    ui.add(
        egui::Button::new(text)
            .frame(false)
            .min_size(FORMAT_BUTTON_SIZE),
    )
    .on_hover_text(command.tooltip())
}

fn mode_button(ui: &mut Ui, mode: ViewMode, active: bool, colors: &ThemeColors) -> Response {
    let (text_color, fill) = if active {
        (colors.base.background, colors.accent)
    } else {
        (colors.text.muted, Color32::TRANSPARENT)
    };
    ui.add(
        egui::Button::new(
            RichText::new(format!("{} {}", mode.icon(), mode.label()))
                .size(11.0)
                .color(text_color),
        )
        .fill(fill)
        .rounding(Rounding::same(4.0)),
    )
    .on_hover_text(format!("{} view", mode.label()))
}

/// Draw a vertical separator line.
fn vertical_separator(ui: &mut Ui, color: Color32, height: f32) {
    let (rect, _response) = ui.allocate_exact_size(Vec2::new(1.0, height), egui::Sense::hover());
    ui.painter().line_segment(
        [rect.center_top(), rect.center_bottom()],
        egui::Stroke::new(1.0, color),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolbar_action_equality() {
        assert_eq!(
            ToolbarAction::Format(FormatCommand::Bold),
            ToolbarAction::Format(FormatCommand::Bold)
        );
        assert_ne!(
            ToolbarAction::SetMode(ViewMode::Edit),
            ToolbarAction::SetMode(ViewMode::Split)
        );
    }
}
