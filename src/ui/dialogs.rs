//! Modal dialogs: the unsaved-changes confirmation and the notice/error
//! message box.

use crate::state::{Modal, ModalKind};
use crate::theme::ThemeColors;
use eframe::egui::{self, Color32, Key, RichText, Stroke};

const DIALOG_WIDTH: f32 = 340.0;

/// Choice made in the confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    /// Save, then proceed if the save went through
    Save,
    /// Proceed and drop the changes
    Discard,
    Cancel,
}

/// Show the unsaved-changes confirmation. Returns the choice once made.
///
/// Enter discards, Escape cancels.
pub fn confirm_dialog(
    ctx: &egui::Context,
    message: &str,
    colors: &ThemeColors,
) -> Option<ConfirmChoice> {
    let mut choice = None;

    egui::Window::new("Unsaved Changes")
        .collapsible(false)
        .resizable(false)
        .fixed_size([DIALOG_WIDTH, 0.0])
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(dialog_frame(ctx, colors))
        .show(ctx, |ui| {
            ui.label(RichText::new(message).color(colors.text.primary));
            ui.add_space(8.0);
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    choice = Some(ConfirmChoice::Save);
                }
                if ui.button("Discard").clicked() {
                    choice = Some(ConfirmChoice::Discard);
                }
                if ui.button("Cancel").clicked() {
                    choice = Some(ConfirmChoice::Cancel);
                }
            });

            ui.input(|i| {
                if i.key_pressed(Key::Escape) {
                    choice = Some(ConfirmChoice::Cancel);
                } else if i.key_pressed(Key::Enter) {
                    choice = Some(ConfirmChoice::Discard);
                }
            });
        });

    choice
}

/// Show a notice or error. Returns `true` once acknowledged.
pub fn message_dialog(ctx: &egui::Context, modal: &Modal, colors: &ThemeColors) -> bool {
    let mut dismissed = false;
    let (title, title_color) = match modal.kind {
        ModalKind::Notice => ("Notice", colors.accent),
        ModalKind::Error => ("Error", Color32::from_rgb(220, 80, 80)),
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .fixed_size([DIALOG_WIDTH, 0.0])
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .title_bar(false)
        .frame(dialog_frame(ctx, colors))
        .show(ctx, |ui| {
            ui.label(RichText::new(title).strong().size(14.0).color(title_color));
            ui.add_space(6.0);
            ui.label(RichText::new(&modal.message).color(colors.text.primary));
            ui.add_space(8.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
            if ui.input(|i| i.key_pressed(Key::Escape) || i.key_pressed(Key::Enter)) {
                dismissed = true;
            }
        });

    dismissed
}

fn dialog_frame(ctx: &egui::Context, colors: &ThemeColors) -> egui::Frame {
    egui::Frame::window(&ctx.style())
        .fill(colors.base.panel)
        .stroke(Stroke::new(1.0, colors.base.border))
}
