//! Table of Contents Side Panel
//!
//! Lists the document's headings, indented by level. Clicking an entry asks
//! the app to scroll the preview to that heading's anchor.

use crate::editor::TocEntry;
use crate::theme::ThemeColors;
use eframe::egui::{self, Response, ScrollArea, Sense, Ui, Vec2};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Width of the panel.
const PANEL_WIDTH: f32 = 240.0;

/// Indentation per heading level.
const INDENT_PER_LEVEL: f32 = 12.0;

/// Height of each entry.
const ITEM_HEIGHT: f32 = 24.0;

const FONT_SIZE: f32 = 12.0;

const EMPTY_MESSAGE: &str = "No headers found";

// ─────────────────────────────────────────────────────────────────────────────
// TocPanelOutput
// ─────────────────────────────────────────────────────────────────────────────

/// Output from the TOC panel indicating user actions.
#[derive(Debug, Clone, Default)]
pub struct TocPanelOutput {
    /// Anchor id of the clicked heading
    pub scroll_to_anchor: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// TocPanel
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct TocPanel;

impl TocPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn show(
        &self,
        ctx: &egui::Context,
        entries: &[TocEntry],
        colors: &ThemeColors,
    ) -> TocPanelOutput {
        let mut output = TocPanelOutput::default();

        egui::SidePanel::right("toc_panel")
            .resizable(false)
            .exact_width(PANEL_WIDTH)
            .frame(
                egui::Frame::none()
                    .fill(colors.base.panel)
                    .inner_margin(egui::Margin::same(12.0))
                    .stroke(egui::Stroke::new(1.0, colors.base.border)),
            )
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new("TABLE OF CONTENTS")
                        .size(10.0)
                        .strong()
                        .color(colors.text.muted),
                );
                ui.add_space(8.0);

                if entries.is_empty() {
                    ui.label(
                        egui::RichText::new(EMPTY_MESSAGE)
                            .size(FONT_SIZE)
                            .italics()
                            .color(colors.text.muted),
                    );
                    return;
                }

                ScrollArea::vertical()
                    .id_source("toc_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.spacing_mut().item_spacing = Vec2::new(0.0, 2.0);
                        for entry in entries {
                            if render_entry(ui, entry, colors).clicked() {
                                output.scroll_to_anchor = Some(entry.anchor_id.clone());
                            }
                        }
                    });
            });

        output
    }
}

fn render_entry(ui: &mut Ui, entry: &TocEntry, colors: &ThemeColors) -> Response {
    let indent = entry.indent_level() as f32 * INDENT_PER_LEVEL;
    let (rect, response) =
        ui.allocate_exact_size(Vec2::new(ui.available_width(), ITEM_HEIGHT), Sense::click());

    if response.hovered() {
        ui.painter()
            .rect_filled(rect, egui::Rounding::same(3.0), colors.base.border);
    }

    let text_x = rect.min.x + 4.0 + indent;
    let title = truncate_text(&entry.text, rect.max.x - text_x - 4.0, FONT_SIZE);
    let (font_id, color) = if entry.level == 1 {
        (egui::FontId::proportional(FONT_SIZE + 1.0), colors.text.primary)
    } else {
        (egui::FontId::proportional(FONT_SIZE), colors.text.muted)
    };

    ui.painter().text(
        egui::pos2(text_x, rect.center().y),
        egui::Align2::LEFT_CENTER,
        &title,
        font_id.clone(),
        color,
    );
    // Level 1 entries are drawn twice with a one-pixel shift for a bold look
    if entry.level == 1 {
        ui.painter().text(
            egui::pos2(text_x + 0.6, rect.center().y),
            egui::Align2::LEFT_CENTER,
            &title,
            font_id,
            color,
        );
    }

    response
        .on_hover_text(entry.text.as_str())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Truncate text to fit within a given width.
fn truncate_text(text: &str, max_width: f32, font_size: f32) -> String {
    // Estimate character width (rough approximation)
    let char_width = font_size * 0.55;
    let max_chars = (max_width / char_width) as usize;

    if text.chars().count() <= max_chars || max_chars < 4 {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars - 1).collect();
        format!("{}…", kept)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Short", 200.0, 12.0), "Short");

        let long = "A very long heading that will not fit in the panel";
        let truncated = truncate_text(long, 67.0, 12.0);
        assert!(truncated.ends_with('…'));
        assert_eq!(truncated.chars().count(), 10);
    }

    #[test]
    fn test_truncate_multibyte() {
        let truncated = truncate_text("Blåbærsyltetøy og æbleskiver", 66.0, 12.0);
        assert!(truncated.starts_with("Blåbær"));
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn test_truncate_tiny_width_keeps_text() {
        assert_eq!(truncate_text("Heading", 10.0, 12.0), "Heading");
    }
}
