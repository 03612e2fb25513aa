//! Markdown source editor widget
//!
//! Wraps egui's `TextEdit` in a vertical `ScrollArea` and reports what the
//! rest of the app needs: whether the text changed, the current selection
//! and the scroll geometry used for sync scrolling.

use crate::preview::ScrollMetrics;
use eframe::egui::{self, FontFamily, FontId, Key, Modifiers, ScrollArea, TextEdit, Ui};
use log::debug;

/// Selection as a half-open range of character indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn caret(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    /// Build from two cursor ends in any order.
    pub fn from_ends(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Result of showing the editor widget.
pub struct EditorOutput {
    /// Whether the text was modified by typing this frame
    pub changed: bool,
    /// Selection after this frame, if the editor has a cursor
    pub selection: Option<Selection>,
    /// Scroll geometry of the editor pane
    pub metrics: ScrollMetrics,
    /// Tab was pressed while the editor had focus
    pub indent_requested: bool,
}

/// A plain-text markdown editor.
///
/// # Example
///
/// ```ignore
/// let output = EditorWidget::new(&mut text)
///     .font_size(settings.font_size)
///     .scroll_to(sync.take_request(ScrollOrigin::Editor))
///     .show(ui);
/// ```
pub struct EditorWidget<'a> {
    text: &'a mut String,
    font_size: f32,
    font_family: FontFamily,
    id: Option<egui::Id>,
    /// Offset to force this frame
    scroll_to: Option<f32>,
    /// Caret position (character index) to place this frame
    cursor_to: Option<usize>,
}

impl<'a> EditorWidget<'a> {
    pub fn new(text: &'a mut String) -> Self {
        Self {
            text,
            font_size: 16.0,
            font_family: FontFamily::Proportional,
            id: None,
            scroll_to: None,
            cursor_to: None,
        }
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn font_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    pub fn id(mut self, id: egui::Id) -> Self {
        self.id = Some(id);
        self
    }

    pub fn scroll_to(mut self, offset: Option<f32>) -> Self {
        self.scroll_to = offset;
        self
    }

    /// Move the caret to a character index and focus the editor.
    pub fn cursor_to(mut self, index: Option<usize>) -> Self {
        self.cursor_to = index;
        self
    }

    pub fn show(self, ui: &mut Ui) -> EditorOutput {
        let id = self.id.unwrap_or_else(|| ui.id().with("markdown_editor"));
        let font_id = FontId::new(self.font_size, self.font_family.clone());

        if let Some(index) = self.cursor_to {
            let index = index.min(self.text.chars().count());
            let mut state = egui::text_edit::TextEditState::load(ui.ctx(), id).unwrap_or_default();
            let range = egui::text::CCursorRange::one(egui::text::CCursor::new(index));
            state.cursor.set_char_range(Some(range));
            state.store(ui.ctx(), id);
        }

        // Tab indents instead of moving focus
        let has_focus = ui.memory(|m| m.has_focus(id));
        let indent_requested =
            has_focus && ui.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Tab));

        let before = self.text.clone();

        let mut scroll_area = ScrollArea::vertical()
            .id_source(id.with("scroll"))
            .auto_shrink([false, false]);
        if let Some(offset) = self.scroll_to {
            scroll_area = scroll_area.vertical_scroll_offset(offset);
        }

        let text = self.text;
        let scroll_output = scroll_area.show(ui, |ui| {
            TextEdit::multiline(text)
                .id(id)
                .frame(false)
                .lock_focus(true)
                .font(font_id)
                .desired_width(f32::INFINITY)
                .desired_rows(24)
                .margin(egui::Margin::symmetric(24.0, 24.0))
                .show(ui)
        });

        let text_output = scroll_output.inner;
        if self.cursor_to.is_some() {
            text_output.response.request_focus();
        }

        let changed = *text != before;
        if changed {
            debug!("Editor content changed");
        }

        let selection = text_output.cursor_range.map(|range| {
            Selection::from_ends(range.primary.ccursor.index, range.secondary.ccursor.index)
        });

        let metrics = ScrollMetrics::new(
            scroll_output.state.offset.y,
            scroll_output.content_size.y,
            scroll_output.inner_rect.height(),
        );

        EditorOutput {
            changed,
            selection,
            metrics,
            indent_requested,
        }
    }
}
