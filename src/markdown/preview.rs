//! Rendered markdown preview widget
//!
//! Draws a `DisplayTree` inside a vertical `ScrollArea`. Nothing here edits
//! text: clicks on links are reported back to the caller, which resolves
//! them with `links::resolve_link`.

use crate::markdown::render::{Block, DisplayTree, ListItem, Span};
use crate::markdown::syntax::{get_highlighter, highlight_code};
use crate::preview::ScrollMetrics;
use crate::theme::ThemeColors;
use eframe::egui::{
    self, text::LayoutJob, Color32, FontFamily, FontId, Frame, Margin, RichText, Rounding,
    ScrollArea, Sense, TextFormat, Ui, Vec2,
};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Widest the text column gets before it is centered.
pub const MAX_CONTENT_WIDTH: f32 = 720.0;

/// Outer padding around the text column.
const CONTENT_PADDING: f32 = 24.0;

/// Indentation of nested lists and quotes.
const NEST_INDENT: f32 = 20.0;

/// Width reserved for list markers.
const MARKER_WIDTH: f32 = 24.0;

// ─────────────────────────────────────────────────────────────────────────────
// Style & Output
// ─────────────────────────────────────────────────────────────────────────────

/// Typography and colors for the preview.
#[derive(Debug, Clone)]
pub struct PreviewStyle {
    pub font_size: f32,
    pub font_family: FontFamily,
    pub colors: ThemeColors,
}

impl PreviewStyle {
    fn heading_size(&self, level: u8) -> f32 {
        let scale = match level {
            1 => 2.0,
            2 => 1.6,
            3 => 1.3,
            4 => 1.15,
            5 => 1.05,
            _ => 1.0,
        };
        self.font_size * scale
    }
}

/// Result of showing the preview.
#[derive(Debug, Clone, Default)]
pub struct PreviewOutput {
    /// Raw href of a link clicked this frame
    pub clicked_link: Option<String>,
    /// Scroll geometry of the preview pane
    pub metrics: ScrollMetrics,
    /// Anchor id and content-relative y offset of each heading, in order
    pub heading_offsets: Vec<(String, f32)>,
}

impl PreviewOutput {
    /// Offset of the first heading with this anchor id.
    pub fn anchor_offset(&self, anchor_id: &str) -> Option<f32> {
        self.heading_offsets
            .iter()
            .find(|(id, _)| id == anchor_id)
            .map(|(_, y)| *y)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MarkdownPreview Widget
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only rendered view of a markdown document.
///
/// # Example
///
/// ```ignore
/// let output = MarkdownPreview::new(&tree, style)
///     .scroll_to(sync.take_request(ScrollOrigin::Preview))
///     .show(ui);
/// if let Some(href) = output.clicked_link { /* dispatch */ }
/// ```
pub struct MarkdownPreview<'a> {
    tree: &'a DisplayTree,
    style: PreviewStyle,
    id: Option<egui::Id>,
    scroll_to: Option<f32>,
}

impl<'a> MarkdownPreview<'a> {
    pub fn new(tree: &'a DisplayTree, style: PreviewStyle) -> Self {
        Self {
            tree,
            style,
            id: None,
            scroll_to: None,
        }
    }

    pub fn id(mut self, id: egui::Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Force the scroll offset this frame.
    pub fn scroll_to(mut self, offset: Option<f32>) -> Self {
        self.scroll_to = offset;
        self
    }

    pub fn show(self, ui: &mut Ui) -> PreviewOutput {
        let id = self.id.unwrap_or_else(|| ui.id().with("markdown_preview"));

        let mut scroll_area = ScrollArea::vertical()
            .id_source(id)
            .auto_shrink([false, false]);
        if let Some(offset) = self.scroll_to {
            scroll_area = scroll_area.vertical_scroll_offset(offset);
        }

        let mut output = PreviewOutput::default();
        let style = &self.style;
        let tree = self.tree;

        let scroll_output = scroll_area.show(ui, |ui| {
            let origin_y = ui.min_rect().top();
            let available = ui.available_width();
            let column = (available - CONTENT_PADDING * 2.0).clamp(0.0, MAX_CONTENT_WIDTH);
            let side = ((available - column) / 2.0).max(0.0);

            ui.add_space(CONTENT_PADDING);
            ui.horizontal(|ui| {
                ui.add_space(side);
                ui.vertical(|ui| {
                    ui.set_width(column);
                    let mut renderer = BlockRenderer {
                        style,
                        output: &mut output,
                        origin_y,
                        table_count: 0,
                    };
                    renderer.blocks(ui, &tree.blocks, false);
                });
            });
            ui.add_space(CONTENT_PADDING);
        });

        output.metrics = ScrollMetrics::new(
            scroll_output.state.offset.y,
            scroll_output.content_size.y,
            scroll_output.inner_rect.height(),
        );
        output
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Rendering
// ─────────────────────────────────────────────────────────────────────────────

struct BlockRenderer<'s, 'o> {
    style: &'s PreviewStyle,
    output: &'o mut PreviewOutput,
    /// Top of the scroll content, for heading offsets
    origin_y: f32,
    table_count: usize,
}

impl BlockRenderer<'_, '_> {
    fn blocks(&mut self, ui: &mut Ui, blocks: &[Block], quoted: bool) {
        for block in blocks {
            self.block(ui, block, quoted);
        }
    }

    fn block(&mut self, ui: &mut Ui, block: &Block, quoted: bool) {
        let colors = self.style.colors;
        let text_color = if quoted {
            colors.text.quote
        } else {
            colors.text.primary
        };

        match block {
            Block::Heading {
                level,
                anchor_id,
                spans,
            } => {
                ui.add_space(if *level <= 2 { 12.0 } else { 8.0 });
                let size = self.style.heading_size(*level);
                let response = self.inline(ui, spans, size, text_color, true).response;
                self.output
                    .heading_offsets
                    .push((anchor_id.clone(), response.rect.top() - self.origin_y));
                if *level <= 2 {
                    let (rect, _) = ui.allocate_exact_size(
                        Vec2::new(ui.available_width(), 1.0),
                        Sense::hover(),
                    );
                    ui.painter().rect_filled(rect, 0.0, colors.base.border);
                }
                ui.add_space(4.0);
            }
            Block::Paragraph(spans) => {
                self.inline(ui, spans, self.style.font_size, text_color, false);
                ui.add_space(8.0);
            }
            Block::CodeBlock { language, code } => {
                self.code_block(ui, language, code);
                ui.add_space(8.0);
            }
            Block::Quote(children) => {
                ui.horizontal(|ui| {
                    let (rect, _) = ui.allocate_exact_size(
                        Vec2::new(4.0, ui.available_height().max(self.style.font_size)),
                        Sense::hover(),
                    );
                    ui.painter().rect_filled(rect, 2.0, colors.accent);
                    ui.add_space(8.0);
                    ui.vertical(|ui| self.blocks(ui, children, true));
                });
                ui.add_space(8.0);
            }
            Block::List { ordered, items } => {
                for (index, item) in items.iter().enumerate() {
                    let marker = list_marker(*ordered, index, item);
                    self.list_item(ui, &marker, item, quoted);
                }
                ui.add_space(4.0);
            }
            Block::Table {
                header,
                rows,
                ..
            } => {
                self.table(ui, header, rows);
                ui.add_space(8.0);
            }
            Block::Rule => {
                ui.add_space(6.0);
                let (rect, _) =
                    ui.allocate_exact_size(Vec2::new(ui.available_width(), 1.0), Sense::hover());
                ui.painter().rect_filled(rect, 0.0, colors.base.border);
                ui.add_space(6.0);
            }
            Block::Html(html) => {
                ui.label(
                    RichText::new(html)
                        .font(FontId::monospace(self.style.font_size * 0.85))
                        .color(colors.text.muted),
                );
                ui.add_space(8.0);
            }
        }
    }

    fn list_item(&mut self, ui: &mut Ui, marker: &str, item: &ListItem, quoted: bool) {
        let colors = self.style.colors;
        ui.horizontal(|ui| {
            ui.add_space(NEST_INDENT / 2.0);
            ui.allocate_ui(Vec2::new(MARKER_WIDTH, self.style.font_size), |ui| {
                ui.label(
                    RichText::new(marker)
                        .size(self.style.font_size)
                        .color(colors.accent),
                );
            });
            ui.vertical(|ui| {
                ui.spacing_mut().item_spacing.y = 2.0;
                self.blocks(ui, &item.blocks, quoted);
            });
        });
    }

    /// A run of spans in one wrapped row.
    fn inline(
        &mut self,
        ui: &mut Ui,
        spans: &[Span],
        size: f32,
        color: Color32,
        strong: bool,
    ) -> egui::InnerResponse<()> {
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            for span in spans {
                let text = self.span_text(span, size, color, strong);
                match &span.link {
                    Some(href) => {
                        let response = ui.link(text.color(self.style.colors.accent).underline());
                        if response.clicked() {
                            self.output.clicked_link = Some(href.clone());
                        }
                        response.on_hover_text(href.as_str());
                    }
                    None => {
                        ui.label(text);
                    }
                }
            }
        })
    }

    fn span_text(&self, span: &Span, size: f32, color: Color32, strong: bool) -> RichText {
        let colors = self.style.colors;
        let mut text = if span.style.code {
            RichText::new(&span.text)
                .font(FontId::monospace(size * 0.9))
                .background_color(colors.base.code)
        } else {
            RichText::new(&span.text).font(FontId::new(size, self.style.font_family.clone()))
        };
        text = text.color(color);
        if strong || span.style.strong {
            text = text.strong();
        }
        if span.style.emphasis {
            text = text.italics();
        }
        if span.style.strikethrough {
            text = text.strikethrough();
        }
        text
    }

    fn code_block(&mut self, ui: &mut Ui, language: &str, code: &str) {
        let colors = self.style.colors;
        let dark = colors.is_dark();
        let background = get_highlighter()
            .background(dark)
            .unwrap_or(colors.base.code);
        let font_id = FontId::monospace(self.style.font_size * 0.85);

        let mut job = LayoutJob::default();
        let lines = highlight_code(code, language, dark, colors.text.primary);
        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                job.append("\n", 0.0, TextFormat::simple(font_id.clone(), colors.text.primary));
            }
            for segment in &line.segments {
                job.append(
                    &segment.text,
                    0.0,
                    TextFormat {
                        font_id: font_id.clone(),
                        color: segment.foreground,
                        italics: segment.italic,
                        ..Default::default()
                    },
                );
            }
        }

        Frame::none()
            .fill(background)
            .rounding(Rounding::same(6.0))
            .inner_margin(Margin::same(12.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                if !language.is_empty() {
                    ui.label(
                        RichText::new(language)
                            .font(FontId::monospace(self.style.font_size * 0.7))
                            .color(colors.text.muted),
                    );
                }
                ui.label(job);
            });
    }

    fn table(&mut self, ui: &mut Ui, header: &[Vec<Span>], rows: &[Vec<Vec<Span>>]) {
        self.table_count += 1;
        let size = self.style.font_size;
        let color = self.style.colors.text.primary;

        Frame::none()
            .stroke(egui::Stroke::new(1.0, self.style.colors.base.border))
            .rounding(Rounding::same(4.0))
            .inner_margin(Margin::same(8.0))
            .show(ui, |ui| {
                egui::Grid::new(("preview_table", self.table_count))
                    .striped(true)
                    .spacing(Vec2::new(16.0, 6.0))
                    .show(ui, |ui| {
                        for cell in header {
                            self.inline(ui, cell, size, color, true);
                        }
                        ui.end_row();
                        for row in rows {
                            for cell in row {
                                self.inline(ui, cell, size, color, false);
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

/// Marker shown before a list item.
fn list_marker(ordered: Option<usize>, index: usize, item: &ListItem) -> String {
    match (item.task, ordered) {
        (Some(true), _) => "☑".to_string(),
        (Some(false), _) => "☐".to_string(),
        (None, Some(start)) => format!("{}.", start + index),
        (None, None) => "•".to_string(),
    }
}
