//! Markdown to display tree conversion using comrak
//!
//! The preview does not draw comrak's AST directly. `render` flattens it into
//! a small tree of blocks and styled spans that the egui preview can lay out
//! without borrowing the arena. Heading anchor ids follow the same rule as
//! the table of contents so `#fragment` links and TOC clicks resolve.

use comrak::{
    nodes::{AstNode, ListType, NodeValue, TableAlignment},
    parse_document, Arena, Options,
};

use crate::editor::{parse_heading_line, slugify};

// ─────────────────────────────────────────────────────────────────────────────
// Display Tree Types
// ─────────────────────────────────────────────────────────────────────────────

/// Inline styling flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpanStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
}

/// A run of text with one style and an optional link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
    pub link: Option<String>,
}

/// Column alignment in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl From<TableAlignment> for Alignment {
    fn from(align: TableAlignment) -> Self {
        match align {
            TableAlignment::None => Alignment::None,
            TableAlignment::Left => Alignment::Left,
            TableAlignment::Center => Alignment::Center,
            TableAlignment::Right => Alignment::Right,
        }
    }
}

/// One item of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    /// `Some(checked)` for task list items
    pub task: Option<bool>,
    pub blocks: Vec<Block>,
}

/// A block-level element of the rendered document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        anchor_id: String,
        spans: Vec<Span>,
    },
    Paragraph(Vec<Span>),
    CodeBlock {
        language: String,
        code: String,
    },
    Quote(Vec<Block>),
    List {
        /// Start number for ordered lists
        ordered: Option<usize>,
        items: Vec<ListItem>,
    },
    Table {
        alignments: Vec<Alignment>,
        header: Vec<Vec<Span>>,
        rows: Vec<Vec<Vec<Span>>>,
    },
    Rule,
    /// Raw HTML, shown as source
    Html(String),
}

/// The rendered document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayTree {
    pub blocks: Vec<Block>,
}

impl DisplayTree {
    /// Anchor ids of all top-level headings, in order.
    pub fn heading_anchors(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Heading { anchor_id, .. } => Some(anchor_id.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Concatenated text of a span run.
pub fn spans_text(spans: &[Span]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

fn comrak_options() -> Options {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options
}

/// Render markdown into a display tree.
pub fn render(markdown: &str) -> DisplayTree {
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &comrak_options());
    let source_lines: Vec<&str> = markdown.lines().collect();

    let renderer = Renderer {
        source_lines: &source_lines,
    };
    DisplayTree {
        blocks: renderer.blocks(root),
    }
}

struct Renderer<'s> {
    source_lines: &'s [&'s str],
}

impl<'s> Renderer<'s> {
    fn blocks<'a>(&self, parent: &'a AstNode<'a>) -> Vec<Block> {
        parent
            .children()
            .filter_map(|child| self.block(child))
            .collect()
    }

    fn block<'a>(&self, node: &'a AstNode<'a>) -> Option<Block> {
        let ast = node.data.borrow();
        let block = match &ast.value {
            NodeValue::Heading(heading) => {
                let spans = inline_spans(node);
                let anchor_id = self.heading_anchor(ast.sourcepos.start.line, &spans);
                Block::Heading {
                    level: heading.level,
                    anchor_id,
                    spans,
                }
            }
            NodeValue::Paragraph => Block::Paragraph(inline_spans(node)),
            NodeValue::CodeBlock(code) => Block::CodeBlock {
                language: code
                    .info
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_string(),
                code: code.literal.trim_end_matches('\n').to_string(),
            },
            NodeValue::BlockQuote => Block::Quote(self.blocks(node)),
            NodeValue::List(list) => Block::List {
                ordered: match list.list_type {
                    ListType::Ordered => Some(list.start),
                    ListType::Bullet => None,
                },
                items: node.children().map(|item| self.list_item(item)).collect(),
            },
            NodeValue::Table(table) => {
                let mut header = Vec::new();
                let mut rows = Vec::new();
                for row in node.children() {
                    let is_header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
                    let cells: Vec<Vec<Span>> = row.children().map(inline_spans).collect();
                    if is_header {
                        header = cells;
                    } else {
                        rows.push(cells);
                    }
                }
                Block::Table {
                    alignments: table.alignments.iter().map(|a| Alignment::from(*a)).collect(),
                    header,
                    rows,
                }
            }
            NodeValue::ThematicBreak => Block::Rule,
            NodeValue::HtmlBlock(html) => Block::Html(html.literal.trim_end().to_string()),
            _ => return None,
        };
        Some(block)
    }

    fn list_item<'a>(&self, node: &'a AstNode<'a>) -> ListItem {
        let task = match node.data.borrow().value {
            NodeValue::TaskItem(mark) => Some(mark.is_some_and(|c| c == 'x' || c == 'X')),
            _ => None,
        };
        ListItem {
            task,
            blocks: self.blocks(node),
        }
    }

    /// ATX headings take their id from the raw source line, exactly like the
    /// table of contents. Other headings fall back to their rendered text.
    fn heading_anchor(&self, line: usize, spans: &[Span]) -> String {
        line.checked_sub(1)
            .and_then(|idx| self.source_lines.get(idx))
            .and_then(|source| parse_heading_line(source))
            .map(|(_, text)| slugify(&text))
            .unwrap_or_else(|| slugify(spans_text(spans).trim()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Flattening
// ─────────────────────────────────────────────────────────────────────────────

fn inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<Span> {
    let mut spans = Vec::new();
    for child in node.children() {
        collect_inline(child, SpanStyle::default(), None, &mut spans);
    }
    spans
}

fn push_span(spans: &mut Vec<Span>, text: &str, style: SpanStyle, link: Option<&str>) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = spans.last_mut() {
        if last.style == style && last.link.as_deref() == link {
            last.text.push_str(text);
            return;
        }
    }
    spans.push(Span {
        text: text.to_string(),
        style,
        link: link.map(str::to_string),
    });
}

fn collect_inline<'a>(
    node: &'a AstNode<'a>,
    style: SpanStyle,
    link: Option<&str>,
    spans: &mut Vec<Span>,
) {
    let ast = node.data.borrow();
    match &ast.value {
        NodeValue::Text(text) => push_span(spans, text, style, link),
        NodeValue::Code(code) => push_span(
            spans,
            &code.literal,
            SpanStyle {
                code: true,
                ..style
            },
            link,
        ),
        NodeValue::SoftBreak => push_span(spans, " ", style, link),
        NodeValue::LineBreak => push_span(spans, "\n", style, link),
        NodeValue::HtmlInline(html) => push_span(spans, html, style, link),
        NodeValue::Emph => {
            let style = SpanStyle {
                emphasis: true,
                ..style
            };
            for child in node.children() {
                collect_inline(child, style, link, spans);
            }
        }
        NodeValue::Strong => {
            let style = SpanStyle {
                strong: true,
                ..style
            };
            for child in node.children() {
                collect_inline(child, style, link, spans);
            }
        }
        NodeValue::Strikethrough => {
            let style = SpanStyle {
                strikethrough: true,
                ..style
            };
            for child in node.children() {
                collect_inline(child, style, link, spans);
            }
        }
        NodeValue::Link(node_link) => {
            for child in node.children() {
                collect_inline(child, style, Some(&node_link.url), spans);
            }
        }
        NodeValue::Image(image) => {
            let mut alt = Vec::new();
            for child in node.children() {
                collect_inline(child, style, None, &mut alt);
            }
            let label = format!("🖼 {}", spans_text(&alt));
            push_span(spans, &label, style, Some(&image.url));
        }
        _ => {
            for child in node.children() {
                collect_inline(child, style, link, spans);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
