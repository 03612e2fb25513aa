//! Markdown rendering module
//!
//! Everything between the raw buffer and the rendered preview, built on
//! comrak (CommonMark + GFM) and syntect.
//!
//! # Features
//! - Render markdown into a `DisplayTree` with heading anchors
//! - Draw the tree as an egui preview with highlighted code blocks
//! - Resolve clicked links into anchor, external, or document actions
//! - Toolbar formatting insertions
//!
//! # Example
//! ```ignore
//! use crate::markdown::{render, resolve_link, MarkdownPreview};
//!
//! let tree = render("# Hello\n\nThis is **bold** text.");
//! let output = MarkdownPreview::new(&tree, style).show(ui);
//! if let Some(href) = output.clicked_link {
//!     let action = resolve_link(&href, current_path);
//! }
//! ```

pub mod formatting;
pub mod links;
mod preview;
pub mod render;
pub mod syntax;

pub use formatting::{apply_format, FormatCommand};
pub use links::{resolve_link, LinkAction};
pub use preview::{MarkdownPreview, PreviewOutput, PreviewStyle};
pub use render::{render, DisplayTree};
