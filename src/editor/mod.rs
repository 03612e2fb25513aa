//! Editor module for Mark It Down
//!
//! The source text editor widget plus the text-derived data shown next to
//! it: the table of contents and the document statistics.

mod outline;
mod stats;
mod widget;

pub use outline::{extract_toc, parse_heading_line, slugify, TocEntry};
pub use stats::TextStats;
pub use widget::{EditorWidget, Selection};
