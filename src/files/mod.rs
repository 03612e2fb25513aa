//! File operations module for Mark It Down
//!
//! The `FileBridge` trait is everything the application needs from the host:
//! native open/save dialogs and whole-file text reads and writes. Documents
//! bundled into the binary (the markdown guide) live in `assets`.

mod assets;
mod bridge;
pub mod dialogs;

pub use assets::{bundled_document, GUIDE_PATH};
pub use bridge::{file_name_of, DesktopBridge, FileBridge, FileFilter, MARKDOWN_OPEN, MARKDOWN_SAVE};
