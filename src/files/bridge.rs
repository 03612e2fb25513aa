//! Host file bridge
//!
//! `DesktopBridge` talks to the real filesystem and rfd dialogs. Tests use
//! an in-memory implementation of the same trait.

use super::dialogs;
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Name and extensions shown in a dialog's file type list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

/// Filter for the open dialog.
pub const MARKDOWN_OPEN: FileFilter = FileFilter {
    name: "Markdown",
    extensions: &["md", "txt"],
};

/// Filter for the save-as dialog.
pub const MARKDOWN_SAVE: FileFilter = FileFilter {
    name: "Markdown",
    extensions: &["md"],
};

/// Everything the application needs from the host for file handling.
///
/// Dialog methods return `None` when the user cancels.
pub trait FileBridge {
    /// Whether native dialogs can be shown at all.
    fn dialogs_available(&self) -> bool;

    fn open_file_dialog(&self, filters: &[FileFilter]) -> Option<PathBuf>;

    fn save_file_dialog(&self, default_name: &str, filters: &[FileFilter]) -> Option<PathBuf>;

    fn read_text_file(&self, path: &Path) -> Result<String>;

    fn write_text_file(&self, path: &Path, text: &str) -> Result<()>;
}

/// Native dialogs and `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopBridge;

impl FileBridge for DesktopBridge {
    fn dialogs_available(&self) -> bool {
        true
    }

    fn open_file_dialog(&self, filters: &[FileFilter]) -> Option<PathBuf> {
        dialogs::open_file_dialog(filters)
    }

    fn save_file_dialog(&self, default_name: &str, filters: &[FileFilter]) -> Option<PathBuf> {
        dialogs::save_file_dialog(default_name, filters)
    }

    fn read_text_file(&self, path: &Path) -> Result<String> {
        debug!("Reading {}", path.display());
        fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_text_file(&self, path: &Path, text: &str) -> Result<()> {
        debug!("Writing {} bytes to {}", text.len(), path.display());
        fs::write(path, text).map_err(|source| Error::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Last segment of a path split on `/` or `\`, or `fallback` when empty.
///
/// Splits on both separators regardless of platform so Windows paths typed
/// into links behave the same everywhere.
pub fn file_name_of(path: &Path, fallback: &str) -> String {
    let path = path.to_string_lossy();
    match path.rsplit(['/', '\\']).next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_desktop_read_write_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.md");
        let bridge = DesktopBridge;

        bridge.write_text_file(&path, "# Note\n\nblåbær").unwrap();
        assert_eq!(bridge.read_text_file(&path).unwrap(), "# Note\n\nblåbær");
    }

    #[test]
    fn test_desktop_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.md");

        let err = DesktopBridge.read_text_file(&path).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
        assert!(err.to_string().contains("missing.md"));
    }

    #[test]
    fn test_desktop_write_into_missing_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join("out.md");

        let err = DesktopBridge.write_text_file(&path, "x").unwrap_err();
        assert!(matches!(err, Error::FileWrite { .. }));
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of(Path::new("/docs/a.md"), "Untitled.md"), "a.md");
        assert_eq!(
            file_name_of(Path::new(r"C:\Users\me\notes.txt"), "Untitled.md"),
            "notes.txt"
        );
        assert_eq!(file_name_of(Path::new("plain.md"), "Untitled.md"), "plain.md");
        assert_eq!(file_name_of(Path::new("/docs/"), "Untitled.md"), "Untitled.md");
    }

    #[test]
    fn test_filters() {
        assert_eq!(MARKDOWN_OPEN.extensions, &["md", "txt"]);
        assert_eq!(MARKDOWN_SAVE.extensions, &["md"]);
    }
}
