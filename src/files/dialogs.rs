//! Native file dialog integration using the rfd crate
//!
//! Blocking dialogs, called from the UI thread between frames.

use super::FileFilter;
use rfd::FileDialog;
use std::path::PathBuf;

fn with_filters(mut dialog: FileDialog, filters: &[FileFilter]) -> FileDialog {
    for filter in filters {
        dialog = dialog.add_filter(filter.name, filter.extensions);
    }
    dialog
}

/// Opens a native file picker for a single file.
///
/// Returns `Some(PathBuf)` if a file was selected, `None` if cancelled.
pub fn open_file_dialog(filters: &[FileFilter]) -> Option<PathBuf> {
    with_filters(FileDialog::new().set_title("Open File"), filters).pick_file()
}

/// Opens a native save dialog with `default_name` prefilled.
///
/// Returns `Some(PathBuf)` if a location was selected, `None` if cancelled.
pub fn save_file_dialog(default_name: &str, filters: &[FileFilter]) -> Option<PathBuf> {
    with_filters(FileDialog::new().set_title("Save File"), filters)
        .set_file_name(default_name)
        .save_file()
}
