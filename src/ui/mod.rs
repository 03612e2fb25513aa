//! UI components for Mark It Down
//!
//! This module contains the panels and popups drawn around the editor and
//! preview panes.

mod dialogs;
mod settings;
mod status_bar;
mod toc_panel;
mod toolbar;

pub use dialogs::{confirm_dialog, message_dialog, ConfirmChoice};
pub use settings::SettingsPanel;
pub use status_bar::{StatusBar, StatusBarAction, StatusBarInfo, STATUS_BAR_HEIGHT};
pub use toc_panel::TocPanel;
pub use toolbar::{Toolbar, ToolbarAction, TOOLBAR_HEIGHT};
