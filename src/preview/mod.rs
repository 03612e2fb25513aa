//! Pane layout and sync scrolling
//!
//! The view mode decides which of the editor and preview panes are visible;
//! in `Sync` mode their scroll positions are kept proportional.

mod layout;
mod sync_scroll;

pub use layout::{PaneLayout, ViewMode, ViewModeController};
pub use sync_scroll::{ScrollMetrics, ScrollOrigin, ScrollSynchronizer};
