//! View modes and pane layout
//!
//! Four modes decide which panes are on screen and whether their scroll
//! positions are linked:
//!
//! | Mode    | Editor | Preview | Scroll sync |
//! |---------|--------|---------|-------------|
//! | Edit    | full   | hidden  | no          |
//! | Split   | half   | half    | no          |
//! | Sync    | half   | half    | yes         |
//! | Preview | hidden | full    | no          |

use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// View Mode
// ─────────────────────────────────────────────────────────────────────────────

/// Which panes are visible and whether they scroll together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Editor only
    Edit,
    /// Editor and preview side by side
    Split,
    /// Editor and preview side by side with linked scrolling
    Sync,
    /// Rendered preview only
    #[default]
    Preview,
}

impl ViewMode {
    /// All modes in toolbar order.
    pub fn all() -> &'static [ViewMode] {
        &[ViewMode::Edit, ViewMode::Split, ViewMode::Sync, ViewMode::Preview]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Edit => "Edit",
            ViewMode::Split => "Split",
            ViewMode::Sync => "Sync",
            ViewMode::Preview => "Preview",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ViewMode::Edit => "✏",
            ViewMode::Split => "◫",
            ViewMode::Sync => "🔗",
            ViewMode::Preview => "👁",
        }
    }

    /// Any mode that shows the editor counts as editing.
    pub fn is_editing(&self) -> bool {
        !matches!(self, ViewMode::Preview)
    }

    /// Pane arrangement for this mode.
    pub fn layout(&self) -> PaneLayout {
        match self {
            ViewMode::Edit => PaneLayout {
                editor: PaneWidth::Full,
                preview: PaneWidth::Hidden,
                scroll_sync: false,
            },
            ViewMode::Split => PaneLayout {
                editor: PaneWidth::Half,
                preview: PaneWidth::Half,
                scroll_sync: false,
            },
            ViewMode::Sync => PaneLayout {
                editor: PaneWidth::Half,
                preview: PaneWidth::Half,
                scroll_sync: true,
            },
            ViewMode::Preview => PaneLayout {
                editor: PaneWidth::Hidden,
                preview: PaneWidth::Full,
                scroll_sync: false,
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pane Layout
// ─────────────────────────────────────────────────────────────────────────────

/// Share of the central area given to a pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneWidth {
    Hidden,
    Half,
    Full,
}

impl PaneWidth {
    pub fn is_visible(&self) -> bool {
        !matches!(self, PaneWidth::Hidden)
    }
}

/// Visibility of both panes plus the scroll link flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneLayout {
    pub editor: PaneWidth,
    pub preview: PaneWidth,
    pub scroll_sync: bool,
}

impl PaneLayout {
    /// Both panes share the central area.
    pub fn is_split(&self) -> bool {
        self.editor.is_visible() && self.preview.is_visible()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Controller
// ─────────────────────────────────────────────────────────────────────────────

/// Holds the active view mode. Every transition is valid.
#[derive(Debug, Clone, Default)]
pub struct ViewModeController {
    mode: ViewMode,
}

impl ViewModeController {
    pub fn new(mode: ViewMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn layout(&self) -> PaneLayout {
        self.mode.layout()
    }

    pub fn is_editing(&self) -> bool {
        self.mode.is_editing()
    }

    /// Switch to `requested` and return the new mode.
    pub fn set_mode(&mut self, requested: ViewMode) -> ViewMode {
        if self.mode != requested {
            debug!("View mode: {:?} -> {:?}", self.mode, requested);
        }
        self.mode = requested;
        self.mode
    }

    /// Flip between `Preview` and `Edit`. Never lands on `Split` or `Sync`.
    pub fn toggle_edit_preview(&mut self) -> ViewMode {
        let next = if self.mode.is_editing() {
            ViewMode::Preview
        } else {
            ViewMode::Edit
        };
        self.set_mode(next)
    }

    /// Used after new/open/save-as complete.
    pub fn force_preview(&mut self) -> ViewMode {
        self.set_mode(ViewMode::Preview)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
