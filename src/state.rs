//! Application state management for Mark It Down
//!
//! This module defines the central `AppState` struct that owns the open
//! document, the view mode, the scroll synchronizer, user settings and UI
//! flags. The eframe app drives it through command methods; nothing here
//! touches egui, so every command is testable with an in-memory file bridge.

use crate::config::{get_config_dir, load_config, save_config_silent, Settings, WindowSize};
use crate::editor::Selection;
use crate::error::Error;
use crate::files::{
    bundled_document, file_name_of, DesktopBridge, FileBridge, GUIDE_PATH, MARKDOWN_OPEN,
    MARKDOWN_SAVE,
};
use crate::markdown::{apply_format, resolve_link, FormatCommand, LinkAction};
use crate::preview::{ScrollSynchronizer, ViewMode, ViewModeController};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Document shown at startup.
pub const DEFAULT_CONTENT: &str = "# Mark It Down\n\n**Mark It Down** is a Markdown reader and editor designed to keep you focused on your text and thoughts.\n\n[Markdown Writing Guide](/MarkdownGuide.md) - Learn the basic syntax here.";

pub const DEFAULT_FILE_NAME: &str = "Opening.md";

/// Buffer after "new file".
pub const NEW_FILE_CONTENT: &str = "# New File\n\nStart writing here...";

pub const UNTITLED_FILE_NAME: &str = "Untitled.md";

const NEW_FILE_CONFIRM: &str =
    "You have unsaved changes. Are you sure you want to create a new file?";

const EXIT_CONFIRM: &str = "You have unsaved changes. Exit anyway?";

const OPEN_UNAVAILABLE: &str = "Open file is only available in the desktop application.";

const SAVE_UNAVAILABLE: &str = "Saving is only available in the desktop application.";

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

/// The single open document.
#[derive(Debug, Clone)]
pub struct Document {
    buffer: String,
    /// Modified since last load or save
    dirty: bool,
    /// Display name, the last path segment when loaded from disk
    file_name: String,
    /// Disk location; `None` for unsaved and bundled documents
    path: Option<PathBuf>,
    /// Bumped on every buffer change, used to cache derived data
    revision: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            buffer: DEFAULT_CONTENT.to_string(),
            dirty: false,
            file_name: DEFAULT_FILE_NAME.to_string(),
            path: None,
            revision: 0,
        }
    }
}

impl Document {
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the buffer with user-edited text. Returns `true` if it changed.
    pub fn edit(&mut self, text: String) -> bool {
        if text == self.buffer {
            return false;
        }
        self.buffer = text;
        self.dirty = true;
        self.revision += 1;
        true
    }

    /// Replace everything with freshly loaded content.
    pub fn load(&mut self, content: String, file_name: String, path: Option<PathBuf>) {
        self.buffer = content;
        self.file_name = file_name;
        self.path = path;
        self.dirty = false;
        self.revision += 1;
    }

    pub fn reset_new(&mut self) {
        self.load(
            NEW_FILE_CONTENT.to_string(),
            UNTITLED_FILE_NAME.to_string(),
            None,
        );
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn set_saved_path(&mut self, path: PathBuf) {
        self.file_name = file_name_of(&path, UNTITLED_FILE_NAME);
        self.path = Some(path);
        self.dirty = false;
    }

    /// `[name]` or `[name *]` when modified.
    pub fn title_label(&self) -> String {
        if self.dirty {
            format!("[{} *]", self.file_name)
        } else {
            format!("[{}]", self.file_name)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// UI-related state flags.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Whether the settings popup is open
    pub show_settings: bool,
    /// Whether the table of contents sidebar is open
    pub show_toc: bool,
    /// Whether a confirmation dialog is open
    pub show_confirm_dialog: bool,
    /// Message for the confirmation dialog
    pub confirm_dialog_message: String,
    /// Pending action after confirmation
    pub pending_action: Option<PendingAction>,
    /// Modal message (error or notice)
    pub modal: Option<Modal>,
    /// Temporary toast message (shown in the status bar)
    pub toast_message: Option<String>,
    /// When the toast message should expire (as seconds since app start)
    pub toast_expires_at: Option<f64>,
}

/// Actions that may need confirmation before execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// Replace the buffer with a new file
    NewFile,
    /// Close the window
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Notice,
    Error,
}

/// A message that needs acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub kind: ModalKind,
    pub message: String,
}

/// Where the preview should scroll on the next frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewJump {
    /// Back to the top, after a document load
    Top,
    /// To the first heading with this anchor id
    Anchor(String),
}

/// Single-flight token for a file operation.
///
/// Completions carrying a token older than the latest one are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOpToken(u64);

// ─────────────────────────────────────────────────────────────────────────────
// Application State
// ─────────────────────────────────────────────────────────────────────────────

/// Central application state struct.
///
/// # Example
///
/// ```ignore
/// let mut state = AppState::new();
/// state.set_mode(ViewMode::Edit);
/// state.edit("# Hello".to_string());
/// state.save();
/// ```
pub struct AppState {
    pub document: Document,
    /// User settings (loaded from config)
    pub settings: Settings,
    /// UI-related state
    pub ui: UiState,
    view: ViewModeController,
    pub sync: ScrollSynchronizer,
    bridge: Box<dyn FileBridge>,
    /// Last selection reported by the editor
    selection: Selection,
    /// Caret to place in the editor on the next frame
    pending_cursor: Option<usize>,
    pending_jump: Option<PreviewJump>,
    /// Latest issued file operation token
    file_generation: u64,
    /// Whether settings have been modified and need saving
    settings_dirty: bool,
    /// Where settings are written; `None` keeps them in memory only
    config_dir: Option<PathBuf>,
}

impl AppState {
    /// Create an AppState with settings loaded from config and the desktop
    /// file bridge.
    pub fn new() -> Self {
        let settings = load_config();
        info!("AppState initialized with settings");
        debug!(
            "Theme: {:?}, accent: {:?}, font size: {}",
            settings.theme, settings.accent_color, settings.font_size
        );
        let config_dir = get_config_dir()
            .map_err(|e| warn!("Settings will not be saved: {}", e))
            .ok();
        Self::with_bridge(settings, Box::new(DesktopBridge)).with_config_dir(config_dir)
    }

    /// Create AppState with custom settings and file bridge.
    pub fn with_bridge(settings: Settings, bridge: Box<dyn FileBridge>) -> Self {
        Self {
            document: Document::default(),
            settings,
            ui: UiState::default(),
            view: ViewModeController::default(),
            sync: ScrollSynchronizer::new(),
            bridge,
            selection: Selection::default(),
            pending_cursor: None,
            pending_jump: None,
            file_generation: 0,
            settings_dirty: false,
            config_dir: None,
        }
    }

    /// Persist settings into `config_dir`.
    pub fn with_config_dir(mut self, config_dir: Option<PathBuf>) -> Self {
        self.config_dir = config_dir;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // View Mode
    // ─────────────────────────────────────────────────────────────────────────

    pub fn mode(&self) -> ViewMode {
        self.view.mode()
    }

    pub fn is_editing(&self) -> bool {
        self.view.is_editing()
    }

    pub fn set_mode(&mut self, mode: ViewMode) -> ViewMode {
        let mode = self.view.set_mode(mode);
        if !mode.layout().scroll_sync {
            self.sync.reset_link();
        }
        mode
    }

    pub fn toggle_edit_preview(&mut self) -> ViewMode {
        let mode = self.view.toggle_edit_preview();
        self.sync.reset_link();
        mode
    }

    fn force_preview(&mut self) {
        self.view.force_preview();
        self.sync.reset_link();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// Take the editor's text for this frame. Marks the document dirty only
    /// when the text actually differs.
    pub fn edit(&mut self, text: String) -> bool {
        self.document.edit(text)
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Wrap the current selection with a formatting command.
    pub fn apply_format(&mut self, command: FormatCommand) {
        let result = apply_format(self.document.buffer(), self.selection, command);
        debug!("Applied {:?}, caret at {}", command, result.cursor);
        self.document.edit(result.text);
        self.selection = Selection::caret(result.cursor);
        self.pending_cursor = Some(result.cursor);
    }

    pub fn insert_indent(&mut self) {
        self.apply_format(FormatCommand::Indent);
    }

    /// Caret position to apply in the editor this frame, if any.
    pub fn take_pending_cursor(&mut self) -> Option<usize> {
        self.pending_cursor.take()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Document Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Start a new file, asking first when there are unsaved changes.
    pub fn new_document(&mut self) {
        if self.document.is_dirty() {
            self.ask_confirmation(PendingAction::NewFile, NEW_FILE_CONFIRM);
        } else {
            self.reset_new_document();
        }
    }

    fn reset_new_document(&mut self) {
        info!("New document");
        self.document.reset_new();
        self.after_document_replaced();
    }

    /// Show the open dialog and load the chosen file.
    pub fn open_file(&mut self) {
        if !self.bridge.dialogs_available() {
            self.show_error_for(&Error::UnsupportedHostCapability(
                OPEN_UNAVAILABLE.to_string(),
            ));
            return;
        }
        let token = self.begin_file_op();
        match self.bridge.open_file_dialog(&[MARKDOWN_OPEN]) {
            Some(path) => self.load_with_token(token, &path),
            None => debug!("Open dialog cancelled"),
        }
    }

    /// Load a document from disk, falling back to bundled documents for
    /// root-relative paths.
    pub fn load_document(&mut self, path: &Path) {
        let token = self.begin_file_op();
        self.load_with_token(token, path);
    }

    /// Load the bundled markdown guide and close the settings popup.
    pub fn load_guide(&mut self) {
        self.load_document(Path::new(GUIDE_PATH));
        self.ui.show_settings = false;
    }

    fn load_with_token(&mut self, token: FileOpToken, path: &Path) {
        match self.bridge.read_text_file(path) {
            Ok(content) => {
                self.complete_load(token, path, content, true);
            }
            Err(e) => {
                let path_str = path.to_string_lossy();
                match bundled_document(&path_str) {
                    Some(content) if path_str.starts_with('/') => {
                        debug!("{} not on disk, using bundled copy", path_str);
                        self.complete_load(token, path, content.to_string(), false);
                    }
                    _ => {
                        error!("Failed to load file: {}", e);
                        self.show_error_for(&e);
                    }
                }
            }
        }
    }

    /// Apply a finished load. Returns `false` if the token is stale.
    ///
    /// `on_disk` is false for bundled documents, which get no path.
    pub fn complete_load(
        &mut self,
        token: FileOpToken,
        path: &Path,
        content: String,
        on_disk: bool,
    ) -> bool {
        if !self.is_current(token) {
            debug!("Discarding stale load of {}", path.display());
            return false;
        }
        let name = file_name_of(path, UNTITLED_FILE_NAME);
        info!("Loaded {} ({} bytes)", path.display(), content.len());
        self.document
            .load(content, name, on_disk.then(|| path.to_path_buf()));
        self.after_document_replaced();
        true
    }

    fn after_document_replaced(&mut self) {
        self.force_preview();
        self.selection = Selection::default();
        self.pending_cursor = None;
        self.pending_jump = Some(PreviewJump::Top);
    }

    /// Write to the current path; without one, or if the write fails, fall
    /// back to save-as.
    pub fn save(&mut self) {
        let Some(path) = self.document.path().map(Path::to_path_buf) else {
            self.save_as();
            return;
        };
        let token = self.begin_file_op();
        match self.bridge.write_text_file(&path, self.document.buffer()) {
            Ok(()) => {
                self.complete_save(token, path, false);
            }
            Err(e) => {
                error!("Save failed: {}", e);
                self.save_as();
            }
        }
    }

    /// Ask for a location, write there and switch to reading.
    pub fn save_as(&mut self) {
        if !self.bridge.dialogs_available() {
            self.show_error_for(&Error::UnsupportedHostCapability(
                SAVE_UNAVAILABLE.to_string(),
            ));
            return;
        }
        let token = self.begin_file_op();
        let Some(path) = self
            .bridge
            .save_file_dialog(self.document.file_name(), &[MARKDOWN_SAVE])
        else {
            debug!("Save dialog cancelled");
            return;
        };
        match self.bridge.write_text_file(&path, self.document.buffer()) {
            Ok(()) => {
                self.complete_save(token, path, true);
            }
            Err(e) => {
                error!("Save As failed: {}", e);
                self.show_error_for(&e);
            }
        }
    }

    /// Apply a finished save. Returns `false` if the token is stale.
    pub fn complete_save(&mut self, token: FileOpToken, path: PathBuf, save_as: bool) -> bool {
        if !self.is_current(token) {
            debug!("Discarding stale save of {}", path.display());
            return false;
        }
        info!("Saved {}", path.display());
        if save_as {
            self.document.set_saved_path(path);
            self.force_preview();
        } else {
            self.document.mark_saved();
        }
        self.show_toast("Saved");
        true
    }

    /// Leave editing without saving. The buffer keeps its changes.
    pub fn discard_editing(&mut self) {
        self.set_mode(ViewMode::Preview);
    }

    fn begin_file_op(&mut self) -> FileOpToken {
        self.file_generation += 1;
        FileOpToken(self.file_generation)
    }

    fn is_current(&self, token: FileOpToken) -> bool {
        token.0 == self.file_generation
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Links & Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Dispatch a clicked link. Returns the URL to hand to the system
    /// browser for external links.
    pub fn follow_link(&mut self, href: &str) -> Option<String> {
        let current = self
            .document
            .path()
            .map(|p| p.to_string_lossy().into_owned());
        match resolve_link(href, current.as_deref()) {
            Some(LinkAction::ScrollToAnchor(anchor)) => {
                self.scroll_to_anchor(anchor);
                None
            }
            Some(LinkAction::OpenExternal(url)) => {
                info!("Opening external link {}", url);
                Some(url)
            }
            Some(LinkAction::LoadDocument(path)) => {
                self.load_document(&path);
                None
            }
            None => {
                debug!("Ignoring link {:?}", href);
                None
            }
        }
    }

    /// Queue a preview jump to a heading. Ignored while the preview is
    /// hidden.
    pub fn scroll_to_anchor(&mut self, anchor: impl Into<String>) {
        let anchor = anchor.into();
        if !self.mode().layout().preview.is_visible() {
            debug!("Preview hidden, ignoring jump to #{}", anchor);
            return;
        }
        debug!("Scroll to anchor #{}", anchor);
        self.pending_jump = Some(PreviewJump::Anchor(anchor));
    }

    pub fn take_pending_jump(&mut self) -> Option<PreviewJump> {
        self.pending_jump.take()
    }

    /// `mark it down - [name *]`
    pub fn window_title(&self) -> String {
        format!("mark it down - {}", self.document.title_label())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a preference change and write it out right away.
    pub fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        f(&mut self.settings);
        self.settings.sanitize();
        self.settings_dirty = true;
        self.save_settings_if_dirty();
    }

    /// Record the window geometry. Written with the next settings save.
    pub fn set_window_size(&mut self, window_size: WindowSize) {
        self.settings.window_size = window_size;
        self.settings.sanitize();
        self.settings_dirty = true;
    }

    pub fn settings_dirty(&self) -> bool {
        self.settings_dirty
    }

    /// Save settings to config file if modified.
    ///
    /// Returns `true` if settings were saved. A failed write keeps the
    /// settings dirty so the next save retries.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if !self.settings_dirty {
            return false;
        }
        let Some(config_dir) = self.config_dir.as_deref() else {
            return false;
        };
        if save_config_silent(config_dir, &self.settings) {
            self.settings_dirty = false;
            debug!("Settings saved");
            true
        } else {
            false
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Confirmation
    // ─────────────────────────────────────────────────────────────────────────

    fn ask_confirmation(&mut self, action: PendingAction, message: &str) {
        self.ui.show_confirm_dialog = true;
        self.ui.confirm_dialog_message = message.to_string();
        self.ui.pending_action = Some(action);
    }

    /// Run the confirmed action. `Exit` is returned for the caller to close
    /// the window.
    pub fn handle_confirmed_action(&mut self) -> Option<PendingAction> {
        let action = self.ui.pending_action.take();
        self.ui.show_confirm_dialog = false;
        self.ui.confirm_dialog_message.clear();
        match action {
            Some(PendingAction::NewFile) => {
                self.reset_new_document();
                None
            }
            Some(PendingAction::Exit) => {
                debug!("Exit confirmed");
                Some(PendingAction::Exit)
            }
            None => None,
        }
    }

    pub fn cancel_pending_action(&mut self) {
        self.ui.pending_action = None;
        self.ui.show_confirm_dialog = false;
        self.ui.confirm_dialog_message.clear();
    }

    /// Request application exit.
    ///
    /// Returns `true` if exit can proceed immediately, `false` if
    /// confirmation is needed.
    pub fn request_exit(&mut self) -> bool {
        if self.document.is_dirty() {
            self.ask_confirmation(PendingAction::Exit, EXIT_CONFIRM);
            false
        } else {
            true
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI State Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_settings(&mut self) {
        self.ui.show_settings = !self.ui.show_settings;
    }

    pub fn toggle_toc(&mut self) {
        self.ui.show_toc = !self.ui.show_toc;
    }

    /// Notices for missing host capabilities, error modal for the rest.
    pub fn show_error_for(&mut self, err: &Error) {
        let kind = if err.is_notice() {
            ModalKind::Notice
        } else {
            ModalKind::Error
        };
        self.ui.modal = Some(Modal {
            kind,
            message: err.to_string(),
        });
    }

    pub fn dismiss_modal(&mut self) {
        self.ui.modal = None;
    }

    /// Show a temporary toast. The expiry is stamped by `update_toast`.
    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.ui.toast_message = Some(message.into());
        self.ui.toast_expires_at = None;
    }

    /// Stamp new toasts and clear expired ones.
    ///
    /// Call this each frame with the current time.
    pub fn update_toast(&mut self, current_time: f64, duration: f64) {
        if self.ui.toast_message.is_none() {
            return;
        }
        match self.ui.toast_expires_at {
            None => self.ui.toast_expires_at = Some(current_time + duration),
            Some(expires_at) if current_time >= expires_at => {
                self.ui.toast_message = None;
                self.ui.toast_expires_at = None;
            }
            Some(_) => {}
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from;
    use crate::error::Result;
    use crate::files::FileFilter;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::io;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// File bridge backed by shared maps, so a test can keep a handle.
    #[derive(Clone, Default)]
    struct MemoryBridge {
        files: Rc<RefCell<HashMap<PathBuf, String>>>,
        readonly: Rc<RefCell<HashSet<PathBuf>>>,
        open_answer: Rc<RefCell<Option<PathBuf>>>,
        save_answer: Rc<RefCell<Option<PathBuf>>>,
        save_dialog_calls: Rc<RefCell<Vec<String>>>,
        no_dialogs: bool,
    }

    impl MemoryBridge {
        fn file(&self, path: &str) -> Option<String> {
            self.files.borrow().get(Path::new(path)).cloned()
        }

        fn put(&self, path: &str, content: &str) {
            self.files
                .borrow_mut()
                .insert(PathBuf::from(path), content.to_string());
        }
    }

    impl FileBridge for MemoryBridge {
        fn dialogs_available(&self) -> bool {
            !self.no_dialogs
        }

        fn open_file_dialog(&self, _filters: &[FileFilter]) -> Option<PathBuf> {
            self.open_answer.borrow().clone()
        }

        fn save_file_dialog(&self, default_name: &str, _filters: &[FileFilter]) -> Option<PathBuf> {
            self.save_dialog_calls
                .borrow_mut()
                .push(default_name.to_string());
            self.save_answer.borrow().clone()
        }

        fn read_text_file(&self, path: &Path) -> Result<String> {
            self.files
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| Error::FileRead {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::NotFound, "not found"),
                })
        }

        fn write_text_file(&self, path: &Path, text: &str) -> Result<()> {
            if self.readonly.borrow().contains(path) {
                return Err(Error::FileWrite {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
                });
            }
            self.files
                .borrow_mut()
                .insert(path.to_path_buf(), text.to_string());
            Ok(())
        }
    }

    fn state_with(bridge: &MemoryBridge) -> AppState {
        AppState::with_bridge(Settings::default(), Box::new(bridge.clone()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Startup
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_initial_state() {
        let state = state_with(&MemoryBridge::default());
        assert_eq!(state.mode(), ViewMode::Preview);
        assert!(!state.document.is_dirty());
        assert_eq!(state.document.file_name(), "Opening.md");
        assert!(state.document.path().is_none());
        assert_eq!(state.document.buffer(), DEFAULT_CONTENT);
        assert_eq!(state.window_title(), "mark it down - [Opening.md]");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing & Saving
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_edit_then_save_end_to_end() {
        let bridge = MemoryBridge::default();
        bridge.put("/docs/note.md", "# Note");
        let mut state = state_with(&bridge);
        state.load_document(Path::new("/docs/note.md"));
        assert_eq!(state.mode(), ViewMode::Preview);
        assert!(!state.document.is_dirty());

        state.set_mode(ViewMode::Edit);
        assert!(state.edit("# Notes".to_string()));
        assert!(state.document.is_dirty());
        assert_eq!(state.window_title(), "mark it down - [note.md *]");

        state.save();
        assert!(!state.document.is_dirty());
        assert_eq!(state.document.buffer(), "# Notes");
        assert_eq!(bridge.file("/docs/note.md").as_deref(), Some("# Notes"));
        assert_eq!(state.mode(), ViewMode::Edit);
        assert_eq!(state.ui.toast_message.as_deref(), Some("Saved"));
    }

    #[test]
    fn test_identical_edit_is_not_dirty() {
        let mut state = state_with(&MemoryBridge::default());
        assert!(!state.edit(DEFAULT_CONTENT.to_string()));
        assert!(!state.document.is_dirty());
    }

    #[test]
    fn test_save_without_path_uses_save_as() {
        let bridge = MemoryBridge::default();
        *bridge.save_answer.borrow_mut() = Some(PathBuf::from("/out/draft.md"));
        let mut state = state_with(&bridge);
        state.set_mode(ViewMode::Split);
        state.edit("draft".to_string());

        state.save();

        assert_eq!(bridge.save_dialog_calls.borrow().as_slice(), ["Opening.md"]);
        assert_eq!(bridge.file("/out/draft.md").as_deref(), Some("draft"));
        assert_eq!(state.document.file_name(), "draft.md");
        assert_eq!(state.document.path(), Some(Path::new("/out/draft.md")));
        assert!(!state.document.is_dirty());
        assert_eq!(state.mode(), ViewMode::Preview);
    }

    #[test]
    fn test_save_as_cancelled_keeps_dirty() {
        let bridge = MemoryBridge::default();
        let mut state = state_with(&bridge);
        state.set_mode(ViewMode::Edit);
        state.edit("changed".to_string());

        state.save_as();

        assert!(state.document.is_dirty());
        assert_eq!(state.mode(), ViewMode::Edit);
        assert!(state.ui.modal.is_none());
    }

    #[test]
    fn test_failed_write_falls_back_to_save_as() {
        let bridge = MemoryBridge::default();
        bridge.put("/locked/a.md", "a");
        bridge
            .readonly
            .borrow_mut()
            .insert(PathBuf::from("/locked/a.md"));
        *bridge.save_answer.borrow_mut() = Some(PathBuf::from("/free/a.md"));
        let mut state = state_with(&bridge);
        state.load_document(Path::new("/locked/a.md"));
        state.edit("b".to_string());

        state.save();

        assert_eq!(bridge.save_dialog_calls.borrow().len(), 1);
        assert_eq!(bridge.file("/free/a.md").as_deref(), Some("b"));
        assert_eq!(state.document.path(), Some(Path::new("/free/a.md")));
        assert!(!state.document.is_dirty());
    }

    #[test]
    fn test_save_as_write_error_shows_modal() {
        let bridge = MemoryBridge::default();
        bridge
            .readonly
            .borrow_mut()
            .insert(PathBuf::from("/ro/x.md"));
        *bridge.save_answer.borrow_mut() = Some(PathBuf::from("/ro/x.md"));
        let mut state = state_with(&bridge);
        state.edit("x".to_string());

        state.save_as();

        assert!(state.document.is_dirty());
        let modal = state.ui.modal.clone().unwrap();
        assert_eq!(modal.kind, ModalKind::Error);
        assert!(modal.message.contains("/ro/x.md"));
    }

    #[test]
    fn test_apply_format_uses_selection() {
        let mut state = state_with(&MemoryBridge::default());
        state.edit("Hello world".to_string());
        state.set_selection(Selection { start: 0, end: 5 });

        state.apply_format(FormatCommand::Bold);

        assert_eq!(state.document.buffer(), "**Hello** world");
        assert_eq!(state.take_pending_cursor(), Some(9));
        assert_eq!(state.take_pending_cursor(), None);
        assert_eq!(state.selection(), Selection::caret(9));
    }

    #[test]
    fn test_insert_indent_sets_dirty() {
        let mut state = state_with(&MemoryBridge::default());
        state.set_selection(Selection::caret(0));
        state.insert_indent();
        assert!(state.document.buffer().starts_with("    # Mark It Down"));
        assert!(state.document.is_dirty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // New / Open / Load
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_new_document_when_clean() {
        let mut state = state_with(&MemoryBridge::default());
        state.set_mode(ViewMode::Edit);
        state.new_document();
        assert_eq!(state.document.buffer(), NEW_FILE_CONTENT);
        assert_eq!(state.document.file_name(), "Untitled.md");
        assert_eq!(state.mode(), ViewMode::Preview);
        assert!(!state.ui.show_confirm_dialog);
    }

    #[test]
    fn test_new_document_when_dirty_asks_first() {
        let mut state = state_with(&MemoryBridge::default());
        state.edit("unsaved".to_string());

        state.new_document();
        assert!(state.ui.show_confirm_dialog);
        assert_eq!(state.ui.confirm_dialog_message, NEW_FILE_CONFIRM);
        assert_eq!(state.document.buffer(), "unsaved");

        state.cancel_pending_action();
        assert!(!state.ui.show_confirm_dialog);
        assert_eq!(state.document.buffer(), "unsaved");

        state.new_document();
        assert_eq!(state.handle_confirmed_action(), None);
        assert_eq!(state.document.buffer(), NEW_FILE_CONTENT);
        assert!(!state.document.is_dirty());
    }

    #[test]
    fn test_request_exit() {
        let mut state = state_with(&MemoryBridge::default());
        assert!(state.request_exit());

        state.edit("unsaved".to_string());
        assert!(!state.request_exit());
        assert_eq!(state.ui.pending_action, Some(PendingAction::Exit));
        assert_eq!(state.handle_confirmed_action(), Some(PendingAction::Exit));
    }

    #[test]
    fn test_open_file() {
        let bridge = MemoryBridge::default();
        bridge.put(r"C:\notes\todo.txt", "- [ ] task");
        *bridge.open_answer.borrow_mut() = Some(PathBuf::from(r"C:\notes\todo.txt"));
        let mut state = state_with(&bridge);
        state.set_mode(ViewMode::Sync);

        state.open_file();

        assert_eq!(state.document.buffer(), "- [ ] task");
        assert_eq!(state.document.file_name(), "todo.txt");
        assert_eq!(state.mode(), ViewMode::Preview);
        assert_eq!(state.take_pending_jump(), Some(PreviewJump::Top));
    }

    #[test]
    fn test_open_without_dialogs_is_notice() {
        let bridge = MemoryBridge {
            no_dialogs: true,
            ..Default::default()
        };
        let mut state = state_with(&bridge);

        state.open_file();

        let modal = state.ui.modal.clone().unwrap();
        assert_eq!(modal.kind, ModalKind::Notice);
        assert_eq!(modal.message, OPEN_UNAVAILABLE);
        state.dismiss_modal();
        assert!(state.ui.modal.is_none());
    }

    #[test]
    fn test_load_falls_back_to_bundled_guide() {
        let mut state = state_with(&MemoryBridge::default());
        state.ui.show_settings = true;

        state.load_guide();

        assert!(state.document.buffer().starts_with("# Markdown Writing Guide"));
        assert_eq!(state.document.file_name(), "MarkdownGuide.md");
        assert!(state.document.path().is_none());
        assert!(!state.ui.show_settings);
    }

    #[test]
    fn test_guide_on_disk_wins() {
        let bridge = MemoryBridge::default();
        bridge.put("/MarkdownGuide.md", "# Local guide");
        let mut state = state_with(&bridge);

        state.load_document(Path::new("/MarkdownGuide.md"));

        assert_eq!(state.document.buffer(), "# Local guide");
        assert_eq!(state.document.path(), Some(Path::new("/MarkdownGuide.md")));
    }

    #[test]
    fn test_load_missing_file_shows_error() {
        let mut state = state_with(&MemoryBridge::default());
        state.edit("keep me".to_string());

        state.load_document(Path::new("/nowhere/missing.md"));

        assert_eq!(state.document.buffer(), "keep me");
        assert_eq!(state.ui.modal.as_ref().map(|m| m.kind), Some(ModalKind::Error));
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut state = state_with(&MemoryBridge::default());
        let first = state.begin_file_op();
        let second = state.begin_file_op();

        assert!(!state.complete_load(first, Path::new("/a.md"), "old".into(), true));
        assert_eq!(state.document.buffer(), DEFAULT_CONTENT);

        assert!(state.complete_load(second, Path::new("/b.md"), "new".into(), true));
        assert_eq!(state.document.buffer(), "new");
        assert!(!state.complete_save(first, PathBuf::from("/a.md"), true));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Links
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_follow_relative_document_link() {
        let bridge = MemoryBridge::default();
        bridge.put("/docs/index.md", "[page](sub/page.md)");
        bridge.put("/docs/sub/page.md", "# Page");
        let mut state = state_with(&bridge);
        state.load_document(Path::new("/docs/index.md"));

        assert_eq!(state.follow_link("sub/page.md"), None);

        assert_eq!(state.document.buffer(), "# Page");
        assert_eq!(state.document.path(), Some(Path::new("/docs/sub/page.md")));
    }

    #[test]
    fn test_follow_anchor_and_external_links() {
        let mut state = state_with(&MemoryBridge::default());
        assert_eq!(state.follow_link("#section-1"), None);
        assert_eq!(
            state.take_pending_jump(),
            Some(PreviewJump::Anchor("section-1".to_string()))
        );

        assert_eq!(
            state.follow_link("https://example.com").as_deref(),
            Some("https://example.com")
        );
        assert_eq!(state.follow_link("mailto:x@example.com"), None);
        assert_eq!(state.document.buffer(), DEFAULT_CONTENT);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // View Mode, Settings, Toasts
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_mode_commands() {
        let mut state = state_with(&MemoryBridge::default());
        assert_eq!(state.toggle_edit_preview(), ViewMode::Edit);
        assert!(state.is_editing());
        assert_eq!(state.set_mode(ViewMode::Sync), ViewMode::Sync);
        assert_eq!(state.toggle_edit_preview(), ViewMode::Preview);

        state.set_mode(ViewMode::Edit);
        state.edit("x".to_string());
        state.discard_editing();
        assert_eq!(state.mode(), ViewMode::Preview);
        assert!(state.document.is_dirty());
    }

    #[test]
    fn test_update_settings_marks_dirty_and_sanitizes() {
        let mut state = state_with(&MemoryBridge::default());
        assert!(!state.settings_dirty());
        state.update_settings(|s| s.font_size = f32::NAN);
        assert!(state.settings_dirty());
        assert_eq!(state.settings.font_size, Settings::DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_update_settings_writes_immediately() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join("markitdown");
        let mut state =
            state_with(&MemoryBridge::default()).with_config_dir(Some(config_dir.clone()));

        state.update_settings(|s| s.font_size = 20.0);

        assert!(!state.settings_dirty());
        let saved = load_config_from(&config_dir.join("settings.json")).unwrap();
        assert_eq!(saved.font_size, 20.0);
    }

    #[test]
    fn test_failed_settings_save_is_retried() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let config_dir = blocker.join("markitdown");
        let mut state =
            state_with(&MemoryBridge::default()).with_config_dir(Some(config_dir.clone()));

        state.update_settings(|s| s.show_stats = true);
        assert!(state.settings_dirty());

        std::fs::remove_file(&blocker).unwrap();
        assert!(state.save_settings_if_dirty());
        assert!(!state.settings_dirty());
        assert!(load_config_from(&config_dir.join("settings.json"))
            .unwrap()
            .show_stats);
    }

    #[test]
    fn test_window_size_is_saved_later() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join("markitdown");
        let mut state =
            state_with(&MemoryBridge::default()).with_config_dir(Some(config_dir.clone()));

        state.set_window_size(WindowSize {
            width: 900.0,
            height: 700.0,
            x: Some(10.0),
            y: Some(20.0),
            maximized: false,
        });
        assert!(state.settings_dirty());
        assert!(!config_dir.join("settings.json").exists());

        assert!(state.save_settings_if_dirty());
        let saved = load_config_from(&config_dir.join("settings.json")).unwrap();
        assert_eq!(saved.window_size.width, 900.0);
    }

    #[test]
    fn test_anchor_jump_ignored_while_preview_hidden() {
        let mut state = state_with(&MemoryBridge::default());
        state.set_mode(ViewMode::Edit);
        state.scroll_to_anchor("mark-it-down");
        assert_eq!(state.take_pending_jump(), None);

        state.set_mode(ViewMode::Split);
        state.scroll_to_anchor("mark-it-down");
        assert_eq!(
            state.take_pending_jump(),
            Some(PreviewJump::Anchor("mark-it-down".to_string()))
        );
    }

    #[test]
    fn test_toast_lifecycle() {
        let mut state = state_with(&MemoryBridge::default());
        state.show_toast("Saved");
        state.update_toast(10.0, 2.0);
        assert_eq!(state.ui.toast_expires_at, Some(12.0));
        state.update_toast(11.0, 2.0);
        assert!(state.ui.toast_message.is_some());
        state.update_toast(12.5, 2.0);
        assert!(state.ui.toast_message.is_none());
    }

    #[test]
    fn test_title_label() {
        let mut doc = Document::default();
        assert_eq!(doc.title_label(), "[Opening.md]");
        doc.edit("x".to_string());
        assert_eq!(doc.title_label(), "[Opening.md *]");
        let before = doc.revision();
        doc.mark_saved();
        assert_eq!(doc.title_label(), "[Opening.md]");
        assert_eq!(doc.revision(), before);
    }
}
