//! Main application module for Mark It Down
//!
//! This module implements the eframe App trait, laying out the toolbar,
//! status bar, TOC sidebar and the editor/preview panes, and routing user
//! actions into `AppState`.

use crate::config::WindowSize;
use crate::editor::{extract_toc, EditorWidget, TextStats, TocEntry};
use crate::markdown::{
    render, DisplayTree, FormatCommand, MarkdownPreview, PreviewOutput, PreviewStyle,
};
use crate::preview::{PaneLayout, ScrollMetrics, ScrollOrigin, ViewMode};
use crate::state::{AppState, PendingAction, PreviewJump};
use crate::theme::ThemeManager;
use crate::ui::{
    confirm_dialog, message_dialog, ConfirmChoice, SettingsPanel, StatusBar, StatusBarAction,
    StatusBarInfo, TocPanel, Toolbar, ToolbarAction, STATUS_BAR_HEIGHT, TOOLBAR_HEIGHT,
};
use eframe::egui::{self, Key, Modifiers};
use log::{debug, info, warn};
use std::path::PathBuf;

/// How long a toast stays in the status bar, in seconds.
const TOAST_DURATION: f64 = 2.0;

/// Keyboard shortcut actions that need to be deferred.
///
/// These actions are detected in the input handling closure and executed
/// afterwards to avoid borrow conflicts.
#[derive(Debug, Clone, Copy)]
enum KeyboardAction {
    /// New file (Ctrl+N)
    New,
    /// Open file dialog (Ctrl+O)
    Open,
    /// Save current file (Ctrl+S)
    Save,
    /// Save As dialog (Ctrl+Shift+S)
    SaveAs,
    /// Switch between editing and reading (Ctrl+Enter)
    ToggleEditPreview,
    /// Close the window (Ctrl+Q)
    Quit,
    /// Apply markdown formatting (Ctrl+B, Ctrl+I, Ctrl+1..3)
    Format(FormatCommand),
}

/// Derived data rebuilt only when the document revision changes.
#[derive(Default)]
struct DocumentCache {
    revision: Option<u64>,
    tree: DisplayTree,
    toc: Vec<TocEntry>,
    stats: TextStats,
}

impl DocumentCache {
    fn refresh(&mut self, state: &AppState) {
        let revision = state.document.revision();
        if self.revision == Some(revision) {
            return;
        }
        let buffer = state.document.buffer();
        self.tree = render(buffer);
        self.toc = extract_toc(buffer);
        self.stats = TextStats::from_text(buffer);
        self.revision = Some(revision);
        debug!(
            "Rebuilt preview for revision {} ({} headings)",
            revision,
            self.toc.len()
        );
    }
}

/// The main application struct that holds all state and implements eframe::App.
pub struct MarkItDownApp {
    /// Central application state
    state: AppState,
    /// Theme manager for handling theme and accent switching
    theme_manager: ThemeManager,
    toolbar: Toolbar,
    status_bar: StatusBar,
    settings_panel: SettingsPanel,
    toc_panel: TocPanel,
    cache: DocumentCache,
    /// Preview output from the last frame it was drawn (heading offsets)
    last_preview: PreviewOutput,
    editor_metrics: ScrollMetrics,
    preview_metrics: ScrollMetrics,
    /// Track if we should exit (after confirmation)
    should_exit: bool,
    /// Last title sent to the window
    last_title: String,
    /// Last known window size (for detecting changes)
    last_window_size: Option<egui::Vec2>,
    /// Last known window position (for detecting changes)
    last_window_pos: Option<egui::Pos2>,
    /// Application start time for timing toast messages
    start_time: std::time::Instant,
}

impl MarkItDownApp {
    /// Create the app, applying the saved theme and loading `initial_file`
    /// if one was given on the command line.
    pub fn new(cc: &eframe::CreationContext<'_>, initial_file: Option<PathBuf>) -> Self {
        info!("Initializing Mark It Down");

        let mut state = AppState::new();

        let mut theme_manager =
            ThemeManager::new(state.settings.theme, state.settings.accent_color);
        theme_manager.apply(&cc.egui_ctx);
        info!(
            "Applied initial theme: {:?} / {:?}",
            state.settings.theme, state.settings.accent_color
        );

        if let Some(path) = initial_file {
            info!("Opening {} from command line", path.display());
            state.load_document(&path);
        }

        Self {
            state,
            theme_manager,
            toolbar: Toolbar::new(),
            status_bar: StatusBar::new(),
            settings_panel: SettingsPanel::new(),
            toc_panel: TocPanel::new(),
            cache: DocumentCache::default(),
            last_preview: PreviewOutput::default(),
            editor_metrics: ScrollMetrics::default(),
            preview_metrics: ScrollMetrics::default(),
            should_exit: false,
            last_title: String::new(),
            last_window_size: None,
            last_window_pos: None,
            start_time: std::time::Instant::now(),
        }
    }

    /// Get elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Update window size/position in settings if changed.
    ///
    /// Returns `true` if the window state changed.
    fn update_window_state(&mut self, ctx: &egui::Context) -> bool {
        let mut changed = false;

        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                let current_size = rect.size();
                let current_pos = rect.min;

                let size_changed = self
                    .last_window_size
                    .map(|s| (s - current_size).length() > 1.0)
                    .unwrap_or(true);
                let pos_changed = self
                    .last_window_pos
                    .map(|p| (p - current_pos).length() > 1.0)
                    .unwrap_or(true);

                if size_changed || pos_changed {
                    self.last_window_size = Some(current_size);
                    self.last_window_pos = Some(current_pos);
                    changed = true;
                }
            }
        });

        if changed {
            if let (Some(size), Some(pos)) = (self.last_window_size, self.last_window_pos) {
                let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
                self.state.set_window_size(WindowSize {
                    width: size.x,
                    height: size.y,
                    x: Some(pos.x),
                    y: Some(pos.y),
                    maximized,
                });
                debug!(
                    "Window state updated: {}x{} at ({}, {}), maximized: {}",
                    size.x, size.y, pos.x, pos.y, maximized
                );
            }
        }

        changed
    }

    /// Send the title only when it differs from the last one sent.
    fn update_title(&mut self, ctx: &egui::Context) {
        let title = self.state.window_title();
        if title != self.last_title {
            debug!("Window title: {}", title);
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.last_title = title;
        }
    }

    /// Handle close request from the window.
    ///
    /// Returns `true` if the application should close.
    fn handle_close_request(&mut self) -> bool {
        if self.should_exit {
            return true;
        }
        self.state.request_exit()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Keyboard Shortcuts
    // ─────────────────────────────────────────────────────────────────────────

    /// Consume shortcut keys before the editor sees them.
    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let editing = self.state.is_editing();
        let action = ctx.input_mut(|i| {
            // Ctrl+Shift+S: Save As (check first since it's more specific)
            if i.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::S) {
                return Some(KeyboardAction::SaveAs);
            }
            if i.consume_key(Modifiers::COMMAND, Key::S) {
                return Some(KeyboardAction::Save);
            }
            if i.consume_key(Modifiers::COMMAND, Key::O) {
                return Some(KeyboardAction::Open);
            }
            if i.consume_key(Modifiers::COMMAND, Key::N) {
                return Some(KeyboardAction::New);
            }
            if i.consume_key(Modifiers::COMMAND, Key::Enter) {
                return Some(KeyboardAction::ToggleEditPreview);
            }
            if i.consume_key(Modifiers::COMMAND, Key::Q) {
                return Some(KeyboardAction::Quit);
            }

            if !editing {
                return None;
            }

            let formats = [
                (Key::B, FormatCommand::Bold),
                (Key::I, FormatCommand::Italic),
                (Key::Num1, FormatCommand::Heading(1)),
                (Key::Num2, FormatCommand::Heading(2)),
                (Key::Num3, FormatCommand::Heading(3)),
            ];
            formats
                .into_iter()
                .find(|(key, _)| i.consume_key(Modifiers::COMMAND, *key))
                .map(|(_, command)| KeyboardAction::Format(command))
        });

        if let Some(action) = action {
            debug!("Keyboard shortcut: {:?}", action);
            match action {
                KeyboardAction::New => self.state.new_document(),
                KeyboardAction::Open => self.state.open_file(),
                KeyboardAction::Save => self.state.save(),
                KeyboardAction::SaveAs => self.state.save_as(),
                KeyboardAction::ToggleEditPreview => {
                    self.state.toggle_edit_preview();
                }
                KeyboardAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
                KeyboardAction::Format(command) => self.state.apply_format(command),
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Panels
    // ─────────────────────────────────────────────────────────────────────────

    fn render_toolbar(&mut self, ctx: &egui::Context) {
        let colors = self.theme_manager.colors();
        let mut action = None;

        egui::TopBottomPanel::top("toolbar")
            .exact_height(TOOLBAR_HEIGHT)
            .frame(
                egui::Frame::none()
                    .fill(colors.base.panel)
                    .inner_margin(egui::Margin::symmetric(8.0, 0.0))
                    .stroke(egui::Stroke::new(1.0, colors.base.border)),
            )
            .show(ctx, |ui| {
                action = self.toolbar.show(ui, &colors, self.state.mode());
            });

        match action {
            Some(ToolbarAction::New) => self.state.new_document(),
            Some(ToolbarAction::Open) => self.state.open_file(),
            Some(ToolbarAction::Save) => self.state.save(),
            Some(ToolbarAction::SaveAs) => self.state.save_as(),
            Some(ToolbarAction::Quit) => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            Some(ToolbarAction::Format(command)) => self.state.apply_format(command),
            Some(ToolbarAction::SetMode(mode)) => {
                let mode = self.state.set_mode(mode);
                info!("View mode: {:?}", mode);
            }
            None => {}
        }
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        let colors = self.theme_manager.colors();
        let title_label = self.state.document.title_label();
        let info = StatusBarInfo {
            editing: self.state.is_editing(),
            stats: self.state.settings.show_stats.then_some(self.cache.stats),
            title_label: &title_label,
            toast: self.state.ui.toast_message.as_deref(),
            toc_open: self.state.ui.show_toc,
            settings_open: self.state.ui.show_settings,
        };
        let mut action = None;

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(STATUS_BAR_HEIGHT)
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                action = self.status_bar.show(ui, &info, &colors);
            });

        match action {
            Some(StatusBarAction::Open) => self.state.open_file(),
            Some(StatusBarAction::ToggleToc) => self.state.toggle_toc(),
            Some(StatusBarAction::ToggleSettings) => self.state.toggle_settings(),
            Some(StatusBarAction::Edit) => {
                self.state.set_mode(ViewMode::Edit);
            }
            Some(StatusBarAction::Save) => self.state.save(),
            Some(StatusBarAction::SaveAs) => self.state.save_as(),
            Some(StatusBarAction::DontSave) => self.state.discard_editing(),
            None => {}
        }
    }

    fn render_toc(&mut self, ctx: &egui::Context) {
        if !self.state.ui.show_toc {
            return;
        }
        let colors = self.theme_manager.colors();
        let output = self.toc_panel.show(ctx, &self.cache.toc, &colors);
        if let Some(anchor) = output.scroll_to_anchor {
            self.state.scroll_to_anchor(anchor);
        }
    }

    fn render_settings(&mut self, ctx: &egui::Context) {
        if !self.state.ui.show_settings {
            return;
        }
        let colors = self.theme_manager.colors();
        let mut settings = self.state.settings.clone();
        let output = self.settings_panel.show(ctx, &mut settings, &colors);

        if output.changed {
            self.theme_manager
                .sync(settings.theme, settings.accent_color);
            self.state.update_settings(|current| *current = settings);
        }
        if output.close_requested {
            self.state.ui.show_settings = false;
        }
        if output.load_guide_requested {
            self.state.load_guide();
        }
    }

    /// Editor and preview panes, laid out for the current view mode.
    fn render_central(&mut self, ctx: &egui::Context) {
        let colors = self.theme_manager.colors();
        let layout = self.state.mode().layout();

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(colors.base.background)
                    .inner_margin(egui::Margin::same(8.0)),
            )
            .show(ctx, |ui| {
                if layout.is_split() {
                    ui.columns(2, |columns| {
                        self.show_editor(&mut columns[0]);
                        self.show_preview(&mut columns[1]);
                    });
                } else if layout.editor.is_visible() {
                    self.show_editor(ui);
                } else {
                    self.show_preview(ui);
                }
            });

        self.observe_scroll(layout);
    }

    fn show_editor(&mut self, ui: &mut egui::Ui) {
        let family = self.state.settings.font_family.egui_family();
        let cursor = self.state.take_pending_cursor();
        let mut text = self.state.document.buffer().to_string();

        let output = EditorWidget::new(&mut text)
            .id(egui::Id::new("markitdown_editor"))
            .font_size(self.state.settings.font_size)
            .font_family(family)
            .scroll_to(self.state.sync.take_request(ScrollOrigin::Editor))
            .cursor_to(cursor)
            .show(ui);

        if output.changed {
            self.state.edit(text);
        }
        if let Some(selection) = output.selection {
            self.state.set_selection(selection);
        }
        if output.indent_requested {
            self.state.insert_indent();
        }
        self.editor_metrics = output.metrics;
    }

    fn show_preview(&mut self, ui: &mut egui::Ui) {
        self.cache.refresh(&self.state);

        let jump = match self.state.take_pending_jump() {
            Some(PreviewJump::Top) => Some(0.0),
            Some(PreviewJump::Anchor(anchor)) => {
                let offset = self.last_preview.anchor_offset(&anchor);
                if offset.is_none() {
                    debug!("No heading with anchor #{}", anchor);
                }
                offset
            }
            None => None,
        };
        let scroll_to = jump.or_else(|| self.state.sync.take_request(ScrollOrigin::Preview));

        let style = PreviewStyle {
            font_size: self.state.settings.font_size,
            font_family: self.state.settings.font_family.egui_family(),
            colors: self.theme_manager.colors(),
        };
        let output = MarkdownPreview::new(&self.cache.tree, style)
            .id(egui::Id::new("markitdown_preview"))
            .scroll_to(scroll_to)
            .show(ui);

        self.preview_metrics = output.metrics;
        if let Some(href) = output.clicked_link.as_deref() {
            if let Some(url) = self.state.follow_link(href) {
                if let Err(e) = open::that(&url) {
                    warn!("Failed to open {}: {}", url, e);
                }
            }
        }
        self.last_preview = output;
    }

    fn observe_scroll(&mut self, layout: PaneLayout) {
        self.state
            .sync
            .observe(layout.scroll_sync, self.editor_metrics, self.preview_metrics);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dialogs
    // ─────────────────────────────────────────────────────────────────────────

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        let colors = self.theme_manager.colors();

        if self.state.ui.show_confirm_dialog {
            let message = self.state.ui.confirm_dialog_message.clone();
            match confirm_dialog(ctx, &message, &colors) {
                Some(ConfirmChoice::Save) => {
                    self.state.save();
                    if self.state.document.is_dirty() {
                        // Save was cancelled or failed
                        self.state.cancel_pending_action();
                    } else {
                        self.run_confirmed_action(ctx);
                    }
                }
                Some(ConfirmChoice::Discard) => self.run_confirmed_action(ctx),
                Some(ConfirmChoice::Cancel) => self.state.cancel_pending_action(),
                None => {}
            }
        }

        let dismissed = self
            .state
            .ui
            .modal
            .as_ref()
            .is_some_and(|modal| message_dialog(ctx, modal, &colors));
        if dismissed {
            self.state.dismiss_modal();
        }
    }

    fn run_confirmed_action(&mut self, ctx: &egui::Context) {
        if self.state.handle_confirmed_action() == Some(PendingAction::Exit) {
            self.should_exit = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

impl eframe::App for MarkItDownApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.theme_manager.apply_if_needed(ctx);

        // Update toast message (clear if expired)
        let current_time = self.get_app_time();
        self.state.update_toast(current_time, TOAST_DURATION);
        if self.state.ui.toast_message.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }

        self.update_window_state(ctx);

        if ctx.input(|i| i.viewport().close_requested()) && !self.handle_close_request() {
            // Cancel the close request - we need to show a confirmation dialog
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }

        self.handle_keyboard_shortcuts(ctx);

        self.cache.refresh(&self.state);
        self.render_toolbar(ctx);
        self.render_status_bar(ctx);
        self.render_toc(ctx);
        self.render_central(ctx);
        self.render_settings(ctx);
        self.render_dialogs(ctx);

        self.update_title(ctx);
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.state.save_settings_if_dirty();
    }

    /// Save persistent state.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.state.save_settings_if_dirty();
    }

    fn persist_egui_memory(&self) -> bool {
        true
    }

    /// Auto-save interval in seconds.
    fn auto_save_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::files::{FileBridge, FileFilter};
    use std::path::Path;

    struct NoDialogs;

    impl FileBridge for NoDialogs {
        fn dialogs_available(&self) -> bool {
            false
        }

        fn open_file_dialog(&self, _filters: &[FileFilter]) -> Option<PathBuf> {
            None
        }

        fn save_file_dialog(&self, _default_name: &str, _filters: &[FileFilter]) -> Option<PathBuf> {
            None
        }

        fn read_text_file(&self, path: &Path) -> crate::error::Result<String> {
            Err(crate::error::Error::Application(format!(
                "no file {}",
                path.display()
            )))
        }

        fn write_text_file(&self, _path: &Path, _content: &str) -> crate::error::Result<()> {
            Ok(())
        }
    }

    fn state() -> AppState {
        AppState::with_bridge(Settings::default(), Box::new(NoDialogs))
    }

    #[test]
    fn test_cache_rebuilds_on_revision_change() {
        let mut state = state();
        let mut cache = DocumentCache::default();

        cache.refresh(&state);
        assert_eq!(cache.revision, Some(state.document.revision()));
        assert_eq!(cache.toc.len(), 1);
        assert_eq!(cache.toc[0].text, "Mark It Down");

        state.edit("# One\n\n## Two\n".to_string());
        cache.refresh(&state);
        assert_eq!(cache.toc.len(), 2);
        assert_eq!(cache.tree.heading_anchors(), vec!["one", "two"]);
        assert_eq!(cache.stats.lines, 4);
    }

    #[test]
    fn test_cache_skips_unchanged_revision() {
        let state = state();
        let mut cache = DocumentCache::default();
        cache.refresh(&state);
        cache.toc.clear();

        cache.refresh(&state);
        assert!(cache.toc.is_empty());
    }
}
