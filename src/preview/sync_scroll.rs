//! Proportional sync scrolling between the editor and the preview
//!
//! When one pane scrolls, the other is moved to the same relative position:
//! `offset / (content_height - viewport_height)`.
//!
//! # Feedback loop prevention
//!
//! Moving the target pane produces a scroll event on that pane in the next
//! frame. The synchronizer remembers which pane it last moved
//! (`last_applied_to`) and swallows exactly one event from that pane, so the
//! two handlers never ping-pong.
//!
//! # Usage
//!
//! ```ignore
//! let editor_offset = sync.take_request(ScrollOrigin::Editor);
//! let preview_offset = sync.take_request(ScrollOrigin::Preview);
//! // ... show both panes, forcing those offsets when present ...
//! sync.observe(layout.scroll_sync, editor_metrics, preview_metrics);
//! ```

use log::debug;

/// Offsets closer than this are considered already in sync.
pub const MIN_SCROLL_DELTA: f32 = 1.0;

// ─────────────────────────────────────────────────────────────────────────────
// Scroll Origin
// ─────────────────────────────────────────────────────────────────────────────

/// One of the two scrollable panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOrigin {
    Editor,
    Preview,
}

impl ScrollOrigin {
    /// The pane on the other side.
    pub fn other(&self) -> Self {
        match self {
            ScrollOrigin::Editor => ScrollOrigin::Preview,
            ScrollOrigin::Preview => ScrollOrigin::Editor,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scroll Metrics
// ─────────────────────────────────────────────────────────────────────────────

/// Scroll geometry of a pane, as reported by its scroll area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top
    pub offset: f32,
    /// Total height of the scrolled content
    pub content_height: f32,
    /// Height of the visible region
    pub viewport_height: f32,
}

impl ScrollMetrics {
    pub fn new(offset: f32, content_height: f32, viewport_height: f32) -> Self {
        Self {
            offset,
            content_height,
            viewport_height,
        }
    }

    /// Largest reachable offset. Zero when the content fits.
    pub fn scroll_range(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    /// Relative position in `[0, 1]`. Zero when there is nothing to scroll.
    pub fn ratio(&self) -> f32 {
        let range = self.scroll_range();
        if range <= 0.0 || !self.offset.is_finite() {
            return 0.0;
        }
        (self.offset / range).clamp(0.0, 1.0)
    }

    /// Offset that puts this pane at `ratio`.
    pub fn offset_for_ratio(&self, ratio: f32) -> f32 {
        ratio * self.scroll_range()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scroll Request
// ─────────────────────────────────────────────────────────────────────────────

/// An offset the UI should apply to `target` in the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub target: ScrollOrigin,
    pub offset: f32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Synchronizer
// ─────────────────────────────────────────────────────────────────────────────

/// Links the scroll positions of the two panes.
#[derive(Debug, Default)]
pub struct ScrollSynchronizer {
    /// Pane most recently moved by the synchronizer; its next event is ignored
    last_applied_to: Option<ScrollOrigin>,
    /// Offset waiting to be applied to a pane
    pending: Option<ScrollRequest>,
    /// Offsets observed in the previous frame, used to detect scroll events
    last_editor_offset: Option<f32>,
    last_preview_offset: Option<f32>,
}

impl ScrollSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a scroll event from `source`.
    ///
    /// Returns the offset to apply to the other pane, or `None` when the
    /// event was swallowed, sync is inactive, or the panes already agree.
    pub fn on_scroll(
        &mut self,
        active: bool,
        source: ScrollOrigin,
        source_metrics: ScrollMetrics,
        target_metrics: ScrollMetrics,
    ) -> Option<ScrollRequest> {
        if !active {
            return None;
        }

        if self.last_applied_to == Some(source) {
            self.last_applied_to = None;
            return None;
        }

        let target = source.other();
        let desired = target_metrics.offset_for_ratio(source_metrics.ratio());
        if (target_metrics.offset - desired).abs() <= MIN_SCROLL_DELTA {
            return None;
        }

        self.last_applied_to = Some(target);
        Some(ScrollRequest {
            target,
            offset: desired,
        })
    }

    /// Feed both panes' metrics after they were drawn this frame.
    ///
    /// A change in a pane's offset since the previous frame counts as a scroll
    /// event. Any resulting request is held until `take_request`.
    pub fn observe(&mut self, active: bool, editor: ScrollMetrics, preview: ScrollMetrics) {
        let editor_moved = Self::moved(&mut self.last_editor_offset, editor.offset);
        let preview_moved = Self::moved(&mut self.last_preview_offset, preview.offset);

        if !active {
            self.reset_link();
            return;
        }

        if editor_moved {
            if let Some(request) = self.on_scroll(true, ScrollOrigin::Editor, editor, preview) {
                debug!("Sync scroll: editor -> preview at {:.1}", request.offset);
                self.pending = Some(request);
                return;
            }
        }

        if preview_moved {
            if let Some(request) = self.on_scroll(true, ScrollOrigin::Preview, preview, editor) {
                debug!("Sync scroll: preview -> editor at {:.1}", request.offset);
                self.pending = Some(request);
            }
        }
    }

    /// Take the offset queued for `pane`, if any.
    pub fn take_request(&mut self, pane: ScrollOrigin) -> Option<f32> {
        match self.pending {
            Some(request) if request.target == pane => {
                self.pending = None;
                Some(request.offset)
            }
            _ => None,
        }
    }

    /// Forget the link marker and any queued request.
    ///
    /// Called when sync is inactive and when the document is replaced.
    pub fn reset_link(&mut self) {
        self.last_applied_to = None;
        self.pending = None;
    }

    /// Pane whose next scroll event will be ignored.
    pub fn last_applied_to(&self) -> Option<ScrollOrigin> {
        self.last_applied_to
    }

    fn moved(last: &mut Option<f32>, offset: f32) -> bool {
        let moved = matches!(*last, Some(prev) if (prev - offset).abs() > f32::EPSILON);
        *last = Some(offset);
        moved
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(offset: f32) -> ScrollMetrics {
        ScrollMetrics::new(offset, 2000.0, 500.0)
    }

    fn preview(offset: f32) -> ScrollMetrics {
        ScrollMetrics::new(offset, 4000.0, 1000.0)
    }

    #[test]
    fn test_ratio_zero_when_no_overflow() {
        let metrics = ScrollMetrics::new(0.0, 300.0, 300.0);
        assert_eq!(metrics.ratio(), 0.0);
        let metrics = ScrollMetrics::new(10.0, 100.0, 300.0);
        assert_eq!(metrics.ratio(), 0.0);
        assert!(!metrics.ratio().is_nan());
    }

    #[test]
    fn test_ratio_is_clamped() {
        assert_eq!(editor(3000.0).ratio(), 1.0);
        assert_eq!(editor(-5.0).ratio(), 0.0);
        assert_eq!(editor(750.0).ratio(), 0.5);
    }

    #[test]
    fn test_convergence() {
        let mut sync = ScrollSynchronizer::new();
        let request = sync
            .on_scroll(true, ScrollOrigin::Editor, editor(750.0), preview(0.0))
            .expect("preview should follow");
        assert_eq!(request.target, ScrollOrigin::Preview);

        let applied = ScrollMetrics::new(request.offset, 4000.0, 1000.0);
        assert!((applied.ratio() - 0.5).abs() * applied.scroll_range() <= MIN_SCROLL_DELTA);
    }

    #[test]
    fn test_convergence_various_geometries() {
        for &(content, viewport) in &[(1000.0, 200.0), (501.0, 500.0), (90000.0, 700.0)] {
            let mut sync = ScrollSynchronizer::new();
            let source = ScrollMetrics::new(300.0, 2000.0, 400.0);
            let target = ScrollMetrics::new(0.0, content, viewport);
            let desired = target.offset_for_ratio(source.ratio());
            match sync.on_scroll(true, ScrollOrigin::Preview, source, target) {
                Some(request) => assert!((request.offset - desired).abs() <= MIN_SCROLL_DELTA),
                None => assert!(desired <= MIN_SCROLL_DELTA),
            }
        }
    }

    #[test]
    fn test_idempotent_when_already_aligned() {
        let mut sync = ScrollSynchronizer::new();
        // Both at ratio 0.5, preview off by less than a pixel
        let result = sync.on_scroll(true, ScrollOrigin::Editor, editor(750.0), preview(1500.5));
        assert!(result.is_none());
        assert!(sync.last_applied_to().is_none());
    }

    #[test]
    fn test_zero_overflow_source_moves_target_to_top_only() {
        let mut sync = ScrollSynchronizer::new();
        let flat = ScrollMetrics::new(0.0, 500.0, 500.0);
        assert!(sync
            .on_scroll(true, ScrollOrigin::Editor, flat, preview(0.0))
            .is_none());
    }

    #[test]
    fn test_inert_when_inactive() {
        let mut sync = ScrollSynchronizer::new();
        assert!(sync
            .on_scroll(false, ScrollOrigin::Editor, editor(750.0), preview(0.0))
            .is_none());
        assert!(sync.last_applied_to().is_none());
    }

    #[test]
    fn test_echo_is_swallowed_once() {
        let mut sync = ScrollSynchronizer::new();
        let request = sync
            .on_scroll(true, ScrollOrigin::Editor, editor(750.0), preview(0.0))
            .unwrap();
        assert_eq!(sync.last_applied_to(), Some(ScrollOrigin::Preview));

        // The echo from the preview is ignored and the marker cleared
        let echo = ScrollMetrics::new(request.offset, 4000.0, 1000.0);
        assert!(sync
            .on_scroll(true, ScrollOrigin::Preview, echo, editor(0.0))
            .is_none());
        assert!(sync.last_applied_to().is_none());

        // A genuine preview scroll afterwards syncs back to the editor
        let request = sync
            .on_scroll(true, ScrollOrigin::Preview, preview(3000.0), editor(750.0))
            .unwrap();
        assert_eq!(request.target, ScrollOrigin::Editor);
        assert_eq!(request.offset, 1500.0);
    }

    #[test]
    fn test_observe_frame_loop() {
        let mut sync = ScrollSynchronizer::new();

        // First frame only records offsets
        sync.observe(true, editor(0.0), preview(0.0));
        assert!(sync.take_request(ScrollOrigin::Preview).is_none());

        // User scrolls the editor
        sync.observe(true, editor(750.0), preview(0.0));
        assert!(sync.take_request(ScrollOrigin::Editor).is_none());
        let offset = sync.take_request(ScrollOrigin::Preview).unwrap();
        assert_eq!(offset, 1500.0);
        assert!(sync.take_request(ScrollOrigin::Preview).is_none());

        // Next frame the preview reports the applied offset; no new request
        sync.observe(true, editor(750.0), preview(offset));
        assert!(sync.take_request(ScrollOrigin::Editor).is_none());
        assert!(sync.last_applied_to().is_none());
    }

    #[test]
    fn test_observe_inactive_clears_link() {
        let mut sync = ScrollSynchronizer::new();
        sync.observe(true, editor(0.0), preview(0.0));
        sync.observe(true, editor(750.0), preview(0.0));
        assert!(sync.last_applied_to().is_some());

        sync.observe(false, editor(750.0), preview(0.0));
        assert!(sync.last_applied_to().is_none());
        assert!(sync.take_request(ScrollOrigin::Preview).is_none());
    }

    #[test]
    fn test_origin_other() {
        assert_eq!(ScrollOrigin::Editor.other(), ScrollOrigin::Preview);
        assert_eq!(ScrollOrigin::Preview.other(), ScrollOrigin::Editor);
    }
}
