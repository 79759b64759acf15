//! Session log buffer with timestamp rendering and scroll preservation.
//!
//! The renderer owns every line shown in the log view. The TUI feeds the
//! viewport height each frame; everything else (offset, bottom-tracking,
//! capacity) is decided here.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use sermon_core::{Direction, LogEntry};

/// Lines from the bottom that still count as "at the bottom"
pub const SCROLL_TOLERANCE: usize = 5;

/// A log entry with its display text frozen at append time
#[derive(Debug, Clone)]
pub struct LogLine {
    pub entry: LogEntry,
    pub rendered: String,
}

impl LogLine {
    pub fn direction(&self) -> Direction {
        self.entry.direction
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LogViewState
// ─────────────────────────────────────────────────────────────────────────────

/// Scroll position of the log viewport
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogViewState {
    /// First visible line
    pub offset: usize,
    /// Total number of lines
    pub total_lines: usize,
    /// Visible lines (set during render)
    pub visible_lines: usize,
}

impl LogViewState {
    pub fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.visible_lines)
    }

    /// Within [`SCROLL_TOLERANCE`] lines of the bottom
    pub fn is_near_bottom(&self) -> bool {
        self.max_offset() <= self.offset + SCROLL_TOLERANCE
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn page_up(&mut self) {
        let page = self.visible_lines.saturating_sub(2).max(1);
        self.scroll_up(page);
    }

    pub fn page_down(&mut self) {
        let page = self.visible_lines.saturating_sub(2).max(1);
        self.scroll_down(page);
    }

    /// Range of line indices currently on screen
    pub fn visible_range(&self) -> (usize, usize) {
        let start = self.offset.min(self.total_lines);
        let end = (self.offset + self.visible_lines).min(self.total_lines);
        (start, end)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LogRenderer
// ─────────────────────────────────────────────────────────────────────────────

/// Append-only session log with bounded capacity
#[derive(Debug)]
pub struct LogRenderer {
    lines: VecDeque<LogLine>,
    /// Prefix new transmit/receive lines with their observation time
    pub timestamps: bool,
    /// 0 = unbounded
    max_lines: usize,
    pub view: LogViewState,
}

impl Default for LogRenderer {
    fn default() -> Self {
        Self::new(true, 0)
    }
}

impl LogRenderer {
    pub fn new(timestamps: bool, max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            timestamps,
            max_lines,
            view: LogViewState::default(),
        }
    }

    pub fn lines(&self) -> &VecDeque<LogLine> {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Append one entry.
    ///
    /// Follows the bottom only if the viewport was already near it; a
    /// scrolled-up viewport keeps showing the same lines.
    pub fn append(&mut self, entry: LogEntry) {
        let was_at_bottom = self.view.is_near_bottom();

        let rendered = entry.display_line(self.timestamps);
        self.lines.push_back(LogLine { entry, rendered });

        let dropped = self.enforce_capacity();
        self.view.total_lines = self.lines.len();

        if was_at_bottom {
            self.view.scroll_to_bottom();
        } else {
            self.view.offset = self.view.offset.saturating_sub(dropped);
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.append(LogEntry::info(text));
    }

    /// Drop everything, leaving a single note of when it happened.
    pub fn clear(&mut self) {
        self.clear_at(Local::now());
    }

    pub fn clear_at(&mut self, at: DateTime<Local>) {
        self.lines.clear();
        self.view.offset = 0;
        self.view.total_lines = 0;
        self.append(LogEntry::observed(
            Direction::Info,
            format!("// Log cleared at {}", at.format("%H:%M:%S")),
            at,
        ));
    }

    pub fn toggle_timestamps(&mut self) {
        self.timestamps = !self.timestamps;
    }

    /// Record the viewport height from the last frame.
    pub fn set_viewport_height(&mut self, visible: usize) {
        if visible == self.view.visible_lines {
            return;
        }
        let was_at_bottom = self.view.is_near_bottom();
        self.view.visible_lines = visible;
        if was_at_bottom {
            self.view.scroll_to_bottom();
        } else {
            self.view.offset = self.view.offset.min(self.view.max_offset());
        }
    }

    fn enforce_capacity(&mut self) -> usize {
        if self.max_lines == 0 {
            return 0;
        }
        let mut dropped = 0;
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
            dropped += 1;
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn renderer_with_lines(n: usize, visible: usize) -> LogRenderer {
        let mut log = LogRenderer::new(true, 0);
        log.set_viewport_height(visible);
        for i in 0..n {
            log.append(LogEntry::receive(format!("line {i}")));
        }
        log
    }

    #[test]
    fn test_append_follows_bottom() {
        let log = renderer_with_lines(50, 10);
        assert_eq!(log.view.offset, 40);
        assert_eq!(log.view.total_lines, 50);
    }

    #[test]
    fn test_append_never_moves_scrolled_up_view() {
        let mut log = renderer_with_lines(50, 10);
        log.view.scroll_up(20);
        assert_eq!(log.view.offset, 20);

        for _ in 0..30 {
            log.append(LogEntry::receive("more"));
        }
        assert_eq!(log.view.offset, 20);
    }

    #[test]
    fn test_append_within_tolerance_snaps_to_bottom() {
        let mut log = renderer_with_lines(50, 10);
        log.view.scroll_up(5);
        assert_eq!(log.view.offset, 35);

        log.append(LogEntry::receive("next"));
        assert_eq!(log.view.offset, 41);
    }

    #[test]
    fn test_append_just_outside_tolerance_stays() {
        let mut log = renderer_with_lines(50, 10);
        log.view.scroll_up(6);
        log.append(LogEntry::receive("next"));
        assert_eq!(log.view.offset, 34);
    }

    #[test]
    fn test_info_lines_have_no_timestamp() {
        let mut log = LogRenderer::new(true, 0);
        log.info("// Disconnected from server.");
        assert_eq!(log.lines()[0].rendered, "// Disconnected from server.");
    }

    #[test]
    fn test_prefix_frozen_at_append() {
        let mut log = LogRenderer::new(true, 0);
        log.append(LogEntry::receive("OK"));
        log.toggle_timestamps();
        log.append(LogEntry::receive("OK"));

        assert!(log.lines()[0].rendered.starts_with('['));
        assert!(log.lines()[0].rendered.ends_with("]:OK"));
        assert_eq!(log.lines()[1].rendered, "OK");
    }

    #[test]
    fn test_clear_leaves_one_info_entry() {
        let mut log = renderer_with_lines(30, 10);
        let at = Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        log.clear_at(at);

        assert_eq!(log.len(), 1);
        assert_eq!(log.lines()[0].direction(), Direction::Info);
        assert_eq!(log.lines()[0].rendered, "// Log cleared at 07:08:09");
        assert_eq!(log.view.offset, 0);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut log = LogRenderer::new(false, 5);
        log.set_viewport_height(3);
        for i in 0..8 {
            log.append(LogEntry::receive(format!("{i}")));
        }
        assert_eq!(log.len(), 5);
        assert_eq!(log.lines()[0].rendered, "3");
        assert_eq!(log.view.offset, 2);
    }

    #[test]
    fn test_capacity_keeps_scrolled_view_anchored() {
        let mut log = LogRenderer::new(false, 20);
        log.set_viewport_height(5);
        for i in 0..20 {
            log.append(LogEntry::receive(format!("{i}")));
        }
        log.view.scroll_to_top();
        log.view.scroll_down(8);
        assert_eq!(log.lines()[log.view.offset].rendered, "8");

        log.append(LogEntry::receive("20"));
        log.append(LogEntry::receive("21"));
        assert_eq!(log.view.offset, 6);
        assert_eq!(log.lines()[log.view.offset].rendered, "8");
    }

    #[test]
    fn test_viewport_resize_keeps_bottom() {
        let mut log = renderer_with_lines(50, 10);
        log.set_viewport_height(20);
        assert_eq!(log.view.offset, 30);
    }

    #[test]
    fn test_scroll_bounds() {
        let mut log = renderer_with_lines(50, 10);
        log.view.scroll_down(100);
        assert_eq!(log.view.offset, 40);
        log.view.scroll_to_top();
        assert_eq!(log.view.offset, 0);
        log.view.page_down();
        assert_eq!(log.view.offset, 8);
        log.view.page_up();
        assert_eq!(log.view.offset, 0);
        log.view.scroll_to_bottom();
        assert_eq!(log.view.offset, 40);
    }

    #[test]
    fn test_visible_range() {
        let log = renderer_with_lines(50, 10);
        assert_eq!(log.view.visible_range(), (40, 50));
    }
}
