//! Screen layout definitions for the TUI

use ratatui::layout::{Constraint, Layout, Rect};

/// Header: top border + title row + bottom border
const HEADER_HEIGHT: u16 = 3;

/// Control panel: borders + three rows of controls
const CONTROLS_HEIGHT: u16 = 5;

const STATUS_HEIGHT: u16 = 1;

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Title, server and RX/TX indicators
    pub header: Rect,

    /// Port, send and timed-send controls
    pub controls: Rect,

    /// Session log (remaining space)
    pub logs: Rect,

    /// One-line status
    pub status: Rect,
}

/// Split the terminal into header, controls, log and status bar.
pub fn create(area: Rect) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Length(CONTROLS_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        controls: chunks[1],
        logs: chunks[2],
        status: chunks[3],
    }
}
