//! Semantic style builders.

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use sermon_core::{ConnectionState, Direction};

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

// --- Border styles ---
pub fn border_inactive() -> Style {
    Style::default().fg(palette::BORDER_DIM)
}

pub fn border_active() -> Style {
    Style::default().fg(palette::BORDER_ACTIVE)
}

pub fn accent_bold() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// "Black on Cyan" - the focused control
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Style of a control given its focus and enablement
pub fn control(focused: bool, enabled: bool) -> Style {
    match (focused, enabled) {
        (_, false) => text_muted(),
        (true, true) => focused_selected(),
        (false, true) => text_primary(),
    }
}

/// Icon, label and style for the connection state
pub fn connection_indicator(state: ConnectionState) -> (&'static str, &'static str, Style) {
    match state {
        ConnectionState::Disconnected => (
            "○",
            "Disconnected",
            Style::default().fg(palette::TEXT_MUTED),
        ),
        ConnectionState::Connecting => (
            "◐",
            "Connecting",
            Style::default().fg(palette::STATUS_YELLOW),
        ),
        ConnectionState::Connected => (
            "●",
            "Connected",
            Style::default()
                .fg(palette::STATUS_GREEN)
                .add_modifier(Modifier::BOLD),
        ),
    }
}

/// Style for a log line's text
pub fn log_direction(direction: Direction) -> Style {
    match direction {
        Direction::Transmit => Style::default().fg(palette::LOG_TRANSMIT),
        Direction::Receive => Style::default().fg(palette::LOG_RECEIVE),
        Direction::Info => Style::default()
            .fg(palette::LOG_INFO)
            .add_modifier(Modifier::ITALIC),
    }
}

pub fn log_timestamp() -> Style {
    Style::default().fg(palette::LOG_TIMESTAMP)
}

// --- Block builders ---
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            border_active()
        } else {
            border_inactive()
        })
}

pub fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette::STATUS_RED))
        .style(Style::default().bg(palette::POPUP_BG))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_control_is_muted_even_when_focused() {
        assert_eq!(control(true, false), text_muted());
        assert_eq!(control(true, true), focused_selected());
    }

    #[test]
    fn test_connection_indicator_labels() {
        assert_eq!(
            connection_indicator(ConnectionState::Connected).1,
            "Connected"
        );
        assert_eq!(
            connection_indicator(ConnectionState::Disconnected).0,
            "○"
        );
    }
}
