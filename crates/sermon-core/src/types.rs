//! Core domain type definitions

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Lifecycle of the single serial session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No channel exists
    #[default]
    Disconnected,
    /// A channel has been requested but not yet established
    Connecting,
    /// The remote endpoint confirmed the session
    Connected,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(self, ConnectionState::Disconnected)
    }

    /// Short label for the header
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Connected => "Connected",
        }
    }
}

/// Port and baud rate captured when a session is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParameters {
    pub port: String,
    pub baud_rate: u32,
}

impl SessionParameters {
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
        }
    }

    /// Human form, e.g. `COM3 @ 9600 bps`
    pub fn describe(&self) -> String {
        format!("{} @ {} bps", self.port, self.baud_rate)
    }
}

impl fmt::Display for SessionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Which way a log entry's bytes travelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Sent by this controller
    Transmit,
    /// Received from the serial device
    Receive,
    /// Informational line produced locally
    Info,
}

impl Direction {
    pub fn is_info(&self) -> bool {
        matches!(self, Direction::Info)
    }
}

/// One line of the session log. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub text: String,
    pub direction: Direction,
    pub observed_at: DateTime<Local>,
}

impl LogEntry {
    /// Create a new log entry observed now
    pub fn new(direction: Direction, text: impl Into<String>) -> Self {
        Self::observed(direction, text, Local::now())
    }

    /// Create a new log entry with an explicit observation time
    pub fn observed(direction: Direction, text: impl Into<String>, at: DateTime<Local>) -> Self {
        Self {
            text: text.into(),
            direction,
            observed_at: at,
        }
    }

    pub fn transmit(text: impl Into<String>) -> Self {
        Self::new(Direction::Transmit, text)
    }

    pub fn receive(text: impl Into<String>) -> Self {
        Self::new(Direction::Receive, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Direction::Info, text)
    }

    /// `HH:MM:SS.mmm`, 24-hour
    pub fn formatted_time(&self) -> String {
        self.observed_at.format("%H:%M:%S%.3f").to_string()
    }

    /// Text as it appears in the log. Info lines never carry a timestamp.
    pub fn display_line(&self, timestamps: bool) -> String {
        if timestamps && !self.direction.is_info() {
            format!("[{}]:{}", self.formatted_time(), self.text)
        } else {
            self.text.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 1, h, m, s)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(ms as i64))
            .unwrap()
    }

    #[test]
    fn test_session_parameters_describe() {
        let params = SessionParameters::new("COM3", 9600);
        assert_eq!(params.describe(), "COM3 @ 9600 bps");
        assert_eq!(params.to_string(), "COM3 @ 9600 bps");
    }

    #[test]
    fn test_connection_state_default_is_disconnected() {
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
        assert!(ConnectionState::Connected.is_connected());
        assert!(!ConnectionState::Connecting.is_connected());
    }

    #[test]
    fn test_display_line_prefixes_transmit_and_receive() {
        let entry = LogEntry::observed(Direction::Receive, "OK", at(9, 5, 7, 42));
        assert_eq!(entry.display_line(true), "[09:05:07.042]:OK");

        let entry = LogEntry::observed(Direction::Transmit, "AT", at(23, 59, 59, 999));
        assert_eq!(entry.display_line(true), "[23:59:59.999]:AT");
    }

    #[test]
    fn test_display_line_without_timestamps() {
        let entry = LogEntry::observed(Direction::Receive, "OK", at(9, 5, 7, 42));
        assert_eq!(entry.display_line(false), "OK");
    }

    #[test]
    fn test_info_never_prefixed() {
        let entry = LogEntry::observed(Direction::Info, "// Disconnected from server.", at(1, 2, 3, 4));
        assert_eq!(entry.display_line(true), "// Disconnected from server.");
    }
}
