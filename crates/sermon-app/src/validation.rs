//! User input validation failures.
//!
//! Each variant's `Display` text is what the alert dialog shows.

/// Input rejected before any state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a serial port first!")]
    NoPortSelected,

    #[error("Please open the serial port first!")]
    NotConnected,

    #[error("Send content cannot be empty!")]
    EmptyPayload,

    #[error("Interval must be a number greater than or equal to 100!")]
    InvalidInterval,
}
