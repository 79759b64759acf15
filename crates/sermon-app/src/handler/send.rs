//! Send pipeline and text input editing

use std::time::Instant;

use tracing::warn;

use sermon_core::LogEntry;

use crate::controls::Control;
use crate::state::AppState;

use super::UpdateResult;

/// Transmit `payload` on the live channel, then log it and pulse TX.
///
/// No-op for an empty payload or when not Connected. A local queueing
/// failure skips the log and the pulse. Returns `true` if sent.
pub(crate) fn send_payload(state: &mut AppState, payload: &str) -> bool {
    if payload.is_empty() {
        return false;
    }
    let result = match state.connection.sender() {
        Some(sender) => sender.send_data(payload),
        None => return false,
    };
    if let Err(e) = result {
        warn!("Dropping outbound data: {}", e);
        return false;
    }

    state.log.append(LogEntry::transmit(payload));
    state.indicators.tx.pulse(Instant::now());
    true
}

/// Manual send. The input keeps its text.
pub(crate) fn handle_send_input(state: &mut AppState) -> UpdateResult {
    if !state.enablement().send_button {
        return UpdateResult::none();
    }
    let payload = state.send_input.clone();
    send_payload(state, &payload);
    UpdateResult::none()
}

pub(crate) fn handle_input_char(state: &mut AppState, c: char) -> UpdateResult {
    if !state.enablement().is_enabled(state.focus) {
        return UpdateResult::none();
    }
    match state.focus {
        Control::SendInput => state.send_input.push(c),
        Control::IntervalInput if c.is_ascii_digit() => state.interval_input.push(c),
        _ => {}
    }
    UpdateResult::none()
}

pub(crate) fn handle_input_backspace(state: &mut AppState) -> UpdateResult {
    if !state.enablement().is_enabled(state.focus) {
        return UpdateResult::none();
    }
    match state.focus {
        Control::SendInput => {
            state.send_input.pop();
        }
        Control::IntervalInput => {
            state.interval_input.pop();
        }
        _ => {}
    }
    UpdateResult::none()
}
