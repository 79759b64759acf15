//! Connection lifecycle handlers

use std::time::Instant;

use tracing::{debug, info, warn};

use sermon_channel::ChannelSender;
use sermon_core::{ChannelEvent, ConnectionState, LogEntry};

use crate::connection::SessionId;
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

/// Open when Disconnected, close (or cancel) otherwise.
pub(crate) fn handle_toggle_connection(state: &mut AppState) -> UpdateResult {
    match state.connection.state() {
        ConnectionState::Disconnected => request_open(state),
        ConnectionState::Connecting | ConnectionState::Connected => {
            info!("User closed the session");
            teardown_session(state);
            UpdateResult::none()
        }
    }
}

fn request_open(state: &mut AppState) -> UpdateResult {
    let port = state.ports.selected_port().to_string();
    let baud_rate = state.baud.selected();

    match state.connection.request_open(&port, baud_rate) {
        Ok(Some((session_id, params))) => {
            state.status.set(format!("Connecting to {}...", params.port));
            state.settle_focus();
            UpdateResult::action(UpdateAction::OpenChannel { session_id, params })
        }
        Ok(None) => UpdateResult::none(),
        Err(err) => {
            state.show_alert(err.to_string());
            UpdateResult::none()
        }
    }
}

/// Tear the session down in order: timed send, channel, state, status.
pub(crate) fn teardown_session(state: &mut AppState) {
    if state.timed_send.disable() {
        debug!("Timed send stopped by disconnect");
    }
    state.connection.release();
    state.settle_focus();
    state.status.set("Disconnected");
}

pub(crate) fn handle_channel_attached(
    state: &mut AppState,
    session_id: SessionId,
    sender: ChannelSender,
) -> UpdateResult {
    state.connection.attach(session_id, sender);
    UpdateResult::none()
}

pub(crate) fn handle_channel_event(
    state: &mut AppState,
    session_id: SessionId,
    event: ChannelEvent,
) -> UpdateResult {
    if !state.connection.is_current(session_id) {
        debug!("Discarding event from stale session {}: {:?}", session_id, event);
        return UpdateResult::none();
    }

    match event {
        ChannelEvent::Established => {
            if state.connection.mark_established(session_id) {
                let text = state.connection_status_text();
                state.status.set(text);
                state.settle_focus();
            }
        }

        ChannelEvent::Closed => {
            state.log.info("// Disconnected from server.");
            teardown_session(state);
        }

        ChannelEvent::ConnectionError { message } => {
            warn!("Session {} connection error: {}", session_id, message);
            state.log.info(format!("Connection Error: {message}"));
            teardown_session(state);
        }

        ChannelEvent::ProtocolError { message } => {
            warn!("Session {} protocol error: {}", session_id, message);
            state.log.info(format!("Error: {message}"));
            if state.connection.state() == ConnectionState::Connecting {
                teardown_session(state);
            }
        }

        ChannelEvent::DataReceived { data } => {
            if state.connection.state().is_connected() {
                state.indicators.rx.pulse(Instant::now());
                state.log.append(LogEntry::receive(data));
            }
        }
    }

    UpdateResult::none()
}
