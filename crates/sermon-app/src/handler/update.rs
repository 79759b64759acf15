//! Main update function - handles state transitions (TEA pattern)

use std::time::Instant;

use crate::controls;
use crate::message::Message;
use crate::state::AppState;

use super::{connection, keys, ports, send, timed_send, UpdateResult};

/// Process a message and update state.
///
/// Returns an optional follow-up message and/or an action for the event loop.
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Key(key) => match keys::handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Tick => {
            let now = Instant::now();
            state.indicators.expire(now);
            state.status.expire(now);
            UpdateResult::none()
        }

        Message::Quit => {
            state.request_quit();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Connection
        // ─────────────────────────────────────────────────────────
        Message::ToggleConnection => connection::handle_toggle_connection(state),

        Message::ChannelAttached { session_id, sender } => {
            connection::handle_channel_attached(state, session_id, sender)
        }

        Message::Channel { session_id, event } => {
            connection::handle_channel_event(state, session_id, event)
        }

        // ─────────────────────────────────────────────────────────
        // Send
        // ─────────────────────────────────────────────────────────
        Message::SendInput => send::handle_send_input(state),

        Message::InputChar(c) => send::handle_input_char(state, c),

        Message::InputBackspace => send::handle_input_backspace(state),

        // ─────────────────────────────────────────────────────────
        // Timed Send
        // ─────────────────────────────────────────────────────────
        Message::ToggleTimedSend => timed_send::handle_toggle_timed_send(state),

        Message::TimedSendStarted {
            job_id,
            shutdown_tx,
            task_handle,
        } => timed_send::handle_timed_send_started(state, job_id, shutdown_tx, task_handle),

        Message::TimedSendTick { job_id } => timed_send::handle_timed_send_tick(state, job_id),

        // ─────────────────────────────────────────────────────────
        // Log
        // ─────────────────────────────────────────────────────────
        Message::ClearLog => {
            state.log.clear();
            UpdateResult::none()
        }

        Message::ToggleTimestamps => {
            state.log.toggle_timestamps();
            UpdateResult::none()
        }

        Message::ScrollUp => {
            state.log.view.scroll_up(1);
            UpdateResult::none()
        }

        Message::ScrollDown => {
            state.log.view.scroll_down(1);
            UpdateResult::none()
        }

        Message::ScrollToTop => {
            state.log.view.scroll_to_top();
            UpdateResult::none()
        }

        Message::ScrollToBottom => {
            state.log.view.scroll_to_bottom();
            UpdateResult::none()
        }

        Message::PageUp => {
            state.log.view.page_up();
            UpdateResult::none()
        }

        Message::PageDown => {
            state.log.view.page_down();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Ports
        // ─────────────────────────────────────────────────────────
        Message::RefreshPorts => ports::handle_refresh_ports(state),

        Message::PortsFetched { origin, result } => {
            ports::handle_ports_fetched(state, origin, result)
        }

        Message::SelectNextPort => ports::handle_select_port(state, true),
        Message::SelectPreviousPort => ports::handle_select_port(state, false),
        Message::SelectNextBaud => ports::handle_select_baud(state, true),
        Message::SelectPreviousBaud => ports::handle_select_baud(state, false),

        // ─────────────────────────────────────────────────────────
        // Focus / Alert
        // ─────────────────────────────────────────────────────────
        Message::FocusNext => {
            state.focus = controls::next_focus(state.focus, &state.enablement(), true);
            UpdateResult::none()
        }

        Message::FocusPrevious => {
            state.focus = controls::next_focus(state.focus, &state.enablement(), false);
            UpdateResult::none()
        }

        Message::DismissAlert => {
            state.alert = None;
            UpdateResult::none()
        }
    }
}
