//! Tests for handler module

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};

use sermon_channel::{ChannelCommand, ChannelSender};
use sermon_core::{ChannelEvent, ConnectionState, Direction, PortListResponse, SessionParameters};

use super::*;
use crate::connection::SessionId;
use crate::controls::Control;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::selectors::FetchOrigin;
use crate::state::AppState;
use crate::status::TRANSIENT_STATUS_DURATION;

// ─────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────

fn state_with_port(port: &str, baud: u32) -> AppState {
    let mut state = AppState::new();
    state.ports.replace(vec![port.to_string()]);
    state.baud = crate::selectors::BaudSelector::new(vec![9600, 115200], baud);
    state
}

/// Run the open sequence; returns the session id
fn open(state: &mut AppState) -> SessionId {
    let result = update(state, Message::ToggleConnection);
    match result.action {
        Some(UpdateAction::OpenChannel { session_id, .. }) => session_id,
        other => panic!("expected OpenChannel, got {other:?}"),
    }
}

/// A Connected state with a test channel attached
fn connected_state() -> (AppState, SessionId, mpsc::Receiver<ChannelCommand>) {
    let mut state = state_with_port("COM3", 9600);
    let session_id = open(&mut state);
    let (sender, cmd_rx) = ChannelSender::new_for_test();
    update(&mut state, Message::ChannelAttached { session_id, sender });
    update(
        &mut state,
        Message::Channel {
            session_id,
            event: ChannelEvent::Established,
        },
    );
    (state, session_id, cmd_rx)
}

fn channel_event(state: &mut AppState, session_id: SessionId, event: ChannelEvent) {
    update(state, Message::Channel { session_id, event });
}

fn entries(state: &AppState, direction: Direction) -> Vec<String> {
    state
        .log
        .lines()
        .iter()
        .filter(|l| l.direction() == direction)
        .map(|l| l.entry.text.clone())
        .collect()
}

/// Enable timed send and return the job id from the action
fn enable_timed(state: &mut AppState, payload: &str, interval: &str) -> crate::timed_send::JobId {
    state.send_input = payload.to_string();
    state.interval_input = interval.to_string();
    match update(state, Message::ToggleTimedSend).action {
        Some(UpdateAction::StartTimedSend { job_id, .. }) => job_id,
        other => panic!("expected StartTimedSend, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────
// Connection lifecycle
// ─────────────────────────────────────────────────────────

#[test]
fn test_open_without_port_alerts() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::ToggleConnection);

    assert!(result.action.is_none());
    assert_eq!(state.connection_state(), ConnectionState::Disconnected);
    assert_eq!(
        state.alert.as_deref(),
        Some("Please select a serial port first!")
    );
}

#[test]
fn test_open_enters_connecting() {
    let mut state = state_with_port("COM3", 9600);
    let result = update(&mut state, Message::ToggleConnection);

    assert_eq!(state.connection_state(), ConnectionState::Connecting);
    assert_eq!(state.status.text(), "Connecting to COM3...");
    assert_eq!(state.connect_button_label(), "Cancel");
    match result.action {
        Some(UpdateAction::OpenChannel { params, .. }) => {
            assert_eq!(params, SessionParameters::new("COM3", 9600));
        }
        other => panic!("expected OpenChannel, got {other:?}"),
    }
}

#[test]
fn test_established_enables_send_controls() {
    let (state, _, _cmd_rx) = connected_state();

    assert_eq!(state.connection_state(), ConnectionState::Connected);
    assert_eq!(state.status.text(), "Connected to COM3 @ 9600 bps");
    assert_eq!(state.connect_button_label(), "Close Port");

    let e = state.enablement();
    assert!(e.send_input && e.send_button);
    assert!(!e.port_select && !e.baud_select && !e.refresh);
}

#[test]
fn test_user_close_logs_nothing_and_closes_channel() {
    let (mut state, _, mut cmd_rx) = connected_state();
    update(&mut state, Message::ToggleConnection);

    assert_eq!(state.connection_state(), ConnectionState::Disconnected);
    assert_eq!(state.status.text(), "Disconnected");
    assert!(state.log.is_empty());
    assert_eq!(cmd_rx.try_recv().ok(), Some(ChannelCommand::Close));

    let e = state.enablement();
    assert!(e.port_select && e.refresh);
    assert!(!e.send_input);
}

#[test]
fn test_cancel_while_connecting() {
    let mut state = state_with_port("COM3", 9600);
    let session_id = open(&mut state);
    update(&mut state, Message::ToggleConnection);
    assert_eq!(state.connection_state(), ConnectionState::Disconnected);

    // The late channel is closed, its established event ignored
    let (sender, mut cmd_rx) = ChannelSender::new_for_test();
    update(&mut state, Message::ChannelAttached { session_id, sender });
    assert_eq!(cmd_rx.try_recv().ok(), Some(ChannelCommand::Close));

    channel_event(&mut state, session_id, ChannelEvent::Established);
    assert_eq!(state.connection_state(), ConnectionState::Disconnected);
}

#[test]
fn test_remote_close_logs_and_tears_down() {
    let (mut state, session_id, _cmd_rx) = connected_state();
    channel_event(&mut state, session_id, ChannelEvent::Closed);

    assert_eq!(state.connection_state(), ConnectionState::Disconnected);
    assert_eq!(state.status.text(), "Disconnected");
    assert_eq!(
        entries(&state, Direction::Info),
        vec!["// Disconnected from server."]
    );
}

#[test]
fn test_connection_error_while_connecting() {
    let mut state = state_with_port("COM3", 9600);
    let session_id = open(&mut state);
    channel_event(
        &mut state,
        session_id,
        ChannelEvent::ConnectionError {
            message: "port busy".into(),
        },
    );

    assert_eq!(state.connection_state(), ConnectionState::Disconnected);
    assert_eq!(
        entries(&state, Direction::Info),
        vec!["Connection Error: port busy"]
    );
}

#[test]
fn test_protocol_error_while_connected_only_logs() {
    let (mut state, session_id, _cmd_rx) = connected_state();
    channel_event(
        &mut state,
        session_id,
        ChannelEvent::ProtocolError {
            message: "write failed".into(),
        },
    );

    assert_eq!(state.connection_state(), ConnectionState::Connected);
    assert_eq!(entries(&state, Direction::Info), vec!["Error: write failed"]);
}

#[test]
fn test_protocol_error_while_connecting_tears_down() {
    let mut state = state_with_port("COM3", 9600);
    let session_id = open(&mut state);
    channel_event(
        &mut state,
        session_id,
        ChannelEvent::ProtocolError {
            message: "no such port".into(),
        },
    );

    assert_eq!(state.connection_state(), ConnectionState::Disconnected);
    assert_eq!(entries(&state, Direction::Info), vec!["Error: no such port"]);
    assert_eq!(state.status.text(), "Disconnected");
}

#[test]
fn test_events_from_stale_session_are_discarded() {
    let (mut state, old_id, _cmd_rx) = connected_state();
    update(&mut state, Message::ToggleConnection);
    let new_id = open(&mut state);
    assert_ne!(old_id, new_id);

    channel_event(
        &mut state,
        old_id,
        ChannelEvent::DataReceived { data: "late".into() },
    );
    channel_event(&mut state, old_id, ChannelEvent::Closed);

    assert_eq!(state.connection_state(), ConnectionState::Connecting);
    assert!(state.log.is_empty());
}

// ─────────────────────────────────────────────────────────
// Send / receive pipeline
// ─────────────────────────────────────────────────────────

#[test]
fn test_send_transmits_logs_and_pulses() {
    let (mut state, _, mut cmd_rx) = connected_state();
    state.send_input = "AT".into();
    update(&mut state, Message::SendInput);

    assert_eq!(
        cmd_rx.try_recv().ok(),
        Some(ChannelCommand::SendData { data: "AT".into() })
    );
    assert_eq!(entries(&state, Direction::Transmit), vec!["AT"]);
    assert!(state.indicators.tx.is_active(Instant::now()));
    assert!(!state.indicators.rx.is_active(Instant::now()));
    assert_eq!(state.send_input, "AT", "input keeps its text");
}

#[test]
fn test_send_empty_is_noop() {
    let (mut state, _, mut cmd_rx) = connected_state();
    update(&mut state, Message::SendInput);

    assert!(cmd_rx.try_recv().is_err());
    assert!(state.log.is_empty());
}

#[test]
fn test_send_while_disconnected_is_noop() {
    let mut state = state_with_port("COM3", 9600);
    state.send_input = "AT".into();
    update(&mut state, Message::SendInput);
    assert!(state.log.is_empty());
    assert!(!state.indicators.tx.is_active(Instant::now()));
}

#[test]
fn test_send_failure_skips_log_and_pulse() {
    let (mut state, _, cmd_rx) = connected_state();
    drop(cmd_rx);
    state.send_input = "AT".into();
    update(&mut state, Message::SendInput);

    assert!(entries(&state, Direction::Transmit).is_empty());
    assert!(!state.indicators.tx.is_active(Instant::now()));
}

#[test]
fn test_receive_logs_and_pulses() {
    let (mut state, session_id, _cmd_rx) = connected_state();
    channel_event(
        &mut state,
        session_id,
        ChannelEvent::DataReceived { data: "OK".into() },
    );

    assert_eq!(entries(&state, Direction::Receive), vec!["OK"]);
    assert!(state.indicators.rx.is_active(Instant::now()));
}

#[test]
fn test_receive_while_connecting_is_dropped() {
    let mut state = state_with_port("COM3", 9600);
    let session_id = open(&mut state);
    channel_event(
        &mut state,
        session_id,
        ChannelEvent::DataReceived { data: "noise".into() },
    );
    assert!(state.log.is_empty());
}

// ─────────────────────────────────────────────────────────
// Timed send
// ─────────────────────────────────────────────────────────

#[test]
fn test_timed_send_rejected_while_disconnected() {
    let mut state = state_with_port("COM3", 9600);
    state.send_input = "PING".into();
    let result = update(&mut state, Message::ToggleTimedSend);

    assert!(result.action.is_none());
    assert!(!state.timed_send.is_active());
    assert_eq!(
        state.alert.as_deref(),
        Some("Please open the serial port first!")
    );
}

#[test]
fn test_timed_send_interval_boundary() {
    let (mut state, _, _cmd_rx) = connected_state();
    state.send_input = "PING".into();
    state.interval_input = "99".into();
    let result = update(&mut state, Message::ToggleTimedSend);
    assert!(result.action.is_none());
    assert!(!state.timed_send.is_active());
    assert_eq!(
        state.alert.as_deref(),
        Some("Interval must be a number greater than or equal to 100!")
    );

    update(&mut state, Message::DismissAlert);
    let job_id = enable_timed(&mut state, "PING", "100");
    assert!(state.timed_send.is_active());
    assert_eq!(state.timed_send.job().map(|j| j.id), Some(job_id));
    assert_eq!(state.status.text(), "Sending data every 100ms...");
}

#[test]
fn test_timed_send_empty_payload_rejected() {
    let (mut state, _, _cmd_rx) = connected_state();
    state.interval_input = "500".into();
    update(&mut state, Message::ToggleTimedSend);
    assert_eq!(state.alert.as_deref(), Some("Send content cannot be empty!"));
}

#[test]
fn test_timed_send_locks_manual_send() {
    let (mut state, _, mut cmd_rx) = connected_state();
    enable_timed(&mut state, "PING", "500");

    let e = state.enablement();
    assert!(!e.send_input && !e.send_button && !e.interval_input);

    update(&mut state, Message::SendInput);
    assert!(cmd_rx.try_recv().is_err());
}

#[test]
fn test_timed_tick_sends_captured_payload() {
    let (mut state, _, mut cmd_rx) = connected_state();
    let job_id = enable_timed(&mut state, "PING", "500");
    state.send_input = "changed".into();

    update(&mut state, Message::TimedSendTick { job_id });
    update(&mut state, Message::TimedSendTick { job_id });

    assert_eq!(entries(&state, Direction::Transmit), vec!["PING", "PING"]);
    assert_eq!(
        cmd_rx.try_recv().ok(),
        Some(ChannelCommand::SendData {
            data: "PING".into()
        })
    );
}

#[test]
fn test_disable_restores_status_and_controls() {
    let (mut state, _, _cmd_rx) = connected_state();
    enable_timed(&mut state, "PING", "500");
    update(&mut state, Message::ToggleTimedSend);

    assert!(!state.timed_send.is_active());
    assert_eq!(state.status.text(), "Connected to COM3 @ 9600 bps");
    let e = state.enablement();
    assert!(e.send_input && e.send_button && e.interval_input);
}

#[test]
fn test_disconnect_stops_timed_send() {
    let (mut state, session_id, _cmd_rx) = connected_state();
    let job_id = enable_timed(&mut state, "PING", "500");

    channel_event(&mut state, session_id, ChannelEvent::Closed);
    assert!(!state.timed_send.is_active());
    assert_eq!(state.status.text(), "Disconnected");

    // A tick already queued before the disconnect does nothing
    update(&mut state, Message::TimedSendTick { job_id });
    assert!(entries(&state, Direction::Transmit).is_empty());
}

#[tokio::test]
async fn test_started_for_current_job_attaches_task() {
    let (mut state, _, _cmd_rx) = connected_state();
    let job_id = enable_timed(&mut state, "PING", "500");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);
    update(
        &mut state,
        Message::TimedSendStarted {
            job_id,
            shutdown_tx,
            task_handle: Arc::new(Mutex::new(None)),
        },
    );
    assert!(state.timed_send.job().is_some_and(|j| j.has_task()));
    assert!(!*shutdown_rx.borrow());

    update(&mut state, Message::ToggleTimedSend);
    assert!(*shutdown_rx.borrow(), "disable signals the timer");
}

#[tokio::test]
async fn test_started_for_stale_job_stops_timer() {
    let (mut state, _, _cmd_rx) = connected_state();
    let job_id = enable_timed(&mut state, "PING", "500");
    update(&mut state, Message::ToggleTimedSend);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    update(
        &mut state,
        Message::TimedSendStarted {
            job_id,
            shutdown_tx: Arc::new(shutdown_tx),
            task_handle: Arc::new(Mutex::new(None)),
        },
    );
    assert!(*shutdown_rx.borrow());
}

// ─────────────────────────────────────────────────────────
// Log
// ─────────────────────────────────────────────────────────

#[test]
fn test_clear_log_leaves_one_info_entry() {
    let (mut state, session_id, _cmd_rx) = connected_state();
    channel_event(
        &mut state,
        session_id,
        ChannelEvent::DataReceived { data: "OK".into() },
    );
    update(&mut state, Message::ClearLog);

    assert_eq!(state.log.len(), 1);
    assert!(state.log.lines()[0]
        .entry
        .text
        .starts_with("// Log cleared at "));
}

#[test]
fn test_toggle_timestamps_affects_new_lines_only() {
    let (mut state, session_id, _cmd_rx) = connected_state();
    channel_event(
        &mut state,
        session_id,
        ChannelEvent::DataReceived { data: "A".into() },
    );
    update(&mut state, Message::ToggleTimestamps);
    channel_event(
        &mut state,
        session_id,
        ChannelEvent::DataReceived { data: "B".into() },
    );

    assert!(state.log.lines()[0].rendered.ends_with("]:A"));
    assert_eq!(state.log.lines()[1].rendered, "B");
}

// ─────────────────────────────────────────────────────────
// Port refresh
// ─────────────────────────────────────────────────────────

fn ok_ports(ports: &[&str]) -> Result<PortListResponse, String> {
    Ok(PortListResponse::ok(
        ports.iter().map(|p| p.to_string()).collect(),
    ))
}

#[test]
fn test_refresh_success() {
    let mut state = state_with_port("COM3", 9600);
    let result = update(&mut state, Message::RefreshPorts);
    assert_eq!(
        result.action,
        Some(UpdateAction::FetchPorts {
            origin: FetchOrigin::User
        })
    );
    assert_eq!(state.status.text(), "Refreshing port list...");

    update(
        &mut state,
        Message::PortsFetched {
            origin: FetchOrigin::User,
            result: ok_ports(&["COM1", "COM3"]),
        },
    );
    assert_eq!(state.status.text(), "Port list has been refreshed.");
    assert_eq!(state.ports.selected_port(), "COM3");
}

#[test]
fn test_refresh_failure_reverts_after_timeout() {
    let mut state = state_with_port("COM3", 9600);
    update(&mut state, Message::RefreshPorts);
    update(
        &mut state,
        Message::PortsFetched {
            origin: FetchOrigin::User,
            result: Ok(PortListResponse::failed("permission denied")),
        },
    );
    assert_eq!(state.status.text(), "Refresh failed: permission denied");

    state
        .status
        .expire(Instant::now() + TRANSIENT_STATUS_DURATION + Duration::from_millis(10));
    assert_eq!(state.status.text(), "Disconnected");
}

#[test]
fn test_refresh_while_in_flight_is_ignored() {
    let mut state = state_with_port("COM3", 9600);
    let first = update(&mut state, Message::RefreshPorts);
    assert!(first.action.is_some());
    let second = update(&mut state, Message::RefreshPorts);
    assert!(second.action.is_none());

    for _ in 0..2 {
        update(
            &mut state,
            Message::PortsFetched {
                origin: FetchOrigin::User,
                result: Ok(PortListResponse::failed("busy")),
            },
        );
    }
    assert_eq!(state.status.text(), "Refresh failed: busy");

    state
        .status
        .expire(Instant::now() + TRANSIENT_STATUS_DURATION + Duration::from_millis(10));
    assert_eq!(state.status.text(), "Disconnected");
}

#[test]
fn test_refresh_network_error() {
    let mut state = state_with_port("COM3", 9600);
    update(&mut state, Message::RefreshPorts);
    update(
        &mut state,
        Message::PortsFetched {
            origin: FetchOrigin::User,
            result: Err("connection refused".into()),
        },
    );
    assert_eq!(
        state.status.text(),
        "A network error occurred while refreshing."
    );
    assert_eq!(state.ports.selected_port(), "COM3", "list untouched");
}

#[test]
fn test_refresh_result_does_not_clobber_newer_status() {
    let mut state = state_with_port("COM3", 9600);
    update(&mut state, Message::RefreshPorts);
    update(&mut state, Message::ToggleConnection);
    assert_eq!(state.status.text(), "Connecting to COM3...");

    update(
        &mut state,
        Message::PortsFetched {
            origin: FetchOrigin::User,
            result: Err("timeout".into()),
        },
    );
    assert_eq!(state.status.text(), "Connecting to COM3...");
}

#[test]
fn test_refresh_ignored_while_connected() {
    let (mut state, _, _cmd_rx) = connected_state();
    let result = update(&mut state, Message::RefreshPorts);
    assert!(result.action.is_none());
    assert_eq!(state.status.text(), "Connected to COM3 @ 9600 bps");
}

#[test]
fn test_connect_rejected_after_selected_port_vanishes() {
    let mut state = state_with_port("COM3", 9600);
    update(&mut state, Message::RefreshPorts);
    update(
        &mut state,
        Message::PortsFetched {
            origin: FetchOrigin::User,
            result: ok_ports(&["COM4"]),
        },
    );
    assert_eq!(state.ports.selected_port(), "");

    let result = update(&mut state, Message::ToggleConnection);
    assert!(result.action.is_none());
    assert_eq!(
        state.alert.as_deref(),
        Some("Please select a serial port first!")
    );
    assert_eq!(state.connection_state(), ConnectionState::Disconnected);
}

#[test]
fn test_startup_fetch_is_silent_on_success() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::PortsFetched {
            origin: FetchOrigin::Startup,
            result: ok_ports(&["/dev/ttyUSB0"]),
        },
    );
    assert_eq!(state.status.text(), "Disconnected");
    assert_eq!(state.ports.selected_port(), "/dev/ttyUSB0");
}

// ─────────────────────────────────────────────────────────
// Keys
// ─────────────────────────────────────────────────────────

/// Feed a key and its follow-up messages through update
fn key(state: &mut AppState, k: InputKey) {
    let mut msg = Some(Message::Key(k));
    while let Some(m) = msg {
        msg = update(state, m).message;
    }
}

#[test]
fn test_alert_swallows_keys() {
    let mut state = AppState::new();
    update(&mut state, Message::ToggleConnection);
    assert!(state.has_alert());

    assert!(matches!(
        keys::handle_key(&state, InputKey::Tab),
        Some(Message::DismissAlert)
    ));
    assert!(matches!(
        keys::handle_key(&state, InputKey::CharCtrl('c')),
        Some(Message::Quit)
    ));

    key(&mut state, InputKey::Enter);
    assert!(!state.has_alert());
}

#[test]
fn test_tab_skips_disabled_controls() {
    let mut state = state_with_port("COM3", 9600);
    state.focus = Control::ConnectButton;
    key(&mut state, InputKey::Tab);
    assert_eq!(state.focus, Control::IntervalInput);
    key(&mut state, InputKey::BackTab);
    assert_eq!(state.focus, Control::ConnectButton);
}

#[test]
fn test_enter_on_connect_button_opens() {
    let mut state = state_with_port("COM3", 9600);
    state.focus = Control::ConnectButton;
    let result = update(&mut state, Message::Key(InputKey::Enter));
    assert!(matches!(result.message, Some(Message::ToggleConnection)));
}

#[test]
fn test_interval_input_accepts_digits_only() {
    let mut state = AppState::new();
    state.focus = Control::IntervalInput;
    state.interval_input.clear();
    for c in ['1', 'x', '5', ' ', '0'] {
        key(&mut state, InputKey::Char(c));
    }
    assert_eq!(state.interval_input, "150");
    key(&mut state, InputKey::Backspace);
    assert_eq!(state.interval_input, "15");
}

#[test]
fn test_send_input_typing_and_enter() {
    let (mut state, _, mut cmd_rx) = connected_state();
    state.focus = Control::SendInput;
    for c in "AT".chars() {
        key(&mut state, InputKey::Char(c));
    }
    key(&mut state, InputKey::Enter);

    assert_eq!(
        cmd_rx.try_recv().ok(),
        Some(ChannelCommand::SendData { data: "AT".into() })
    );
}

#[test]
fn test_port_selector_locked_while_connected() {
    let (mut state, _, _cmd_rx) = connected_state();
    state.ports.replace(vec!["COM3".into(), "COM4".into()]);
    update(&mut state, Message::SelectNextPort);
    assert_eq!(state.ports.selected_port(), "COM3");
}

#[test]
fn test_global_keys() {
    let state = AppState::new();
    assert!(matches!(
        keys::handle_key(&state, InputKey::CharCtrl('q')),
        Some(Message::Quit)
    ));
    assert!(matches!(
        keys::handle_key(&state, InputKey::CharCtrl('l')),
        Some(Message::ClearLog)
    ));
    assert!(matches!(
        keys::handle_key(&state, InputKey::CtrlEnd),
        Some(Message::ScrollToBottom)
    ));
}
