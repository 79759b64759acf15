use super::*;
use crate::widgets::test_utils::{buffer_to_string, connected_state, state_with_port};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use sermon_app::handler::update;
use sermon_app::Message;
use sermon_core::ChannelEvent;

fn draw(state: &mut AppState, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| view(f, state)).unwrap();
    buffer_to_string(terminal.backend().buffer())
}

fn receive(state: &mut AppState, data: &str) {
    let session_id = state.connection.session_id().unwrap();
    update(
        state,
        Message::Channel {
            session_id,
            event: ChannelEvent::DataReceived {
                data: data.to_string(),
            },
        },
    );
}

#[test]
fn test_initial_screen() {
    let mut state = state_with_port();
    let content = draw(&mut state, 100, 24);

    assert!(content.contains("sermon"));
    assert!(content.contains("[ Open Port ]"));
    assert!(content.contains("○ Disconnected"));
    assert!(content.contains("Open a port to start monitoring"));
}

#[test]
fn test_view_records_log_viewport_height() {
    let mut state = state_with_port();
    draw(&mut state, 100, 24);
    // 24 - header 3 - controls 5 - status 1 - log borders 2
    assert_eq!(state.log.view.visible_lines, 13);
}

#[test]
fn test_connected_session_shows_traffic() {
    let (mut state, _rx) = connected_state();
    state.log.timestamps = false;
    receive(&mut state, "OK");

    let content = draw(&mut state, 100, 24);
    assert!(content.contains("Connected to COM3 @ 115200 bps"));
    assert!(content.contains("[ Close Port ]"));
    assert!(content.contains("OK"));
}

#[test]
fn test_log_follows_bottom_after_resize() {
    let (mut state, _rx) = connected_state();
    state.log.timestamps = false;
    for i in 0..40 {
        receive(&mut state, &format!("row-{i:02}"));
    }

    let content = draw(&mut state, 100, 24);
    assert!(content.contains("row-39"));
    assert!(!content.contains("row-10"));
}

#[test]
fn test_alert_overlay_rendered() {
    let mut state = AppState::new();
    update(&mut state, Message::ToggleConnection);
    assert!(state.has_alert());

    let content = draw(&mut state, 100, 24);
    assert!(content.contains("Please select a serial port first!"));
}
