//! Rendering helpers for widget tests

use ratatui::{backend::TestBackend, widgets::Widget, Terminal};
use tokio::sync::mpsc;

use sermon_app::handler::update;
use sermon_app::{AppState, Message};
use sermon_channel::{ChannelCommand, ChannelSender};
use sermon_core::ChannelEvent;

/// Render a widget into a `width`x`height` buffer and return its symbols.
pub fn render_to_string<W: Widget>(width: u16, height: u16, widget: W) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|f| f.render_widget(widget, f.area()))
        .unwrap();
    buffer_to_string(terminal.backend().buffer())
}

/// One line of text per buffer row.
pub fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width.max(1))
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A disconnected state with `COM3` listed and selected.
pub fn state_with_port() -> AppState {
    let mut state = AppState::new();
    state.ports.replace(vec!["COM3".to_string()]);
    state
}

/// A state connected to `COM3`. Keep the receiver alive for sends to succeed.
pub fn connected_state() -> (AppState, mpsc::Receiver<ChannelCommand>) {
    let mut state = state_with_port();
    update(&mut state, Message::ToggleConnection);
    let session_id = state
        .connection
        .session_id()
        .expect("open requested a session");
    let (sender, rx) = ChannelSender::new_for_test();
    update(&mut state, Message::ChannelAttached { session_id, sender });
    update(
        &mut state,
        Message::Channel {
            session_id,
            event: ChannelEvent::Established,
        },
    );
    (state, rx)
}
