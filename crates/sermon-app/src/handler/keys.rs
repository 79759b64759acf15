//! Key event handlers

use crate::controls::Control;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::AppState;

/// Convert key events to messages based on the focused control
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    if state.has_alert() {
        return handle_key_alert(key);
    }
    handle_key_global(key).or_else(|| handle_key_focused(state, key))
}

/// While an alert is open every key dismisses it
fn handle_key_alert(key: InputKey) -> Option<Message> {
    match key {
        // Force quit with Ctrl+C even in dialog
        InputKey::CharCtrl('c') => Some(Message::Quit),
        _ => Some(Message::DismissAlert),
    }
}

/// Keys that work regardless of focus
fn handle_key_global(key: InputKey) -> Option<Message> {
    match key {
        InputKey::CharCtrl('c' | 'q') => Some(Message::Quit),
        InputKey::CharCtrl('l') => Some(Message::ClearLog),

        InputKey::Tab => Some(Message::FocusNext),
        InputKey::BackTab => Some(Message::FocusPrevious),

        // Log scrolling
        InputKey::PageUp => Some(Message::PageUp),
        InputKey::PageDown => Some(Message::PageDown),
        InputKey::CtrlUp => Some(Message::ScrollUp),
        InputKey::CtrlDown => Some(Message::ScrollDown),
        InputKey::CtrlHome => Some(Message::ScrollToTop),
        InputKey::CtrlEnd => Some(Message::ScrollToBottom),

        _ => None,
    }
}

fn handle_key_focused(state: &AppState, key: InputKey) -> Option<Message> {
    if !state.enablement().is_enabled(state.focus) {
        return None;
    }

    match state.focus {
        Control::PortSelect => match key {
            InputKey::Left | InputKey::Up => Some(Message::SelectPreviousPort),
            InputKey::Right | InputKey::Down => Some(Message::SelectNextPort),
            _ => None,
        },
        Control::BaudSelect => match key {
            InputKey::Left | InputKey::Up => Some(Message::SelectPreviousBaud),
            InputKey::Right | InputKey::Down => Some(Message::SelectNextBaud),
            _ => None,
        },
        Control::SendInput => match key {
            InputKey::Enter => Some(Message::SendInput),
            InputKey::Char(c) => Some(Message::InputChar(c)),
            InputKey::Backspace => Some(Message::InputBackspace),
            _ => None,
        },
        Control::IntervalInput => match key {
            InputKey::Char(c) if c.is_ascii_digit() => Some(Message::InputChar(c)),
            InputKey::Backspace => Some(Message::InputBackspace),
            _ => None,
        },
        button if key.is_activate() => Some(activate(button)),
        _ => None,
    }
}

/// Message for pressing a button or toggle
fn activate(control: Control) -> Message {
    match control {
        Control::RefreshButton => Message::RefreshPorts,
        Control::ConnectButton => Message::ToggleConnection,
        Control::SendButton | Control::SendInput => Message::SendInput,
        Control::TimedSendToggle => Message::ToggleTimedSend,
        Control::TimestampToggle => Message::ToggleTimestamps,
        Control::ClearButton => Message::ClearLog,
        Control::PortSelect => Message::SelectNextPort,
        Control::BaudSelect => Message::SelectNextBaud,
        Control::IntervalInput => Message::FocusNext,
    }
}
