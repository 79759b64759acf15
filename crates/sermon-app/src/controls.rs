//! User-facing controls, their enablement and focus order.
//!
//! Enablement is never stored: [`derive_enablement`] computes it from the
//! connection state and whether a timed send is running.

use sermon_core::ConnectionState;

/// Focusable controls in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    PortSelect,
    BaudSelect,
    RefreshButton,
    ConnectButton,
    SendInput,
    SendButton,
    IntervalInput,
    TimedSendToggle,
    TimestampToggle,
    ClearButton,
}

impl Control {
    pub const ALL: [Control; 10] = [
        Control::PortSelect,
        Control::BaudSelect,
        Control::RefreshButton,
        Control::ConnectButton,
        Control::SendInput,
        Control::SendButton,
        Control::IntervalInput,
        Control::TimedSendToggle,
        Control::TimestampToggle,
        Control::ClearButton,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    pub fn is_text_input(self) -> bool {
        matches!(self, Control::SendInput | Control::IntervalInput)
    }
}

/// Which controls accept input right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlEnablement {
    pub port_select: bool,
    pub baud_select: bool,
    pub refresh: bool,
    pub connect: bool,
    pub send_input: bool,
    pub send_button: bool,
    pub interval_input: bool,
    pub timed_send_toggle: bool,
    pub timestamp_toggle: bool,
    pub clear: bool,
}

impl ControlEnablement {
    pub fn is_enabled(&self, control: Control) -> bool {
        match control {
            Control::PortSelect => self.port_select,
            Control::BaudSelect => self.baud_select,
            Control::RefreshButton => self.refresh,
            Control::ConnectButton => self.connect,
            Control::SendInput => self.send_input,
            Control::SendButton => self.send_button,
            Control::IntervalInput => self.interval_input,
            Control::TimedSendToggle => self.timed_send_toggle,
            Control::TimestampToggle => self.timestamp_toggle,
            Control::ClearButton => self.clear,
        }
    }
}

/// The single place enablement is decided.
pub fn derive_enablement(state: ConnectionState, timed_active: bool) -> ControlEnablement {
    let disconnected = state.is_disconnected();
    let connected = state.is_connected();

    ControlEnablement {
        port_select: disconnected,
        baud_select: disconnected,
        refresh: disconnected,
        connect: true,
        send_input: connected && !timed_active,
        send_button: connected && !timed_active,
        interval_input: !timed_active,
        timed_send_toggle: connected,
        timestamp_toggle: true,
        clear: true,
    }
}

/// Label of the connect/disconnect trigger
pub fn connect_button_label(state: ConnectionState) -> &'static str {
    match state {
        ConnectionState::Disconnected => "Open Port",
        ConnectionState::Connecting => "Cancel",
        ConnectionState::Connected => "Close Port",
    }
}

/// Next enabled control after `current`, wrapping. Returns `current` if
/// nothing else is enabled.
pub fn next_focus(current: Control, enablement: &ControlEnablement, forward: bool) -> Control {
    let len = Control::ALL.len();
    let start = current.index();
    for step in 1..=len {
        let idx = if forward {
            (start + step) % len
        } else {
            (start + len - step % len) % len
        };
        let candidate = Control::ALL[idx];
        if enablement.is_enabled(candidate) {
            return candidate;
        }
    }
    current
}

/// Keep focus on an enabled control after enablement changed.
pub fn settle_focus(current: Control, enablement: &ControlEnablement) -> Control {
    if enablement.is_enabled(current) {
        current
    } else {
        next_focus(current, enablement, true)
    }
}
