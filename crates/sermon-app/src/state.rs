//! Application state (Model in TEA pattern)

use sermon_core::ConnectionState;

use crate::config::Settings;
use crate::connection::ConnectionController;
use crate::controls::{self, Control, ControlEnablement};
use crate::indicator::Indicators;
use crate::log_renderer::LogRenderer;
use crate::selectors::{BaudSelector, PortSelector};
use crate::status::StatusLine;
use crate::timed_send::TimedSendScheduler;

/// Complete application state (the Model in TEA)
#[derive(Debug)]
pub struct AppState {
    /// Session lifecycle and the live channel
    pub connection: ConnectionController,

    pub timed_send: TimedSendScheduler,

    /// Session log
    pub log: LogRenderer,

    /// RX/TX lights
    pub indicators: Indicators,

    pub status: StatusLine,

    pub ports: PortSelector,

    pub baud: BaudSelector,

    /// Text of the send input
    pub send_input: String,

    /// Text of the interval input (milliseconds)
    pub interval_input: String,

    /// Control that receives key input
    pub focus: Control,

    /// Blocking alert text; while set, other input is ignored
    pub alert: Option<String>,

    pub settings: Settings,

    should_quit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        let baud = BaudSelector::new(
            settings.serial.effective_baud_rates(),
            settings.serial.default_baud_rate,
        );
        Self {
            connection: ConnectionController::new(),
            timed_send: TimedSendScheduler::new(),
            log: LogRenderer::new(settings.log.timestamps, settings.log.max_lines),
            indicators: Indicators::default(),
            status: StatusLine::default(),
            ports: PortSelector::new(settings.serial.default_port.clone()),
            baud,
            send_input: String::new(),
            interval_input: settings.timed_send.default_interval_ms.to_string(),
            focus: Control::PortSelect,
            alert: None,
            settings,
            should_quit: false,
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Current enablement of every control
    pub fn enablement(&self) -> ControlEnablement {
        controls::derive_enablement(self.connection.state(), self.timed_send.is_active())
    }

    pub fn connect_button_label(&self) -> &'static str {
        controls::connect_button_label(self.connection.state())
    }

    /// Move focus off a control that just became disabled.
    pub fn settle_focus(&mut self) {
        self.focus = controls::settle_focus(self.focus, &self.enablement());
    }

    /// Status text for the current connection state
    pub fn connection_status_text(&self) -> String {
        match (self.connection.state(), self.connection.params()) {
            (ConnectionState::Connected, Some(params)) => {
                format!("Connected to {}", params.describe())
            }
            (ConnectionState::Connecting, Some(params)) => {
                format!("Connecting to {}...", params.port)
            }
            _ => "Disconnected".to_string(),
        }
    }

    pub fn show_alert(&mut self, text: impl Into<String>) {
        self.alert = Some(text.into());
    }

    pub fn has_alert(&self) -> bool {
        self.alert.is_some()
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
