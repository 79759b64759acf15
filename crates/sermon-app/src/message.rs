//! Message types for the application (TEA pattern)

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use sermon_channel::ChannelSender;
use sermon_core::{ChannelEvent, PortListResponse};

use crate::connection::SessionId;
use crate::input_key::InputKey;
use crate::selectors::FetchOrigin;
use crate::timed_send::JobId;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Tick event for periodic updates (indicator and status expiry)
    Tick,

    /// Quit immediately (Ctrl+C, signal handler)
    Quit,

    // ─────────────────────────────────────────────────────────
    // Connection Messages
    // ─────────────────────────────────────────────────────────
    /// Connect/disconnect trigger: open when Disconnected, close otherwise
    ToggleConnection,

    /// The channel for `session_id` has been opened in the background
    ChannelAttached {
        session_id: SessionId,
        sender: ChannelSender,
    },

    /// Lifecycle or data event from the channel of `session_id`
    Channel {
        session_id: SessionId,
        event: ChannelEvent,
    },

    // ─────────────────────────────────────────────────────────
    // Send Messages
    // ─────────────────────────────────────────────────────────
    /// Send the contents of the send input
    SendInput,

    /// Type a character into the focused text input
    InputChar(char),

    /// Delete the last character of the focused text input
    InputBackspace,

    // ─────────────────────────────────────────────────────────
    // Timed Send Messages
    // ─────────────────────────────────────────────────────────
    /// Flip the timed-send toggle
    ToggleTimedSend,

    /// The timer task for `job_id` is running.
    ///
    /// `task_handle` is filled by the spawner right after `tokio::spawn`
    /// returns, before the task's first await.
    TimedSendStarted {
        job_id: JobId,
        shutdown_tx: Arc<watch::Sender<bool>>,
        task_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
    },

    /// One firing of the timer for `job_id`
    TimedSendTick { job_id: JobId },

    // ─────────────────────────────────────────────────────────
    // Log Messages
    // ─────────────────────────────────────────────────────────
    ClearLog,
    ToggleTimestamps,
    /// Scroll log view up one line
    ScrollUp,
    /// Scroll log view down one line
    ScrollDown,
    ScrollToTop,
    ScrollToBottom,
    PageUp,
    PageDown,

    // ─────────────────────────────────────────────────────────
    // Port Messages
    // ─────────────────────────────────────────────────────────
    /// Refresh trigger
    RefreshPorts,

    /// Result of a port-list fetch; `Err` holds a transport error
    PortsFetched {
        origin: FetchOrigin,
        result: Result<PortListResponse, String>,
    },

    SelectNextPort,
    SelectPreviousPort,
    SelectNextBaud,
    SelectPreviousBaud,

    // ─────────────────────────────────────────────────────────
    // Focus / Alert Messages
    // ─────────────────────────────────────────────────────────
    FocusNext,
    FocusPrevious,
    DismissAlert,
}
