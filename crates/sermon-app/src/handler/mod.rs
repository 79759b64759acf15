//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `connection`: Connect/disconnect trigger and channel events
//! - `send`: The send pipeline shared by manual and timed sends
//! - `timed_send`: Timed-send toggle and timer messages
//! - `ports`: Port-list refresh and selectors
//! - `keys`: Key event handlers

pub(crate) mod connection;
pub(crate) mod keys;
pub(crate) mod ports;
pub(crate) mod send;
pub(crate) mod timed_send;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use sermon_core::SessionParameters;

use crate::connection::SessionId;
use crate::message::Message;
use crate::selectors::FetchOrigin;
use crate::timed_send::JobId;

// Re-export main entry point
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Open the session channel for `session_id` in the background.
    ///
    /// The opened sender comes back as `ChannelAttached`, followed by every
    /// event of the channel as `Message::Channel`.
    OpenChannel {
        session_id: SessionId,
        params: SessionParameters,
    },

    /// Spawn the repeating timer for a timed-send job.
    ///
    /// The first tick fires one full interval after the task starts.
    StartTimedSend { job_id: JobId, interval_ms: u64 },

    /// Fetch the port list from the bridge
    FetchPorts { origin: FetchOrigin },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
