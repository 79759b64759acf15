//! Connection lifecycle: state machine and the live session handle.
//!
//! ```text
//!   Disconnected ──request_open──▶ Connecting ──established──▶ Connected
//!        ▲                            │                            │
//!        └────────── release ─────────┴────────── release ─────────┘
//! ```
//!
//! The controller owns the only [`ChannelSender`]. Side effects that span
//! other components (log, status, timed send) are ordered by the handler.

use std::fmt;

use tracing::{debug, info};

use sermon_channel::ChannelSender;
use sermon_core::{ConnectionState, SessionParameters};

use crate::validation::ValidationError;

/// Identifies one connect attempt.
///
/// Channel events and attachments carrying any other id are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The live session: its id, parameters and channel (once attached)
#[derive(Debug)]
pub struct SessionHandle {
    pub id: SessionId,
    pub params: SessionParameters,
    sender: Option<ChannelSender>,
}

impl SessionHandle {
    fn close_channel(&mut self) {
        if let Some(sender) = self.sender.take() {
            sender.close();
        }
    }
}

/// Session lifecycle owner
#[derive(Debug, Default)]
pub struct ConnectionController {
    state: ConnectionState,
    session: Option<SessionHandle>,
    next_session_id: u64,
}

impl ConnectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn params(&self) -> Option<&SessionParameters> {
        self.session.as_ref().map(|s| &s.params)
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn is_current(&self, session_id: SessionId) -> bool {
        self.session_id() == Some(session_id)
    }

    /// The channel sender, only while Connected
    pub fn sender(&self) -> Option<&ChannelSender> {
        if !self.state.is_connected() {
            return None;
        }
        self.session.as_ref().and_then(|s| s.sender.as_ref())
    }

    /// Start a connect attempt.
    ///
    /// Returns `Ok(None)` when not Disconnected; the request is ignored.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NoPortSelected`] for an empty port. State is not
    /// changed.
    pub fn request_open(
        &mut self,
        port: &str,
        baud_rate: u32,
    ) -> Result<Option<(SessionId, SessionParameters)>, ValidationError> {
        if !self.state.is_disconnected() {
            debug!("Ignoring open request while {}", self.state.label());
            return Ok(None);
        }
        if port.is_empty() {
            return Err(ValidationError::NoPortSelected);
        }

        self.next_session_id += 1;
        let id = SessionId::new(self.next_session_id);
        let params = SessionParameters::new(port, baud_rate);

        info!("Session {} connecting to {}", id, params);
        self.state = ConnectionState::Connecting;
        self.session = Some(SessionHandle {
            id,
            params: params.clone(),
            sender: None,
        });
        Ok(Some((id, params)))
    }

    /// Hand the opened channel to its session.
    ///
    /// A sender for a stale session is closed right away. Returns `true` if
    /// it was attached.
    pub fn attach(&mut self, session_id: SessionId, sender: ChannelSender) -> bool {
        match self.session.as_mut() {
            Some(session) if session.id == session_id && session.sender.is_none() => {
                session.sender = Some(sender);
                true
            }
            _ => {
                debug!("Closing channel of stale session {}", session_id);
                sender.close();
                false
            }
        }
    }

    /// Connecting → Connected. Returns `false` if the transition does not
    /// apply.
    pub fn mark_established(&mut self, session_id: SessionId) -> bool {
        if !self.is_current(session_id) || self.state != ConnectionState::Connecting {
            return false;
        }
        self.state = ConnectionState::Connected;
        info!("Session {} established", session_id);
        true
    }

    /// Close and drop the channel, then go to Disconnected.
    ///
    /// Returns `false` if already Disconnected.
    pub fn release(&mut self) -> bool {
        if self.state.is_disconnected() && self.session.is_none() {
            return false;
        }
        if let Some(mut session) = self.session.take() {
            session.close_channel();
            info!("Session {} released", session.id);
        }
        self.state = ConnectionState::Disconnected;
        true
    }
}
