//! Session channel events and the port-list contract

use serde::{Deserialize, Serialize};

/// Lifecycle and data events emitted by a session channel
///
/// The controller only ever sees these; the wire format stays inside the
/// channel implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Remote endpoint accepted the session
    Established,
    /// Channel ended (remote disconnect or transport close)
    Closed,
    /// Bytes read from the serial device
    DataReceived { data: String },
    /// Remote-side serial error; the channel may remain open
    ProtocolError { message: String },
    /// The channel could not be established or failed abruptly
    ConnectionError { message: String },
}

impl ChannelEvent {
    /// Whether this event ends the channel
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ChannelEvent::Closed | ChannelEvent::ConnectionError { .. }
        )
    }
}

/// Response body of `GET /api/list_ports`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortListResponse {
    pub success: bool,
    #[serde(default)]
    pub ports: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PortListResponse {
    pub fn ok(ports: Vec<String>) -> Self {
        Self {
            success: true,
            ports,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ports: Vec::new(),
            message: Some(message.into()),
        }
    }
}
