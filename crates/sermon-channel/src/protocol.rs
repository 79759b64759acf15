//! Engine.IO v4 / Socket.IO v5 packet codec for the serial bridge.
//!
//! The bridge server speaks Socket.IO over a plain WebSocket transport. Every
//! WebSocket text frame is one Engine.IO packet; Engine.IO `message` packets
//! carry one Socket.IO packet each.
//!
//! ```text
//!   0{"sid":..,"pingInterval":..}      engine open (server -> client)
//!   2 / 3                              engine ping / pong
//!   40/serial,                         socket connect request (client)
//!   40/serial,{"sid":..}               socket connect ack (server)
//!   42/serial,["serial_data_recv",{}]  socket event
//!   44/serial,{"message":..}           socket connect error
//! ```
//!
//! Binary packets are never produced by the bridge and are rejected.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use sermon_core::prelude::*;
use sermon_core::{ChannelEvent, SessionParameters};

/// Engine.IO protocol revision spoken by the bridge
pub const ENGINE_IO_VERSION: &str = "4";

/// Namespace the bridge registers its serial handlers on
pub const DEFAULT_NAMESPACE: &str = "/serial";

/// Inbound event carrying serial data
pub const EVENT_DATA_RECV: &str = "serial_data_recv";

/// Inbound event carrying a serial-side error
pub const EVENT_SERIAL_ERROR: &str = "serial_error";

/// Outbound event carrying data to write to the port
pub const EVENT_DATA_SEND: &str = "serial_data_send";

// ---------------------------------------------------------------------------
// Engine.IO
// ---------------------------------------------------------------------------

/// Payload of the Engine.IO `open` packet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Milliseconds between server pings
    pub ping_interval: u64,
    /// Milliseconds the server waits for a pong
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

impl Handshake {
    /// Silence longer than this means the connection is gone.
    pub fn liveness_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_interval.saturating_add(self.ping_timeout))
    }
}

/// One Engine.IO packet (one WebSocket text frame).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping(String),
    Pong(String),
    Message(String),
    Upgrade,
    Noop,
}

/// Parse a WebSocket text frame as an Engine.IO packet.
pub fn parse_engine_packet(text: &str) -> Result<EnginePacket> {
    let mut chars = text.chars();
    let kind = chars
        .next()
        .ok_or_else(|| Error::protocol("empty engine packet"))?;
    let body = chars.as_str();

    let packet = match kind {
        '0' => {
            let handshake: Handshake = serde_json::from_str(body)
                .map_err(|e| Error::protocol(format!("invalid open packet: {e}")))?;
            EnginePacket::Open(handshake)
        }
        '1' => EnginePacket::Close,
        '2' => EnginePacket::Ping(body.to_string()),
        '3' => EnginePacket::Pong(body.to_string()),
        '4' => EnginePacket::Message(body.to_string()),
        '5' => EnginePacket::Upgrade,
        '6' => EnginePacket::Noop,
        other => {
            return Err(Error::protocol(format!(
                "unknown engine packet type '{other}'"
            )))
        }
    };
    Ok(packet)
}

/// Pong answering a ping, echoing its payload.
pub fn encode_pong(payload: &str) -> String {
    format!("3{payload}")
}

// ---------------------------------------------------------------------------
// Socket.IO
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketPacketKind {
    Connect,
    Disconnect,
    Event,
    Ack,
    ConnectError,
}

impl SocketPacketKind {
    fn from_digit(c: char) -> Result<Self> {
        match c {
            '0' => Ok(Self::Connect),
            '1' => Ok(Self::Disconnect),
            '2' => Ok(Self::Event),
            '3' => Ok(Self::Ack),
            '4' => Ok(Self::ConnectError),
            '5' | '6' => Err(Error::protocol("binary packets are not supported")),
            other => Err(Error::protocol(format!(
                "unknown socket packet type '{other}'"
            ))),
        }
    }

    fn digit(&self) -> char {
        match self {
            Self::Connect => '0',
            Self::Disconnect => '1',
            Self::Event => '2',
            Self::Ack => '3',
            Self::ConnectError => '4',
        }
    }
}

/// One Socket.IO packet carried inside an Engine.IO message.
#[derive(Debug, Clone, PartialEq)]
pub struct SocketPacket {
    pub kind: SocketPacketKind,
    pub namespace: String,
    pub ack_id: Option<u64>,
    pub data: Option<Value>,
}

impl SocketPacket {
    pub fn new(kind: SocketPacketKind, namespace: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            ack_id: None,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Event name and first argument of an `Event` packet
    pub fn event(&self) -> Option<(&str, Option<&Value>)> {
        if self.kind != SocketPacketKind::Event {
            return None;
        }
        let args = self.data.as_ref()?.as_array()?;
        let name = args.first()?.as_str()?;
        Some((name, args.get(1)))
    }

    /// Encode as the body of an Engine.IO message (without the leading `4`).
    pub fn encode(&self) -> String {
        let mut out = String::new();
        out.push(self.kind.digit());
        if self.namespace != "/" {
            out.push_str(&self.namespace);
            out.push(',');
        }
        if let Some(id) = self.ack_id {
            out.push_str(&id.to_string());
        }
        if let Some(data) = &self.data {
            out.push_str(&data.to_string());
        }
        out
    }

    /// Encode as a full WebSocket text frame.
    pub fn to_frame(&self) -> String {
        format!("4{}", self.encode())
    }
}

/// Parse the body of an Engine.IO message as a Socket.IO packet.
pub fn parse_socket_packet(text: &str) -> Result<SocketPacket> {
    let mut chars = text.chars();
    let kind = chars
        .next()
        .ok_or_else(|| Error::protocol("empty socket packet"))
        .and_then(SocketPacketKind::from_digit)?;
    let mut rest = chars.as_str();

    let namespace = if rest.starts_with('/') {
        match rest.find(',') {
            Some(idx) => {
                let ns = &rest[..idx];
                rest = &rest[idx + 1..];
                ns.to_string()
            }
            None => {
                let ns = rest.to_string();
                rest = "";
                ns
            }
        }
    } else {
        "/".to_string()
    };

    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    let ack_id = if digits > 0 {
        let id = rest[..digits]
            .parse::<u64>()
            .map_err(|e| Error::protocol(format!("invalid ack id: {e}")))?;
        rest = &rest[digits..];
        Some(id)
    } else {
        None
    };

    let data = if rest.is_empty() {
        None
    } else {
        Some(
            serde_json::from_str(rest)
                .map_err(|e| Error::protocol(format!("invalid packet payload: {e}")))?,
        )
    };

    Ok(SocketPacket {
        kind,
        namespace,
        ack_id,
        data,
    })
}

/// Frame asking the server to join `namespace`
pub fn encode_connect(namespace: &str) -> String {
    SocketPacket::new(SocketPacketKind::Connect, namespace).to_frame()
}

/// Frame leaving `namespace`
pub fn encode_disconnect(namespace: &str) -> String {
    SocketPacket::new(SocketPacketKind::Disconnect, namespace).to_frame()
}

/// Frame writing `data` to the serial port
pub fn encode_send_data(namespace: &str, data: &str) -> String {
    SocketPacket::new(SocketPacketKind::Event, namespace)
        .with_data(json!([EVENT_DATA_SEND, { "data": data }]))
        .to_frame()
}

/// Map a Socket.IO packet on our namespace to a channel event.
///
/// Returns `None` for packets that carry nothing the controller cares about
/// (other namespaces, acks, unknown events).
pub fn to_channel_event(packet: &SocketPacket, namespace: &str) -> Option<ChannelEvent> {
    if packet.namespace != namespace {
        return None;
    }

    match packet.kind {
        SocketPacketKind::Connect => Some(ChannelEvent::Established),
        SocketPacketKind::Disconnect => Some(ChannelEvent::Closed),
        SocketPacketKind::ConnectError => Some(ChannelEvent::ConnectionError {
            message: packet
                .data
                .as_ref()
                .map(message_field)
                .unwrap_or_else(|| "connection refused".to_string()),
        }),
        SocketPacketKind::Event => {
            let (name, arg) = packet.event()?;
            match name {
                EVENT_DATA_RECV => Some(ChannelEvent::DataReceived {
                    data: arg.map(|v| string_field(v, "data")).unwrap_or_default(),
                }),
                EVENT_SERIAL_ERROR => Some(ChannelEvent::ProtocolError {
                    message: arg.map(message_field).unwrap_or_default(),
                }),
                _ => None,
            }
        }
        SocketPacketKind::Ack => None,
    }
}

fn message_field(value: &Value) -> String {
    string_field(value, "message")
}

/// Pull `key` out of an object argument, tolerating bare values.
fn string_field(value: &Value, key: &str) -> String {
    match value {
        Value::Object(map) => match map.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        },
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

/// Build the WebSocket URL for a session on `server`.
///
/// `server` may use `http`, `https`, `ws` or `wss`; the port and baud rate
/// travel as query parameters, which is how the bridge scopes the session.
pub fn build_channel_url(server: &Url, params: &SessionParameters) -> Result<Url> {
    let scheme = match server.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        _ => return Err(Error::invalid_server_url(server.as_str())),
    };

    let mut url = server
        .join("socket.io/")
        .map_err(|_| Error::invalid_server_url(server.as_str()))?;
    url.set_scheme(scheme)
        .map_err(|_| Error::invalid_server_url(server.as_str()))?;
    url.query_pairs_mut()
        .clear()
        .append_pair("EIO", ENGINE_IO_VERSION)
        .append_pair("transport", "websocket")
        .append_pair("port", &params.port)
        .append_pair("baudrate", &params.baud_rate.to_string());
    Ok(url)
}
