//! Test utilities for session channels
//!
//! Provides an in-process mock of the serial bridge: a WebSocket server that
//! speaks just enough Engine.IO/Socket.IO for one client, and a one-shot HTTP
//! responder for the port-list endpoint.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use url::Url;

use crate::protocol::{
    parse_engine_packet, parse_socket_packet, EnginePacket, SocketPacket, SocketPacketKind,
    DEFAULT_NAMESPACE, EVENT_DATA_RECV, EVENT_DATA_SEND, EVENT_SERIAL_ERROR,
};

const OPEN_PACKET: &str =
    r#"0{"sid":"mock-engine","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;

/// How the mock answers the namespace join
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockBehavior {
    Accept,
    /// Answer with a connect error carrying this message
    Reject(String),
}

/// Things the test can make the server do
#[derive(Debug, Clone)]
pub enum ServerAction {
    Emit { event: String, payload: Value },
    /// Socket.IO disconnect of the namespace
    Disconnect,
    /// Drop the TCP connection without a close handshake
    DropTransport,
    /// Engine.IO ping
    Ping,
}

impl ServerAction {
    pub fn emit_data(data: &str) -> Self {
        Self::Emit {
            event: EVENT_DATA_RECV.to_string(),
            payload: json!({ "data": data }),
        }
    }

    pub fn emit_serial_error(message: &str) -> Self {
        Self::Emit {
            event: EVENT_SERIAL_ERROR.to_string(),
            payload: json!({ "port": "mock", "message": message }),
        }
    }
}

/// Things the server saw the client do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerObservation {
    DataSent(String),
    ClientLeft,
    Pong,
}

/// A single-client mock of the serial bridge.
pub struct MockSerialServer {
    addr: SocketAddr,
    query: Arc<Mutex<Option<String>>>,
    action_tx: mpsc::UnboundedSender<ServerAction>,
    observation_rx: mpsc::UnboundedReceiver<ServerObservation>,
}

impl MockSerialServer {
    /// Bind to an ephemeral localhost port and serve one client.
    pub async fn start(behavior: MockBehavior) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let query = Arc::new(Mutex::new(None));
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (observation_tx, observation_rx) = mpsc::unbounded_channel();

        tokio::spawn(serve_one(
            listener,
            behavior,
            Arc::clone(&query),
            action_rx,
            observation_tx,
        ));

        Ok(Self {
            addr,
            query,
            action_tx,
            observation_rx,
        })
    }

    /// Base URL to hand to the client, e.g. `http://127.0.0.1:PORT`
    pub fn http_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("socket address forms a valid URL")
    }

    /// Query string of the WebSocket upgrade request, once a client connected
    pub fn request_query(&self) -> Option<String> {
        self.query.lock().ok().and_then(|q| q.clone())
    }

    pub fn act(&self, action: ServerAction) {
        let _ = self.action_tx.send(action);
    }

    /// Wait up to `wait` for the next thing the client did
    pub async fn next_observation(&mut self, wait: Duration) -> Option<ServerObservation> {
        tokio::time::timeout(wait, self.observation_rx.recv())
            .await
            .ok()
            .flatten()
    }
}

async fn serve_one(
    listener: TcpListener,
    behavior: MockBehavior,
    query: Arc<Mutex<Option<String>>>,
    mut action_rx: mpsc::UnboundedReceiver<ServerAction>,
    observation_tx: mpsc::UnboundedSender<ServerObservation>,
) {
    let Ok((stream, _)) = listener.accept().await else {
        return;
    };

    let record_query = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
        if let Ok(mut slot) = query.lock() {
            *slot = req.uri().query().map(str::to_string);
        }
        Ok(resp)
    };
    let Ok(mut ws) = accept_hdr_async(stream, record_query).await else {
        return;
    };

    if ws.send(WsMessage::Text(OPEN_PACKET.into())).await.is_err() {
        return;
    }

    // Wait for the namespace join.
    loop {
        match ws.next().await {
            Some(Ok(WsMessage::Text(text))) if text.as_str().starts_with("40") => break,
            Some(Ok(_)) => continue,
            _ => return,
        }
    }

    let reply = match &behavior {
        MockBehavior::Accept => SocketPacket::new(SocketPacketKind::Connect, DEFAULT_NAMESPACE)
            .with_data(json!({ "sid": "mock-socket" })),
        MockBehavior::Reject(message) => {
            SocketPacket::new(SocketPacketKind::ConnectError, DEFAULT_NAMESPACE)
                .with_data(json!({ "message": message }))
        }
    };
    if ws.send(WsMessage::Text(reply.to_frame().into())).await.is_err() {
        return;
    }
    if matches!(behavior, MockBehavior::Reject(_)) {
        return;
    }

    loop {
        tokio::select! {
            frame = ws.next() => {
                let text = match frame {
                    Some(Ok(WsMessage::Text(text))) => text,
                    Some(Ok(_)) => continue,
                    _ => return,
                };
                match parse_engine_packet(text.as_str()) {
                    Ok(EnginePacket::Message(body)) => {
                        let Ok(packet) = parse_socket_packet(&body) else { continue };
                        match packet.kind {
                            SocketPacketKind::Disconnect => {
                                let _ = observation_tx.send(ServerObservation::ClientLeft);
                            }
                            SocketPacketKind::Event => {
                                if let Some((EVENT_DATA_SEND, Some(arg))) = packet.event() {
                                    let data = arg["data"].as_str().unwrap_or_default().to_string();
                                    let _ = observation_tx.send(ServerObservation::DataSent(data));
                                }
                            }
                            _ => {}
                        }
                    }
                    Ok(EnginePacket::Pong(_)) => {
                        let _ = observation_tx.send(ServerObservation::Pong);
                    }
                    _ => {}
                }
            }
            action = action_rx.recv() => {
                let frame = match action {
                    Some(ServerAction::Emit { event, payload }) => {
                        SocketPacket::new(SocketPacketKind::Event, DEFAULT_NAMESPACE)
                            .with_data(json!([event, payload]))
                            .to_frame()
                    }
                    Some(ServerAction::Disconnect) => {
                        SocketPacket::new(SocketPacketKind::Disconnect, DEFAULT_NAMESPACE).to_frame()
                    }
                    Some(ServerAction::Ping) => "2".to_string(),
                    Some(ServerAction::DropTransport) | None => return,
                };
                if ws.send(WsMessage::Text(frame.into())).await.is_err() {
                    return;
                }
            }
        }
    }
}

/// Serve exactly one HTTP request with a JSON `body` and `status`.
///
/// Returns the base URL of the responder.
pub async fn serve_http_once(status: u16, body: &str) -> std::io::Result<Url> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let response = format!(
        "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );

    tokio::spawn(async move {
        let Ok((mut stream, _)) = listener.accept().await else {
            return;
        };
        let mut buf = [0u8; 4096];
        let _ = stream.read(&mut buf).await;
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    });

    Url::parse(&format!("http://{addr}"))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_data_action_payload() {
        match ServerAction::emit_data("OK") {
            ServerAction::Emit { event, payload } => {
                assert_eq!(event, EVENT_DATA_RECV);
                assert_eq!(payload["data"], "OK");
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mock_server_binds_localhost() {
        let server = MockSerialServer::start(MockBehavior::Accept).await.unwrap();
        assert_eq!(server.http_url().host_str(), Some("127.0.0.1"));
        assert!(server.request_query().is_none());
    }
}
