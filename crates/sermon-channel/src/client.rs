//! Async Socket.IO session channel over WebSocket.
//!
//! [`SessionChannel::open`] spawns one background task that owns the
//! WebSocket for a single serial session. The task reports lifecycle and data
//! as [`ChannelEvent`]s through an mpsc channel and accepts outbound data via
//! the returned [`ChannelSender`].
//!
//! ```text
//!   ChannelSender ──cmd──▶ ┌──────────────────────────────┐
//!                          │ background task               │
//!                          │  connect + engine handshake   │
//!                          │  select! { ws frame,          │
//!   event_rx ◀──event───── │           command,            │
//!                          │           liveness deadline } │
//!                          └──────────────────────────────┘
//! ```
//!
//! The channel never reconnects. Exactly one terminal event (`Closed` or
//! `ConnectionError`) is emitted unless the user closes the channel, in which
//! case nothing further is emitted.

use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use sermon_core::prelude::*;
use sermon_core::{ChannelEvent, SessionParameters};

use crate::protocol::{
    build_channel_url, encode_connect, encode_disconnect, encode_pong, encode_send_data,
    parse_engine_packet, parse_socket_packet, to_channel_event, EnginePacket, Handshake,
    SocketPacketKind, DEFAULT_NAMESPACE,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Capacity of the command channel (bounded, to apply backpressure).
const CMD_CHANNEL_CAPACITY: usize = 64;

/// Default time allowed from dialing until the namespace is joined.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Where and how to reach the bridge server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Base server URL, e.g. `http://localhost:50002`
    pub server_url: Url,
    /// Socket.IO namespace, e.g. `/serial`
    pub namespace: String,
    pub connect_timeout: Duration,
}

impl ChannelConfig {
    pub fn new(server_url: Url) -> Self {
        Self {
            server_url,
            namespace: DEFAULT_NAMESPACE.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Commands sent from a [`ChannelSender`] to the background task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelCommand {
    /// Emit `serial_data_send` with this payload
    SendData { data: String },
    /// Leave the namespace and close the socket
    Close,
}

/// Handle for writing to an open session channel.
///
/// Dropping every clone of the sender closes the channel.
#[derive(Debug, Clone)]
pub struct ChannelSender {
    cmd_tx: mpsc::Sender<ChannelCommand>,
}

impl ChannelSender {
    /// Queue `data` for transmission. Fire-and-forget.
    ///
    /// # Errors
    ///
    /// - [`Error::ChannelClosed`] if the background task has exited.
    /// - [`Error::ChannelSend`] if the command queue is full.
    pub fn send_data(&self, data: &str) -> Result<()> {
        self.cmd_tx
            .try_send(ChannelCommand::SendData {
                data: data.to_string(),
            })
            .map_err(|err| match err {
                mpsc::error::TrySendError::Closed(_) => Error::ChannelClosed,
                mpsc::error::TrySendError::Full(_) => {
                    Error::channel_send("outbound queue is full")
                }
            })
    }

    /// Ask the task to close the channel. Never emits a terminal event.
    pub fn close(&self) {
        // Full or closed both mean the task is going away or will see the
        // drop of this sender; nothing else to do.
        let _ = self.cmd_tx.try_send(ChannelCommand::Close);
    }

    /// Whether the background task is gone
    pub fn is_closed(&self) -> bool {
        self.cmd_tx.is_closed()
    }

    /// Create a sender wired to a plain receiver instead of a socket.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn new_for_test() -> (Self, mpsc::Receiver<ChannelCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(CMD_CHANNEL_CAPACITY);
        (Self { cmd_tx }, cmd_rx)
    }
}

/// Entry point for opening session channels.
pub struct SessionChannel;

impl SessionChannel {
    /// Open a channel scoped to `params` and return its sender.
    ///
    /// Connection happens in the background; the outcome arrives on
    /// `event_tx` as `Established` or `ConnectionError`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidServerUrl`] if no WebSocket URL can be built
    /// from the configured server.
    pub fn open(
        config: &ChannelConfig,
        params: &SessionParameters,
        event_tx: mpsc::Sender<ChannelEvent>,
    ) -> Result<ChannelSender> {
        let url = build_channel_url(&config.server_url, params)?;
        let (cmd_tx, cmd_rx) = mpsc::channel(CMD_CHANNEL_CAPACITY);

        info!("Opening session channel for {} at {}", params, url);
        tokio::spawn(run_channel_task(
            url,
            config.namespace.clone(),
            config.connect_timeout,
            cmd_rx,
            event_tx,
        ));

        Ok(ChannelSender { cmd_tx })
    }
}

// ---------------------------------------------------------------------------
// WebSocket type alias
// ---------------------------------------------------------------------------

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;

// ---------------------------------------------------------------------------
// Background task
// ---------------------------------------------------------------------------

async fn run_channel_task(
    url: Url,
    namespace: String,
    connect_timeout: Duration,
    mut cmd_rx: mpsc::Receiver<ChannelCommand>,
    event_tx: mpsc::Sender<ChannelEvent>,
) {
    let connect_deadline = Instant::now() + connect_timeout;

    let opened = tokio::select! {
        res = tokio::time::timeout_at(connect_deadline, open_transport(&url, &namespace)) => res,
        _ = wait_for_close(&mut cmd_rx) => {
            debug!("Session channel closed before the transport opened");
            return;
        }
    };

    let (ws_stream, handshake) = match opened {
        Ok(Ok(pair)) => pair,
        Ok(Err(err)) => {
            warn!("Session channel failed to open: {}", err);
            emit(&event_tx, connection_error(err.to_string())).await;
            return;
        }
        Err(_) => {
            warn!("Session channel timed out after {:?}", connect_timeout);
            emit(&event_tx, connection_error("timeout")).await;
            return;
        }
    };

    debug!(
        "Engine.IO open: sid={} liveness={:?}",
        handshake.sid,
        handshake.liveness_timeout()
    );

    run_io_loop(
        ws_stream,
        &handshake,
        &namespace,
        connect_deadline,
        &mut cmd_rx,
        &event_tx,
    )
    .await;

    debug!("Session channel task exiting");
}

/// Dial the server, read the Engine.IO open packet and request the namespace.
async fn open_transport(url: &Url, namespace: &str) -> Result<(WsStream, Handshake)> {
    let (mut ws_stream, _response) = connect_async(url.as_str())
        .await
        .map_err(|err| Error::connect(url.as_str(), err.to_string()))?;

    let handshake = loop {
        match ws_stream.next().await {
            Some(Ok(WsMessage::Text(text))) => match parse_engine_packet(text.as_str())? {
                EnginePacket::Open(handshake) => break handshake,
                other => debug!("Ignoring {:?} before engine open", other),
            },
            Some(Ok(WsMessage::Close(_))) | None => return Err(Error::ChannelClosed),
            Some(Ok(_)) => {}
            Some(Err(err)) => return Err(Error::channel(err.to_string())),
        }
    };

    ws_stream
        .send(WsMessage::Text(encode_connect(namespace).into()))
        .await
        .map_err(|err| Error::channel(err.to_string()))?;

    Ok((ws_stream, handshake))
}

/// Run the read/write select loop until the channel ends.
async fn run_io_loop(
    ws_stream: WsStream,
    handshake: &Handshake,
    namespace: &str,
    connect_deadline: Instant,
    cmd_rx: &mut mpsc::Receiver<ChannelCommand>,
    event_tx: &mpsc::Sender<ChannelEvent>,
) {
    let (mut ws_sink, mut ws_stream) = ws_stream.split();
    let liveness = handshake.liveness_timeout();
    let mut established = false;
    let mut last_heard = Instant::now();

    loop {
        let deadline = if established {
            last_heard + liveness
        } else {
            connect_deadline
        };

        tokio::select! {
            // ── Incoming WebSocket frame ─────────────────────────────────
            frame = ws_stream.next() => {
                let text = match frame {
                    Some(Ok(WsMessage::Text(text))) => text,
                    Some(Ok(WsMessage::Close(_))) | None => {
                        debug!("Session channel: WebSocket closed by peer");
                        emit(event_tx, lost(established, "transport close")).await;
                        return;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => {
                        warn!("Session channel: WebSocket read error: {}", err);
                        emit(event_tx, lost(established, err.to_string())).await;
                        return;
                    }
                };

                match parse_engine_packet(text.as_str()) {
                    Ok(EnginePacket::Ping(payload)) => {
                        last_heard = Instant::now();
                        if let Err(err) = ws_sink.send(WsMessage::Text(encode_pong(&payload).into())).await {
                            warn!("Session channel: failed to answer ping: {}", err);
                            emit(event_tx, lost(established, err.to_string())).await;
                            return;
                        }
                    }
                    Ok(EnginePacket::Message(body)) => {
                        last_heard = Instant::now();
                        let packet = match parse_socket_packet(&body) {
                            Ok(packet) => packet,
                            Err(err) => {
                                debug!("Session channel: dropping packet: {}", err);
                                continue;
                            }
                        };
                        let Some(event) = to_channel_event(&packet, namespace) else {
                            trace!("Session channel: unhandled packet {:?}", packet);
                            continue;
                        };
                        if packet.kind == SocketPacketKind::Connect {
                            established = true;
                        }
                        let terminal = event.is_terminal();
                        emit(event_tx, event).await;
                        if terminal {
                            send_close(&mut ws_sink).await;
                            return;
                        }
                    }
                    Ok(EnginePacket::Close) => {
                        debug!("Session channel: engine close from server");
                        emit(event_tx, lost(established, "server closed the session")).await;
                        return;
                    }
                    Ok(_) => {}
                    Err(err) => debug!("Session channel: ignoring frame: {}", err),
                }
            }

            // ── Outgoing command from the sender ─────────────────────────
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(ChannelCommand::SendData { data }) => {
                        if !established {
                            debug!("Session channel: dropping send before established");
                            continue;
                        }
                        let frame = encode_send_data(namespace, &data);
                        if let Err(err) = ws_sink.send(WsMessage::Text(frame.into())).await {
                            warn!("Session channel: write failed: {}", err);
                            emit(event_tx, lost(established, err.to_string())).await;
                            return;
                        }
                    }
                    Some(ChannelCommand::Close) | None => {
                        debug!("Session channel: closing on request");
                        let _ = ws_sink
                            .send(WsMessage::Text(encode_disconnect(namespace).into()))
                            .await;
                        send_close(&mut ws_sink).await;
                        return;
                    }
                }
            }

            // ── Connect timeout / liveness watchdog ──────────────────────
            _ = tokio::time::sleep_until(deadline) => {
                if established {
                    warn!("Session channel: no ping for {:?}, treating as lost", liveness);
                    emit(event_tx, ChannelEvent::Closed).await;
                } else {
                    warn!("Session channel: namespace join timed out");
                    emit(event_tx, connection_error("timeout")).await;
                }
                send_close(&mut ws_sink).await;
                return;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Wait until a close is requested or every sender is dropped.
async fn wait_for_close(cmd_rx: &mut mpsc::Receiver<ChannelCommand>) {
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            ChannelCommand::Close => return,
            ChannelCommand::SendData { .. } => {
                debug!("Session channel: dropping send before established")
            }
        }
    }
}

fn connection_error(message: impl Into<String>) -> ChannelEvent {
    ChannelEvent::ConnectionError {
        message: message.into(),
    }
}

/// Terminal event for a channel that ended without being asked to.
fn lost(established: bool, reason: impl Into<String>) -> ChannelEvent {
    if established {
        ChannelEvent::Closed
    } else {
        connection_error(reason)
    }
}

async fn emit(event_tx: &mpsc::Sender<ChannelEvent>, event: ChannelEvent) {
    if event_tx.send(event).await.is_err() {
        debug!("Session channel: event receiver dropped");
    }
}

/// Send a WebSocket Close frame, ignoring any write errors.
async fn send_close(ws_sink: &mut WsSink) {
    let _ = ws_sink.send(WsMessage::Close(None)).await;
    let _ = ws_sink.close().await;
}
