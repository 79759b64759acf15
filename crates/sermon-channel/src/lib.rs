//! # sermon-channel - Session Transport
//!
//! Talks to the remote serial bridge: a Socket.IO session channel over
//! WebSocket for serial traffic, and an HTTP request for port discovery.
//!
//! Depends on [`sermon_core`] for channel event types and error handling.
//!
//! ## Public API
//!
//! ### Session Channel (`client`)
//! - [`SessionChannel`] - Open a channel scoped to one port and baud rate
//! - [`ChannelSender`] - Fire-and-forget outbound data and close
//! - [`ChannelConfig`] - Server URL, namespace and connect timeout
//!
//! ### Wire Codec (`protocol`)
//! - [`parse_engine_packet()`], [`parse_socket_packet()`] - Frame parsing
//! - [`to_channel_event()`] - Map Socket.IO packets to [`sermon_core::ChannelEvent`]
//!
//! ### Port Discovery (`ports`)
//! - [`PortSource`] - Async source of port names
//! - [`HttpPortSource`] - `GET /api/list_ports` implementation

pub mod client;
pub mod ports;
pub mod protocol;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use client::{
    ChannelCommand, ChannelConfig, ChannelSender, SessionChannel, DEFAULT_CONNECT_TIMEOUT,
};
pub use ports::{HttpPortSource, LocalPortSource, PortSource, DEFAULT_LIST_TIMEOUT};
pub use protocol::{
    build_channel_url, parse_engine_packet, parse_socket_packet, to_channel_event, EnginePacket,
    Handshake, SocketPacket, SocketPacketKind, DEFAULT_NAMESPACE,
};
