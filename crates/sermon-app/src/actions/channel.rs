//! Session channel spawning and event forwarding.

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use sermon_channel::{ChannelConfig, SessionChannel};
use sermon_core::{ChannelEvent, SessionParameters};

use crate::connection::SessionId;
use crate::message::Message;

/// Capacity of the per-session event channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Open the channel for `session_id` and forward its events into the TEA
/// loop.
///
/// `ChannelAttached` is always posted before the first forwarded event. If
/// the channel cannot even be opened, a `ConnectionError` is posted instead.
pub(super) fn spawn_session_channel(
    session_id: SessionId,
    params: SessionParameters,
    config: ChannelConfig,
    msg_tx: mpsc::Sender<Message>,
) {
    tokio::spawn(async move {
        let (event_tx, mut event_rx) = mpsc::channel::<ChannelEvent>(EVENT_CHANNEL_CAPACITY);

        match SessionChannel::open(&config, &params, event_tx) {
            Ok(sender) => {
                if msg_tx
                    .send(Message::ChannelAttached { session_id, sender })
                    .await
                    .is_err()
                {
                    return;
                }
            }
            Err(e) => {
                if e.is_recoverable() {
                    warn!("Failed to open session {}: {}", session_id, e);
                } else {
                    error!("Cannot open session {}: {}", session_id, e);
                }
                let _ = msg_tx
                    .send(Message::Channel {
                        session_id,
                        event: ChannelEvent::ConnectionError {
                            message: e.to_string(),
                        },
                    })
                    .await;
                return;
            }
        }

        while let Some(event) = event_rx.recv().await {
            if msg_tx
                .send(Message::Channel { session_id, event })
                .await
                .is_err()
            {
                break;
            }
        }
        debug!("Event forwarding for session {} ended", session_id);
    });
}
