//! Action handlers: UpdateAction dispatch and background task spawning

use std::sync::Arc;

use tokio::sync::mpsc;

use sermon_channel::{ChannelConfig, HttpPortSource};
use sermon_core::prelude::*;

use crate::config::Settings;
use crate::message::Message;
use crate::UpdateAction;

pub(super) mod channel;
pub(super) mod ports;
pub(super) mod timed_send;

/// Everything background tasks need to reach the bridge
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub channel: ChannelConfig,
    pub port_source: Arc<HttpPortSource>,
}

impl ActionContext {
    /// Build from the `[server]` settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidServerUrl`] if the server URL does not parse.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let server_url = settings.server.parsed_url()?;
        let connect_timeout = settings.server.connect_timeout();
        let port_source = HttpPortSource::new(&server_url, connect_timeout)?;

        Ok(Self {
            channel: ChannelConfig {
                server_url,
                namespace: settings.server.namespace.clone(),
                connect_timeout,
            },
            port_source: Arc::new(port_source),
        })
    }
}

/// Execute an action by spawning a background task
pub fn handle_action(action: UpdateAction, msg_tx: mpsc::Sender<Message>, ctx: &ActionContext) {
    match action {
        UpdateAction::OpenChannel { session_id, params } => {
            channel::spawn_session_channel(session_id, params, ctx.channel.clone(), msg_tx);
        }

        UpdateAction::StartTimedSend {
            job_id,
            interval_ms,
        } => {
            timed_send::spawn_timed_send_timer(job_id, interval_ms, msg_tx);
        }

        UpdateAction::FetchPorts { origin } => {
            ports::spawn_port_fetch(origin, ctx.port_source.clone(), msg_tx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerSettings;

    #[test]
    fn test_context_from_settings() {
        let ctx = ActionContext::from_settings(&Settings::default()).unwrap();
        assert_eq!(ctx.channel.namespace, "/serial");
        assert_eq!(
            ctx.port_source.endpoint().as_str(),
            "http://localhost:50002/api/list_ports"
        );
    }

    #[test]
    fn test_context_rejects_bad_url() {
        let settings = Settings {
            server: ServerSettings {
                url: "nope".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = ActionContext::from_settings(&settings).unwrap_err();
        assert!(matches!(err, sermon_core::Error::InvalidServerUrl { .. }));
        assert!(!err.is_recoverable());
    }
}
