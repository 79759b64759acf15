//! Engine - orchestration state for the TUI runner
//!
//! The Engine owns the TEA state, the message channel, the action context and
//! the settings. Frontends feed it messages and render `engine.state`.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use sermon_core::prelude::*;

use crate::actions::{handle_action, ActionContext};
use crate::config::Settings;
use crate::message::Message;
use crate::process;
use crate::selectors::FetchOrigin;
use crate::signals;
use crate::state::AppState;
use crate::UpdateAction;

/// Capacity of the unified message channel
const MESSAGE_CHANNEL_CAPACITY: usize = 256;

/// Time given to a closing channel to say goodbye to the server
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

/// Orchestration engine for sermon.
pub struct Engine {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, background tasks).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    /// The frontend event loop drains messages from here.
    pub msg_rx: mpsc::Receiver<Message>,

    /// How background tasks reach the bridge
    pub context: ActionContext,

    /// Loaded settings
    pub settings: Settings,
}

impl Engine {
    /// Create the engine.
    ///
    /// Must be called inside a tokio runtime: it spawns the signal handler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidServerUrl`] if `settings.server.url` is not a
    /// usable URL.
    pub fn new(settings: Settings) -> Result<Self> {
        let context = ActionContext::from_settings(&settings)?;
        let state = AppState::with_settings(settings.clone());
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(MESSAGE_CHANNEL_CAPACITY);

        signals::spawn_signal_handler(msg_tx.clone());

        Ok(Self {
            state,
            msg_tx,
            msg_rx,
            context,
            settings,
        })
    }

    /// Kick off startup work: the initial port-list fetch.
    pub fn start(&mut self) {
        info!(
            "Starting against {}",
            self.context.channel.server_url.as_str()
        );
        handle_action(
            UpdateAction::FetchPorts {
                origin: FetchOrigin::Startup,
            },
            self.msg_tx.clone(),
            &self.context,
        );
    }

    /// Process a single message through the TEA update cycle.
    pub fn process_message(&mut self, msg: Message) {
        process::process_message(&mut self.state, msg, &self.msg_tx, &self.context);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Stop the timed send and close the session channel.
    pub async fn shutdown(&mut self) {
        self.state.timed_send.disable();
        if self.state.connection.release() {
            info!("Closed session channel on shutdown");
            tokio::time::sleep(SHUTDOWN_GRACE).await;
        }
    }
}
