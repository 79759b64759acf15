//! sermon-app - Application state and session orchestration for sermon
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management: the connection state machine, the send pipeline, the timed-send
//! scheduler, the session log, configuration loading and the Engine that ties
//! them to background tasks.

pub mod actions;
pub mod config;
pub mod connection;
pub mod controls;
pub mod engine;
pub mod handler;
pub mod indicator;
pub mod input_key;
pub mod log_renderer;
pub mod message;
pub mod process;
pub mod selectors;
pub mod signals;
pub mod state;
pub mod status;
pub mod timed_send;
pub mod validation;

// Re-export primary types
pub use actions::ActionContext;
pub use connection::{ConnectionController, SessionHandle, SessionId};
pub use controls::{Control, ControlEnablement};
pub use engine::Engine;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use log_renderer::{LogLine, LogRenderer, LogViewState};
pub use message::Message;
pub use selectors::FetchOrigin;
pub use state::AppState;
pub use timed_send::{JobId, TimedSendScheduler};
pub use validation::ValidationError;
