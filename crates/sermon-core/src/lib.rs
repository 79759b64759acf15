//! # sermon-core - Core Domain Types
//!
//! Foundation crate for sermon. Provides domain types, channel event
//! definitions, the port-list contract, error handling and logging setup.
//!
//! This crate has **zero internal dependencies**.
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`ConnectionState`] - Session lifecycle (Disconnected, Connecting, Connected)
//! - [`SessionParameters`] - Port and baud rate captured at connect time
//! - [`LogEntry`] - A single log line with direction and observation time
//! - [`Direction`] - Transmit, Receive or Info
//!
//! ### Events (`events`)
//! - [`ChannelEvent`] - Lifecycle and data events from a session channel
//! - [`PortListResponse`] - Body of the port-list endpoint
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! ```rust
//! use sermon_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all sermon crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use error::{Error, Result, ResultExt};
pub use events::{ChannelEvent, PortListResponse};
pub use types::{ConnectionState, Direction, LogEntry, SessionParameters};
