//! Configuration type definitions

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use sermon_core::prelude::*;

/// Baud rates offered by the selector unless configured otherwise
pub const COMMON_BAUD_RATES: [u32; 8] = [9600, 19200, 38400, 57600, 115200, 230400, 460800, 921600];

/// Global settings from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub serial: SerialSettings,

    #[serde(default)]
    pub log: LogSettings,

    #[serde(default)]
    pub timed_send: TimedSendSettings,
}

/// Where the serial bridge lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Base URL of the bridge, e.g. `http://localhost:50002`
    #[serde(default = "default_server_url")]
    pub url: String,

    /// Socket.IO namespace of the serial handlers
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Time allowed to establish a session (and for a port-list fetch)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            namespace: default_namespace(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl ServerSettings {
    pub fn parsed_url(&self) -> Result<Url> {
        Url::parse(&self.url).map_err(|_| Error::invalid_server_url(&self.url))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

fn default_server_url() -> String {
    "http://localhost:50002".to_string()
}

fn default_namespace() -> String {
    "/serial".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    5000
}

/// Serial selector defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialSettings {
    #[serde(default = "default_baud_rate")]
    pub default_baud_rate: u32,

    #[serde(default = "default_baud_rates")]
    pub baud_rates: Vec<u32>,

    /// Port to preselect when it appears in the list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_port: Option<String>,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            default_baud_rate: default_baud_rate(),
            baud_rates: default_baud_rates(),
            default_port: None,
        }
    }
}

impl SerialSettings {
    /// Baud list with the default rate guaranteed present, ascending.
    pub fn effective_baud_rates(&self) -> Vec<u32> {
        let mut rates = if self.baud_rates.is_empty() {
            default_baud_rates()
        } else {
            self.baud_rates.clone()
        };
        if !rates.contains(&self.default_baud_rate) {
            rates.push(self.default_baud_rate);
        }
        rates.sort_unstable();
        rates.dedup();
        rates
    }
}

fn default_baud_rate() -> u32 {
    115200
}

fn default_baud_rates() -> Vec<u32> {
    COMMON_BAUD_RATES.to_vec()
}

/// Log view behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Prefix transmit/receive lines with `[HH:MM:SS.mmm]:`
    #[serde(default = "default_true")]
    pub timestamps: bool,

    /// Oldest lines are dropped beyond this count (0 = unbounded)
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            timestamps: true,
            max_lines: default_max_lines(),
        }
    }
}

fn default_max_lines() -> usize {
    10_000
}

fn default_true() -> bool {
    true
}

/// Timed send defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedSendSettings {
    /// Initial content of the interval input
    #[serde(default = "default_interval_ms")]
    pub default_interval_ms: u64,
}

impl Default for TimedSendSettings {
    fn default() -> Self {
        Self {
            default_interval_ms: default_interval_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    1000
}
