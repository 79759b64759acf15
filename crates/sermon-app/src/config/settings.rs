//! Settings file loading and creation

use std::path::{Path, PathBuf};

use sermon_core::prelude::*;

use super::types::Settings;

const CONFIG_DIR: &str = "sermon";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_CONFIG: &str = r#"# sermon configuration

[server]
url = "http://localhost:50002"    # Serial bridge base URL
namespace = "/serial"
connect_timeout_ms = 5000

[serial]
default_baud_rate = 115200
baud_rates = [9600, 19200, 38400, 57600, 115200, 230400, 460800, 921600]
# default_port = "COM3"

[log]
timestamps = true       # Prefix TX/RX lines with [HH:MM:SS.mmm]:
max_lines = 10000       # 0 keeps everything

[timed_send]
default_interval_ms = 1000
"#;

/// Default location: `<config_dir>/sermon/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

/// Explicit path if given, otherwise the default location
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(default_config_path)
}

/// Load settings from `config_path`
///
/// Missing or invalid files yield defaults.
pub fn load_settings(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Write the default config file if none exists
///
/// Returns `true` if a file was created.
pub fn init_config_file(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::config(format!("Failed to create {:?}: {}", parent, e)))?;
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;

    info!("Created default config at {:?}", config_path);
    Ok(true)
}
