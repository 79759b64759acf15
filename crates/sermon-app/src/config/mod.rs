//! Configuration file parsing for sermon
//!
//! Settings live in `<config_dir>/sermon/config.toml` unless `--config`
//! points elsewhere.

pub mod settings;
pub mod types;

pub use settings::{default_config_path, init_config_file, load_settings, resolve_config_path};
pub use types::*;
