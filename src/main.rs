//! sermon - A terminal serial-port monitor for remote serial bridges
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use tracing::info;

use sermon_app::config::{self, Settings};

/// sermon - A terminal serial-port monitor for remote serial bridges
#[derive(Parser, Debug)]
#[command(name = "sermon")]
#[command(about = "A terminal serial-port monitor for remote serial bridges", long_about = None)]
struct Args {
    /// Bridge base URL, e.g. http://localhost:3000
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Serial port to preselect once the port list arrives
    #[arg(long, value_name = "NAME")]
    port: Option<String>,

    /// Initial baud rate
    #[arg(long, value_name = "RATE")]
    baud: Option<u32>,

    /// Config file (default: <config_dir>/sermon/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,
}

impl Args {
    fn apply_overrides(&self, settings: &mut Settings) -> Result<()> {
        if let Some(server) = &self.server {
            url::Url::parse(server).map_err(|e| eyre!("invalid --server {server:?}: {e}"))?;
            settings.server.url = server.clone();
        }
        if let Some(port) = &self.port {
            settings.serial.default_port = Some(port.clone());
        }
        if let Some(baud) = self.baud {
            settings.serial.default_baud_rate = baud;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    sermon_core::logging::init()?;

    let config_path = config::resolve_config_path(args.config.as_deref());

    if args.init_config {
        let path = config_path.ok_or_else(|| eyre!("no config directory on this platform"))?;
        if config::init_config_file(&path)? {
            eprintln!("Created {}", path.display());
        } else {
            eprintln!("Config already exists: {}", path.display());
        }
        return Ok(());
    }

    let mut settings = config_path
        .as_deref()
        .map(config::load_settings)
        .unwrap_or_default();
    args.apply_overrides(&mut settings)?;
    info!("Using bridge {}", settings.server.url);

    sermon_tui::run(settings).await?;
    Ok(())
}
