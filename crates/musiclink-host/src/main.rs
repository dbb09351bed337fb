//! MusicLink host entry point.
//!
//! # Usage
//!
//! ```text
//! musiclink [OPTIONS]
//!
//! Options:
//!   --config    <PATH>    Config file [default: platform config dir]
//!   --device    <NAME>    USB product string or port name of the display
//!   --baud      <RATE>    Serial baud rate
//!   --log-level <LEVEL>   Log filter used when RUST_LOG is unset
//! ```
//!
//! Each option can also come from `MUSICLINK_CONFIG`, `MUSICLINK_DEVICE`,
//! `MUSICLINK_BAUD` and `MUSICLINK_LOG_LEVEL`.  Command-line and environment
//! values override the config file.
//!
//! # Startup sequence
//!
//! ```text
//! main()
//!  ├─ parse Cli, load AppConfig, apply overrides
//!  ├─ init tracing (RUST_LOG, else configured level)
//!  └─ ConnectionSupervisor::run_forever()
//!       ├─ SerialConnector  – find and open the device
//!       ├─ OsaScriptPlayer  – query and drive the player
//!       └─ SyncSession      – handshake, then read → dispatch → reconcile
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use musiclink_host::application::clock::SystemClock;
use musiclink_host::application::supervise_connection::ConnectionSupervisor;
use musiclink_host::infrastructure::player::OsaScriptPlayer;
use musiclink_host::infrastructure::serial::SerialConnector;
use musiclink_host::infrastructure::storage::config::{self, AppConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Keeps a serial now-playing display in sync with the desktop media player.
#[derive(Debug, Parser)]
#[command(name = "musiclink", version)]
struct Cli {
    /// Config file to read instead of the platform default.
    ///
    /// Unlike the default location, this file must exist.
    #[arg(long, env = "MUSICLINK_CONFIG")]
    config: Option<PathBuf>,

    /// USB product string (or port name) identifying the display device.
    #[arg(long, env = "MUSICLINK_DEVICE")]
    device: Option<String>,

    /// Serial baud rate.
    #[arg(long, env = "MUSICLINK_BAUD")]
    baud: Option<u32>,

    /// Log level or filter directive, used when `RUST_LOG` is unset.
    #[arg(long, env = "MUSICLINK_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Loads the config file and applies the command-line overrides.
    fn into_app_config(self) -> anyhow::Result<AppConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::read_config(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => config::load_config().context("failed to load config")?,
        };

        if let Some(device) = self.device {
            cfg.device.descriptor = device;
        }
        if let Some(baud) = self.baud {
            cfg.device.baud_rate = baud;
        }
        if let Some(level) = self.log_level {
            cfg.general.log_level = level;
        }
        Ok(cfg)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cfg = Cli::parse().into_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&cfg.general.log_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("MusicLink host starting");
    if !cfg!(target_os = "macos") {
        warn!("player automation uses osascript, which is only available on macOS");
    }
    info!(
        "looking for {:?} @ {} baud; player {:?}",
        cfg.device.descriptor, cfg.device.baud_rate, cfg.player.application
    );

    let connector = SerialConnector::new(
        cfg.device.descriptor.clone(),
        cfg.device.baud_rate,
        cfg.read_timeout(),
    );
    let player = OsaScriptPlayer::new(cfg.player.application.clone());

    let mut supervisor = ConnectionSupervisor::new(
        Box::new(connector),
        Box::new(player),
        Box::new(SystemClock),
        cfg.session_settings(),
        cfg.discovery_backoff(),
    );
    supervisor.run_forever()
}
