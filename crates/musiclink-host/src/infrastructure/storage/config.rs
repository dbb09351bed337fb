//! TOML configuration for the host.
//!
//! Read from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\MusicLink\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/musiclink/config.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/MusicLink/config.toml`
//!
//! Every field is optional; a missing file or section means the built-in
//! value.
//!
//! ```toml
//! [general]
//! log_level = "debug"
//!
//! [device]
//! descriptor = "Nano ESP32"
//! baud_rate = 115200
//!
//! [player]
//! application = "Music"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::application::sync_session::SessionSettings;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` log level or filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Which serial device to look for and how to talk to it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// USB product string (or port name) identifying the device.
    #[serde(default = "default_descriptor")]
    pub descriptor: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Per-read timeout; also the idle tick length of the session loop.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// Wait between discovery attempts while no device is present.
    #[serde(default = "default_discovery_backoff_secs")]
    pub discovery_backoff_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SyncConfig {
    #[serde(default = "default_full_sync_interval_secs")]
    pub full_sync_interval_secs: u64,
    #[serde(default = "default_playlist_settle_ms")]
    pub playlist_settle_ms: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlayerConfig {
    /// Scriptable application name passed to `tell application`.
    #[serde(default = "default_application")]
    pub application: String,
    /// Album/title length above which names are shortened for the display.
    #[serde(default = "default_abbreviate_len")]
    pub abbreviate_len: usize,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_descriptor() -> String {
    "Nano ESP32".to_string()
}
fn default_baud_rate() -> u32 {
    115_200
}
fn default_read_timeout_ms() -> u64 {
    1000
}
fn default_discovery_backoff_secs() -> u64 {
    5
}
fn default_full_sync_interval_secs() -> u64 {
    10
}
fn default_playlist_settle_ms() -> u64 {
    1000
}
fn default_application() -> String {
    "Music".to_string()
}
fn default_abbreviate_len() -> usize {
    musiclink_core::DEFAULT_ABBREVIATE_LEN
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            descriptor: default_descriptor(),
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout_ms(),
            discovery_backoff_secs: default_discovery_backoff_secs(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            full_sync_interval_secs: default_full_sync_interval_secs(),
            playlist_settle_ms: default_playlist_settle_ms(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            application: default_application(),
            abbreviate_len: default_abbreviate_len(),
        }
    }
}

impl AppConfig {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            full_sync_interval: Duration::from_secs(self.sync.full_sync_interval_secs),
            playlist_settle: Duration::from_millis(self.sync.playlist_settle_ms),
            abbreviate_len: self.player.abbreviate_len,
        }
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.device.read_timeout_ms)
    }

    pub fn discovery_backoff(&self) -> Duration {
        Duration::from_secs(self.device.discovery_backoff_secs)
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Reads and parses the config file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read (including when it
/// does not exist) and [`ConfigError::Parse`] if the TOML is malformed.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Loads the config from the default location, returning
/// `AppConfig::default()` if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = config_file_path()?;
    load_config_or_default(&path)
}

fn load_config_or_default(path: &Path) -> Result<AppConfig, ConfigError> {
    match read_config(path) {
        Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            Ok(AppConfig::default())
        }
        other => other,
    }
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("MusicLink"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("MusicLink")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("musiclink"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("musiclink-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config_matches_device_constants() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.device.descriptor, "Nano ESP32");
        assert_eq!(cfg.device.baud_rate, 115_200);
        assert_eq!(cfg.read_timeout(), Duration::from_secs(1));
        assert_eq!(cfg.discovery_backoff(), Duration::from_secs(5));
        assert_eq!(cfg.player.application, "Music");
        assert_eq!(cfg.general.log_level, "info");
    }

    #[test]
    fn test_default_session_settings() {
        assert_eq!(AppConfig::default().session_settings(), SessionSettings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        // Arrange
        let path = temp_config(
            "partial",
            "[device]\nbaud_rate = 9600\n\n[sync]\nfull_sync_interval_secs = 3\n",
        );

        // Act
        let cfg = read_config(&path).unwrap();

        // Assert
        assert_eq!(cfg.device.baud_rate, 9600);
        assert_eq!(cfg.device.descriptor, "Nano ESP32");
        assert_eq!(cfg.session_settings().full_sync_interval, Duration::from_secs(3));
        assert_eq!(cfg.session_settings().playlist_settle, Duration::from_secs(1));
        assert_eq!(cfg.player, PlayerConfig::default());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let path = temp_config("malformed", "[device\nbaud_rate = fast\n");

        assert!(matches!(read_config(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("musiclink-does-not-exist/config.toml");

        assert!(matches!(read_config(&path), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("musiclink-does-not-exist/config.toml");

        assert_eq!(load_config_or_default(&path).unwrap(), AppConfig::default());
    }
}
