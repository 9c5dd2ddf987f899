//! Driver configuration
//!
//! Stored as TOML under the user config directory. Missing files and missing
//! fields fall back to defaults; command line flags override both.

use cybsdk::PostureThresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which device to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSelection {
    /// Real Virtualizer hardware
    #[default]
    Hardware,
    /// Native mockup driven by an XInput controller
    Xinput,
    /// Native mockup driven by the keyboard
    Keyboard,
    /// In-process simulation, no native library needed
    Sim,
}

impl DeviceSelection {
    /// Whether this selection needs the native library
    pub fn needs_library(&self) -> bool {
        !matches!(self, Self::Sim)
    }
}

/// Walker control settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// Multiplier applied to the measured speed
    pub speed_scale: f32,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self { speed_scale: 1.0 }
    }
}

/// Telemetry streaming settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Destination `host:port` (unicast or multicast group)
    pub target: String,
    /// Frames per second
    pub rate_hz: u32,
    /// TTL for multicast frames
    pub multicast_ttl: u32,
    /// Identifier stamped on every frame; receivers drop their own frames
    pub source_id: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            target: "127.0.0.1:5005".to_string(),
            rate_hz: 100,
            multicast_ttl: 4,
            source_id: 5551,
        }
    }
}

/// Top-level driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Explicit path to the native library (searched if unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_path: Option<PathBuf>,
    /// Device to open
    pub device: DeviceSelection,
    /// Polling interval of the live views, ms
    pub poll_interval_ms: u64,
    pub posture: PostureThresholds,
    pub walker: WalkerConfig,
    pub stream: StreamConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            library_path: None,
            device: DeviceSelection::default(),
            poll_interval_ms: 50,
            posture: PostureThresholds::default(),
            walker: WalkerConfig::default(),
            stream: StreamConfig::default(),
        }
    }
}

impl DriverConfig {
    /// Default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("virt_driver")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: DriverConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
