//! Configuration file management.

use std::path::PathBuf;

use guild_types::{BlockTimestamp, Name};
use serde::{Deserialize, Serialize};

/// Complete daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Distribution crank settings.
    #[serde(default)]
    pub distribution: DistributionConfig,
    /// Advanced settings.
    #[serde(default)]
    pub advanced: AdvancedConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
}

/// Distribution crank configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Account that holds swept funds awaiting payout.
    #[serde(default = "default_contract_account")]
    pub contract_account: String,
    /// Unix seconds of the first period. 0 = do not seed the queue.
    #[serde(default)]
    pub start_time: u64,
    /// Step budget per `distribute_monthly` call.
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
    /// Step budget per `gc` call.
    #[serde(default = "default_gc_max_steps")]
    pub gc_max_steps: u32,
    /// Seconds between crank passes.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
}

/// Advanced configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedConfig {
    /// Log level: "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions

fn default_contract_account() -> String {
    "guild.treasury".to_string()
}

fn default_max_steps() -> u32 {
    100
}

fn default_gc_max_steps() -> u32 {
    50
}

fn default_tick_interval() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            contract_account: default_contract_account(),
            start_time: 0,
            max_steps: default_max_steps(),
            gc_max_steps: default_gc_max_steps(),
            tick_interval_secs: default_tick_interval(),
        }
    }
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl DistributionConfig {
    pub fn contract(&self) -> Name {
        Name::new(self.contract_account.as_str())
    }

    /// The configured start time, zero if seeding is disabled.
    pub fn start(&self) -> BlockTimestamp {
        if self.start_time == 0 {
            BlockTimestamp::default()
        } else {
            BlockTimestamp::from_unix_secs(self.start_time)
        }
    }
}

impl DaemonConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: DaemonConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("GUILD_DATA_DIR") {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "macos")]
        {
            dirs_fallback("Library/Application Support/Guild")
        }
        #[cfg(target_os = "windows")]
        {
            dirs_fallback("Guild")
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            dirs_fallback(".guild")
        }
    }
}

/// Fallback home directory resolution.
fn dirs_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| PathBuf::from("/tmp/guild"))
}
