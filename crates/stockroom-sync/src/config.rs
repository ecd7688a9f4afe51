//! # Inventory Configuration
//!
//! Configuration management for the store and the summary.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKROOM_DB_PATH=./data/stockroom.db                              │
//! │     STOCKROOM_SIGNAL_MODE=accumulate                                   │
//! │     STOCKROOM_MAX_CONNECTIONS=5                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/stockroom/stockroom.toml (Linux)                         │
//! │     ~/Library/Application Support/com.stockroom.stockroom/ (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     platform data dir, 5 connections, SignalMode::LastItem             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # stockroom.toml
//! [store]
//! path = "/var/lib/stockroom/stockroom.db"
//! max_connections = 5
//!
//! [summary]
//! signal_mode = "last_item"  # last_item | accumulate
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stockroom_core::SignalMode;
use stockroom_db::DbConfig;
use tracing::{debug, info, warn};

use crate::engine::EngineOptions;
use crate::error::{EngineError, EngineResult};

const CONFIG_FILE: &str = "stockroom.toml";
const DB_FILE: &str = "stockroom.db";

// =============================================================================
// Store Settings
// =============================================================================

/// Where and how the store is opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Database file. `None` uses the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Maximum pool connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Summary Settings
// =============================================================================

/// How the summary is computed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarySettings {
    /// Spoilage/restock signal derivation.
    #[serde(default)]
    pub signal_mode: SignalMode,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub summary: SummarySettings,
}

impl InventoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (stockroom.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading inventory config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load inventory config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> EngineResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| EngineError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| EngineError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| EngineError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Inventory config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        if self.store.max_connections == 0 {
            return Err(EngineError::InvalidConfig(
                "max_connections must be greater than 0".into(),
            ));
        }

        if let Some(path) = &self.store.path {
            if path.as_os_str().is_empty() {
                return Err(EngineError::InvalidConfig("store path is empty".into()));
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("STOCKROOM_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.store.path = Some(PathBuf::from(path));
        }

        if let Ok(mode) = std::env::var("STOCKROOM_SIGNAL_MODE") {
            match mode.parse::<SignalMode>() {
                Ok(parsed) => {
                    debug!(mode = %parsed, "Overriding signal mode from environment");
                    self.summary.signal_mode = parsed;
                }
                Err(_) => warn!(mode = %mode, "Unknown signal mode in environment"),
            }
        }

        if let Ok(max) = std::env::var("STOCKROOM_MAX_CONNECTIONS") {
            if let Ok(m) = max.parse::<u32>() {
                self.store.max_connections = m;
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "stockroom", "stockroom")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Resolved database file path.
    pub fn database_path(&self) -> EngineResult<PathBuf> {
        if let Some(path) = &self.store.path {
            return Ok(path.clone());
        }

        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join(DB_FILE))
            .ok_or_else(|| EngineError::InvalidConfig("No data directory available".into()))
    }

    /// Store adapter configuration.
    pub fn db_config(&self) -> EngineResult<DbConfig> {
        Ok(DbConfig::new(self.database_path()?).max_connections(self.store.max_connections))
    }

    /// Engine options using the system clock.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions::default().with_signal_mode(self.summary.signal_mode)
    }
}
