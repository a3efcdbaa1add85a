//! Simulator configuration.
//!
//! One TOML file holds the survivor, enemy and encounter parameters plus the
//! run settings. Every section is optional; missing values take defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use outbreak_combat::{EncounterConfig, EnemyConfig, SurvivorConfig};
use outbreak_common::SchemaVersion;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "outbreak.toml";

/// Errors reading or writing a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be encoded
    #[error("Encode error: {0}")]
    Encode(#[from] toml::ser::Error),

    /// Written by an incompatible version
    #[error("Unsupported config version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version in the file
        found: SchemaVersion,
        /// Version this build reads
        supported: SchemaVersion,
    },
}

/// Run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// RNG seed (None picks one at random)
    pub seed: Option<u64>,
    /// Seconds to simulate before calling time
    pub duration: f32,
    /// Fixed time step in seconds
    pub time_step: f32,
    /// Enemies spawned
    pub enemy_count: u32,
    /// Distance from the survivor at which enemies spawn
    pub spawn_distance: f32,
    /// 9mm rounds in the ammo box placed next to the survivor (0 for none)
    pub ammo_drop: u32,
    /// Place a spare assault rifle next to the survivor
    pub spare_rifle: bool,
    /// RON weapon table to use instead of the built-in one
    pub weapon_table: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            duration: 60.0,
            time_step: 1.0 / 60.0,
            enemy_count: 5,
            spawn_distance: 14.0,
            ammo_drop: 30,
            spare_rifle: true,
            weapon_table: None,
        }
    }
}

/// Full simulator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// File format version
    pub version: SchemaVersion,
    /// Run settings
    pub run: RunConfig,
    /// Survivor parameters
    pub survivor: SurvivorConfig,
    /// Enemy parameters
    pub enemy: EnemyConfig,
    /// World and decision parameters
    pub encounter: EncounterConfig,
}

impl SimConfig {
    /// Parse from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        if !SchemaVersion::SIM_CONFIG.can_read(&config.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: SchemaVersion::SIM_CONFIG,
            });
        }
        Ok(config)
    }

    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|contents| Self::from_toml_str(&contents))
        {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to load config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.run.duration = self.run.duration.clamp(0.1, 3600.0);
        self.run.time_step = self.run.time_step.clamp(0.001, 0.25);
        self.run.enemy_count = self.run.enemy_count.min(256);
        self.run.spawn_distance = self.run.spawn_distance.max(0.0);

        self.survivor.validate();
        self.enemy.validate();
        self.encounter.validate();
    }
}
