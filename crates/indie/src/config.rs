//! # Game Configuration
//!
//! Loaded once at startup from TOML. Every key is optional:
//!
//! ```toml
//! tick_rate = 60
//! max_ticks = 600
//! spawn_count = 1000
//!
//! [registry]
//! entity_capacity = 4096
//! ```

use std::path::Path;

use indie_ecs::RegistryConfig;
use serde::Deserialize;

use crate::error::{GameError, GameResult};

/// Highest tick rate the loop can pace reliably with `thread::sleep`.
pub const MAX_TICK_RATE: u32 = 1_000;

/// Registry sizing, as written in the config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Entity numbers below this fit without growing.
    pub entity_capacity: usize,
    /// Starting capacity of every component pool.
    pub pool_capacity: usize,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        let defaults = RegistryConfig::default();
        Self {
            entity_capacity: defaults.entity_capacity,
            pool_capacity: defaults.pool_capacity,
        }
    }
}

impl From<RegistrySettings> for RegistryConfig {
    fn from(settings: RegistrySettings) -> Self {
        Self {
            entity_capacity: settings.entity_capacity,
            pool_capacity: settings.pool_capacity,
        }
    }
}

/// Configuration for the game runtime.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Registry sizing.
    pub registry: RegistrySettings,
    /// Ticks per second. `0` runs unpaced.
    pub tick_rate: u32,
    /// Stop after this many ticks. `0` runs until the stop flag drops.
    pub max_ticks: u64,
    /// Entities seeded before the first tick.
    pub spawn_count: u32,
    /// Entities the spawner adds every tick.
    pub spawn_per_tick: u32,
    /// Ticks between two console reports. `0` disables reports.
    pub report_interval: u64,
    /// Log ticks that exceed their time budget.
    pub enable_timing_logs: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            registry: RegistrySettings::default(),
            tick_rate: 60,
            max_ticks: 0,
            spawn_count: 256,
            spawn_per_tick: 1,
            report_interval: 60,
            enable_timing_logs: false,
        }
    }
}

impl GameConfig {
    /// Reads and validates a config file.
    ///
    /// # Errors
    ///
    /// - [`GameError::ReadConfig`] if the file cannot be read
    /// - [`GameError::ParseConfig`] if it is not valid TOML for this struct
    /// - [`GameError::InvalidConfig`] if a value is out of range
    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| GameError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "loaded game config");
        Ok(config)
    }

    /// Parses and validates TOML text.
    ///
    /// # Errors
    ///
    /// - [`GameError::ParseConfig`] if it is not valid TOML for this struct
    /// - [`GameError::InvalidConfig`] if a value is out of range
    pub fn from_toml_str(content: &str) -> GameResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> GameResult<()> {
        if self.tick_rate > MAX_TICK_RATE {
            return Err(GameError::InvalidConfig(format!(
                "tick_rate {} exceeds {MAX_TICK_RATE}",
                self.tick_rate
            )));
        }
        Ok(())
    }

    /// Registry sizing in core terms.
    #[must_use]
    pub fn registry_config(&self) -> RegistryConfig {
        self.registry.into()
    }
}
