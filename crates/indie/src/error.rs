//! # Game Error Types
//!
//! Failures surfaced while setting up and running the game.

use std::path::PathBuf;

use indie_ecs::EcsError;
use thiserror::Error;

/// Errors that can occur in the game runtime.
#[derive(Error, Debug)]
pub enum GameError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for [`GameConfig`](crate::GameConfig).
    #[error("failed to parse config: {0}")]
    ParseConfig(#[from] toml::de::Error),

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The ECS core rejected an operation.
    #[error(transparent)]
    Ecs(#[from] EcsError),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
