//! # Indie
//!
//! A headless game runtime on top of `indie_ecs`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              INDIE RUNTIME                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐    │
//! │  │   config        │────>│   game_loop     │────>│   gameplay      │    │
//! │  │                 │     │                 │     │                 │    │
//! │  │  • TOML file    │     │  • Scheduler    │     │  • Components   │    │
//! │  │  • Validation   │     │  • Pacing       │     │  • Systems      │    │
//! │  │  • Registry size│     │  • Tick stats   │     │  • Seeding      │    │
//! │  └─────────────────┘     └────────┬────────┘     └─────────────────┘    │
//! │                                   │                                     │
//! │                          ┌────────┴────────┐                            │
//! │                          │   indie_ecs     │                            │
//! │                          │  EntityRegistry │                            │
//! │                          └─────────────────┘                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: Runtime configuration loaded from TOML
//! - `error`: Runtime error type
//! - `game_loop`: Tick orchestration and timing
//! - `gameplay`: Example components and systems

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod game_loop;
pub mod gameplay;

pub use indie_ecs as ecs;

pub use config::{GameConfig, RegistrySettings};
pub use error::{GameError, GameResult};
pub use game_loop::{GameLoop, StopHandle, TickStats, TickStatsAccumulator};
