//! # Indie ECS
//!
//! Data-oriented entity/component/system core:
//! - Entities are plain recycled numbers
//! - Components live in dense per-type pools keyed by sparse sets
//! - Systems run once per tick, in registration order, on one thread
//!
//! ## Architecture Rules
//!
//! 1. **O(1) amortized** insert, lookup and erase under entity churn
//! 2. **Per-registry type space** - pools are keyed by `TypeId` inside each
//!    registry, never through process-wide counters
//! 3. **Checked contracts** - misuse surfaces as [`EcsError`], not UB
//!
//! ## Example
//!
//! ```rust
//! use indie_ecs::{Component, EntityRegistry, Scheduler, System};
//!
//! #[derive(Debug, PartialEq)]
//! struct Position(f32);
//! impl Component for Position {}
//!
//! struct Velocity(f32);
//! impl Component for Velocity {}
//!
//! struct Movement;
//!
//! impl System for Movement {
//!     fn update(&mut self, registry: &mut EntityRegistry) {
//!         registry.for_each::<(Position, Velocity), _>(|_, (position, velocity)| {
//!             position.0 += velocity.0;
//!         });
//!     }
//! }
//!
//! let mut registry = EntityRegistry::new();
//! let ball = registry.create();
//! registry.assign(ball, Position(0.0)).unwrap();
//! registry.assign(ball, Velocity(2.0)).unwrap();
//!
//! let mut scheduler = Scheduler::new(&mut registry);
//! scheduler.add(Movement);
//! scheduler.update();
//!
//! assert_eq!(registry.get::<Position>(ball), Some(&Position(2.0)));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;

pub use config::RegistryConfig;
pub use ecs::{
    AsAny, Component, ComponentSet, Entity, EntityRegistry, Pool, PoolBorrows, Query, Scheduler,
    SparseIndex, SparseSet, System,
};
pub use error::{EcsError, EcsResult};
