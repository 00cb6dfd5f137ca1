//! # Entity Component System
//!
//! Sparse-set storage and per-tick dispatch.
//!
//! ## Layers, leaves first
//!
//! - [`SparseSet`]: O(1) membership, insert and swap-remove erase
//! - [`Pool`]: one component type, a sparse set plus a parallel array
//! - [`EntityRegistry`]: entity lifecycle and a lazily grown pool table
//! - [`Query`]: pools of a [`ComponentSet`] resolved once for iteration
//! - [`System`] and [`Scheduler`]: update units run in registration order

mod component;
mod entity;
mod pool;
mod pool_table;
mod query;
mod registry;
mod scheduler;
mod sparse_set;
mod system;

pub use component::Component;
pub use entity::Entity;
pub use pool::Pool;
pub use pool_table::PoolBorrows;
pub use query::{ComponentSet, Query};
pub use registry::EntityRegistry;
pub use scheduler::Scheduler;
pub use sparse_set::{SparseIndex, SparseSet};
pub use system::{AsAny, System};
