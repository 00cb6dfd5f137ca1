//! # Registry Configuration
//!
//! Up-front sizing for an [`EntityRegistry`](crate::EntityRegistry).
//! Everything grows on demand, so the defaults only avoid early
//! reallocations.

/// Sizing hints for a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Entity numbers below this fit in the live and recycled sets
    /// without growing.
    pub entity_capacity: usize,
    /// Capacity every lazily created pool starts with.
    pub pool_capacity: usize,
}

impl RegistryConfig {
    /// Same capacity for entities and every pool.
    #[must_use]
    pub const fn uniform(capacity: usize) -> Self {
        Self {
            entity_capacity: capacity,
            pool_capacity: capacity,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            entity_capacity: 1024,
            pool_capacity: 64,
        }
    }
}
