//! # ECS Error Types
//!
//! Every contract the registry and scheduler check at their boundary
//! surfaces as an [`EcsError`]. Internal storage invariants are guarded by
//! debug assertions instead.

use thiserror::Error;

use crate::ecs::Entity;

/// Errors returned by the registry, its pools and the scheduler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// Storage for a component pool could not be allocated.
    #[error("failed to allocate storage for {component}: {requested} slots requested")]
    AllocationFailed {
        /// The component whose pool failed to grow.
        component: &'static str,
        /// Number of slots that were requested.
        requested: usize,
    },

    /// The entity is not (or no longer) alive in this registry.
    #[error("{0} is not alive")]
    DeadEntity(Entity),

    /// The entity already owns a component of this type.
    #[error("{entity} already owns a {component}")]
    AlreadyAssigned {
        /// The entity.
        entity: Entity,
        /// The component type.
        component: &'static str,
    },

    /// The entity does not own a component of this type.
    #[error("{entity} does not own a {component}")]
    MissingComponent {
        /// The entity.
        entity: Entity,
        /// The component type.
        component: &'static str,
    },

    /// No pool has ever been created for this component type.
    #[error("component {0} has never been assigned in this registry")]
    UnregisteredComponent(&'static str),

    /// The same component type was named twice in one component set.
    #[error("component {0} appears more than once in the same set")]
    DuplicateComponent(&'static str),

    /// No system of this type is registered with the scheduler.
    #[error("system {0} is not registered")]
    SystemNotRegistered(&'static str),
}

/// Result type for ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;
