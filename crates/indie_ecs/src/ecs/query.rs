//! # Component Sets and Queries
//!
//! A [`ComponentSet`] is a tuple of component types, `(A,)` up to
//! `(A, B, C, D, E, F, G, H)`. It is the type-level argument of every
//! registry operation that names several components at once: `has`,
//! `count`, `delete`, `destroy_with`, `reset_pools`, `for_each`, `query`.
//!
//! A [`Query`] resolves the pools of a set once and then answers
//! membership and fetch requests per entity without looking the pools up
//! again.
//!
//! ```rust
//! use indie_ecs::{Component, EntityRegistry};
//!
//! struct Health(u32);
//! impl Component for Health {}
//! struct Mana(u32);
//! impl Component for Mana {}
//!
//! let mut registry = EntityRegistry::new();
//! let mage = registry.create();
//! registry.assign(mage, Health(80)).unwrap();
//! registry.assign(mage, Mana(120)).unwrap();
//!
//! registry.for_each::<(Health, Mana), _>(|_, (health, mana)| {
//!     health.0 += mana.0 / 10;
//! });
//! assert_eq!(registry.get::<Health>(mage).map(|h| h.0), Some(92));
//! ```

use std::any::TypeId;

use super::component::Component;
use super::entity::Entity;
use super::pool::Pool;
use super::pool_table::PoolBorrows;
use super::registry::EntityRegistry;
use super::sparse_set::SparseSet;
use crate::error::{EcsError, EcsResult};

mod sealed {
    pub trait Sealed {}
}

/// A tuple of distinct component types.
///
/// Implemented for tuples of one to eight [`Component`]s. The methods are
/// the building blocks the registry and [`Query`] are made of; most code
/// never calls them directly.
pub trait ComponentSet: sealed::Sealed + 'static {
    /// Exclusive borrows of the pools backing the set.
    type Pools<'a>;

    /// Exclusive references to one entity's components, in set order.
    type Refs<'a>;

    /// Component names, in set order.
    fn names() -> Vec<&'static str>;

    /// First component named a second time in the set, if any.
    fn duplicate() -> Option<&'static str>;

    /// First component of the set that `entity` does not own.
    ///
    /// A component whose pool was never created counts as not owned.
    fn missing_from(registry: &EntityRegistry, entity: Entity) -> Option<&'static str>;

    /// Checks if `entity` owns every component of the set.
    ///
    /// A set naming a type twice is owned by nothing.
    fn owned_by(registry: &EntityRegistry, entity: Entity) -> bool {
        Self::duplicate().is_none() && Self::missing_from(registry, entity).is_none()
    }

    /// Removes every component of the set that `entity` owns.
    ///
    /// # Returns
    ///
    /// Number of components removed.
    fn delete_from(registry: &mut EntityRegistry, entity: Entity) -> usize;

    /// Clears the pools of the set. Pools never created are skipped.
    fn reset_in(registry: &mut EntityRegistry);

    /// Borrows the pools of the set out of `borrows`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnregisteredComponent`] if a pool does not exist
    /// - [`EcsError::DuplicateComponent`] if a type appears twice
    fn borrow_pools(borrows: PoolBorrows<'_>) -> EcsResult<Self::Pools<'_>>;

    /// Checks membership of `entity` in every borrowed pool.
    fn pools_have(pools: &Self::Pools<'_>, entity: Entity) -> bool;

    /// Fetches the components of `entity`, if it owns them all.
    fn fetch<'a>(pools: &'a mut Self::Pools<'_>, entity: Entity) -> Option<Self::Refs<'a>>;

    /// Consumes the borrows and fetches the components of `entity`.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`] naming the first component `entity`
    /// does not own.
    fn into_refs(pools: Self::Pools<'_>, entity: Entity) -> EcsResult<Self::Refs<'_>>;
}

macro_rules! impl_component_set {
    ($(($ty:ident, $pool:ident)),+) => {
        impl<$($ty: Component),+> sealed::Sealed for ($($ty,)+) {}

        impl<$($ty: Component),+> ComponentSet for ($($ty,)+) {
            type Pools<'a> = ($(&'a mut Pool<$ty>,)+);
            type Refs<'a> = ($(&'a mut $ty,)+);

            fn names() -> Vec<&'static str> {
                vec![$($ty::type_name()),+]
            }

            fn duplicate() -> Option<&'static str> {
                let ids = [$(TypeId::of::<$ty>()),+];
                let names = [$($ty::type_name()),+];
                (1..ids.len())
                    .find(|&i| ids[..i].contains(&ids[i]))
                    .map(|i| names[i])
            }

            fn missing_from(registry: &EntityRegistry, entity: Entity) -> Option<&'static str> {
                $(
                    if !registry.pool::<$ty>().is_some_and(|pool| pool.has(entity)) {
                        return Some($ty::type_name());
                    }
                )+
                None
            }

            fn delete_from(registry: &mut EntityRegistry, entity: Entity) -> usize {
                let mut removed = 0;
                $(
                    if let Some(pool) = registry.pool_mut::<$ty>() {
                        removed += usize::from(pool.delete(entity).is_some());
                    }
                )+
                removed
            }

            fn reset_in(registry: &mut EntityRegistry) {
                $(
                    if let Some(pool) = registry.pool_mut::<$ty>() {
                        pool.reset();
                    }
                )+
            }

            fn borrow_pools(mut borrows: PoolBorrows<'_>) -> EcsResult<Self::Pools<'_>> {
                Ok(($(borrows.take::<$ty>()?,)+))
            }

            fn pools_have(pools: &Self::Pools<'_>, entity: Entity) -> bool {
                let ($($pool,)+) = pools;
                $($pool.has(entity))&&+
            }

            fn fetch<'a>(pools: &'a mut Self::Pools<'_>, entity: Entity) -> Option<Self::Refs<'a>> {
                let ($($pool,)+) = pools;
                Some(($($pool.get_mut(entity)?,)+))
            }

            fn into_refs(pools: Self::Pools<'_>, entity: Entity) -> EcsResult<Self::Refs<'_>> {
                let ($($pool,)+) = pools;
                Ok(($(
                    $pool.get_mut(entity).ok_or(EcsError::MissingComponent {
                        entity,
                        component: $ty::type_name(),
                    })?,
                )+))
            }
        }
    };
}

impl_component_set!((A, a));
impl_component_set!((A, a), (B, b));
impl_component_set!((A, a), (B, b), (C, c));
impl_component_set!((A, a), (B, b), (C, c), (D, d));
impl_component_set!((A, a), (B, b), (C, c), (D, d), (E, e));
impl_component_set!((A, a), (B, b), (C, c), (D, d), (E, e), (F, f));
impl_component_set!((A, a), (B, b), (C, c), (D, d), (E, e), (F, f), (G, g));
impl_component_set!((A, a), (B, b), (C, c), (D, d), (E, e), (F, f), (G, g), (H, h));

/// Ephemeral view over the pools of one [`ComponentSet`].
///
/// Built by [`EntityRegistry::query`]. Holds the registry exclusively for
/// its lifetime, so no entity can be created or destroyed while it is
/// alive.
pub struct Query<'a, Q: ComponentSet> {
    pools: Q::Pools<'a>,
    entities: &'a SparseSet<Entity>,
}

impl<'a, Q: ComponentSet> Query<'a, Q> {
    pub(crate) fn new(pools: Q::Pools<'a>, entities: &'a SparseSet<Entity>) -> Self {
        Self { pools, entities }
    }

    /// Checks if `entity` is alive and owns every component of the set.
    #[must_use]
    pub fn has(&self, entity: Entity) -> bool {
        self.entities.has(entity) && Q::pools_have(&self.pools, entity)
    }

    /// Fetches the components of `entity`, if it is alive and owns them all.
    pub fn get(&mut self, entity: Entity) -> Option<Q::Refs<'_>> {
        if !self.entities.has(entity) {
            return None;
        }
        Q::fetch(&mut self.pools, entity)
    }

    /// Number of live entities owning every component of the set.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entities
            .iter()
            .filter(|&entity| Q::pools_have(&self.pools, entity))
            .count()
    }

    /// Live entities owning every component of the set, in registry order.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        self.entities
            .iter()
            .filter(|&entity| Q::pools_have(&self.pools, entity))
            .collect()
    }

    /// Visits every live entity owning the whole set.
    pub fn for_each<F>(&mut self, mut f: F)
    where
        F: FnMut(Entity, Q::Refs<'_>),
    {
        let entities = self.entities;
        for entity in entities {
            if let Some(refs) = Q::fetch(&mut self.pools, entity) {
                f(entity, refs);
            }
        }
    }
}
