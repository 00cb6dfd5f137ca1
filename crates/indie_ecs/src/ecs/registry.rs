//! # Entity Registry
//!
//! Owns every entity and every component pool of one world.
//!
//! ## Lifecycle
//!
//! - `create` reuses a recycled entity number if one exists, otherwise
//!   issues the next fresh number.
//! - `destroy` strips the entity from every pool, removes it from the live
//!   set and pushes it onto the recycled set.
//! - Pools are created the first time a component type is assigned and live
//!   as long as the registry.
//!
//! ## Recycling Order
//!
//! The recycled set is a [`SparseSet`], and `create` takes its first dense
//! element. Destroying `A` then `B` makes the next two `create` calls
//! return `A` then `B`. With three or more recycled entities the swap-remove
//! reorders the tail: destroying `A`, `B`, `C` yields `A`, `C`, `B`.
//!
//! ## Contracts
//!
//! Operations on dead entities, double assignment and removal of missing
//! components are rejected with an [`EcsError`] rather than being trusted.

use std::fmt;

use super::component::Component;
use super::entity::Entity;
use super::pool::Pool;
use super::pool_table::PoolTable;
use super::query::{ComponentSet, Query};
use super::sparse_set::SparseSet;
use crate::config::RegistryConfig;
use crate::error::{EcsError, EcsResult};

/// The universe of entities and their components.
///
/// # Example
///
/// ```rust
/// use indie_ecs::{Component, EntityRegistry};
///
/// #[derive(Debug, PartialEq)]
/// struct Health(u32);
/// impl Component for Health {}
///
/// let mut registry = EntityRegistry::new();
/// let hero = registry.create();
/// registry.assign(hero, Health(100)).unwrap();
///
/// assert!(registry.has::<(Health,)>(hero));
/// assert_eq!(registry.count::<(Health,)>(), 1);
///
/// registry.destroy(hero).unwrap();
/// assert!(!registry.exists(hero));
/// assert_eq!(registry.count::<(Health,)>(), 0);
/// ```
pub struct EntityRegistry {
    /// Live entities.
    entities: SparseSet<Entity>,
    /// Destroyed entities waiting to be handed out again.
    recycled: SparseSet<Entity>,
    /// Next never-issued entity number.
    next_entity: u32,
    /// One pool per component type ever assigned.
    pools: PoolTable,
    /// Sizing hints.
    config: RegistryConfig,
}

impl EntityRegistry {
    /// Creates a registry with the default [`RegistryConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates a registry sized by `config`.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            entities: SparseSet::with_capacity(config.entity_capacity),
            recycled: SparseSet::with_capacity(config.entity_capacity),
            next_entity: 0,
            pools: PoolTable::new(),
            config,
        }
    }

    /// Returns the sizing hints this registry was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Entity lifecycle
    // ---------------------------------------------------------------------

    /// Creates a live entity.
    ///
    /// # Panics
    ///
    /// Panics if every entity number below [`Entity::NULL`] has been issued
    /// and none is waiting to be recycled.
    pub fn create(&mut self) -> Entity {
        let entity = match self.recycled.first() {
            Some(entity) => {
                self.recycled.erase(entity);
                entity
            }
            None => {
                assert!(
                    self.next_entity < Entity::NULL.raw(),
                    "entity space exhausted: {} entities issued",
                    self.next_entity
                );
                let entity = Entity::from_raw(self.next_entity);
                self.next_entity += 1;
                entity
            }
        };

        if entity.index() >= self.entities.capacity() {
            tracing::trace!(
                entity = entity.raw(),
                capacity = self.entities.capacity(),
                "growing entity set"
            );
        }

        // Pools reachable through `pool_mut` may hold a value for a number
        // that was not alive
        let stale = self.pools.remove_entity(entity);
        if stale > 0 {
            tracing::debug!(entity = entity.raw(), stale, "dropped components of a dead entity");
        }

        self.entities.insert(entity);
        entity
    }

    /// Destroys `entity`, dropping all of its components.
    ///
    /// # Errors
    ///
    /// [`EcsError::DeadEntity`] if `entity` is not alive.
    pub fn destroy(&mut self, entity: Entity) -> EcsResult<()> {
        self.ensure_alive(entity)?;
        self.destroy_unchecked(entity);
        Ok(())
    }

    /// Destroys each entity in turn, left to right.
    ///
    /// # Returns
    ///
    /// Number of entities destroyed.
    ///
    /// # Errors
    ///
    /// [`EcsError::DeadEntity`] for the first entity that is not alive.
    /// Entities before it stay destroyed.
    pub fn destroy_many<I>(&mut self, entities: I) -> EcsResult<usize>
    where
        I: IntoIterator<Item = Entity>,
    {
        let mut destroyed = 0;
        for entity in entities {
            self.destroy(entity)?;
            destroyed += 1;
        }
        Ok(destroyed)
    }

    /// Destroys every live entity owning all components of `Q`.
    ///
    /// # Returns
    ///
    /// Number of entities destroyed.
    pub fn destroy_with<Q: ComponentSet>(&mut self) -> usize {
        let doomed = self.matching::<Q>();
        for &entity in &doomed {
            self.destroy_unchecked(entity);
        }

        tracing::debug!(components = ?Q::names(), destroyed = doomed.len(), "batch destroy");
        doomed.len()
    }

    /// Destroys every entity. Pools stay allocated.
    ///
    /// Entities are recycled in live order.
    pub fn reset(&mut self) {
        let destroyed = self.entities.len();
        for entity in &self.entities {
            self.recycled.insert(entity);
        }
        self.entities.clear();
        self.pools.clear_all();
        tracing::debug!(destroyed, "registry reset");
    }

    /// Checks if `entity` is alive.
    #[inline]
    #[must_use]
    pub fn exists(&self, entity: Entity) -> bool {
        self.entities.has(entity)
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Checks if no entity is alive.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live entities in registry order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        self.entities.as_slice()
    }

    /// Visits every live entity.
    pub fn for_each_entity<F>(&self, mut f: F)
    where
        F: FnMut(Entity),
    {
        for entity in &self.entities {
            f(entity);
        }
    }

    /// Grows the entity sets for entity numbers below `capacity`.
    pub fn reserve(&mut self, capacity: usize) {
        self.entities.reserve(capacity);
        self.recycled.reserve(capacity);
    }

    /// Entity numbers below this fit without growing.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entities.capacity()
    }

    // ---------------------------------------------------------------------
    // Components
    // ---------------------------------------------------------------------

    /// Attaches `component` to `entity`, creating the pool on first use.
    ///
    /// # Errors
    ///
    /// - [`EcsError::DeadEntity`] if `entity` is not alive
    /// - [`EcsError::AlreadyAssigned`] if it already owns a `C`
    /// - [`EcsError::AllocationFailed`] if the pool cannot be allocated
    pub fn assign<C: Component>(&mut self, entity: Entity, component: C) -> EcsResult<&mut C> {
        self.ensure_alive(entity)?;
        self.pools
            .get_or_insert::<C>(self.config.pool_capacity)?
            .assign(entity, component)
    }

    /// Overwrites the `C` that `entity` owns.
    ///
    /// # Returns
    ///
    /// The previous value.
    ///
    /// # Errors
    ///
    /// - [`EcsError::DeadEntity`] if `entity` is not alive
    /// - [`EcsError::UnregisteredComponent`] if no `C` was ever assigned
    /// - [`EcsError::MissingComponent`] if `entity` owns no `C`
    pub fn replace<C: Component>(&mut self, entity: Entity, component: C) -> EcsResult<C> {
        self.ensure_alive(entity)?;
        self.pools
            .get_mut::<C>()
            .ok_or(EcsError::UnregisteredComponent(C::type_name()))?
            .replace(entity, component)
    }

    /// Assigns or replaces the `C` of `entity`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::DeadEntity`] if `entity` is not alive
    /// - [`EcsError::AllocationFailed`] if the pool cannot be allocated
    pub fn assign_or_replace<C: Component>(&mut self, entity: Entity, component: C) -> EcsResult<&mut C> {
        self.ensure_alive(entity)?;
        self.pools
            .get_or_insert::<C>(self.config.pool_capacity)?
            .assign_or_replace(entity, component)
    }

    /// Removes every component of `Q` from `entity`.
    ///
    /// Nothing is removed unless `entity` owns the whole set.
    ///
    /// # Errors
    ///
    /// - [`EcsError::DeadEntity`] if `entity` is not alive
    /// - [`EcsError::DuplicateComponent`] if `Q` names a type twice
    /// - [`EcsError::MissingComponent`] naming the first component it lacks
    pub fn delete<Q: ComponentSet>(&mut self, entity: Entity) -> EcsResult<()> {
        self.ensure_alive(entity)?;
        if let Some(component) = Q::duplicate() {
            return Err(EcsError::DuplicateComponent(component));
        }
        if let Some(component) = Q::missing_from(self, entity) {
            return Err(EcsError::MissingComponent { entity, component });
        }
        Q::delete_from(self, entity);
        Ok(())
    }

    /// Clears the pools of `Q`. Entities stay alive.
    ///
    /// Types that were never assigned are skipped.
    pub fn reset_pools<Q: ComponentSet>(&mut self) {
        Q::reset_in(self);
    }

    /// Returns the `C` of `entity`, if it is alive and owns one.
    #[inline]
    #[must_use]
    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        if !self.exists(entity) {
            return None;
        }
        self.pools.get::<C>()?.get(entity)
    }

    /// Returns the `C` of `entity` mutably, if it is alive and owns one.
    #[inline]
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        if !self.exists(entity) {
            return None;
        }
        self.pools.get_mut::<C>()?.get_mut(entity)
    }

    /// Returns every component of `Q` owned by `entity`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::DeadEntity`] if `entity` is not alive
    /// - [`EcsError::UnregisteredComponent`] if a type was never assigned
    /// - [`EcsError::DuplicateComponent`] if `Q` names a type twice
    /// - [`EcsError::MissingComponent`] if `entity` lacks a component
    pub fn get_many<Q: ComponentSet>(&mut self, entity: Entity) -> EcsResult<Q::Refs<'_>> {
        self.ensure_alive(entity)?;
        let pools = Q::borrow_pools(self.pools.borrows())?;
        Q::into_refs(pools, entity)
    }

    /// Checks if `entity` is alive and owns every component of `Q`.
    ///
    /// `false` when a pool was never created or `Q` names a type twice.
    #[inline]
    #[must_use]
    pub fn has<Q: ComponentSet>(&self, entity: Entity) -> bool {
        self.exists(entity) && Q::owned_by(self, entity)
    }

    /// Number of live entities owning every component of `Q`.
    ///
    /// Linear in the number of live entities. `0` when `Q` names a type
    /// twice.
    #[must_use]
    pub fn count<Q: ComponentSet>(&self) -> usize {
        self.entities
            .iter()
            .filter(|&entity| Q::owned_by(self, entity))
            .count()
    }

    /// Checks if no live entity owns every component of `Q`.
    #[must_use]
    pub fn is_empty_with<Q: ComponentSet>(&self) -> bool {
        !self.entities.iter().any(|entity| Q::owned_by(self, entity))
    }

    /// Names of the components `entity` owns, in pool creation order.
    ///
    /// Empty when `entity` is not alive.
    #[must_use]
    pub fn component_names(&self, entity: Entity) -> Vec<&'static str> {
        if !self.exists(entity) {
            return Vec::new();
        }
        self.pools.owned_by(entity)
    }

    /// Visits every live entity owning all of `Q`, with its components.
    ///
    /// Pools are resolved once up front. A set naming a type that was never
    /// assigned, or naming a type twice, matches nothing, same as
    /// [`count`](Self::count).
    ///
    /// # Returns
    ///
    /// Number of entities visited.
    pub fn for_each<Q, F>(&mut self, mut f: F) -> usize
    where
        Q: ComponentSet,
        F: FnMut(Entity, Q::Refs<'_>),
    {
        let mut pools = match Q::borrow_pools(self.pools.borrows()) {
            Ok(pools) => pools,
            Err(err) => {
                tracing::trace!(%err, "for_each matched nothing");
                return 0;
            }
        };

        let mut visited = 0;
        for entity in &self.entities {
            if let Some(refs) = Q::fetch(&mut pools, entity) {
                f(entity, refs);
                visited += 1;
            }
        }
        visited
    }

    /// Builds a [`Query`] over the pools of `Q`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnregisteredComponent`] if a type was never assigned
    /// - [`EcsError::DuplicateComponent`] if `Q` names a type twice
    pub fn query<Q: ComponentSet>(&mut self) -> EcsResult<Query<'_, Q>> {
        let pools = Q::borrow_pools(self.pools.borrows())?;
        Ok(Query::new(pools, &self.entities))
    }

    // ---------------------------------------------------------------------
    // Pools
    // ---------------------------------------------------------------------

    /// Typed access to the pool of `C`.
    #[inline]
    #[must_use]
    pub fn pool<C: Component>(&self) -> Option<&Pool<C>> {
        self.pools.get::<C>()
    }

    /// Typed mutable access to the pool of `C`.
    ///
    /// Removing entries through the pool leaves the entities alive.
    /// Entries added for an entity that is not alive are never visible
    /// through the registry and are dropped when [`create`](Self::create)
    /// issues that number.
    #[inline]
    pub fn pool_mut<C: Component>(&mut self) -> Option<&mut Pool<C>> {
        self.pools.get_mut::<C>()
    }

    /// Grows the pool of `C`, creating it if needed.
    ///
    /// # Errors
    ///
    /// [`EcsError::AllocationFailed`] if the allocator refuses.
    pub fn reserve_pool<C: Component>(&mut self, capacity: usize) -> EcsResult<()> {
        self.pools
            .get_or_insert::<C>(self.config.pool_capacity)?
            .reserve(capacity)
    }

    /// Capacity of the pool of `C`, if it exists.
    #[must_use]
    pub fn pool_capacity<C: Component>(&self) -> Option<usize> {
        self.pools.get::<C>().map(Pool::capacity)
    }

    /// Checks if a pool exists for `C`.
    #[must_use]
    pub fn has_pool<C: Component>(&self) -> bool {
        self.pools.contains::<C>()
    }

    /// Number of pools created so far.
    #[inline]
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// `(component name, stored count)` per pool, in creation order.
    pub fn pool_sizes(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.pools.census()
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn ensure_alive(&self, entity: Entity) -> EcsResult<()> {
        if self.exists(entity) {
            Ok(())
        } else {
            Err(EcsError::DeadEntity(entity))
        }
    }

    fn destroy_unchecked(&mut self, entity: Entity) {
        self.pools.remove_entity(entity);
        self.entities.erase(entity);
        self.recycled.insert(entity);
    }

    fn matching<Q: ComponentSet>(&self) -> Vec<Entity> {
        self.entities
            .iter()
            .filter(|&entity| Q::owned_by(self, entity))
            .collect()
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("live", &self.entities.len())
            .field("recycled", &self.recycled.len())
            .field("next_entity", &self.next_entity)
            .field("pools", &self.pools.len())
            .finish()
    }
}
