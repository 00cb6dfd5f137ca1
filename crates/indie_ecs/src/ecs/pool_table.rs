//! # Pool Table
//!
//! Type-erased collection of every pool a registry owns.
//!
//! Pools of different component types sit behind [`ErasedPool`], which
//! exposes the handful of operations the registry needs without knowing
//! the concrete type (membership test and removal during `destroy`).
//! Typed access goes through a [`TypeId`] lookup and a checked downcast.
//!
//! The `TypeId -> slot` map is owned by the table, so two registries never
//! share a type-id space.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::component::Component;
use super::entity::Entity;
use super::pool::Pool;
use crate::error::{EcsError, EcsResult};

/// Operations the registry performs on a pool without knowing its type.
pub(crate) trait ErasedPool {
    fn has_entity(&self, entity: Entity) -> bool;
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn clear(&mut self);
    fn len(&self) -> usize;
    fn component_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedPool for Pool<C> {
    fn has_entity(&self, entity: Entity) -> bool {
        self.has(entity)
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.delete(entity).is_some()
    }

    fn clear(&mut self) {
        self.reset();
    }

    fn len(&self) -> usize {
        Pool::len(self)
    }

    fn component_name(&self) -> &'static str {
        C::type_name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Every pool of one registry, in creation order.
#[derive(Default)]
pub(crate) struct PoolTable {
    pools: Vec<Box<dyn ErasedPool>>,
    slots: HashMap<TypeId, usize>,
}

impl PoolTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Typed access to the pool of `C`, if one exists.
    pub(crate) fn get<C: Component>(&self) -> Option<&Pool<C>> {
        let slot = *self.slots.get(&TypeId::of::<C>())?;
        self.pools[slot].as_any().downcast_ref::<Pool<C>>()
    }

    /// Typed mutable access to the pool of `C`, if one exists.
    pub(crate) fn get_mut<C: Component>(&mut self) -> Option<&mut Pool<C>> {
        let slot = *self.slots.get(&TypeId::of::<C>())?;
        self.pools[slot].as_any_mut().downcast_mut::<Pool<C>>()
    }

    /// Returns the pool of `C`, creating it with room for entity numbers
    /// below `capacity` on first use.
    pub(crate) fn get_or_insert<C: Component>(&mut self, capacity: usize) -> EcsResult<&mut Pool<C>> {
        let slot = match self.slots.get(&TypeId::of::<C>()) {
            Some(&slot) => slot,
            None => self.insert::<C>(capacity)?,
        };
        self.pools[slot]
            .as_any_mut()
            .downcast_mut::<Pool<C>>()
            .ok_or(EcsError::UnregisteredComponent(C::type_name()))
    }

    fn insert<C: Component>(&mut self, capacity: usize) -> EcsResult<usize> {
        let failed = |_| EcsError::AllocationFailed {
            component: C::type_name(),
            requested: capacity,
        };
        self.pools.try_reserve(1).map_err(failed)?;
        self.slots.try_reserve(1).map_err(failed)?;

        let mut pool = Pool::<C>::new();
        pool.reserve(capacity)?;

        let slot = self.pools.len();
        self.pools.push(Box::new(pool));
        self.slots.insert(TypeId::of::<C>(), slot);

        tracing::debug!(component = C::type_name(), slot, capacity, "allocated component pool");
        Ok(slot)
    }

    /// Checks if a pool exists for `C`.
    pub(crate) fn contains<C: Component>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<C>())
    }

    /// Removes `entity` from every pool holding it.
    ///
    /// # Returns
    ///
    /// Number of components dropped.
    pub(crate) fn remove_entity(&mut self, entity: Entity) -> usize {
        self.pools
            .iter_mut()
            .map(|pool| pool.remove_entity(entity))
            .filter(|&removed| removed)
            .count()
    }

    /// Names of the components `entity` owns, in pool creation order.
    pub(crate) fn owned_by(&self, entity: Entity) -> Vec<&'static str> {
        self.pools
            .iter()
            .filter(|pool| pool.has_entity(entity))
            .map(|pool| pool.component_name())
            .collect()
    }

    /// Clears every pool.
    pub(crate) fn clear_all(&mut self) {
        for pool in &mut self.pools {
            pool.clear();
        }
    }

    /// Component counts per pool, in creation order.
    pub(crate) fn census(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.pools.iter().map(|pool| (pool.component_name(), pool.len()))
    }

    pub(crate) fn len(&self) -> usize {
        self.pools.len()
    }

    /// Splits the table into individually borrowable pools.
    pub(crate) fn borrows(&mut self) -> PoolBorrows<'_> {
        PoolBorrows {
            pools: self.pools.iter_mut().map(Some).collect(),
            slots: &self.slots,
        }
    }
}

/// Disjoint mutable borrows of several pools of one registry.
///
/// Each pool can be taken at most once, which is what lets a component
/// set hand out `&mut` to several pools at the same time.
pub struct PoolBorrows<'a> {
    pools: Vec<Option<&'a mut Box<dyn ErasedPool>>>,
    slots: &'a HashMap<TypeId, usize>,
}

impl<'a> PoolBorrows<'a> {
    /// Takes the pool of `C` out of the borrow set.
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnregisteredComponent`] if the registry has no such pool
    /// - [`EcsError::DuplicateComponent`] if it was already taken
    pub(crate) fn take<C: Component>(&mut self) -> EcsResult<&'a mut Pool<C>> {
        let slot = *self
            .slots
            .get(&TypeId::of::<C>())
            .ok_or(EcsError::UnregisteredComponent(C::type_name()))?;
        let pool = self.pools[slot]
            .take()
            .ok_or(EcsError::DuplicateComponent(C::type_name()))?;
        pool.as_any_mut()
            .downcast_mut::<Pool<C>>()
            .ok_or(EcsError::UnregisteredComponent(C::type_name()))
    }
}
