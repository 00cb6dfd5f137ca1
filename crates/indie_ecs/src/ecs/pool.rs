//! # Component Pool
//!
//! Dense, typed storage for one component type.
//!
//! A pool is a [`SparseSet`] of entities plus a parallel `components`
//! array. The component of entity `e` lives at `components[index_of(e)]`,
//! so both arrays must be compacted together: every erase from the set is
//! mirrored by a `swap_remove` on the components at the same position.

use std::ops::{Index, IndexMut};

use super::component::Component;
use super::entity::Entity;
use super::sparse_set::SparseSet;
use crate::error::{EcsError, EcsResult};

/// Storage for every instance of component `C`.
///
/// # Example
///
/// ```rust
/// use indie_ecs::{Component, Entity, Pool};
///
/// #[derive(Debug, PartialEq)]
/// struct Health(u32);
/// impl Component for Health {}
///
/// let mut pool = Pool::new();
/// let entity = Entity::from_raw(4);
/// pool.assign(entity, Health(100)).unwrap();
/// assert_eq!(pool.get(entity), Some(&Health(100)));
/// ```
#[derive(Debug)]
pub struct Pool<C: Component> {
    /// Which entities own a `C`, and where.
    set: SparseSet<Entity>,
    /// Component values, same order as the set's dense array.
    components: Vec<C>,
}

impl<C: Component> Pool<C> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            set: SparseSet::new(),
            components: Vec::new(),
        }
    }

    /// Creates an empty pool sized for entity numbers below `capacity`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            set: SparseSet::with_capacity(capacity),
            components: Vec::with_capacity(capacity),
        }
    }

    /// Attaches `component` to `entity`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::AlreadyAssigned`] if `entity` already owns a `C`
    /// - [`EcsError::AllocationFailed`] if the pool cannot grow
    pub fn assign(&mut self, entity: Entity, component: C) -> EcsResult<&mut C> {
        if self.set.has(entity) {
            return Err(EcsError::AlreadyAssigned {
                entity,
                component: C::type_name(),
            });
        }

        self.grow_for(entity)?;
        self.set.insert(entity);
        self.components.push(component);
        debug_assert_eq!(self.set.len(), self.components.len());

        let slot = self.components.len() - 1;
        Ok(&mut self.components[slot])
    }

    /// Overwrites the component `entity` already owns.
    ///
    /// # Returns
    ///
    /// The previous value.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`] if `entity` owns no `C`.
    pub fn replace(&mut self, entity: Entity, component: C) -> EcsResult<C> {
        let slot = self.slot_of(entity)?;
        Ok(std::mem::replace(&mut self.components[slot], component))
    }

    /// Assigns or replaces, whichever applies.
    ///
    /// # Errors
    ///
    /// [`EcsError::AllocationFailed`] if the pool cannot grow.
    pub fn assign_or_replace(&mut self, entity: Entity, component: C) -> EcsResult<&mut C> {
        match self.set.index_of(entity) {
            Some(slot) => {
                self.components[slot] = component;
                Ok(&mut self.components[slot])
            }
            None => self.assign(entity, component),
        }
    }

    /// Detaches and returns the component of `entity`.
    ///
    /// The last component is swapped into the freed slot.
    pub fn delete(&mut self, entity: Entity) -> Option<C> {
        let slot = self.set.index_of(entity)?;
        self.set.erase(entity);
        let component = self.components.swap_remove(slot);
        debug_assert_eq!(self.set.len(), self.components.len());
        Some(component)
    }

    /// Returns the component of `entity`, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&C> {
        self.set.index_of(entity).map(|slot| &self.components[slot])
    }

    /// Returns the component of `entity` mutably, if any.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut C> {
        self.set.index_of(entity).map(|slot| &mut self.components[slot])
    }

    /// Checks if `entity` owns a `C`.
    #[inline]
    #[must_use]
    pub fn has(&self, entity: Entity) -> bool {
        self.set.has(entity)
    }

    /// Drops every component. Capacity is kept.
    pub fn reset(&mut self) {
        self.set.clear();
        self.components.clear();
    }

    /// Number of stored components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Checks if the pool holds nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Exclusive upper bound of entity numbers addressable without growing.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.set.capacity()
    }

    /// Grows the pool for entity numbers below `capacity`.
    ///
    /// # Errors
    ///
    /// [`EcsError::AllocationFailed`] if the allocator refuses.
    pub fn reserve(&mut self, capacity: usize) -> EcsResult<()> {
        let failed = |_| EcsError::AllocationFailed {
            component: C::type_name(),
            requested: capacity,
        };
        self.set.try_reserve(capacity).map_err(failed)?;
        self.components
            .try_reserve(capacity.saturating_sub(self.components.len()))
            .map_err(failed)
    }

    /// Entities owning a `C`, in storage order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        self.set.as_slice()
    }

    /// Components in storage order.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[C] {
        &self.components
    }

    /// Components in storage order, mutably.
    #[inline]
    pub fn components_mut(&mut self) -> &mut [C] {
        &mut self.components
    }

    /// Iterates `(entity, component)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &C)> + '_ {
        self.set.iter().zip(self.components.iter())
    }

    /// Iterates `(entity, component)` pairs in storage order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut C)> + '_ {
        self.set.iter().zip(self.components.iter_mut())
    }

    /// Visits every `(entity, component)` pair in storage order.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(Entity, &C),
    {
        for (entity, component) in self.iter() {
            f(entity, component);
        }
    }

    /// Visits every `(entity, component)` pair in storage order, mutably.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(Entity, &mut C),
    {
        for (entity, component) in self.iter_mut() {
            f(entity, component);
        }
    }

    fn slot_of(&self, entity: Entity) -> EcsResult<usize> {
        self.set
            .index_of(entity)
            .ok_or(EcsError::MissingComponent {
                entity,
                component: C::type_name(),
            })
    }

    fn grow_for(&mut self, entity: Entity) -> EcsResult<()> {
        let requested = entity.index() + 1;
        let failed = |_| EcsError::AllocationFailed {
            component: C::type_name(),
            requested,
        };
        self.set.try_reserve(requested).map_err(failed)?;
        self.components.try_reserve(1).map_err(failed)
    }
}

impl<C: Component> Default for Pool<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component> Index<Entity> for Pool<C> {
    type Output = C;

    /// # Panics
    ///
    /// Panics if `entity` owns no `C`. Use [`Pool::get`] to probe.
    fn index(&self, entity: Entity) -> &C {
        match self.set.index_of(entity) {
            Some(slot) => &self.components[slot],
            None => panic!("{entity} does not own a {}", C::type_name()),
        }
    }
}

impl<C: Component> IndexMut<Entity> for Pool<C> {
    fn index_mut(&mut self, entity: Entity) -> &mut C {
        match self.set.index_of(entity) {
            Some(slot) => &mut self.components[slot],
            None => panic!("{entity} does not own a {}", C::type_name()),
        }
    }
}
