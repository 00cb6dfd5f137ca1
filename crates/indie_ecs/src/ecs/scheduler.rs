//! # Scheduler
//!
//! Ordered collection of systems bound to one registry.
//!
//! - At most one instance per concrete system type.
//! - Update order is registration order.
//! - Inactive systems are skipped entirely.
//!
//! The scheduler borrows the registry exclusively for its whole lifetime
//! and lends it to each system in turn, so systems never alias it.
//!
//! ## Slots
//!
//! Each system type owns a slot fixed at its first registration. Adding the
//! same type again replaces the instance in place. Removing a system empties
//! its slot without shifting the others, and a later `add` of that type
//! fills the same slot again.

use std::any::TypeId;
use std::collections::HashMap;

use super::registry::EntityRegistry;
use super::system::{self, System};
use crate::error::{EcsError, EcsResult};

/// One registered system and its activation flag.
struct SystemSlot {
    system: Box<dyn System>,
    active: bool,
}

/// Runs systems against a registry once per tick.
///
/// # Example
///
/// ```rust
/// use indie_ecs::{EntityRegistry, Scheduler, System};
///
/// struct Spawner;
///
/// impl System for Spawner {
///     fn update(&mut self, registry: &mut EntityRegistry) {
///         registry.create();
///     }
/// }
///
/// let mut registry = EntityRegistry::new();
/// let mut scheduler = Scheduler::new(&mut registry);
/// scheduler.add(Spawner);
/// scheduler.update();
/// scheduler.update();
/// assert_eq!(scheduler.registry().len(), 2);
/// ```
pub struct Scheduler<'r> {
    /// The registry every system is bound to.
    registry: &'r mut EntityRegistry,
    /// Registration-ordered slots. `None` after removal.
    slots: Vec<Option<SystemSlot>>,
    /// System type -> slot.
    index: HashMap<TypeId, usize>,
    /// Completed `update` calls.
    ticks: u64,
}

impl<'r> Scheduler<'r> {
    /// Creates an empty scheduler bound to `registry`.
    #[must_use]
    pub fn new(registry: &'r mut EntityRegistry) -> Self {
        Self {
            registry,
            slots: Vec::new(),
            index: HashMap::new(),
            ticks: 0,
        }
    }

    /// Registers `system`, active, and returns it.
    ///
    /// The system's [`System::attach`] hook runs first. A system of the same
    /// type already registered is dropped and replaced in its slot.
    ///
    /// # Panics
    ///
    /// Never in practice: the slot filled here is read back with a checked
    /// downcast to the type that was just stored.
    pub fn add<S: System>(&mut self, mut system: S) -> &mut S {
        system.attach(&mut *self.registry);
        let name = system.name();
        let slot = SystemSlot {
            system: Box::new(system),
            active: true,
        };

        let position = match self.index.get(&TypeId::of::<S>()) {
            Some(&position) => {
                if self.slots[position].is_some() {
                    tracing::warn!(system = name, position, "replacing registered system");
                }
                self.slots[position] = Some(slot);
                position
            }
            None => {
                let position = self.slots.len();
                self.slots.push(Some(slot));
                self.index.insert(TypeId::of::<S>(), position);
                position
            }
        };
        tracing::debug!(system = name, position, "system registered");

        match self.slots[position]
            .as_mut()
            .and_then(|slot| system::downcast_mut::<S>(slot.system.as_mut()))
        {
            Some(system) => system,
            None => unreachable!("slot {position} holds the system just stored"),
        }
    }

    /// Unregisters the system of type `S` and hands it back.
    ///
    /// Other systems keep their order.
    pub fn remove<S: System>(&mut self) -> Option<S> {
        let position = *self.index.get(&TypeId::of::<S>())?;
        let slot = self.slots[position].take()?;
        tracing::debug!(system = slot.system.name(), position, "system removed");
        slot.system.into_any().downcast::<S>().ok().map(|system| *system)
    }

    /// Marks `S` active so it runs on the next tick.
    ///
    /// # Errors
    ///
    /// [`EcsError::SystemNotRegistered`] if no `S` is registered.
    pub fn activate<S: System>(&mut self) -> EcsResult<()> {
        self.set_active::<S>(true)
    }

    /// Marks `S` inactive so ticks skip it.
    ///
    /// # Errors
    ///
    /// [`EcsError::SystemNotRegistered`] if no `S` is registered.
    pub fn deactivate<S: System>(&mut self) -> EcsResult<()> {
        self.set_active::<S>(false)
    }

    /// Checks if `S` is registered and active.
    #[must_use]
    pub fn is_active<S: System>(&self) -> bool {
        self.slot::<S>().is_some_and(|slot| slot.active)
    }

    /// Checks if `S` is registered.
    #[must_use]
    pub fn has<S: System>(&self) -> bool {
        self.slot::<S>().is_some()
    }

    /// Returns the registered `S`.
    #[must_use]
    pub fn get<S: System>(&self) -> Option<&S> {
        self.slot::<S>()
            .and_then(|slot| system::downcast_ref::<S>(slot.system.as_ref()))
    }

    /// Returns the registered `S` mutably.
    pub fn get_mut<S: System>(&mut self) -> Option<&mut S> {
        let position = *self.index.get(&TypeId::of::<S>())?;
        self.slots[position]
            .as_mut()
            .and_then(|slot| system::downcast_mut::<S>(slot.system.as_mut()))
    }

    /// Runs one tick: every active system, in registration order.
    pub fn update(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            if slot.active {
                slot.system.update(&mut *self.registry);
            }
        }
        self.ticks += 1;
    }

    /// Number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Checks if no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of the registered systems, in update order.
    #[must_use]
    pub fn system_names(&self) -> Vec<&'static str> {
        self.slots
            .iter()
            .flatten()
            .map(|slot| slot.system.name())
            .collect()
    }

    /// Number of completed ticks.
    #[inline]
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// The bound registry.
    #[must_use]
    pub fn registry(&self) -> &EntityRegistry {
        &*self.registry
    }

    /// The bound registry, mutably.
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut *self.registry
    }

    fn slot<S: System>(&self) -> Option<&SystemSlot> {
        let position = *self.index.get(&TypeId::of::<S>())?;
        self.slots[position].as_ref()
    }

    fn set_active<S: System>(&mut self, active: bool) -> EcsResult<()> {
        let position = self
            .index
            .get(&TypeId::of::<S>())
            .copied()
            .filter(|&position| self.slots[position].is_some())
            .ok_or(EcsError::SystemNotRegistered(std::any::type_name::<S>()))?;

        if let Some(slot) = self.slots[position].as_mut() {
            tracing::trace!(system = slot.system.name(), active, "system toggled");
            slot.active = active;
        }
        Ok(())
    }
}
