//! # Systems
//!
//! A system is a stateful update unit. Once per tick the
//! [`Scheduler`](super::Scheduler) hands it the registry it is bound to,
//! and the system reads and mutates entities through it.
//!
//! Systems never own entities or components.
//!
//! ```rust
//! use indie_ecs::{Component, EntityRegistry, System};
//!
//! struct Poison(u32);
//! impl Component for Poison {}
//!
//! struct Health(u32);
//! impl Component for Health {}
//!
//! struct PoisonTick;
//!
//! impl System for PoisonTick {
//!     fn update(&mut self, registry: &mut EntityRegistry) {
//!         registry.for_each::<(Health, Poison), _>(|_, (health, poison)| {
//!             health.0 = health.0.saturating_sub(poison.0);
//!         });
//!     }
//! }
//! ```

use std::any::Any;

use super::registry::EntityRegistry;

/// Dynamic downcasting for trait objects.
///
/// Blanket-implemented for every `'static` type.
pub trait AsAny: Any {
    /// Upcasts to `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Upcasts to `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Upcasts a box to `Box<dyn Any>`.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// An update unit driven by the scheduler.
pub trait System: AsAny {
    /// Advances the system by one tick.
    ///
    /// Called only while the system is active. Must be safe to call any
    /// number of times.
    fn update(&mut self, registry: &mut EntityRegistry);

    /// Called once when the system is added to a scheduler, before its
    /// first `update`.
    fn attach(&mut self, _registry: &mut EntityRegistry) {}

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Downcasts an erased system to its concrete type.
pub(crate) fn downcast_ref<S: System>(system: &dyn System) -> Option<&S> {
    system.as_any().downcast_ref::<S>()
}

/// Downcasts an erased system to its concrete type, mutably.
pub(crate) fn downcast_mut<S: System>(system: &mut dyn System) -> Option<&mut S> {
    system.as_any_mut().downcast_mut::<S>()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        ticks: u32,
    }

    impl System for Counter {
        fn update(&mut self, _registry: &mut EntityRegistry) {
            self.ticks += 1;
        }
    }

    #[test]
    fn test_downcast_through_trait_object() {
        let mut boxed: Box<dyn System> = Box::new(Counter { ticks: 0 });
        let mut registry = EntityRegistry::new();
        boxed.update(&mut registry);

        assert_eq!(downcast_ref::<Counter>(boxed.as_ref()).map(|c| c.ticks), Some(1));
        downcast_mut::<Counter>(boxed.as_mut()).unwrap().ticks = 10;
        assert_eq!(downcast_ref::<Counter>(boxed.as_ref()).map(|c| c.ticks), Some(10));
    }

    #[test]
    fn test_default_name_is_type_path() {
        let boxed: Box<dyn System> = Box::new(Counter { ticks: 0 });
        assert!(boxed.name().ends_with("Counter"));
    }
}
