//! # Component Trait
//!
//! Components are plain data attached to entities. Any `'static` type can
//! become a component by opting in:
//!
//! ```rust
//! use indie_ecs::Component;
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! struct Health(u32);
//!
//! impl Component for Health {}
//! ```
//!
//! The registry keys pools by the component's [`std::any::TypeId`], so the
//! type space is scoped to each registry rather than shared process-wide.

/// Marker trait for types that can be stored in a [`Pool`](super::Pool).
pub trait Component: 'static {
    /// Human-readable name used in errors and diagnostics.
    #[must_use]
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }
}
