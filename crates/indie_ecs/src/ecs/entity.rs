//! # Entity Handles
//!
//! An entity is nothing but a number. It owns no data itself; components
//! are attached to it through the registry's pools.
//!
//! Handles are recycled: once an entity is destroyed its number can be
//! handed out again by a later `create`. There is no generation counter,
//! so a stale copy of a destroyed handle aliases whatever entity reuses
//! the number.

use std::fmt;

/// Opaque handle identifying an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// Sentinel handle that never refers to a live entity.
    ///
    /// The registry stops issuing fresh numbers one short of this value.
    pub const NULL: Self = Self(u32::MAX);

    /// Wraps a raw entity number.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw entity number.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the entity number widened for use as a slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Checks if this is the [`Entity::NULL`] sentinel.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl From<u32> for Entity {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({})", self.0)
        }
    }
}
