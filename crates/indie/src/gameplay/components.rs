//! # Gameplay Components
//!
//! Plain data, `#[repr(C)]` and `Pod` so pools of them can be viewed as
//! flat scalar slices.

use bytemuck::{Pod, Zeroable};
use indie_ecs::Component;

/// Position in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Position {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Component for Position {}

impl Position {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared distance to another position.
    #[inline]
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Velocity in world units per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Velocity {
    /// X speed.
    pub dx: f32,
    /// Y speed.
    pub dy: f32,
}

impl Component for Velocity {}

impl Velocity {
    /// Creates a new velocity.
    #[inline]
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }
}

/// Hit points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Health {
    /// Current hit points.
    pub current: u32,
    /// Upper bound.
    pub max: u32,
}

impl Component for Health {}

impl Health {
    /// Full health.
    #[must_use]
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }
}

/// Mana pool that refills every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Mana {
    /// Current mana.
    pub current: u32,
    /// Upper bound.
    pub max: u32,
    /// Mana restored per tick.
    pub regen: u32,
}

impl Component for Mana {}

/// Remaining ticks before the entity is destroyed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Lifetime {
    /// Ticks left. The entity dies when this reaches zero.
    pub ticks: u32,
}

impl Component for Lifetime {}
