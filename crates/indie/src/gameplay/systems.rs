//! # Gameplay Systems
//!
//! Registered in this order by [`install_systems`](super::install_systems):
//!
//! 1. [`ConsoleReporter`] - headless stand-in for a window, reports the world
//! 2. [`Spawner`] - adds drifting entities
//! 3. [`Movement`] - integrates velocity
//! 4. [`ManaRegen`] - refills mana
//! 5. [`Decay`] - counts lifetimes down and destroys the expired

use indie_ecs::{Entity, EntityRegistry, System};

use super::components::{Lifetime, Mana, Position, Velocity};
use super::spawn_drifter;

/// Snapshot of the world taken by [`ConsoleReporter`].
#[derive(Clone, Debug, PartialEq)]
pub struct WorldReport {
    /// Reporter tick the snapshot was taken on.
    pub tick: u64,
    /// Live entities.
    pub live: usize,
    /// `(component, count)` per pool.
    pub pools: Vec<(&'static str, usize)>,
    /// Mean position of every positioned entity.
    pub centroid: Option<Position>,
}

impl WorldReport {
    /// Captures the current state of `registry`.
    #[must_use]
    pub fn capture(tick: u64, registry: &EntityRegistry) -> Self {
        Self {
            tick,
            live: registry.len(),
            pools: registry.pool_sizes().collect(),
            centroid: centroid(registry),
        }
    }
}

/// Mean position over the `Position` pool, read as a flat `f32` slice.
#[allow(clippy::cast_precision_loss)]
fn centroid(registry: &EntityRegistry) -> Option<Position> {
    let pool = registry.pool::<Position>()?;
    if pool.is_empty() {
        return None;
    }

    let flat: &[f32] = bytemuck::cast_slice(pool.components());
    let (sum_x, sum_y) = flat
        .chunks_exact(2)
        .fold((0.0_f64, 0.0_f64), |(x, y), pair| {
            (x + f64::from(pair[0]), y + f64::from(pair[1]))
        });
    let count = pool.len() as f64;

    #[allow(clippy::cast_possible_truncation)]
    let mean = Position::new((sum_x / count) as f32, (sum_y / count) as f32);
    Some(mean)
}

/// Periodic world report, logged and kept for inspection.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    /// Ticks between reports. `0` disables reporting.
    interval: u64,
    /// Ticks seen while active.
    ticks: u64,
    /// Most recent report.
    last: Option<WorldReport>,
}

impl ConsoleReporter {
    /// Creates a reporter firing every `interval` ticks.
    #[must_use]
    pub const fn new(interval: u64) -> Self {
        Self {
            interval,
            ticks: 0,
            last: None,
        }
    }

    /// Most recent report, if one was taken.
    #[must_use]
    pub fn last_report(&self) -> Option<&WorldReport> {
        self.last.as_ref()
    }
}

impl System for ConsoleReporter {
    fn attach(&mut self, registry: &mut EntityRegistry) {
        tracing::info!(live = registry.len(), interval = self.interval, "console attached");
    }

    fn update(&mut self, registry: &mut EntityRegistry) {
        self.ticks += 1;
        if self.interval == 0 || self.ticks % self.interval != 0 {
            return;
        }

        let report = WorldReport::capture(self.ticks, registry);
        tracing::info!(
            tick = report.tick,
            live = report.live,
            pools = ?report.pools,
            centroid = ?report.centroid,
            "world report"
        );
        self.last = Some(report);
    }
}

/// Spawns drifting entities every tick.
#[derive(Debug)]
pub struct Spawner {
    /// Entities per tick.
    per_tick: u32,
    /// Seed for the next entity.
    next_seed: u32,
    /// Total entities spawned.
    spawned: u64,
}

impl Spawner {
    /// Creates a spawner adding `per_tick` entities each tick, seeding from
    /// `first_seed`.
    #[must_use]
    pub const fn new(per_tick: u32, first_seed: u32) -> Self {
        Self {
            per_tick,
            next_seed: first_seed,
            spawned: 0,
        }
    }

    /// Total entities spawned so far.
    #[must_use]
    pub const fn spawned(&self) -> u64 {
        self.spawned
    }
}

impl System for Spawner {
    fn update(&mut self, registry: &mut EntityRegistry) {
        for _ in 0..self.per_tick {
            match spawn_drifter(registry, self.next_seed) {
                Ok(_) => self.spawned += 1,
                Err(err) => {
                    tracing::warn!(%err, "spawn failed");
                    return;
                }
            }
            self.next_seed = self.next_seed.wrapping_add(1);
        }
    }
}

/// Integrates velocity into position.
#[derive(Debug)]
pub struct Movement {
    /// Seconds per tick.
    dt: f32,
}

impl Movement {
    /// Creates a movement system stepping `dt` seconds per tick.
    #[must_use]
    pub const fn new(dt: f32) -> Self {
        Self { dt }
    }
}

impl System for Movement {
    fn update(&mut self, registry: &mut EntityRegistry) {
        let dt = self.dt;
        registry.for_each::<(Position, Velocity), _>(|_, (position, velocity)| {
            position.x += velocity.dx * dt;
            position.y += velocity.dy * dt;
        });
    }
}

/// Refills mana up to its maximum.
#[derive(Debug, Default)]
pub struct ManaRegen;

impl System for ManaRegen {
    fn update(&mut self, registry: &mut EntityRegistry) {
        if let Some(pool) = registry.pool_mut::<Mana>() {
            pool.for_each_mut(|_, mana| {
                mana.current = mana.current.saturating_add(mana.regen).min(mana.max);
            });
        }
    }
}

/// Counts lifetimes down and destroys entities reaching zero.
#[derive(Debug, Default)]
pub struct Decay {
    /// Reused buffer of entities to destroy this tick.
    expired: Vec<Entity>,
    /// Total entities destroyed.
    destroyed: u64,
}

impl Decay {
    /// Total entities destroyed so far.
    #[must_use]
    pub const fn destroyed(&self) -> u64 {
        self.destroyed
    }
}

impl System for Decay {
    fn update(&mut self, registry: &mut EntityRegistry) {
        let expired = &mut self.expired;
        registry.for_each::<(Lifetime,), _>(|entity, (lifetime,)| {
            lifetime.ticks = lifetime.ticks.saturating_sub(1);
            if lifetime.ticks == 0 {
                expired.push(entity);
            }
        });

        match registry.destroy_many(self.expired.drain(..)) {
            Ok(count) => self.destroyed += count as u64,
            Err(err) => tracing::warn!(%err, "decay destroy failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::components::Health;
    use indie_ecs::Scheduler;

    #[test]
    fn test_movement_integrates_velocity() {
        let mut registry = EntityRegistry::new();
        let entity = registry.create();
        registry.assign(entity, Position::new(1.0, 1.0)).unwrap();
        registry.assign(entity, Velocity::new(2.0, -4.0)).unwrap();

        Movement::new(0.5).update(&mut registry);
        assert_eq!(registry.get::<Position>(entity), Some(&Position::new(2.0, -1.0)));
    }

    #[test]
    fn test_mana_regen_caps_at_max() {
        let mut registry = EntityRegistry::new();
        let entity = registry.create();
        registry
            .assign(entity, Mana { current: 8, max: 10, regen: 3 })
            .unwrap();

        let mut regen = ManaRegen;
        regen.update(&mut registry);
        assert_eq!(registry.get::<Mana>(entity).map(|m| m.current), Some(10));
        regen.update(&mut registry);
        assert_eq!(registry.get::<Mana>(entity).map(|m| m.current), Some(10));
    }

    #[test]
    fn test_decay_destroys_expired() {
        let mut registry = EntityRegistry::new();
        let short = registry.create();
        let long = registry.create();
        registry.assign(short, Lifetime { ticks: 1 }).unwrap();
        registry.assign(short, Health::full(5)).unwrap();
        registry.assign(long, Lifetime { ticks: 3 }).unwrap();

        let mut decay = Decay::default();
        decay.update(&mut registry);
        assert!(!registry.exists(short));
        assert!(registry.exists(long));
        assert_eq!(registry.count::<(Health,)>(), 0);
        assert_eq!(decay.destroyed(), 1);

        decay.update(&mut registry);
        decay.update(&mut registry);
        assert!(registry.is_empty());
        assert_eq!(decay.destroyed(), 2);
    }

    #[test]
    fn test_spawner_adds_per_tick() {
        let mut registry = EntityRegistry::new();
        let mut spawner = Spawner::new(3, 0);
        spawner.update(&mut registry);
        spawner.update(&mut registry);
        assert_eq!(registry.len(), 6);
        assert_eq!(spawner.spawned(), 6);
        assert_eq!(registry.count::<(Position, Velocity, Lifetime)>(), 6);
    }

    #[test]
    fn test_reporter_fires_on_interval() {
        let mut registry = EntityRegistry::new();
        let entity = registry.create();
        registry.assign(entity, Position::new(2.0, 4.0)).unwrap();
        let other = registry.create();
        registry.assign(other, Position::new(4.0, 8.0)).unwrap();

        let mut scheduler = Scheduler::new(&mut registry);
        scheduler.add(ConsoleReporter::new(2));
        scheduler.update();
        assert!(scheduler.get::<ConsoleReporter>().unwrap().last_report().is_none());

        scheduler.update();
        let report = scheduler
            .get::<ConsoleReporter>()
            .and_then(ConsoleReporter::last_report)
            .cloned()
            .unwrap();
        assert_eq!(report.tick, 2);
        assert_eq!(report.live, 2);
        assert_eq!(report.pools.len(), 1);
        assert_eq!(report.centroid, Some(Position::new(3.0, 6.0)));
    }

    #[test]
    fn test_deactivated_reporter_does_not_count_ticks() {
        let mut registry = EntityRegistry::new();
        let mut scheduler = Scheduler::new(&mut registry);
        scheduler.add(ConsoleReporter::new(1));
        scheduler.deactivate::<ConsoleReporter>().unwrap();
        scheduler.update();
        assert!(scheduler.get::<ConsoleReporter>().unwrap().last_report().is_none());

        scheduler.activate::<ConsoleReporter>().unwrap();
        scheduler.update();
        let tick = scheduler
            .get::<ConsoleReporter>()
            .and_then(ConsoleReporter::last_report)
            .map(|report| report.tick);
        assert_eq!(tick, Some(1));
    }
}
