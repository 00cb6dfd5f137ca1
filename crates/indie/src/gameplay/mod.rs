//! # Gameplay
//!
//! Example components and systems built on the ECS core:
//! - Drifting entities with a position, a velocity and a lifetime
//! - Some of them carry health and regenerating mana
//! - A headless console reporter stands where a window system would

pub mod components;
pub mod systems;

pub use components::{Health, Lifetime, Mana, Position, Velocity};
pub use systems::{ConsoleReporter, Decay, ManaRegen, Movement, Spawner, WorldReport};

use indie_ecs::{EcsResult, Entity, EntityRegistry, Scheduler};

use crate::config::GameConfig;

/// Shortest lifetime a drifter is spawned with, in ticks.
pub const MIN_LIFETIME: u32 = 30;

/// Spread added on top of [`MIN_LIFETIME`].
pub const LIFETIME_SPREAD: u32 = 90;

/// Fixed step used when the loop runs unpaced.
pub const UNPACED_DT: f32 = 1.0 / 60.0;

/// Spawns one drifter whose components derive from `seed`.
///
/// Every drifter gets [`Position`], [`Velocity`], [`Lifetime`] and
/// [`Health`]. Every third one also gets [`Mana`].
///
/// # Errors
///
/// Propagates pool allocation failures.
#[allow(clippy::cast_precision_loss)]
pub fn spawn_drifter(registry: &mut EntityRegistry, seed: u32) -> EcsResult<Entity> {
    let entity = registry.create();

    let x = (seed % 64) as f32;
    let y = (seed / 64 % 64) as f32;
    let dx = (seed % 7) as f32 - 3.0;
    let dy = (seed % 5) as f32 - 2.0;

    registry.assign(entity, Position::new(x, y))?;
    registry.assign(entity, Velocity::new(dx, dy))?;
    registry.assign(entity, Lifetime { ticks: MIN_LIFETIME + seed % LIFETIME_SPREAD })?;
    registry.assign(entity, Health::full(100))?;
    if seed % 3 == 0 {
        registry.assign(entity, Mana { current: 0, max: 50, regen: 2 })?;
    }
    Ok(entity)
}

/// Spawns `count` drifters with seeds `0..count`.
///
/// # Errors
///
/// Propagates pool allocation failures.
pub fn seed_world(registry: &mut EntityRegistry, count: u32) -> EcsResult<Vec<Entity>> {
    let entities = (0..count)
        .map(|seed| spawn_drifter(registry, seed))
        .collect::<EcsResult<Vec<_>>>()?;
    tracing::info!(count, live = registry.len(), "world seeded");
    Ok(entities)
}

/// Registers the gameplay systems in update order.
pub fn install_systems(scheduler: &mut Scheduler<'_>, config: &GameConfig) {
    #[allow(clippy::cast_precision_loss)]
    let dt = if config.tick_rate == 0 {
        UNPACED_DT
    } else {
        1.0 / config.tick_rate as f32
    };

    scheduler.add(ConsoleReporter::new(config.report_interval));
    scheduler.add(Spawner::new(config.spawn_per_tick, config.spawn_count));
    scheduler.add(Movement::new(dt));
    scheduler.add(ManaRegen);
    scheduler.add(Decay::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_world_components() {
        let mut registry = EntityRegistry::new();
        let entities = seed_world(&mut registry, 9).unwrap();

        assert_eq!(entities.len(), 9);
        assert_eq!(registry.count::<(Position, Velocity, Lifetime, Health)>(), 9);
        assert_eq!(registry.count::<(Mana,)>(), 3);
        assert_eq!(registry.get::<Position>(entities[5]), Some(&Position::new(5.0, 0.0)));
    }

    #[test]
    fn test_install_order() {
        let mut registry = EntityRegistry::new();
        let mut scheduler = Scheduler::new(&mut registry);
        install_systems(&mut scheduler, &GameConfig::default());

        let names = scheduler.system_names();
        assert_eq!(names.len(), 5);
        assert!(names[0].ends_with("ConsoleReporter"));
        assert!(names[4].ends_with("Decay"));
    }
}
