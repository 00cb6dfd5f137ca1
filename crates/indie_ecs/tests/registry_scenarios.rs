//! End-to-end registry behavior: lifecycle, recycling and filtered counts.

use indie_ecs::{Component, EcsError, Entity, EntityRegistry};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Health(u32);
impl Component for Health {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Mana(u32);
impl Component for Mana {}

#[test]
fn test_health_mana_scenario() {
    let mut registry = EntityRegistry::new();
    let e0 = registry.create();
    let e1 = registry.create();
    let e2 = registry.create();

    registry.assign(e0, Health(100)).unwrap();
    registry.assign(e2, Health(100)).unwrap();
    registry.assign(e1, Mana(50)).unwrap();
    registry.assign(e2, Mana(50)).unwrap();

    assert_eq!(registry.count::<(Health,)>(), 2);
    assert_eq!(registry.count::<(Mana,)>(), 2);
    assert_eq!(registry.count::<(Health, Mana)>(), 1);
    assert!(registry.has::<(Health, Mana)>(e2));

    registry.destroy(e2).unwrap();

    assert_eq!(registry.count::<(Health,)>(), 1);
    assert_eq!(registry.count::<(Mana,)>(), 1);
    assert_eq!(registry.count::<(Health, Mana)>(), 0);
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_recycling_follows_destroy_order() {
    let mut registry = EntityRegistry::new();
    let a = registry.create();
    let b = registry.create();
    let _keep = registry.create();

    registry.destroy(a).unwrap();
    registry.destroy(b).unwrap();

    assert_eq!(registry.create(), a);
    assert_eq!(registry.create(), b);
    assert_eq!(registry.create(), Entity::from_raw(3));
}

#[test]
fn test_component_lifecycle() {
    let mut registry = EntityRegistry::new();
    let entity = registry.create();

    registry.assign(entity, Health(30)).unwrap();
    assert_eq!(registry.get::<Health>(entity), Some(&Health(30)));

    registry.replace(entity, Health(45)).unwrap();
    assert_eq!(registry.get::<Health>(entity), Some(&Health(45)));
    assert_eq!(registry.count::<(Health,)>(), 1);

    registry.delete::<(Health,)>(entity).unwrap();
    assert!(!registry.has::<(Health,)>(entity));
    assert_eq!(registry.count::<(Health,)>(), 0);
    assert!(matches!(
        registry.delete::<(Health,)>(entity),
        Err(EcsError::MissingComponent { .. })
    ));

    for _ in 0..4 {
        let other = registry.create();
        registry.assign(other, Health(1)).unwrap();
    }
    registry.reset_pools::<(Health,)>();
    assert_eq!(registry.pool::<Health>().map(|pool| pool.len()), Some(0));
}

#[test]
fn test_for_each_count_matches_count_under_churn() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut registry = EntityRegistry::new();
    let mut live: Vec<Entity> = Vec::new();

    for _ in 0..2_000 {
        match rng.gen_range(0..4) {
            0 | 1 => {
                let entity = registry.create();
                if rng.gen_bool(0.7) {
                    registry.assign(entity, Health(rng.gen_range(1..100))).unwrap();
                }
                if rng.gen_bool(0.5) {
                    registry.assign(entity, Mana(rng.gen_range(1..100))).unwrap();
                }
                live.push(entity);
            }
            2 if !live.is_empty() => {
                let victim = live.swap_remove(rng.gen_range(0..live.len()));
                registry.destroy(victim).unwrap();
            }
            _ if !live.is_empty() => {
                let target = live[rng.gen_range(0..live.len())];
                let _ = registry.delete::<(Mana,)>(target);
            }
            _ => {}
        }

        let visited = registry.for_each::<(Health, Mana), _>(|_, _| {});
        assert_eq!(visited, registry.count::<(Health, Mana)>());
    }

    let unique: HashSet<Entity> = registry.entities().iter().copied().collect();
    assert_eq!(unique.len(), registry.len());
    assert_eq!(registry.len(), live.len());
    assert!(live.iter().all(|&entity| registry.exists(entity)));
}

#[test]
fn test_query_view_fetches_tuples() {
    let mut registry = EntityRegistry::new();
    let entities: Vec<Entity> = (0..8).map(|_| registry.create()).collect();
    for (i, &entity) in entities.iter().enumerate() {
        let value = u32::try_from(i).unwrap();
        registry.assign(entity, Health(value)).unwrap();
        if i % 2 == 1 {
            registry.assign(entity, Mana(value * 10)).unwrap();
        }
    }

    let mut query = registry.query::<(Health, Mana)>().unwrap();
    assert_eq!(query.count(), 4);
    query.for_each(|_, (health, mana)| {
        assert_eq!(mana.0, health.0 * 10);
        health.0 = 0;
    });

    assert!(query.get(entities[0]).is_none());
    let (health, mana) = query.get(entities[3]).unwrap();
    assert_eq!((health.0, mana.0), (0, 30));
}

#[test]
fn test_reset_then_reuse() {
    let mut registry = EntityRegistry::new();
    for _ in 0..10 {
        let entity = registry.create();
        registry.assign(entity, Mana(5)).unwrap();
    }

    registry.reset();
    assert!(registry.is_empty());
    assert!(registry.is_empty_with::<(Mana,)>());

    let reused: HashSet<u32> = (0..10).map(|_| registry.create().raw()).collect();
    assert_eq!(reused, (0..10).collect());
    assert_eq!(registry.create().raw(), 10);
}
