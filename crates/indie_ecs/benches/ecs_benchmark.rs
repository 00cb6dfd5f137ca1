//! # ECS Performance Benchmark
//!
//! Targets:
//! - 100,000 entities churned per iteration
//! - Filtered iteration cost proportional to live entities
//! - No allocation on the component access path once pools are warm
//!
//! Run with: `cargo bench --package indie_ecs`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use indie_ecs::{Component, Entity, EntityRegistry, RegistryConfig, SparseSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Entity count for the steady-state benchmarks.
const ENTITY_COUNT: usize = 100_000;

#[derive(Clone, Copy, Debug, Default)]
struct Position {
    x: f32,
    y: f32,
}
impl Component for Position {}

#[derive(Clone, Copy, Debug, Default)]
struct Velocity {
    dx: f32,
    dy: f32,
}
impl Component for Velocity {}

/// Registry with every entity positioned and every other entity moving.
fn populated_registry(count: usize) -> EntityRegistry {
    let mut registry = EntityRegistry::with_config(RegistryConfig::uniform(count));
    for i in 0..count {
        let entity = registry.create();
        #[allow(clippy::cast_precision_loss)]
        let f = i as f32;
        let _ = registry.assign(entity, Position { x: f, y: f });
        if i % 2 == 0 {
            let _ = registry.assign(entity, Velocity { dx: 0.1, dy: 0.2 });
        }
    }
    registry
}

/// Benchmark: raw sparse set insert/erase.
fn bench_sparse_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse_set");

    for count in [1_000_u32, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("insert_erase", count), &count, |b, &count| {
            let mut set: SparseSet<u32> = SparseSet::with_capacity(count as usize);
            b.iter(|| {
                for value in 0..count {
                    set.insert(value);
                }
                for value in (0..count).step_by(2) {
                    set.erase(value);
                }
                let len = set.len();
                set.clear();
                black_box(len)
            });
        });
    }

    group.finish();
}

/// Benchmark: create entities and assign one component.
fn bench_spawn(c: &mut Criterion) {
    c.bench_function("spawn_100K_with_position", |b| {
        b.iter(|| black_box(populated_registry(ENTITY_COUNT).len()));
    });
}

/// Benchmark: the movement tick over half of the entities.
fn bench_for_each(c: &mut Criterion) {
    let mut registry = populated_registry(ENTITY_COUNT);

    c.bench_function("for_each_position_velocity_100K", |b| {
        b.iter(|| {
            let visited = registry.for_each::<(Position, Velocity), _>(|_, (position, velocity)| {
                position.x += velocity.dx * 0.016;
                position.y += velocity.dy * 0.016;
            });
            black_box(visited)
        });
    });

    c.bench_function("pool_for_each_mut_100K", |b| {
        b.iter(|| {
            if let Some(pool) = registry.pool_mut::<Position>() {
                pool.for_each_mut(|_, position| position.x += 0.001);
            }
            black_box(registry.len())
        });
    });
}

/// Benchmark: query lookups by entity handle.
fn bench_random_access(c: &mut Criterion) {
    let mut registry = populated_registry(ENTITY_COUNT);
    let mut rng = StdRng::seed_from_u64(0xBEEF);
    #[allow(clippy::cast_possible_truncation)]
    let handles: Vec<Entity> = (0..10_000)
        .map(|_| Entity::from_raw(rng.gen_range(0..ENTITY_COUNT as u32)))
        .collect();

    c.bench_function("random_get_10K", |b| {
        b.iter(|| {
            let mut sum = 0.0_f32;
            for &entity in &handles {
                if let Some(position) = registry.get::<Position>(entity) {
                    sum += position.x;
                }
            }
            black_box(sum)
        });
    });

    c.bench_function("query_has_10K", |b| {
        b.iter(|| {
            let hits = registry
                .query::<(Position, Velocity)>()
                .map(|query| handles.iter().filter(|&&entity| query.has(entity)).count())
                .unwrap_or(0);
            black_box(hits)
        });
    });
}

/// Benchmark: destroy and recreate a slice of the population.
fn bench_churn(c: &mut Criterion) {
    let mut registry = populated_registry(ENTITY_COUNT);

    c.bench_function("destroy_create_cycle_10K", |b| {
        b.iter(|| {
            let doomed: Vec<Entity> = registry.entities().iter().copied().take(10_000).collect();
            let _ = registry.destroy_many(doomed);
            for _ in 0..10_000 {
                let entity = registry.create();
                let _ = registry.assign(entity, Position::default());
            }
            black_box(registry.len())
        });
    });
}

criterion_group!(
    benches,
    bench_sparse_set,
    bench_spawn,
    bench_for_each,
    bench_random_access,
    bench_churn,
);
criterion_main!(benches);
