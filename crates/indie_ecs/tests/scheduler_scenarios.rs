//! End-to-end scheduler behavior: ordering and activation.

use indie_ecs::{Component, EntityRegistry, Scheduler, System};

/// Shared log every test system appends to.
#[derive(Debug, Default)]
struct Journal(Vec<&'static str>);
impl Component for Journal {}

fn journal(registry: &mut EntityRegistry) -> &mut Journal {
    let first = registry.entities()[0];
    registry.get_mut::<Journal>(first).unwrap()
}

struct SystemA;

impl System for SystemA {
    fn update(&mut self, registry: &mut EntityRegistry) {
        journal(registry).0.push("A");
    }
}

struct SystemB;

impl System for SystemB {
    fn update(&mut self, registry: &mut EntityRegistry) {
        journal(registry).0.push("B");
    }
}

/// Counts its own ticks; inactive ticks must not advance it.
#[derive(Default)]
struct Clock {
    ticks: u32,
}

impl System for Clock {
    fn update(&mut self, _registry: &mut EntityRegistry) {
        self.ticks += 1;
    }
}

fn registry_with_journal() -> EntityRegistry {
    let mut registry = EntityRegistry::new();
    let log = registry.create();
    registry.assign(log, Journal::default()).unwrap();
    registry
}

#[test]
fn test_systems_run_in_registration_order() {
    let mut registry = registry_with_journal();
    let mut scheduler = Scheduler::new(&mut registry);
    scheduler.add(SystemA);
    scheduler.add(SystemB);

    scheduler.update();
    assert_eq!(journal(scheduler.registry_mut()).0, vec!["A", "B"]);

    scheduler.deactivate::<SystemA>().unwrap();
    scheduler.update();
    assert_eq!(journal(scheduler.registry_mut()).0, vec!["A", "B", "B"]);
}

#[test]
fn test_deactivated_system_state_is_frozen() {
    let mut registry = EntityRegistry::new();
    let mut scheduler = Scheduler::new(&mut registry);
    scheduler.add(Clock::default());

    scheduler.update();
    scheduler.deactivate::<Clock>().unwrap();
    scheduler.update();
    scheduler.update();
    assert_eq!(scheduler.get::<Clock>().map(|clock| clock.ticks), Some(1));

    scheduler.activate::<Clock>().unwrap();
    scheduler.update();
    assert_eq!(scheduler.get::<Clock>().map(|clock| clock.ticks), Some(2));
    assert_eq!(scheduler.tick_count(), 4);
}

#[test]
fn test_removed_system_no_longer_runs() {
    let mut registry = registry_with_journal();
    let mut scheduler = Scheduler::new(&mut registry);
    scheduler.add(SystemA);
    scheduler.add(SystemB);

    assert!(scheduler.remove::<SystemA>().is_some());
    scheduler.update();
    assert_eq!(journal(scheduler.registry_mut()).0, vec!["B"]);
    assert!(scheduler.deactivate::<SystemA>().is_err());
}

#[test]
fn test_registry_outlives_scheduler() {
    let mut registry = registry_with_journal();
    {
        let mut scheduler = Scheduler::new(&mut registry);
        scheduler.add(SystemB);
        scheduler.update();
    }
    assert_eq!(journal(&mut registry).0, vec!["B"]);
}
