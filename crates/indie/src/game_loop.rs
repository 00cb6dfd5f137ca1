//! # Indie Game Loop
//!
//! ```text
//! Tick N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. CHECK STOP FLAG                                                  │
//! │    └─ Leave the loop if it dropped or max_ticks was reached         │
//! │                                                                     │
//! │ 2. SCHEDULER UPDATE                                                 │
//! │    └─ Every active system, in registration order                    │
//! │                                                                     │
//! │ 3. RECORD TIMING                                                    │
//! │    └─ Warn when the tick overran its budget                         │
//! │                                                                     │
//! │ 4. PACE                                                             │
//! │    └─ Sleep out the rest of the tick budget                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop runs on the calling thread. The only way to end it early is
//! the shared stop flag from [`GameLoop::stop_handle`], raised directly or
//! by a `quit` line through [`StopHandle::stop_on_quit`].

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use indie_ecs::{EntityRegistry, Scheduler};

use crate::config::GameConfig;
use crate::error::GameResult;
use crate::gameplay::{install_systems, seed_world};

/// Clonable handle that ends a running [`GameLoop`].
#[derive(Clone, Debug)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    /// Requests the loop to stop after the current tick.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Checks if the loop is still allowed to run.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Reads `input` line by line and stops the loop at the first `quit`.
    ///
    /// Blocks until then. Returns `false` if `input` ended or failed first,
    /// leaving the loop running.
    pub fn stop_on_quit<R: BufRead>(&self, input: R) -> bool {
        for line in input.lines() {
            match line {
                Ok(line) if line.trim().eq_ignore_ascii_case("quit") => {
                    tracing::info!("quit requested from console");
                    self.stop();
                    return true;
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(%err, "console input failed");
                    return false;
                }
            }
        }
        false
    }
}

/// Timing of one tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickStats {
    /// Tick number.
    pub tick: u64,
    /// Time spent in the scheduler, in microseconds.
    pub update_us: u64,
    /// Live entities after the tick.
    pub live: usize,
}

/// The main loop driving one registry.
pub struct GameLoop {
    /// Configuration.
    config: GameConfig,
    /// Stop flag shared with every [`StopHandle`].
    running: Arc<AtomicBool>,
    /// Accumulated tick statistics.
    stats: TickStatsAccumulator,
}

impl GameLoop {
    /// Creates a loop that will run until stopped or `max_ticks` is reached.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(true)),
            stats: TickStatsAccumulator::new(),
        }
    }

    /// Returns a handle that can stop the loop from another thread.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub fn stats(&self) -> &TickStatsAccumulator {
        &self.stats
    }

    /// Budget of one tick, if the loop is paced.
    #[must_use]
    pub fn tick_budget(&self) -> Option<Duration> {
        (self.config.tick_rate > 0)
            .then(|| Duration::from_secs(1) / self.config.tick_rate)
    }

    /// Seeds `registry`, registers the gameplay systems and ticks until the
    /// stop flag drops or `max_ticks` is reached.
    ///
    /// # Errors
    ///
    /// Propagates failures while seeding the world.
    pub fn run(&mut self, registry: &mut EntityRegistry) -> GameResult<&TickStatsAccumulator> {
        seed_world(registry, self.config.spawn_count)?;

        let mut scheduler = Scheduler::new(registry);
        install_systems(&mut scheduler, &self.config);

        let budget = self.tick_budget();
        tracing::info!(
            systems = scheduler.len(),
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            "game loop started"
        );

        while self.should_continue(scheduler.tick_count()) {
            let start = Instant::now();
            scheduler.update();
            let elapsed = start.elapsed();

            let stats = TickStats {
                tick: scheduler.tick_count(),
                update_us: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
                live: scheduler.registry().len(),
            };
            self.stats.record(stats, budget);

            match budget {
                Some(budget) if elapsed > budget => {
                    if self.config.enable_timing_logs {
                        tracing::warn!(
                            tick = stats.tick,
                            update_us = stats.update_us,
                            budget_us = budget.as_micros(),
                            "tick exceeded budget"
                        );
                    }
                }
                Some(budget) => std::thread::sleep(budget - elapsed),
                None => {}
            }
        }

        tracing::info!(
            ticks = scheduler.tick_count(),
            live = scheduler.registry().len(),
            "game loop stopped"
        );
        Ok(&self.stats)
    }

    fn should_continue(&self, ticks: u64) -> bool {
        let under_limit = self.config.max_ticks == 0 || ticks < self.config.max_ticks;
        under_limit && self.running.load(Ordering::Acquire)
    }
}

/// Accumulator for tick statistics.
#[derive(Clone, Debug)]
pub struct TickStatsAccumulator {
    /// Total ticks recorded.
    pub ticks_recorded: u64,
    /// Sum of update times.
    pub update_us_sum: u64,
    /// Fastest tick.
    pub min_update_us: u64,
    /// Slowest tick.
    pub max_update_us: u64,
    /// Ticks that overran their budget.
    pub ticks_over_budget: u64,
    /// Live entities after the last tick.
    pub last_live: usize,
}

impl TickStatsAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ticks_recorded: 0,
            update_us_sum: 0,
            min_update_us: u64::MAX,
            max_update_us: 0,
            ticks_over_budget: 0,
            last_live: 0,
        }
    }

    /// Records one tick.
    pub fn record(&mut self, stats: TickStats, budget: Option<Duration>) {
        self.ticks_recorded += 1;
        self.update_us_sum = self.update_us_sum.saturating_add(stats.update_us);
        self.min_update_us = self.min_update_us.min(stats.update_us);
        self.max_update_us = self.max_update_us.max(stats.update_us);
        self.last_live = stats.live;

        if budget.is_some_and(|budget| u128::from(stats.update_us) > budget.as_micros()) {
            self.ticks_over_budget += 1;
        }
    }

    /// Average update time in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_update_ms(&self) -> f64 {
        if self.ticks_recorded == 0 {
            return 0.0;
        }
        (self.update_us_sum as f64 / self.ticks_recorded as f64) / 1000.0
    }

    /// Prints a summary of the statistics.
    #[allow(clippy::cast_precision_loss)]
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════════════════════════╗");
        println!("║                     TICK STATISTICS SUMMARY                      ║");
        println!("╚══════════════════════════════════════════════════════════════════╝");
        println!();
        println!("  Ticks Recorded:     {}", self.ticks_recorded);
        println!("  Average Update:     {:.3} ms", self.avg_update_ms());
        if self.ticks_recorded > 0 {
            println!("  Min Update:         {:.3} ms", self.min_update_us as f64 / 1000.0);
            println!("  Max Update:         {:.3} ms", self.max_update_us as f64 / 1000.0);
        }
        println!("  Over Budget:        {} ticks", self.ticks_over_budget);
        println!("  Live Entities:      {}", self.last_live);
    }
}

impl Default for TickStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unpaced(max_ticks: u64) -> GameConfig {
        GameConfig {
            tick_rate: 0,
            max_ticks,
            spawn_count: 16,
            spawn_per_tick: 2,
            report_interval: 0,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_runs_until_max_ticks() {
        let mut registry = EntityRegistry::new();
        let mut game_loop = GameLoop::new(unpaced(10));

        let stats = game_loop.run(&mut registry).unwrap();
        assert_eq!(stats.ticks_recorded, 10);
        assert_eq!(stats.ticks_over_budget, 0);
        // 16 seeded + 2 per tick, nothing old enough to expire yet
        assert_eq!(registry.len(), 36);
    }

    #[test]
    fn test_stop_before_run_skips_ticks() {
        let mut registry = EntityRegistry::new();
        let mut game_loop = GameLoop::new(unpaced(0));
        let handle = game_loop.stop_handle();
        handle.stop();
        assert!(!handle.is_running());

        let stats = game_loop.run(&mut registry).unwrap();
        assert_eq!(stats.ticks_recorded, 0);
        assert_eq!(registry.len(), 16);
    }

    #[test]
    fn test_stop_from_another_thread() {
        let mut registry = EntityRegistry::new();
        let config = GameConfig {
            tick_rate: 1_000,
            ..unpaced(0)
        };
        let mut game_loop = GameLoop::new(config);
        let handle = game_loop.stop_handle();

        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            handle.stop();
        });

        let ticks = game_loop.run(&mut registry).unwrap().ticks_recorded;
        stopper.join().unwrap();
        assert!(ticks > 0);
    }

    #[test]
    fn test_quit_line_stops_loop() {
        let game_loop = GameLoop::new(unpaced(0));
        let handle = game_loop.stop_handle();

        let input = std::io::Cursor::new("status\n  QUIT \nignored\n");
        assert!(handle.stop_on_quit(input));
        assert!(!game_loop.stop_handle().is_running());
    }

    #[test]
    fn test_input_end_keeps_loop_running() {
        let game_loop = GameLoop::new(unpaced(0));
        let handle = game_loop.stop_handle();

        assert!(!handle.stop_on_quit(std::io::Cursor::new("quitting\n")));
        assert!(!handle.stop_on_quit(std::io::empty()));
        assert!(handle.is_running());
    }

    #[test]
    fn test_quit_from_console_thread_ends_run() {
        let mut registry = EntityRegistry::new();
        let mut game_loop = GameLoop::new(GameConfig {
            tick_rate: 1_000,
            ..unpaced(0)
        });
        let handle = game_loop.stop_handle();

        let console = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            handle.stop_on_quit(std::io::Cursor::new("quit\n"))
        });

        let ticks = game_loop.run(&mut registry).unwrap().ticks_recorded;
        assert!(console.join().unwrap());
        assert!(ticks > 0);
    }

    #[test]
    fn test_tick_budget() {
        let paced = GameLoop::new(GameConfig {
            tick_rate: 50,
            ..GameConfig::default()
        });
        assert_eq!(paced.tick_budget(), Some(Duration::from_millis(20)));
        assert_eq!(GameLoop::new(unpaced(1)).tick_budget(), None);
    }

    #[test]
    fn test_accumulator_budget_tracking() {
        let mut acc = TickStatsAccumulator::new();
        let budget = Some(Duration::from_micros(100));
        acc.record(TickStats { tick: 1, update_us: 50, live: 3 }, budget);
        acc.record(TickStats { tick: 2, update_us: 150, live: 4 }, budget);

        assert_eq!(acc.ticks_recorded, 2);
        assert_eq!(acc.ticks_over_budget, 1);
        assert_eq!(acc.min_update_us, 50);
        assert_eq!(acc.max_update_us, 150);
        assert_eq!(acc.last_live, 4);
        assert!((acc.avg_update_ms() - 0.1).abs() < 1e-9);
    }
}
