//! # Indie Server
//!
//! Headless runtime: loads a config, seeds a registry and ticks it.
//!
//! ```bash
//! # Shipped config
//! ./indie_server
//!
//! # Custom config
//! ./indie_server path/to/indie.toml
//! ```
//!
//! Typing `quit` on stdin stops the loop after the current tick and prints
//! the summary.

use indie::ecs::EntityRegistry;
use indie::{GameConfig, GameLoop};

/// Config used when no path is given.
const DEFAULT_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/indie.toml");

fn main() {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                     INDIE SERVER v{}", env!("CARGO_PKG_VERSION"));
    println!("                         HEADLESS MODE");
    println!("═══════════════════════════════════════════════════════════════════");
    println!();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    println!("📄 Loading config from {path} ...");
    let config = match GameConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("   ✗ FATAL: {e}");
            std::process::exit(1);
        }
    };
    println!(
        "   ✓ tick_rate={} max_ticks={} spawn_count={}",
        config.tick_rate, config.max_ticks, config.spawn_count
    );

    let mut registry = EntityRegistry::with_config(config.registry_config());
    println!(
        "   ✓ Registry ready ({} entity slots)",
        registry.capacity()
    );

    let mut game_loop = GameLoop::new(config);

    // Detached: it stays blocked on stdin after the loop ends
    let handle = game_loop.stop_handle();
    std::thread::spawn(move || handle.stop_on_quit(std::io::stdin().lock()));

    println!();
    println!("▶️  Running... (type `quit` to stop early)");
    println!();
    match game_loop.run(&mut registry) {
        Ok(stats) => {
            println!();
            stats.print_summary();
        }
        Err(e) => {
            eprintln!("   ✗ FATAL: {e}");
            std::process::exit(1);
        }
    }
}
