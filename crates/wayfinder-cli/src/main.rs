//! `wayfinder` – indoor navigation from the terminal.
//!
//! 1. Loads `~/.wayfinder/config.toml`, writing a default one on first run.
//! 2. Loads the floor map (built-in Block C unless configured otherwise).
//! 3. Drops the user into a REPL that drives a navigation session with
//!    console speech and a textual overlay.
//! 4. Ctrl-C publishes a `Shutdown` alert on the bus and exits.

mod config;
mod console;
mod repl;

use colored::Colorize;
use std::sync::Arc;
use tracing::{debug, error, warn};

use wayfinder_middleware::{EventBus, Topic};
use wayfinder_runtime::{
    NavigationSession, ScanConfig, ScanCoordinator, ScanSource, SessionHandle, SimScanner,
    init_tracing,
};
use wayfinder_types::{NavEvent, NavPayload};

use crate::console::{ConsoleRender, ConsoleSpeech};

fn main() {
    let telemetry = init_tracing("wayfinder");

    print_banner();
    if telemetry.is_exporting() {
        println!("  {}", "Exporting traces over OTLP.".dimmed());
    }

    let bus = EventBus::new(64);

    let bus_ctrlc = bus.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "Ctrl-C received, shutting down …".yellow().bold());
        let event = NavEvent::new(
            "wayfinder-cli",
            NavPayload::Shutdown {
                reason: "operator Ctrl-C".to_string(),
            },
        );
        bus_ctrlc.notify(Topic::Alerts, event);
        std::process::exit(130);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler");
    }

    let (cfg, origin) = config::startup();
    let path = config::config_path().display().to_string();
    match origin {
        config::Startup::Loaded => println!("  Config loaded from {}", path.bold()),
        config::Startup::Created => {
            println!("  {} Default config written to {}", "✓".green().bold(), path.bold())
        }
        config::Startup::Unsaved(e) => println!("{}: {}", "Error saving config".red(), e),
        config::Startup::Fallback(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
        }
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "cannot start async runtime");
            return;
        }
    };

    for topic in Topic::ALL {
        let mut rx = bus.subscribe_to(topic);
        runtime.spawn(async move {
            while let Some(event) = rx.next().await {
                debug!(topic = ?topic, source = %event.source, payload = ?event.payload, "bus event");
            }
        });
    }

    let source = cfg.map_source();
    print!("  Loading map {} … ", source.describe().dimmed());
    let graph = match runtime.block_on(wayfinder_map::load(&source)) {
        Ok(graph) => {
            println!("{} ({} nodes)", "OK".green(), graph.len());
            Arc::new(graph)
        }
        Err(e) => {
            println!("{}", "FAILED".red());
            println!("  {e}");
            return;
        }
    };

    let zones = match cfg.zone_source() {
        Some(source) => match runtime.block_on(wayfinder_map::load_zones(&source)) {
            Ok(layout) => {
                println!("  Zone map {} ({} rooms)", source.describe().dimmed(), layout.rooms.len());
                Some(layout)
            }
            Err(e) => {
                warn!(error = %e, "zone map unavailable");
                println!("  {}: {}", "Zone map skipped".yellow(), e);
                None
            }
        },
        None => None,
    };

    let session = NavigationSession::new(
        graph,
        cfg.engine_config(),
        Arc::new(ConsoleSpeech),
        Arc::new(ConsoleRender),
        bus,
    );
    let handle = SessionHandle::new(session);

    // No camera in a terminal: `/scan <code>` queues the code on a simulated
    // scanner and runs a real scan cycle against it.
    let scanner = Arc::new(SimScanner::silent());
    let coordinator = ScanCoordinator::new(
        Arc::clone(&scanner) as Arc<dyn ScanSource>,
        ScanConfig::default(),
    );

    println!();
    println!("  Type {} for a list of commands.\n", "/help".bold().cyan());

    repl::run(repl::Shell {
        runtime,
        session: handle,
        scanner,
        coordinator,
        zones,
    });
}

fn print_banner() {
    println!();
    println!(
        "  {} {}",
        "Wayfinder".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Indoor navigation engine");
    println!();
}
