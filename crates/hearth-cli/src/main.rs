//! `hearth-cli` – hearth Command Line Interface
//!
//! A thin presentation layer over the household data:
//!
//! 1. Checks for `~/.hearth/config.toml`; runs a **First-Run Wizard** when the
//!    file is absent.
//! 2. Opens the SQLite database and loads the memory log (seeding sample
//!    memories on first run) alongside the household graph.
//! 3. Drops the user into an **interactive REPL** with slash-commands.
//! 4. Intercepts **Ctrl-C** to leave the REPL cleanly.

mod config;
mod repl;

use colored::Colorize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

use hearth_memory::{MemoryEventStore, SeedReason, SqliteSlotStore, StoreOrigin};

fn main() {
    // ── Structured logging ────────────────────────────────────────────────
    // RUST_LOG selects the filter (default "info"); HEARTH_LOG_FORMAT=json
    // switches to newline-delimited JSON.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("HEARTH_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Ctrl-C handler ────────────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "  Ctrl-C received – leaving hearth.".yellow().bold());
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler");
    }

    // ── First-Run Wizard ──────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => run_first_run_wizard(),
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            let mut cfg = config::Config::default();
            config::apply_env_overrides(&mut cfg);
            cfg
        }
    };

    // ── Memory log ────────────────────────────────────────────────────────
    if let Err(e) = config::ensure_database_dir(&cfg) {
        println!("{}: {}", "Storage error".red(), e);
        std::process::exit(1);
    }
    let slots = match SqliteSlotStore::open(&cfg.database_path) {
        Ok(slots) => slots,
        Err(e) => {
            println!(
                "{} {}: {}",
                "Failed to open".red(),
                cfg.database_path.bold(),
                e
            );
            std::process::exit(1);
        }
    };
    let store = MemoryEventStore::load_with_key(slots, cfg.slot_key.clone());
    match store.origin() {
        StoreOrigin::Restored => {
            println!("  Restored {} memories.", store.len().to_string().bold())
        }
        StoreOrigin::Seeded(SeedReason::SlotAbsent) => {
            println!("  {}", "No memories yet – added a few samples.".dimmed())
        }
        StoreOrigin::Seeded(reason) => println!(
            "  {} saved memories could not be loaded ({:?}); showing samples.",
            "Warning:".yellow(),
            reason
        ),
    }

    let mut app = repl::App {
        graph: hearth_family::sample_family(),
        store,
    };
    println!("  Household: {} members.", app.graph.len().to_string().bold());

    println!();
    println!("  Type {} for a list of commands.\n", "/help".bold().cyan());

    // ── Interactive REPL ──────────────────────────────────────────────────
    repl::run(&mut app, shutdown);
}

// ─────────────────────────────────────────────────────────────────────────────
// First-Run Wizard
// ─────────────────────────────────────────────────────────────────────────────

fn run_first_run_wizard() -> config::Config {
    println!();
    println!("{}", "  ╔══════════════════════════════════════╗".bold().cyan());
    println!("{}", "  ║       hearth First-Run Wizard        ║".bold().cyan());
    println!("{}", "  ╚══════════════════════════════════════╝".bold().cyan());
    println!();
    println!("  No configuration found.  Let's set up hearth.\n");

    let mut cfg = config::Config::default();
    cfg.database_path = repl::prompt_str(
        &format!("  Database file [{}]: ", cfg.database_path),
        &cfg.database_path,
    );

    match config::save(&cfg) {
        Ok(()) => println!(
            "\n  {} Config saved to {}\n",
            "✓".green().bold(),
            config::config_path().display().to_string().bold()
        ),
        Err(e) => println!("{}: {}", "Error saving config".red(), e),
    }
    config::apply_env_overrides(&mut cfg);
    cfg
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", r#"   __                    __  __  "#.bold().cyan());
    println!("{}", r#"  / /  ___ ___ _____ __/ /_/ /  "#.bold().cyan());
    println!("{}", r#" / _ \/ -_) _ `/ __/ _  __/ _ \ "#.bold().cyan());
    println!("{}", r#"/_//_/\__/\_,_/_/  \__/\__/_//_/ "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "hearth".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Family memories, kept close");
    println!();
}
