//! `sticker` – remote-control server binary
//!
//! ```text
//! sticker                      serve the cockpit (default)
//! sticker init                 write a default config file
//! sticker hash-password <pw>   print an Argon2 hash for `password_hash`
//! ```
//!
//! On startup the server:
//!
//! 1. Loads `~/.sticker/config.toml` (or `$STICKER_CONFIG`) and applies
//!    `STICKER_*` overrides.  A missing file means defaults; an unreadable one
//!    stops the server.
//! 2. Hashes the operator password and builds the authenticator.
//! 3. Spawns the dispatcher task that owns the robot.
//! 4. Serves the cockpit until **Ctrl-C**, then stops both axes before
//!    exiting.

mod config;
mod telemetry;

use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

use sticker_cockpit::CockpitServer;
use sticker_control::{Dispatcher, spawn_dispatcher};
use sticker_hal::SimRobot;
use sticker_kernel::{Authenticator, StaticCredentialStore};
use sticker_types::StickerError;

fn main() -> ExitCode {
    let _guard = telemetry::init_tracing("sticker");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("serve") => {
            print_banner();
            report(serve())
        }
        Some("init") => report(init()),
        Some("hash-password") => match args.get(1) {
            Some(password) => report(hash_password(password)),
            None => {
                println!("{}", "usage: sticker hash-password <password>".yellow());
                ExitCode::FAILURE
            }
        },
        Some("help" | "--help" | "-h") => {
            print_usage();
            ExitCode::SUCCESS
        }
        Some(other) => {
            println!("{}: {}", "Unknown command".red(), other);
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn report(result: Result<(), StickerError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "sticker stopped");
            println!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// serve
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for `serve`.  Any error reading an existing file is fatal.
fn server_config(path: &Path) -> Result<config::Config, StickerError> {
    let cfg = config::load_at(path)?;
    info!(path = %path.display(), ?cfg, "configuration loaded");
    Ok(cfg)
}

fn serve() -> Result<(), StickerError> {
    let cfg = server_config(&config::config_path())?;

    let credential = cfg
        .credential()
        .map_err(|e| StickerError::Config(format!("operator credential: {e}")))?;
    let auth = Arc::new(Authenticator::new(
        StaticCredentialStore::new(credential),
        cfg.hash_cost,
    ));

    // ── Ctrl-C handler ────────────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = Arc::clone(&shutdown);
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – stopping the robot …".yellow().bold());
        shutdown_flag.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; the robot will not be halted on Ctrl-C");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| StickerError::Server(format!("failed to start tokio runtime: {e}")))?;

    runtime.block_on(async move {
        let robot = SimRobot::new(cfg.robot_id.clone());
        let (dispatcher, task) = spawn_dispatcher(Dispatcher::new(Box::new(robot)));

        println!(
            "  Cockpit listening on {}",
            format!("http://localhost:{}", cfg.port).bold()
        );

        let served = CockpitServer::new(auth, dispatcher.clone())
            .with_port(cfg.port)
            .with_static_dir(cfg.static_dir.clone())
            .with_shutdown(shutdown)
            .run()
            .await;

        match dispatcher.halt().await {
            Ok(_) => println!("{}", "  ✓ Robot halted.".green()),
            Err(e) => warn!(error = %e, "could not halt robot on shutdown"),
        }
        drop(dispatcher);
        let _ = task.await;

        served
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// init / hash-password
// ─────────────────────────────────────────────────────────────────────────────

fn init() -> Result<(), StickerError> {
    let path = config::config_path();
    if path.exists() {
        println!(
            "  Config already exists at {}; leaving it untouched.",
            path.display().to_string().bold()
        );
        return Ok(());
    }
    config::save_to(&config::Config::default(), &path)?;
    println!(
        "  {} Config written to {}",
        "✓".green().bold(),
        path.display().to_string().bold()
    );
    println!("  Change the default password before exposing the server.");
    Ok(())
}

fn hash_password(password: &str) -> Result<(), StickerError> {
    let cfg = config_or_default(config::load());
    let phc = cfg
        .hash_cost
        .hash(password)
        .map_err(|e| StickerError::Config(e.to_string()))?;
    println!("{phc}");
    Ok(())
}

/// `hash-password` only needs the cost, so an unreadable config is reported
/// and replaced by defaults rather than aborting.
fn config_or_default(loaded: Result<config::Config, StickerError>) -> config::Config {
    loaded.unwrap_or_else(|e| {
        warn!(error = %e, "config unreadable, hashing with the default cost");
        println!("{}: {}", "Config error".red(), e);
        println!("  Using the default hash cost.");
        config::Config::default()
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!(
        "  {} {}",
        "Sticker".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Remote robot control");
    println!();
}

fn print_usage() {
    println!("Usage:");
    println!("  sticker                      serve the cockpit");
    println!(
        "  sticker init                 write a default config to {}",
        config::config_path().display()
    );
    println!("  sticker hash-password <pw>   print an Argon2 hash for `password_hash`");
}
