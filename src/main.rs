//! ariaward - reversible accessibility enhancement engine
//!
//! Command-line host: loads a document, drives the engine frame by frame,
//! and manages the persisted on/off preference.

mod cli;
mod driver;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::bail;
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ariaward_config::{
    default_preferences_path, load_enabled_or, save_enabled_quietly, Config, ConfigLoader,
    ConfigValidator, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore,
};
use ariaward_runtime::{Engine, LifecycleState};

use cli::{Cli, Commands};

/// Initialize tracing with console output and an optional daily log file.
fn init_tracing(log_level: &str, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("ariaward")
                .filename_suffix("log")
                .max_log_files(30)
                .build(dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Flushes on drop, so it has to live for the whole program.
            static GUARD: OnceLock<WorkerGuard> = OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    // Stdout carries command output; logs go to stderr.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            let config = ConfigLoader::load(path)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

/// Log warnings and fail on the first error.
fn ensure_valid(config: &Config) -> anyhow::Result<()> {
    let result = ConfigValidator::validate(config)?;
    for warning in &result.warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    if let Some(err) = result.into_error() {
        return Err(err.into());
    }
    Ok(())
}

fn preference_store(config: &Config) -> Box<dyn PreferenceStore> {
    if let Some(path) = &config.preferences.path {
        return Box::new(FilePreferenceStore::new(path));
    }
    match FilePreferenceStore::at_default_location() {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!("Preferences will not persist: {}", e);
            Box::new(MemoryPreferenceStore::new())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_dir.as_deref())?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            document,
            disable_after,
            max_frames,
            force,
        } => cmd_run(&config, &document, disable_after, max_frames, force).await,
        Commands::Toggle => cmd_toggle(&config),
        Commands::Status { format } => cmd_status(&config, cli.config.as_deref(), &format),
        Commands::CheckConfig => cmd_check_config(&config),
    }
}

async fn cmd_run(
    config: &Config,
    document: &Path,
    disable_after: bool,
    max_frames: u64,
    force: bool,
) -> anyhow::Result<()> {
    ensure_valid(config)?;
    let doc = driver::load_document(document)?;

    let store = preference_store(config);
    let enabled = force || load_enabled_or(store.as_ref(), config.engine.start_enabled);
    if !enabled {
        info!("ariaward is switched off by preference, use --force to enhance anyway");
    }

    let report = driver::run_document(doc, config, enabled, disable_after, max_frames).await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_toggle(config: &Config) -> anyhow::Result<()> {
    ensure_valid(config)?;
    let store = preference_store(config);
    let next = !load_enabled_or(store.as_ref(), config.engine.start_enabled);
    if !save_enabled_quietly(store.as_ref(), next) {
        bail!("Could not save preference");
    }
    println!("ariaward {}", if next { "enabled" } else { "disabled" });
    Ok(())
}

#[derive(Serialize)]
struct StatusReport {
    state: LifecycleState,
    config: Option<PathBuf>,
    preferences: Option<PathBuf>,
    rules: Vec<&'static str>,
    gc_threshold: u32,
    frame_interval_ms: u64,
}

fn cmd_status(config: &Config, config_path: Option<&Path>, format: &str) -> anyhow::Result<()> {
    ensure_valid(config)?;
    let store = preference_store(config);
    let enabled = load_enabled_or(store.as_ref(), config.engine.start_enabled);
    let engine = Engine::new(driver::engine_options(config));

    let status = StatusReport {
        state: if enabled {
            LifecycleState::Enabled
        } else {
            LifecycleState::Disabled
        },
        config: config_path.map(Path::to_path_buf),
        preferences: config
            .preferences
            .path
            .clone()
            .or_else(default_preferences_path),
        rules: engine.rules().names(),
        gc_threshold: config.engine.gc_threshold,
        frame_interval_ms: config.engine.frame_interval_ms,
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&status)?),
        "text" => {
            println!("State:        {}", status.state);
            match &status.config {
                Some(path) => println!("Config:       {}", path.display()),
                None => println!("Config:       (defaults)"),
            }
            match &status.preferences {
                Some(path) => println!("Preferences:  {}", path.display()),
                None => println!("Preferences:  (not persisted)"),
            }
            println!("Rules:        {}", status.rules.join(", "));
            println!("GC threshold: {} batches", status.gc_threshold);
            println!("Frame:        {} ms", status.frame_interval_ms);
        }
        other => bail!("Unknown format '{}', expected text or json", other),
    }
    Ok(())
}

fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    let result = ConfigValidator::validate(config)?;
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    if !result.is_valid() {
        bail!("{} configuration error(s)", result.errors.len());
    }
    println!("Configuration OK");
    Ok(())
}
