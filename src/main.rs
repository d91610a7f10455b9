#![allow(clippy::ignored_unit_patterns)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

// Tracing since it's used project wide for logging
#[macro_use]
extern crate tracing;

use std::rc::Rc;
use std::time::Duration;

use calloop::EventLoop;
use clap::Parser;
use state::State;

mod cli;
mod config;
mod input;
mod signal;
mod state;
mod tree;
mod utils;

use cli::{Cli, Command};
use tree::Tree;

/// How often the event loop wakes up on its own to flush a transaction round
/// even with no external wake-up pending, so urgency timeouts and
/// commit-lock deadlines keep making progress.
const TICK_INTERVAL: Duration = Duration::from_millis(16);

fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error,tessera=info"));
    tracing_subscriber::fmt().compact().with_env_filter(filter).init();

    let cli = Cli::parse();

    if matches!(cli.command, Some(Command::CheckConfiguration)) {
        return check_configuration(cli.config_path);
    }

    let (config, config_path) = tessera_config::load(cli.config_path)
        .map_err(|err| anyhow::anyhow!("failed to load configuration: {err}"))?;
    info!(path = ?config_path, "loaded configuration");

    let mut event_loop: EventLoop<'_, State> =
        EventLoop::try_new().map_err(|err| anyhow::anyhow!("failed to create event loop: {err}"))?;

    let tree = Tree::new(Rc::new(config));
    let mut state = State::new(
        tree,
        event_loop.handle(),
        event_loop.get_signal(),
        config_path.clone(),
    );

    let _watcher = config::init_watcher(config_path, &event_loop.handle())
        .map_err(|err| anyhow::anyhow!("failed to start config file watcher: {err}"))?;

    event_loop
        .handle()
        .insert_source(calloop::timer::Timer::from_duration(TICK_INTERVAL), |_, (), state| {
            state.dispatch();
            calloop::timer::TimeoutAction::ToDuration(TICK_INTERVAL)
        })
        .map_err(|err| anyhow::anyhow!("failed to register tick timer: {err}"))?;

    info!("tessera core running");
    event_loop.run(None, &mut state, |state| state.dispatch())?;

    Ok(())
}

fn check_configuration(path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    match tessera_config::load(path) {
        Ok((_, path)) => {
            println!("configuration at {} is valid", path.display());
            Ok(())
        }
        Err(err) => {
            eprintln!("configuration error: {err}");
            std::process::exit(1);
        }
    }
}
