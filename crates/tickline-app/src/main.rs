//! tickline interactive console entry point.
//!
//! Reads commands from stdin while a background tick keeps running. Type
//! `help` for commands, `quit` to exit. The config file path comes from the
//! first argument or `TICKLINE_CONFIG`; `TICKLINE_SHORTNAME` overrides the
//! prompt label.

mod commands;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};

use commands::AppHandler;
use tickline_console::{ChannelStream, Console, ConsoleConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    log::info!(
        "Starting tickline console \"{}\" (tick {} ms)",
        config.shortname,
        config.tick_interval_ms
    );

    let stream = ChannelStream::stdin()?;
    let mut console = Console::new(&config, stream, AppHandler::new(), Box::new(io::stdout()));
    let reason = console.run()?;

    log::info!(
        "tickline shut down cleanly ({reason:?}) after {} ticks",
        console.handler().total_ticks()
    );
    Ok(())
}

/// Resolve config from CLI arg, TICKLINE_CONFIG env var, or defaults.
fn load_config() -> Result<ConsoleConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TICKLINE_CONFIG").ok())
        .map(PathBuf::from);

    let mut config = match path {
        Some(path) => ConsoleConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ConsoleConfig::default(),
    };

    if let Ok(shortname) = std::env::var("TICKLINE_SHORTNAME") {
        config.shortname = shortname;
    }
    Ok(config)
}
