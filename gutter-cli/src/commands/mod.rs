pub mod bands;
pub mod format;
pub mod init;
pub mod render;

use std::path::Path;

use anyhow::Context;
use clap::Subcommand;

use gutter_core::config::{CONFIG_FILE_NAME, GutterConfig};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default gutter.toml
    Init(init::InitArgs),
    /// Show the label and colors a single score renders with
    Format(format::FormatArgs),
    /// Print the severity band table
    Bands(bands::BandsArgs),
    /// Render gutter icons from a recorded findings file
    Render(render::RenderArgs),
}

pub fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Init(args) => init::run(&args),
        Command::Format(args) => format::run(&args),
        Command::Bands(args) => bands::run(&args),
        Command::Render(args) => render::run(&args),
    }
}

/// Load an explicit config file, else `./gutter.toml` when present, else defaults.
pub(crate) fn load_config(explicit: Option<&Path>) -> anyhow::Result<GutterConfig> {
    if let Some(path) = explicit {
        return GutterConfig::load(path)
            .with_context(|| format!("Cannot load config: {}", path.display()));
    }

    let local = Path::new(CONFIG_FILE_NAME);
    if local.exists() {
        tracing::debug!(path = %local.display(), "Using local config");
        return GutterConfig::load(local)
            .with_context(|| format!("Cannot load config: {}", local.display()));
    }

    Ok(GutterConfig::default())
}
