use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use gutter_core::config::{CONFIG_FILE_NAME, GutterConfig};
use gutter_core::format::Theme;
use gutter_core::merge::MergePolicy;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write gutter.toml into (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Merge policy: type-grouped or summed
    #[arg(long, default_value = "type-grouped")]
    pub policy: MergePolicy,

    /// Badge theme: light or dark
    #[arg(long, default_value = "light")]
    pub theme: Theme,

    /// Overwrite an existing gutter.toml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    let config_path = args.path.join(CONFIG_FILE_NAME);
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let mut config = GutterConfig::default();
    config.merge.policy = args.policy;
    config.badge.theme = args.theme;

    let content = config.to_toml_string().context("Cannot serialize config")?;
    std::fs::create_dir_all(&args.path)
        .with_context(|| format!("Cannot create directory: {}", args.path.display()))?;
    std::fs::write(&config_path, content)
        .with_context(|| format!("Cannot write config: {}", config_path.display()))?;

    println!("Wrote {}", config_path.display());
    Ok(())
}
