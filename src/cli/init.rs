//! Init command implementation.
//!
//! Writes a `tcg-layers.yaml` holding every default, including the builtin
//! theme table, so it can be edited in place.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::{PrintConfig, CONFIG_FILENAME};
use crate::error::{LayerError, Result};
use crate::output::{display_path, plural, Printer};
use crate::types::ThemeTable;

/// Write a default tcg-layers.yaml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write into (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing tcg-layers.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(LayerError::Config {
            message: format!("{} already exists", display_path(&config_path)),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let builtin = ThemeTable::builtin();
    let config = PrintConfig {
        themes: Some(builtin.iter().cloned().collect()),
        ..PrintConfig::default()
    };
    let yaml = config.to_yaml()?;

    fs::create_dir_all(&args.path).map_err(|e| LayerError::Io {
        path: args.path.clone(),
        message: format!("Failed to create directory: {}", e),
    })?;
    fs::write(&config_path, yaml).map_err(|e| LayerError::Io {
        path: config_path.clone(),
        message: format!("Failed to write configuration: {}", e),
    })?;

    printer.success(
        "Created",
        &format!(
            "{} ({})",
            display_path(&config_path),
            plural(builtin.len(), "theme", "themes")
        ),
    );
    Ok(())
}
