pub mod back;
pub mod completions;
pub mod detect;
pub mod front;
pub mod init;
pub mod themes;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::config::PrintConfig;
use crate::error::Result;

/// tcg-layers - Print layer generator for trading card artwork
#[derive(Parser, Debug)]
#[command(name = "tcg-layers")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate backside layers for one or more themes
    Back(back::BackArgs),

    /// Detect a card front's theme and variant, then generate its layers
    Front(front::FrontArgs),

    /// Print the detection report for a card front without writing files
    Detect(detect::DetectArgs),

    /// List the theme table
    Themes(themes::ThemesArgs),

    /// Write a default tcg-layers.yaml
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file (default: ./tcg-layers.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output root; layers go to DIR/layers and previews to DIR/preview
    #[arg(long, short, global = true, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

impl GlobalArgs {
    /// Load the configuration and apply the output root override.
    pub fn load_config(&self) -> Result<PrintConfig> {
        let config = match &self.config {
            Some(path) => PrintConfig::load(path)?,
            None => PrintConfig::discover(Path::new("."))?,
        };
        debug!(dpi = config.dpi, "Configuration loaded");

        Ok(match &self.output {
            Some(root) => config.with_output_root(root),
            None => config,
        })
    }
}
