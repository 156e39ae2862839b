//! Detect command implementation.
//!
//! Classifies a card front and prints the report to stdout. Nothing is
//! written to disk.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use crate::detect::{detect, Detection, Overrides};
use crate::error::{LayerError, Result};
use crate::output::{display_path, Printer};
use crate::render::CardBase;

use super::GlobalArgs;

/// Print the detection report for a card front
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Card front image (default: paths.front_input)
    pub input: Option<PathBuf>,

    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: DetectArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    let config = global.load_config()?;
    let table = config.theme_table()?;

    let input = args
        .input
        .unwrap_or_else(|| config.paths.front_input.clone());
    printer.status("Analyzing", &display_path(&input));
    let front = CardBase::load(&input, &config)?;
    let detection = detect(front.image(), &table, &config, &Overrides::default())?;

    let report = if args.json {
        let mut json = serde_json::to_string_pretty(&detection).map_err(|e| LayerError::Io {
            path: "<stdout>".into(),
            message: format!("Failed to encode report: {}", e),
        })?;
        json.push('\n');
        json
    } else {
        format_report(&detection)
    };

    io::stdout()
        .lock()
        .write_all(report.as_bytes())
        .map_err(|e| LayerError::Io {
            path: "<stdout>".into(),
            message: e.to_string(),
        })
}

/// Human-readable detection report.
pub fn format_report(detection: &Detection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "variant: {}", detection.variant);
    let _ = writeln!(out, "theme:   {}", detection.theme);
    let _ = writeln!(out, "output:  {}", detection.dir_name());

    if let Some(m) = &detection.theme_match {
        if let Some(average) = m.average {
            let _ = writeln!(out, "interior average: {}", average);
        }
        match (&m.nearest, m.distance) {
            (Some(name), Some(d)) => {
                let _ = writeln!(out, "nearest theme:    {} ({:.1})", name, d);
            }
            _ => {
                let _ = writeln!(out, "nearest theme:    -");
            }
        }
        if m.fallback {
            let _ = writeln!(out, "no close theme, using the default");
        }
    }

    if let Some(b) = &detection.border {
        let _ = writeln!(out, "border band: {} px ({} samples)", b.band, b.pixels);
        let _ = writeln!(out, "  edge variance:         {:.1}", b.edge_variance);
        let _ = writeln!(out, "  channel mean variance: {:.1}", b.channel_mean_variance);
        let _ = writeln!(out, "  mean saturation:       {:.3}", b.mean_saturation);
        let _ = writeln!(out, "  brightness variance:   {:.1}", b.brightness_variance);
        let _ = writeln!(out, "  contrast:              {:.1}", b.contrast);
        let _ = writeln!(out, "  unique colours:        {}", b.unique_colors);
    }
    out
}
