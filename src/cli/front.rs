//! Front command implementation.
//!
//! Detects the theme and variant of a finished card front, writes its layers
//! under `fronts/`, then renders the matching backside.

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::warn;

use crate::batch::{render_job, Job};
use crate::config::PrintConfig;
use crate::detect::{detect, Detection, Overrides};
use crate::error::Result;
use crate::output::{display_path, Printer};
use crate::render::{CardBase, LayerOutput, WrittenLayers};
use crate::types::{ThemeTable, VariantKind};

use super::GlobalArgs;

/// Subdirectory of the layer and preview roots holding front layers.
pub const FRONTS_DIR: &str = "fronts";

/// Detect and generate layers for a card front
#[derive(Args, Debug)]
pub struct FrontArgs {
    /// Card front image (default: paths.front_input)
    pub input: Option<PathBuf>,

    /// Use this theme instead of detecting it
    #[arg(long, short)]
    pub theme: Option<String>,

    /// Use this variant instead of detecting it
    #[arg(long, short)]
    pub variant: Option<VariantKind>,

    /// Skip the matching backside
    #[arg(long)]
    pub no_backside: bool,

    /// Backside artwork (default: paths.backside_input)
    #[arg(long, conflicts_with = "no_backside")]
    pub backside: Option<PathBuf>,
}

/// Files produced by a front run.
#[derive(Debug)]
pub struct FrontOutcome {
    pub detection: Detection,
    pub front: WrittenLayers,
    pub backside: Option<WrittenLayers>,
}

pub fn run(args: FrontArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    generate(args, global, printer).map(|_| ())
}

/// Run the front pipeline and report what was written.
pub fn generate(args: FrontArgs, global: &GlobalArgs, printer: &Printer) -> Result<FrontOutcome> {
    let config = global.load_config()?;
    let table = config.theme_table()?;

    let input = args
        .input
        .unwrap_or_else(|| config.paths.front_input.clone());
    printer.status("Loading", &display_path(&input));
    let front = CardBase::load(&input, &config)?;

    let overrides = Overrides {
        theme: args.theme,
        variant: args.variant,
    };
    let detection = detect(front.image(), &table, &config, &overrides)?;
    report(&detection, printer);

    let job = Job::themed(detection.theme.clone(), detection.variant);
    let root = LayerOutput::new(&config.paths.layers_dir, &config.paths.preview_dir);
    let front_output = root.join(FRONTS_DIR).join(&detection.dir_name());
    let written = render_job(&job, &front, &table, &config, &front_output)?;
    printer.success(
        "Generated",
        &format!(
            "front {}",
            printer.dim(&display_path(&front_output.layers_dir))
        ),
    );

    let backside = if args.no_backside {
        None
    } else {
        let path = args
            .backside
            .unwrap_or_else(|| config.paths.backside_input.clone());
        backside(&path, &job, &table, &config, &root, printer)
    };

    Ok(FrontOutcome {
        detection,
        front: written,
        backside,
    })
}

fn report(detection: &Detection, printer: &Printer) {
    let mut summary = format!(
        "{} {}",
        printer.bold(&detection.theme),
        detection.variant
    );
    if detection.theme_overridden || detection.variant_overridden {
        summary.push_str(&printer.dim(" (override)"));
    }
    if detection.theme_match.as_ref().is_some_and(|m| m.fallback) {
        summary.push_str(&printer.dim(" (default theme)"));
    }
    printer.info("Detected", &summary);
}

/// Render the backside matching the front. Failures here never undo the
/// front layers; they are reported and the run continues.
fn backside(
    path: &Path,
    job: &Job,
    table: &ThemeTable,
    config: &PrintConfig,
    root: &LayerOutput,
    printer: &Printer,
) -> Option<WrittenLayers> {
    if !path.exists() {
        warn!(path = %path.display(), "Backside artwork not found");
        printer.warning(
            "Skipping",
            &format!("backside, {} not found", display_path(path)),
        );
        return None;
    }

    let result = CardBase::load(path, config)
        .and_then(|base| render_job(job, &base, table, config, &root.join(job.subdir())));

    match result {
        Ok(written) => {
            printer.success("Generated", &format!("backside {}", job));
            Some(written)
        }
        Err(e) => {
            warn!(error = %e, "Backside generation failed");
            printer.warning("Skipping", &format!("backside: {}", e));
            None
        }
    }
}
