//! Back command implementation.
//!
//! Normalizes the backside artwork once and renders every requested
//! (theme, variant) combination from it.

use std::path::PathBuf;

use clap::Args;

use crate::batch::{plan, render_job, run_batch, select_themes, BatchOptions, VariantSelection};
use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::render::{CardBase, LayerOutput};

use super::GlobalArgs;

/// Generate backside layers
#[derive(Args, Debug)]
pub struct BackArgs {
    /// Themes to render; none or `all` renders every theme
    pub themes: Vec<String>,

    /// Variant to render: normal, shiny, holo, rainbow or all
    #[arg(long, short, default_value = "all")]
    pub variant: VariantSelection,

    /// Backside artwork (default: paths.backside_input)
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Write a single theme and variant straight into the output directories
    #[arg(long)]
    pub flat: bool,

    /// Worker threads for batch runs (default: one per core)
    #[arg(long, short)]
    pub jobs: Option<usize>,
}

pub fn run(args: BackArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    let config = global.load_config()?;
    let table = config.theme_table()?;

    let input = args
        .input
        .unwrap_or_else(|| config.paths.backside_input.clone());
    printer.status("Loading", &display_path(&input));
    let base = CardBase::load(&input, &config)?;

    let themes = select_themes(&args.themes, &table);
    let jobs = plan(&themes, args.variant);

    // A single job is not a batch: its failure is the command's failure.
    if let [job] = jobs.as_slice() {
        let root = LayerOutput::new(&config.paths.layers_dir, &config.paths.preview_dir);
        let output = if args.flat {
            root
        } else {
            root.join(job.subdir())
        };
        let written = render_job(job, &base, &table, &config, &output)?;
        printer.success(
            "Generated",
            &format!("{} {}", job, printer.dim(&display_path(&output.layers_dir))),
        );
        printer.info("Preview", &printer.cyan(&display_path(&written.preview)));
        return Ok(());
    }

    printer.info(
        "Rendering",
        &format!(
            "{} across {}",
            plural(jobs.len(), "job", "jobs"),
            plural(themes.len(), "theme", "themes")
        ),
    );

    let options = BatchOptions {
        jobs: args.jobs,
        flat: args.flat,
    };
    run_batch(&base, &jobs, &table, &config, &options, printer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayerError;
    use crate::types::VariantKind;
    use image::{Rgb, RgbImage};
    use tempfile::{tempdir, TempDir};

    fn setup() -> (TempDir, GlobalArgs, PathBuf) {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("tcg-layers.yaml");
        std::fs::write(&config_path, "dpi: 30\n").unwrap();

        let input = dir.path().join("back.png");
        RgbImage::from_fn(160, 220, |x, _| {
            let v = (x * 255 / 159) as u8;
            Rgb([v, v, v])
        })
        .save(&input)
        .unwrap();

        let global = GlobalArgs {
            config: Some(config_path),
            output: Some(dir.path().join("out")),
        };
        (dir, global, input)
    }

    fn args(themes: &[&str], variant: VariantSelection, input: &PathBuf) -> BackArgs {
        BackArgs {
            themes: themes.iter().map(|s| s.to_string()).collect(),
            variant,
            input: Some(input.clone()),
            flat: false,
            jobs: Some(2),
        }
    }

    #[test]
    fn test_single_theme_all_variants() {
        let (dir, global, input) = setup();
        run(
            args(&["fire"], VariantSelection::All, &input),
            &global,
            &Printer::plain(),
        )
        .unwrap();

        let layers = dir.path().join("out/layers");
        for subdir in ["fire", "fire_shiny", "fire_holo", "rainbow"] {
            assert!(layers.join(subdir).join("foil_layer.png").exists(), "{subdir}");
        }
        assert!(!layers.join("water").exists());
    }

    #[test]
    fn test_flat_single_job() {
        let (dir, global, input) = setup();
        let mut flat = args(&["water"], VariantSelection::One(VariantKind::Shiny), &input);
        flat.flat = true;
        run(flat, &global, &Printer::plain()).unwrap();

        assert!(dir.path().join("out/layers/main_color.png").exists());
        assert!(dir.path().join("out/preview/layer_preview.png").exists());
    }

    #[test]
    fn test_single_unknown_theme_is_fatal() {
        let (_dir, global, input) = setup();
        let err = run(
            args(&["plasma"], VariantSelection::One(VariantKind::Normal), &input),
            &global,
            &Printer::plain(),
        )
        .unwrap_err();
        assert!(matches!(err, LayerError::UnknownTheme { .. }));
    }

    #[test]
    fn test_missing_input_is_invalid() {
        let (dir, global, _) = setup();
        let missing = dir.path().join("nope.png");
        let err = run(
            args(&["fire"], VariantSelection::All, &missing),
            &global,
            &Printer::plain(),
        )
        .unwrap_err();
        assert!(matches!(err, LayerError::InvalidInput { .. }));
    }
}
