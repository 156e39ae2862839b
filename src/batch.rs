//! Batch generation of backside layer sets.
//!
//! A batch is a work list of (theme, variant) jobs. Every job reads the same
//! immutable [`CardBase`] and writes into its own subdirectory, so the list
//! is consumed by a rayon pool without any locking. A failing job is logged
//! and skipped; the batch reports the failure count once everything else has
//! finished.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, instrument, warn};

use crate::config::PrintConfig;
use crate::error::{LayerError, Result};
use crate::output::{display_path, plural, Printer};
use crate::render::{CardBase, LayerOutput, LayerSet, Treatment, WrittenLayers};
use crate::types::{Colour, ThemeTable, VariantKind};

/// Keyword selecting every theme or every variant.
pub const ALL: &str = "all";

/// Which variants a batch renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariantSelection {
    /// Normal, shiny and holo for every theme, plus one rainbow job.
    #[default]
    All,
    One(VariantKind),
}

impl FromStr for VariantSelection {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            Ok(VariantSelection::All)
        } else {
            s.parse().map(VariantSelection::One)
        }
    }
}

/// One (theme, variant) render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// `None` for theme-agnostic jobs.
    pub theme: Option<String>,
    pub variant: VariantKind,
}

impl Job {
    pub fn themed(theme: impl Into<String>, variant: VariantKind) -> Self {
        Self {
            theme: Some(theme.into()),
            variant,
        }
    }

    pub fn rainbow() -> Self {
        Self {
            theme: None,
            variant: VariantKind::Rainbow,
        }
    }

    /// Output subdirectory: `fire`, `fire_shiny`, `rainbow`, ...
    pub fn subdir(&self) -> String {
        self.variant
            .dir_name(self.theme.as_deref().unwrap_or_default())
    }

    /// Resolve the colour treatment. Fails if the theme is not in `themes`.
    pub fn treatment(&self, themes: &ThemeTable, config: &PrintConfig) -> Result<Treatment> {
        let colour = match &self.theme {
            Some(name) if !self.variant.is_theme_agnostic() => themes.resolve(name)?,
            _ => Colour::WHITE,
        };
        Ok(Treatment::for_variant(self.variant, colour, config))
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.subdir())
    }
}

/// Expand requested theme names: none, or any `all`, means the whole table.
///
/// Names are trimmed, lowercased and deduplicated in request order. Unknown
/// names are kept so that they fail as individual jobs.
pub fn select_themes(requested: &[String], themes: &ThemeTable) -> Vec<String> {
    if requested.is_empty() || requested.iter().any(|t| t.trim().eq_ignore_ascii_case(ALL)) {
        return themes.names().map(str::to_string).collect();
    }

    let mut selected: Vec<String> = Vec::with_capacity(requested.len());
    for name in requested {
        let name = name.trim().to_lowercase();
        if !selected.contains(&name) {
            selected.push(name);
        }
    }
    selected
}

/// Build the work list. A rainbow job is theme-agnostic and appears at most
/// once, at the end.
pub fn plan(themes: &[String], selection: VariantSelection) -> Vec<Job> {
    let per_theme = match selection {
        VariantSelection::All => vec![VariantKind::Normal, VariantKind::Shiny, VariantKind::Holo],
        VariantSelection::One(VariantKind::Rainbow) => Vec::new(),
        VariantSelection::One(variant) => vec![variant],
    };

    let mut jobs: Vec<Job> = themes
        .iter()
        .flat_map(|theme| per_theme.iter().map(move |&v| Job::themed(theme.clone(), v)))
        .collect();

    if matches!(
        selection,
        VariantSelection::All | VariantSelection::One(VariantKind::Rainbow)
    ) {
        jobs.push(Job::rainbow());
    }
    jobs
}

/// Render one job and write it to `output`.
#[instrument(skip_all, fields(job = %job))]
pub fn render_job(
    job: &Job,
    base: &CardBase,
    themes: &ThemeTable,
    config: &PrintConfig,
    output: &LayerOutput,
) -> Result<WrittenLayers> {
    let treatment = job.treatment(themes, config)?;
    debug!(?treatment, "Rendering layers");
    LayerSet::render(base, &treatment, &config.mask_config()).write(output)
}

/// Batch execution settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Worker threads; `None` lets rayon decide.
    pub jobs: Option<usize>,
    /// Write straight into the output directories instead of per-job
    /// subdirectories. Only valid for a single job.
    pub flat: bool,
}

/// Run every job against `base`, writing under the configured output roots.
///
/// Returns the written files in work-list order, or [`LayerError::Batch`]
/// once all jobs have run if any of them failed.
#[instrument(skip_all, fields(jobs = jobs.len()))]
pub fn run_batch(
    base: &CardBase,
    jobs: &[Job],
    themes: &ThemeTable,
    config: &PrintConfig,
    options: &BatchOptions,
    printer: &Printer,
) -> Result<Vec<(Job, WrittenLayers)>> {
    if options.flat && jobs.len() != 1 {
        return Err(LayerError::Config {
            message: format!("Flat output needs exactly one job, got {}", jobs.len()),
            help: Some("Name a single theme and a single variant".to_string()),
        });
    }

    let root = LayerOutput::new(&config.paths.layers_dir, &config.paths.preview_dir);
    let pool = ThreadPoolBuilder::new()
        .num_threads(options.jobs.unwrap_or(0))
        .build()
        .map_err(|e| LayerError::Config {
            message: format!("Failed to start worker pool: {}", e),
            help: Some("Try a smaller --jobs value".to_string()),
        })?;

    let results: Vec<Result<WrittenLayers>> = pool.install(|| {
        jobs.par_iter()
            .map(|job| {
                let output = if options.flat {
                    root.clone()
                } else {
                    root.join(job.subdir())
                };
                render_job(job, base, themes, config, &output)
            })
            .collect()
    });

    let total = jobs.len();
    let mut written = Vec::with_capacity(total);
    let mut failed = 0;

    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(files) => {
                let dir = files.main_color.parent().unwrap_or(root.layers_dir.as_path());
                printer.status(
                    "Generated",
                    &format!("{} {}", job, printer.dim(&display_path(dir))),
                );
                written.push((job.clone(), files));
            }
            Err(e) => {
                warn!(job = %job, error = %e, "Layer job failed");
                printer.error("Failed", &format!("{}: {}", job, e));
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(LayerError::Batch { failed, total });
    }

    info!(total, "Batch complete");
    printer.success("Finished", &plural(total, "layer set", "layer sets"));
    Ok(written)
}
