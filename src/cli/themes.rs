//! Themes command implementation.

use std::io::{self, Write};

use clap::Args;

use crate::error::{LayerError, Result};
use crate::types::ThemeTable;

use super::GlobalArgs;

/// List the theme table
#[derive(Args, Debug)]
pub struct ThemesArgs {}

pub fn run(_args: ThemesArgs, global: &GlobalArgs) -> Result<()> {
    let config = global.load_config()?;
    let table = config.theme_table()?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(format_table(&table, &config.default_theme).as_bytes())
        .map_err(|e| LayerError::Io {
            path: "<stdout>".into(),
            message: e.to_string(),
        })
}

/// One line per theme: padded name, hex colour, and a marker on the default.
pub fn format_table(table: &ThemeTable, default_theme: &str) -> String {
    let width = table.names().map(str::len).max().unwrap_or(0);
    let mut out = String::new();
    for theme in table.iter() {
        out.push_str(&format!("{:<width$}  {}", theme.name, theme.colour));
        if theme.name.eq_ignore_ascii_case(default_theme.trim()) {
            out.push_str("  (default)");
        }
        out.push('\n');
    }
    out
}
