use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for layer generation
#[derive(Error, Diagnostic, Debug)]
pub enum LayerError {
    #[error("Invalid input image {path}: {message}")]
    #[diagnostic(
        code(tcg_layers::input),
        help("Provide a decodable raster image (PNG, JPEG, ...) with a non-zero size")
    )]
    InvalidInput { path: PathBuf, message: String },

    #[error("Invalid image: {message}")]
    #[diagnostic(
        code(tcg_layers::input),
        help("Provide an image and a print size with a non-zero area")
    )]
    InvalidImage { message: String },

    #[error("Unknown theme '{name}'")]
    #[diagnostic(code(tcg_layers::theme), help("Available themes: {available}"))]
    UnknownTheme { name: String, available: String },

    #[error("Unknown variant '{name}'")]
    #[diagnostic(
        code(tcg_layers::variant),
        help("Available variants: normal, shiny, holo, rainbow")
    )]
    UnknownVariant { name: String },

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(tcg_layers::io))]
    Io { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(tcg_layers::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("{failed} of {total} layer job(s) failed")]
    #[diagnostic(
        code(tcg_layers::batch),
        help("The remaining jobs completed; see the log above for each failure")
    )]
    Batch { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, LayerError>;
