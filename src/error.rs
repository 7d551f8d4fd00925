use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for sprite map operations
#[derive(Error, Diagnostic, Debug)]
pub enum SpriteError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(sprites::io))]
    Io { path: PathBuf, message: String },

    #[error("{path} is not inside any sprite load path")]
    #[diagnostic(
        code(sprites::resolve),
        help("Add the directory containing this file to sprite_load_path")
    )]
    Resolution { path: PathBuf },

    #[error("Invalid sprite pattern '{pattern}': {message}")]
    #[diagnostic(code(sprites::pattern), help("Use a folder plus one wildcard, e.g. icons/*.png"))]
    Pattern { pattern: String, message: String },

    #[error("Failed to decode {path}: {message}")]
    #[diagnostic(code(sprites::decode))]
    Decode { path: PathBuf, message: String },

    #[error("Failed to write {path}: {message}")]
    #[diagnostic(code(sprites::write))]
    Write { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(sprites::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, SpriteError>;
