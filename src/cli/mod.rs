//! CLI support for the URI writer
//!
//! Provides programmatic access to the `odata-uri` commands so other tools
//! can translate tree documents without shelling out.

mod convert;
mod translate;

pub use convert::json_to_tree;
pub use translate::{KeyStyle, TranslateOptions, TranslateResult, execute_translate};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Translation error
    Translate(crate::TranslateError),
    /// JSON parsing error
    Json(serde_json::Error),
    /// Tree document does not describe a valid tree
    InvalidTree(String),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Translate(e) => write!(f, "Translation error: {}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::InvalidTree(msg) => write!(f, "Invalid tree document: {}", msg),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => {
                write!(f, "No input provided. Use --input or pipe a tree document to stdin.")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Translate(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::TranslateError> for CliError {
    fn from(e: crate::TranslateError) -> Self {
        CliError::Translate(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
