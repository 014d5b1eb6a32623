//! Error types for Stratus operations.
//!
//! Validation, scoring and layout are total and never fail. [`StratusError`]
//! covers the edges around them: reading diagrams, checking their hierarchy
//! and validating configuration.

use std::io;

use thiserror::Error;

/// The main error type for Stratus operations.
#[derive(Debug, Error)]
pub enum StratusError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON document that could not be read, kept with its text so the
    /// failing location can be shown.
    #[error("Invalid JSON document: {err}")]
    Document { err: serde_json::Error, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Graph error: {0}")]
    Graph(String),
}

impl StratusError {
    /// Creates a [`StratusError::Document`] from a parse error and the text
    /// that failed to parse.
    pub fn new_document_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Document {
            err,
            src: src.into(),
        }
    }
}
