use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading poll definitions
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("poll #{index} is missing the `{attribute}` attribute")]
    MissingAttribute {
        index: usize,
        attribute: &'static str,
    },

    #[error("inline poll `{0}` must look like TITLE=ITEM|ITEM")]
    InlineDefinition(String),

    #[error("failed to read poll definitions from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid poll definitions JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Pattern(#[from] regex::Error),

    #[error("no poll definitions found")]
    Empty,
}
