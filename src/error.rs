use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading the question bank. Any of these aborts
/// initialization; no partially built index is ever served.
#[derive(Error, Debug)]
pub enum KbError {
    #[error("failed to read question bank at {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("question bank at {} is not a valid JSON question array", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("question #{index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
}
