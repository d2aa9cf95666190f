use std::io;

use thiserror::Error;

/// Error type for configuration, IO and output-encoding failures.
///
/// Bad input lines never surface here; they are counted in `IngestStats`.
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("csv output failure: {0}")]
    Csv(#[from] csv::Error),
    #[error("json output failure: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
}
