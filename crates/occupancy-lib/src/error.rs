//! Error types for the occupancy predictor

use thiserror::Error;

/// Failure taxonomy for a prediction run. Every variant is fatal: a run
/// either completes and writes its output file or aborts with one of these.
#[derive(Debug, Error)]
pub enum PredictorError {
    /// Malformed schedule JSON or missing weekday entries
    #[error("schedule parse error: {0}")]
    ScheduleParse(String),

    /// Invalid configuration, e.g. a day with opening >= closing
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The external model failed to load or rejected the input shape
    #[error("model invocation error: {0}")]
    ModelInvocation(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error writing the output file
    #[error("output write error: {0}")]
    Output(#[from] csv::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, PredictorError>;
