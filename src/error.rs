use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

// Top-level error for the tracker engine. Parse ambiguity is deliberately
// absent: a region that matches no known section shape leaves its snapshot
// field as None and is never an error.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError), // Errors from the host's generation call.

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError), // Errors writing or reading conversation records.

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error), // Errors related to data serialization.

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error), // Input/output errors.
}

// Errors crossing the generation boundary are separated into their own enum.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Upstream returned an empty response")]
    EmptyResponse, // The generation call returned no text; no snapshot can be derived.

    #[error("Upstream error: {0}")]
    Upstream(String), // Failure reported by the host's generation API.

    #[error("Generation aborted")]
    Aborted, // The host cancelled the in-flight generation.
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No data directory available")]
    NoDataDir, // The home directory could not be resolved.
}
