//! Error types for NextStat

use thiserror::Error;

/// NextStat error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A leaf requested from an event source does not exist.
    #[error("missing leaf: '{0}'")]
    MissingLeaf(String),

    /// A leaf was read after being deactivated.
    #[error("leaf is not active: '{0}'")]
    InactiveLeaf(String),

    /// A named selection parameter is absent from the parameter bag.
    #[error("missing parameter: '{0}'")]
    MissingParameter(String),

    /// A variation handle does not belong to the store it was used with.
    #[error("unknown variation: {0}")]
    UnknownVariation(String),

    /// The variation exists but carries no MET four-vector.
    #[error("variation '{0}' is not applicable to MET")]
    InapplicableVariation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
