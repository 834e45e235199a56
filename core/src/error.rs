use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("No region configured for asset tag '{tag}'")]
    UnknownRegion { tag: String },

    #[error("Malformed asset tag '{tag}': expected PREFIX-NNNN")]
    MalformedTag { tag: String },

    #[error("Invalid fleet config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Invariant violated for {tag}: {detail}")]
    InvariantViolation { tag: String, detail: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type FleetResult<T> = Result<T, FleetError>;
