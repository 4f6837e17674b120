//! Error taxonomy for snapshot fetching and local derivations.

/// Errors raised while materializing or reading a repository snapshot.
///
/// Per-file read failures never surface here: the context builder and the
/// classifier recover from them locally.
#[derive(Debug, thiserror::Error)]
pub enum DossierError {
    #[error("failed to fetch repository {location}: {reason}")]
    Fetch { location: String, reason: String },

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for dossier-core operations.
pub type Result<T> = std::result::Result<T, DossierError>;
