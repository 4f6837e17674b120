//! Error types for dossier synthesis

use thiserror::Error;

/// Errors that end a synthesis run. None of them are retried.
#[derive(Error, Debug)]
pub enum SynthError {
    /// No API key in the environment or any candidate file
    #[error("{env_var} not set and no credential file found (checked: {checked})")]
    CredentialMissing { env_var: String, checked: String },

    /// Network fault, timeout, or request construction failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Completion service answered with a non-2xx status
    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body or model output does not match the dossier contract
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SynthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SynthError::Http(format!("request timed out: {err}"))
        } else {
            SynthError::Http(err.to_string())
        }
    }
}
