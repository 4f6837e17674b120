//! dossier-synth: LLM-backed repository dossiers
//!
//! Sends a [`dossier_core::ContextBlock`] with a fixed instruction template
//! to an OpenAI-compatible chat-completions endpoint, validates the returned
//! JSON against the dossier schema and stamps it with local provenance.
//!
//! Configuration (endpoint, model, credential) is resolved once into a
//! [`SynthConfig`] and handed to [`DossierClient`].

pub mod client;
pub mod config;
pub mod error;
pub mod prompt;
pub mod record;
pub mod response;

pub use client::DossierClient;
pub use config::{
    credential_candidates, resolve_credential, Credential, CredentialSource, SynthConfig,
    API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MODEL,
};
pub use error::SynthError;
pub use prompt::build_prompt;
pub use record::{
    dossier_id, Category, DossierBody, DossierRecord, Metric, Provenance, Stat, Status,
    TechChoice,
};
pub use response::{message_content, parse_dossier, strip_fence};

/// Result type for synthesis operations.
pub type Result<T> = std::result::Result<T, SynthError>;
