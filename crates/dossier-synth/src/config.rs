//! Synthesis configuration and credential discovery.
//!
//! Everything here is resolved once by the entry point and then passed
//! explicitly to [`DossierClient`](crate::DossierClient); nothing downstream
//! reads the environment.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::SynthError;
use crate::Result;

/// Environment variable carrying the API key directly.
pub const API_KEY_ENV: &str = "CHUTES_API_KEY";
/// File name looked up in the candidate credential locations.
pub const CREDENTIAL_FILE_NAME: &str = "chutesapi.txt";

pub const DEFAULT_ENDPOINT: &str = "https://llm.chutes.ai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "nvidia/NVIDIA-Nemotron-3-Nano-30B-A3B-BF16";
pub const DEFAULT_TEMPERATURE: f32 = 0.6;
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// Where an API key was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Env(String),
    File(PathBuf),
    Explicit,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Env(var) => write!(f, "env:{var}"),
            CredentialSource::File(path) => write!(f, "file:{}", path.display()),
            CredentialSource::Explicit => write!(f, "explicit"),
        }
    }
}

/// An API key plus its provenance. `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    key: String,
    source: CredentialSource,
}

impl Credential {
    pub fn new(key: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            key: key.into(),
            source,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("key", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Candidate credential files, highest priority first: the working
/// directory, its parent, then the home directory.
pub fn credential_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(CREDENTIAL_FILE_NAME),
        Path::new("..").join(CREDENTIAL_FILE_NAME),
    ];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(CREDENTIAL_FILE_NAME));
    }
    candidates
}

/// Resolve an API key: a non-empty `env_value` wins; otherwise the first
/// existing file in `candidates` supplies its trimmed content.
pub fn resolve_credential(env_value: Option<String>, candidates: &[PathBuf]) -> Result<Credential> {
    if let Some(key) = env_value.map(|v| v.trim().to_string()) {
        if !key.is_empty() {
            return Ok(Credential::new(key, CredentialSource::Env(API_KEY_ENV.to_string())));
        }
    }

    if let Some(path) = candidates.iter().find(|p| p.is_file()) {
        let key = std::fs::read_to_string(path)?.trim().to_string();
        if !key.is_empty() {
            debug!(path = %path.display(), "using credential file");
            return Ok(Credential::new(key, CredentialSource::File(path.clone())));
        }
    }

    Err(SynthError::CredentialMissing {
        env_var: API_KEY_ENV.to_string(),
        checked: candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Settings for one synthesis call.
#[derive(Clone)]
pub struct SynthConfig {
    /// Full chat-completions URL
    pub endpoint: String,
    /// Model identifier sent with the request
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Whole-request timeout
    pub timeout: Duration,
    pub credential: Credential,
}

impl SynthConfig {
    /// Default endpoint and sampling settings with the given credential.
    pub fn new(credential: Credential) -> Self {
        SynthConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
            credential,
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for SynthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("credential", &self.credential)
            .finish()
    }
}
