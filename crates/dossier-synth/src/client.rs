//! Chat-completions client for dossier synthesis
//!
//! One request per dossier, no retries: any failure ends the run.

use std::time::Instant;

use dossier_core::{emit_synthesis_completed, emit_synthesis_requested, ContextBlock};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::SynthConfig;
use crate::error::SynthError;
use crate::prompt::build_prompt;
use crate::record::{DossierRecord, Provenance};
use crate::response::{message_content, parse_dossier};
use crate::Result;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Client for the dossier completion endpoint
pub struct DossierClient {
    config: SynthConfig,
    http_client: reqwest::Client,
}

impl DossierClient {
    /// Create a client whose requests time out after `config.timeout`
    pub fn new(config: SynthConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("repo-dossier/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(DossierClient {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Send `prompt` as a single user message and return the trimmed
    /// `choices[0].message.content`.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .bearer_auth(self.config.credential.key())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "completion request rejected");
            return Err(SynthError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(bytes = body.len(), "completion response received");
        message_content(&body)
    }

    /// Turn a context block into a validated, provenance-stamped dossier.
    pub async fn synthesize(
        &self,
        context: &ContextBlock,
        provenance: &Provenance,
    ) -> Result<DossierRecord> {
        let prompt = build_prompt(&context.render(), &provenance.repo_url);
        emit_synthesis_requested(&self.config.model, &self.config.endpoint, prompt.chars().count());

        let started = Instant::now();
        let content = self.complete(&prompt).await?;
        let body = parse_dossier(&content)?;
        let record = DossierRecord::augment(body, provenance);

        emit_synthesis_completed(&record.id, started.elapsed().as_millis() as u64);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credential, CredentialSource};

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest {
            model: "m",
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            temperature: 0.6,
            max_tokens: 4000,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "m");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
        assert_eq!(value["max_tokens"], 4000);
        assert!(value.get("stream").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let config = SynthConfig::new(Credential::new("k", CredentialSource::Explicit))
            .with_endpoint("http://127.0.0.1:9/v1/chat/completions");
        let client = DossierClient::new(config).unwrap();

        let err = client.complete("ping").await.unwrap_err();
        assert!(matches!(err, SynthError::Http(_)), "got {err:?}");
    }
}
