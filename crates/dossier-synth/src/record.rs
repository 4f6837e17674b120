//! Dossier record schema.
//!
//! [`DossierBody`] is what the model must return; deserializing into it is
//! the schema check (every key required, enums closed). [`DossierRecord`]
//! adds the locally derived provenance fields.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ai,
    Blockchain,
    Automation,
    Security,
    Enterprise,
    Robotics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Production,
    Experimental,
    Archived,
    Live,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    #[serde(deserialize_with = "scalar_string")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    #[serde(deserialize_with = "scalar_string")]
    pub value: String,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechChoice {
    pub name: String,
    pub why: String,
}

/// Model-authored part of a dossier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DossierBody {
    pub title: String,
    pub tagline: String,
    pub category: Category,
    pub status: Status,
    pub problem: String,
    pub solution: String,
    pub challenges: Vec<String>,
    pub stats: Vec<Stat>,
    pub metrics: Vec<Metric>,
    pub lessons: Vec<String>,
    pub personal_notes: String,
    pub tech_stack: Vec<TechChoice>,
    pub ai_context: String,
    pub future_work: Vec<String>,
}

/// Locally known facts about the dossier's source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    /// Source identifier, copied verbatim into `repoUrl`.
    pub repo_url: String,
    /// Most recent commit timestamp, if the snapshot had one.
    pub created_at: Option<String>,
}

impl Provenance {
    pub fn new(repo_url: impl Into<String>, created_at: Option<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            created_at,
        }
    }
}

/// Complete dossier as printed by the `generate` pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DossierRecord {
    #[serde(flatten)]
    pub body: DossierBody,
    pub id: String,
    pub repo_url: String,
    pub created_at: String,
    /// Reserved for manual curation; always empty here.
    #[serde(default)]
    pub source_map: Vec<serde_json::Value>,
    /// Placeholder; always `null` here.
    #[serde(default)]
    pub manufacturing_relevance: Option<serde_json::Value>,
}

impl DossierRecord {
    /// Attach provenance to a validated body. Model-supplied values for the
    /// local fields never survive: the body type has no slot for them.
    pub fn augment(body: DossierBody, provenance: &Provenance) -> Self {
        DossierRecord {
            body,
            id: dossier_id(&provenance.repo_url),
            repo_url: provenance.repo_url.clone(),
            created_at: provenance.created_at.clone().unwrap_or_default(),
            source_map: Vec::new(),
            manufacturing_relevance: None,
        }
    }
}

/// Last path segment of `repo_url`, lower-cased. Trailing slashes are ignored.
pub fn dossier_id(repo_url: &str) -> String {
    repo_url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}
