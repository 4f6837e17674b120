//! Structured lifecycle events for pipeline runs.
//!
//! Events are emitted at `info!` (per-file skips at `warn!`) and carry an
//! `event` field so JSON log consumers can filter on it.

use tracing::{info, warn};

/// RAII guard for a pipeline-scoped span.
///
/// ```ignore
/// let _span = PipelineSpan::enter("map", "https://github.com/org/repo");
/// ```
pub struct PipelineSpan {
    _span: tracing::span::EnteredSpan,
}

impl PipelineSpan {
    pub fn enter(pipeline: &str, target: &str) -> Self {
        let span = tracing::info_span!("dossier.pipeline", pipeline = %pipeline, target = %target);
        Self {
            _span: span.entered(),
        }
    }

    /// Like [`enter`](Self::enter), with the project the run belongs to
    /// recorded on the span so every event inside carries it.
    pub fn enter_project(pipeline: &str, target: &str, project_id: &str) -> Self {
        let span = tracing::info_span!(
            "dossier.pipeline",
            pipeline = %pipeline,
            target = %target,
            project_id = %project_id,
        );
        Self {
            _span: span.entered(),
        }
    }
}

pub fn emit_snapshot_fetched(name: &str, root: &std::path::Path, remote: bool) {
    info!(
        event = "snapshot.fetched",
        name = %name,
        root = %root.display(),
        remote = remote,
    );
}

/// A file dropped from a context block because it could not be read.
pub fn emit_file_skipped(relative_path: &str, error: &dyn std::fmt::Display) {
    warn!(event = "context.file_skipped", file = %relative_path, error = %error);
}

/// Context block assembled. There is no size cap, so `chars` is the figure
/// an operator should watch against the model's context window.
pub fn emit_context_built(files: usize, chars: usize) {
    info!(event = "context.built", files = files, chars = chars);
}

pub fn emit_source_map_built(nodes: usize, edges: usize) {
    info!(event = "source_map.built", nodes = nodes, edges = edges);
}

pub fn emit_synthesis_requested(model: &str, endpoint: &str, prompt_chars: usize) {
    info!(
        event = "synthesis.requested",
        model = %model,
        endpoint = %endpoint,
        prompt_chars = prompt_chars,
    );
}

pub fn emit_synthesis_completed(id: &str, duration_ms: u64) {
    info!(event = "synthesis.completed", id = %id, duration_ms = duration_ms);
}
