//! repo-dossier core library
//!
//! Local, offline derivations over a repository snapshot: the shared policy
//! walk, whole-repository context blocks, per-file heuristic insights and the
//! star-shaped source map.

pub mod classify;
pub mod context;
pub mod error;
pub mod git;
pub mod obs;
pub mod source_map;
pub mod telemetry;
pub mod walk;

pub use classify::{classify_file, color_hint, ExtensionBucket, FileInsight};
pub use context::{build_context, build_context_with, ContextBlock, ContextEntry};
pub use error::{DossierError, Result};
pub use git::{
    fetch_snapshot, last_commit_timestamp, normalize_remote_url, origin_url, repo_name_from_url,
    RepoLocation, RepoSnapshot,
};
pub use obs::{
    emit_context_built, emit_file_skipped, emit_snapshot_fetched, emit_source_map_built,
    emit_synthesis_completed, emit_synthesis_requested, PipelineSpan,
};
pub use source_map::{
    build_source_map, NodeKind, SourceMapEdge, SourceMapGraph, SourceMapNode, ROOT_ID,
};
pub use telemetry::init_tracing;
pub use walk::{walk, Admission, InclusionPolicy, WalkedFile};

/// repo-dossier version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
