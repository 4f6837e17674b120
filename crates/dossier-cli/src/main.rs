//! repo-dossier CLI
//!
//! ## Commands
//!
//! - `generate`: fetch a repository, build its context block and synthesize a
//!   technical dossier through the completion endpoint
//! - `map`: fetch a repository and print its heuristic source map
//!
//! Both print pretty JSON on stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dossier_core::{
    build_context, build_source_map, emit_snapshot_fetched, fetch_snapshot,
    last_commit_timestamp, PipelineSpan, RepoSnapshot,
};
use dossier_synth::{
    credential_candidates, resolve_credential, DossierClient, Provenance, SynthConfig,
    DEFAULT_ENDPOINT, DEFAULT_MODEL,
};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "repo-dossier")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Repository dossiers and source maps", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a technical dossier for a repository
    Generate {
        /// Repository URL or local path
        #[arg(default_value = ".")]
        target: String,

        /// Repository URL recorded in the dossier (default: derived from the target)
        #[arg(long, env = "GITHUB_REPOSITORY_URL")]
        repo_url: Option<String>,

        /// Chat-completions endpoint
        #[arg(long, env = "DOSSIER_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,

        /// Model identifier
        #[arg(long, env = "DOSSIER_MODEL", default_value = DEFAULT_MODEL)]
        model: String,

        /// API key (falls back to chutesapi.txt lookup)
        #[arg(long, env = "CHUTES_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Print the heuristic source map of a repository
    Map {
        /// Repository URL or local path
        target: String,

        /// Project identifier the map belongs to
        #[arg(long)]
        id: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    dossier_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Generate {
            target,
            repo_url,
            endpoint,
            model,
            api_key,
        } => cmd_generate(&target, repo_url, &endpoint, &model, api_key).await,
        Commands::Map { target, id } => cmd_map(&target, &id),
    }
}

/// Fetch the target, noting where it landed.
fn open_snapshot(target: &str) -> Result<RepoSnapshot> {
    let snapshot =
        fetch_snapshot(target).with_context(|| format!("Failed to fetch repository {target}"))?;
    emit_snapshot_fetched(
        snapshot.name(),
        snapshot.root(),
        snapshot.location().is_remote(),
    );
    Ok(snapshot)
}

/// Fetch → context → synthesis; prints the dossier record.
async fn cmd_generate(
    target: &str,
    repo_url: Option<String>,
    endpoint: &str,
    model: &str,
    api_key: Option<String>,
) -> Result<()> {
    let _span = PipelineSpan::enter("generate", target);

    // Resolve configuration once, before touching the network or disk.
    let credential = resolve_credential(api_key, &credential_candidates())
        .context("Failed to resolve API credential")?;
    info!(source = %credential.source(), "credential resolved");
    let config = SynthConfig::new(credential)
        .with_endpoint(endpoint)
        .with_model(model);
    let client = DossierClient::new(config).context("Failed to create HTTP client")?;

    let snapshot = open_snapshot(target)?;
    let repo_url = repo_url.unwrap_or_else(|| snapshot.source_url());
    let created_at = last_commit_timestamp(snapshot.root());

    let context = build_context(snapshot.root());
    let provenance = Provenance::new(repo_url, created_at);

    let record = client
        .synthesize(&context, &provenance)
        .await
        .context("Dossier synthesis failed")?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// Fetch → source map; prints the graph.
fn cmd_map(target: &str, id: &str) -> Result<()> {
    let _span = PipelineSpan::enter_project("map", target, id);
    info!("building source map");

    let snapshot = open_snapshot(target)?;
    let graph = build_source_map(snapshot.root(), snapshot.name());

    println!("{}", graph.to_json_pretty()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn map_requires_id() {
        let result = Cli::try_parse_from(["repo-dossier", "map", "."]);
        assert!(result.is_err());
    }

    #[test]
    fn generate_defaults_to_current_directory() {
        let cli = Cli::try_parse_from(["repo-dossier", "generate"]).unwrap();
        match cli.command {
            Commands::Generate { target, .. } => assert_eq!(target, "."),
            Commands::Map { .. } => panic!("expected generate"),
        }
    }
}
