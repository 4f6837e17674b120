//! Star-shaped file graphs for visualization.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::classify_file;
use crate::obs;
use crate::walk::{walk, InclusionPolicy};

/// Id of the synthetic root node.
pub const ROOT_ID: &str = "root";

const ROOT_DETAIL: &str = "Project Intelligence Center";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Core,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMapNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub detail: String,
    #[serde(rename = "code", default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMapEdge {
    pub source: String,
    pub target: String,
}

/// File graph rooted at a single `core` node.
///
/// Every file node hangs off [`ROOT_ID`] by exactly one edge; there are no
/// other edges, so the graph is a star.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMapGraph {
    pub nodes: Vec<SourceMapNode>,
    pub edges: Vec<SourceMapEdge>,
}

impl SourceMapGraph {
    /// A graph holding only the root node.
    pub fn with_root(label: impl Into<String>) -> Self {
        Self {
            nodes: vec![SourceMapNode {
                id: ROOT_ID.to_string(),
                label: label.into(),
                kind: NodeKind::Core,
                detail: ROOT_DETAIL.to_string(),
                snippet: None,
                color: None,
            }],
            edges: Vec::new(),
        }
    }

    /// Append a file node and its edge from the root.
    pub fn attach(&mut self, node: SourceMapNode) {
        self.edges.push(SourceMapEdge {
            source: ROOT_ID.to_string(),
            target: node.id.clone(),
        });
        self.nodes.push(node);
    }

    pub fn file_nodes(&self) -> impl Iterator<Item = &SourceMapNode> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::File)
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the source map for the tree at `root`, labelling the root node `label`.
pub fn build_source_map(root: &Path, label: &str) -> SourceMapGraph {
    let mut graph = SourceMapGraph::with_root(label);

    for file in walk(root, &InclusionPolicy::source_map()) {
        let insight = classify_file(&file.path, &file.relative);
        graph.attach(SourceMapNode {
            id: insight.relative_path,
            label: insight.display_label,
            kind: NodeKind::File,
            detail: insight.role_description,
            snippet: Some(insight.snippet),
            color: Some(insight.color_hint),
        });
    }

    obs::emit_source_map_built(graph.nodes.len(), graph.edges.len());
    graph
}
