//! Cheap per-file role classification.
//!
//! No parsing: a file's role comes from its extension and the first
//! declaration-looking line near the top. Multi-line comments and block
//! strings will confuse it.

use std::borrow::Cow;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lines inspected for a declaration keyword.
pub const ROLE_SCAN_LINES: usize = 30;

/// Maximum number of lines kept in a snippet.
pub const SNIPPET_MAX_LINES: usize = 15;

const TYPE_KEYWORD: &str = "class ";
const FUNCTION_KEYWORD: &str = "def ";
const COMMENT_MARKERS: &[&str] = &["#", "//"];

const PYTHON_COLOR: &str = "#6366f1";
const DEFAULT_COLOR: &str = "#3b82f6";

/// Heuristic classification of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInsight {
    pub relative_path: String,
    pub display_label: String,
    pub role_description: String,
    pub snippet: String,
    pub color_hint: String,
}

/// Coarse extension bucket used for the default role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionBucket {
    Scripting,
    Interactive,
    Documentation,
    Other,
}

impl ExtensionBucket {
    pub fn of(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("py") => ExtensionBucket::Scripting,
            Some("js" | "jsx" | "ts" | "tsx") => ExtensionBucket::Interactive,
            Some("md") => ExtensionBucket::Documentation,
            _ => ExtensionBucket::Other,
        }
    }

    pub fn default_role(self) -> &'static str {
        match self {
            ExtensionBucket::Scripting => "Python logic script. Orchestrates backend operations.",
            ExtensionBucket::Interactive => "Reactive component. Handles state and interaction.",
            ExtensionBucket::Documentation => "Documentation. Architectural context.",
            ExtensionBucket::Other => "Source module for core logic.",
        }
    }
}

/// Color hint keyed off the file name: one for Python, one for everything else.
pub fn color_hint(file_name: &str) -> &'static str {
    if file_name.ends_with(".py") {
        PYTHON_COLOR
    } else {
        DEFAULT_COLOR
    }
}

/// Classify the file at `path`, reported under `relative_path`.
///
/// Never fails: an unreadable or non-UTF-8 file gets the default role for its
/// extension and an empty snippet.
pub fn classify_file(path: &Path, relative_path: &str) -> FileInsight {
    let display_label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| relative_path.to_string());
    let default_role = ExtensionBucket::of(path).default_role();

    let (role_description, snippet) = match std::fs::read_to_string(path) {
        Ok(text) => {
            let role = detect_role(&text).unwrap_or_else(|| default_role.to_string());
            (role, extract_snippet(&text))
        }
        Err(e) => {
            debug!(file = %relative_path, error = %e, "falling back to default insight");
            (default_role.to_string(), String::new())
        }
    };

    FileInsight {
        relative_path: relative_path.to_string(),
        color_hint: color_hint(&display_label).to_string(),
        display_label,
        role_description,
        snippet,
    }
}

/// Role from the first declaration line within [`ROLE_SCAN_LINES`].
///
/// On each line a type declaration is checked before a function declaration;
/// the first line that matches either ends the scan.
pub fn detect_role(text: &str) -> Option<String> {
    let text = normalize_line_endings(text);
    for line in text.lines().take(ROLE_SCAN_LINES) {
        if let Some((_, rest)) = line.split_once(TYPE_KEYWORD) {
            let name = cut_at(rest, &['(', ':']);
            return Some(format!("Defines {name} class. Core architectural component."));
        }
        if let Some((_, rest)) = line.split_once(FUNCTION_KEYWORD) {
            let name = cut_at(rest, &['(']);
            return Some(format!("Implements {name} functionality."));
        }
    }
    None
}

/// Rewrite `\r\n` and bare `\r` line endings to `\n`.
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn cut_at<'a>(text: &'a str, stops: &[char]) -> &'a str {
    let end = text.find(stops).unwrap_or(text.len());
    text[..end].trim()
}

/// Up to [`SNIPPET_MAX_LINES`] non-blank, non-comment lines, with their line endings.
pub fn extract_snippet(text: &str) -> String {
    normalize_line_endings(text)
        .split_inclusive('\n')
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !COMMENT_MARKERS.iter().any(|m| trimmed.starts_with(m))
        })
        .take(SNIPPET_MAX_LINES)
        .collect()
}
