//! Whole-repository context blocks for model input.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::obs;
use crate::walk::{walk, InclusionPolicy};

/// One file's contribution to a [`ContextBlock`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    /// Path relative to the snapshot root.
    pub relative_path: String,
    /// Full file text, invalid UTF-8 replaced.
    pub content: String,
}

/// Ordered, unbounded concatenation of repository files.
///
/// There is no size cap; truncation is up to the consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBlock {
    entries: Vec<ContextEntry>,
}

impl ContextBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, relative_path: impl Into<String>, content: impl Into<String>) {
        self.entries.push(ContextEntry {
            relative_path: relative_path.into(),
            content: content.into(),
        });
    }

    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    /// Number of files in the block.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the block as model input: a `--- FILE: <path> ---` header line
    /// before each file's text.
    pub fn render(&self) -> String {
        let mut parts = Vec::with_capacity(self.entries.len() * 2);
        for entry in &self.entries {
            parts.push(format!("\n--- FILE: {} ---", entry.relative_path));
            parts.push(entry.content.clone());
        }
        parts.join("\n")
    }

    /// Character count of [`render`](Self::render).
    pub fn char_count(&self) -> usize {
        self.render().chars().count()
    }
}

/// Build a context block from every file under `root` admitted by
/// [`InclusionPolicy::context`].
///
/// A file that cannot be read is logged and left out; the build never fails.
pub fn build_context(root: &Path) -> ContextBlock {
    build_context_with(root, |path| std::fs::read(path))
}

/// [`build_context`] with a caller-supplied file reader.
pub fn build_context_with<F>(root: &Path, mut read: F) -> ContextBlock
where
    F: FnMut(&Path) -> std::io::Result<Vec<u8>>,
{
    let policy = InclusionPolicy::context();
    let mut block = ContextBlock::new();

    for file in walk(root, &policy) {
        match read(&file.path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                block.push(file.relative, text);
            }
            Err(e) => obs::emit_file_skipped(&file.relative, &e),
        }
    }

    obs::emit_context_built(block.len(), block.char_count());
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn render_places_header_before_content() {
        let mut block = ContextBlock::new();
        block.push("src/a.py", "print('a')");
        block.push("b.md", "# B");

        assert_eq!(
            block.render(),
            "\n--- FILE: src/a.py ---\nprint('a')\n\n--- FILE: b.md ---\n# B"
        );
    }

    #[test]
    fn empty_block_renders_empty() {
        let block = ContextBlock::new();
        assert!(block.is_empty());
        assert_eq!(block.render(), "");
        assert_eq!(block.char_count(), 0);
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blob.txt"), [b'o', b'k', 0xFF, 0xFE]).unwrap();

        let block = build_context(dir.path());
        assert_eq!(block.len(), 1);
        assert!(block.entries()[0].content.starts_with("ok"));
        assert!(block.entries()[0].content.contains('\u{FFFD}'));
    }

    #[test]
    fn headers_use_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg/mod.rs"), "pub fn f() {}").unwrap();

        let rendered = build_context(dir.path()).render();
        assert!(rendered.contains("--- FILE: pkg/mod.rs ---"));
        assert!(!rendered.contains(&dir.path().display().to_string()));
    }
}
