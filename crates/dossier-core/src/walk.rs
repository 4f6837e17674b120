//! Shared repository traversal with named inclusion policies.
//!
//! Both derivation paths walk the same way and differ only in the
//! [`InclusionPolicy`] they pass: [`InclusionPolicy::context`] keeps every
//! source/markup/config file outside dependency and build directories,
//! [`InclusionPolicy::source_map`] keeps a shallow, dense slice of the tree.

use std::path::{Path, PathBuf};

use tracing::{trace, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory names that never contribute to a context block.
pub const CONTEXT_EXCLUDED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    "dist",
    "build",
    ".next",
    ".venv",
    "venv",
];

/// Lockfiles and OS metadata skipped by the context policy.
pub const CONTEXT_EXCLUDED_FILES: &[&str] = &[
    ".DS_Store",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
];

/// Extensions (without the dot) admitted into a context block.
pub const CONTEXT_EXTENSIONS: &[&str] = &[
    "py", "js", "jsx", "ts", "tsx", "go", "rs", "json", "yaml", "yml", "md", "txt", "toml", "css",
    "html",
];

/// Noise directories pruned by the source map policy (hidden dirs are pruned too).
pub const SOURCE_MAP_PRUNED_DIRS: &[&str] = &["node_modules", "__pycache__"];

/// Binary and image extensions the source map never admits.
pub const SOURCE_MAP_SKIPPED_EXTENSIONS: &[&str] = &["png", "jpg", "ico", "woff2"];

/// Conventional entry points admitted by the source map at any depth.
pub const SOURCE_MAP_ENTRY_POINTS: &[&str] = &["server.py", "main.py", "App.js"];

/// How a file that survived the exclusion rules is admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Admit only files whose extension is in the allow-list.
    Extensions(&'static [&'static str]),
    /// Admit files with fewer than `max_separators` `/` in their relative
    /// path, or whose name is one of `entry_points`.
    ShallowOrEntryPoint {
        max_separators: usize,
        entry_points: &'static [&'static str],
    },
}

/// Immutable traversal filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionPolicy {
    name: &'static str,
    /// Any relative path segment (directory or file) equal to one of these excludes the entry.
    excluded_segments: &'static [&'static str],
    /// Directories with these names are not descended into.
    pruned_dirs: &'static [&'static str],
    excluded_files: &'static [&'static str],
    skipped_extensions: &'static [&'static str],
    skip_hidden: bool,
    admission: Admission,
}

impl InclusionPolicy {
    /// Policy used by the context builder.
    pub fn context() -> Self {
        Self {
            name: "context",
            excluded_segments: CONTEXT_EXCLUDED_DIRS,
            pruned_dirs: &[],
            excluded_files: CONTEXT_EXCLUDED_FILES,
            skipped_extensions: &[],
            skip_hidden: false,
            admission: Admission::Extensions(CONTEXT_EXTENSIONS),
        }
    }

    /// Policy used by the source map builder.
    pub fn source_map() -> Self {
        Self {
            name: "source_map",
            excluded_segments: &[],
            pruned_dirs: SOURCE_MAP_PRUNED_DIRS,
            excluded_files: &[],
            skipped_extensions: SOURCE_MAP_SKIPPED_EXTENSIONS,
            skip_hidden: true,
            admission: Admission::ShallowOrEntryPoint {
                max_separators: 2,
                entry_points: SOURCE_MAP_ENTRY_POINTS,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn admission(&self) -> &Admission {
        &self.admission
    }

    /// Returns `true` if the walk should keep (and, for directories, descend into) `entry`.
    fn keeps_entry(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        let Some(name) = entry.file_name().to_str() else {
            return true;
        };
        if self.excluded_segments.contains(&name) {
            return false;
        }
        if self.skip_hidden && name.starts_with('.') {
            return false;
        }
        if entry.file_type().is_dir() && self.pruned_dirs.contains(&name) {
            return false;
        }
        true
    }

    /// Returns `true` if a file with the given name and root-relative path is admitted.
    pub fn admits_file(&self, file_name: &str, relative: &str) -> bool {
        if self.excluded_files.contains(&file_name) {
            return false;
        }
        let extension = Path::new(file_name).extension().and_then(|e| e.to_str());
        if let Some(ext) = extension {
            if self.skipped_extensions.contains(&ext) {
                return false;
            }
        }

        match &self.admission {
            Admission::Extensions(allowed) => extension.is_some_and(|ext| allowed.contains(&ext)),
            Admission::ShallowOrEntryPoint {
                max_separators,
                entry_points,
            } => relative.matches('/').count() < *max_separators || entry_points.contains(&file_name),
        }
    }
}

/// A file that survived a policy walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Absolute (or root-joined) path on disk.
    pub path: PathBuf,
    /// Path relative to the walk root, `/`-separated on every platform.
    pub relative: String,
    /// Final path segment.
    pub name: String,
}

/// Walk `root` in filesystem order and return every file `policy` admits.
///
/// Unreadable directories are logged and skipped; the walk never fails.
/// Order follows what the platform reports and is not sorted.
pub fn walk(root: &Path, policy: &InclusionPolicy) -> Vec<WalkedFile> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| policy.keeps_entry(entry));

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!(policy = policy.name(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        // Symlinked directories are not descended into; symlinked files are admitted.
        if !entry.path().is_file() {
            continue;
        }

        let relative = relative_path(root, entry.path());
        let name = entry.file_name().to_string_lossy().into_owned();

        if !policy.admits_file(&name, &relative) {
            trace!(policy = policy.name(), file = %relative, "file not admitted");
            continue;
        }

        files.push(WalkedFile {
            path: entry.into_path(),
            relative,
            name,
        });
    }

    files
}

/// Render `path` relative to `root` with `/` separators.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x\n").unwrap();
    }

    fn relatives(files: &[WalkedFile]) -> Vec<String> {
        let mut out: Vec<_> = files.iter().map(|f| f.relative.clone()).collect();
        out.sort();
        out
    }

    #[test]
    fn context_policy_excludes_dirs_at_any_depth() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/app.py");
        touch(dir.path(), "node_modules/lib/index.js");
        touch(dir.path(), "pkg/deep/node_modules/x.js");
        touch(dir.path(), ".git/config.json");
        touch(dir.path(), "web/build/out.js");

        let files = walk(dir.path(), &InclusionPolicy::context());
        assert_eq!(relatives(&files), vec!["src/app.py"]);
    }

    #[test]
    fn context_policy_filters_extensions_and_lockfiles() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "README.md");
        touch(dir.path(), "logo.png");
        touch(dir.path(), "Makefile");
        touch(dir.path(), "package-lock.json");
        touch(dir.path(), "package.json");

        let files = walk(dir.path(), &InclusionPolicy::context());
        assert_eq!(relatives(&files), vec!["README.md", "package.json"]);
    }

    #[test]
    fn source_map_policy_is_shallow_except_entry_points() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "README.md");
        touch(dir.path(), "src/lib.rs");
        touch(dir.path(), "src/deep/util.rs");
        touch(dir.path(), "services/api/server.py");
        touch(dir.path(), "assets/img/logo.png");
        touch(dir.path(), "favicon.ico");

        let files = walk(dir.path(), &InclusionPolicy::source_map());
        assert_eq!(
            relatives(&files),
            vec!["README.md", "services/api/server.py", "src/lib.rs"]
        );
    }

    #[test]
    fn source_map_policy_prunes_hidden_and_noise() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), ".env");
        touch(dir.path(), ".github/ci.yml");
        touch(dir.path(), "node_modules/main.py");
        touch(dir.path(), "__pycache__/mod.pyc");
        touch(dir.path(), "app.py");

        let files = walk(dir.path(), &InclusionPolicy::source_map());
        assert_eq!(relatives(&files), vec!["app.py"]);
    }

    #[test]
    fn hidden_root_is_still_walked() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(".hidden-root");
        touch(&root, "main.py");

        let files = walk(&root, &InclusionPolicy::source_map());
        assert_eq!(relatives(&files), vec!["main.py"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_admitted_but_linked_dirs_are_not_descended() {
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("real.py"), "def f():\n    pass\n").unwrap();
        touch(outside.path(), "lib/inner.py");

        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path().join("real.py"), dir.path().join("link.py"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path().join("lib"), dir.path().join("lib")).unwrap();

        let context = walk(dir.path(), &InclusionPolicy::context());
        assert_eq!(relatives(&context), vec!["link.py"]);

        let map = walk(dir.path(), &InclusionPolicy::source_map());
        assert_eq!(relatives(&map), vec!["link.py"]);
    }

    #[test]
    fn relative_path_uses_forward_slashes() {
        let root = Path::new("/repo");
        let path = Path::new("/repo/a/b/c.rs");
        assert_eq!(relative_path(root, path), "a/b/c.rs");
    }

    #[test]
    fn admits_file_checks_separator_count() {
        let policy = InclusionPolicy::source_map();
        assert!(policy.admits_file("a.rs", "a.rs"));
        assert!(policy.admits_file("b.rs", "src/b.rs"));
        assert!(!policy.admits_file("c.rs", "src/x/c.rs"));
        assert!(policy.admits_file("App.js", "web/src/App.js"));
    }
}
