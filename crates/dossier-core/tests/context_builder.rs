//! Integration tests for context block assembly over real directory trees.

use dossier_core::walk::{CONTEXT_EXCLUDED_DIRS, CONTEXT_EXTENSIONS};
use dossier_core::{build_context, build_context_with};
use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Lay out a tree that puts every excluded directory at several depths.
fn noisy_tree(root: &Path) {
    write(root, "README.md", "# demo\n");
    write(root, "src/app.py", "def app():\n    pass\n");
    write(root, "src/ui/view.tsx", "export const View = () => null;\n");
    write(root, "assets/logo.svg", "<svg/>\n");
    write(root, "yarn.lock", "lock\n");
    for (i, dir) in CONTEXT_EXCLUDED_DIRS.iter().enumerate() {
        write(root, &format!("{dir}/top.js"), "top\n");
        write(root, &format!("src/{dir}/mid.py"), "mid\n");
        write(root, &format!("a/b/c{i}/{dir}/deep.rs"), "deep\n");
    }
}

/// Test: no excluded segment and no disallowed extension at any depth
#[test]
fn test_excluded_paths_never_included() {
    let dir = tempfile::tempdir().unwrap();
    noisy_tree(dir.path());

    let block = build_context(dir.path());

    for entry in block.entries() {
        let segments: Vec<&str> = entry.relative_path.split('/').collect();
        for excluded in CONTEXT_EXCLUDED_DIRS {
            assert!(
                !segments.contains(excluded),
                "{} contains excluded segment {excluded}",
                entry.relative_path
            );
        }
        let ext = Path::new(&entry.relative_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap();
        assert!(CONTEXT_EXTENSIONS.contains(&ext), "{ext} not allowed");
    }

    let mut paths: Vec<_> = block
        .entries()
        .iter()
        .map(|e| e.relative_path.as_str())
        .collect();
    paths.sort();
    assert_eq!(paths, vec!["README.md", "src/app.py", "src/ui/view.tsx"]);
}

/// Test: one unreadable file is skipped, every other file still appears in walk order
#[test]
fn test_read_failure_does_not_abort() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.py", "a = 1\n");
    write(dir.path(), "broken.py", "never read\n");
    write(dir.path(), "c.md", "# c\n");
    write(dir.path(), "pkg/d.rs", "fn d() {}\n");

    let baseline = build_context(dir.path());
    assert_eq!(baseline.len(), 4);

    let block = build_context_with(dir.path(), |path| {
        if path.ends_with("broken.py") {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            ))
        } else {
            fs::read(path)
        }
    });

    let expected: Vec<_> = baseline
        .entries()
        .iter()
        .filter(|e| e.relative_path != "broken.py")
        .cloned()
        .collect();
    assert_eq!(block.entries(), expected.as_slice());
    assert!(!block.render().contains("broken.py"));
}

/// Test: rendered block carries a header per file followed by its full text
#[test]
fn test_render_contains_full_contents() {
    let dir = tempfile::tempdir().unwrap();
    let body = "line one\nline two\n\n# not stripped\n";
    write(dir.path(), "notes.txt", body);

    let rendered = build_context(dir.path()).render();
    assert_eq!(rendered, format!("\n--- FILE: notes.txt ---\n{body}"));
}
