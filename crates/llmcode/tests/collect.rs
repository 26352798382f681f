use std::fs;
use std::path::Path;

use llmcode::app::collect::collect;
use llmcode::domain::errors::CollectError;

fn paths(root: &Path, arg: &str) -> Vec<String> {
    collect(root, arg)
        .unwrap()
        .entries
        .into_iter()
        .map(|entry| entry.path)
        .collect()
}

#[test]
fn collects_every_text_file_without_gitignore() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src/nested")).unwrap();
    fs::write(root.join("README.md"), "# readme").unwrap();
    fs::write(root.join("src/lib.rs"), "pub fn lib() {}").unwrap();
    fs::write(root.join("src/nested/deep.txt"), "deep").unwrap();

    let collected = paths(root, ".");
    assert_eq!(collected, vec!["README.md", "src/lib.rs", "src/nested/deep.txt"]);
}

#[test]
fn directory_pattern_excludes_everything_beneath_it() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("vendor/a/b/c")).unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join(".gitignore"), "vendor/\n").unwrap();
    fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();
    fs::write(root.join("vendor/top.txt"), "x").unwrap();
    fs::write(root.join("vendor/a/b/c/deep.txt"), "x").unwrap();

    let collected = paths(root, ".");
    assert_eq!(collected, vec!["src/main.rs"]);
}

#[test]
fn single_file_entry_uses_base_name() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("docs/guide")).unwrap();
    fs::write(root.join("docs/guide/intro.md"), "# intro").unwrap();

    let result = collect(root, "docs/guide/intro.md").unwrap();
    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].path, "intro.md");
    assert_eq!(result.entries[0].content, "# intro");
}

#[test]
fn repeated_runs_are_identical() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("b")).unwrap();
    fs::create_dir_all(root.join("a")).unwrap();
    fs::write(root.join("b/2.txt"), "two").unwrap();
    fs::write(root.join("a/1.txt"), "one").unwrap();
    fs::write(root.join("0.txt"), "zero").unwrap();

    let first = collect(root, ".").unwrap();
    let second = collect(root, ".").unwrap();
    assert_eq!(first, second);
}

#[test]
fn binary_files_are_silently_skipped_in_directory_mode() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    fs::write(root.join("data.bin"), [0xff, 0xfe, 0x00, 0x01]).unwrap();
    fs::write(root.join("text.txt"), "readable").unwrap();

    let collected = paths(root, ".");
    assert_eq!(collected, vec!["text.txt"]);
}

#[test]
fn gitignored_subdirectory_scenario() {
    // Root: a.txt ("hello"), .gitignore ("b/"), b/c.txt.
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("b")).unwrap();
    fs::write(root.join("a.txt"), "hello").unwrap();
    fs::write(root.join(".gitignore"), "b/\n").unwrap();
    fs::write(root.join("b/c.txt"), "nested").unwrap();

    let result = collect(root, ".").unwrap();
    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].path, "a.txt");
    assert_eq!(result.entries[0].content, "hello");
}

#[test]
fn builtin_env_marker_yields_empty_success() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("secret.env"), "TOKEN=abc").unwrap();

    let result = collect(temp.path(), ".").unwrap();
    assert!(result.is_empty());
}

#[test]
fn missing_path_is_a_resolution_failure() {
    let temp = tempfile::tempdir().unwrap();

    let err = collect(temp.path(), "missing.txt").unwrap_err();
    match &err {
        CollectError::PathResolution { path, .. } => {
            assert!(path.ends_with("missing.txt"));
        }
        other => panic!("expected PathResolution, got {other:?}"),
    }
    assert!(err.to_string().contains("missing.txt"));
}

#[test]
fn unreadable_single_file_uses_contract_message() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("blob.dat"), [0x00, 0x9f, 0x92, 0x96]).unwrap();

    let err = collect(temp.path(), "blob.dat").unwrap_err();
    assert!(matches!(err, CollectError::UnreadableFile));
    assert_eq!(err.to_string(), "Cannot read file: binary or unreadable");
}

#[test]
fn collecting_a_subdirectory_reports_paths_relative_to_it() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("sub/inner")).unwrap();
    fs::write(root.join("outside.txt"), "outside").unwrap();
    fs::write(root.join("sub/one.txt"), "one").unwrap();
    fs::write(root.join("sub/inner/two.txt"), "two").unwrap();

    let collected = paths(root, "sub");
    assert_eq!(collected, vec!["inner/two.txt", "one.txt"]);
}

#[test]
fn name_glob_excludes_files_at_any_depth() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("logs/archive")).unwrap();
    fs::write(root.join(".gitignore"), "*.log\n").unwrap();
    fs::write(root.join("top.log"), "x").unwrap();
    fs::write(root.join("logs/archive/old.log"), "x").unwrap();
    fs::write(root.join("logs/archive/notes.txt"), "keep").unwrap();

    let collected = paths(root, ".");
    assert_eq!(collected, vec!["logs/archive/notes.txt"]);
}
