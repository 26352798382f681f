//! Workspace context collection.
//!
//! Walks a directory tree, filters it through `.gitignore`-style glob rules
//! plus a set of built-in name exclusions, reads the surviving files as UTF-8
//! and assembles them into a [`WorkspaceContext`] ready for transcript
//! injection.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;

use crate::domain::errors::CollectError;
use crate::domain::model::{ContextEntry, WorkspaceContext};

const GITIGNORE_FILE: &str = ".gitignore";

/// File name substrings that are always excluded, matched case-insensitively
/// against the bare file name regardless of any ignore rules.
const EXCLUDED_NAME_MARKERS: &[&str] = &[".git", ".pyc", ".env", "__pycache__"];

/// Ordered glob rules loaded from a `.gitignore`-like file.
///
/// Matching is plain glob matching (via `globset`), not full gitignore:
/// `!` negation, leading-`/` anchoring and last-match-wins precedence are not
/// supported. `globset` additionally understands `**` and `{a,b}`
/// alternations, a harmless superset of the original rule format. Pattern
/// separators are written with `/`; `globset` maps them to the host
/// separator when matching paths.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<IgnorePattern>,
}

#[derive(Debug, Clone)]
struct IgnorePattern {
    /// Matcher for the pattern exactly as written.
    path: GlobMatcher,
    /// Matcher with trailing separators stripped, used against bare names so
    /// that directory patterns like `build/` still match the name `build`.
    name: GlobMatcher,
}

impl IgnorePattern {
    fn new(raw: &str) -> Result<Self, globset::Error> {
        let path = Glob::new(raw)?.compile_matcher();
        let stripped = raw.trim_end_matches(['/', '\\']);
        let name = Glob::new(stripped)?.compile_matcher();
        Ok(Self { path, name })
    }
}

impl IgnoreRules {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Load rules from the `.gitignore` directly under `root`. A missing or
    /// unreadable ignore file yields an empty rule set, not an error.
    pub fn load(root: &Path) -> Self {
        match fs::read_to_string(root.join(GITIGNORE_FILE)) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => Self::empty(),
        }
    }

    /// Parse rules from ignore-file text: one glob per line, blank lines and
    /// `#` comments skipped, surrounding whitespace trimmed.
    pub fn parse(contents: &str) -> Self {
        let mut patterns = Vec::new();
        for line in contents.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match IgnorePattern::new(trimmed) {
                Ok(pattern) => patterns.push(pattern),
                Err(err) => {
                    tracing::warn!(pattern = trimmed, error = %err, "skipping unparsable ignore pattern");
                }
            }
        }
        Self { patterns }
    }

    fn matches_path(&self, rel: &Path) -> bool {
        self.patterns.iter().any(|p| p.path.is_match(rel))
    }

    fn matches_name(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.name.is_match(name))
    }

    fn matches_component(&self, component: &str) -> bool {
        self.patterns.iter().any(|p| p.path.is_match(component))
    }

    /// Whether a directory should be pruned before descent: either its path
    /// relative to the scan root or its bare name matches a rule.
    fn prunes_directory(&self, rel: &Path, name: &str) -> bool {
        self.matches_path(rel) || self.matches_name(name)
    }

    /// Whether a file should be excluded. The relative path, the bare name
    /// and every individual path component are all tested; the redundancy
    /// rejects files nested under an ignored segment even when the directory
    /// itself escaped pruning, and must be kept.
    fn excludes_file(&self, rel: &Path, name: &str) -> bool {
        if self.matches_path(rel) || self.matches_name(name) {
            return true;
        }
        rel.iter()
            .any(|part| part.to_str().is_some_and(|part| self.matches_component(part)))
    }
}

fn has_excluded_marker(name: &str) -> bool {
    let lowered = name.to_lowercase();
    EXCLUDED_NAME_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Collect workspace context for `path_arg`, resolved against `root`.
///
/// A file path yields a single entry keyed by the file's base name; a
/// directory is walked recursively with ignore rules loaded from the
/// `.gitignore` under `root` (never under the scanned subdirectory). An
/// empty `path_arg` means the root itself. Only path resolution and the
/// single-file unreadable case fail the call; per-file problems during a
/// directory walk skip the file and continue.
pub fn collect(root: &Path, path_arg: &str) -> Result<WorkspaceContext, CollectError> {
    let requested = if path_arg.is_empty() { "." } else { path_arg };
    let resolved = resolve(root, requested)?;

    if resolved.is_file() {
        return collect_single_file(requested, &resolved);
    }

    let rules = Arc::new(IgnoreRules::load(root));
    let entries = walk_directory(&resolved, &rules);
    Ok(WorkspaceContext {
        origin: requested.to_owned(),
        entries,
    })
}

fn resolve(root: &Path, path_arg: &str) -> Result<PathBuf, CollectError> {
    let requested = Path::new(path_arg);
    let joined = if requested.is_absolute() {
        requested.to_path_buf()
    } else {
        root.join(requested)
    };
    joined
        .canonicalize()
        .map_err(|source| CollectError::PathResolution {
            path: joined.display().to_string(),
            source,
        })
}

fn collect_single_file(origin: &str, path: &Path) -> Result<WorkspaceContext, CollectError> {
    let content = fs::read_to_string(path).map_err(|err| {
        tracing::debug!(path = %path.display(), error = %err, "single-file read failed");
        CollectError::UnreadableFile
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(WorkspaceContext {
        origin: origin.to_owned(),
        entries: vec![ContextEntry {
            path: name,
            content,
        }],
    })
}

/// Depth-first serial walk with children sorted by name, so repeated runs
/// over an unchanged tree produce identical results.
fn walk_directory(scan_root: &Path, rules: &Arc<IgnoreRules>) -> Vec<ContextEntry> {
    let mut builder = WalkBuilder::new(scan_root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    let filter_rules = Arc::clone(rules);
    let filter_root = scan_root.to_path_buf();
    builder.filter_entry(move |entry| {
        if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
            return true;
        }
        let rel = entry.path().strip_prefix(&filter_root).unwrap_or(entry.path());
        let name = entry.file_name().to_string_lossy();
        !filter_rules.prunes_directory(rel, &name)
    });

    let mut entries = Vec::new();
    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "error while walking workspace");
                continue;
            }
        };
        if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let rel = entry.path().strip_prefix(scan_root).unwrap_or(entry.path());
        let name = entry.file_name().to_string_lossy();
        if has_excluded_marker(&name) || rules.excludes_file(rel, &name) {
            continue;
        }

        match fs::read_to_string(entry.path()) {
            Ok(content) => entries.push(ContextEntry {
                path: rel.display().to_string(),
                content,
            }),
            Err(err) => {
                tracing::debug!(path = %entry.path().display(), error = %err, "skipping unreadable file");
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parse_skips_blanks_and_comments() {
        let rules = IgnoreRules::parse("# header\n\n  target/  \nnode_modules\n\n# tail\n");
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn parse_skips_unparsable_patterns() {
        let rules = IgnoreRules::parse("[invalid\n*.log\n");
        assert_eq!(rules.len(), 1);
        assert!(rules.matches_name("debug.log"));
    }

    #[test]
    fn directory_pattern_matches_bare_name_after_strip() {
        let rules = IgnoreRules::parse("build/\n");
        assert!(rules.prunes_directory(Path::new("build"), "build"));
        assert!(rules.prunes_directory(Path::new("nested/build"), "build"));
        assert!(!rules.prunes_directory(Path::new("builder"), "builder"));
    }

    #[test]
    fn file_exclusion_checks_every_component() {
        let rules = IgnoreRules::parse("secrets\n");
        assert!(rules.excludes_file(Path::new("secrets/key.txt"), "key.txt"));
        assert!(rules.excludes_file(Path::new("deep/secrets/key.txt"), "key.txt"));
        assert!(!rules.excludes_file(Path::new("deep/public/key.txt"), "key.txt"));
    }

    #[test]
    fn glob_patterns_match_file_names() {
        let rules = IgnoreRules::parse("*.lock\n");
        assert!(rules.excludes_file(Path::new("Cargo.lock"), "Cargo.lock"));
        assert!(rules.excludes_file(Path::new("sub/Cargo.lock"), "Cargo.lock"));
        assert!(!rules.excludes_file(Path::new("Cargo.toml"), "Cargo.toml"));
    }

    #[test]
    fn builtin_markers_are_case_insensitive() {
        assert!(has_excluded_marker("secret.ENV"));
        assert!(has_excluded_marker("module.PYC"));
        assert!(has_excluded_marker(".gitignore"));
        assert!(!has_excluded_marker("environment.rs"));
    }

    #[test]
    fn missing_gitignore_yields_empty_rules() {
        let temp = tempfile::tempdir().unwrap();
        let rules = IgnoreRules::load(temp.path());
        assert!(rules.is_empty());
    }

    #[test]
    fn rules_are_loaded_from_root_not_scanned_subdir() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join(".gitignore"), "*.log\n").unwrap();
        fs::write(root.join("sub/.gitignore"), "*.txt\n").unwrap();
        fs::write(root.join("sub/keep.txt"), "kept").unwrap();
        fs::write(root.join("sub/drop.log"), "dropped").unwrap();

        let result = collect(root, "sub").unwrap();
        let paths: Vec<_> = result.entries.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"keep.txt"));
        assert!(!paths.contains(&"drop.log"));
    }

    #[test]
    fn empty_path_argument_means_root() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();

        let result = collect(temp.path(), "").unwrap();
        assert_eq!(result.origin, ".");
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn traversal_order_is_sorted_within_each_level() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("zlib")).unwrap();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("zlib/inner.txt"), "inner").unwrap();

        let result = collect(root, ".").unwrap();
        let paths: Vec<_> = result.entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["a.txt", "b.txt", "zlib/inner.txt"]);
    }
}
