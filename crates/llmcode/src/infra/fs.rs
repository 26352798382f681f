//! Filesystem operations rooted at an explicit working directory.
//!
//! The shell owns a [`Workspace`] value instead of mutating the process-wide
//! current directory, so every operation resolves against state that can be
//! passed around and tested in isolation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use time::OffsetDateTime;

/// Directory names never shown by the tree view.
const TREE_SKIP: &[&str] = &["__pycache__", "node_modules"];

/// Explicit working directory plus the file operations the shell exposes.
#[derive(Debug, Clone)]
pub struct Workspace {
    cwd: PathBuf,
}

/// One row of a directory listing.
#[derive(Debug, Clone)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
    pub size: Option<u64>,
    pub modified: Option<OffsetDateTime>,
    /// Populated when the entry itself could not be inspected.
    pub error: Option<String>,
}

/// A listing of `path` with entries ordered directories-first.
#[derive(Debug, Clone)]
pub struct DirListing {
    pub path: PathBuf,
    pub entries: Vec<DirEntryInfo>,
}

impl Workspace {
    pub fn new(cwd: impl Into<PathBuf>) -> Result<Self> {
        let cwd = cwd.into();
        let cwd = cwd
            .canonicalize()
            .with_context(|| format!("workspace directory not accessible: {}", cwd.display()))?;
        if !cwd.is_dir() {
            bail!("workspace root is not a directory: {}", cwd.display());
        }
        Ok(Self { cwd })
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Base name of the current directory, used in the prompt.
    pub fn dir_name(&self) -> String {
        self.cwd
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.cwd.display().to_string())
    }

    /// Resolve a user-supplied path against the working directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        if path.is_empty() || path == "." {
            return self.cwd.clone();
        }
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.cwd.join(candidate)
        }
    }

    /// Change the working directory; rejects paths that are not directories.
    pub fn change_dir(&mut self, path: &str) -> Result<&Path> {
        let resolved = self.resolve(path);
        let resolved = resolved
            .canonicalize()
            .with_context(|| format!("cannot resolve '{}'", resolved.display()))?;
        if !resolved.is_dir() {
            bail!("{} is not a directory", resolved.display());
        }
        self.cwd = resolved;
        Ok(&self.cwd)
    }

    /// Create a directory (and any missing parents).
    pub fn make_dir(&self, path: &str) -> Result<PathBuf> {
        let resolved = self.resolve(path);
        fs::create_dir_all(&resolved)
            .with_context(|| format!("failed to create directory: {}", resolved.display()))?;
        Ok(resolved)
    }

    /// Read a file as UTF-8 text.
    pub fn read_file(&self, path: &str) -> Result<(PathBuf, String)> {
        let resolved = self.resolve(path);
        let content = fs::read_to_string(&resolved)
            .with_context(|| format!("failed to read file: {}", resolved.display()))?;
        Ok((resolved, content))
    }

    /// Write a file, creating parent directories as needed.
    pub fn write_file(&self, path: &str, content: &str) -> Result<PathBuf> {
        let resolved = self.resolve(path);
        if let Some(parent) = resolved.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        fs::write(&resolved, content)
            .with_context(|| format!("failed to write file: {}", resolved.display()))?;
        Ok(resolved)
    }

    /// List a directory, directories first, case-insensitive name order.
    /// Entries whose metadata cannot be read are reported inline rather than
    /// failing the whole listing.
    pub fn list_dir(&self, path: &str) -> Result<DirListing> {
        let resolved = self.resolve(path);
        let reader = fs::read_dir(&resolved)
            .with_context(|| format!("failed to list directory: {}", resolved.display()))?;

        let mut entries = Vec::new();
        for dir_entry in reader {
            let dir_entry = match dir_entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "unreadable directory entry");
                    continue;
                }
            };
            let name = dir_entry.file_name().to_string_lossy().into_owned();
            match dir_entry.metadata() {
                Ok(metadata) => entries.push(DirEntryInfo {
                    name,
                    is_dir: metadata.is_dir(),
                    size: metadata.is_file().then_some(metadata.len()),
                    modified: metadata.modified().ok().map(OffsetDateTime::from),
                    error: None,
                }),
                Err(err) => entries.push(DirEntryInfo {
                    name,
                    is_dir: false,
                    size: None,
                    modified: None,
                    error: Some(err.to_string()),
                }),
            }
        }

        sort_listing(&mut entries);
        Ok(DirListing {
            path: resolved,
            entries,
        })
    }

    /// Render a recursive tree of `path`. Dot-entries and cache directories
    /// are skipped; directories sort before files, case-insensitively.
    pub fn tree(&self, path: &str) -> Result<String> {
        let resolved = self.resolve(path);
        let name = resolved
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| resolved.display().to_string());

        let mut out = String::new();
        out.push_str(&name);
        out.push('\n');
        render_tree_level(&resolved, "", &mut out)?;
        Ok(out)
    }
}

fn sort_listing(entries: &mut [DirEntryInfo]) {
    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

fn render_tree_level(dir: &Path, prefix: &str, out: &mut String) -> Result<()> {
    let reader = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    let mut children: Vec<(String, bool)> = Vec::new();
    for dir_entry in reader.flatten() {
        let name = dir_entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || TREE_SKIP.contains(&name.as_str()) {
            continue;
        }
        let is_dir = dir_entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
        children.push((name, is_dir));
    }
    children.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| a.0.to_lowercase().cmp(&b.0.to_lowercase()))
    });

    let count = children.len();
    for (index, (name, is_dir)) in children.into_iter().enumerate() {
        let last = index + 1 == count;
        let connector = if last { "└── " } else { "├── " };
        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(&name);
        out.push('\n');

        if is_dir {
            let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
            render_tree_level(&dir.join(&name), &child_prefix, out)?;
        }
    }
    Ok(())
}
