//! Repository discovery for banner metadata.

use std::path::{Path, PathBuf};

/// Repository facts shown at startup when the workspace is inside a git
/// checkout.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    pub branch: Option<String>,
    pub root: PathBuf,
}

/// Best-effort repository discovery starting from `path`. Returns `None`
/// outside a repository or when discovery fails for any reason.
pub fn discover(path: &Path) -> Option<RepoInfo> {
    let repo = gix::discover(path).ok()?;

    let branch = repo.head_name().ok().flatten().map(|name| {
        let full = name.to_string();
        full.strip_prefix("refs/heads/")
            .map(str::to_owned)
            .unwrap_or(full)
    });

    let root = repo
        .work_dir()
        .map(Path::to_path_buf)
        .or_else(|| repo.path().parent().map(Path::to_path_buf))?;

    Some(RepoInfo { branch, root })
}
