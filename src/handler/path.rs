//! Maps a request target onto the filesystem below the document root.

use std::path::{Component, Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("{} resolves outside the document root", .0.display())]
    OutsideRoot(PathBuf),
    #[error("failed to resolve path: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolves `uri` against `root` and returns the canonical path.
///
/// Symlinks, `.` and `..` are resolved. When the target does not exist, the
/// longest existing ancestor is canonicalized and the missing tail appended,
/// so that it can still be reported as missing rather than malformed.
///
/// The result must equal the canonical root or lie below it, compared
/// component by component: with root `/srv/www`, `/srv/www2/x` is rejected.
pub async fn resolve_path(root: &Path, uri: &str) -> Result<PathBuf, ResolveError> {
    let root = tokio::fs::canonicalize(root).await?;

    let mut joined = root.clone().into_os_string();
    joined.push("/");
    joined.push(uri);
    let joined = PathBuf::from(joined);

    let resolved = match tokio::fs::canonicalize(&joined).await {
        Ok(path) => path,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => canonicalize_missing(&joined).await?,
        Err(e) => return Err(e.into()),
    };

    if !resolved.starts_with(&root) {
        return Err(ResolveError::OutsideRoot(resolved));
    }

    Ok(resolved)
}

/// Canonicalizes a path whose final components do not exist yet.
///
/// `.` and `..` are folded first, then the deepest ancestor that exists is
/// resolved on disk. The missing tail holds plain names only, so symlinks in
/// the existing part cannot be skipped over.
async fn canonicalize_missing(path: &Path) -> std::io::Result<PathBuf> {
    let folded = normalize(path);
    let mut existing = folded.as_path();
    let mut tail = Vec::new();

    loop {
        match tokio::fs::canonicalize(existing).await {
            Ok(mut resolved) => {
                for name in tail.iter().rev() {
                    resolved.push(name);
                }
                return Ok(resolved);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let (Some(name), Some(parent)) = (existing.file_name(), existing.parent()) else {
                    return Err(e);
                };
                tail.push(name.to_os_string());
                existing = parent;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Folds `.` and `..` without touching the filesystem. `..` at the
/// filesystem root stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
