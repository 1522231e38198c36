//! Path resolution: canonicalize, classify, and reject nonexistent paths.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NonoError, Result};

/// The resolved form of a path plus its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub resolved: PathBuf,
    pub is_file: bool,
}

/// Resolve `p`, requiring it to exist and name a directory.
pub fn resolve_dir(p: impl AsRef<Path>) -> Result<Resolved> {
    let resolved = canonicalize(p.as_ref())?;
    if resolved.is_dir() {
        tracing::debug!(path = %resolved.display(), "resolved directory capability path");
        Ok(Resolved {
            resolved,
            is_file: false,
        })
    } else {
        Err(NonoError::wrong_kind(
            resolved,
            "file given where directory expected",
        ))
    }
}

/// Resolve `p`, requiring it to exist and name a regular (non-directory) file.
pub fn resolve_file(p: impl AsRef<Path>) -> Result<Resolved> {
    let resolved = canonicalize(p.as_ref())?;
    if resolved.is_dir() {
        Err(NonoError::wrong_kind(
            resolved,
            "directory given where file expected",
        ))
    } else {
        tracing::debug!(path = %resolved.display(), "resolved file capability path");
        Ok(Resolved {
            resolved,
            is_file: true,
        })
    }
}

/// Resolve `p`, auto-classifying it as file or directory.
pub fn resolve_any(p: impl AsRef<Path>) -> Result<Resolved> {
    let resolved = canonicalize(p.as_ref())?;
    let is_file = !resolved.is_dir();
    Ok(Resolved { resolved, is_file })
}

fn canonicalize(p: &Path) -> Result<PathBuf> {
    fs::canonicalize(p).map_err(|_| NonoError::not_found(p))
}

/// Best-effort canonicalization used by the query engine: missing paths are
/// not an error, they are returned in lexically-normalized absolute form.
pub fn canonicalize_best_effort(p: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(p) {
        return resolved;
    }

    let absolute = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(p)
    };
    normalize_lexically(&absolute)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut stack: Vec<&std::ffi::OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                stack.pop();
            }
            Component::Normal(c) => stack.push(c),
            Component::RootDir | Component::Prefix(_) => stack.clear(),
        }
    }

    let mut result = PathBuf::from("/");
    for c in stack {
        result.push(c);
    }
    result
}
