//! Relative path canonicalization
//!
//! Every tree reports paths relative to its root, with `/` as the separator
//! regardless of platform, so the three hash maps of a merge share one key space.

use crate::error::TreeError;
use std::path::{Component, Path, PathBuf};

/// Canonical separator for relative paths
pub const SEPARATOR: char = '/';

/// Express `path` relative to `root` in canonical form.
pub fn relative_path(root: &Path, path: &Path) -> Result<String, TreeError> {
    let rel = path.strip_prefix(root).map_err(|_| {
        TreeError::InvalidPath(format!(
            "{} is not under {}",
            path.display(),
            root.display()
        ))
    })?;

    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(name) => {
                let name = name.to_str().ok_or_else(|| {
                    TreeError::InvalidPath(format!("non UTF-8 path: {}", path.display()))
                })?;
                parts.push(name);
            }
            Component::CurDir => {}
            _ => {
                return Err(TreeError::InvalidPath(format!(
                    "unexpected component in {}",
                    path.display()
                )))
            }
        }
    }

    Ok(parts.join("/"))
}

/// Normalize a relative path string: unify separators, drop `.` segments and
/// leading/trailing slashes.
pub fn normalize_path_string(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Reject paths that would escape the tree root once joined.
pub fn validate_relative(path: &str) -> Result<(), TreeError> {
    if path.is_empty() {
        return Err(TreeError::InvalidPath("empty path".to_string()));
    }
    if path.starts_with(SEPARATOR) || Path::new(path).is_absolute() {
        return Err(TreeError::InvalidPath(format!("absolute path: {}", path)));
    }
    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(TreeError::InvalidPath(format!(
            "path escapes root: {}",
            path
        )));
    }
    Ok(())
}

/// Join a canonical relative path onto a filesystem root.
pub fn join_relative(root: &Path, rel: &str) -> PathBuf {
    let mut out = root.to_path_buf();
    for segment in rel.split(SEPARATOR).filter(|s| !s.is_empty()) {
        out.push(segment);
    }
    out
}

/// Resolve a directory to an absolute path so its parent is always known.
///
/// Falls back to joining onto the current directory when the path does not
/// exist yet (a baseline that has never been written, for instance).
pub fn absolute_dir(path: &Path) -> std::io::Result<PathBuf> {
    match dunce::canonicalize(path) {
        Ok(p) => Ok(p),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if path.is_absolute() {
                Ok(path.to_path_buf())
            } else {
                Ok(std::env::current_dir()?.join(path))
            }
        }
        Err(e) => Err(e),
    }
}
