//! # Path Resolution
//!
//! Every path string in a config document is interpreted relative to the
//! directory containing *that* document, never the process working
//! directory. Resolution is purely lexical: `..` is folded against the
//! preceding component without touching the file system, so a reference to
//! a missing file still produces a stable, printable resolved path.

use std::path::{Component, Path, PathBuf};

/// Resolve `candidate` against the directory containing `base_file`.
///
/// Absolute candidates are normalised as-is. Relative candidates are joined
/// to the absolute parent directory of `base_file` and then normalised.
pub fn resolve_path(base_file: &Path, candidate: &str) -> PathBuf {
    let candidate = Path::new(candidate);
    if candidate.is_absolute() {
        return normalize(candidate);
    }
    let base_dir = absolute(base_file)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    normalize(&base_dir.join(candidate))
}

/// Lexically normalise a path: drop `.` components and fold `..` into the
/// preceding normal component. `..` directly under the root is discarded.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(e) => {
            tracing::warn!(error = %e, "cannot read working directory; resolving against relative base");
            path.to_path_buf()
        }
    }
}
