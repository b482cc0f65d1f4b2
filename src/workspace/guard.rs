// Workspace path guard
#![allow(dead_code)]

use crate::workspace::error::{Result, WorkspaceError};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Resolves paths against a fixed workspace root and rejects anything
/// that lands outside of it.
#[derive(Debug, Clone)]
pub struct WorkspaceGuard {
    root: PathBuf,
}

impl WorkspaceGuard {
    /// Open the workspace at `root`, creating the directory if it is missing.
    ///
    /// The stored root is canonical, so every resolved path shares its prefix.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        let root = root.canonicalize()?;

        if !root.is_dir() {
            return Err(WorkspaceError::NotADirectory(root));
        }

        debug!(root = %root.display(), "workspace opened");
        Ok(Self { root })
    }

    /// Absolute workspace root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether an absolute path lies at or beneath the root
    pub fn contains(&self, path: &Path) -> bool {
        normalize(path).is_some_and(|p| p.starts_with(&self.root))
    }

    /// Resolve `requested` to an absolute path inside the workspace.
    ///
    /// Relative paths are joined onto the root; absolute paths are accepted
    /// only if they already point inside it. Resolution is lexical first, so
    /// `..` escapes are rejected without looking at the filesystem. The
    /// deepest existing ancestor is then canonicalized to catch symlinks
    /// that lead out of the root.
    pub fn resolve(&self, requested: impl AsRef<Path>) -> Result<PathBuf> {
        let requested = requested.as_ref();
        let out_of_bounds = || WorkspaceError::OutOfBounds(requested.display().to_string());

        let joined = if requested.is_absolute() {
            requested.to_path_buf()
        } else {
            self.root.join(requested)
        };

        let resolved = normalize(&joined).ok_or_else(out_of_bounds)?;
        if !resolved.starts_with(&self.root) {
            warn!(path = %requested.display(), "path escapes workspace");
            return Err(out_of_bounds());
        }

        let mut ancestor = Some(resolved.as_path());
        while let Some(candidate) = ancestor {
            if let Ok(real) = candidate.canonicalize() {
                if !real.starts_with(&self.root) {
                    warn!(
                        path = %requested.display(),
                        target = %real.display(),
                        "symlink escapes workspace"
                    );
                    return Err(out_of_bounds());
                }
                break;
            }
            ancestor = candidate.parent();
        }

        Ok(resolved)
    }

    /// Path of `path` relative to the root, if it is inside it
    pub fn relative<'a>(&self, path: &'a Path) -> Option<&'a Path> {
        path.strip_prefix(&self.root).ok()
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
/// Returns `None` when `..` would climb above the filesystem root.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    Some(out)
}
