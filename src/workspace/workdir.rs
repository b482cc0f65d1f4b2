// Scoped ownership of the process working directory
#![allow(dead_code)]

use crate::workspace::WorkspaceGuard;
use crate::workspace::error::{Result, WorkspaceError};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error};

/// The working directory is process-wide; one holder at a time.
static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Holds the process working directory for the duration of one execution.
///
/// The directory recorded on entry is restored when the guard is dropped,
/// whether the holder returns normally, fails, or is cancelled.
pub struct WorkdirGuard {
    prior: PathBuf,
    changed: bool,
    _lock: MutexGuard<'static, ()>,
}

impl WorkdirGuard {
    /// Move into the workspace root unless the process already sits inside it
    pub async fn enter(workspace: &WorkspaceGuard) -> Result<Self> {
        let lock = CWD_LOCK.lock().await;
        let prior = std::env::current_dir()?;

        if workspace.contains(&prior) {
            debug!(cwd = %prior.display(), "already inside workspace");
            return Ok(Self {
                prior,
                changed: false,
                _lock: lock,
            });
        }

        Self::change(lock, prior, workspace.root())
    }

    /// Move into `dir`, which must already be resolved by a [`WorkspaceGuard`]
    pub async fn enter_dir(dir: &Path) -> Result<Self> {
        let lock = CWD_LOCK.lock().await;
        let prior = std::env::current_dir()?;
        Self::change(lock, prior, dir)
    }

    fn change(lock: MutexGuard<'static, ()>, prior: PathBuf, target: &Path) -> Result<Self> {
        std::env::set_current_dir(target)
            .map_err(|e| WorkspaceError::ChangeDir(target.to_path_buf(), e))?;

        debug!(from = %prior.display(), to = %target.display(), "changed working directory");
        Ok(Self {
            prior,
            changed: true,
            _lock: lock,
        })
    }

    /// Directory that will be restored on drop
    pub fn prior(&self) -> &Path {
        &self.prior
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        if !self.changed {
            return;
        }
        match std::env::set_current_dir(&self.prior) {
            Ok(()) => debug!(cwd = %self.prior.display(), "restored working directory"),
            Err(e) => error!(
                cwd = %self.prior.display(),
                error = %e,
                "failed to restore working directory"
            ),
        }
    }
}
