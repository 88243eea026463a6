//! Cancellable clone of a remote repository.
//!
//! The clone runs on a blocking thread and checks its `CancellationToken`
//! from libgit2's transfer and sideband callbacks, so cancelling stops the
//! network transfer at the next progress report.
//!
//! The target must not hold a repository or any other content. When a clone
//! fails or is cancelled the target is returned to its prior state: removed
//! if the clone created it, emptied if it was an existing empty directory.

use git2::build::RepoBuilder;
use git2::{ErrorCode, FetchOptions, RemoteCallbacks, Repository};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::models::CloneResponse;

const PROGRESS_LOG_STEP: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetState {
    Missing,
    EmptyDir,
}

/// A clone running in the background.
pub struct CloneHandle {
    token: CancellationToken,
    task: JoinHandle<Result<CloneResponse>>,
}

impl CloneHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn wait(self) -> Result<CloneResponse> {
        self.task
            .await
            .map_err(|e| AppError::Internal(format!("clone task failed: {}", e)))?
    }
}

/// Starts a clone on the blocking pool. Must be called within a Tokio runtime.
pub fn spawn_clone(url: String, target: PathBuf, token: CancellationToken) -> CloneHandle {
    let task_token = token.clone();
    let task = tokio::task::spawn_blocking(move || clone_repository(&url, &target, &task_token));
    CloneHandle { token, task }
}

pub fn clone_repository(
    url: &str,
    target: &Path,
    token: &CancellationToken,
) -> Result<CloneResponse> {
    let state = check_target(target)?;
    if token.is_cancelled() {
        return Err(AppError::Cancelled(format!("clone of {}", url)));
    }

    info!(url, target = %target.display(), "cloning repository");

    let mut callbacks = RemoteCallbacks::new();
    let transfer_token = token.clone();
    let mut next_log = 0;
    callbacks.transfer_progress(move |stats| {
        if transfer_token.is_cancelled() {
            return false;
        }
        let received = stats.received_objects();
        if received >= next_log || received == stats.total_objects() {
            debug!(
                received,
                total = stats.total_objects(),
                indexed = stats.indexed_objects(),
                bytes = stats.received_bytes(),
                "clone progress"
            );
            next_log = received + PROGRESS_LOG_STEP;
        }
        true
    });
    let sideband_token = token.clone();
    callbacks.sideband_progress(move |_| !sideband_token.is_cancelled());

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);

    let result = RepoBuilder::new()
        .fetch_options(fetch_options)
        .clone(url, target);

    match result {
        Ok(_) => {
            let path = fs::canonicalize(target).unwrap_or_else(|_| target.to_path_buf());
            let path = path.to_string_lossy().to_string();
            info!(url, path = %path, "clone finished");
            Ok(CloneResponse {
                url: url.to_string(),
                message: format!("Repository cloned into: {}", path),
                path,
            })
        }
        Err(e) => {
            cleanup(target, state);
            if token.is_cancelled() || e.code() == ErrorCode::User {
                Err(AppError::Cancelled(format!("clone of {}", url)))
            } else {
                Err(AppError::CloneFailed {
                    url: url.to_string(),
                    source: e,
                })
            }
        }
    }
}

fn check_target(target: &Path) -> Result<TargetState> {
    let meta = match fs::metadata(target) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(TargetState::Missing),
        Err(e) => return Err(AppError::from_io(target, e)),
    };

    if !meta.is_dir() || Repository::open(target).is_ok() {
        return Err(AppError::TargetExists(target.display().to_string()));
    }

    let mut entries = fs::read_dir(target).map_err(|e| AppError::from_io(target, e))?;
    if entries.next().is_some() {
        return Err(AppError::TargetExists(target.display().to_string()));
    }

    Ok(TargetState::EmptyDir)
}

fn cleanup(target: &Path, state: TargetState) {
    let result = match state {
        TargetState::Missing if target.exists() => fs::remove_dir_all(target),
        TargetState::Missing => Ok(()),
        TargetState::EmptyDir => empty_dir(target),
    };
    if let Err(e) = result {
        warn!(target = %target.display(), "failed to clean up after clone: {}", e);
    }
}

fn empty_dir(dir: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Directory name `git clone` would pick for `url`.
pub fn repo_name_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':', '\\']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

/// Clone target for `url` inside the workspace `root`.
pub fn target_in(root: &Path, url: &str) -> Result<PathBuf> {
    repo_name_from_url(url)
        .map(|name| root.join(name))
        .ok_or_else(|| {
            AppError::InvalidPath(format!("cannot derive a directory name from {}", url))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_names_from_common_url_shapes() {
        assert_eq!(
            repo_name_from_url("https://github.com/owner/project.git").as_deref(),
            Some("project")
        );
        assert_eq!(
            repo_name_from_url("https://github.com/owner/project/").as_deref(),
            Some("project")
        );
        assert_eq!(
            repo_name_from_url("git@github.com:owner/tool.git").as_deref(),
            Some("tool")
        );
        assert_eq!(repo_name_from_url("host:solo.git").as_deref(), Some("solo"));
        assert_eq!(repo_name_from_url("/").as_deref(), None);
        assert_eq!(repo_name_from_url(".git").as_deref(), None);
    }

    #[test]
    fn target_in_joins_root() {
        let target = target_in(Path::new("/work"), "https://example.com/a/lib.git").unwrap();
        assert_eq!(target, PathBuf::from("/work/lib"));
        assert!(target_in(Path::new("/work"), "").is_err());
    }
}
