//! Workspace scanning.
//!
//! `list_repositories` inspects every immediate subdirectory of the workspace
//! root and summarizes those that are git repositories. It never descends
//! into a repository. Hidden entries are skipped, plain directories are
//! skipped silently, and a subdirectory that cannot be read or summarized is
//! skipped with a warning so one broken repository never hides the rest.
//!
//! `setup` creates the workspace root itself.

use git2::{BranchType, ErrorCode, Repository};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::git::repository::{HeadState, format_commit_time, head_commit, head_state};
use crate::models::{DETACHED_HEAD, RepositorySummary, SetupResponse};

pub fn setup(path: &Path) -> Result<SetupResponse> {
    let shown = path.display().to_string();
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(SetupResponse {
            message: format!("Directory already exists: {}", shown),
            path: shown,
            created: false,
        }),
        Ok(_) => Err(AppError::InvalidPath(format!("{} is not a directory", shown))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::create_dir_all(path).map_err(|e| AppError::from_io(path, e))?;
            info!(path = %shown, "created workspace directory");
            Ok(SetupResponse {
                message: format!("Directory created: {}", shown),
                path: shown,
                created: true,
            })
        }
        Err(e) => Err(AppError::from_io(path, e)),
    }
}

pub fn list_repositories(root: &Path) -> Result<Vec<RepositorySummary>> {
    let meta = fs::metadata(root).map_err(|e| AppError::from_io(root, e))?;
    if !meta.is_dir() {
        return Err(AppError::NotFound(root.display().to_string()));
    }

    let mut repos = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| AppError::from_io(root, e))? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), "skipping unreadable directory entry: {}", e);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        if let Err(e) = fs::read_dir(&path) {
            warn!(path = %path.display(), "skipping unreadable directory: {}", e);
            continue;
        }

        let repo = match Repository::open(&path) {
            Ok(repo) => repo,
            Err(e) if e.code() == ErrorCode::NotFound => {
                debug!(path = %path.display(), "not a git repository");
                continue;
            }
            Err(e) => {
                warn!(path = %path.display(), "skipping repository that failed to open: {}", e);
                continue;
            }
        };

        match summarize(&repo, name, &path) {
            Ok(summary) => repos.push(summary),
            Err(e) => warn!(path = %path.display(), "skipping repository that failed to load: {}", e),
        }
    }

    repos.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(root = %root.display(), count = repos.len(), "workspace scanned");
    Ok(repos)
}

fn summarize(repo: &Repository, name: String, path: &Path) -> Result<RepositorySummary> {
    let (current_branch, is_detached) = match head_state(repo)? {
        HeadState::Branch(branch) | HeadState::Unborn(branch) => (branch, false),
        HeadState::Detached => (DETACHED_HEAD.to_string(), true),
    };

    let mut branch_count = 0;
    for branch in repo.branches(Some(BranchType::Local))? {
        branch?;
        branch_count += 1;
    }

    let last_commit_date = head_commit(repo)?.map(|commit| format_commit_time(&commit));

    let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    Ok(RepositorySummary {
        name,
        path: path.to_string_lossy().to_string(),
        current_branch,
        is_detached,
        branch_count,
        last_commit_date,
    })
}
