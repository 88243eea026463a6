//! Asynchronous operation contract for the presentation layer.
//!
//! Every operation takes the workspace root explicitly; the engine keeps no
//! knowledge of which root the caller has configured. Reads open the
//! repository afresh on each call and run on Tokio's blocking pool, so
//! queries against different (or the same) repositories proceed
//! concurrently. Clones run as independently cancellable tasks.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};
use crate::git::clone::{spawn_clone, target_in};
use crate::git::{CloneHandle, DiffCache, DiffSettings, GitRepository, locator};
use crate::models::{
    BranchInfo, CloneResponse, CommitDetails, CommitPage, RepositorySummary, SetupResponse,
};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub diff: DiffSettings,
    /// Page size used when the caller does not pass a limit
    pub default_page_size: usize,
    /// Entries kept in the commit diff cache; 0 disables it
    pub diff_cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            diff: DiffSettings::default(),
            default_page_size: 50,
            diff_cache_capacity: 256,
        }
    }
}

#[derive(Clone)]
pub struct GitEngine {
    config: Arc<EngineConfig>,
    diff_cache: Option<Arc<DiffCache>>,
}

impl Default for GitEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl GitEngine {
    pub fn new(config: EngineConfig) -> Self {
        let diff_cache = (config.diff_cache_capacity > 0)
            .then(|| Arc::new(DiffCache::new(config.diff_cache_capacity)));
        Self {
            config: Arc::new(config),
            diff_cache,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn diff_cache(&self) -> Option<&DiffCache> {
        self.diff_cache.as_deref()
    }

    pub async fn setup(&self, root: impl Into<PathBuf>) -> Result<SetupResponse> {
        let root = root.into();
        blocking(move || locator::setup(&root)).await
    }

    pub async fn list_repositories(
        &self,
        root: impl Into<PathBuf>,
    ) -> Result<Vec<RepositorySummary>> {
        let root = root.into();
        blocking(move || locator::list_repositories(&root)).await
    }

    /// Starts a clone into `target` and returns immediately.
    pub fn start_clone(&self, url: impl Into<String>, target: impl Into<PathBuf>) -> CloneHandle {
        spawn_clone(url.into(), target.into(), CancellationToken::new())
    }

    /// Clones and waits for completion. Dropping the returned future cancels
    /// the transfer and cleans up the target.
    pub async fn git_clone(
        &self,
        url: impl Into<String>,
        target: impl Into<PathBuf>,
    ) -> Result<CloneResponse> {
        let handle = self.start_clone(url, target);
        let guard = handle.cancel_token().drop_guard();
        let result = handle.wait().await;
        guard.disarm();
        result
    }

    /// Clones into `<root>/<name derived from url>`.
    pub async fn git_clone_into_root(
        &self,
        url: impl Into<String>,
        root: &Path,
    ) -> Result<CloneResponse> {
        let url = url.into();
        let target = target_in(root, &url)?;
        self.git_clone(url, target).await
    }

    pub async fn get_repository_commits(
        &self,
        root: impl Into<PathBuf>,
        name: impl Into<String>,
        branch: Option<String>,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<CommitPage> {
        let root = root.into();
        let name = name.into();
        let limit = limit.unwrap_or(self.config.default_page_size);
        blocking(move || {
            let repo = GitRepository::open_in(&root, &name)?;
            repo.get_commits(branch.as_deref(), limit, offset)
        })
        .await
    }

    pub async fn get_repository_branches(
        &self,
        root: impl Into<PathBuf>,
        name: impl Into<String>,
    ) -> Result<Vec<BranchInfo>> {
        let root = root.into();
        let name = name.into();
        blocking(move || GitRepository::open_in(&root, &name)?.list_branches()).await
    }

    pub async fn get_commit_details(
        &self,
        root: impl Into<PathBuf>,
        name: impl Into<String>,
        hash: impl Into<String>,
    ) -> Result<CommitDetails> {
        let root = root.into();
        let name = name.into();
        let hash = hash.into();
        let settings = self.config.diff;
        let cache = self.diff_cache.clone();
        blocking(move || {
            let repo = GitRepository::open_in(&root, &name)?;
            repo.get_commit_details(&hash, &settings, cache.as_deref())
        })
        .await
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {}", e)))?
}
