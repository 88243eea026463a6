//! Paged commit history.
//!
//! Pages are cut from a fresh walk on every request: the walk skips `offset`
//! commits by id and loads only `limit + 1`, the extra one deciding `has_more`.

use git2::{BranchType, Oid, Repository, Revwalk, Sort};

use crate::error::{AppError, Result};
use crate::git::repository::{CommitRecord, GitRepository, head_commit};
use crate::models::CommitPage;

/// Upper bound for a single page, whatever the caller asks for.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Lazy, newest-first walk over the commits reachable from one starting point.
///
/// Commits are loaded only as the iterator is advanced. A walk is restarted
/// by building a new log and skipping to the desired offset.
pub struct CommitLog<'repo> {
    repo: &'repo Repository,
    walk: Option<Revwalk<'repo>>,
}

impl<'repo> CommitLog<'repo> {
    /// Starts at the tip of `branch`, or at HEAD when no branch is given.
    ///
    /// A repository without commits yields an empty log.
    pub fn new(repo: &'repo Repository, branch: Option<&str>) -> Result<Self> {
        let start = match branch {
            Some(name) => Some(resolve_branch(repo, name)?),
            None => head_commit(repo)?.map(|commit| commit.id()),
        };

        let Some(start) = start else {
            return Ok(Self { repo, walk: None });
        };

        let mut walk = repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        walk.push(start)?;

        Ok(Self {
            repo,
            walk: Some(walk),
        })
    }

    fn next_oid(&mut self) -> Option<Result<Oid>> {
        let walk = self.walk.as_mut()?;
        walk.next().map(|oid| oid.map_err(AppError::from))
    }

    /// Skips `n` commits without loading them. Returns how many were skipped.
    pub fn advance(&mut self, n: usize) -> Result<usize> {
        for skipped in 0..n {
            match self.next_oid() {
                Some(oid) => {
                    oid?;
                }
                None => return Ok(skipped),
            }
        }
        Ok(n)
    }
}

impl Iterator for CommitLog<'_> {
    type Item = Result<CommitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = match self.next_oid()? {
            Ok(oid) => oid,
            Err(e) => return Some(Err(e)),
        };
        Some(
            self.repo
                .find_commit(oid)
                .map(|commit| CommitRecord::from_commit(&commit))
                .map_err(AppError::from),
        )
    }
}

/// Resolves a local branch name, falling back to remote-tracking branches.
pub fn resolve_branch(repo: &Repository, name: &str) -> Result<Oid> {
    let branch = repo
        .find_branch(name, BranchType::Local)
        .or_else(|_| repo.find_branch(name, BranchType::Remote))
        .map_err(|_| AppError::RefNotFound(name.to_string()))?;

    let commit = branch.get().peel_to_commit()?;
    Ok(commit.id())
}

impl GitRepository {
    pub fn get_commits(
        &self,
        branch: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<CommitPage> {
        let limit = limit.min(MAX_PAGE_SIZE);
        let mut log = CommitLog::new(&self.repo, branch)?;
        log.advance(offset)?;

        let mut commits = Vec::with_capacity(limit);
        for record in log.by_ref().take(limit) {
            commits.push(record?.summary());
        }

        let has_more = log.next_oid().transpose()?.is_some();

        Ok(CommitPage {
            commits,
            offset,
            limit,
            has_more,
        })
    }
}
