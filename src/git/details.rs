//! Full commit records.
//!
//! Resolution accepts a full 40-character hash or an abbreviation of at least
//! `MIN_PREFIX_LEN` hex characters. A full hash is looked up directly and can
//! never be ambiguous. An abbreviation that libgit2 reports as ambiguous is
//! re-checked against the commits reachable from any reference, so a prefix
//! shared with a blob or tree still resolves when only one commit matches,
//! and is not found when no commit matches.
//!
//! The record is all-or-nothing: any failure while diffing, reading
//! references or testing branch membership fails the whole request.

use git2::{Commit, ErrorCode, Oid, Repository};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::git::branches::collect_branches;
use crate::git::cache::DiffCache;
use crate::git::diff::{DiffSettings, first_parent_changes};
use crate::git::repository::{CommitRecord, GitRepository};
use crate::models::{CommitDetails, CommitStats, RefType, Reference};

pub const MIN_PREFIX_LEN: usize = 4;
const FULL_HASH_LEN: usize = 40;

pub fn resolve_commit<'r>(repo: &'r Repository, id: &str) -> Result<Commit<'r>> {
    let id = id.trim().to_ascii_lowercase();
    if id.len() < MIN_PREFIX_LEN
        || id.len() > FULL_HASH_LEN
        || !id.chars().all(|c| c.is_ascii_hexdigit())
    {
        return Err(AppError::CommitNotFound(id));
    }

    if id.len() == FULL_HASH_LEN {
        let oid = Oid::from_str(&id).map_err(|_| AppError::CommitNotFound(id.clone()))?;
        return repo
            .find_commit(oid)
            .map_err(|_| AppError::CommitNotFound(id));
    }

    match repo.find_commit_by_prefix(&id) {
        Ok(commit) => Ok(commit),
        Err(e) if e.code() == ErrorCode::Ambiguous => disambiguate(repo, &id),
        Err(e) => {
            debug!(prefix = %id, "commit lookup failed: {}", e);
            Err(AppError::CommitNotFound(id))
        }
    }
}

fn disambiguate<'r>(repo: &'r Repository, prefix: &str) -> Result<Commit<'r>> {
    let mut walk = repo.revwalk()?;
    for reference in repo.references()? {
        // Refs to trees or blobs cannot lead to a commit.
        if let Ok(commit) = reference?.peel_to_commit() {
            walk.push(commit.id())?;
        }
    }
    match walk.push_head() {
        Ok(()) => {}
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let mut candidates = Vec::new();
    for oid in walk {
        let oid = oid?;
        if oid.to_string().starts_with(prefix) {
            candidates.push(oid);
        }
    }

    match candidates.as_slice() {
        [] => Err(AppError::CommitNotFound(prefix.to_string())),
        [only] => Ok(repo.find_commit(*only)?),
        _ => Err(AppError::AmbiguousHash {
            prefix: prefix.to_string(),
            candidates: candidates.iter().map(Oid::to_string).collect(),
        }),
    }
}

/// Tags (and other non-branch refs) whose target peels exactly to `oid`.
pub fn references_on(repo: &Repository, oid: Oid) -> Result<Vec<Reference>> {
    let mut tags = Vec::new();
    let mut others = Vec::new();

    for reference in repo.references()? {
        let reference = reference?;
        if reference.is_branch() || reference.is_remote() {
            continue;
        }
        let Some(name) = reference.name().map(str::to_string) else {
            continue;
        };
        // Tags may point at trees or blobs; those never match a commit.
        let Ok(target) = reference.peel_to_commit() else {
            continue;
        };
        if target.id() != oid {
            continue;
        }

        if reference.is_tag() {
            let short = reference.shorthand().unwrap_or(name.as_str()).to_string();
            tags.push(short);
        } else {
            others.push(name.trim_start_matches("refs/").to_string());
        }
    }

    tags.sort();
    others.sort();

    Ok(tags
        .into_iter()
        .map(|value| Reference {
            ref_type: RefType::Tag,
            value,
        })
        .chain(others.into_iter().map(|value| Reference {
            ref_type: RefType::Other,
            value,
        }))
        .collect())
}

/// Names of the branches whose history contains `oid`, in branch listing order.
pub fn branches_containing(repo: &Repository, oid: Oid) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for branch in collect_branches(repo)? {
        let Some(tip) = branch.tip else {
            continue;
        };
        if tip == oid || repo.graph_descendant_of(tip, oid)? {
            names.push(branch.name);
        }
    }
    Ok(names)
}

impl GitRepository {
    pub fn get_commit_details(
        &self,
        id: &str,
        settings: &DiffSettings,
        cache: Option<&DiffCache>,
    ) -> Result<CommitDetails> {
        let commit = resolve_commit(&self.repo, id)?;
        let record = CommitRecord::from_commit(&commit);

        let file_changes = match cache.and_then(|c| c.get(&self.path, commit.id())) {
            Some(changes) => changes,
            None => {
                let changes = first_parent_changes(&self.repo, &commit, settings)?;
                if let Some(cache) = cache {
                    cache.insert(&self.path, commit.id(), changes.clone());
                }
                changes
            }
        };

        let stats = CommitStats::from_changes(&file_changes);
        if !stats.is_consistent(&file_changes) {
            return Err(AppError::Internal(format!(
                "inconsistent stats for commit {}",
                record.hash_full()
            )));
        }

        let references = references_on(&self.repo, commit.id())?;
        let branches_on_commit = branches_containing(&self.repo, commit.id())?;

        Ok(CommitDetails {
            hash_short: record.hash_short(),
            hash_full: record.hash_full(),
            repository_name: self.name.clone(),
            repository_path: self.display_path(),
            committer_date: record.committer_date(),
            author_name: record.author_name,
            author_email: record.author_email,
            committer_name: record.committer_name,
            committer_email: record.committer_email,
            message_title: record.message_title,
            message_body: record.message_body,
            references,
            branches_on_commit,
            stats,
            file_changes,
        })
    }
}
