//! Branch enumeration, shared by the branch listing and commit membership.

use git2::{BranchType, Oid, ReferenceType, Repository};

use crate::error::Result;
use crate::git::repository::{GitRepository, format_commit_time};
use crate::models::BranchInfo;

/// A branch ref with its resolved tip.
#[derive(Debug, Clone)]
pub struct BranchRef {
    pub name: String,
    pub is_remote: bool,
    pub is_head: bool,
    /// `None` when the ref does not peel to a commit
    pub tip: Option<Oid>,
}

/// Local branches sorted by name, followed by remote-tracking branches.
///
/// Symbolic remote refs such as `origin/HEAD` are aliases, not branches,
/// and are left out.
pub fn collect_branches(repo: &Repository) -> Result<Vec<BranchRef>> {
    let mut local = Vec::new();
    let mut remote = Vec::new();

    for item in repo.branches(None)? {
        let (branch, branch_type) = item?;
        if branch.get().kind() == Some(ReferenceType::Symbolic) {
            continue;
        }
        let Some(name) = branch.name()?.map(str::to_string) else {
            continue;
        };

        let tip = branch.get().peel_to_commit().ok().map(|c| c.id());
        if branch_type == BranchType::Remote {
            remote.push(BranchRef {
                name,
                is_remote: true,
                is_head: false,
                tip,
            });
        } else {
            local.push(BranchRef {
                name,
                is_remote: false,
                is_head: branch.is_head(),
                tip,
            });
        }
    }

    local.sort_by(|a, b| a.name.cmp(&b.name));
    remote.sort_by(|a, b| a.name.cmp(&b.name));
    local.extend(remote);
    Ok(local)
}

impl GitRepository {
    pub fn list_branches(&self) -> Result<Vec<BranchInfo>> {
        collect_branches(&self.repo)?
            .into_iter()
            .map(|branch| {
                let last_commit_date = match branch.tip {
                    Some(oid) => Some(format_commit_time(&self.repo.find_commit(oid)?)),
                    None => None,
                };
                Ok(BranchInfo {
                    name: branch.name,
                    is_current: branch.is_head,
                    is_remote: branch.is_remote,
                    last_commit_date,
                })
            })
            .collect()
    }
}
