//! Repository and branch DTOs.
//!
//! - `RepositorySummary`: one discovered repository under the workspace root
//! - `BranchInfo`: local or remote-tracking branch, current branch flagged
//! - `SetupResponse` / `CloneResponse`: confirmation messages

use serde::{Deserialize, Serialize};

/// Marker used as `current_branch` when HEAD points directly at a commit.
pub const DETACHED_HEAD: &str = "HEAD (detached)";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary {
    /// Directory basename, unique within one scan
    pub name: String,
    /// Absolute path of the working directory (or bare repository)
    pub path: String,
    /// Branch HEAD points at, or `DETACHED_HEAD`
    pub current_branch: String,
    pub is_detached: bool,
    /// Number of local branches
    pub branch_count: usize,
    /// ISO-8601 timestamp of the HEAD commit; `None` for a repository without commits
    pub last_commit_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BranchInfo {
    /// Short name: `main` for local branches, `origin/main` for remote ones
    pub name: String,
    pub is_current: bool,
    pub is_remote: bool,
    pub last_commit_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetupResponse {
    pub path: String,
    pub created: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CloneResponse {
    pub url: String,
    pub path: String,
    pub message: String,
}
