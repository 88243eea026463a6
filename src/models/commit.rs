use serde::{Deserialize, Serialize};

use super::{CommitStats, FileChange};

/// Lightweight projection used by commit listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    pub hash_full: String,
    pub hash_short: String,
    pub author_name: String,
    pub author_email: String,
    pub committer_date: String,
    pub relative_time: String,
    pub message_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitPage {
    pub commits: Vec<CommitSummary>,
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum RefType {
    Tag,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reference {
    #[serde(rename = "type")]
    pub ref_type: RefType,
    pub value: String,
}

/// Full record for one commit, as returned by `get_commit_details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitDetails {
    pub hash_short: String,
    pub hash_full: String,
    pub repository_name: String,
    pub repository_path: String,
    pub author_name: String,
    pub author_email: String,
    pub committer_name: String,
    pub committer_email: String,
    pub committer_date: String,
    pub message_title: String,
    pub message_body: String,
    pub references: Vec<Reference>,
    pub branches_on_commit: Vec<String>,
    pub stats: CommitStats,
    pub file_changes: Vec<FileChange>,
}
