//! Per-commit change DTOs.
//!
//! - `FileChange`: one changed path with line counts and a bounded snippet
//! - `ChangeStatus`: Added / Modified / Deleted / Renamed
//! - `CommitStats`: totals aggregated from the file changes

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    pub file_path: String,
    pub status: ChangeStatus,
    pub lines_added: usize,
    pub lines_removed: usize,
    pub diff_snippet: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommitStats {
    pub files_changed: usize,
    pub lines_added: usize,
    pub lines_removed: usize,
    pub total_changes: usize,
}

impl CommitStats {
    pub fn from_changes(changes: &[FileChange]) -> Self {
        let lines_added = changes.iter().map(|c| c.lines_added).sum();
        let lines_removed = changes.iter().map(|c| c.lines_removed).sum();
        Self {
            files_changed: changes.len(),
            lines_added,
            lines_removed,
            total_changes: lines_added + lines_removed,
        }
    }

    pub fn is_consistent(&self, changes: &[FileChange]) -> bool {
        self.total_changes == self.lines_added + self.lines_removed
            && self.files_changed == changes.len()
    }
}
