//! Per-file changes of one commit against its first parent.
//!
//! Merge commits are compared with their first parent only; root commits
//! with the empty tree. Renames are detected with libgit2's similarity
//! heuristic (`rename_threshold` percent); if detection fails the diff is
//! used as-is and renamed files show up as Deleted + Added.
//!
//! Each `FileChange` carries a snippet made of hunk headers and prefixed
//! lines, capped by line count and byte size.

use git2::{Delta, DiffFindOptions, DiffOptions, Patch, Repository};
use tracing::warn;

use crate::error::Result;
use crate::models::{ChangeStatus, FileChange};

pub const BINARY_SNIPPET: &str = "Binary file differs";
pub const TRUNCATION_MARKER: &str = "... (truncated)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffSettings {
    pub snippet_max_lines: usize,
    pub snippet_max_bytes: usize,
    /// Similarity percentage (0-100) above which a delete/add pair is a rename
    pub rename_threshold: u16,
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self {
            snippet_max_lines: 80,
            snippet_max_bytes: 4096,
            rename_threshold: 50,
        }
    }
}

pub fn first_parent_changes(
    repo: &Repository,
    commit: &git2::Commit,
    settings: &DiffSettings,
) -> Result<Vec<FileChange>> {
    let tree = commit.tree()?;

    let parent_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0)?.tree()?)
    } else {
        None
    };

    let mut opts = DiffOptions::new();
    opts.context_lines(3);

    let mut diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;

    let mut find_opts = DiffFindOptions::new();
    find_opts
        .renames(true)
        .rename_threshold(settings.rename_threshold);
    if let Err(e) = diff.find_similar(Some(&mut find_opts)) {
        warn!(commit = %commit.id(), "rename detection failed, keeping plain deltas: {}", e);
    }

    let mut changes = Vec::with_capacity(diff.deltas().len());

    for (delta_idx, delta) in diff.deltas().enumerate() {
        let status = match delta.status() {
            Delta::Added | Delta::Copied => ChangeStatus::Added,
            Delta::Deleted => ChangeStatus::Deleted,
            Delta::Renamed => ChangeStatus::Renamed,
            _ => ChangeStatus::Modified,
        };

        let file = if status == ChangeStatus::Deleted {
            delta.old_file()
        } else {
            delta.new_file()
        };
        let file_path = file
            .path()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        let patch = Patch::from_diff(&diff, delta_idx)?;
        let (lines_added, lines_removed, diff_snippet) = match patch {
            Some(patch) if !patch.delta().flags().is_binary() => {
                let (_, added, removed) = patch.line_stats()?;
                (added, removed, build_snippet(&patch, settings)?)
            }
            Some(_) => (0, 0, BINARY_SNIPPET.to_string()),
            None if delta.flags().is_binary() => (0, 0, BINARY_SNIPPET.to_string()),
            None => (0, 0, String::new()),
        };

        changes.push(FileChange {
            file_path,
            status,
            lines_added,
            lines_removed,
            diff_snippet,
        });
    }

    Ok(changes)
}

pub fn build_snippet(patch: &Patch, settings: &DiffSettings) -> Result<String> {
    let mut snippet = SnippetBuilder::new(settings.snippet_max_lines, settings.snippet_max_bytes);

    'hunks: for hunk_idx in 0..patch.num_hunks() {
        let (hunk, _) = patch.hunk(hunk_idx)?;
        if !snippet.push(String::from_utf8_lossy(hunk.header()).trim_end()) {
            break;
        }

        for line_idx in 0..patch.num_lines_in_hunk(hunk_idx)? {
            let line = patch.line_in_hunk(hunk_idx, line_idx)?;
            let origin = line.origin();
            if !matches!(origin, '+' | '-' | ' ') {
                continue;
            }
            let content = String::from_utf8_lossy(line.content());
            let text = format!("{}{}", origin, content.trim_end_matches(['\n', '\r']));
            if !snippet.push(&text) {
                break 'hunks;
            }
        }
    }

    Ok(snippet.finish())
}

/// Accumulates snippet lines until either cap would be exceeded.
pub struct SnippetBuilder {
    out: String,
    lines: usize,
    max_lines: usize,
    max_bytes: usize,
    truncated: bool,
}

impl SnippetBuilder {
    pub fn new(max_lines: usize, max_bytes: usize) -> Self {
        Self {
            out: String::new(),
            lines: 0,
            max_lines,
            max_bytes,
            truncated: false,
        }
    }

    /// Appends one line. Returns false once the snippet is full.
    pub fn push(&mut self, line: &str) -> bool {
        if self.truncated
            || self.lines >= self.max_lines
            || self.out.len() + line.len() + 1 > self.max_bytes
        {
            self.truncated = true;
            return false;
        }
        self.out.push_str(line);
        self.out.push('\n');
        self.lines += 1;
        true
    }

    pub fn finish(mut self) -> String {
        if self.truncated {
            self.out.push_str(TRUNCATION_MARKER);
        } else if self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_under_caps_is_untouched() {
        let mut builder = SnippetBuilder::new(10, 1024);
        assert!(builder.push("@@ -1 +1 @@"));
        assert!(builder.push("-old"));
        assert!(builder.push("+new"));
        assert_eq!(builder.finish(), "@@ -1 +1 @@\n-old\n+new");
    }

    #[test]
    fn snippet_stops_at_line_cap() {
        let mut builder = SnippetBuilder::new(2, 1024);
        assert!(builder.push("a"));
        assert!(builder.push("b"));
        assert!(!builder.push("c"));
        assert!(!builder.push("d"));
        assert_eq!(builder.finish(), format!("a\nb\n{}", TRUNCATION_MARKER));
    }

    #[test]
    fn snippet_stops_at_byte_cap_on_line_boundary() {
        let mut builder = SnippetBuilder::new(100, 10);
        assert!(builder.push("12345"));
        assert!(!builder.push("67890"));
        let snippet = builder.finish();
        assert_eq!(snippet, format!("12345\n{}", TRUNCATION_MARKER));
        assert!(snippet.len() <= 10 + TRUNCATION_MARKER.len());
    }

    #[test]
    fn empty_snippet_is_empty() {
        assert_eq!(SnippetBuilder::new(5, 5).finish(), "");
    }
}
