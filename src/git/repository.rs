use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::{ErrorCode, Oid, Repository};
use std::path::{Component, Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::CommitSummary;

/// Length of `hash_short` in every response.
pub const SHORT_HASH_LEN: usize = 7;

/// One repository opened for the duration of a single query.
pub struct GitRepository {
    pub repo: Repository,
    pub name: String,
    pub path: PathBuf,
}

/// Where HEAD points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    Branch(String),
    /// Symbolic HEAD to a branch that has no commits yet
    Unborn(String),
    Detached,
}

impl GitRepository {
    /// Opens `path` as a repository without searching parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::open(path)
            .map_err(|_| AppError::RepoNotFound(path.display().to_string()))?;

        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(Self { repo, name, path })
    }

    /// Opens the repository called `name` directly under the workspace `root`.
    pub fn open_in(root: &Path, name: &str) -> Result<Self> {
        validate_repo_name(name)?;
        let path = root.join(name);
        if !path.is_dir() {
            return Err(AppError::RepoNotFound(path.display().to_string()));
        }
        let mut repo = Self::open(&path)?;
        repo.name = name.to_string();
        Ok(repo)
    }

    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    pub fn head_state(&self) -> Result<HeadState> {
        head_state(&self.repo)
    }
}

/// Repository names are a single normal path component.
pub fn validate_repo_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(AppError::InvalidPath(name.to_string())),
    }
}

pub fn head_state(repo: &Repository) -> Result<HeadState> {
    match repo.head() {
        Ok(head) if head.is_branch() => Ok(HeadState::Branch(
            head.shorthand().unwrap_or_default().to_string(),
        )),
        Ok(_) => Ok(HeadState::Detached),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            let head = repo.find_reference("HEAD")?;
            let target = head.symbolic_target().unwrap_or_default();
            Ok(HeadState::Unborn(
                target.trim_start_matches("refs/heads/").to_string(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// The commit HEAD resolves to, or `None` for a repository without commits.
pub fn head_commit(repo: &Repository) -> Result<Option<git2::Commit<'_>>> {
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_commit()?)),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Canonical commit entity; listings and detail records are projections of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub oid: Oid,
    pub author_name: String,
    pub author_email: String,
    pub committer_name: String,
    pub committer_email: String,
    pub timestamp: i64,
    pub offset_minutes: i32,
    pub message_title: String,
    pub message_body: String,
}

impl CommitRecord {
    pub fn from_commit(commit: &git2::Commit) -> Self {
        let author = commit.author();
        let committer = commit.committer();
        let (message_title, message_body) = split_message(&String::from_utf8_lossy(
            commit.message_bytes(),
        ));
        let time = commit.time();

        Self {
            oid: commit.id(),
            author_name: author.name().unwrap_or("Unknown").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            committer_name: committer.name().unwrap_or("Unknown").to_string(),
            committer_email: committer.email().unwrap_or("").to_string(),
            timestamp: time.seconds(),
            offset_minutes: time.offset_minutes(),
            message_title,
            message_body,
        }
    }

    pub fn hash_full(&self) -> String {
        self.oid.to_string()
    }

    pub fn hash_short(&self) -> String {
        short_hash(&self.hash_full())
    }

    pub fn committer_date(&self) -> String {
        format_iso8601(self.timestamp, self.offset_minutes)
    }

    pub fn summary(&self) -> CommitSummary {
        CommitSummary {
            hash_full: self.hash_full(),
            hash_short: self.hash_short(),
            author_name: self.author_name.clone(),
            author_email: self.author_email.clone(),
            committer_date: self.committer_date(),
            relative_time: format_relative_time(self.timestamp),
            message_title: self.message_title.clone(),
        }
    }
}

pub fn short_hash(hash: &str) -> String {
    hash.chars().take(SHORT_HASH_LEN).collect()
}

/// Splits a commit message into its first line and the remaining body.
pub fn split_message(message: &str) -> (String, String) {
    let mut lines = message.trim_start().lines();
    let title = lines.next().unwrap_or("").trim_end().to_string();
    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    (title, body)
}

/// Committer time of `commit` as ISO-8601 in the committer's own offset.
pub fn format_commit_time(commit: &git2::Commit) -> String {
    let time = commit.time();
    format_iso8601(time.seconds(), time.offset_minutes())
}

pub fn format_iso8601(seconds: i64, offset_minutes: i32) -> String {
    let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap_or_else(|| Utc.fix());
    DateTime::from_timestamp(seconds, 0)
        .map(|dt| dt.with_timezone(&offset).to_rfc3339())
        .unwrap_or_else(|| seconds.to_string())
}

pub fn format_relative_time(timestamp: i64) -> String {
    let now = Utc::now().timestamp();
    let diff = now - timestamp;

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 2592000 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if diff < 31536000 {
        let months = diff / 2592000;
        format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
    } else {
        let years = diff / 31536000;
        format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_message_separates_title_and_body() {
        let (title, body) = split_message("Fix parser\n\nHandles empty input.\nAnd tabs.\n");
        assert_eq!(title, "Fix parser");
        assert_eq!(body, "Handles empty input.\nAnd tabs.");

        let (title, body) = split_message("One line only");
        assert_eq!(title, "One line only");
        assert_eq!(body, "");
    }

    #[test]
    fn iso8601_keeps_committer_offset() {
        assert_eq!(format_iso8601(0, 0), "1970-01-01T00:00:00+00:00");
        assert_eq!(format_iso8601(3600, 120), "1970-01-01T03:00:00+02:00");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc::now().timestamp();
        assert_eq!(format_relative_time(now), "just now");
        assert_eq!(format_relative_time(now - 120), "2 minutes ago");
        assert_eq!(format_relative_time(now - 86400), "1 day ago");
    }

    #[test]
    fn repo_names_must_be_single_component() {
        assert!(validate_repo_name("project").is_ok());
        assert!(validate_repo_name("../etc").is_err());
        assert!(validate_repo_name("a/b").is_err());
        assert!(validate_repo_name("").is_err());
        assert!(validate_repo_name("/abs").is_err());
    }

    #[test]
    fn short_hash_is_fixed_length_prefix() {
        let full = "0123456789abcdef0123456789abcdef01234567";
        let short = short_hash(full);
        assert_eq!(short.len(), SHORT_HASH_LEN);
        assert!(full.starts_with(&short));
    }
}
