//! Engine error types and HTTP response mapping.
//!
//! Defines `AppError` with one variant per failure the engine can report and
//! implements Axum's `IntoResponse` so the HTTP transport turns errors into
//! JSON bodies of the form `{ "error": <message>, "kind": <kind> }`.
//!
//! Error mappings:
//! - `NotFound`, `RepoNotFound`, `RefNotFound`, `CommitNotFound` → 404
//! - `AmbiguousHash`, `TargetExists` → 409
//! - `PermissionDenied` → 403
//! - `InvalidPath` → 400
//! - `CloneFailed` → 502
//! - `Cancelled` → 503
//! - `Git`, `Io`, `Internal` → 500

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Branch not found: {0}")]
    RefNotFound(String),

    #[error("Commit not found: {0}")]
    CommitNotFound(String),

    #[error("Ambiguous commit hash {prefix}: matches {}", candidates.join(", "))]
    AmbiguousHash {
        prefix: String,
        candidates: Vec<String>,
    },

    #[error("Target already exists: {0}")]
    TargetExists(String),

    #[error("Clone of {url} failed: {source}")]
    CloneFailed {
        url: String,
        #[source]
        source: git2::Error,
    },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable identifier the presentation layer can branch on.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::RepoNotFound(_) => "repository_not_found",
            AppError::RefNotFound(_) => "ref_not_found",
            AppError::CommitNotFound(_) => "commit_not_found",
            AppError::AmbiguousHash { .. } => "ambiguous_hash",
            AppError::TargetExists(_) => "target_exists",
            AppError::CloneFailed { .. } => "clone_failed",
            AppError::PermissionDenied(_) => "permission_denied",
            AppError::Cancelled(_) => "cancelled",
            AppError::InvalidPath(_) => "invalid_path",
            AppError::Git(_) => "git",
            AppError::Io(_) => "io",
            AppError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_)
            | AppError::RepoNotFound(_)
            | AppError::RefNotFound(_)
            | AppError::CommitNotFound(_) => StatusCode::NOT_FOUND,
            AppError::AmbiguousHash { .. } | AppError::TargetExists(_) => StatusCode::CONFLICT,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            AppError::CloneFailed { .. } => StatusCode::BAD_GATEWAY,
            AppError::Cancelled(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Git(_) | AppError::Io(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Maps a filesystem error on `path`, keeping access denial distinct.
    pub fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => AppError::NotFound(path.display().to_string()),
            std::io::ErrorKind::PermissionDenied => {
                AppError::PermissionDenied(path.display().to_string())
            }
            _ => AppError::Io(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), "{}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
