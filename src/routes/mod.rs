//! API route handlers - maps HTTP endpoints to engine operations.
//!
//! Each submodule defines routes for a feature area:
//! - `workspace`: setup, repository listing, clone
//! - `branches`: branch listing per repository
//! - `commits`: commit history and commit details
//!
//! Every read takes the workspace root as a `path` query parameter; when it
//! is omitted the root the server was started with is used.

pub mod branches;
pub mod commits;
pub mod workspace;

use axum::Router;
use std::path::PathBuf;

use crate::engine::GitEngine;
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct AppState {
    pub engine: GitEngine,
    pub default_root: Option<PathBuf>,
}

impl AppState {
    pub fn new(engine: GitEngine, default_root: Option<PathBuf>) -> Self {
        Self {
            engine,
            default_root,
        }
    }

    /// The root passed by the caller, else the configured one.
    pub fn root(&self, path: Option<String>) -> Result<PathBuf> {
        path.map(PathBuf::from)
            .or_else(|| self.default_root.clone())
            .ok_or_else(|| AppError::InvalidPath("no workspace root given".to_string()))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(workspace::routes(state.clone()))
        .merge(branches::routes(state.clone()))
        .merge(commits::routes(state))
}
