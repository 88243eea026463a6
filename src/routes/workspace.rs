//! Workspace endpoints.
//!
//! - POST /api/v1/setup { path }
//!   Creates the workspace directory if needed.
//!
//! - GET /api/v1/repositories?path=
//!   Lists the repositories directly under the workspace root.
//!
//! - POST /api/v1/clone { repoUrl, targetDir?, path? }
//!   Clones into `targetDir`, or into `<path>/<name from url>`.
//!   If the client disconnects the clone is cancelled and cleaned up.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use std::path::PathBuf;

use super::AppState;
use crate::error::Result;
use crate::models::{CloneResponse, RepositorySummary, SetupResponse};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/setup", post(setup))
        .route("/api/v1/repositories", get(list_repositories))
        .route("/api/v1/clone", post(git_clone))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SetupRequest {
    path: Option<String>,
}

async fn setup(
    State(state): State<AppState>,
    Json(request): Json<SetupRequest>,
) -> Result<Json<SetupResponse>> {
    let root = state.root(request.path)?;
    let response = state.engine.setup(root).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct RootQuery {
    path: Option<String>,
}

async fn list_repositories(
    State(state): State<AppState>,
    Query(query): Query<RootQuery>,
) -> Result<Json<Vec<RepositorySummary>>> {
    let root = state.root(query.path)?;
    let repos = state.engine.list_repositories(root).await?;
    Ok(Json(repos))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloneRequest {
    repo_url: String,
    target_dir: Option<String>,
    path: Option<String>,
}

async fn git_clone(
    State(state): State<AppState>,
    Json(request): Json<CloneRequest>,
) -> Result<Json<CloneResponse>> {
    let response = match request.target_dir {
        Some(target) => {
            state
                .engine
                .git_clone(request.repo_url, PathBuf::from(target))
                .await?
        }
        None => {
            let root = state.root(request.path)?;
            state
                .engine
                .git_clone_into_root(request.repo_url, &root)
                .await?
        }
    };
    Ok(Json(response))
}
