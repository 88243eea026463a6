//! Branch listing endpoint.
//!
//! - GET /api/v1/repositories/{name}/branches?path=
//!   Lists local then remote-tracking branches, current branch flagged.
//!   No branch is flagged when HEAD is detached.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;

use super::AppState;
use crate::error::Result;
use crate::models::BranchInfo;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/repositories/{name}/branches", get(list_branches))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct BranchesQuery {
    path: Option<String>,
}

async fn list_branches(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<BranchesQuery>,
) -> Result<Json<Vec<BranchInfo>>> {
    let root = state.root(query.path)?;
    let branches = state.engine.get_repository_branches(root, name).await?;
    Ok(Json(branches))
}
