use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;

use super::AppState;
use crate::error::Result;
use crate::models::{CommitDetails, CommitPage};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/repositories/{name}/commits", get(get_commits))
        .route(
            "/api/v1/repositories/{name}/commits/{hash}",
            get(get_commit_details),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CommitsQuery {
    path: Option<String>,
    branch: Option<String>,
    limit: Option<usize>,
    #[serde(default)]
    offset: usize,
}

async fn get_commits(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<CommitsQuery>,
) -> Result<Json<CommitPage>> {
    let root = state.root(query.path)?;
    let page = state
        .engine
        .get_repository_commits(root, name, query.branch, query.limit, query.offset)
        .await?;
    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
struct DetailsQuery {
    path: Option<String>,
}

async fn get_commit_details(
    State(state): State<AppState>,
    Path((name, hash)): Path<(String, String)>,
    Query(query): Query<DetailsQuery>,
) -> Result<Json<CommitDetails>> {
    let root = state.root(query.path)?;
    let details = state.engine.get_commit_details(root, name, hash).await?;
    Ok(Json(details))
}
