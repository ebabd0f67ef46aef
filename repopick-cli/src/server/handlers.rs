use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use repopick_core::{build_tree, bundle, list_branches, validate_branch};

use super::models::{
    ApiError, AppState, ReadFilesResponse, RepoView, UpdateRequest, UpdateResponse,
};

pub async fn repo_view(State(state): State<Arc<AppState>>) -> Result<Json<RepoView>, ApiError> {
    let root = state.resolver.resolve().await?;
    let repo = &state.settings.settings().repo;

    let tree_root = root.clone();
    let tree = tokio::task::spawn_blocking(move || build_tree(&tree_root))
        .await
        .map_err(|e| ApiError::Internal(format!("Tree builder panicked: {e}")))?;
    let branches = list_branches(&root, &repo.branch, &repo.remote).await;

    Ok(Json(RepoView {
        tree,
        branch: repo.branch.clone(),
        branches,
    }))
}

pub async fn read_files(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<ReadFilesResponse>, ApiError> {
    let paths = parse_paths(&body)?;
    let root = state.resolver.resolve().await?;
    let merged = bundle(&root, &paths).await?;
    Ok(Json(ReadFilesResponse { merged }))
}

/// `paths` must be a list of strings; a missing key means no paths.
fn parse_paths(body: &Value) -> Result<Vec<String>, ApiError> {
    let invalid = || ApiError::BadRequest("JSON must contain 'paths' list.".to_string());

    let Some(body) = body.as_object() else {
        return Err(invalid());
    };
    match body.get("paths") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}

pub async fn update_repo(
    State(state): State<Arc<AppState>>,
    body: Option<Json<UpdateRequest>>,
) -> Result<Response, ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let branch = request
        .branch
        .filter(|b| !b.trim().is_empty())
        .unwrap_or_else(|| state.settings.settings().repo.branch.clone());
    validate_branch(&branch)?;

    let root = state.resolver.resolve().await?;
    let response = match state.orchestrator.update(&root, &branch).await {
        Ok(log) => (
            StatusCode::OK,
            Json(UpdateResponse {
                success: true,
                log: log.to_string(),
                error: None,
            }),
        ),
        Err(failure) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(UpdateResponse {
                success: false,
                log: failure.log.to_string(),
                error: Some(failure.error.to_string()),
            }),
        ),
    };
    Ok(response.into_response())
}
