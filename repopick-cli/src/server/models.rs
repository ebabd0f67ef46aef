use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use repopick_core::{RepoError, RootResolver, SettingsManager, TreeNode, UpdateOrchestrator};

pub struct AppState {
    pub settings: SettingsManager,
    pub resolver: RootResolver,
    pub orchestrator: UpdateOrchestrator,
}

impl AppState {
    pub fn new(settings: SettingsManager) -> Self {
        Self {
            resolver: RootResolver::new(settings.clone()),
            orchestrator: UpdateOrchestrator::new(settings.clone()),
            settings,
        }
    }
}

#[derive(Serialize)]
pub struct RepoView {
    pub tree: TreeNode,
    /// Configured default branch
    pub branch: String,
    pub branches: Vec<String>,
}

#[derive(Serialize)]
pub struct ReadFilesResponse {
    pub merged: String,
}

#[derive(Deserialize, Default)]
pub struct UpdateRequest {
    #[serde(default)]
    pub branch: Option<String>,
}

#[derive(Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub log: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    Repo(RepoError),
    BadRequest(String),
    Internal(String),
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        Self::Repo(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Repo(err) if err.is_client_error() => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Repo(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        if status.is_server_error() {
            tracing::error!(%status, %message, "Request failed");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
