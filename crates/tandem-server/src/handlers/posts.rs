//! Post handlers

use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tandem_types::PostView;

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    posts: Vec<PostView>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: &'static str,
}

impl StatusResponse {
    fn success() -> Json<Self> {
        Json(Self { status: "success" })
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// Error rendered as `{"error": ...}` with its status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    fn bad_request(message: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    fn internal(message: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

pub async fn list(State(state): State<AppState>) -> Json<PostListResponse> {
    Json(PostListResponse {
        posts: state.cache.snapshot(),
    })
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    // Empty strings count as missing, matching the validation contract
    let username = req.username.as_deref().filter(|s| !s.is_empty());
    let content = req.content.as_deref().filter(|s| !s.is_empty());
    let (Some(username), Some(content)) = (username, content) else {
        return Err(ApiError::bad_request("Missing data"));
    };

    match state.post_service.create_post(username, content).await {
        Ok(()) => Ok(StatusResponse::success()),
        Err(e) => {
            tracing::error!("Failed to create post: {}", e);
            Err(ApiError::internal("Database operation failed"))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    content: Option<String>,
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Some(content) = req.content.as_deref().filter(|s| !s.is_empty()) else {
        return Err(ApiError::bad_request("Content required"));
    };

    if state.post_service.update_post(id, content).await {
        Ok(StatusResponse::success())
    } else {
        Err(ApiError::internal("Update failed"))
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusResponse>, ApiError> {
    if state.post_service.delete_post(id).await {
        Ok(StatusResponse::success())
    } else {
        Err(ApiError::internal("Deletion failed"))
    }
}
