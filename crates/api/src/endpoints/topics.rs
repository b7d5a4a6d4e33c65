//! Topic endpoints.

use axum::{extract::State, routing::post, Json, Router};
use talkboard_common::AppResult;
use talkboard_core::{CreateTopicInput, UpdateTopicInput};
use talkboard_db::entities::topic;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

// ==================== Request/Response Types ====================

/// Topic response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicResponse {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub creator_id: String,
    pub created_at: String,
}

impl From<topic::Model> for TopicResponse {
    fn from(t: topic::Model) -> Self {
        Self {
            slug: t.slug,
            title: t.title,
            description: t.description,
            creator_id: t.creator_id,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// Delete topic request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTopicRequest {
    pub slug: String,
}

// ==================== Handlers ====================

/// Suggest a new topic for an event.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTopicInput>,
) -> AppResult<ApiResponse<TopicResponse>> {
    let topic = state.topic_service.create(&user.id, input).await?;

    Ok(ApiResponse::ok(topic.into()))
}

/// Edit a topic (creator only).
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateTopicInput>,
) -> AppResult<ApiResponse<TopicResponse>> {
    let topic = state.topic_service.update(&user.id, input).await?;

    Ok(ApiResponse::ok(topic.into()))
}

/// Soft-delete a topic (creator only).
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteTopicRequest>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.topic_service.delete(&user.id, &req.slug).await?;

    Ok(crate::response::ok())
}

/// Topic routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/update", post(update))
        .route("/delete", post(delete))
}
