//! Event endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use talkboard_common::AppResult;
use talkboard_core::TopicView;
use talkboard_db::entities::event;
use serde::{Deserialize, Serialize};

use crate::{extractors::MaybeAuthUser, middleware::AppState, response::ApiResponse};

// ==================== Request/Response Types ====================

/// Event response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<event::Model> for EventResponse {
    fn from(e: event::Model) -> Self {
        Self {
            slug: e.slug,
            name: e.name,
            description: e.description,
            created_at: e.created_at.to_rfc3339(),
        }
    }
}

/// A topic as rendered on the board.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardTopicResponse {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub vote_count: i64,
    pub creator: CreatorResponse,
    pub has_voted: bool,
    pub created_at: String,
}

/// Who suggested a topic.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorResponse {
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl From<TopicView> for BoardTopicResponse {
    fn from(v: TopicView) -> Self {
        Self {
            slug: v.slug,
            title: v.title,
            description: v.description,
            vote_count: v.vote_count,
            creator: CreatorResponse {
                username: v.creator.username,
                display_name: v.creator.display_name,
                avatar_url: v.creator.avatar_url,
            },
            has_voted: v.has_voted,
            created_at: v.created_at.to_rfc3339(),
        }
    }
}

/// List events / board pagination.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

// ==================== Handlers ====================

/// List events, newest first.
async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<EventResponse>>> {
    let events = state
        .event_service
        .list(page.offset.unwrap_or(0), page.limit.unwrap_or(20).min(100))
        .await?;

    Ok(ApiResponse::ok(events.into_iter().map(Into::into).collect()))
}

/// Show one event.
async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<ApiResponse<EventResponse>> {
    let event = state.event_service.get_by_slug(&slug).await?;

    Ok(ApiResponse::ok(event.into()))
}

/// The event's topic board, most-voted first.
async fn board(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<BoardTopicResponse>>> {
    let viewer_id = viewer.as_ref().map(|u| u.id.as_str());
    let topics = state
        .ranking_service
        .list_event_topics(&slug, viewer_id, page.offset, page.limit)
        .await?;

    Ok(ApiResponse::ok(topics.into_iter().map(Into::into).collect()))
}

/// Event routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{slug}", get(show))
        .route("/{slug}/topics", get(board))
}
