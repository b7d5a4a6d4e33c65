//! Vote endpoints.

use axum::{extract::State, routing::post, Json, Router};
use talkboard_common::AppResult;
use talkboard_core::{UnvoteOutcome, VoteOutcome, VoteState};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

// ==================== Request/Response Types ====================

/// Vote request, addressing a topic by slug.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub topic_slug: String,
}

/// Result of casting a vote.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub outcome: VoteOutcome,
}

/// Result of withdrawing a vote.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnvoteResponse {
    pub outcome: UnvoteOutcome,
}

/// Vote state after a toggle.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStateResponse {
    pub has_voted: bool,
    pub vote_count: u64,
}

impl From<VoteState> for VoteStateResponse {
    fn from(s: VoteState) -> Self {
        Self {
            has_voted: s.has_voted,
            vote_count: s.vote_count,
        }
    }
}

// ==================== Handlers ====================

/// Cast a vote. Voting twice is a no-op.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<VoteRequest>,
) -> AppResult<ApiResponse<VoteResponse>> {
    let outcome = state.vote_service.vote(&user.id, &req.topic_slug).await?;

    Ok(ApiResponse::ok(VoteResponse { outcome }))
}

/// Withdraw a vote. Withdrawing a missing vote is a no-op.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<VoteRequest>,
) -> AppResult<ApiResponse<UnvoteResponse>> {
    let outcome = state.vote_service.unvote(&user.id, &req.topic_slug).await?;

    Ok(ApiResponse::ok(UnvoteResponse { outcome }))
}

/// Flip the vote and report the resulting state.
async fn toggle(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<VoteRequest>,
) -> AppResult<ApiResponse<VoteStateResponse>> {
    let state_after = state.vote_service.toggle(&user.id, &req.topic_slug).await?;

    Ok(ApiResponse::ok(state_after.into()))
}

/// Vote routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/delete", post(delete))
        .route("/toggle", post(toggle))
}
