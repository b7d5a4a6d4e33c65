//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use talkboard_core::{EventService, RankingService, TopicService, UserService, VoteService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// User lookups and session resolution.
    pub user_service: UserService,
    /// Event lookups.
    pub event_service: EventService,
    /// Topic suggestion and editing.
    pub topic_service: TopicService,
    /// Vote casting and withdrawal.
    pub vote_service: VoteService,
    /// Ranked topic boards.
    pub ranking_service: RankingService,
}

/// Authentication middleware.
///
/// Resolves a `Bearer` session token to its user and stashes the user
/// in request extensions. Requests without a valid token pass through
/// anonymously; handlers that require a user reject via [`crate::extractors::AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        if let Ok(user) = state.user_service.authenticate_by_token(token).await {
            req.extensions_mut().insert(user);
        }
    }

    next.run(req).await
}
