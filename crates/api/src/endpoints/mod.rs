//! API endpoints.

mod events;
mod topics;
mod users;
mod votes;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/events", events::router())
        .nest("/topics", topics::router())
        .nest("/votes", votes::router())
        .merge(users::router())
}
