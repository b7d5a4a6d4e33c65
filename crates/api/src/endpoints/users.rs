//! User endpoints.

use axum::{routing::get, Router};
use talkboard_core::user::display_name;
use talkboard_db::entities::user;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// The authenticated principal.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub username: String,
    pub display_name: String,
    pub created_at: String,
}

impl From<user::Model> for MeResponse {
    fn from(u: user::Model) -> Self {
        Self {
            display_name: display_name(&u),
            username: u.username,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Who am I.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<MeResponse> {
    ApiResponse::ok(user.into())
}

/// User routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}
