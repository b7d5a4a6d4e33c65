//! User service.

use talkboard_common::{AppError, AppResult};
use talkboard_db::{entities::user, repositories::UserRepository};

/// Display name for a user: "First Last" from whichever parts are set,
/// falling back to the username when neither is.
#[must_use]
pub fn display_name(user: &user::Model) -> String {
    let full = [user.first_name.as_deref(), user.last_name.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    if full.is_empty() {
        user.username.clone()
    } else {
        full
    }
}

/// User service for business logic.
///
/// Accounts and session tokens are issued by the external identity
/// provider integration; this service only resolves tokens to users.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Resolve a session token to its user.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_session_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}
