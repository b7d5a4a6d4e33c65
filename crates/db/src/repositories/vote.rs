//! Vote repository.

use std::sync::Arc;

use crate::entities::{Vote, vote};
use crate::repositories::is_unique_violation;
use talkboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

/// Vote repository for database operations.
///
/// The unique index on (topic_id, user_id) is the concurrency control
/// point for voting; `create` translates a violation of it into a
/// `Conflict` for the service layer to absorb.
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a vote by topic and user.
    pub async fn find_by_topic_and_user(
        &self,
        topic_id: &str,
        user_id: &str,
    ) -> AppResult<Option<vote::Model>> {
        Vote::find()
            .filter(vote::Column::TopicId.eq(topic_id))
            .filter(vote::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user has voted for a topic.
    pub async fn has_voted(&self, topic_id: &str, user_id: &str) -> AppResult<bool> {
        Ok(self
            .find_by_topic_and_user(topic_id, user_id)
            .await?
            .is_some())
    }

    /// Insert a vote row.
    ///
    /// A concurrent insert of the same (topic, user) pair loses to the
    /// unique index and comes back as `Conflict`.
    pub async fn create(&self, model: vote::ActiveModel) -> AppResult<vote::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("vote already exists".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Hard-delete the (topic, user) vote row.
    ///
    /// Returns whether a row was actually removed.
    pub async fn delete_by_topic_and_user(
        &self,
        topic_id: &str,
        user_id: &str,
    ) -> AppResult<bool> {
        let result = Vote::delete_many()
            .filter(vote::Column::TopicId.eq(topic_id))
            .filter(vote::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Count votes on a topic (the live vote count).
    pub async fn count_by_topic(&self, topic_id: &str) -> AppResult<u64> {
        Vote::find()
            .filter(vote::Column::TopicId.eq(topic_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Bulk-fetch one user's votes across a set of topics (single query,
    /// for per-viewer annotation of listings).
    pub async fn find_by_user_and_topics(
        &self,
        user_id: &str,
        topic_ids: &[String],
    ) -> AppResult<Vec<vote::Model>> {
        if topic_ids.is_empty() {
            return Ok(Vec::new());
        }
        Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::TopicId.is_in(topic_ids.iter().map(String::as_str)))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
