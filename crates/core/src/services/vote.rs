//! Vote service.

use talkboard_common::{AppError, AppResult, IdGenerator};
use talkboard_db::{
    entities::vote,
    repositories::{TopicRepository, VoteRepository},
};
use sea_orm::Set;
use serde::Serialize;

/// Outcome of casting a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    /// A new vote was recorded.
    Created,
    /// The user had already voted; nothing changed.
    AlreadyVoted,
}

/// Outcome of withdrawing a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnvoteOutcome {
    /// The vote was removed.
    Removed,
    /// There was no vote to remove; nothing changed.
    NotVoted,
}

/// A user's standing on a topic after a vote operation.
#[derive(Debug, Clone, Serialize)]
pub struct VoteState {
    /// Whether the user currently has a vote on the topic.
    pub has_voted: bool,
    /// Live vote count for the topic.
    pub vote_count: u64,
}

/// Vote service for business logic.
///
/// Voting is binary presence: a user either has a vote on a topic or
/// does not. Every operation is idempotent; repeating it reports the
/// unchanged state rather than failing.
#[derive(Clone)]
pub struct VoteService {
    vote_repo: VoteRepository,
    topic_repo: TopicRepository,
    id_gen: IdGenerator,
}

impl VoteService {
    /// Create a new vote service.
    #[must_use]
    pub fn new(vote_repo: VoteRepository, topic_repo: TopicRepository) -> Self {
        Self {
            vote_repo,
            topic_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Cast a vote on a topic.
    ///
    /// Voting twice reports `AlreadyVoted`. A concurrent double-submit
    /// loses to the unique index and is absorbed the same way.
    pub async fn vote(&self, user_id: &str, topic_slug: &str) -> AppResult<VoteOutcome> {
        let topic = self.topic_repo.get_by_slug(topic_slug).await?;

        if self.vote_repo.has_voted(&topic.id, user_id).await? {
            return Ok(VoteOutcome::AlreadyVoted);
        }

        match self.vote_repo.create(self.new_vote(&topic.id, user_id)).await {
            Ok(_) => {
                tracing::debug!(topic_id = %topic.id, user_id = %user_id, "Vote recorded");
                Ok(VoteOutcome::Created)
            }
            Err(AppError::Conflict(_)) => Ok(VoteOutcome::AlreadyVoted),
            Err(e) => Err(e),
        }
    }

    /// Withdraw a vote from a topic.
    pub async fn unvote(&self, user_id: &str, topic_slug: &str) -> AppResult<UnvoteOutcome> {
        let topic = self.topic_repo.get_by_slug(topic_slug).await?;

        if self
            .vote_repo
            .delete_by_topic_and_user(&topic.id, user_id)
            .await?
        {
            tracing::debug!(topic_id = %topic.id, user_id = %user_id, "Vote withdrawn");
            Ok(UnvoteOutcome::Removed)
        } else {
            Ok(UnvoteOutcome::NotVoted)
        }
    }

    /// Flip the user's vote on a topic and report the resulting state.
    pub async fn toggle(&self, user_id: &str, topic_slug: &str) -> AppResult<VoteState> {
        let topic = self.topic_repo.get_by_slug(topic_slug).await?;

        let has_voted = if self
            .vote_repo
            .delete_by_topic_and_user(&topic.id, user_id)
            .await?
        {
            false
        } else {
            match self.vote_repo.create(self.new_vote(&topic.id, user_id)).await {
                // A racing toggle inserted first; the vote stands either way.
                Ok(_) | Err(AppError::Conflict(_)) => true,
                Err(e) => return Err(e),
            }
        };

        let vote_count = self.vote_repo.count_by_topic(&topic.id).await?;
        Ok(VoteState {
            has_voted,
            vote_count,
        })
    }

    /// Whether a user currently has a vote on a topic.
    pub async fn has_voted(&self, user_id: &str, topic_slug: &str) -> AppResult<bool> {
        let topic = self.topic_repo.get_by_slug(topic_slug).await?;
        self.vote_repo.has_voted(&topic.id, user_id).await
    }

    /// Current vote state for a topic, from one user's point of view.
    pub async fn state(&self, viewer_id: Option<&str>, topic_slug: &str) -> AppResult<VoteState> {
        let topic = self.topic_repo.get_by_slug(topic_slug).await?;

        let has_voted = match viewer_id {
            Some(user_id) => self.vote_repo.has_voted(&topic.id, user_id).await?,
            None => false,
        };
        let vote_count = self.vote_repo.count_by_topic(&topic.id).await?;

        Ok(VoteState {
            has_voted,
            vote_count,
        })
    }

    fn new_vote(&self, topic_id: &str, user_id: &str) -> vote::ActiveModel {
        vote::ActiveModel {
            id: Set(self.id_gen.generate()),
            topic_id: Set(topic_id.to_string()),
            user_id: Set(user_id.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use talkboard_db::entities::topic;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;

    fn create_test_topic(id: &str, slug: &str) -> topic::Model {
        topic::Model {
            id: id.to_string(),
            event_id: "ev1".to_string(),
            slug: slug.to_string(),
            title: "Test Topic".to_string(),
            description: None,
            creator_id: "owner".to_string(),
            is_deleted: false,
            deleted_at: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_vote(id: &str, topic_id: &str, user_id: &str) -> vote::Model {
        vote::Model {
            id: id.to_string(),
            topic_id: topic_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_vote_topic_not_found() {
        let vote_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let topic_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<topic::Model>::new()])
                .into_connection(),
        );

        let service = VoteService::new(
            VoteRepository::new(vote_db),
            TopicRepository::new(topic_db),
        );

        let result = service.vote("u1", "missing").await;
        assert!(matches!(result, Err(AppError::TopicNotFound(_))));
    }

    #[tokio::test]
    async fn test_vote_creates() {
        let vote_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<vote::Model>::new()])
                .append_query_results([[create_test_vote("v1", "t1", "u1")]])
                .into_connection(),
        );
        let topic_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_topic("t1", "test-topic")]])
                .into_connection(),
        );

        let service = VoteService::new(
            VoteRepository::new(vote_db),
            TopicRepository::new(topic_db),
        );

        let outcome = service.vote("u1", "test-topic").await.unwrap();
        assert_eq!(outcome, VoteOutcome::Created);
    }

    #[tokio::test]
    async fn test_vote_twice_is_already_voted() {
        let vote_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_vote("v1", "t1", "u1")]])
                .into_connection(),
        );
        let topic_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_topic("t1", "test-topic")]])
                .into_connection(),
        );

        let service = VoteService::new(
            VoteRepository::new(vote_db),
            TopicRepository::new(topic_db),
        );

        let outcome = service.vote("u1", "test-topic").await.unwrap();
        assert_eq!(outcome, VoteOutcome::AlreadyVoted);
    }

    #[tokio::test]
    async fn test_vote_race_absorbed_as_already_voted() {
        let vote_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<vote::Model>::new()])
                .append_query_errors([sea_orm::DbErr::Custom(
                    "duplicate key value violates unique constraint \"idx_vote_topic_user\""
                        .to_string(),
                )])
                .into_connection(),
        );
        let topic_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_topic("t1", "test-topic")]])
                .into_connection(),
        );

        let service = VoteService::new(
            VoteRepository::new(vote_db),
            TopicRepository::new(topic_db),
        );

        let outcome = service.vote("u1", "test-topic").await.unwrap();
        assert_eq!(outcome, VoteOutcome::AlreadyVoted);
    }

    #[tokio::test]
    async fn test_unvote_removes() {
        let vote_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let topic_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_topic("t1", "test-topic")]])
                .into_connection(),
        );

        let service = VoteService::new(
            VoteRepository::new(vote_db),
            TopicRepository::new(topic_db),
        );

        let outcome = service.unvote("u1", "test-topic").await.unwrap();
        assert_eq!(outcome, UnvoteOutcome::Removed);
    }

    #[tokio::test]
    async fn test_unvote_without_vote() {
        let vote_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let topic_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_topic("t1", "test-topic")]])
                .into_connection(),
        );

        let service = VoteService::new(
            VoteRepository::new(vote_db),
            TopicRepository::new(topic_db),
        );

        let outcome = service.unvote("u1", "test-topic").await.unwrap();
        assert_eq!(outcome, UnvoteOutcome::NotVoted);
    }

    #[tokio::test]
    async fn test_toggle_on() {
        let vote_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // delete finds nothing, insert succeeds, count comes back 1
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .append_query_results([[create_test_vote("v1", "t1", "u1")]])
                .append_query_results([vec![btreemap! {
                    "num_items" => Value::BigInt(Some(1)),
                }]])
                .into_connection(),
        );
        let topic_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_topic("t1", "test-topic")]])
                .into_connection(),
        );

        let service = VoteService::new(
            VoteRepository::new(vote_db),
            TopicRepository::new(topic_db),
        );

        let state = service.toggle("u1", "test-topic").await.unwrap();
        assert!(state.has_voted);
        assert_eq!(state.vote_count, 1);
    }

    #[tokio::test]
    async fn test_toggle_off() {
        let vote_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // delete removes the vote, count comes back 0
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([vec![btreemap! {
                    "num_items" => Value::BigInt(Some(0)),
                }]])
                .into_connection(),
        );
        let topic_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_topic("t1", "test-topic")]])
                .into_connection(),
        );

        let service = VoteService::new(
            VoteRepository::new(vote_db),
            TopicRepository::new(topic_db),
        );

        let state = service.toggle("u1", "test-topic").await.unwrap();
        assert!(!state.has_voted);
        assert_eq!(state.vote_count, 0);
    }

    #[tokio::test]
    async fn test_state_anonymous_viewer() {
        let vote_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![btreemap! {
                    "num_items" => Value::BigInt(Some(2)),
                }]])
                .into_connection(),
        );
        let topic_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_topic("t1", "test-topic")]])
                .into_connection(),
        );

        let service = VoteService::new(
            VoteRepository::new(vote_db),
            TopicRepository::new(topic_db),
        );

        let state = service.state(None, "test-topic").await.unwrap();
        assert!(!state.has_voted);
        assert_eq!(state.vote_count, 2);
    }
}
