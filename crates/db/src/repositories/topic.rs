//! Topic repository.

use std::sync::Arc;

use crate::entities::{Topic, topic, vote};
use crate::repositories::is_unique_violation;
use chrono::Utc;
use talkboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

/// A topic row annotated with its live vote count.
///
/// Produced by a single aggregate query (LEFT JOIN + GROUP BY); the vote
/// count is always the current `COUNT` over vote rows, never a stored
/// column that could drift.
#[derive(Debug, Clone, FromQueryResult)]
pub struct TopicWithVoteCount {
    pub id: String,
    pub event_id: String,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub creator_id: String,
    pub created_at: sea_orm::prelude::DateTimeWithTimeZone,
    pub vote_count: i64,
}

/// Topic repository for database operations.
///
/// Reads exclude soft-deleted rows unless stated otherwise.
#[derive(Clone)]
pub struct TopicRepository {
    db: Arc<DatabaseConnection>,
}

impl TopicRepository {
    /// Create a new topic repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a live (non-deleted) topic by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<topic::Model>> {
        Topic::find()
            .filter(topic::Column::Slug.eq(slug))
            .filter(topic::Column::IsDeleted.eq(false))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a live topic by slug, failing if it does not exist.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<topic::Model> {
        self.find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::TopicNotFound(slug.to_string()))
    }

    /// Find a topic by slug including soft-deleted rows.
    pub async fn find_by_slug_any(&self, slug: &str) -> AppResult<Option<topic::Model>> {
        Topic::find()
            .filter(topic::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether any topic (live or soft-deleted) holds this slug.
    ///
    /// Soft-deleted rows keep their slug, so the uniqueness probe must
    /// see them too.
    pub async fn slug_exists(&self, slug: &str) -> AppResult<bool> {
        let count = Topic::find()
            .filter(topic::Column::Slug.eq(slug))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Create a new topic.
    ///
    /// A concurrent create that raced to the same slug surfaces as a
    /// retryable `Conflict` rather than a bare database error.
    pub async fn create(&self, model: topic::ActiveModel) -> AppResult<topic::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("topic slug already taken".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Update a topic (title/description; the slug is never regenerated).
    pub async fn update(&self, model: topic::ActiveModel) -> AppResult<topic::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Soft-delete a topic by slug.
    ///
    /// Idempotent: deleting an already-deleted topic is a no-op. Fails
    /// with `TopicNotFound` only when the slug resolves to nothing at all.
    pub async fn soft_delete(&self, slug: &str) -> AppResult<()> {
        let topic = self
            .find_by_slug_any(slug)
            .await?
            .ok_or_else(|| AppError::TopicNotFound(slug.to_string()))?;

        if topic.is_deleted {
            return Ok(());
        }

        let mut active: topic::ActiveModel = topic.into();
        active.is_deleted = Set(true);
        active.deleted_at = Set(Some(Utc::now().into()));

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// List live topics for an event, annotated with live vote counts.
    ///
    /// One aggregate query: vote counts via LEFT JOIN + GROUP BY, ordered
    /// by vote count descending with creation time ascending as the
    /// tie-break (earliest suggestion wins ties). Offset/limit paginate;
    /// a page past the end is simply empty.
    pub async fn list_ranked_for_event(
        &self,
        event_id: &str,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<TopicWithVoteCount>> {
        Topic::find()
            .filter(topic::Column::EventId.eq(event_id))
            .filter(topic::Column::IsDeleted.eq(false))
            .join(JoinType::LeftJoin, topic::Relation::Votes.def())
            .select_only()
            .columns([
                topic::Column::Id,
                topic::Column::EventId,
                topic::Column::Slug,
                topic::Column::Title,
                topic::Column::Description,
                topic::Column::CreatorId,
                topic::Column::CreatedAt,
            ])
            .column_as(vote::Column::Id.count(), "vote_count")
            .group_by(topic::Column::Id)
            .order_by(vote::Column::Id.count(), Order::Desc)
            .order_by_asc(topic::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .into_model::<TopicWithVoteCount>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn create_test_topic(id: &str, slug: &str, deleted: bool) -> topic::Model {
        topic::Model {
            id: id.to_string(),
            event_id: "ev1".to_string(),
            slug: slug.to_string(),
            title: "Test Topic".to_string(),
            description: None,
            creator_id: "u1".to_string(),
            is_deleted: deleted,
            deleted_at: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_slug_found() {
        let topic = create_test_topic("t1", "test-topic", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[topic.clone()]])
                .into_connection(),
        );

        let repo = TopicRepository::new(db);
        let result = repo.find_by_slug("test-topic").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "t1");
    }

    #[tokio::test]
    async fn test_get_by_slug_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<topic::Model>::new()])
                .into_connection(),
        );

        let repo = TopicRepository::new(db);
        let result = repo.get_by_slug("missing").await;

        assert!(matches!(result, Err(AppError::TopicNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_maps_slug_race_to_conflict() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([sea_orm::DbErr::Custom(
                    "duplicate key value violates unique constraint \"topic_slug_key\""
                        .to_string(),
                )])
                .into_connection(),
        );

        let repo = TopicRepository::new(db);
        let model = topic::ActiveModel {
            id: Set("t1".to_string()),
            event_id: Set("ev1".to_string()),
            slug: Set("test-topic".to_string()),
            title: Set("Test Topic".to_string()),
            description: Set(None),
            creator_id: Set("u1".to_string()),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let result = repo.create(model).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_soft_delete_already_deleted_is_noop() {
        let topic = create_test_topic("t1", "test-topic", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[topic.clone()]])
                .into_connection(),
        );

        let repo = TopicRepository::new(db);
        // No update statement is queued; a second delete must not need one.
        repo.soft_delete("test-topic").await.unwrap();
    }

    #[tokio::test]
    async fn test_soft_delete_missing_topic() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<topic::Model>::new()])
                .into_connection(),
        );

        let repo = TopicRepository::new(db);
        let result = repo.soft_delete("missing").await;

        assert!(matches!(result, Err(AppError::TopicNotFound(_))));
    }

    #[tokio::test]
    async fn test_slug_exists() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[btreemap! {
                    "num_items" => Value::BigInt(Some(1)),
                }]])
                .into_connection(),
        );

        let repo = TopicRepository::new(db);
        assert!(repo.slug_exists("test-topic").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_ranked_for_event() {
        let now = Utc::now();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    btreemap! {
                        "id" => Value::from("t1"),
                        "event_id" => Value::from("ev1"),
                        "slug" => Value::from("popular"),
                        "title" => Value::from("Popular"),
                        "description" => Value::String(None),
                        "creator_id" => Value::from("u1"),
                        "created_at" => Value::from(sea_orm::prelude::DateTimeWithTimeZone::from(now)),
                        "vote_count" => Value::BigInt(Some(3)),
                    },
                    btreemap! {
                        "id" => Value::from("t2"),
                        "event_id" => Value::from("ev1"),
                        "slug" => Value::from("quiet"),
                        "title" => Value::from("Quiet"),
                        "description" => Value::String(None),
                        "creator_id" => Value::from("u2"),
                        "created_at" => Value::from(sea_orm::prelude::DateTimeWithTimeZone::from(now)),
                        "vote_count" => Value::BigInt(Some(1)),
                    },
                ]])
                .into_connection(),
        );

        let repo = TopicRepository::new(db);
        let rows = repo.list_ranked_for_event("ev1", 0, 20).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].slug, "popular");
        assert_eq!(rows[0].vote_count, 3);
        assert_eq!(rows[1].vote_count, 1);
    }

    #[tokio::test]
    async fn test_soft_delete_sets_flag() {
        let topic = create_test_topic("t1", "test-topic", false);
        let mut deleted = topic.clone();
        deleted.is_deleted = true;
        deleted.deleted_at = Some(Utc::now().into());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![topic], vec![deleted]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = TopicRepository::new(db);
        repo.soft_delete("test-topic").await.unwrap();
    }
}
