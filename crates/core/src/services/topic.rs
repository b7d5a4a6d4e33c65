//! Topic service.

use talkboard_common::{slugify, AppError, AppResult, IdGenerator};
use talkboard_db::{
    entities::topic,
    repositories::{EventRepository, TopicRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for suggesting a topic.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTopicInput {
    /// Slug of the event the topic belongs to.
    #[validate(length(min = 1, max = 100))]
    pub event_slug: String,
    /// Topic title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Optional longer description.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Input for editing a topic. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTopicInput {
    /// Slug of the topic to edit.
    #[validate(length(min = 1, max = 220))]
    pub slug: String,
    /// New title.
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// New description.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Topic service for business logic.
#[derive(Clone)]
pub struct TopicService {
    topic_repo: TopicRepository,
    event_repo: EventRepository,
    id_gen: IdGenerator,
}

impl TopicService {
    /// Create a new topic service.
    #[must_use]
    pub fn new(topic_repo: TopicRepository, event_repo: EventRepository) -> Self {
        Self {
            topic_repo,
            event_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Suggest a new topic for an event.
    ///
    /// The slug is derived from the title; on collision a numeric suffix
    /// is appended (`my-topic`, `my-topic-1`, ...). Slugs of soft-deleted
    /// topics stay reserved, so a resurrected title gets a fresh suffix.
    pub async fn create(
        &self,
        user_id: &str,
        mut input: CreateTopicInput,
    ) -> AppResult<topic::Model> {
        // Trim before validating so padding does not count against limits.
        input.title = input.title.trim().to_string();
        input.description = input
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(ToString::to_string);

        if input.title.is_empty() {
            return Err(AppError::BadRequest("Title must not be empty".to_string()));
        }
        input.validate()?;

        let event = self.event_repo.get_by_slug(&input.event_slug).await?;

        let slug = self.generate_unique_slug(&input.title).await?;

        let model = topic::ActiveModel {
            id: Set(self.id_gen.generate()),
            event_id: Set(event.id),
            slug: Set(slug),
            title: Set(input.title),
            description: Set(input.description),
            creator_id: Set(user_id.to_string()),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.topic_repo.create(model).await?;
        tracing::info!(topic_id = %created.id, slug = %created.slug, "Topic created");
        Ok(created)
    }

    /// Edit a topic's title or description.
    ///
    /// Only the creator may edit. The slug never changes on edit, so
    /// links keep working after a title fix.
    pub async fn update(
        &self,
        user_id: &str,
        mut input: UpdateTopicInput,
    ) -> AppResult<topic::Model> {
        // Trim before validating so padding does not count against limits.
        if let Some(title) = input.title.take() {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::BadRequest("Title must not be empty".to_string()));
            }
            input.title = Some(title);
        }
        if let Some(description) = input.description.take() {
            // An empty (post-trim) description still means "clear it".
            input.description = Some(description.trim().to_string());
        }
        input.validate()?;

        let topic = self.topic_repo.get_by_slug(&input.slug).await?;

        if topic.creator_id != user_id {
            return Err(AppError::Forbidden(
                "Only the creator can edit this topic".to_string(),
            ));
        }

        let mut active: topic::ActiveModel = topic.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(if description.is_empty() {
                None
            } else {
                Some(description)
            });
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.topic_repo.update(active).await
    }

    /// Soft-delete a topic.
    ///
    /// Only the creator may delete. Deleting an already-deleted topic is
    /// a no-op; its votes stay in place for audit but no longer count
    /// anywhere.
    pub async fn delete(&self, user_id: &str, slug: &str) -> AppResult<()> {
        let topic = self
            .topic_repo
            .find_by_slug_any(slug)
            .await?
            .ok_or_else(|| AppError::TopicNotFound(slug.to_string()))?;

        if topic.creator_id != user_id {
            return Err(AppError::Forbidden(
                "Only the creator can delete this topic".to_string(),
            ));
        }

        if topic.is_deleted {
            return Ok(());
        }

        self.topic_repo.soft_delete(slug).await?;
        tracing::info!(slug = %slug, "Topic soft-deleted");
        Ok(())
    }

    /// Get a live topic by slug.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<topic::Model> {
        self.topic_repo.get_by_slug(slug).await
    }

    /// Derive a slug from the title that no existing topic holds.
    async fn generate_unique_slug(&self, title: &str) -> AppResult<String> {
        let mut base = slugify(title);
        if base.is_empty() {
            // Titles made entirely of dropped characters still need a slug.
            base = "topic".to_string();
        }

        if !self.topic_repo.slug_exists(&base).await? {
            return Ok(base);
        }

        let mut n = 1u32;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.topic_repo.slug_exists(&candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}
