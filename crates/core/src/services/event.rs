//! Event service.

use talkboard_common::{slugify, AppError, AppResult, IdGenerator};
use talkboard_db::{entities::event, repositories::EventRepository};
use sea_orm::Set;

/// Event service for business logic.
#[derive(Clone)]
pub struct EventService {
    event_repo: EventRepository,
    id_gen: IdGenerator,
}

impl EventService {
    /// Create a new event service.
    #[must_use]
    pub fn new(event_repo: EventRepository) -> Self {
        Self {
            event_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get an event by slug.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<event::Model> {
        self.event_repo.get_by_slug(slug).await
    }

    /// List events, newest first.
    pub async fn list(&self, offset: u64, limit: u64) -> AppResult<Vec<event::Model>> {
        self.event_repo.list(limit, offset).await
    }

    /// Create an event. The slug is derived from the name; on collision
    /// a numeric suffix is appended.
    pub async fn create(&self, name: &str, description: Option<&str>) -> AppResult<event::Model> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Name must not be empty".to_string()));
        }

        let slug = self.generate_unique_slug(name).await?;

        let created = self
            .event_repo
            .create(event::ActiveModel {
                id: Set(self.id_gen.generate()),
                name: Set(name.to_string()),
                slug: Set(slug),
                description: Set(description
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(ToString::to_string)),
                created_at: Set(chrono::Utc::now().into()),
                updated_at: Set(None),
            })
            .await?;

        tracing::info!(event_id = %created.id, slug = %created.slug, "Event created");
        Ok(created)
    }

    /// Update an event's name or description. The slug never changes.
    pub async fn update(
        &self,
        slug: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> AppResult<event::Model> {
        let event = self.event_repo.get_by_slug(slug).await?;
        let mut active: event::ActiveModel = event.into();

        if let Some(name) = name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::BadRequest("Name must not be empty".to_string()));
            }
            active.name = Set(name.to_string());
        }
        if let Some(description) = description {
            let description = description.trim();
            active.description = Set(if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            });
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.event_repo.update(active).await
    }

    async fn generate_unique_slug(&self, name: &str) -> AppResult<String> {
        let mut base = slugify(name);
        if base.is_empty() {
            base = "event".to_string();
        }

        if self.event_repo.find_by_slug(&base).await?.is_none() {
            return Ok(base);
        }

        let mut n = 1u32;
        loop {
            let candidate = format!("{base}-{n}");
            if self.event_repo.find_by_slug(&candidate).await?.is_none() {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}
