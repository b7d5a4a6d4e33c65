//! Ranked topic listings.
//!
//! Builds the event topic board: topics ordered by live vote count with
//! creator and per-viewer annotations, assembled from a fixed number of
//! queries regardless of page size.

use std::collections::{HashMap, HashSet};

use crate::services::user::display_name;
use talkboard_common::config::PaginationConfig;
use talkboard_common::AppResult;
use talkboard_db::repositories::{
    EventRepository, TopicRepository, UserRepository, VoteRepository,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who suggested a topic, as shown on the board.
#[derive(Debug, Clone, Serialize)]
pub struct CreatorView {
    /// Username of the creator.
    pub username: String,
    /// Display name ("First Last" when set, username otherwise).
    pub display_name: String,
    /// Avatar from the creator's linked social account, if any.
    pub avatar_url: Option<String>,
}

/// A topic as rendered on an event's board.
#[derive(Debug, Clone, Serialize)]
pub struct TopicView {
    /// Topic ID.
    pub id: String,
    /// Topic slug.
    pub slug: String,
    /// Slug of the event the topic belongs to.
    pub event_slug: String,
    /// Name of the event the topic belongs to.
    pub event_name: String,
    /// Topic title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Live vote count.
    pub vote_count: i64,
    /// Who suggested the topic.
    pub creator: CreatorView,
    /// Whether the requesting user has voted for this topic.
    pub has_voted: bool,
    /// When the topic was suggested.
    pub created_at: DateTime<Utc>,
}

/// Ranking service for event topic boards.
#[derive(Clone)]
pub struct RankingService {
    event_repo: EventRepository,
    topic_repo: TopicRepository,
    user_repo: UserRepository,
    vote_repo: VoteRepository,
    pagination: PaginationConfig,
}

impl RankingService {
    /// Create a new ranking service.
    #[must_use]
    pub const fn new(
        event_repo: EventRepository,
        topic_repo: TopicRepository,
        user_repo: UserRepository,
        vote_repo: VoteRepository,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            event_repo,
            topic_repo,
            user_repo,
            vote_repo,
            pagination,
        }
    }

    /// List an event's topics, most-voted first.
    ///
    /// Ties break on creation time (earliest suggestion first). The
    /// requested limit is capped at the configured maximum; an offset
    /// past the end yields an empty page. Anonymous viewers get
    /// `has_voted: false` throughout.
    pub async fn list_event_topics(
        &self,
        event_slug: &str,
        viewer_id: Option<&str>,
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> AppResult<Vec<TopicView>> {
        let event = self.event_repo.get_by_slug(event_slug).await?;

        let offset = offset.unwrap_or(0);
        let limit = self.clamp_limit(limit);

        let rows = self
            .topic_repo
            .list_ranked_for_event(&event.id, offset, limit)
            .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let topic_ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let creator_ids: Vec<String> = rows
            .iter()
            .map(|r| r.creator_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let creators: HashMap<String, _> = self
            .user_repo
            .find_by_ids(&creator_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        // First linked account wins when a user has several.
        let mut avatars: HashMap<String, Option<String>> = HashMap::new();
        for account in self
            .user_repo
            .find_social_accounts_by_user_ids(&creator_ids)
            .await?
        {
            avatars
                .entry(account.user_id.clone())
                .or_insert(account.avatar_url);
        }

        let voted_topic_ids: HashSet<String> = match viewer_id {
            Some(user_id) => self
                .vote_repo
                .find_by_user_and_topics(user_id, &topic_ids)
                .await?
                .into_iter()
                .map(|v| v.topic_id)
                .collect(),
            None => HashSet::new(),
        };

        let views = rows
            .into_iter()
            .map(|row| {
                let creator = creators.get(&row.creator_id).map_or_else(
                    || CreatorView {
                        username: String::new(),
                        display_name: String::new(),
                        avatar_url: None,
                    },
                    |user| CreatorView {
                        username: user.username.clone(),
                        display_name: display_name(user),
                        avatar_url: avatars.get(&user.id).cloned().flatten(),
                    },
                );

                TopicView {
                    id: row.id.clone(),
                    slug: row.slug,
                    event_slug: event.slug.clone(),
                    event_name: event.name.clone(),
                    title: row.title,
                    description: row.description,
                    vote_count: row.vote_count,
                    creator,
                    has_voted: voted_topic_ids.contains(&row.id),
                    created_at: row.created_at.with_timezone(&Utc),
                }
            })
            .collect();

        Ok(views)
    }

    fn clamp_limit(&self, limit: Option<u64>) -> u64 {
        limit
            .unwrap_or(self.pagination.default_page_size)
            .min(self.pagination.max_page_size)
    }
}
