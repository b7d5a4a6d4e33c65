//! Business logic services.

pub mod event;
pub mod ranking;
pub mod topic;
pub mod user;
pub mod vote;

pub use event::EventService;
pub use ranking::{CreatorView, RankingService, TopicView};
pub use topic::{CreateTopicInput, TopicService, UpdateTopicInput};
pub use user::UserService;
pub use vote::{UnvoteOutcome, VoteOutcome, VoteService, VoteState};
