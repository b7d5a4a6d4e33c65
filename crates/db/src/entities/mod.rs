//! Database entities.

pub mod event;
pub mod social_account;
pub mod topic;
pub mod user;
pub mod vote;

pub use event::Entity as Event;
pub use social_account::Entity as SocialAccount;
pub use topic::Entity as Topic;
pub use user::Entity as User;
pub use vote::Entity as Vote;
