//! Database repositories.

mod event;
mod topic;
mod user;
mod vote;

pub use event::EventRepository;
pub use topic::{TopicRepository, TopicWithVoteCount};
pub use user::UserRepository;
pub use vote::VoteRepository;

use sea_orm::{DbErr, SqlErr};

/// Whether a database error is a unique-constraint violation.
///
/// The message fallback covers backends (mock, sqlite) that do not
/// surface structured sql errors.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    let msg = err.to_string();
    msg.contains("duplicate key") || msg.contains("UNIQUE constraint")
}
