//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Point the tests at the instance with these environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `talkboard_test`)
//!   `TEST_DB_PASSWORD` (default: `talkboard_test`)
//!   `TEST_DB_NAME` (default: `talkboard_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use talkboard_common::AppError;
use talkboard_db::repositories::{TopicRepository, VoteRepository};
use talkboard_db::test_utils::{
    TestDatabase, TestDbConfig, seed_event, seed_topic, seed_user, seed_vote,
};

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_cleanup() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let result = db.cleanup().await;
    assert!(result.is_ok(), "Cleanup failed: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_vote_round_trip() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = Arc::new(db.conn);

    let user = seed_user(conn.as_ref(), "voter").await.unwrap();
    let event = seed_event(conn.as_ref(), "rustconf", "RustConf").await.unwrap();
    let topic = seed_topic(conn.as_ref(), &event.id, &user.id, "async-rust", "Async Rust")
        .await
        .unwrap();

    let votes = VoteRepository::new(Arc::clone(&conn));

    assert!(!votes.has_voted(&topic.id, &user.id).await.unwrap());

    seed_vote(conn.as_ref(), &topic.id, &user.id).await.unwrap();
    assert!(votes.has_voted(&topic.id, &user.id).await.unwrap());
    assert_eq!(votes.count_by_topic(&topic.id).await.unwrap(), 1);

    assert!(votes
        .delete_by_topic_and_user(&topic.id, &user.id)
        .await
        .unwrap());
    assert!(!votes.has_voted(&topic.id, &user.id).await.unwrap());
    assert_eq!(votes.count_by_topic(&topic.id).await.unwrap(), 0);

    // Removing a vote that is already gone reports a miss, not an error.
    assert!(!votes
        .delete_by_topic_and_user(&topic.id, &user.id)
        .await
        .unwrap());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_vote_rejected_by_unique_index() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = Arc::new(db.conn);

    let user = seed_user(conn.as_ref(), "eager").await.unwrap();
    let event = seed_event(conn.as_ref(), "devopsdays", "DevOpsDays").await.unwrap();
    let topic = seed_topic(conn.as_ref(), &event.id, &user.id, "gitops", "GitOps")
        .await
        .unwrap();

    seed_vote(conn.as_ref(), &topic.id, &user.id).await.unwrap();

    let votes = VoteRepository::new(conn);
    let id_gen = talkboard_common::IdGenerator::new();
    let duplicate = talkboard_db::entities::vote::ActiveModel {
        id: sea_orm::Set(id_gen.generate()),
        topic_id: sea_orm::Set(topic.id.clone()),
        user_id: sea_orm::Set(user.id.clone()),
        created_at: sea_orm::Set(chrono::Utc::now().into()),
    };

    let result = votes.create(duplicate).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_ranking_orders_by_votes_then_age() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = Arc::new(db.conn);

    let event = seed_event(conn.as_ref(), "pycon", "PyCon").await.unwrap();
    let creator = seed_user(conn.as_ref(), "creator").await.unwrap();

    // t1 inserted before t2; both end up with zero votes so creation
    // order decides between them. t3 takes three votes and leads.
    let t1 = seed_topic(conn.as_ref(), &event.id, &creator.id, "first", "First")
        .await
        .unwrap();
    let t2 = seed_topic(conn.as_ref(), &event.id, &creator.id, "second", "Second")
        .await
        .unwrap();
    let t3 = seed_topic(conn.as_ref(), &event.id, &creator.id, "third", "Third")
        .await
        .unwrap();

    for name in ["v1", "v2", "v3"] {
        let voter = seed_user(conn.as_ref(), name).await.unwrap();
        seed_vote(conn.as_ref(), &t3.id, &voter.id).await.unwrap();
    }

    let topics = TopicRepository::new(conn);
    let rows = topics.list_ranked_for_event(&event.id, 0, 20).await.unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].id, t3.id);
    assert_eq!(rows[0].vote_count, 3);
    assert_eq!(rows[1].id, t1.id);
    assert_eq!(rows[2].id, t2.id);
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_ranking_pagination() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = Arc::new(db.conn);

    let event = seed_event(conn.as_ref(), "fosdem", "FOSDEM").await.unwrap();
    let creator = seed_user(conn.as_ref(), "prolific").await.unwrap();

    for i in 0..25 {
        seed_topic(
            conn.as_ref(),
            &event.id,
            &creator.id,
            &format!("topic-{i}"),
            &format!("Topic {i}"),
        )
        .await
        .unwrap();
    }

    let topics = TopicRepository::new(conn);

    let first = topics.list_ranked_for_event(&event.id, 0, 20).await.unwrap();
    assert_eq!(first.len(), 20);

    let second = topics.list_ranked_for_event(&event.id, 20, 20).await.unwrap();
    assert_eq!(second.len(), 5);

    let past_end = topics.list_ranked_for_event(&event.id, 40, 20).await.unwrap();
    assert!(past_end.is_empty());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_soft_deleted_topic_hidden_but_slug_reserved() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = Arc::new(db.conn);

    let event = seed_event(conn.as_ref(), "kubecon", "KubeCon").await.unwrap();
    let creator = seed_user(conn.as_ref(), "owner").await.unwrap();
    seed_topic(conn.as_ref(), &event.id, &creator.id, "service-mesh", "Service Mesh")
        .await
        .unwrap();

    let topics = TopicRepository::new(conn);
    topics.soft_delete("service-mesh").await.unwrap();

    // Gone from reads...
    assert!(topics.find_by_slug("service-mesh").await.unwrap().is_none());
    let rows = topics.list_ranked_for_event(&event.id, 0, 20).await.unwrap();
    assert!(rows.is_empty());

    // ...but the slug stays taken.
    assert!(topics.slug_exists("service-mesh").await.unwrap());

    // Repeating the delete is a no-op.
    topics.soft_delete("service-mesh").await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}
