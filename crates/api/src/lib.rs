//! HTTP API layer for talkboard.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: events, topic boards, topics, votes, session
//! - **Extractors**: authentication
//! - **Middleware**: session token resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
