//! Core business logic for talkboard.

pub mod services;

pub use services::*;
