//! Trello card synchronization for GitHub CI events.
//!
//! This crate provides:
//! - REST client for the Trello API (board labels/members, list cards, attachments)
//! - GitHub event context reader for issue and pull-request payloads
//! - Reconciliation workflows that create or move cards per event
//! - Environment-based configuration for credentials and target lists

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Many async API methods can fail

pub mod config;
pub mod error;
pub mod event;
pub mod models;
pub mod trello;
pub mod workflows;

pub use config::Config;
pub use error::SyncError;
pub use event::{Issue, PullRequest};
pub use models::*;
pub use trello::TrelloClient;
