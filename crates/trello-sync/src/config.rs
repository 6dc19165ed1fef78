//! Process configuration sourced from the environment.

use std::env;

use crate::error::SyncError;

/// Credentials and board identifiers for one invocation.
///
/// Constructed once at the program boundary and passed by reference into the
/// workflows. The list ids are optional here because each action needs a
/// different subset; the workflow that needs one resolves it through the
/// `require_*` accessors.
#[derive(Debug, Clone)]
pub struct Config {
    /// Trello API key.
    pub api_key: String,
    /// Trello API token.
    pub api_token: String,
    /// Target board.
    pub board_id: String,
    /// Destination list for new cards (issue-opened action).
    pub list_id: Option<String>,
    /// List scanned for existing cards (pull-request actions).
    pub departure_list_id: Option<String>,
    /// List matched cards are moved into (pull-request actions).
    pub destination_list_id: Option<String>,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Credentials and the board id are required; a missing or empty value is
    /// a reported configuration error naming the variable.
    pub fn from_env() -> Result<Self, SyncError> {
        Ok(Self {
            api_key: required("TRELLO_API_KEY")?,
            api_token: required("TRELLO_API_TOKEN")?,
            board_id: required("TRELLO_BOARD_ID")?,
            list_id: optional("TRELLO_LIST_ID"),
            departure_list_id: optional("TRELLO_DEPARTURE_LIST_ID"),
            destination_list_id: optional("TRELLO_DESTINATION_LIST_ID"),
        })
    }

    /// Destination list for new cards.
    pub fn require_list_id(&self) -> Result<&str, SyncError> {
        self.list_id.as_deref().ok_or(SyncError::MissingEnv {
            name: "TRELLO_LIST_ID",
        })
    }

    /// List scanned for existing cards.
    pub fn require_departure_list_id(&self) -> Result<&str, SyncError> {
        self.departure_list_id
            .as_deref()
            .ok_or(SyncError::MissingEnv {
                name: "TRELLO_DEPARTURE_LIST_ID",
            })
    }

    /// List matched cards are moved into.
    pub fn require_destination_list_id(&self) -> Result<&str, SyncError> {
        self.destination_list_id
            .as_deref()
            .ok_or(SyncError::MissingEnv {
                name: "TRELLO_DESTINATION_LIST_ID",
            })
    }
}

fn required(name: &'static str) -> Result<String, SyncError> {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(SyncError::MissingEnv { name })
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
