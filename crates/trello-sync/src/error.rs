//! Error types for the synchronization workflows.

use thiserror::Error;

/// Errors that can occur while synchronizing a GitHub event to Trello.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport-level failure talking to the Trello API
    #[error("request to Trello API failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success response from the Trello API
    #[error("Trello API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response body did not match the expected structure
    #[error("failed to decode Trello API response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// No card in the departure list carries the issue-number token
    #[error("Card not found.")]
    CardNotFound { issue_number: u64 },

    /// More than one card in the departure list carries the issue-number token
    #[error("{count} cards in the departure list reference issue #{issue_number}")]
    AmbiguousMatch { issue_number: u64, count: usize },

    /// Pull request body lacks the expected issue reference
    #[error("pull request body contains no #<number> issue reference")]
    MissingIssueReference,

    /// Not running under a CI event context
    #[error("GITHUB_EVENT_PATH is not set")]
    MissingEventPath,

    /// Event payload file could not be read
    #[error("failed to read event payload from {path}: {source}")]
    EventRead {
        path: String,
        source: std::io::Error,
    },

    /// Event payload could not be decoded
    #[error("failed to decode event payload: {0}")]
    EventDecode(serde_json::Error),

    /// Event payload lacks the record this action needs
    #[error("event payload has no `{0}` record")]
    MissingEventRecord(&'static str),

    /// Required environment variable is missing or empty
    #[error("required environment variable {name} is not set")]
    MissingEnv { name: &'static str },
}
