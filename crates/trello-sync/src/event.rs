//! GitHub event context reader.
//!
//! The CI runner writes the triggering event payload to the file named by
//! `GITHUB_EVENT_PATH`. This module deserializes the record the selected
//! action needs; it does not interpret the payload beyond that.

use std::{env, fs};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::SyncError;

/// GitHub user reference
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    /// User login
    pub login: String,
}

/// Label on a GitHub issue
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubLabel {
    /// Label name
    pub name: String,
}

/// GitHub issue from an issue-opened event
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    /// Issue number
    pub number: u64,
    /// Issue title
    pub title: String,
    /// Issue body (markdown)
    #[serde(default)]
    pub body: Option<String>,
    /// HTML URL of the issue
    pub html_url: String,
    /// Assigned users
    #[serde(default)]
    pub assignees: Vec<GitHubUser>,
    /// Labels on the issue
    #[serde(default)]
    pub labels: Vec<GitHubLabel>,
    /// Created timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// GitHub pull request from a pull-request event
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// PR body; expected to reference the originating issue as `#<number>`
    #[serde(default)]
    pub body: Option<String>,
    /// HTML URL of the pull request
    pub html_url: String,
    /// Reviewers requested on the PR
    #[serde(default)]
    pub requested_reviewers: Vec<GitHubUser>,
}

/// Event payload envelope; only the record relevant to the action is kept.
#[derive(Debug, Deserialize)]
struct EventPayload {
    #[serde(default)]
    issue: Option<Issue>,
    #[serde(default)]
    pull_request: Option<PullRequest>,
}

/// Read the issue record from the current event context.
pub fn issue_opened() -> Result<Issue, SyncError> {
    load()?.issue.ok_or(SyncError::MissingEventRecord("issue"))
}

/// Read the pull-request record from the current event context.
pub fn pull_request() -> Result<PullRequest, SyncError> {
    load()?
        .pull_request
        .ok_or(SyncError::MissingEventRecord("pull_request"))
}

fn load() -> Result<EventPayload, SyncError> {
    let path = env::var("GITHUB_EVENT_PATH").map_err(|_| SyncError::MissingEventPath)?;
    let raw = fs::read_to_string(&path).map_err(|source| SyncError::EventRead { path, source })?;
    parse(&raw)
}

fn parse(raw: &str) -> Result<EventPayload, SyncError> {
    serde_json::from_str(raw).map_err(SyncError::EventDecode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to serialize tests that modify GITHUB_EVENT_PATH
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ISSUE_PAYLOAD: &str = r#"{
        "action": "opened",
        "issue": {
            "number": 42,
            "title": "Fix bug",
            "body": "Something is broken",
            "html_url": "https://github.com/acme/widget/issues/42",
            "assignees": [{"login": "alice"}, {"login": "bob"}],
            "labels": [{"name": "bug"}],
            "created_at": "2024-05-01T12:00:00Z"
        }
    }"#;

    const PULL_REQUEST_PAYLOAD: &str = r#"{
        "action": "opened",
        "pull_request": {
            "body": "Closes #42",
            "html_url": "https://github.com/acme/widget/pull/57",
            "requested_reviewers": [{"login": "carol"}]
        }
    }"#;

    #[test]
    fn test_parse_issue_payload() {
        let payload = parse(ISSUE_PAYLOAD).unwrap();
        let issue = payload.issue.unwrap();
        assert_eq!(issue.number, 42);
        assert_eq!(issue.title, "Fix bug");
        assert_eq!(issue.assignees.len(), 2);
        assert_eq!(issue.assignees[0].login, "alice");
        assert_eq!(issue.labels[0].name, "bug");
        assert!(issue.created_at.is_some());
        assert!(payload.pull_request.is_none());
    }

    #[test]
    fn test_parse_pull_request_payload() {
        let payload = parse(PULL_REQUEST_PAYLOAD).unwrap();
        let pull_request = payload.pull_request.unwrap();
        assert_eq!(pull_request.body.as_deref(), Some("Closes #42"));
        assert_eq!(pull_request.requested_reviewers[0].login, "carol");
    }

    #[test]
    fn test_optional_fields_default() {
        let payload = parse(
            r#"{"pull_request": {"html_url": "https://github.com/acme/widget/pull/3"}}"#,
        )
        .unwrap();
        let pull_request = payload.pull_request.unwrap();
        assert!(pull_request.body.is_none());
        assert!(pull_request.requested_reviewers.is_empty());
    }

    #[test]
    fn test_invalid_payload_is_decode_error() {
        let err = parse("not json").unwrap_err();
        assert!(matches!(err, SyncError::EventDecode(_)));
    }

    #[test]
    fn test_load_from_event_path() {
        let _lock = ENV_MUTEX.lock().unwrap();

        let path = env::temp_dir().join(format!("trello-sync-event-{}.json", std::process::id()));
        fs::write(&path, ISSUE_PAYLOAD).unwrap();
        env::set_var("GITHUB_EVENT_PATH", &path);

        let issue = issue_opened().unwrap();
        assert_eq!(issue.number, 42);

        // Wrong record for the action is its own error
        let err = pull_request().unwrap_err();
        assert!(matches!(err, SyncError::MissingEventRecord("pull_request")));

        env::remove_var("GITHUB_EVENT_PATH");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_event_path() {
        let _lock = ENV_MUTEX.lock().unwrap();
        env::remove_var("GITHUB_EVENT_PATH");

        let err = issue_opened().unwrap_err();
        assert!(matches!(err, SyncError::MissingEventPath));
    }
}
