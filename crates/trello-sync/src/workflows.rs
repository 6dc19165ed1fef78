//! Reconciliation workflows between GitHub events and Trello cards.
//!
//! Each workflow is one invocation: read board reference data, compute the
//! target card parameters, perform a single card mutation. Nothing is cached
//! or persisted across invocations.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::SyncError;
use crate::event::{Issue, PullRequest};
use crate::models::{Card, CardCreateParams};
use crate::trello::TrelloClient;

static ISSUE_NUMBER: OnceLock<Regex> = OnceLock::new();

/// First `#<digits>` token in `text`, parsed as an issue number.
pub fn extract_issue_number(text: &str) -> Option<u64> {
    let pattern = ISSUE_NUMBER.get_or_init(|| Regex::new(r"#([0-9]+)").unwrap());
    pattern.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Create a card for a newly opened issue.
///
/// Board labels and members are fetched concurrently; issue label names and
/// assignee logins are matched against them by exact name, and the card is
/// created in the configured list with the issue's title, body, and URL.
pub async fn create_card_for_issue(
    client: &TrelloClient,
    config: &Config,
    issue: &Issue,
) -> Result<Card, SyncError> {
    let list_id = config.require_list_id()?;

    let (labels, members) = tokio::try_join!(
        client.fetch_labels(&config.board_id),
        client.fetch_members(&config.board_id),
    )?;

    let label_ids = matching_ids(
        issue.labels.iter().map(|label| label.name.as_str()),
        &labels,
        |label| (label.name.as_str(), label.id.as_str()),
    );
    let member_ids = matching_ids(
        issue.assignees.iter().map(|assignee| assignee.login.as_str()),
        &members,
        |member| (member.username.as_str(), member.id.as_str()),
    );

    let params = CardCreateParams {
        issue_number: issue.number,
        title: issue.title.clone(),
        description: issue.body.clone().unwrap_or_default(),
        source_url: issue.html_url.clone(),
        member_ids: member_ids.join(","),
        label_ids: label_ids.join(","),
    };

    let card = client.create_card(list_id, &params).await?;
    info!(card_id = %card.id, card_name = %card.name, "Created card for issue");
    Ok(card)
}

/// Move the card referenced by an opened pull request and attach the PR URL.
pub async fn move_card_for_opened_pull_request(
    client: &TrelloClient,
    config: &Config,
    pull_request: &PullRequest,
) -> Result<Card, SyncError> {
    let card = move_card_for_pull_request(client, config, pull_request).await?;

    // Best-effort: the move already succeeded, an attachment failure only
    // loses the PR link on the card.
    if let Err(e) = client.attach_url(&card.id, &pull_request.html_url).await {
        warn!(card_id = %card.id, error = %e, "Failed to attach pull request URL to card");
    }

    Ok(card)
}

/// Move the card referenced by a closed pull request.
///
/// Merged and closed-without-merge are not differentiated.
pub async fn move_card_for_closed_pull_request(
    client: &TrelloClient,
    config: &Config,
    pull_request: &PullRequest,
) -> Result<Card, SyncError> {
    move_card_for_pull_request(client, config, pull_request).await
}

/// Locate the card carrying the PR's issue-number token in the departure
/// list and move it to the destination list with the requested reviewers
/// merged into its member set.
async fn move_card_for_pull_request(
    client: &TrelloClient,
    config: &Config,
    pull_request: &PullRequest,
) -> Result<Card, SyncError> {
    let departure_list_id = config.require_departure_list_id()?;
    let destination_list_id = config.require_destination_list_id()?;

    // Resolve the issue reference before touching the network.
    let body = pull_request.body.as_deref().unwrap_or_default();
    let issue_number = extract_issue_number(body).ok_or(SyncError::MissingIssueReference)?;

    let (members, cards) = tokio::try_join!(
        client.fetch_members(&config.board_id),
        client.fetch_cards_in_list(departure_list_id),
    )?;

    let additional_member_ids = matching_ids(
        pull_request
            .requested_reviewers
            .iter()
            .map(|reviewer| reviewer.login.as_str()),
        &members,
        |member| (member.username.as_str(), member.id.as_str()),
    );

    let card = find_card_by_issue_number(&cards, issue_number)?;

    // Trello replaces idMembers wholesale, so merge before the update.
    // Concatenation, not set union: duplicates pass through as-is.
    let mut member_ids = card.id_members.clone();
    member_ids.extend(additional_member_ids);

    let moved = client
        .move_card(&card.id, destination_list_id, &member_ids.join(","))
        .await?;
    info!(
        card_id = %moved.id,
        destination_list_id = %destination_list_id,
        "Moved card for pull request"
    );
    Ok(moved)
}

/// Ids of board entries whose name exactly matches a wanted name.
///
/// Case-sensitive, in wanted order; a name repeated on the event side
/// contributes its id once per repetition (not deduplicated).
fn matching_ids<'a, T>(
    wanted: impl IntoIterator<Item = &'a str>,
    entries: &[T],
    key: impl Fn(&T) -> (&str, &str),
) -> Vec<String> {
    let mut ids = Vec::new();
    for name in wanted {
        for entry in entries {
            let (entry_name, entry_id) = key(entry);
            if entry_name == name {
                ids.push(entry_id.to_string());
            }
        }
    }
    ids
}

/// The single departure-list card whose name carries `#<issue_number>`.
///
/// Zero matches is `CardNotFound`; more than one is `AmbiguousMatch`, so a
/// duplicate token can never silently pick an arbitrary card.
fn find_card_by_issue_number(cards: &[Card], issue_number: u64) -> Result<&Card, SyncError> {
    let mut matches = cards
        .iter()
        .filter(|card| extract_issue_number(&card.name) == Some(issue_number));

    let found = matches.next().ok_or(SyncError::CardNotFound { issue_number })?;
    let count = 1 + matches.count();
    if count > 1 {
        return Err(SyncError::AmbiguousMatch {
            issue_number,
            count,
        });
    }
    Ok(found)
}
