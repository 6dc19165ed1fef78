//! REST client for the Trello API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::SyncError;
use crate::models::{Attachment, Card, CardCreateParams, Label, Member};

/// Trello API endpoint
const TRELLO_API_URL: &str = "https://api.trello.com";

/// Per-request timeout; a hung call fails the request instead of the run.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated Trello REST client.
///
/// Covers the board directory (labels, members) and the card repository
/// (cards in a list, create, move, attach). Every request carries the
/// `key`/`token` credential pair as query parameters.
#[derive(Debug, Clone)]
pub struct TrelloClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    api_token: String,
}

impl TrelloClient {
    /// Create a new Trello client.
    ///
    /// # Arguments
    /// * `api_key` - Trello API key
    /// * `api_token` - Trello API token
    pub fn new(api_key: &str, api_token: &str) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_url: TRELLO_API_URL.to_string(),
            api_key: api_key.to_string(),
            api_token: api_token.to_string(),
        })
    }

    /// Create a client against a custom API base URL (used by tests).
    pub fn with_url(api_key: &str, api_token: &str, api_url: &str) -> Result<Self, SyncError> {
        let mut client = Self::new(api_key, api_token)?;
        client.api_url = api_url.to_string();
        Ok(client)
    }

    /// List the labels defined on a board.
    #[instrument(skip(self))]
    pub async fn fetch_labels(&self, board_id: &str) -> Result<Vec<Label>, SyncError> {
        let url = format!("{}/1/boards/{board_id}/labels", self.api_url);
        self.read_json(self.client.get(&url)).await
    }

    /// List the members of a board.
    #[instrument(skip(self))]
    pub async fn fetch_members(&self, board_id: &str) -> Result<Vec<Member>, SyncError> {
        let url = format!("{}/1/boards/{board_id}/members", self.api_url);
        self.read_json(self.client.get(&url)).await
    }

    /// List all cards currently in a list.
    #[instrument(skip(self))]
    pub async fn fetch_cards_in_list(&self, list_id: &str) -> Result<Vec<Card>, SyncError> {
        let url = format!("{}/1/lists/{list_id}/cards", self.api_url);
        self.read_json(self.client.get(&url)).await
    }

    /// Create a card in a list.
    ///
    /// The card name embeds the issue reference as `[#<number>] <title>`, and
    /// `urlSource` makes the issue link render as the card's attachment
    /// preview.
    #[instrument(skip(self, params), fields(issue_number = params.issue_number))]
    pub async fn create_card(
        &self,
        list_id: &str,
        params: &CardCreateParams,
    ) -> Result<Card, SyncError> {
        let url = format!("{}/1/cards", self.api_url);
        let name = format!("[#{}] {}", params.issue_number, params.title);
        let form = [
            ("idList", list_id),
            ("keepFromSource", "all"),
            ("name", name.as_str()),
            ("desc", params.description.as_str()),
            ("urlSource", params.source_url.as_str()),
            ("idMembers", params.member_ids.as_str()),
            ("idLabels", params.label_ids.as_str()),
        ];
        self.read_json(self.client.post(&url).form(&form)).await
    }

    /// Move a card to another list, replacing its member set.
    ///
    /// `idMembers` is a full replace, not a merge; the caller pre-merges
    /// existing and additional members.
    #[instrument(skip(self, member_ids))]
    pub async fn move_card(
        &self,
        card_id: &str,
        destination_list_id: &str,
        member_ids: &str,
    ) -> Result<Card, SyncError> {
        let url = format!("{}/1/cards/{card_id}", self.api_url);
        let form = [("idList", destination_list_id), ("idMembers", member_ids)];
        self.read_json(self.client.put(&url).form(&form)).await
    }

    /// Add a link attachment to a card.
    #[instrument(skip(self, attached_url))]
    pub async fn attach_url(
        &self,
        card_id: &str,
        attached_url: &str,
    ) -> Result<Attachment, SyncError> {
        let url = format!("{}/1/cards/{card_id}/attachments", self.api_url);
        let form = [("url", attached_url)];
        self.read_json(self.client.post(&url).form(&form)).await
    }

    /// Attach credentials, send, and decode the response.
    async fn read_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, SyncError> {
        let response = request
            .query(&[
                ("key", self.api_key.as_str()),
                ("token", self.api_token.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Api { status, body });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Trello API response received");
        Ok(serde_json::from_str(&body)?)
    }
}
