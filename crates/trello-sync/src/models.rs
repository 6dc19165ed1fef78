//! Trello entity type definitions.

use serde::Deserialize;

/// Board label
#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    /// Unique identifier
    pub id: String,
    /// Label name
    pub name: String,
}

/// Board member
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique identifier
    pub id: String,
    /// Member username
    pub username: String,
}

/// Card within a list
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier
    pub id: String,
    /// Card name; conventionally embeds the issue reference as `[#<number>] <title>`
    pub name: String,
    /// Members currently assigned to the card
    #[serde(default)]
    pub id_members: Vec<String>,
    /// List the card currently belongs to
    pub id_list: String,
}

/// Link attachment on a card
#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    /// Unique identifier
    pub id: String,
    /// Attached URL
    pub url: String,
}

/// Parameters for creating a card from an opened issue.
#[derive(Debug, Clone)]
pub struct CardCreateParams {
    /// Issue number embedded into the card name
    pub issue_number: u64,
    /// Issue title
    pub title: String,
    /// Card description (issue body)
    pub description: String,
    /// Issue URL, set as the card's attachment preview source
    pub source_url: String,
    /// Comma-joined member ids to assign
    pub member_ids: String,
    /// Comma-joined label ids to apply
    pub label_ids: String,
}
