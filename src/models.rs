//! Search-side data handed to the formatter: ranked documents and the quotes an answer cites.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Connector a document was indexed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    Slack,
    Web,
    GoogleDrive,
    Github,
    Gitlab,
    Confluence,
    Jira,
    Notion,
    Zulip,
    Guru,
    Linear,
    Hubspot,
    Document360,
    Gong,
    Productboard,
    File,
}

impl DocumentSource {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentSource::Slack => "slack",
            DocumentSource::Web => "web",
            DocumentSource::GoogleDrive => "google_drive",
            DocumentSource::Github => "github",
            DocumentSource::Gitlab => "gitlab",
            DocumentSource::Confluence => "confluence",
            DocumentSource::Jira => "jira",
            DocumentSource::Notion => "notion",
            DocumentSource::Zulip => "zulip",
            DocumentSource::Guru => "guru",
            DocumentSource::Linear => "linear",
            DocumentSource::Hubspot => "hubspot",
            DocumentSource::Document360 => "document360",
            DocumentSource::Gong => "gong",
            DocumentSource::Productboard => "productboard",
            DocumentSource::File => "file",
        }
    }

    /// Chat channels are shown as `#name`.
    pub fn display_name(self, semantic_identifier: &str) -> String {
        match self {
            DocumentSource::Slack => format!("#{semantic_identifier}"),
            _ => semantic_identifier.to_string(),
        }
    }
}

/// Values carried by the per-document feedback selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFeedbackType {
    Endorse,
    Reject,
    Hide,
}

impl SearchFeedbackType {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchFeedbackType::Endorse => "endorse",
            SearchFeedbackType::Reject => "reject",
            SearchFeedbackType::Hide => "hide",
        }
    }
}

/// One ranked hit from the search pipeline. Its rank is its position in the result list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchDoc {
    pub document_id: String,
    /// Human-readable name (page title, channel name, file name)
    pub semantic_identifier: String,
    pub source_type: DocumentSource,
    pub link: Option<String>,
    /// RFC 3339 timestamp of the last update, if the connector reports one
    pub updated_at: Option<DateTime<Utc>>,
    /// Excerpts with matches wrapped in `<hi>...</hi>`
    #[serde(default)]
    pub match_highlights: Vec<String>,
}

/// A passage the answer cites.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Quote {
    pub quote: String,
    pub document_id: String,
    pub link: Option<String>,
    pub semantic_identifier: String,
    pub source_type: DocumentSource,
}

impl Quote {
    /// A quote can only be rendered with its text, document id, name and link all present.
    pub fn is_renderable(&self) -> bool {
        !self.quote.is_empty()
            && !self.document_id.is_empty()
            && !self.semantic_identifier.is_empty()
            && self.link.as_deref().is_some_and(|l| !l.is_empty())
    }
}
