use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::models::{DocumentSource, Quote, SearchDoc};
use crate::rephrase::{ChatMessage, MessageRole};
use crate::slack::MessageOrigin;

/// Where the question was asked.
#[derive(Debug, Clone, Copy, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Channel or thread message; the user can already see their question
    #[default]
    Conversation,
    /// Slash command; the question is echoed above the answer
    SlashCommand,
}

impl From<Origin> for MessageOrigin {
    fn from(origin: Origin) -> Self {
        match origin {
            Origin::Conversation => MessageOrigin::Conversation,
            Origin::SlashCommand => MessageOrigin::SlashCommand,
        }
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct FormatResponseParams {
    /// The user's question, echoed back for slash commands
    pub query: Option<String>,
    /// "conversation" (default) or "slash_command"
    pub origin: Option<Origin>,
    /// Answer message id; enables like/dislike and per-document feedback buttons
    pub message_id: Option<u64>,
    /// Generated answer text (omit when no answer was found)
    pub answer: Option<String>,
    /// Passages cited by the answer
    pub quotes: Option<Vec<Quote>>,
    /// Ranked reference documents, best first
    #[serde(default)]
    pub documents: Vec<SearchDoc>,
    /// Source filters applied to the search
    pub source_filters: Option<Vec<DocumentSource>>,
    /// Only documents updated at or after this RFC 3339 time were searched
    pub time_cutoff: Option<DateTime<Utc>>,
    /// Whether recent documents were boosted (default: false)
    pub favor_recent: Option<bool>,
    /// Leave out the quotes section (default: false)
    pub skip_quotes: Option<bool>,
    /// Maximum reference documents to show (default: server setting)
    pub num_docs: Option<usize>,
}

#[derive(Deserialize, JsonSchema)]
pub struct DecodeFeedbackIdParams {
    /// Block id or button value produced by format_response
    pub feedback_id: String,
}

#[derive(Deserialize, JsonSchema)]
pub struct HistoryMessage {
    /// "user", "assistant", or "system"
    pub role: MessageRole,
    pub message: String,
}

impl From<HistoryMessage> for ChatMessage {
    fn from(m: HistoryMessage) -> Self {
        ChatMessage::new(m.role, m.message)
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct RephraseQueryParams {
    /// Latest user message
    pub query: String,
    /// Earlier messages, oldest first
    #[serde(default)]
    pub history: Vec<HistoryMessage>,
    /// Pre-rendered thread text; takes precedence over `history` when present
    pub thread_history: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
pub struct ExpandQueryParams {
    /// Query to rephrase
    pub query: String,
    /// Comma-separated target languages, e.g. "English, French" (default: server setting)
    pub languages: Option<String>,
}
