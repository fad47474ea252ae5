//! Query rewriting before search: history-aware rephrasing and multilingual expansion.

mod expansion;
mod history;
mod prompts;

pub use expansion::{ExpansionMode, multilingual_query_expansion, parse_languages};
pub use history::{ChatMessage, MessageRole, combine_message_chain};

use tracing::{debug, instrument};

use crate::llm::{LlmClient, LlmError};
use prompts::Prompt;

pub const DEFAULT_SIZE_HEURISTIC: usize = 200;
pub const DEFAULT_PUNCTUATION_HEURISTIC: usize = 10;
pub const DEFAULT_HISTORY_TOKEN_LIMIT: usize = 3000;

#[derive(Debug, thiserror::Error)]
pub enum RephraseError {
    #[error("can't rephrase or search an empty query")]
    EmptyQuery,

    #[error("{0}")]
    Llm(#[from] LlmError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RephraseSettings {
    /// Queries at least this many characters long are passed through.
    pub size_heuristic: usize,
    /// Queries with at least this many ASCII punctuation characters are passed through.
    pub punctuation_heuristic: usize,
    /// Token budget for the history block.
    pub history_token_limit: usize,
}

impl Default for RephraseSettings {
    fn default() -> Self {
        Self {
            size_heuristic: DEFAULT_SIZE_HEURISTIC,
            punctuation_heuristic: DEFAULT_PUNCTUATION_HEURISTIC,
            history_token_limit: DEFAULT_HISTORY_TOKEN_LIMIT,
        }
    }
}

impl RephraseSettings {
    /// Long inputs are likely pasted text the user wants matched closely; punctuation-heavy
    /// inputs are likely code or logs. Neither benefits from rewriting.
    fn keeps_verbatim(&self, query: &str) -> bool {
        query.chars().count() >= self.size_heuristic
            || count_punctuation(query) >= self.punctuation_heuristic
    }
}

pub fn count_punctuation(text: &str) -> usize {
    text.chars().filter(char::is_ascii_punctuation).count()
}

/// Rewrite the latest user message into a standalone query using the prior conversation.
#[instrument(skip_all, fields(history_len = history.len()))]
pub async fn history_based_query_rephrase(
    client: &impl LlmClient,
    query_message: &ChatMessage,
    history: &[ChatMessage],
    settings: &RephraseSettings,
) -> Result<String, RephraseError> {
    let user_query = query_message.message.as_str();
    if user_query.is_empty() {
        return Err(RephraseError::EmptyQuery);
    }

    if settings.keeps_verbatim(user_query) {
        debug!("query kept verbatim");
        return Ok(user_query.to_string());
    }

    let history_str = combine_message_chain(history, settings.history_token_limit);
    rephrase_with_history(client, user_query, &history_str).await
}

/// Same as [`history_based_query_rephrase`], for callers that already hold the thread as text.
/// Without history there is nothing to fold in, so the query comes back unchanged.
#[instrument(skip_all, fields(history_len = history_str.len()))]
pub async fn thread_based_query_rephrase(
    client: &impl LlmClient,
    user_query: &str,
    history_str: &str,
    settings: &RephraseSettings,
) -> Result<String, RephraseError> {
    if history_str.is_empty() || settings.keeps_verbatim(user_query) {
        debug!("query kept verbatim");
        return Ok(user_query.to_string());
    }

    rephrase_with_history(client, user_query, history_str).await
}

async fn rephrase_with_history(
    client: &impl LlmClient,
    question: &str,
    history_str: &str,
) -> Result<String, RephraseError> {
    let prompt = Prompt::history_rephrase(question, history_str);
    let rephrased = client.invoke(&prompt.render()).await?;
    debug!(template = ?prompt.template(), rephrased = %rephrased, "rephrased combined query");
    Ok(rephrased)
}
