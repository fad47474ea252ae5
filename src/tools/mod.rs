mod errors;
mod params;

pub use params::{
    DecodeFeedbackIdParams, ExpandQueryParams, FormatResponseParams, RephraseQueryParams,
};

use std::time::Duration;

use reqwest::Client;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use tracing::{info, warn};

use errors::{feedback_to_mcp_error, json_error, llm_to_mcp_error, rephrase_to_mcp_error};

use crate::config::Config;
use crate::llm::{GeminiClient, LlmError};
use crate::rephrase::{
    ChatMessage, MessageRole, history_based_query_rephrase, multilingual_query_expansion,
    parse_languages, thread_based_query_rephrase,
};
use crate::slack::{
    QaResponse, document_feedback_options, documents_blocks, parse_feedback_id,
    qa_response_blocks, restate_blocks,
};

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Global HTTP client timeout covering DNS + connect + response body.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// MCP server handler providing Slack answer formatting and query rewriting tools.
///
/// Configuration via environment variables:
/// - `GEMINI_API_KEY`: enables rephrase_query/expand_query (optional)
/// - `DOCBOT_*`: display and rephrasing settings, see [`Config`]
#[derive(Clone)]
pub struct Docbot {
    gemini: Option<GeminiClient>,
    config: Config,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl Docbot {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(HTTP_TIMEOUT)
            .build()?;
        let gemini = GeminiClient::from_env(http)
            .inspect(|g| info!(model = g.model(), "Gemini client ready"))
            .inspect_err(|e| warn!("Gemini client not available: {e}"))
            .ok();
        Ok(Self {
            gemini,
            config,
            tool_router: Self::tool_router(),
        })
    }

    fn gemini(&self) -> Result<&GeminiClient, McpError> {
        self.gemini
            .as_ref()
            .ok_or_else(|| llm_to_mcp_error(LlmError::ApiKeyNotSet))
    }

    #[tool(
        name = "format_response",
        description = "Render an answer as Slack Block Kit JSON: optional restated question, AI answer with applied filters, like/dislike buttons, cited snippets grouped by document, and a list of reference documents with per-document feedback buttons. Returns a JSON array of blocks ready for chat.postMessage."
    )]
    async fn format_response(
        &self,
        Parameters(params): Parameters<FormatResponseParams>,
    ) -> Result<CallToolResult, McpError> {
        let num_docs = match params.num_docs {
            Some(0) => {
                return Err(McpError::invalid_params(
                    "num_docs must be greater than 0",
                    None,
                ));
            }
            Some(n) => n,
            None => self.config.num_docs_to_display,
        };

        info!(
            message_id = ?params.message_id,
            has_answer = params.answer.is_some(),
            documents = params.documents.len(),
            "tool:format_response"
        );

        let origin = params.origin.unwrap_or_default().into();
        let mut blocks = match params.query.as_deref() {
            Some(query) => restate_blocks(query, origin),
            None => vec![],
        };

        blocks.extend(qa_response_blocks(&QaResponse {
            message_id: params.message_id,
            answer: params.answer.as_deref(),
            quotes: params.quotes.as_deref(),
            source_filters: params.source_filters.as_deref(),
            time_cutoff: params.time_cutoff,
            favor_recent: params.favor_recent.unwrap_or(false),
            skip_quotes: params.skip_quotes.unwrap_or(false),
        }));

        if !params.documents.is_empty() {
            blocks.extend(documents_blocks(&params.documents, params.message_id, num_docs));
        }

        info!(blocks = blocks.len(), "format_response complete");
        json_result(&blocks)
    }

    #[tool(
        name = "document_feedback_options",
        description = "Return the Slack Block Kit section offering Up-Boost, Down-Boost, and Hide choices for a reference document. Show it after a user clicks a document's feedback button."
    )]
    async fn document_feedback_options(&self) -> Result<CallToolResult, McpError> {
        info!("tool:document_feedback_options");
        json_result(&[document_feedback_options()])
    }

    #[tool(
        name = "decode_feedback_id",
        description = "Decode a feedback id taken from a block id or button value into the answer message id and, for document buttons, the document id and its rank in the result list."
    )]
    async fn decode_feedback_id(
        &self,
        Parameters(params): Parameters<DecodeFeedbackIdParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(feedback_id = %params.feedback_id, "tool:decode_feedback_id");
        let decoded = parse_feedback_id(&params.feedback_id).map_err(feedback_to_mcp_error)?;
        json_result(&decoded)
    }

    #[tool(
        name = "rephrase_query",
        description = "Rewrite a follow-up message into a standalone search query using the earlier conversation. Very long or punctuation-heavy queries (pasted code, logs) are returned unchanged. Pass either structured `history` or pre-rendered `thread_history`."
    )]
    async fn rephrase_query(
        &self,
        Parameters(params): Parameters<RephraseQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(
            query_len = params.query.len(),
            history = params.history.len(),
            thread = params.thread_history.is_some(),
            "tool:rephrase_query"
        );

        let gemini = self.gemini()?;
        let settings = &self.config.rephrase;

        let rephrased = match params.thread_history {
            Some(thread) => {
                thread_based_query_rephrase(gemini, &params.query, &thread, settings).await
            }
            None => {
                let query = ChatMessage::new(MessageRole::User, params.query);
                let history: Vec<ChatMessage> =
                    params.history.into_iter().map(ChatMessage::from).collect();
                history_based_query_rephrase(gemini, &query, &history, settings).await
            }
        }
        .map_err(rephrase_to_mcp_error)?;

        info!(rephrased = %rephrased, "rephrase_query complete");
        Ok(CallToolResult::success(vec![Content::text(rephrased)]))
    }

    #[tool(
        name = "expand_query",
        description = "Rephrase a query into each of the given languages so documents written in any of them can be searched. Returns a JSON array of queries in the order the languages were listed."
    )]
    async fn expand_query(
        &self,
        Parameters(params): Parameters<ExpandQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        if params.query.trim().is_empty() {
            return Err(McpError::invalid_params("query must not be empty", None));
        }

        let languages = params
            .languages
            .unwrap_or_else(|| self.config.expansion_languages.clone());
        if parse_languages(&languages).is_empty() {
            return Err(McpError::invalid_params(
                "no languages given and DOCBOT_EXPANSION_LANGUAGES is not set",
                None,
            ));
        }

        info!(query = %params.query, languages = %languages, "tool:expand_query");

        let gemini = self.gemini()?;
        let expanded = multilingual_query_expansion(
            gemini,
            &params.query,
            &languages,
            self.config.expansion_mode(),
        )
        .await
        .map_err(llm_to_mcp_error)?;

        info!(queries = expanded.len(), "expand_query complete");
        json_result(&expanded)
    }
}

fn json_result(value: &impl Serialize) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(json_error)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool_handler]
impl ServerHandler for Docbot {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "docbot".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "docbot renders question-answering results as Slack Block Kit messages (format_response, document_feedback_options, decode_feedback_id) and rewrites user queries before search (rephrase_query, expand_query; these need GEMINI_API_KEY)."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
