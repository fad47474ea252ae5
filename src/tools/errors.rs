use rmcp::ErrorData as McpError;

use crate::llm::LlmError;
use crate::rephrase::RephraseError;
use crate::slack::FeedbackIdError;

pub(super) fn retriable_error(e: &impl std::fmt::Display) -> McpError {
    McpError::internal_error(format!("{e} (retriable)"), None)
}

pub(super) fn llm_to_mcp_error(e: LlmError) -> McpError {
    match &e {
        LlmError::ApiKeyNotSet => McpError::invalid_params(e.to_string(), None),
        LlmError::RateLimited => retriable_error(&e),
        LlmError::QuotaExhausted(_) => McpError::invalid_params(
            format!("{e}. Check your API billing at https://aistudio.google.com"),
            None,
        ),
        _ => McpError::internal_error(e.to_string(), None),
    }
}

pub(super) fn rephrase_to_mcp_error(e: RephraseError) -> McpError {
    match e {
        RephraseError::EmptyQuery => McpError::invalid_params(e.to_string(), None),
        RephraseError::Llm(e) => llm_to_mcp_error(e),
    }
}

pub(super) fn feedback_to_mcp_error(e: FeedbackIdError) -> McpError {
    McpError::invalid_params(e.to_string(), None)
}

pub(super) fn json_error(e: serde_json::Error) -> McpError {
    McpError::internal_error(format!("failed to serialize output: {e}"), None)
}
