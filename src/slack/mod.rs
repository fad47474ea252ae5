//! Slack Block Kit rendering for answers, quotes, and reference documents.

pub mod blocks;
pub mod feedback;
pub mod format;
pub mod text;

pub use feedback::{FeedbackIdError, parse_feedback_id};
pub use format::{
    DEFAULT_NUM_DOCS_TO_DISPLAY, MessageOrigin, QaResponse, document_feedback_options,
    documents_blocks, qa_response_blocks, restate_blocks,
};
