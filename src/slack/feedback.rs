//! Feedback ids: opaque strings attached to buttons so a later click can be traced back to
//! the answer message (and document) it was rendered for.

use serde::Serialize;

pub const LIKE_ACTION_ID: &str = "feedback-like";
pub const DISLIKE_ACTION_ID: &str = "feedback-dislike";
pub const DOC_BUTTON_ACTION_ID: &str = "feedback-doc-button";

const ID_SEPARATOR: &str = ":;:";
const PREFIX_LEN: usize = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FeedbackIdError {
    #[error("document id must not be empty")]
    EmptyDocumentId,

    #[error("document id must not contain ':;:': {0}")]
    SeparatorInDocumentId(String),

    #[error("malformed feedback id: {0}")]
    Malformed(String),
}

/// Decoded feedback id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackId {
    pub message_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRef {
    pub document_id: String,
    pub rank: usize,
}

/// Id for an answer message.
///
/// A random letter prefix keeps block ids unique when Slack re-renders the same message.
pub fn build_feedback_id(message_id: u64) -> String {
    format!("{}{ID_SEPARATOR}{message_id}", random_prefix())
}

/// Id for one document listed under an answer message.
pub fn build_document_feedback_id(
    message_id: u64,
    document_id: &str,
    rank: usize,
) -> Result<String, FeedbackIdError> {
    if document_id.is_empty() {
        return Err(FeedbackIdError::EmptyDocumentId);
    }
    if document_id.contains(ID_SEPARATOR) {
        return Err(FeedbackIdError::SeparatorInDocumentId(
            document_id.to_string(),
        ));
    }

    Ok([
        random_prefix(),
        message_id.to_string(),
        document_id.to_string(),
        rank.to_string(),
    ]
    .join(ID_SEPARATOR))
}

fn random_prefix() -> String {
    (0..PREFIX_LEN).map(|_| fastrand::alphabetic()).collect()
}

pub fn parse_feedback_id(feedback_id: &str) -> Result<FeedbackId, FeedbackIdError> {
    let malformed = || FeedbackIdError::Malformed(feedback_id.to_string());

    let parts: Vec<&str> = feedback_id.split(ID_SEPARATOR).collect();
    let message_id = parts
        .get(1)
        .and_then(|id| id.parse::<u64>().ok())
        .ok_or_else(malformed)?;

    match parts.as_slice() {
        [_, _] => Ok(FeedbackId {
            message_id,
            document: None,
        }),
        [_, _, document_id, rank] if !document_id.is_empty() => Ok(FeedbackId {
            message_id,
            document: Some(DocumentRef {
                document_id: document_id.to_string(),
                rank: rank.parse().map_err(|_| malformed())?,
            }),
        }),
        _ => Err(malformed()),
    }
}
