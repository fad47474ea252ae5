use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    fn label(self) -> &'static str {
        match self {
            MessageRole::User => "USER",
            MessageRole::Assistant => "ASSISTANT",
            MessageRole::System => "SYSTEM",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub message: String,
    pub token_count: usize,
}

impl ChatMessage {
    /// Token count is estimated at four characters per token.
    pub fn new(role: MessageRole, message: impl Into<String>) -> Self {
        let message = message.into();
        let token_count = message.chars().count().div_ceil(4);
        Self {
            role,
            message,
            token_count,
        }
    }
}

/// Render the most recent messages that fit in `token_limit`, oldest first, as
/// `ROLE:\nmessage` blocks separated by blank lines.
pub fn combine_message_chain(messages: &[ChatMessage], token_limit: usize) -> String {
    let mut used = 0;
    let mut kept: Vec<String> = Vec::new();

    for message in messages.iter().rev() {
        if used + message.token_count > token_limit {
            break;
        }
        kept.push(format!("{}:\n{}", message.role.label(), message.message));
        used += message.token_count;
    }

    kept.reverse();
    kept.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimates_tokens_from_chars() {
        assert_eq!(ChatMessage::new(MessageRole::User, "").token_count, 0);
        assert_eq!(ChatMessage::new(MessageRole::User, "abcde").token_count, 2);
    }

    #[test]
    fn combines_in_chronological_order() {
        let history = vec![
            ChatMessage::new(MessageRole::User, "how do I deploy?"),
            ChatMessage::new(MessageRole::Assistant, "run make deploy"),
        ];
        assert_eq!(
            combine_message_chain(&history, 1000),
            "USER:\nhow do I deploy?\n\nASSISTANT:\nrun make deploy"
        );
    }

    #[test]
    fn drops_oldest_messages_over_budget() {
        let history = vec![
            ChatMessage::new(MessageRole::User, "a".repeat(40)),
            ChatMessage::new(MessageRole::Assistant, "b".repeat(20)),
            ChatMessage::new(MessageRole::User, "c".repeat(20)),
        ];
        let combined = combine_message_chain(&history, 10);
        assert!(!combined.contains('a'));
        assert!(combined.starts_with("ASSISTANT:"));
        assert!(combined.ends_with(&"c".repeat(20)));
    }

    #[test]
    fn stops_at_first_message_that_does_not_fit() {
        let history = vec![
            ChatMessage::new(MessageRole::User, "old"),
            ChatMessage::new(MessageRole::Assistant, "x".repeat(400)),
            ChatMessage::new(MessageRole::User, "new"),
        ];
        assert_eq!(combine_message_chain(&history, 50), "USER:\nnew");
    }

    #[test]
    fn empty_history_is_empty_string() {
        assert_eq!(combine_message_chain(&[], 100), "");
    }

    #[test]
    fn role_deserializes_lowercase() {
        let role: MessageRole = serde_json::from_str(r#""assistant""#).unwrap();
        assert_eq!(role, MessageRole::Assistant);
    }
}
