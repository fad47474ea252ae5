use tracing::warn;

use super::types::GenerateContentResponse;

/// Concatenated text parts of the first candidate, `None` when the model returned nothing.
pub fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.as_ref().and_then(|c| c.first());

    let text: String = candidate
        .and_then(|c| c.content.as_ref())
        .map(|content| content.parts.iter().map(|p| p.text.as_str()).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        let reason = candidate
            .and_then(|c| c.finish_reason.as_deref())
            .unwrap_or("none");
        warn!(finish_reason = reason, "model returned empty text");
        return None;
    }

    Some(text.to_string())
}
