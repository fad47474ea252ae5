//! Prompt templates as typed records, rendered by a pure function.

const SECTION_SEP: &str = "--------------";

const LANGUAGE_REPHRASE: &str = "Rephrase the query in {target_language}.
If the query is already in {target_language}, repeat the ORIGINAL query back EXACTLY as it is, with no edits.
Never change proper nouns, technical terms, acronyms, or words you do not recognize.
Respond with the query only.

Query:
{query}";

/// `{sep}` is filled with `SECTION_SEP` before the caller's parameters.
const HISTORY_REPHRASE: &str = "Given the conversation below and a follow up input, rewrite the follow up as a SHORT, \
standalone search query that carries over any relevant context from the earlier messages.
Keep it as concise as possible: a compressed phrase of mostly keywords, not a full sentence.
If the topic clearly changed, ignore the earlier messages.
Drop anything that does not help retrieval.
If the follow up is an error message or a code snippet, repeat it back EXACTLY.

{sep}
Chat History:
{chat_history}
{sep}

Follow Up Input: {question}
Standalone query (respond with only the short query):";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    LanguageRephrase,
    HistoryRephrase,
}

impl PromptTemplate {
    fn text(self) -> &'static str {
        match self {
            PromptTemplate::LanguageRephrase => LANGUAGE_REPHRASE,
            PromptTemplate::HistoryRephrase => HISTORY_REPHRASE,
        }
    }
}

/// A template plus its named parameters, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt<'a> {
    template: PromptTemplate,
    params: Vec<(&'static str, &'a str)>,
}

impl<'a> Prompt<'a> {
    pub fn language_rephrase(query: &'a str, target_language: &'a str) -> Self {
        Self {
            template: PromptTemplate::LanguageRephrase,
            params: vec![("query", query), ("target_language", target_language)],
        }
    }

    pub fn history_rephrase(question: &'a str, chat_history: &'a str) -> Self {
        Self {
            template: PromptTemplate::HistoryRephrase,
            params: vec![
                ("sep", SECTION_SEP),
                ("question", question),
                ("chat_history", chat_history),
            ],
        }
    }

    pub fn template(&self) -> PromptTemplate {
        self.template
    }

    /// Substitute `{name}` placeholders in a single pass, so braces inside parameter values
    /// are never expanded. Unknown placeholders are left as written.
    pub fn render(&self) -> String {
        let text = self.template.text();
        let mut out = String::with_capacity(text.len() + 64);
        let mut rest = text;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let value = after.find('}').and_then(|close| {
                let name = &after[..close];
                self.params
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (*value, close))
            });
            match value {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_prompt_fills_every_placeholder() {
        let rendered = Prompt::language_rephrase("wie geht es", "English").render();
        assert!(rendered.starts_with("Rephrase the query in English."));
        assert!(rendered.ends_with("Query:\nwie geht es"));
        assert!(!rendered.contains('{'));
    }

    #[test]
    fn history_prompt_places_history_between_separators() {
        let rendered = Prompt::history_rephrase("and on staging?", "USER:\nhow do I deploy").render();
        assert!(rendered.contains("--------------\nChat History:\nUSER:\nhow do I deploy\n--------------"));
        assert!(rendered.contains("Follow Up Input: and on staging?\n"));
        assert!(!rendered.contains("{sep}"));
    }

    #[test]
    fn braces_in_values_are_not_expanded() {
        let rendered = Prompt::history_rephrase("{chat_history}", "fn main() {}").render();
        assert!(rendered.contains("Follow Up Input: {chat_history}\n"));
        assert!(rendered.contains("Chat History:\nfn main() {}\n"));
    }

    #[test]
    fn template_id_is_exposed() {
        assert_eq!(
            Prompt::language_rephrase("q", "French").template(),
            PromptTemplate::LanguageRephrase
        );
    }
}
