use tracing::{debug, instrument};

use super::prompts::Prompt;
use crate::concurrency::run_in_parallel;
use crate::llm::{LlmClient, LlmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionMode {
    Sequential,
    /// Up to `max_workers` model calls in flight.
    Parallel { max_workers: usize },
}

/// Split a comma-separated language list, dropping blanks.
pub fn parse_languages(languages: &str) -> Vec<&str> {
    languages
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Ask the model for `query` in one target language.
pub async fn rephrase_in_language(
    client: &impl LlmClient,
    query: &str,
    language: &str,
) -> Result<String, LlmError> {
    let prompt = Prompt::language_rephrase(query, language);
    let output = client.invoke(&prompt.render()).await?;
    debug!(language, output = %output, "multilingual rephrase");
    Ok(output)
}

/// One rephrasing per language, returned in the order the languages were listed.
#[instrument(skip(client, query), fields(query_len = query.len()))]
pub async fn multilingual_query_expansion(
    client: &impl LlmClient,
    query: &str,
    languages: &str,
    mode: ExpansionMode,
) -> Result<Vec<String>, LlmError> {
    let languages = parse_languages(languages);

    match mode {
        ExpansionMode::Sequential => {
            let mut rephrases = Vec::with_capacity(languages.len());
            for language in languages {
                rephrases.push(rephrase_in_language(client, query, language).await?);
            }
            Ok(rephrases)
        }
        ExpansionMode::Parallel { max_workers } => {
            // Calls own their language: a closure over borrowed `&str` yields a future
            // that fails the tool handler's `Send` bound.
            let owned: Vec<String> = languages.into_iter().map(str::to_owned).collect();
            let calls = owned.into_iter().map(|language| async move {
                rephrase_in_language(client, query, &language).await
            });
            run_in_parallel(calls, max_workers)
                .await
                .into_iter()
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockLlm;
    use std::time::Duration;

    fn language_of(prompt: &str) -> &str {
        prompt
            .strip_prefix("Rephrase the query in ")
            .and_then(|rest| rest.split('.').next())
            .unwrap_or("?")
    }

    fn echo_language(prompt: &str) -> Result<String, LlmError> {
        Ok(format!("[{}]", language_of(prompt)))
    }

    #[test]
    fn parses_and_trims_languages() {
        assert_eq!(parse_languages(" English, French ,,German "), ["English", "French", "German"]);
        assert!(parse_languages("").is_empty());
    }

    #[tokio::test]
    async fn sequential_calls_in_order() {
        let mock = MockLlm::new(echo_language);
        let result = multilingual_query_expansion(
            &mock,
            "wo ist das handbuch",
            "English, French",
            ExpansionMode::Sequential,
        )
        .await
        .unwrap();

        assert_eq!(result, ["[English]", "[French]"]);
        let prompts = mock.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].ends_with("wo ist das handbuch"));
    }

    #[tokio::test]
    async fn parallel_results_follow_input_order() {
        // The first language answers last.
        let mock = MockLlm::new(echo_language).with_delay(|prompt| match language_of(prompt) {
            "English" => Duration::from_millis(60),
            "French" => Duration::from_millis(30),
            _ => Duration::ZERO,
        });

        let result = multilingual_query_expansion(
            &mock,
            "query",
            "English,French,German",
            ExpansionMode::Parallel { max_workers: 3 },
        )
        .await
        .unwrap();

        assert_eq!(result, ["[English]", "[French]", "[German]"]);
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        let mock = MockLlm::new(|prompt| match language_of(prompt) {
            "French" => Err(LlmError::RateLimited),
            other => Ok(other.to_string()),
        });

        for mode in [ExpansionMode::Sequential, ExpansionMode::Parallel { max_workers: 2 }] {
            let err = multilingual_query_expansion(&mock, "q", "English,French", mode)
                .await
                .unwrap_err();
            assert!(matches!(err, LlmError::RateLimited), "mode {mode:?}");
        }
    }

    #[tokio::test]
    async fn no_languages_means_no_calls() {
        let mock = MockLlm::new(echo_language);
        let result = multilingual_query_expansion(&mock, "q", " , ", ExpansionMode::Sequential)
            .await
            .unwrap();
        assert!(result.is_empty());
        assert!(mock.prompts().is_empty());
    }
}
