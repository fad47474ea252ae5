use std::env;
use std::str::FromStr;

use crate::rephrase::{ExpansionMode, RephraseSettings};
use crate::slack::DEFAULT_NUM_DOCS_TO_DISPLAY;

const DEFAULT_EXPANSION_WORKERS: usize = 4;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error("{key} must be greater than 0")]
    Zero { key: &'static str },
}

/// Runtime knobs, read once from `DOCBOT_*` environment variables.
/// Gemini credentials are read separately by `GeminiClient::from_env`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub num_docs_to_display: usize,
    pub rephrase: RephraseSettings,
    /// Comma-separated languages used when a caller does not name any.
    pub expansion_languages: String,
    pub parallel_expansion: bool,
    pub expansion_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_docs_to_display: DEFAULT_NUM_DOCS_TO_DISPLAY,
            rephrase: RephraseSettings::default(),
            expansion_languages: String::new(),
            parallel_expansion: true,
            expansion_workers: DEFAULT_EXPANSION_WORKERS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let config = Self {
            num_docs_to_display: parse(&get, "DOCBOT_NUM_DOCS_TO_DISPLAY", defaults.num_docs_to_display)?,
            rephrase: RephraseSettings {
                size_heuristic: parse(
                    &get,
                    "DOCBOT_REPHRASE_SIZE_HEURISTIC",
                    defaults.rephrase.size_heuristic,
                )?,
                punctuation_heuristic: parse(
                    &get,
                    "DOCBOT_REPHRASE_PUNCTUATION_HEURISTIC",
                    defaults.rephrase.punctuation_heuristic,
                )?,
                history_token_limit: parse(
                    &get,
                    "DOCBOT_HISTORY_TOKEN_LIMIT",
                    defaults.rephrase.history_token_limit,
                )?,
            },
            expansion_languages: get("DOCBOT_EXPANSION_LANGUAGES").unwrap_or_default(),
            parallel_expansion: parse(&get, "DOCBOT_PARALLEL_EXPANSION", defaults.parallel_expansion)?,
            expansion_workers: parse(&get, "DOCBOT_EXPANSION_WORKERS", defaults.expansion_workers)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("DOCBOT_NUM_DOCS_TO_DISPLAY", self.num_docs_to_display),
            ("DOCBOT_REPHRASE_SIZE_HEURISTIC", self.rephrase.size_heuristic),
            ("DOCBOT_REPHRASE_PUNCTUATION_HEURISTIC", self.rephrase.punctuation_heuristic),
            ("DOCBOT_HISTORY_TOKEN_LIMIT", self.rephrase.history_token_limit),
            ("DOCBOT_EXPANSION_WORKERS", self.expansion_workers),
        ];
        match positive.into_iter().find(|(_, value)| *value == 0) {
            Some((key, _)) => Err(ConfigError::Zero { key }),
            None => Ok(()),
        }
    }

    pub fn expansion_mode(&self) -> ExpansionMode {
        if self.parallel_expansion {
            ExpansionMode::Parallel {
                max_workers: self.expansion_workers,
            }
        } else {
            ExpansionMode::Sequential
        }
    }
}

fn parse<T: FromStr>(
    get: &impl Fn(&'static str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
