//! Text-generation model access: the `LlmClient` seam and its Gemini implementation.

pub mod client;
mod extract;
mod types;

pub use client::{GeminiClient, LlmClient, LlmError};
