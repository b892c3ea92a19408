//! Chat-completion client for voxrelay
//!
//! Provides a provider-agnostic request/response model and an
//! OpenAI-compatible backend.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod convert;
pub mod error;
mod http_client;
pub mod protocol;
pub mod provider;
pub mod types;

use std::sync::Arc;

use voxrelay_config::{LlmConfig, LlmProviderType};

pub use error::LlmError;
pub use provider::{Provider, openai::OpenAiProvider};
pub use types::{Choice, ChoiceMessage, CompletionRequest, CompletionResponse, FinishReason, Message, Role, Usage};

/// Build the configured chat-completion provider
pub fn build_provider(config: &LlmConfig) -> Arc<dyn Provider> {
    let provider: Arc<dyn Provider> = match config.provider_type {
        LlmProviderType::Openai => Arc::new(OpenAiProvider::new("openai".to_owned(), config)),
    };

    tracing::debug!(provider = provider.name(), model = %config.model, "LLM provider initialized");

    provider
}
