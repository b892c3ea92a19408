#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Client for speech-to-text services

mod error;
mod http_client;
mod provider;
mod types;

use std::sync::Arc;

use voxrelay_config::{SttConfig, SttProviderType};

pub use error::{Result, SttError};
pub use provider::{SttProvider, whisper::WhisperProvider};
pub use types::{TranscriptionRequest, TranscriptionResponse};

/// Build the configured transcription provider
pub fn build_provider(config: &SttConfig) -> Arc<dyn SttProvider> {
    let provider: Arc<dyn SttProvider> = match config.provider_type {
        SttProviderType::Whisper => Arc::new(WhisperProvider::new(
            "whisper".to_string(),
            config.api_key.clone(),
            config.base_url.clone(),
        )),
    };

    tracing::debug!(provider = provider.name(), model = %config.model, "STT provider initialized");

    provider
}
