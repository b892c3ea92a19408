pub(crate) mod whisper;

use async_trait::async_trait;

use crate::types::{TranscriptionRequest, TranscriptionResponse};

/// Trait for STT provider implementations
#[async_trait]
pub trait SttProvider: Send + Sync {
    /// Transcribe the audio behind the request's file handle
    async fn transcribe(&self, request: TranscriptionRequest) -> crate::error::Result<TranscriptionResponse>;

    /// Get the provider name
    fn name(&self) -> &str;
}
