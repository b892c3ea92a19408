use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use stt::{SttProvider, TranscriptionRequest, TranscriptionResponse};
use voxrelay_config::Config;
use voxrelay_llm::{CompletionRequest, Message, Provider};
use voxrelay_telemetry::{KeyValue, VoiceMetrics, metrics::record_duration};

use crate::{
    error::{GenerationError, Result, VoiceError},
    media::{MediaTypes, staging_suffix},
    staging::StagedUpload,
    types::{Upload, VoiceResponse},
};

/// Per-request parameters taken from configuration
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Model named in every transcription request
    pub transcription_model: String,
    /// Language hint forwarded to the transcription service
    pub language: Option<String>,
    /// Prompt forwarded to the transcription service
    pub prompt: Option<String>,
    /// Model named in every chat-completion request and in the response
    pub generation_model: String,
    /// System instruction sent ahead of the transcript
    pub system_prompt: String,
    /// Directory for staged uploads, OS temp dir when `None`
    pub staging_dir: Option<PathBuf>,
    /// Request body limit, reported when an upload exceeds it
    pub max_upload_bytes: usize,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            transcription_model: config.stt.model.clone(),
            language: config.stt.language.clone(),
            prompt: config.stt.prompt.clone(),
            generation_model: config.llm.model.clone(),
            system_prompt: config.voice.system_prompt.clone(),
            staging_dir: config.voice.staging_dir.clone(),
            max_upload_bytes: config.voice.max_upload_bytes,
        }
    }
}

/// Transcribe-then-reply pipeline shared by all voice requests
///
/// Holds no per-request state; the service clients are injected so tests
/// and alternative backends can swap them.
pub struct VoicePipeline {
    transcriber: Arc<dyn SttProvider>,
    generator: Arc<dyn Provider>,
    media: MediaTypes,
    settings: PipelineSettings,
    metrics: VoiceMetrics,
}

impl VoicePipeline {
    pub fn new(
        transcriber: Arc<dyn SttProvider>,
        generator: Arc<dyn Provider>,
        media: MediaTypes,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            transcriber,
            generator,
            media,
            settings,
            metrics: VoiceMetrics::new(),
        }
    }

    /// Build the pipeline with the service clients named in `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            stt::build_provider(&config.stt),
            voxrelay_llm::build_provider(&config.llm),
            MediaTypes::new(&config.voice.allowed_content_types),
            PipelineSettings::from_config(config),
        )
    }

    pub fn media_types(&self) -> &MediaTypes {
        &self.media
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Turn one upload into a transcript and a reply
    ///
    /// The declared media type is checked before anything touches the
    /// disk. The staged copy is removed before this returns, whatever the
    /// outcome, and also when the returned future is dropped early.
    pub async fn process(&self, upload: Upload) -> Result<VoiceResponse> {
        let start = Instant::now();

        let result = self.run(upload).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.outcome(),
        };

        let attributes = [KeyValue::new("outcome", outcome)];
        self.metrics.requests.add(1, &attributes);
        record_duration(&self.metrics.request_duration, start, &attributes);

        match &result {
            Ok(_) => tracing::debug!("voice request complete"),
            Err(e) if e.status_code().is_server_error() => tracing::error!(outcome, "voice request failed: {e}"),
            Err(e) => tracing::debug!(outcome, "voice request rejected: {e}"),
        }

        result
    }

    /// Count a request that failed before reaching the pipeline
    pub fn record_rejection(&self, error: &VoiceError) {
        self.metrics
            .requests
            .add(1, &[KeyValue::new("outcome", error.outcome())]);

        tracing::debug!(outcome = error.outcome(), "voice request rejected: {error}");
    }

    async fn run(&self, upload: Upload) -> Result<VoiceResponse> {
        self.media.check(Some(&upload.content_type))?;

        tracing::debug!(
            content_type = %upload.content_type,
            file_name = upload.file_name.as_deref().unwrap_or_default(),
            bytes = upload.bytes.len(),
            "processing voice upload"
        );

        let staged = StagedUpload::write(
            self.settings.staging_dir.as_deref(),
            staging_suffix(&upload.content_type),
            &upload.bytes,
        )
        .await
        .map_err(VoiceError::Staging)?;

        if staged.is_empty() {
            tracing::warn!("staged upload is empty, forwarding it anyway");
        }
        self.metrics.upload_size.record(staged.len(), &[]);

        let transcript = self.transcribe(&staged, &upload.content_type).await;
        staged.discard();
        let transcript = transcript?;

        let reply = self.generate(&transcript.text).await?;

        Ok(VoiceResponse {
            text: transcript.text,
            response: reply,
            model: self.settings.generation_model.clone(),
        })
    }

    async fn transcribe(&self, staged: &StagedUpload, content_type: &str) -> Result<TranscriptionResponse> {
        let file = staged.open().await.map_err(VoiceError::Staging)?;

        let request = TranscriptionRequest {
            file,
            file_name: staged.file_name(),
            content_type: content_type.to_owned(),
            model: self.settings.transcription_model.clone(),
            language: self.settings.language.clone(),
            prompt: self.settings.prompt.clone(),
        };

        let start = Instant::now();
        let result = self.transcriber.transcribe(request).await;

        record_duration(
            &self.metrics.stt_duration,
            start,
            &[
                KeyValue::new("provider", self.transcriber.name().to_owned()),
                KeyValue::new("success", result.is_ok()),
            ],
        );

        result.map_err(VoiceError::Transcription)
    }

    async fn generate(&self, transcript: &str) -> Result<String> {
        let request = CompletionRequest {
            model: self.settings.generation_model.clone(),
            messages: vec![
                Message::system(self.settings.system_prompt.as_str()),
                Message::user(transcript),
            ],
        };

        let start = Instant::now();
        let result = self.generator.complete(&request).await;

        record_duration(
            &self.metrics.llm_duration,
            start,
            &[
                KeyValue::new("provider", self.generator.name().to_owned()),
                KeyValue::new("success", result.is_ok()),
            ],
        );

        let response = result.map_err(|e| VoiceError::Generation(e.into()))?;

        if response.choices.is_empty() {
            return Err(VoiceError::Generation(GenerationError::NoChoices));
        }

        response
            .first_content()
            .map(ToOwned::to_owned)
            .ok_or(VoiceError::Generation(GenerationError::EmptyContent))
    }
}
