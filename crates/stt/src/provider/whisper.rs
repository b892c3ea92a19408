use async_trait::async_trait;
use reqwest::{
    Body, Client,
    multipart::{Form, Part},
};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{
    error::SttError,
    http_client::http_client,
    types::{TranscriptionRequest, TranscriptionResponse},
};

use super::SttProvider;

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// `OpenAI` Whisper STT provider
pub struct WhisperProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    name: String,
}

impl WhisperProvider {
    pub fn new(name: String, api_key: SecretString, base_url: Option<Url>) -> Self {
        let base_url = base_url.map_or_else(
            || DEFAULT_OPENAI_API_URL.to_string(),
            |url| url.as_str().trim_end_matches('/').to_string(),
        );

        Self {
            client: http_client(),
            base_url,
            api_key,
            name,
        }
    }

    fn transcriptions_url(&self) -> String {
        format!("{}/audio/transcriptions", self.base_url)
    }
}

#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

#[async_trait]
impl SttProvider for WhisperProvider {
    async fn transcribe(&self, request: TranscriptionRequest) -> crate::error::Result<TranscriptionResponse> {
        let length = request.file.metadata().await?.len();

        tracing::debug!(
            provider = %self.name,
            bytes = length,
            model = %request.model,
            "Whisper transcription request"
        );

        let file_part = Part::stream_with_length(Body::from(request.file), length)
            .file_name(request.file_name)
            .mime_str(&request.content_type)
            .map_err(|e| SttError::InvalidRequest(format!("Invalid content type: {e}")))?;

        let mut form = Form::new().part("file", file_part).text("model", request.model);

        if let Some(language) = request.language {
            form = form.text("language", language);
        }

        if let Some(prompt) = request.prompt {
            form = form.text("prompt", prompt);
        }

        let response = self
            .client
            .post(self.transcriptions_url())
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(provider = %self.name, "Whisper request failed: {e}");
                SttError::ConnectionError(format!("Failed to send request to Whisper: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!(provider = %self.name, "Whisper API error ({status}): {error_text}");

            return Err(SttError::from_status(status.as_u16(), error_text));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            tracing::error!(provider = %self.name, "Failed to parse Whisper response: {e}");
            SttError::InvalidResponse(e.to_string())
        })?;

        tracing::debug!(provider = %self.name, "Whisper transcription complete");

        Ok(TranscriptionResponse { text: result.text })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
