use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use voxrelay_llm::LlmError;

pub type Result<T> = std::result::Result<T, VoiceError>;

/// Voice endpoint errors with appropriate HTTP status codes
#[derive(Debug, Error)]
pub enum VoiceError {
    /// Declared media type is not on the allow-list
    #[error("Unsupported file type. Supported types: {}", allowed.join(", "))]
    UnsupportedMediaType { content_type: String, allowed: Vec<String> },

    /// Multipart body is malformed or lacks the audio field
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// Request body is not `multipart/form-data`
    #[error("Unsupported Content-Type, expected: 'Content-Type: multipart/form-data'")]
    NotMultipart,

    /// Request body exceeds the configured limit
    #[error("Request body is too large, limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// The upload could not be written to its temporary file
    #[error("Error processing audio file: {0}")]
    Staging(#[source] std::io::Error),

    /// The transcription service failed
    #[error("Error transcribing audio: {0}")]
    Transcription(#[source] stt::SttError),

    /// The chat-completion service failed or returned no reply
    #[error("Error generating response: {0}")]
    Generation(#[source] GenerationError),
}

/// Why the reply could not be produced
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error("response contained no choices")]
    NoChoices,

    #[error("first choice has no message content")]
    EmptyContent,
}

impl VoiceError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedMediaType { .. } | Self::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            Self::NotMultipart => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Staging(_) | Self::Transcription(_) | Self::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string for the response
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::UnsupportedMediaType { .. }
            | Self::InvalidUpload(_)
            | Self::NotMultipart
            | Self::PayloadTooLarge { .. } => "invalid_request_error",
            Self::Staging(_) => "io_error",
            Self::Transcription(_) => "transcription_error",
            Self::Generation(_) => "generation_error",
        }
    }

    /// Short label used for metrics and logs
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::UnsupportedMediaType { .. } => "unsupported_media_type",
            Self::InvalidUpload(_) | Self::NotMultipart | Self::PayloadTooLarge { .. } => "invalid_upload",
            Self::Staging(_) => "staging_error",
            Self::Transcription(_) => "transcription_error",
            Self::Generation(_) => "generation_error",
        }
    }
}

/// Error response format compatible with the `OpenAI` API
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
    message: String,
    r#type: &'static str,
    code: u16,
}

impl IntoResponse for VoiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_response = ErrorResponse {
            error: ErrorDetails {
                message: self.to_string(),
                r#type: self.error_type(),
                code: status.as_u16(),
            },
        };

        (status, Json(error_response)).into_response()
    }
}
