use serde::{Deserialize, Serialize};

/// Transcription request following the `OpenAI` Whisper API format
#[derive(Debug)]
pub struct TranscriptionRequest {
    /// Open handle to the staged audio file
    pub file: tokio::fs::File,
    /// File name reported to the provider; its extension names the format
    pub file_name: String,
    /// Content type of the audio file
    pub content_type: String,
    /// Model identifier (e.g. "whisper-1")
    pub model: String,
    /// Optional language hint (ISO 639-1)
    pub language: Option<String>,
    /// Optional prompt to guide transcription
    pub prompt: Option<String>,
}

/// Transcription response following the `OpenAI` Whisper API format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    /// Transcribed text
    pub text: String,
}
