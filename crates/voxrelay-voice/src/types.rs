use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Audio received from a caller, alive for one request
#[derive(Debug, Clone)]
pub struct Upload {
    /// Raw audio bytes
    pub bytes: Bytes,
    /// Media type declared on the multipart field
    pub content_type: String,
    /// File name declared on the multipart field
    pub file_name: Option<String>,
}

/// Body returned for a successfully processed voice message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceResponse {
    /// Transcript exactly as returned by the transcription service
    pub text: String,
    /// First reply choice exactly as returned by the chat service
    pub response: String,
    /// Model that produced the reply
    pub model: String,
}
