use thiserror::Error;

pub type Result<T> = std::result::Result<T, SttError>;

/// Errors raised while talking to a transcription service
#[derive(Debug, Error)]
pub enum SttError {
    /// The request was rejected as malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider rejected the API key
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The provider answered with a non-success status
    #[error("Provider API error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    /// The request never got a response
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The response body was not the expected JSON
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The staged audio file could not be read
    #[error("Audio file error: {0}")]
    Io(#[from] std::io::Error),
}

impl SttError {
    /// Map a non-success provider status to an error
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        match status {
            400 => Self::InvalidRequest(body),
            401 => Self::AuthenticationFailed(body),
            _ => Self::ProviderApiError { status, message: body },
        }
    }
}
