use thiserror::Error;

/// Errors that can occur while calling a chat-completion service
#[derive(Debug, Error)]
pub enum LlmError {
    /// The request never got a response
    #[error("connection error: {0}")]
    Connection(String),

    /// The provider rejected the API key
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// The provider is throttling this client
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),

    /// The provider answered with another non-success status
    #[error("provider returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The response body was not a chat completion
    #[error("failed to parse response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Map a non-success provider status to an error
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized(message),
            429 => Self::RateLimited(message),
            _ => Self::Upstream { status, message },
        }
    }
}
