use std::path::PathBuf;

use serde::Deserialize;

/// Audio media types accepted when the config does not list its own
pub const DEFAULT_ALLOWED_CONTENT_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/mp4",
    "audio/mpga",
    "audio/m4a",
    "audio/wav",
    "audio/webm",
];

/// Instruction sent ahead of every transcript
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that responds to voice messages.";

/// Voice endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoiceConfig {
    /// Route the upload endpoint is mounted on
    #[serde(default = "default_path")]
    pub path: String,
    /// Declared media types an upload may carry
    #[serde(default = "default_allowed_content_types")]
    pub allowed_content_types: Vec<String>,
    /// System instruction for the chat-completion call
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Upper bound on the request body, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Directory for staged uploads (OS temp dir when unset)
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            allowed_content_types: default_allowed_content_types(),
            system_prompt: default_system_prompt(),
            max_upload_bytes: default_max_upload_bytes(),
            staging_dir: None,
        }
    }
}

fn default_path() -> String {
    "/process-voice/".to_string()
}

fn default_allowed_content_types() -> Vec<String> {
    DEFAULT_ALLOWED_CONTENT_TYPES.iter().map(ToString::to_string).collect()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_upload_bytes() -> usize {
    // Matches the 25 MB cap of the OpenAI transcription endpoint
    25 << 20
}
