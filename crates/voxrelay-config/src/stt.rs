use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Transcription service configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SttConfig {
    /// Provider type
    #[serde(rename = "type", default)]
    pub provider_type: SttProviderType,
    /// API key
    pub api_key: SecretString,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Transcription model sent with every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Optional language hint (ISO 639-1)
    #[serde(default)]
    pub language: Option<String>,
    /// Optional prompt to guide transcription
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Supported STT providers
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SttProviderType {
    /// `OpenAI` Whisper
    #[default]
    Whisper,
}

fn default_model() -> String {
    "whisper-1".to_string()
}
