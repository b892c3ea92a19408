use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Chat-completion service configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Provider protocol type
    #[serde(rename = "type", default)]
    pub provider_type: LlmProviderType,
    /// API key for authentication
    pub api_key: SecretString,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model used for replies, also reported back to callers
    #[serde(default = "default_model")]
    pub model: String,
}

/// Supported LLM provider protocols
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProviderType {
    /// OpenAI-compatible API
    #[default]
    Openai,
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}
