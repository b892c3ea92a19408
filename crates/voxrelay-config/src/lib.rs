#![allow(clippy::must_use_candidate)]

mod env;
pub mod health;
pub mod llm;
mod loader;
pub mod server;
pub mod stt;
pub mod telemetry;
pub mod voice;

use serde::Deserialize;

pub use health::*;
pub use llm::*;
pub use loader::DEFAULT_CONFIG;
pub use server::*;
pub use stt::*;
pub use telemetry::TelemetryConfig;
pub use voice::*;

/// Top-level voxrelay configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Transcription service configuration
    pub stt: SttConfig,
    /// Chat-completion service configuration
    pub llm: LlmConfig,
    /// Voice endpoint configuration
    #[serde(default)]
    pub voice: VoiceConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
