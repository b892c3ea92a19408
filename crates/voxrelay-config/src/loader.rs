use std::path::Path;

use secrecy::ExposeSecret;

use crate::Config;

/// Configuration used when no file is given; requires `OPENAI_API_KEY`
pub const DEFAULT_CONFIG: &str = include_str!("default.toml");

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml_str(&raw)
    }

    /// Load the built-in configuration
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is unset or empty
    pub fn load_default() -> anyhow::Result<Self> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Expand, parse and validate raw TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is empty or the voice endpoint
    /// settings are unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_credentials()?;
        self.validate_voice_config()?;
        self.validate_routes()?;
        self.validate_telemetry_config()?;
        Ok(())
    }

    fn validate_credentials(&self) -> anyhow::Result<()> {
        if self.stt.api_key.expose_secret().trim().is_empty() {
            anyhow::bail!("stt.api_key must not be empty");
        }

        if self.llm.api_key.expose_secret().trim().is_empty() {
            anyhow::bail!("llm.api_key must not be empty");
        }

        Ok(())
    }

    fn validate_voice_config(&self) -> anyhow::Result<()> {
        let voice = &self.voice;

        if voice.allowed_content_types.is_empty() {
            anyhow::bail!("voice.allowed_content_types must list at least one media type");
        }

        if let Some(bad) = voice
            .allowed_content_types
            .iter()
            .find(|content_type| !content_type.to_ascii_lowercase().starts_with("audio/"))
        {
            anyhow::bail!("voice.allowed_content_types may only contain audio types, found '{bad}'");
        }

        if voice.max_upload_bytes == 0 {
            anyhow::bail!("voice.max_upload_bytes must be greater than 0");
        }

        if let Some(ref dir) = voice.staging_dir
            && !dir.is_dir()
        {
            anyhow::bail!("voice.staging_dir {} is not a directory", dir.display());
        }

        Ok(())
    }

    fn validate_routes(&self) -> anyhow::Result<()> {
        if !self.voice.path.starts_with('/') {
            anyhow::bail!("voice.path must start with '/'");
        }

        let health = &self.server.health;

        if health.enabled {
            if !health.path.starts_with('/') {
                anyhow::bail!("server.health.path must start with '/'");
            }

            if health.path == self.voice.path {
                anyhow::bail!("server.health.path and voice.path must differ");
            }
        }

        Ok(())
    }

    fn validate_telemetry_config(&self) -> anyhow::Result<()> {
        let Some(rate) = self
            .telemetry
            .as_ref()
            .and_then(|t| t.tracing.as_ref())
            .map(|t| t.sampling_rate)
        else {
            return Ok(());
        };

        if !(0.0..=1.0).contains(&rate) {
            anyhow::bail!("telemetry.tracing.sampling_rate must be between 0.0 and 1.0, got {rate}");
        }

        Ok(())
    }
}
