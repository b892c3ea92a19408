//! Declared media type checks for uploads

use crate::error::VoiceError;

/// Allow-list of audio media types an upload may declare
#[derive(Debug, Clone)]
pub struct MediaTypes {
    allowed: Vec<String>,
}

impl MediaTypes {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for media_type in allowed {
            let media_type = essence(media_type.as_ref());
            if !normalized.contains(&media_type) {
                normalized.push(media_type);
            }
        }

        Self { allowed: normalized }
    }

    /// Allowed media types, in configuration order
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn is_allowed(&self, declared: &str) -> bool {
        let declared = essence(declared);
        self.allowed.iter().any(|allowed| *allowed == declared)
    }

    /// Accept or reject a declared media type
    ///
    /// A missing declaration is rejected like any other unknown type.
    pub fn check(&self, declared: Option<&str>) -> Result<(), VoiceError> {
        match declared {
            Some(declared) if self.is_allowed(declared) => Ok(()),
            _ => Err(VoiceError::UnsupportedMediaType {
                content_type: declared.unwrap_or_default().to_string(),
                allowed: self.allowed.clone(),
            }),
        }
    }
}

/// Lowercased media type without parameters (`audio/wav; rate=16000` -> `audio/wav`)
fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// File suffix for a staged upload
///
/// The transcription service infers the container format from the file
/// name, so the suffix follows the declared type. Unknown types keep `.wav`.
pub fn staging_suffix(content_type: &str) -> &'static str {
    match essence(content_type).as_str() {
        "audio/mpeg" | "audio/mp3" | "audio/mpga" => ".mp3",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => ".m4a",
        "audio/webm" => ".webm",
        "audio/ogg" => ".ogg",
        "audio/flac" | "audio/x-flac" => ".flac",
        _ => ".wav",
    }
}
