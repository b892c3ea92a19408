use std::sync::Arc;

use axum::extract::{FromRequest, Multipart, Request, multipart::MultipartError};
use http::StatusCode;

use crate::{error::VoiceError, media::MediaTypes, pipeline::VoicePipeline, types::Upload};

/// Multipart field carrying the audio
pub const AUDIO_FIELD: &str = "audio_file";

/// Field name used by `OpenAI`-style clients, accepted as well
pub const AUDIO_FIELD_ALIAS: &str = "file";

/// Extractor for the audio part of a `multipart/form-data` body
///
/// Rejects a disallowed declared media type from the part headers, before
/// the part body is read.
pub struct ExtractUpload(pub Upload);

impl FromRequest<Arc<VoicePipeline>> for ExtractUpload {
    type Rejection = VoiceError;

    async fn from_request(request: Request, pipeline: &Arc<VoicePipeline>) -> Result<Self, Self::Rejection> {
        let limit = pipeline.settings().max_upload_bytes;

        match read_upload(request, pipeline.media_types(), limit).await {
            Ok(upload) => Ok(Self(upload)),
            Err(e) => {
                pipeline.record_rejection(&e);
                Err(e)
            }
        }
    }
}

async fn read_upload(request: Request, media: &MediaTypes, limit: usize) -> Result<Upload, VoiceError> {
    let is_multipart = request
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"));

    if !is_multipart {
        return Err(VoiceError::NotMultipart);
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| VoiceError::InvalidUpload(e.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(|e| field_error(&e, limit))? {
        if !matches!(field.name(), Some(AUDIO_FIELD | AUDIO_FIELD_ALIAS)) {
            continue;
        }

        let content_type = field.content_type().map(ToOwned::to_owned);
        media.check(content_type.as_deref())?;

        let file_name = field.file_name().map(ToOwned::to_owned);
        let bytes = field.bytes().await.map_err(|e| field_error(&e, limit))?;

        return Ok(Upload {
            bytes,
            content_type: content_type.unwrap_or_default(),
            file_name,
        });
    }

    Err(VoiceError::InvalidUpload(format!(
        "multipart body has no '{AUDIO_FIELD}' field"
    )))
}

fn field_error(error: &MultipartError, limit: usize) -> VoiceError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        VoiceError::PayloadTooLarge { limit }
    } else {
        VoiceError::InvalidUpload(error.body_text())
    }
}
