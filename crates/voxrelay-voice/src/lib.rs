#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Voice message endpoint: upload, transcribe, reply

mod error;
mod media;
mod pipeline;
mod request;
mod staging;
#[cfg(test)]
mod testing;
mod types;

use std::sync::Arc;

use axum::{Json, Router, extract::DefaultBodyLimit, extract::State, routing::post};
use voxrelay_config::Config;

pub use error::{GenerationError, Result, VoiceError};
pub use media::{MediaTypes, staging_suffix};
pub use pipeline::{PipelineSettings, VoicePipeline};
pub use request::{AUDIO_FIELD, AUDIO_FIELD_ALIAS, ExtractUpload};
pub use staging::StagedUpload;
pub use types::{Upload, VoiceResponse};

/// Build the voice pipeline from configuration
pub fn build_pipeline(config: &Config) -> Arc<VoicePipeline> {
    let pipeline = Arc::new(VoicePipeline::from_config(config));

    tracing::debug!(
        path = %config.voice.path,
        allowed = ?pipeline.media_types().allowed(),
        "voice pipeline initialized"
    );

    pipeline
}

/// Create the endpoint router for voice uploads
///
/// The body limit is the one the pipeline reports in 413 responses. A path
/// with a trailing slash is also served without it.
pub fn endpoint_router(path: &str, pipeline: Arc<VoicePipeline>) -> Router {
    let limit = pipeline.settings().max_upload_bytes;
    let handler = post(process_voice).layer(DefaultBodyLimit::max(limit));

    let mut router = Router::new().route(path, handler.clone());

    let trimmed = path.trim_end_matches('/');
    if !trimmed.is_empty() && trimmed != path {
        router = router.route(trimmed, handler);
    }

    router.with_state(pipeline)
}

/// Handle voice uploads
async fn process_voice(
    State(pipeline): State<Arc<VoicePipeline>>,
    ExtractUpload(upload): ExtractUpload,
) -> Result<Json<VoiceResponse>> {
    tracing::debug!("voice handler called with {} bytes", upload.bytes.len());

    let response = pipeline.process(upload).await?;

    Ok(Json(response))
}
