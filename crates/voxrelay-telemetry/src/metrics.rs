//! Metric names and recording helpers for the voice pipeline

use std::time::Instant;

use opentelemetry::{
    KeyValue,
    metrics::{Counter, Histogram, Meter},
};

/// Instrumentation scope for every instrument created here
pub const METER_NAME: &str = "voxrelay";

// Voice endpoint metric names
pub const VOICE_REQUEST_COUNT: &str = "voice.request.count";
pub const VOICE_REQUEST_DURATION: &str = "voice.request.duration";
pub const VOICE_UPLOAD_SIZE: &str = "voice.upload.size";

// Upstream call metric names
pub const STT_REQUEST_DURATION: &str = "stt.request.duration";
pub const LLM_REQUEST_DURATION: &str = "llm.request.duration";

/// Record a duration measurement on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}

/// Instruments used by the voice endpoint
///
/// Without a configured exporter the global meter provider is a no-op,
/// so recording is always safe.
#[derive(Clone)]
pub struct VoiceMetrics {
    pub requests: Counter<u64>,
    pub request_duration: Histogram<f64>,
    pub upload_size: Histogram<u64>,
    pub stt_duration: Histogram<f64>,
    pub llm_duration: Histogram<f64>,
}

impl VoiceMetrics {
    /// Create the instruments from the global meter provider
    pub fn new() -> Self {
        Self::from_meter(&opentelemetry::global::meter(METER_NAME))
    }

    fn from_meter(meter: &Meter) -> Self {
        Self {
            requests: meter
                .u64_counter(VOICE_REQUEST_COUNT)
                .with_description("Voice requests by outcome")
                .build(),
            request_duration: meter
                .f64_histogram(VOICE_REQUEST_DURATION)
                .with_unit("s")
                .build(),
            upload_size: meter.u64_histogram(VOICE_UPLOAD_SIZE).with_unit("By").build(),
            stt_duration: meter.f64_histogram(STT_REQUEST_DURATION).with_unit("s").build(),
            llm_duration: meter.f64_histogram(LLM_REQUEST_DURATION).with_unit("s").build(),
        }
    }
}

impl Default for VoiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}
