//! In-process service stubs for unit tests

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::Request;
use stt::{SttError, SttProvider, TranscriptionRequest, TranscriptionResponse};
use tokio::io::AsyncReadExt;
use voxrelay_config::{DEFAULT_ALLOWED_CONTENT_TYPES, DEFAULT_SYSTEM_PROMPT};
use voxrelay_llm::{Choice, ChoiceMessage, CompletionRequest, CompletionResponse, LlmError, Provider};

use crate::{
    media::MediaTypes,
    pipeline::{PipelineSettings, VoicePipeline},
};

const BOUNDARY: &str = "voxrelay-test-boundary";

/// Pipeline over the given stubs with default media types and models
pub fn pipeline(
    transcriber: Arc<StubTranscriber>,
    generator: Arc<StubGenerator>,
    staging_dir: &Path,
) -> Arc<VoicePipeline> {
    pipeline_with_limit(transcriber, generator, staging_dir, 1 << 20)
}

pub fn pipeline_with_limit(
    transcriber: Arc<StubTranscriber>,
    generator: Arc<StubGenerator>,
    staging_dir: &Path,
    max_upload_bytes: usize,
) -> Arc<VoicePipeline> {
    let settings = PipelineSettings {
        transcription_model: "whisper-1".into(),
        language: None,
        prompt: None,
        generation_model: "gpt-3.5-turbo".into(),
        system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
        staging_dir: Some(staging_dir.to_path_buf()),
        max_upload_bytes,
    };

    Arc::new(VoicePipeline::new(
        transcriber,
        generator,
        MediaTypes::new(DEFAULT_ALLOWED_CONTENT_TYPES),
        settings,
    ))
}

/// Hand-assembled `multipart/form-data` body
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: Option<&str>, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n")
                .as_bytes(),
        );
        if let Some(content_type) = content_type {
            self.body
                .extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        self.body.extend_from_slice(b"\r\n");
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request {
        self.body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                http::header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

/// What the transcriber saw for one call
#[derive(Debug, Clone)]
pub struct SeenTranscription {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
    pub model: String,
}

enum TranscriberBehavior {
    Reply(String),
    Fail,
    Hang,
}

pub struct StubTranscriber {
    behavior: TranscriberBehavior,
    watch_dir: Option<PathBuf>,
    calls: AtomicUsize,
    last: Mutex<Option<SeenTranscription>>,
    entries_seen: Mutex<Option<usize>>,
}

impl StubTranscriber {
    fn with(behavior: TranscriberBehavior, watch_dir: Option<PathBuf>) -> Self {
        Self {
            behavior,
            watch_dir,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
            entries_seen: Mutex::new(None),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with(TranscriberBehavior::Reply(text.to_owned()), None)
    }

    pub fn failing() -> Self {
        Self::with(TranscriberBehavior::Fail, None)
    }

    /// Never completes; records how many files `dir` held when called
    pub fn pending(dir: &Path) -> Self {
        Self::with(TranscriberBehavior::Hang, Some(dir.to_path_buf()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SeenTranscription> {
        self.last.lock().unwrap().clone()
    }

    pub fn staged_entries_seen(&self) -> Option<usize> {
        *self.entries_seen.lock().unwrap()
    }
}

#[async_trait]
impl SttProvider for StubTranscriber {
    async fn transcribe(&self, mut request: TranscriptionRequest) -> stt::Result<TranscriptionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut bytes = Vec::new();
        request.file.read_to_end(&mut bytes).await?;

        *self.last.lock().unwrap() = Some(SeenTranscription {
            bytes,
            file_name: request.file_name,
            content_type: request.content_type,
            model: request.model,
        });

        if let Some(ref dir) = self.watch_dir {
            *self.entries_seen.lock().unwrap() = Some(std::fs::read_dir(dir).unwrap().count());
        }

        match &self.behavior {
            TranscriberBehavior::Reply(text) => Ok(TranscriptionResponse { text: text.clone() }),
            TranscriberBehavior::Fail => Err(SttError::ProviderApiError {
                status: 502,
                message: "bad gateway".into(),
            }),
            TranscriberBehavior::Hang => std::future::pending().await,
        }
    }

    fn name(&self) -> &str {
        "stub-stt"
    }
}

enum GeneratorBehavior {
    Reply(Option<String>),
    NoChoices,
    Fail(Mutex<Option<LlmError>>),
}

pub struct StubGenerator {
    behavior: GeneratorBehavior,
    calls: AtomicUsize,
    last: Mutex<Option<CompletionRequest>>,
}

impl StubGenerator {
    fn with(behavior: GeneratorBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn replying(content: &str) -> Self {
        Self::with(GeneratorBehavior::Reply(Some(content.to_owned())))
    }

    pub fn with_null_content() -> Self {
        Self::with(GeneratorBehavior::Reply(None))
    }

    pub fn without_choices() -> Self {
        Self::with(GeneratorBehavior::NoChoices)
    }

    /// Fails the first call with `error`
    pub fn failing(error: LlmError) -> Self {
        Self::with(GeneratorBehavior::Fail(Mutex::new(Some(error))))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last.lock().unwrap().clone()
    }
}

fn completion(choices: Vec<Choice>) -> CompletionResponse {
    CompletionResponse {
        id: "chatcmpl-stub".into(),
        model: "gpt-3.5-turbo-0125".into(),
        choices,
        usage: None,
    }
}

#[async_trait]
impl Provider for StubGenerator {
    fn name(&self) -> &str {
        "stub-llm"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request.clone());

        match &self.behavior {
            GeneratorBehavior::Reply(content) => Ok(completion(vec![Choice {
                index: 0,
                message: ChoiceMessage {
                    role: "assistant".into(),
                    content: content.clone(),
                },
                finish_reason: None,
            }])),
            GeneratorBehavior::NoChoices => Ok(completion(Vec::new())),
            GeneratorBehavior::Fail(error) => Err(error
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| LlmError::InvalidResponse("stub already failed".into()))),
        }
    }
}
