//! Mock `OpenAI` backend for integration tests
//!
//! Serves `/v1/audio/transcriptions` and `/v1/chat/completions` with canned
//! answers, counts calls, and records what each call carried.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// One transcription upload as the mock received it
#[derive(Debug, Clone, Default)]
pub struct ReceivedUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub model: Option<String>,
    pub language: Option<String>,
    pub authorization: Option<String>,
    /// Entries in the watched staging directory while the call was served
    pub staged_files: Option<usize>,
}

/// One chat-completion request as the mock received it
#[derive(Debug, Clone, Deserialize)]
pub struct ReceivedChat {
    pub model: String,
    pub messages: Vec<ReceivedMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceivedMessage {
    pub role: String,
    pub content: String,
}

/// Canned reply for one endpoint
#[derive(Debug, Clone)]
enum Answer {
    Ok(serde_json::Value),
    Fail(StatusCode, String),
}

/// Builder for [`MockOpenAi`]
pub struct MockOpenAiBuilder {
    transcription: Answer,
    completion: Answer,
    watch_dir: Option<PathBuf>,
}

impl MockOpenAiBuilder {
    /// Text returned by the transcription endpoint
    pub fn transcript(mut self, text: &str) -> Self {
        self.transcription = Answer::Ok(serde_json::json!({ "text": text }));
        self
    }

    /// Content of the single choice returned by the chat endpoint
    pub fn reply(mut self, content: &str) -> Self {
        self.completion = Answer::Ok(completion_body(&[Some(content)]));
        self
    }

    /// Chat endpoint answers with a `null` message content
    pub fn null_reply(mut self) -> Self {
        self.completion = Answer::Ok(completion_body(&[None]));
        self
    }

    /// Chat endpoint answers with an empty choice list
    pub fn no_choices(mut self) -> Self {
        self.completion = Answer::Ok(completion_body(&[]));
        self
    }

    /// Several choices; only the first should be used
    pub fn replies(mut self, contents: &[&str]) -> Self {
        let contents: Vec<Option<&str>> = contents.iter().copied().map(Some).collect();
        self.completion = Answer::Ok(completion_body(&contents));
        self
    }

    pub fn fail_transcription(mut self, status: u16, message: &str) -> Self {
        self.transcription = Answer::Fail(status_code(status), message.to_owned());
        self
    }

    pub fn fail_completion(mut self, status: u16, message: &str) -> Self {
        self.completion = Answer::Fail(status_code(status), message.to_owned());
        self
    }

    /// Count entries of `dir` whenever a transcription arrives
    pub fn watch_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.watch_dir = Some(dir.into());
        self
    }

    pub async fn start(self) -> anyhow::Result<MockOpenAi> {
        let state = Arc::new(MockState {
            transcription: self.transcription,
            completion: self.completion,
            watch_dir: self.watch_dir,
            transcription_count: AtomicU32::new(0),
            completion_count: AtomicU32::new(0),
            uploads: Mutex::new(Vec::new()),
            chats: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/audio/transcriptions", routing::post(handle_transcription))
            .route("/v1/chat/completions", routing::post(handle_chat_completion))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(MockOpenAi { addr, shutdown, state })
    }
}

/// Mock backend standing in for both external services
pub struct MockOpenAi {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    transcription: Answer,
    completion: Answer,
    watch_dir: Option<PathBuf>,
    transcription_count: AtomicU32,
    completion_count: AtomicU32,
    uploads: Mutex<Vec<ReceivedUpload>>,
    chats: Mutex<Vec<ReceivedChat>>,
}

impl MockOpenAi {
    /// Builder answering "hello world" and "Hi there!"
    pub fn builder() -> MockOpenAiBuilder {
        MockOpenAiBuilder {
            transcription: Answer::Ok(serde_json::json!({ "text": "hello world" })),
            completion: Answer::Ok(completion_body(&[Some("Hi there!")])),
            watch_dir: None,
        }
    }

    /// Start with the default answers
    pub async fn start() -> anyhow::Result<Self> {
        Self::builder().start().await
    }

    /// Base URL for configuring the mock as a provider
    ///
    /// Includes `/v1` since the clients append paths like `/chat/completions`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn transcription_count(&self) -> u32 {
        self.state.transcription_count.load(Ordering::Relaxed)
    }

    pub fn completion_count(&self) -> u32 {
        self.state.completion_count.load(Ordering::Relaxed)
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.state.uploads.lock().unwrap().clone()
    }

    pub fn chats(&self) -> Vec<ReceivedChat> {
        self.state.chats.lock().unwrap().clone()
    }
}

impl Drop for MockOpenAi {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).expect("valid status code")
}

fn completion_body(contents: &[Option<&str>]) -> serde_json::Value {
    let choices: Vec<serde_json::Value> = contents
        .iter()
        .enumerate()
        .map(|(index, content)| {
            serde_json::json!({
                "index": index,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop",
            })
        })
        .collect();

    serde_json::json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-3.5-turbo-0125",
        "choices": choices,
        "usage": { "prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16 },
    })
}

fn answer(answer: &Answer) -> Response {
    match answer {
        Answer::Ok(body) => Json(body.clone()).into_response(),
        Answer::Fail(status, message) => (
            *status,
            Json(serde_json::json!({
                "error": { "message": message, "type": "server_error" }
            })),
        )
            .into_response(),
    }
}

async fn handle_transcription(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    state.transcription_count.fetch_add(1, Ordering::Relaxed);

    let mut upload = ReceivedUpload {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned),
        staged_files: state
            .watch_dir
            .as_ref()
            .map(|dir| std::fs::read_dir(dir).map_or(0, Iterator::count)),
        ..ReceivedUpload::default()
    };

    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name().unwrap_or_default() {
            "file" => {
                upload.file_name = field.file_name().map(ToOwned::to_owned);
                upload.content_type = field.content_type().map(ToOwned::to_owned);
                upload.bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
            }
            "model" => upload.model = field.text().await.ok(),
            "language" => upload.language = field.text().await.ok(),
            _ => {}
        }
    }

    state.uploads.lock().unwrap().push(upload);

    answer(&state.transcription)
}

async fn handle_chat_completion(
    State(state): State<Arc<MockState>>,
    Json(request): Json<ReceivedChat>,
) -> Response {
    state.completion_count.fetch_add(1, Ordering::Relaxed);
    state.chats.lock().unwrap().push(request);

    answer(&state.completion)
}
