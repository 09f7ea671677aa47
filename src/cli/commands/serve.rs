//! HTTP API server.
//!
//! `POST /` takes a multipart upload with a `file` field and answers with the
//! transcript and summary of the recording.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::RecapError;
use crate::orchestrator::Orchestrator;
use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    api_key: Option<String>,
    settings: Settings,
) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    preflight::check(Operation::Serve, &settings, api_key.as_deref()).await?;
    if let Err(e) = preflight::check_transcriber(&settings.transcription.command).await {
        Output::warning(&format!("{} (uploads will fail until this is fixed)", e));
    }

    let orchestrator = Orchestrator::new(&settings, api_key)?;
    let app = router(orchestrator, settings.server.max_upload_bytes());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Recap API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Recap", "POST /  (multipart field \"file\")");
    Output::kv("Health", "GET  /health");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router around an orchestrator.
pub fn router(orchestrator: Orchestrator, max_upload_bytes: usize) -> Router {
    let state = Arc::new(AppState { orchestrator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", post(recap_upload))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// === Response Types ===

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Why an upload could not be accepted.
#[derive(Debug)]
enum UploadError {
    NoFilePart,
    NoSelectedFile,
    Unreadable { status: StatusCode, reason: String },
}

impl From<MultipartError> for UploadError {
    fn from(e: MultipartError) -> Self {
        UploadError::Unreadable {
            status: e.status(),
            reason: e.body_text(),
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::NoFilePart => error_response(StatusCode::BAD_REQUEST, "No file part"),
            UploadError::NoSelectedFile => {
                error_response(StatusCode::BAD_REQUEST, "No selected file")
            }
            UploadError::Unreadable { status, reason } => {
                error_response(status, format!("Failed to read upload: {}", reason))
            }
        }
    }
}

/// Pull the bytes of the `file` field out of a multipart body.
///
/// Fields without a filename are form values, not files, and are skipped.
async fn read_upload(mut multipart: Multipart) -> Result<Bytes, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = match field.file_name() {
            None => continue,
            Some("") => return Err(UploadError::NoSelectedFile),
            Some(name) => name.to_string(),
        };

        let data = field.bytes().await?;
        debug!(file_name = %file_name, bytes = data.len(), "Received upload");
        return Ok(data);
    }

    Err(UploadError::NoFilePart)
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn recap_upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let span = tracing::info_span!("upload", upload_id = %Uuid::new_v4());

    async move {
        let multipart = match multipart {
            Ok(m) => m,
            Err(rejection) => {
                warn!("Rejected non-multipart upload: {}", rejection.body_text());
                return UploadError::NoFilePart.into_response();
            }
        };

        let audio = match read_upload(multipart).await {
            Ok(audio) => audio,
            Err(e) => {
                warn!("Rejected upload: {:?}", e);
                return e.into_response();
            }
        };

        match state.orchestrator.process_upload(&audio).await {
            Ok(recap) => {
                info!("Upload processed");
                Json(recap).into_response()
            }
            Err(e) => {
                error!("Upload failed: {}", e);
                pipeline_error_response(&e)
            }
        }
    }
    .instrument(span)
    .await
}

fn pipeline_error_response(e: &RecapError) -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, e.response_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::test_support::*;
    use crate::orchestrator::MeetingRecap;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    const BOUNDARY: &str = "recap-test-boundary";

    /// A multipart part: field name, optional filename, content.
    type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

    fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, file_name, content) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file_name {
                Some(file_name) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: audio/wav\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                }
                None => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                }
            }
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn app(
        root: &std::path::Path,
        script: TranscriberScript,
        summarizer: Arc<FixedSummarizer>,
    ) -> Router {
        let orchestrator = Orchestrator::with_components(
            &settings_in(root),
            ScriptedTranscriber::new(script),
            summarizer,
        )
        .unwrap();
        router(orchestrator, 1024 * 1024)
    }

    #[tokio::test]
    async fn test_missing_file_field() {
        let root = tempfile::tempdir().unwrap();
        let app = app(
            root.path(),
            TranscriberScript::Writes("unused".into()),
            FixedSummarizer::replying("unused"),
        );

        let (status, body) = send(app, multipart_request(&[("notes", None, &b"weekly sync"[..])])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "No file part" }));
    }

    #[tokio::test]
    async fn test_non_multipart_request() {
        let root = tempfile::tempdir().unwrap();
        let app = app(
            root.path(),
            TranscriberScript::Writes("unused".into()),
            FixedSummarizer::replying("unused"),
        );

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file part");
    }

    #[tokio::test]
    async fn test_empty_filename() {
        let root = tempfile::tempdir().unwrap();
        let summarizer = FixedSummarizer::replying("unused");
        let app = app(
            root.path(),
            TranscriberScript::Writes("unused".into()),
            summarizer.clone(),
        );

        let (status, body) = send(app, multipart_request(&[("file", Some(""), &b""[..])])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "No selected file" }));
        assert_eq!(summarizer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_upload() {
        let root = tempfile::tempdir().unwrap();
        let app = app(
            root.path(),
            TranscriberScript::Writes("Dana: migrate the DB by June 3.".into()),
            FixedSummarizer::replying("Action items:\n- Dana: DB migration (June 3)"),
        );

        let (status, body) = send(
            app,
            multipart_request(&[
                ("notes", None, &b"ignored"[..]),
                ("file", Some("standup.wav"), &b"RIFF....WAVEfmt "[..]),
            ]),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let recap: MeetingRecap = serde_json::from_value(body).unwrap();
        assert_eq!(recap.transcript, "Dana: migrate the DB by June 3.");
        assert_eq!(recap.summary, "Action items:\n- Dana: DB migration (June 3)");
        assert!(leftovers(root.path()).is_empty());
    }

    #[tokio::test]
    async fn test_transcription_tool_failure() {
        let root = tempfile::tempdir().unwrap();
        let app = app(
            root.path(),
            TranscriberScript::Fails("Error: unsupported audio format".into()),
            FixedSummarizer::replying("unused"),
        );

        let (status, body) =
            send(app, multipart_request(&[("file", Some("a.wav"), &b"junk"[..])])).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Error: unsupported audio format");
        assert!(leftovers(root.path()).is_empty());
    }

    #[tokio::test]
    async fn test_transcript_file_not_found() {
        let root = tempfile::tempdir().unwrap();
        let app = app(
            root.path(),
            TranscriberScript::WritesNothing,
            FixedSummarizer::replying("unused"),
        );

        let (status, body) =
            send(app, multipart_request(&[("file", Some("a.wav"), &b"audio"[..])])).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Transcript file not found");
        assert!(leftovers(root.path()).is_empty());
    }

    #[tokio::test]
    async fn test_remote_error_is_inline_in_summary() {
        let root = tempfile::tempdir().unwrap();
        let app = app(
            root.path(),
            TranscriberScript::Writes("hello".into()),
            FixedSummarizer::replying(r#"Error from AI: {"error":"rate limited"}"#),
        );

        let (status, body) =
            send(app, multipart_request(&[("file", Some("a.wav"), &b"audio"[..])])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transcript"], "hello");
        assert!(body["summary"]
            .as_str()
            .unwrap()
            .starts_with("Error from AI: "));
    }

    #[tokio::test]
    async fn test_summarization_transport_failure() {
        let root = tempfile::tempdir().unwrap();
        let app = app(
            root.path(),
            TranscriberScript::Writes("hello".into()),
            FixedSummarizer::failing("connection refused"),
        );

        let (status, body) =
            send(app, multipart_request(&[("file", Some("a.wav"), &b"audio"[..])])).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Summarization failed: connection refused");
        assert!(leftovers(root.path()).is_empty());
    }

    #[tokio::test]
    async fn test_upload_over_limit() {
        let root = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::with_components(
            &settings_in(root.path()),
            ScriptedTranscriber::new(TranscriberScript::Writes("unused".into())),
            FixedSummarizer::replying("unused"),
        )
        .unwrap();
        let app = router(orchestrator, 1024);

        let big = vec![0u8; 8 * 1024];
        let (status, body) =
            send(app, multipart_request(&[("file", Some("big.wav"), big.as_slice())])).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to read upload: "));
        assert!(leftovers(root.path()).is_empty());
    }

    #[tokio::test]
    async fn test_file_field_without_filename() {
        let root = tempfile::tempdir().unwrap();
        let summarizer = FixedSummarizer::replying("unused");
        let app = app(
            root.path(),
            TranscriberScript::Writes("unused".into()),
            summarizer.clone(),
        );

        let (status, body) =
            send(app, multipart_request(&[("file", None, &b"plain form value"[..])])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "No file part" }));
        assert_eq!(summarizer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_truncated_multipart_body() {
        let root = tempfile::tempdir().unwrap();
        let summarizer = FixedSummarizer::replying("unused");
        let app = app(
            root.path(),
            TranscriberScript::Writes("unused".into()),
            summarizer.clone(),
        );

        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.wav\"\r\n\r\npartial audio"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to read upload: "));
        assert_eq!(summarizer.call_count(), 0);
        assert!(leftovers(root.path()).is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let root = tempfile::tempdir().unwrap();
        let app = app(
            root.path(),
            TranscriberScript::Writes("unused".into()),
            FixedSummarizer::replying("unused"),
        );

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
