// Integration tests for the HTTP control API
//
// Requests go straight to the router via `tower::ServiceExt::oneshot`.

use anyhow::{bail, Result};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use interview_recorder::audio::{
    FileMediaDevices, FileRecorderConfig, MediaConstraints, MediaDevices, MediaRecorder,
    MediaStream, RecorderEvent,
};
use interview_recorder::{
    create_router, AppState, CaptureError, CaptureSession, SessionStats, UnavailableMediaDevices,
};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;

/// Devices that either refuse the microphone or never finish stopping
#[derive(Clone, Copy, PartialEq)]
enum StubDevices {
    Deny,
    Hang,
}

#[async_trait::async_trait]
impl MediaDevices for StubDevices {
    fn is_available(&self) -> bool {
        true
    }

    async fn get_user_media(&self, _constraints: MediaConstraints) -> Result<Box<dyn MediaStream>> {
        match self {
            StubDevices::Deny => bail!(CaptureError::PermissionDenied("blocked".to_string())),
            StubDevices::Hang => Ok(Box::new(HangingStream)),
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}

struct HangingStream;

impl MediaStream for HangingStream {
    fn id(&self) -> &str {
        "hanging-stream"
    }

    fn into_recorder(self: Box<Self>) -> Result<Box<dyn MediaRecorder>> {
        Ok(Box::new(HangingRecorder { tx: None }))
    }
}

/// Accepts stop requests but never sends `Stopped`
struct HangingRecorder {
    tx: Option<mpsc::Sender<RecorderEvent>>,
}

#[async_trait::async_trait]
impl MediaRecorder for HangingRecorder {
    async fn start(&mut self) -> Result<mpsc::Receiver<RecorderEvent>> {
        let (tx, rx) = mpsc::channel(100);
        self.tx = Some(tx);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.tx.is_some()
    }

    fn name(&self) -> &str {
        "hanging"
    }
}

fn router_with(devices: Arc<dyn MediaDevices>) -> Router {
    create_router(AppState::new(CaptureSession::new(devices)))
}

fn file_router(dir: &TempDir, contents: &[u8]) -> Result<Router> {
    let path = dir.path().join("answer.webm");
    fs::write(&path, contents)?;

    let devices = FileMediaDevices::new(
        path,
        FileRecorderConfig {
            timeslice_ms: 5,
            fragment_size: 8,
        },
    );
    Ok(router_with(Arc::new(devices)))
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Result<Vec<u8>> {
    Ok(axum::body::to_bytes(response.into_body(), usize::MAX)
        .await?
        .to_vec())
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let app = router_with(Arc::new(UnavailableMediaDevices));

    let response = app.oneshot(get("/health")).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await?, b"OK");

    Ok(())
}

#[tokio::test]
async fn test_stop_without_recording_returns_no_content() -> Result<()> {
    let app = router_with(Arc::new(UnavailableMediaDevices));

    let response = app.oneshot(post("/recording/stop")).await?;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    Ok(())
}

#[tokio::test]
async fn test_start_without_capability_reports_unavailable() -> Result<()> {
    let app = router_with(Arc::new(UnavailableMediaDevices));

    let response = app.oneshot(post("/recording/start")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await?)?;
    assert_eq!(body["status"], "unavailable");
    assert!(body["session_id"].is_null());

    Ok(())
}

#[tokio::test]
async fn test_record_and_download_blob() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let contents = b"\x1aE\xdf\xa3 pretend this is an EBML header and some opus frames";
    let app = file_router(&temp_dir, contents)?;

    let response = app.clone().oneshot(post("/recording/start")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await?)?;
    assert_eq!(body["status"], "recording");
    assert!(body["session_id"].as_str().unwrap().starts_with("recording-"));

    let response = app.clone().oneshot(get("/recording/status")).await?;
    let stats: SessionStats = serde_json::from_slice(&body_bytes(response).await?)?;
    assert!(stats.is_recording);

    let response = app.clone().oneshot(post("/recording/stop")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "audio/webm"
    );
    assert_eq!(body_bytes(response).await?, contents.to_vec());

    let response = app.oneshot(get("/recording/status")).await?;
    let stats: SessionStats = serde_json::from_slice(&body_bytes(response).await?)?;
    assert!(!stats.is_recording);
    assert_eq!(stats.sessions_completed, 1);

    Ok(())
}

#[tokio::test]
async fn test_second_start_conflicts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let app = file_router(&temp_dir, b"audio")?;

    let response = app.clone().oneshot(post("/recording/start")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(post("/recording/start")).await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app.oneshot(post("/recording/stop")).await?;
    assert_eq!(body_bytes(response).await?, b"audio".to_vec());

    Ok(())
}

#[tokio::test]
async fn test_missing_recording_file_fails_start() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let devices = FileMediaDevices::new(
        temp_dir.path().join("missing.webm"),
        FileRecorderConfig::default(),
    );
    let app = router_with(Arc::new(devices));

    let response = app.clone().oneshot(post("/recording/start")).await?;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app.oneshot(post("/recording/stop")).await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    Ok(())
}

#[tokio::test]
async fn test_permission_denied_returns_forbidden() -> Result<()> {
    let app = router_with(Arc::new(StubDevices::Deny));

    let response = app.clone().oneshot(post("/recording/start")).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await?)?;
    assert!(body["error"].as_str().unwrap().contains("permission"));

    let response = app.oneshot(get("/recording/status")).await?;
    let stats: SessionStats = serde_json::from_slice(&body_bytes(response).await?)?;
    assert!(!stats.is_recording);

    Ok(())
}

#[tokio::test]
async fn test_api_responsive_while_stop_is_pending() -> Result<()> {
    let app = router_with(Arc::new(StubDevices::Hang));

    let response = app.clone().oneshot(post("/recording/start")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let pending_stop = tokio::spawn(app.clone().oneshot(post("/recording/stop")));
    // Let the stop request take the session
    tokio::time::sleep(Duration::from_millis(50)).await;

    let response = tokio::time::timeout(
        Duration::from_secs(2),
        app.clone().oneshot(get("/recording/status")),
    )
    .await??;
    assert_eq!(response.status(), StatusCode::OK);
    let stats: SessionStats = serde_json::from_slice(&body_bytes(response).await?)?;
    assert!(!stats.is_recording, "Recording is detached once stop begins");
    assert_eq!(stats.sessions_completed, 0);

    let response = tokio::time::timeout(
        Duration::from_secs(2),
        app.oneshot(post("/recording/start")),
    )
    .await??;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    assert!(!pending_stop.is_finished(), "Stop waits for the recorder");
    pending_stop.abort();

    Ok(())
}
