use super::state::AppState;
use crate::error::CaptureError;
use crate::notice::NO_CAPTURE_MESSAGE;
use crate::session::StartOutcome;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::{error, info};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StartRecordingResponse {
    pub session_id: Option<String>,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

/// Map a session error to a status code
fn capture_error_status(e: &anyhow::Error) -> StatusCode {
    match e.downcast_ref::<CaptureError>() {
        Some(CaptureError::AlreadyRecording) => StatusCode::CONFLICT,
        Some(CaptureError::PermissionDenied(_)) => StatusCode::FORBIDDEN,
        Some(CaptureError::AcquisitionFailed(_)) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Another start or stop is still waiting on the platform
fn session_busy() -> Response {
    error_response(
        StatusCode::CONFLICT,
        "Recording session is busy with another request".to_string(),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /recording/start
/// Start a new recording
pub async fn start_recording(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = match state.session.try_lock() {
        Ok(session) => session,
        Err(_) => return session_busy(),
    };

    match session.start().await {
        Ok(StartOutcome::Started { session_id }) => {
            info!("Recording started: {}", session_id);
            (
                StatusCode::OK,
                Json(StartRecordingResponse {
                    message: format!("Recording started: {}", session_id),
                    session_id: Some(session_id),
                    status: "recording".to_string(),
                }),
            )
                .into_response()
        }
        Ok(StartOutcome::Unavailable) => (
            StatusCode::OK,
            Json(StartRecordingResponse {
                session_id: None,
                status: "unavailable".to_string(),
                message: NO_CAPTURE_MESSAGE.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to start recording: {:#}", e);
            error_response(
                capture_error_status(&e),
                format!("Failed to start recording: {:#}", e),
            )
        }
    }
}

/// POST /recording/stop
/// Stop the active recording and return its audio
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = match state.session.try_lock() {
        Ok(session) => session,
        Err(_) => return session_busy(),
    };

    match session.stop().await {
        Ok(Some(blob)) => {
            info!("Returning {} byte recording", blob.len());
            let mime_type = blob.mime_type().to_string();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime_type)],
                blob.into_bytes(),
            )
                .into_response()
        }
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to stop recording: {:#}", e);
            error_response(
                capture_error_status(&e),
                format!("Failed to stop recording: {:#}", e),
            )
        }
    }
}

/// GET /recording/status
/// Get status of the capture session
pub async fn get_recording_status(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.stats.snapshot())).into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
