//! HTTP API for driving the capture session
//!
//! This module provides a REST API for a downstream consumer (e.g. an
//! interview answer upload flow):
//! - POST /recording/start - Start recording
//! - POST /recording/stop - Stop recording and return the audio/webm blob
//! - GET /recording/status - Query session status
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
