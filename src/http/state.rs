use crate::session::{CaptureSession, SessionStatsHandle};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The capture session driven by the API
    pub session: Arc<Mutex<CaptureSession>>,

    /// Statistics readable while the session is busy in `start` or `stop`
    pub stats: SessionStatsHandle,
}

impl AppState {
    pub fn new(session: CaptureSession) -> Self {
        Self {
            stats: session.stats_handle(),
            session: Arc::new(Mutex::new(session)),
        }
    }
}
