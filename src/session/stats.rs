use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

/// Statistics about a capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Whether recording is currently active
    pub is_recording: bool,

    /// Identifier of the active recording, if any
    pub session_id: Option<String>,

    /// When the active recording started
    pub started_at: Option<DateTime<Utc>>,

    /// Duration of the active recording in seconds
    pub duration_secs: f64,

    /// Non-empty fragments collected in the current (or last) recording
    pub fragments_count: usize,

    /// Bytes collected in the current (or last) recording
    pub bytes_collected: usize,

    /// Recordings stopped successfully by this session object
    pub sessions_completed: usize,
}

/// Identity of the recording in progress
#[derive(Debug, Clone)]
struct ActiveRecording {
    session_id: String,
    started_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct StatsInner {
    active: RwLock<Option<ActiveRecording>>,
    fragments_collected: AtomicUsize,
    bytes_collected: AtomicUsize,
    sessions_completed: AtomicUsize,
}

/// Shared view of a capture session's statistics
///
/// Cloned out of the session so readers never wait on a pending `start` or
/// `stop`.
#[derive(Debug, Clone, Default)]
pub struct SessionStatsHandle {
    inner: Arc<StatsInner>,
}

impl SessionStatsHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a recording as active and reset the counters
    pub(crate) fn begin(&self, session_id: &str, started_at: DateTime<Utc>) {
        self.inner.fragments_collected.store(0, Ordering::SeqCst);
        self.inner.bytes_collected.store(0, Ordering::SeqCst);
        *self.write_active() = Some(ActiveRecording {
            session_id: session_id.to_string(),
            started_at,
        });
    }

    /// Mark the active recording as over
    pub(crate) fn end(&self) {
        *self.write_active() = None;
    }

    pub(crate) fn record_fragment(&self, len: usize) {
        self.inner.fragments_collected.fetch_add(1, Ordering::SeqCst);
        self.inner.bytes_collected.fetch_add(len, Ordering::SeqCst);
    }

    pub(crate) fn record_completed(&self) {
        self.inner.sessions_completed.fetch_add(1, Ordering::SeqCst);
    }

    /// Current statistics
    pub fn snapshot(&self) -> SessionStats {
        let active = self
            .inner
            .active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let (session_id, started_at, duration_secs) = match active {
            Some(active) => {
                let duration = Utc::now().signed_duration_since(active.started_at);
                (
                    Some(active.session_id),
                    Some(active.started_at),
                    duration.num_milliseconds() as f64 / 1000.0,
                )
            }
            None => (None, None, 0.0),
        };

        SessionStats {
            is_recording: session_id.is_some(),
            session_id,
            started_at,
            duration_secs,
            fragments_count: self.inner.fragments_collected.load(Ordering::SeqCst),
            bytes_collected: self.inner.bytes_collected.load(Ordering::SeqCst),
            sessions_completed: self.inner.sessions_completed.load(Ordering::SeqCst),
        }
    }

    fn write_active(&self) -> RwLockWriteGuard<'_, Option<ActiveRecording>> {
        self.inner
            .active
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
