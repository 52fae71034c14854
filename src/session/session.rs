use super::stats::{SessionStats, SessionStatsHandle};
use crate::audio::{
    AudioBlob, FragmentBuffer, MediaConstraints, MediaDevices, MediaRecorder, RecorderEvent,
};
use crate::error::CaptureError;
use crate::notice::{LogNotifier, UserNotifier, NO_CAPTURE_MESSAGE};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Result of a `start` call that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Recording is active
    Started { session_id: String },
    /// No capture capability; the user was notified and nothing was started
    Unavailable,
}

/// The recorder of an active recording and the task collecting its fragments
struct ActiveCapture {
    session_id: String,
    recorder: Box<dyn MediaRecorder>,
    collector: JoinHandle<AudioBlob>,
}

/// Start/stop microphone capture, yielding one audio blob per recording
///
/// Each instance owns at most one active recording. Dropping the session
/// while recording drops the recorder, which releases its stream; the
/// collected audio is discarded.
pub struct CaptureSession {
    /// Platform capture capability
    devices: Arc<dyn MediaDevices>,

    /// Receives the notice shown when no capability exists
    notifier: Arc<dyn UserNotifier>,

    /// Active recording, if any
    active: Option<ActiveCapture>,

    /// Counters shared with the collector and with readers
    stats: SessionStatsHandle,
}

impl CaptureSession {
    /// Create a session that logs user notices
    pub fn new(devices: Arc<dyn MediaDevices>) -> Self {
        Self::with_notifier(devices, Arc::new(LogNotifier))
    }

    pub fn with_notifier(devices: Arc<dyn MediaDevices>, notifier: Arc<dyn UserNotifier>) -> Self {
        info!("Creating capture session on {} devices", devices.name());

        Self {
            devices,
            notifier,
            active: None,
            stats: SessionStatsHandle::new(),
        }
    }

    /// Start recording
    ///
    /// Suspends until the platform grants or denies the audio stream. A denied
    /// or failed acquisition is returned as an error and leaves the session
    /// idle.
    pub async fn start(&mut self) -> Result<StartOutcome> {
        if let Some(active) = &self.active {
            warn!("Recording {} already active", active.session_id);
            return Err(CaptureError::AlreadyRecording.into());
        }

        if !self.devices.is_available() {
            self.notifier.notify(NO_CAPTURE_MESSAGE);
            return Ok(StartOutcome::Unavailable);
        }

        let session_id = format!("recording-{}", uuid::Uuid::new_v4());
        info!("Starting recording: {}", session_id);

        let stream = self
            .devices
            .get_user_media(MediaConstraints::audio_only())
            .await?;

        debug!("Stream {} granted for {}", stream.id(), session_id);

        let mut recorder = stream
            .into_recorder()
            .context("Failed to create recorder")?;

        let events = recorder
            .start()
            .await
            .context("Failed to start recorder")?;

        // Fresh buffer and counters for every recording
        self.stats.begin(&session_id, Utc::now());

        let collector = tokio::spawn(collect_fragments(
            session_id.clone(),
            events,
            self.stats.clone(),
        ));

        self.active = Some(ActiveCapture {
            session_id: session_id.clone(),
            recorder,
            collector,
        });

        info!("Recording started successfully");

        Ok(StartOutcome::Started { session_id })
    }

    /// Stop recording
    ///
    /// Resolves once the recorder signals that it has stopped, with every
    /// non-empty fragment of this recording concatenated in arrival order.
    /// Returns `None` when nothing was recording. There is no timeout: a
    /// recorder that never signals completion keeps this pending.
    ///
    /// The recording is detached from the session before the first await, so
    /// dropping this future discards it and a later `stop` returns `None`.
    pub async fn stop(&mut self) -> Result<Option<AudioBlob>> {
        let mut active = match self.active.take() {
            Some(active) => active,
            None => {
                debug!("Stop requested with no active recording");
                return Ok(None);
            }
        };
        self.stats.end();

        info!(
            "Stopping recording: {} ({})",
            active.session_id,
            active.recorder.name()
        );

        // The collector is already listening for the stop event
        if let Err(e) = active.recorder.stop().await {
            error!("Failed to stop recorder: {}", e);
            active.collector.abort();
            return Err(e.context("Failed to stop recorder"));
        }

        let blob = active
            .collector
            .await
            .context("Fragment collector panicked")?;

        self.stats.record_completed();

        info!(
            "Recording {} stopped: {} bytes ({})",
            active.session_id,
            blob.len(),
            blob.mime_type()
        );

        Ok(Some(blob))
    }

    /// Check if a recording is active
    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Get current session statistics
    pub fn stats(&self) -> SessionStats {
        self.stats.snapshot()
    }

    /// Handle for reading statistics without access to the session
    pub fn stats_handle(&self) -> SessionStatsHandle {
        self.stats.clone()
    }
}

/// Collect recorder events into a fresh buffer until the recorder stops
async fn collect_fragments(
    session_id: String,
    mut events: mpsc::Receiver<RecorderEvent>,
    stats: SessionStatsHandle,
) -> AudioBlob {
    let mut buffer = FragmentBuffer::new();

    loop {
        match events.recv().await {
            Some(RecorderEvent::Data(fragment)) => {
                let len = fragment.len();
                if buffer.push(fragment) {
                    stats.record_fragment(len);
                } else {
                    debug!("Skipping empty fragment for {}", session_id);
                }
            }
            Some(RecorderEvent::Stopped) => {
                debug!("Recorder for {} signalled stop", session_id);
                break;
            }
            None => {
                warn!(
                    "Recorder for {} closed its event channel without signalling stop",
                    session_id
                );
                break;
            }
        }
    }

    buffer.into_blob()
}
