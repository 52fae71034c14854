use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::file::{FileMediaDevices, FileRecorderConfig};
use super::unavailable::UnavailableMediaDevices;
use crate::config::CaptureConfig;

/// Constraints passed when requesting an input stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    /// Request an audio track
    pub audio: bool,
    /// Request a video track
    pub video: bool,
}

impl MediaConstraints {
    /// Microphone only, no camera
    pub fn audio_only() -> Self {
        Self {
            audio: true,
            video: false,
        }
    }
}

/// A chunk of encoded audio emitted by a recorder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Encoded audio bytes (may be empty)
    pub data: Vec<u8>,
    /// Milliseconds since the recorder started
    pub timestamp_ms: u64,
}

impl Fragment {
    pub fn new(data: impl Into<Vec<u8>>, timestamp_ms: u64) -> Self {
        Self {
            data: data.into(),
            timestamp_ms,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Events delivered by a recorder, in order
///
/// A recorder sends any number of `Data` events followed by exactly one
/// `Stopped` once it has fully shut down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    Data(Fragment),
    Stopped,
}

/// A live input stream granted by the platform
pub trait MediaStream: Send {
    /// Stream identifier for logging
    fn id(&self) -> &str;

    /// Create a recorder bound to this stream
    ///
    /// The recorder takes ownership of the stream and releases it once
    /// recording has stopped.
    fn into_recorder(self: Box<Self>) -> Result<Box<dyn MediaRecorder>>;
}

/// Recorder bound to one input stream (the capture handle)
#[async_trait::async_trait]
pub trait MediaRecorder: Send {
    /// Begin recording
    ///
    /// Returns a channel receiver that will receive recorder events
    async fn start(&mut self) -> Result<mpsc::Receiver<RecorderEvent>>;

    /// Request the recorder to stop
    ///
    /// Completion is signalled asynchronously by a `RecorderEvent::Stopped`
    /// on the event channel, not by the return of this call.
    async fn stop(&mut self) -> Result<()>;

    /// Check if the recorder is currently recording
    fn is_recording(&self) -> bool;

    /// Get recorder name for logging
    fn name(&self) -> &str;
}

/// Platform media-capture capability
///
/// Implementations:
/// - File: replays a prerecorded audio/webm file as a microphone
/// - Unavailable: hosts without any capture capability
#[async_trait::async_trait]
pub trait MediaDevices: Send + Sync {
    /// Whether the capture capability exists on this host
    fn is_available(&self) -> bool;

    /// Request an input stream; suspends until access is granted or denied
    async fn get_user_media(&self, constraints: MediaConstraints) -> Result<Box<dyn MediaStream>>;

    /// Get device name for logging
    fn name(&self) -> &str;
}

/// Capture source selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSource {
    /// Replay an audio/webm file as the microphone
    File(PathBuf),
    /// No capture capability on this host
    None,
}

/// Media devices factory
pub struct MediaDevicesFactory;

impl MediaDevicesFactory {
    /// Create media devices based on configuration
    pub fn create(config: &CaptureConfig) -> Result<Arc<dyn MediaDevices>> {
        match config.source()? {
            CaptureSource::File(path) => {
                let recorder_config = FileRecorderConfig {
                    timeslice_ms: config.timeslice_ms,
                    fragment_size: config.fragment_size,
                };
                Ok(Arc::new(FileMediaDevices::new(path, recorder_config)))
            }

            CaptureSource::None => Ok(Arc::new(UnavailableMediaDevices)),
        }
    }
}
