// File-backed capture device
//
// Replays a prerecorded audio/webm file as if it were a microphone. Used on
// hosts without an input device and in tests.

use anyhow::{bail, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::backend::{
    Fragment, MediaConstraints, MediaDevices, MediaRecorder, MediaStream, RecorderEvent,
};
use crate::error::CaptureError;

/// Fragment pacing for the file recorder
#[derive(Debug, Clone)]
pub struct FileRecorderConfig {
    /// Interval between emitted fragments in milliseconds
    pub timeslice_ms: u64,
    /// Maximum bytes per fragment
    pub fragment_size: usize,
}

impl Default for FileRecorderConfig {
    fn default() -> Self {
        Self {
            timeslice_ms: 250,
            fragment_size: 4096,
        }
    }
}

/// Media devices backed by a single recording on disk
pub struct FileMediaDevices {
    path: PathBuf,
    config: FileRecorderConfig,
}

impl FileMediaDevices {
    pub fn new(path: impl Into<PathBuf>, config: FileRecorderConfig) -> Self {
        let path = path.into();

        info!(
            "File capture device initialized: {} ({}ms timeslice, {} byte fragments)",
            path.display(),
            config.timeslice_ms,
            config.fragment_size
        );

        Self { path, config }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl MediaDevices for FileMediaDevices {
    fn is_available(&self) -> bool {
        true
    }

    async fn get_user_media(&self, constraints: MediaConstraints) -> Result<Box<dyn MediaStream>> {
        if !constraints.audio {
            return Err(CaptureError::AcquisitionFailed(
                "file source only provides audio tracks".to_string(),
            )
            .into());
        }

        let data = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => {
                CaptureError::PermissionDenied(self.path.display().to_string())
            }
            _ => CaptureError::AcquisitionFailed(format!("{}: {}", self.path.display(), e)),
        })?;

        let stream = FileStream {
            id: format!("file-{}", uuid::Uuid::new_v4()),
            data,
            config: self.config.clone(),
        };

        info!("Acquired file stream {} ({} bytes)", stream.id, stream.data.len());

        Ok(Box::new(stream))
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Stream holding the file contents in memory
pub struct FileStream {
    id: String,
    data: Vec<u8>,
    config: FileRecorderConfig,
}

impl MediaStream for FileStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn into_recorder(self: Box<Self>) -> Result<Box<dyn MediaRecorder>> {
        let stream = *self;
        Ok(Box::new(FileRecorder {
            stream_id: stream.id,
            data: Some(stream.data),
            config: stream.config,
            stop_tx: None,
        }))
    }
}

/// Recorder emitting the file contents in timesliced fragments
///
/// On stop, whatever has not been emitted yet is flushed as one final
/// fragment before `RecorderEvent::Stopped`.
pub struct FileRecorder {
    stream_id: String,
    data: Option<Vec<u8>>,
    config: FileRecorderConfig,
    stop_tx: Option<oneshot::Sender<()>>,
}

#[async_trait::async_trait]
impl MediaRecorder for FileRecorder {
    async fn start(&mut self) -> Result<mpsc::Receiver<RecorderEvent>> {
        if self.stop_tx.is_some() {
            bail!(CaptureError::Recorder("already recording".to_string()));
        }

        let data = match self.data.take() {
            Some(data) => data,
            None => bail!(CaptureError::Recorder(format!(
                "stream {} already released",
                self.stream_id
            ))),
        };

        let (event_tx, event_rx) = mpsc::channel(100);
        let (stop_tx, stop_rx) = oneshot::channel();

        let timeslice = Duration::from_millis(self.config.timeslice_ms.max(1));
        let fragment_size = self.config.fragment_size.max(1);
        let stream_id = self.stream_id.clone();

        tokio::spawn(emit_fragments(
            stream_id,
            data,
            timeslice,
            fragment_size,
            event_tx,
            stop_rx,
        ));

        self.stop_tx = Some(stop_tx);

        info!("File recorder started on stream {}", self.stream_id);

        Ok(event_rx)
    }

    async fn stop(&mut self) -> Result<()> {
        match self.stop_tx.take() {
            Some(stop_tx) => {
                info!("Stopping file recorder on stream {}", self.stream_id);
                // The emitter treats a dropped sender as a stop request too
                let _ = stop_tx.send(());
            }
            None => debug!("File recorder on stream {} not recording", self.stream_id),
        }

        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.stop_tx.is_some()
    }

    fn name(&self) -> &str {
        "file"
    }
}

async fn emit_fragments(
    stream_id: String,
    data: Vec<u8>,
    timeslice: Duration,
    fragment_size: usize,
    event_tx: mpsc::Sender<RecorderEvent>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let started = Instant::now();
    let mut ticker = tokio::time::interval(timeslice);
    // First tick completes immediately
    ticker.tick().await;

    let mut offset = 0;

    loop {
        tokio::select! {
            _ = &mut stop_rx => break,
            _ = ticker.tick(), if offset < data.len() => {
                let end = (offset + fragment_size).min(data.len());
                let fragment = Fragment::new(&data[offset..end], elapsed_ms(started));
                offset = end;

                if event_tx.send(RecorderEvent::Data(fragment)).await.is_err() {
                    warn!("Event receiver for stream {} dropped", stream_id);
                    return;
                }
            }
        }
    }

    if offset < data.len() {
        let fragment = Fragment::new(&data[offset..], elapsed_ms(started));
        if event_tx.send(RecorderEvent::Data(fragment)).await.is_err() {
            warn!("Event receiver for stream {} dropped", stream_id);
            return;
        }
    }

    if event_tx.send(RecorderEvent::Stopped).await.is_err() {
        warn!("Event receiver for stream {} dropped before stop", stream_id);
    }

    info!("File stream {} released", stream_id);
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
