use thiserror::Error;

/// Errors raised by capture devices and the capture session
///
/// These travel inside `anyhow::Error`; callers that need to branch on the
/// failure kind use `err.downcast_ref::<CaptureError>()`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user or platform refused access to the input device
    #[error("permission to capture audio was denied: {0}")]
    PermissionDenied(String),

    /// The platform could not provide a stream matching the constraints
    #[error("failed to acquire audio stream: {0}")]
    AcquisitionFailed(String),

    /// `start` was called while a recording is still active
    #[error("a recording session is already active")]
    AlreadyRecording,

    /// The recorder failed to start or stop
    #[error("recorder error: {0}")]
    Recorder(String),
}
