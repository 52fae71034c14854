pub mod audio;
pub mod config;
pub mod error;
pub mod http;
pub mod notice;
pub mod session;

pub use audio::{
    AudioBlob, CaptureSource, FileMediaDevices, FileRecorderConfig, Fragment, FragmentBuffer,
    MediaConstraints, MediaDevices, MediaDevicesFactory, MediaRecorder, MediaStream,
    RecorderEvent, UnavailableMediaDevices, AUDIO_WEBM,
};
pub use config::Config;
pub use error::CaptureError;
pub use http::{create_router, AppState};
pub use notice::{LogNotifier, UserNotifier};
pub use session::{CaptureSession, SessionStats, SessionStatsHandle, StartOutcome};
