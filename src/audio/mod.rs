pub mod backend;
pub mod blob;
pub mod file;
pub mod unavailable;

pub use backend::{
    CaptureSource, Fragment, MediaConstraints, MediaDevices, MediaDevicesFactory, MediaRecorder,
    MediaStream, RecorderEvent,
};
pub use blob::{AudioBlob, FragmentBuffer, AUDIO_WEBM};
pub use file::{FileMediaDevices, FileRecorder, FileRecorderConfig, FileStream};
pub use unavailable::UnavailableMediaDevices;
