use anyhow::Result;

use super::backend::{MediaConstraints, MediaDevices, MediaStream};
use crate::error::CaptureError;

/// Media devices for hosts with no capture capability
pub struct UnavailableMediaDevices;

#[async_trait::async_trait]
impl MediaDevices for UnavailableMediaDevices {
    fn is_available(&self) -> bool {
        false
    }

    async fn get_user_media(&self, _constraints: MediaConstraints) -> Result<Box<dyn MediaStream>> {
        Err(CaptureError::AcquisitionFailed("no media capture capability".to_string()).into())
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}
