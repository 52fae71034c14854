use tracing::warn;

/// Shown when the host has no media capture capability
pub const NO_CAPTURE_MESSAGE: &str = "No media capture API available on this host.";

/// User-facing notices
///
/// The capture session reports non-fatal conditions here instead of failing.
pub trait UserNotifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier that writes notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl UserNotifier for LogNotifier {
    fn notify(&self, message: &str) {
        warn!("{}", message);
    }
}
