//! Capture session management
//!
//! This module provides the `CaptureSession` abstraction that manages:
//! - Capability check and stream acquisition
//! - The active recorder (at most one per session object)
//! - Fragment collection and blob assembly on stop
//! - Session statistics

mod session;
mod stats;

pub use session::{CaptureSession, StartOutcome};
pub use stats::{SessionStats, SessionStatsHandle};
