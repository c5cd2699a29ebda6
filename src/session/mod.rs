//! Capture session module.
//!
//! Owns the bounded receive loop that ties the frame source, decoder,
//! resolver and emitter together.

mod cancel;
mod capture_session;
mod summary;

pub use cancel::{CancellationToken, DeadlineTimer};
pub use capture_session::{CaptureSession, SessionState};
pub use summary::SessionSummary;
