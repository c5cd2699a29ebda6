//! Frame capture abstraction.
//!
//! This module defines the `FrameSource` trait and provides a pnet-based
//! live implementation plus an in-memory one for tests and replays.

mod memory_source;
mod pnet_capture;

pub use memory_source::MemorySource;
pub use pnet_capture::PnetCapture;

use std::io;

/// How long a live receive blocks before returning control to the session.
pub const READ_TIMEOUT_MS: u64 = 100;

/// Trait for link-layer frame sources.
///
/// `next_frame` blocks until a frame arrives or the source's read timeout
/// elapses. A timeout is reported as an error of kind `TimedOut` (or
/// `WouldBlock`/`Interrupted`), which the session treats as a chance to
/// check for cancellation rather than a failure.
pub trait FrameSource: Send {
    /// Receive the next raw frame.
    ///
    /// The returned slice is only valid until the next call.
    fn next_frame(&mut self) -> io::Result<&[u8]>;

    /// Name of the interface (or other origin) frames come from.
    fn interface_name(&self) -> &str;
}

/// Whether a receive error only means "no frame yet".
pub fn is_interruption(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}
