//! Time-bounded raw packet capture.
//!
//! A [`CaptureSession`] reads frames from a [`FrameSource`] until its
//! deadline, decodes the Ethernet and IPv4 header fields, resolves the
//! endpoints to host names and writes one flushed line per frame.

pub mod capture;
pub mod config;
pub mod decoder;
pub mod domain;
pub mod emitter;
pub mod error;
pub mod resolver;
pub mod session;

pub use capture::{FrameSource, MemorySource, PnetCapture};
pub use config::{CaptureConfig, ResolverConfig};
pub use decoder::HeaderDecoder;
pub use domain::{DecodedFrame, MalformedFrame, MalformedReason, ResolvedEndpoint};
pub use emitter::RecordEmitter;
pub use error::{CaptureError, ConfigError};
pub use resolver::{EndpointResolver, NameResolver, SystemResolver};
pub use session::{CancellationToken, CaptureSession, SessionState, SessionSummary};
