//! Domain models for frame capture.
//!
//! These types describe what a captured frame contains once decoded,
//! independent of how it was received or where records are written.

mod endpoint;
mod frame;

pub use endpoint::ResolvedEndpoint;
pub use frame::{protocol_name, DecodedFrame, MalformedFrame, MalformedReason};
