//! Record emission module.
//!
//! Formats decoded, resolved frames as log lines and writes them to the
//! session's sink, one flushed line per frame.

mod record_emitter;

pub use record_emitter::{format_mac, RecordEmitter, MALFORMED_MARKER};
