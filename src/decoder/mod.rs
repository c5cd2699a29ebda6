//! Frame header decoding module.
//!
//! This module turns raw link-layer bytes into domain frame views.

mod header_decoder;

pub use header_decoder::{HeaderDecoder, ETHERNET_HEADER_LEN, IPV4_MIN_HEADER_LEN, MIN_FRAME_LEN};
