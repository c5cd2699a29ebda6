//! Decoded frame views and malformed-frame outcomes.

use std::fmt;
use std::net::Ipv4Addr;

use macaddr::MacAddr6;
use thiserror::Error;

/// Header fields extracted from one received frame.
///
/// Addresses and the protocol number are copied out of the buffer; the
/// frame bytes themselves stay borrowed, so a `DecodedFrame` cannot outlive
/// the receive iteration that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedFrame<'a> {
    /// Source link-layer address
    pub src_mac: MacAddr6,
    /// Destination link-layer address
    pub dst_mac: MacAddr6,
    /// Source IPv4 address
    pub src_ip: Ipv4Addr,
    /// Destination IPv4 address
    pub dst_ip: Ipv4Addr,
    /// IPv4 protocol field (6 = TCP, 17 = UDP, ...)
    pub protocol: u8,
    /// The complete raw frame
    pub bytes: &'a [u8],
}

impl DecodedFrame<'_> {
    /// Length of the raw frame in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Why a frame could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// The frame ends before the fixed-offset header fields.
    TooShort { expected: usize, actual: usize },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { expected, actual } => {
                write!(f, "too short: {actual} of {expected} bytes")
            }
        }
    }
}

/// A frame that was received but could not be decoded.
///
/// Malformed frames still take a sequence number and produce a record.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("malformed frame ({reason})")]
pub struct MalformedFrame {
    pub reason: MalformedReason,
}

impl MalformedFrame {
    pub fn too_short(expected: usize, actual: usize) -> Self {
        Self {
            reason: MalformedReason::TooShort { expected, actual },
        }
    }
}

/// Human-readable name for an IPv4 protocol number.
pub fn protocol_name(protocol: u8) -> Option<&'static str> {
    match protocol {
        1 => Some("ICMP"),
        2 => Some("IGMP"),
        6 => Some("TCP"),
        17 => Some("UDP"),
        47 => Some("GRE"),
        50 => Some("ESP"),
        58 => Some("ICMPv6"),
        132 => Some("SCTP"),
        _ => None,
    }
}
