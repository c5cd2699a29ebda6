//! Ethernet + IPv4 fixed-offset header decoder.
//!
//! Ethernet frame layout (14 bytes):
//! - Destination MAC (6 bytes)
//! - Source MAC (6 bytes)
//! - EtherType (2 bytes)
//!
//! The IPv4 header is assumed to follow immediately. Only the protocol
//! (offset 9), source address (12..16) and destination address (16..20)
//! are read. EtherType, IHL, version and checksum are not validated.

use macaddr::MacAddr6;
use pnet::packet::ethernet::EthernetPacket;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::Packet;

use crate::domain::{DecodedFrame, MalformedFrame};

/// Ethernet header size
pub const ETHERNET_HEADER_LEN: usize = 14;
/// IPv4 header size without options
pub const IPV4_MIN_HEADER_LEN: usize = 20;
/// Smallest frame that holds every field the decoder reads
pub const MIN_FRAME_LEN: usize = ETHERNET_HEADER_LEN + IPV4_MIN_HEADER_LEN;

/// Decoder for captured link-layer frames.
///
/// Stateless: decoding the same bytes always yields the same result.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderDecoder;

impl HeaderDecoder {
    /// Create a new header decoder.
    pub fn new() -> Self {
        Self
    }

    /// Decode the fixed-offset header fields of a frame.
    ///
    /// Returns `MalformedFrame` without reading any field when the frame is
    /// shorter than [`MIN_FRAME_LEN`].
    pub fn decode<'a>(&self, data: &'a [u8]) -> Result<DecodedFrame<'a>, MalformedFrame> {
        if data.len() < MIN_FRAME_LEN {
            return Err(MalformedFrame::too_short(MIN_FRAME_LEN, data.len()));
        }

        let too_short = || MalformedFrame::too_short(MIN_FRAME_LEN, data.len());
        let ethernet = EthernetPacket::new(data).ok_or_else(too_short)?;
        let ipv4 = Ipv4Packet::new(ethernet.payload()).ok_or_else(too_short)?;

        Ok(DecodedFrame {
            src_mac: MacAddr6::from(ethernet.get_source().octets()),
            dst_mac: MacAddr6::from(ethernet.get_destination().octets()),
            src_ip: ipv4.get_source(),
            dst_ip: ipv4.get_destination(),
            protocol: ipv4.get_next_level_protocol().0,
            bytes: data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn build_frame(
        src_mac: [u8; 6],
        dst_mac: [u8; 6],
        src_ip: Ipv4Addr,
        dst_ip: Ipv4Addr,
        protocol: u8,
        payload_len: usize,
    ) -> Vec<u8> {
        let mut frame = vec![0u8; MIN_FRAME_LEN + payload_len];

        // Ethernet header
        frame[0..6].copy_from_slice(&dst_mac);
        frame[6..12].copy_from_slice(&src_mac);
        frame[12..14].copy_from_slice(&0x0800u16.to_be_bytes());

        // IPv4 header
        frame[14] = 0x45;
        frame[23] = protocol;
        frame[26..30].copy_from_slice(&src_ip.octets());
        frame[30..34].copy_from_slice(&dst_ip.octets());

        frame
    }

    #[test]
    fn test_decode_tcp_frame() {
        let frame = build_frame(
            [0x00, 0x11, 0x22, 0x33, 0x44, 0x55],
            [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff],
            Ipv4Addr::new(192, 168, 1, 10),
            Ipv4Addr::new(93, 184, 216, 34),
            6,
            20,
        );

        let decoded = HeaderDecoder::new().decode(&frame).unwrap();
        assert_eq!(
            decoded.src_mac,
            MacAddr6::new(0x00, 0x11, 0x22, 0x33, 0x44, 0x55)
        );
        assert_eq!(
            decoded.dst_mac,
            MacAddr6::new(0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff)
        );
        assert_eq!(decoded.src_ip, Ipv4Addr::new(192, 168, 1, 10));
        assert_eq!(decoded.dst_ip, Ipv4Addr::new(93, 184, 216, 34));
        assert_eq!(decoded.protocol, 6);
        assert_eq!(decoded.len(), frame.len());
    }

    #[test]
    fn test_decode_exact_minimum_length() {
        let frame = build_frame(
            [1, 2, 3, 4, 5, 6],
            [6, 5, 4, 3, 2, 1],
            Ipv4Addr::new(10, 0, 0, 1),
            Ipv4Addr::new(10, 0, 0, 2),
            17,
            0,
        );
        assert_eq!(frame.len(), MIN_FRAME_LEN);

        let decoded = HeaderDecoder::new().decode(&frame).unwrap();
        assert_eq!(decoded.protocol, 17);
        assert_eq!(decoded.dst_ip, Ipv4Addr::new(10, 0, 0, 2));
    }

    #[test]
    fn test_frame_too_short() {
        let decoder = HeaderDecoder::new();

        for len in [0, 4, ETHERNET_HEADER_LEN, MIN_FRAME_LEN - 1] {
            let frame = vec![0xffu8; len];
            let result = decoder.decode(&frame);
            assert_eq!(result, Err(MalformedFrame::too_short(MIN_FRAME_LEN, len)));
        }
    }

    #[test]
    fn test_truncated_slice_is_not_over_read() {
        // A full frame sliced short must be judged on the slice alone.
        let frame = build_frame(
            [1, 1, 1, 1, 1, 1],
            [2, 2, 2, 2, 2, 2],
            Ipv4Addr::new(1, 1, 1, 1),
            Ipv4Addr::new(2, 2, 2, 2),
            6,
            10,
        );

        let result = HeaderDecoder::new().decode(&frame[..MIN_FRAME_LEN - 2]);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_ipv4_ethertype_is_not_validated() {
        let mut frame = build_frame(
            [1, 1, 1, 1, 1, 1],
            [2, 2, 2, 2, 2, 2],
            Ipv4Addr::new(172, 16, 0, 1),
            Ipv4Addr::new(172, 16, 0, 2),
            1,
            0,
        );
        // ARP EtherType, header bytes still read at the IPv4 offsets
        frame[12..14].copy_from_slice(&0x0806u16.to_be_bytes());

        let decoded = HeaderDecoder::new().decode(&frame).unwrap();
        assert_eq!(decoded.protocol, 1);
        assert_eq!(decoded.src_ip, Ipv4Addr::new(172, 16, 0, 1));
    }

    #[test]
    fn test_decode_is_idempotent() {
        let frame = build_frame(
            [0xde, 0xad, 0xbe, 0xef, 0x00, 0x01],
            [0xff; 6],
            Ipv4Addr::new(8, 8, 8, 8),
            Ipv4Addr::new(192, 168, 0, 2),
            17,
            64,
        );

        let decoder = HeaderDecoder::new();
        let first = decoder.decode(&frame);
        let second = decoder.decode(&frame);
        assert_eq!(first, second);
    }
}
