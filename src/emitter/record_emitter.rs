//! Line-oriented record writer.

use std::io::{self, Write};

use macaddr::MacAddr6;

use crate::domain::{DecodedFrame, MalformedFrame, ResolvedEndpoint};

/// Marker written in place of the address fields of a malformed frame.
pub const MALFORMED_MARKER: &str = "MALFORMED";

/// Format a MAC address as colon-separated uppercase hex octets.
pub fn format_mac(mac: &MacAddr6) -> String {
    mac.as_bytes()
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Writes one record per frame and flushes after each.
///
/// Record layout:
///
/// ```text
/// Packet <seq>: <src-ip> -> <dst-ip>, Src MAC: <mac>, Dst MAC: <mac>, Protocol: <num> <src-name>
/// Packet <seq>: MALFORMED (too short: <actual> of <expected> bytes)
/// ```
pub struct RecordEmitter<W: Write> {
    sink: W,
    records: u64,
}

impl<W: Write> RecordEmitter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, records: 0 }
    }

    /// Write the record for a decoded frame.
    ///
    /// The trailing field repeats the source name; the destination name is
    /// not part of the record.
    pub fn emit(
        &mut self,
        sequence: u64,
        frame: &DecodedFrame<'_>,
        source: &ResolvedEndpoint,
        destination: &ResolvedEndpoint,
    ) -> io::Result<()> {
        writeln!(
            self.sink,
            "Packet {}: {} -> {}, Src MAC: {}, Dst MAC: {}, Protocol: {} {}",
            sequence,
            source.address,
            destination.address,
            format_mac(&frame.src_mac),
            format_mac(&frame.dst_mac),
            frame.protocol,
            source.name(),
        )?;
        self.commit()
    }

    /// Write the degraded record for a frame that could not be decoded.
    pub fn emit_malformed(&mut self, sequence: u64, malformed: &MalformedFrame) -> io::Result<()> {
        writeln!(
            self.sink,
            "Packet {}: {} ({})",
            sequence, MALFORMED_MARKER, malformed.reason
        )?;
        self.commit()
    }

    fn commit(&mut self) -> io::Result<()> {
        self.sink.flush()?;
        self.records += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Consume the emitter and return the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
