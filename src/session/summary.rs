//! End-of-session statistics.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::domain::protocol_name;
use crate::resolver::ResolverStats;

/// What a capture session did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Frames that received a sequence number (malformed included)
    pub frames: u64,
    /// Frames too short to decode
    pub malformed: u64,
    /// Receive calls that failed with something other than a timeout
    pub receive_errors: u64,
    /// Frames received after cancellation and not recorded
    pub discarded: u64,
    /// Decoded frames per IPv4 protocol number
    pub protocols: BTreeMap<u8, u64>,
    pub resolver: ResolverStats,
    /// Time spent in the running state
    pub elapsed: Duration,
}

impl SessionSummary {
    pub(crate) fn record_protocol(&mut self, protocol: u8) {
        *self.protocols.entry(protocol).or_insert(0) += 1;
    }

    /// Frame count for a protocol number.
    pub fn protocol_count(&self, protocol: u8) -> u64 {
        self.protocols.get(&protocol).copied().unwrap_or(0)
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames in {:.1}s ({} malformed, {} receive errors, {} discarded)",
            self.frames,
            self.elapsed.as_secs_f64(),
            self.malformed,
            self.receive_errors,
            self.discarded
        )?;

        if !self.protocols.is_empty() {
            let protocols: Vec<_> = self
                .protocols
                .iter()
                .map(|(protocol, count)| match protocol_name(*protocol) {
                    Some(name) => format!("{name}={count}"),
                    None => format!("proto {protocol}={count}"),
                })
                .collect();
            write!(f, " [{}]", protocols.join(", "))?;
        }

        Ok(())
    }
}
