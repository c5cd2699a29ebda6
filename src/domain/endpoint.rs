//! Resolved network endpoints.

use std::fmt;
use std::net::Ipv4Addr;

/// An IPv4 address paired with its resolved host name, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    /// The network-layer address
    pub address: Ipv4Addr,
    /// Host name from reverse resolution, `None` when resolution failed
    pub hostname: Option<String>,
}

impl ResolvedEndpoint {
    /// An endpoint with a resolved host name.
    ///
    /// Empty names are treated as a failed resolution.
    pub fn resolved(address: Ipv4Addr, hostname: String) -> Self {
        if hostname.is_empty() {
            return Self::unresolved(address);
        }

        Self {
            address,
            hostname: Some(hostname),
        }
    }

    /// An endpoint that falls back to its dotted-decimal address.
    pub fn unresolved(address: Ipv4Addr) -> Self {
        Self {
            address,
            hostname: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.hostname.is_some()
    }

    /// The host name, or the dotted-decimal address when unresolved.
    ///
    /// Never empty.
    pub fn name(&self) -> String {
        match &self.hostname {
            Some(name) => name.clone(),
            None => self.address.to_string(),
        }
    }
}

impl fmt::Display for ResolvedEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hostname {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.address),
        }
    }
}
