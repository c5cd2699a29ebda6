//! Reverse lookups through the host's configured name service.

use std::net::{IpAddr, Ipv4Addr};

use dns_lookup::lookup_addr;

use super::NameResolver;

/// Resolver backed by the operating system (`getnameinfo`).
///
/// Honors `/etc/hosts`, `nsswitch.conf` and the configured DNS servers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl SystemResolver {
    pub fn new() -> Self {
        Self
    }
}

impl NameResolver for SystemResolver {
    fn reverse_lookup(&self, addr: Ipv4Addr) -> Option<String> {
        match lookup_addr(&IpAddr::V4(addr)) {
            Ok(hostname) if !hostname.is_empty() => {
                tracing::trace!("Resolved {} -> {}", addr, hostname);
                Some(hostname)
            }
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("Failed to resolve {}: {}", addr, e);
                None
            }
        }
    }
}
