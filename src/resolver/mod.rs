//! Endpoint name resolution.
//!
//! This module defines the `NameResolver` trait so the capture session can
//! be driven with the system resolver in production and a stub in tests.
//! `EndpointResolver` layers the fallback, timeout and cache policy on top.

mod cache;
mod endpoint_resolver;
mod system;
mod worker;

pub use cache::ResolutionCache;
pub use endpoint_resolver::{EndpointResolver, ResolverStats};
pub use system::SystemResolver;

use std::net::Ipv4Addr;

/// Trait for reverse name lookups.
///
/// Implementations return `None` when no name is available. They may block.
pub trait NameResolver: Send + Sync {
    /// Look up the host name for an IPv4 address.
    fn reverse_lookup(&self, addr: Ipv4Addr) -> Option<String>;
}
