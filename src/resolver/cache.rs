//! Session-scoped cache of reverse lookup results.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

/// Cached lookup result; `hostname` is `None` for a failed lookup.
#[derive(Debug, Clone)]
struct CachedName {
    hostname: Option<String>,
    stored_at: Instant,
}

/// Time-bounded map from address to lookup result.
///
/// Failed lookups are cached too, so an unreachable name service is only
/// asked once per address per TTL window.
#[derive(Debug)]
pub struct ResolutionCache {
    entries: HashMap<Ipv4Addr, CachedName>,
    ttl: Duration,
}

impl ResolutionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Get a cached result.
    ///
    /// The outer `Option` is the cache hit, the inner one the lookup result.
    /// Expired entries are evicted and reported as a miss.
    pub fn get(&mut self, addr: Ipv4Addr) -> Option<Option<String>> {
        let entry = self.entries.get(&addr)?;
        if entry.stored_at.elapsed() >= self.ttl {
            self.entries.remove(&addr);
            return None;
        }
        Some(entry.hostname.clone())
    }

    pub fn insert(&mut self, addr: Ipv4Addr, hostname: Option<String>) {
        self.entries.insert(
            addr,
            CachedName {
                hostname,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
