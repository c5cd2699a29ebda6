//! Fallback, timeout and cache policy for endpoint resolution.

use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;

use super::cache::ResolutionCache;
use super::worker::{LookupOutcome, LookupWorker};
use super::NameResolver;
use crate::config::ResolverConfig;
use crate::domain::ResolvedEndpoint;

/// Counters for resolution activity during a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Calls to `resolve`
    pub lookups: u64,
    /// Endpoints that ended up with a host name
    pub resolved: u64,
    /// Endpoints that fell back to their address
    pub fallbacks: u64,
    /// Lookups abandoned because the timeout elapsed
    pub timeouts: u64,
    /// Answers served from the cache
    pub cache_hits: u64,
}

impl fmt::Display for ResolverStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lookups, {} resolved, {} fallbacks, {} timeouts, {} cache hits",
            self.lookups, self.resolved, self.fallbacks, self.timeouts, self.cache_hits
        )
    }
}

enum Backend {
    Disabled,
    Inline(Arc<dyn NameResolver>),
    Bounded(LookupWorker),
}

/// Maps addresses to `ResolvedEndpoint`s.
///
/// Resolution never fails: any lookup that produces no name, times out, or
/// is disabled falls back to the dotted-decimal address.
pub struct EndpointResolver {
    backend: Backend,
    cache: Option<ResolutionCache>,
    stats: ResolverStats,
}

impl EndpointResolver {
    /// Build a resolver around `resolver` following `config`.
    pub fn new(resolver: Arc<dyn NameResolver>, config: &ResolverConfig) -> Self {
        let backend = if !config.enabled {
            Backend::Disabled
        } else {
            match config.timeout {
                None => Backend::Inline(resolver),
                Some(timeout) => match LookupWorker::spawn(Arc::clone(&resolver), timeout) {
                    Ok(worker) => Backend::Bounded(worker),
                    Err(e) => {
                        tracing::warn!(
                            "Failed to start resolver worker ({}), resolving inline",
                            e
                        );
                        Backend::Inline(resolver)
                    }
                },
            }
        };

        let cache = if config.enabled {
            config.cache_ttl.map(ResolutionCache::new)
        } else {
            None
        };

        Self {
            backend,
            cache,
            stats: ResolverStats::default(),
        }
    }

    /// A resolver that never performs lookups.
    pub fn disabled() -> Self {
        Self {
            backend: Backend::Disabled,
            cache: None,
            stats: ResolverStats::default(),
        }
    }

    /// Resolve an address, falling back to its string form.
    pub fn resolve(&mut self, addr: Ipv4Addr) -> ResolvedEndpoint {
        self.stats.lookups += 1;

        let hostname = match self.cache.as_mut().and_then(|cache| cache.get(addr)) {
            Some(cached) => {
                self.stats.cache_hits += 1;
                cached
            }
            None => {
                let (hostname, cacheable) = self.lookup(addr);
                if cacheable {
                    if let Some(cache) = self.cache.as_mut() {
                        cache.insert(addr, hostname.clone());
                    }
                }
                hostname
            }
        };

        let endpoint = match hostname {
            Some(name) => ResolvedEndpoint::resolved(addr, name),
            None => ResolvedEndpoint::unresolved(addr),
        };

        if endpoint.is_resolved() {
            self.stats.resolved += 1;
        } else {
            self.stats.fallbacks += 1;
        }

        endpoint
    }

    /// Query the backend. Timed-out answers are not cached so a later
    /// frame gets another chance.
    fn lookup(&mut self, addr: Ipv4Addr) -> (Option<String>, bool) {
        match &self.backend {
            Backend::Disabled => (None, false),
            Backend::Inline(resolver) => (resolver.reverse_lookup(addr), true),
            Backend::Bounded(worker) => match worker.lookup(addr) {
                LookupOutcome::Answered(hostname) => (hostname, true),
                LookupOutcome::TimedOut => {
                    tracing::debug!("Reverse lookup for {} timed out", addr);
                    self.stats.timeouts += 1;
                    (None, false)
                }
            },
        }
    }

    pub fn stats(&self) -> ResolverStats {
        self.stats
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.backend, Backend::Disabled)
    }
}
