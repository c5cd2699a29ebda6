//! Background lookup worker with a bounded wait on the caller side.

use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, unbounded, RecvTimeoutError, Sender};

use super::NameResolver;

struct LookupRequest {
    addr: Ipv4Addr,
    expires_at: Instant,
    reply: Sender<Option<String>>,
}

/// Result of a bounded lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LookupOutcome {
    /// The worker answered in time (`None` means no name).
    Answered(Option<String>),
    /// The worker did not answer before the timeout.
    TimedOut,
}

/// Runs reverse lookups on a dedicated thread.
///
/// The caller waits at most `timeout` for each answer. A lookup already in
/// progress on the worker cannot be cancelled; requests that expire while
/// queued behind it are skipped. Dropping the handle closes the request
/// channel and the thread exits once its current lookup returns.
pub(crate) struct LookupWorker {
    requests: Sender<LookupRequest>,
    timeout: Duration,
}

impl LookupWorker {
    pub(crate) fn spawn(resolver: Arc<dyn NameResolver>, timeout: Duration) -> io::Result<Self> {
        let (requests, rx) = unbounded::<LookupRequest>();

        thread::Builder::new()
            .name("endpoint-resolver".to_string())
            .spawn(move || {
                tracing::debug!("Resolver worker started");

                for request in rx.iter() {
                    if Instant::now() >= request.expires_at {
                        tracing::trace!("Skipping expired lookup for {}", request.addr);
                        continue;
                    }

                    let hostname = resolver.reverse_lookup(request.addr);
                    // The caller may have timed out and dropped the receiver
                    let _ = request.reply.send(hostname);
                }

                tracing::debug!("Resolver worker stopping");
            })?;

        Ok(Self { requests, timeout })
    }

    pub(crate) fn lookup(&self, addr: Ipv4Addr) -> LookupOutcome {
        let (reply, answer) = bounded(1);
        let request = LookupRequest {
            addr,
            expires_at: Instant::now() + self.timeout,
            reply,
        };

        if self.requests.send(request).is_err() {
            tracing::debug!("Resolver worker is gone, skipping lookup for {}", addr);
            return LookupOutcome::Answered(None);
        }

        match answer.recv_timeout(self.timeout) {
            Ok(hostname) => LookupOutcome::Answered(hostname),
            Err(RecvTimeoutError::Timeout) => LookupOutcome::TimedOut,
            Err(RecvTimeoutError::Disconnected) => LookupOutcome::Answered(None),
        }
    }
}
