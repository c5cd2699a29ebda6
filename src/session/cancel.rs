//! Cancellation token and the deadline timer that trips it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};

/// Shared stop request, checked by the capture loop at each iteration.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// One-shot timer that cancels a token after a fixed duration.
///
/// The timer only touches the token. Dropping it disarms the timer and
/// joins its thread.
pub struct DeadlineTimer {
    disarm: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl DeadlineTimer {
    pub fn arm(duration: Duration, token: CancellationToken) -> std::io::Result<Self> {
        let (disarm, disarmed) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("capture-deadline".to_string())
            .spawn(move || match disarmed.recv_timeout(duration) {
                Err(RecvTimeoutError::Timeout) => {
                    tracing::debug!("Capture deadline reached");
                    token.cancel();
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
            })?;

        Ok(Self {
            disarm: Some(disarm),
            handle: Some(handle),
        })
    }
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) {
        // Closing the channel wakes the timer thread
        self.disarm.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
