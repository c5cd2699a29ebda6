//! The bounded capture loop.

use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};

use super::cancel::{CancellationToken, DeadlineTimer};
use super::summary::SessionSummary;
use crate::capture::{is_interruption, FrameSource};
use crate::decoder::HeaderDecoder;
use crate::emitter::RecordEmitter;
use crate::error::CaptureError;
use crate::resolver::EndpointResolver;

/// Lifecycle of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Init,
    Running,
    Terminated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "INIT"),
            Self::Running => write!(f, "RUNNING"),
            Self::Terminated => write!(f, "TERMINATED"),
        }
    }
}

/// Receives frames for a fixed duration and writes one record per frame.
///
/// Each received frame gets the next sequence number (starting at 1),
/// whether or not it decodes. The session stops when its deadline passes
/// or its cancellation token is cancelled; the check happens at the top of
/// every iteration and again after each receive, so no record is written
/// once termination has been requested. A lookup already in progress is
/// allowed to finish.
pub struct CaptureSession<S: FrameSource, W: Write> {
    source: Option<S>,
    decoder: HeaderDecoder,
    resolver: EndpointResolver,
    emitter: RecordEmitter<W>,
    duration: Duration,
    cancel: CancellationToken,
    frame_count: u64,
    state: SessionState,
}

impl<S: FrameSource, W: Write> CaptureSession<S, W> {
    pub fn new(
        source: S,
        resolver: EndpointResolver,
        emitter: RecordEmitter<W>,
        duration: Duration,
    ) -> Self {
        Self {
            source: Some(source),
            decoder: HeaderDecoder::new(),
            resolver,
            emitter,
            duration,
            cancel: CancellationToken::new(),
            frame_count: 0,
            state: SessionState::Init,
        }
    }

    /// Token that stops the session early when cancelled (e.g. on Ctrl+C).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Frames received so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Run the session to completion.
    ///
    /// Returns once the deadline fires, the token is cancelled, or a record
    /// cannot be written. The frame source is released before returning.
    pub fn run(&mut self) -> Result<SessionSummary, CaptureError> {
        if self.state != SessionState::Init {
            return Err(CaptureError::SessionFinished);
        }
        let mut source = self.source.take().ok_or(CaptureError::SessionFinished)?;

        let timer = DeadlineTimer::arm(self.duration, self.cancel.clone())
            .map_err(CaptureError::Timer)?;
        let started = Instant::now();
        let deadline = started + self.duration;
        self.transition(SessionState::Running);

        tracing::info!(
            "Capturing on {} for {:.1}s",
            source.interface_name(),
            self.duration.as_secs_f64()
        );

        let mut summary = SessionSummary::default();
        let stop_requested =
            |cancel: &CancellationToken| cancel.is_cancelled() || Instant::now() >= deadline;

        let result = loop {
            if stop_requested(&self.cancel) {
                break Ok(());
            }

            let data = match source.next_frame() {
                Ok(data) => data,
                Err(e) if is_interruption(&e) => continue,
                Err(e) => {
                    summary.receive_errors += 1;
                    tracing::debug!("Receive error: {}", e);
                    continue;
                }
            };

            if stop_requested(&self.cancel) {
                summary.discarded += 1;
                break Ok(());
            }

            self.frame_count += 1;
            if let Err(e) = self.dispatch(self.frame_count, data, &mut summary) {
                break Err(e);
            }
        };

        drop(timer);
        drop(source);
        self.cancel.cancel();

        let flushed = self.emitter.flush();
        self.transition(SessionState::Terminated);

        summary.frames = self.frame_count;
        summary.resolver = self.resolver.stats();
        summary.elapsed = started.elapsed();

        match result.and(flushed.map_err(CaptureError::Sink)) {
            Ok(()) => {
                tracing::info!("Capture completed: {}", summary);
                if self.resolver.is_enabled() {
                    tracing::debug!("Resolution: {}", summary.resolver);
                }
                Ok(summary)
            }
            Err(e) => {
                tracing::debug!("Capture stopped after {} frames", summary.frames);
                Err(e)
            }
        }
    }

    /// Decode, resolve and record one frame.
    fn dispatch(
        &mut self,
        sequence: u64,
        data: &[u8],
        summary: &mut SessionSummary,
    ) -> Result<(), CaptureError> {
        let written = match self.decoder.decode(data) {
            Ok(frame) => {
                summary.record_protocol(frame.protocol);
                let source = self.resolver.resolve(frame.src_ip);
                let destination = self.resolver.resolve(frame.dst_ip);
                self.emitter.emit(sequence, &frame, &source, &destination)
            }
            Err(malformed) => {
                summary.malformed += 1;
                tracing::debug!("Frame {}: {}", sequence, malformed);
                self.emitter.emit_malformed(sequence, &malformed)
            }
        };

        written.map_err(CaptureError::Sink)
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!("Session state {} -> {}", self.state, next);
        self.state = next;
    }

    /// Consume the session and return its record sink.
    pub fn into_sink(self) -> W {
        self.emitter.into_inner()
    }
}
