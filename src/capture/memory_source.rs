//! In-memory frame source.

use std::collections::VecDeque;
use std::io;
use std::thread;
use std::time::Duration;

use super::{FrameSource, READ_TIMEOUT_MS};

enum Scripted {
    Frame(Vec<u8>),
    Error(io::ErrorKind),
}

/// Replays a scripted sequence of frames and receive errors.
///
/// Once the script is exhausted it behaves like an idle interface: each
/// call sleeps for the poll interval and reports a timeout.
pub struct MemorySource {
    name: String,
    script: VecDeque<Scripted>,
    current: Vec<u8>,
    poll_interval: Duration,
}

impl MemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: VecDeque::new(),
            current: Vec::new(),
            poll_interval: Duration::from_millis(READ_TIMEOUT_MS),
        }
    }

    /// Build a source that yields `frames` in order.
    pub fn from_frames<I>(name: impl Into<String>, frames: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let mut source = Self::new(name);
        for frame in frames {
            source.push_frame(frame);
        }
        source
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn push_frame(&mut self, frame: Vec<u8>) {
        self.script.push_back(Scripted::Frame(frame));
    }

    /// Queue a receive error of the given kind.
    pub fn push_error(&mut self, kind: io::ErrorKind) {
        self.script.push_back(Scripted::Error(kind));
    }

    /// Number of scripted entries not yet delivered.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> io::Result<&[u8]> {
        match self.script.pop_front() {
            Some(Scripted::Frame(frame)) => {
                self.current = frame;
                Ok(&self.current)
            }
            Some(Scripted::Error(kind)) => Err(io::Error::from(kind)),
            None => {
                thread::sleep(self.poll_interval);
                Err(io::Error::from(io::ErrorKind::TimedOut))
            }
        }
    }

    fn interface_name(&self) -> &str {
        &self.name
    }
}
