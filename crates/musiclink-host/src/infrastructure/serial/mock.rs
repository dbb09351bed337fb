//! In-memory serial fakes for tests.
//!
//! [`MockTransport`] plays back a script of reads and captures everything
//! written.  The test keeps a [`WireHandle`] to inspect the captured text
//! after the session has taken ownership of (and eventually dropped) the
//! transport.  Once the script runs out, reads report the device as gone.
//!
//! [`MockConnector`] hands out queued transports or discovery errors, then
//! reports "not found" forever.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crate::application::clock::ManualClock;
use crate::application::supervise_connection::{Connector, DiscoveryError};
use crate::application::transport::{LineTransport, TransportError};

/// One scripted result for [`LineTransport::read_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedRead {
    /// A complete line, newline included.
    Line(String),
    /// The read timeout expired with no line.
    Timeout,
    /// The port reported an I/O error.
    Fail,
}

impl ScriptedRead {
    /// A line with its trailing newline appended.
    pub fn line(text: &str) -> Self {
        ScriptedRead::Line(format!("{text}\n"))
    }
}

#[derive(Debug, Default)]
struct Wire {
    written: String,
    closed: bool,
}

/// Test-side view of a [`MockTransport`].
#[derive(Debug, Clone, Default)]
pub struct WireHandle {
    wire: Rc<RefCell<Wire>>,
}

impl WireHandle {
    /// Everything written so far, concatenated.
    pub fn written(&self) -> String {
        self.wire.borrow().written.clone()
    }

    /// Everything written so far, one entry per line, newlines stripped.
    pub fn lines(&self) -> Vec<String> {
        self.wire.borrow().written.lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.wire.borrow_mut().written.clear();
    }

    /// `true` once the transport has been dropped.
    pub fn is_closed(&self) -> bool {
        self.wire.borrow().closed
    }
}

pub struct MockTransport {
    reads: VecDeque<ScriptedRead>,
    wire: Rc<RefCell<Wire>>,
    /// Writes still allowed to succeed; `None` means unlimited.
    writes_left: Option<usize>,
    clock: Option<(ManualClock, Duration)>,
}

impl MockTransport {
    pub fn new(reads: Vec<ScriptedRead>) -> (Self, WireHandle) {
        let wire = Rc::new(RefCell::new(Wire::default()));
        let transport = Self {
            reads: reads.into(),
            wire: Rc::clone(&wire),
            writes_left: None,
            clock: None,
        };
        (transport, WireHandle { wire })
    }

    /// A transport whose every write fails.
    pub fn failing_writes(reads: Vec<ScriptedRead>) -> (Self, WireHandle) {
        Self::failing_after(reads, 0)
    }

    /// A transport whose first `writes` writes succeed and every later one
    /// fails.
    pub fn failing_after(reads: Vec<ScriptedRead>, writes: usize) -> (Self, WireHandle) {
        let (mut transport, handle) = Self::new(reads);
        transport.writes_left = Some(writes);
        (transport, handle)
    }

    /// Advances `clock` by `step` on every read, the way a blocking read
    /// with a timeout would.
    pub fn with_clock(mut self, clock: &ManualClock, step: Duration) -> Self {
        self.clock = Some((clock.clone(), step));
        self
    }
}

impl LineTransport for MockTransport {
    fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        if let Some((clock, step)) = &self.clock {
            clock.advance(*step);
        }
        match self.reads.pop_front() {
            Some(ScriptedRead::Line(line)) => Ok(Some(line)),
            Some(ScriptedRead::Timeout) => Ok(None),
            Some(ScriptedRead::Fail) => Err(TransportError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "device unplugged",
            ))),
            None => Err(TransportError::Closed),
        }
    }

    fn write_text(&mut self, text: &str) -> Result<(), TransportError> {
        match &mut self.writes_left {
            Some(0) => {
                return Err(TransportError::Io(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "write failed",
                )))
            }
            Some(left) => *left -= 1,
            None => {}
        }
        self.wire.borrow_mut().written.push_str(text);
        Ok(())
    }
}

impl Drop for MockTransport {
    fn drop(&mut self) {
        self.wire.borrow_mut().closed = true;
    }
}

/// A connector that returns queued results in order.
pub struct MockConnector {
    descriptor: String,
    results: VecDeque<Result<Box<dyn LineTransport>, DiscoveryError>>,
    attempts: Rc<RefCell<usize>>,
}

impl MockConnector {
    /// A connector that never finds `descriptor` unless results are queued.
    pub fn not_found(descriptor: &str) -> Self {
        Self {
            descriptor: descriptor.to_string(),
            results: VecDeque::new(),
            attempts: Rc::new(RefCell::new(0)),
        }
    }

    /// Queues a successful connection.
    pub fn then_transport(mut self, transport: MockTransport) -> Self {
        self.results.push_back(Ok(Box::new(transport)));
        self
    }

    /// Queues a failed connection.
    pub fn then_error(mut self, error: DiscoveryError) -> Self {
        self.results.push_back(Err(error));
        self
    }

    /// Shared counter of `connect` calls.
    pub fn attempts(&self) -> Rc<RefCell<usize>> {
        Rc::clone(&self.attempts)
    }
}

impl Connector for MockConnector {
    fn connect(&mut self) -> Result<Box<dyn LineTransport>, DiscoveryError> {
        *self.attempts.borrow_mut() += 1;
        self.results.pop_front().unwrap_or_else(|| {
            Err(DiscoveryError::NotFound {
                descriptor: self.descriptor.clone(),
            })
        })
    }
}
