//! Newline-framed text over a serial port.
//!
//! The port is opened with a short read timeout.  A read that times out
//! before a whole line arrived reports `Ok(None)`; the bytes received so far
//! stay buffered and are completed by later reads.  A device that keeps
//! sending bytes without a newline cannot hold a read past the timeout, and
//! a line longer than [`MAX_LINE_LEN`] is dropped up to its newline.

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use serialport::SerialPort;
use tracing::warn;

use crate::application::transport::{LineTransport, TransportError};

const READ_CHUNK: usize = 256;

/// Longest unterminated line kept in the buffer.
pub const MAX_LINE_LEN: usize = 1024;

pub struct SerialTransport<R = Box<dyn SerialPort>, W = Box<dyn SerialPort>> {
    reader: R,
    writer: W,
    read_timeout: Duration,
    pending: Vec<u8>,
    /// Prefix of `pending` already known to hold no newline.
    scanned: usize,
    /// Set while the rest of an overlong line is being skipped.
    discarding: bool,
}

impl SerialTransport {
    /// Opens `port_name` and splits it into independent read and write handles.
    ///
    /// # Errors
    ///
    /// Returns the `serialport` error if the port cannot be opened or cloned.
    pub fn open(
        port_name: &str,
        baud_rate: u32,
        read_timeout: Duration,
    ) -> Result<Self, serialport::Error> {
        let reader = serialport::new(port_name, baud_rate)
            .timeout(read_timeout)
            .open()?;
        let writer = reader.try_clone()?;
        Ok(Self::new(reader, writer, read_timeout))
    }
}

impl<R: Read, W: Write> SerialTransport<R, W> {
    /// Wraps `reader` and `writer`; one `read_line` call returns within about
    /// `read_timeout` even when bytes keep arriving.
    pub fn new(reader: R, writer: W, read_timeout: Duration) -> Self {
        Self {
            reader,
            writer,
            read_timeout,
            pending: Vec::new(),
            scanned: 0,
            discarding: false,
        }
    }

    /// Removes and returns the first complete line in `pending`, if any.
    fn take_line(&mut self) -> Option<String> {
        loop {
            let unscanned = &self.pending[self.scanned..];
            let Some(offset) = unscanned.iter().position(|&b| b == b'\n') else {
                self.scanned = self.pending.len();
                return None;
            };
            let line: Vec<u8> = self.pending.drain(..=self.scanned + offset).collect();
            self.scanned = 0;
            if std::mem::replace(&mut self.discarding, false) {
                continue;
            }
            return Some(String::from_utf8_lossy(&line).into_owned());
        }
    }

    /// Drops the buffered bytes once they exceed [`MAX_LINE_LEN`] without a
    /// newline; the remainder of that line is skipped when it arrives.
    fn discard_overlong(&mut self) {
        if self.pending.len() <= MAX_LINE_LEN {
            return;
        }
        if !self.discarding {
            warn!(
                "dropping unterminated line longer than {} bytes from device",
                MAX_LINE_LEN
            );
        }
        self.pending.clear();
        self.scanned = 0;
        self.discarding = true;
    }
}

impl<R: Read, W: Write> LineTransport for SerialTransport<R, W> {
    fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        let deadline = Instant::now() + self.read_timeout;
        let mut chunk = [0u8; READ_CHUNK];
        let mut expired = false;
        loop {
            if let Some(line) = self.take_line() {
                return Ok(Some(line));
            }
            self.discard_overlong();
            if expired {
                return Ok(None);
            }
            match self.reader.read(&mut chunk) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => {
                    self.pending.extend_from_slice(&chunk[..n]);
                    expired = Instant::now() >= deadline;
                }
                Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                    return Ok(None)
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(TransportError::Io(e)),
            }
        }
    }

    fn write_text(&mut self, text: &str) -> Result<(), TransportError> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}
