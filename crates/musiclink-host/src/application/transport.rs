//! Line transport seam: the open, exclusively owned link to the device.

use thiserror::Error;

/// Errors on an open transport.  Any of these ends the session.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A read or write on the serial port failed.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The device went away (end of stream).
    #[error("serial device closed the connection")]
    Closed,
}

/// A newline-framed, bidirectional text link.
///
/// The transport is released (closed) when the value is dropped.
pub trait LineTransport {
    /// Reads one complete line including its `\n`.
    ///
    /// Returns `Ok(None)` when the read timeout expires before a full line
    /// arrived; partial data is kept for the next call.
    fn read_line(&mut self) -> Result<Option<String>, TransportError>;

    /// Writes `text` (one or more complete lines) and flushes.
    fn write_text(&mut self, text: &str) -> Result<(), TransportError>;
}
