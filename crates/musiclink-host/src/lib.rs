//! musiclink-host library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does musiclink-host do?
//!
//! The host runs next to the desktop media player and owns the USB serial
//! link to the display device:
//!
//! 1. Finds the device by its USB product string and opens the port.
//! 2. Sends a full "now playing" handshake (`BA`/`AL`/`TR`/`TL`/`TP` + `PL`/`PA`).
//! 3. Reads one command line at a time (bounded by the port read timeout) and
//!    drives the player accordingly.
//! 4. After every read, re-checks the player for a new track or a changed
//!    play state and sends corrective lines; every ten seconds while playing
//!    it refreshes the position.
//! 5. When the link drops, starts over from discovery.

/// Application layer: session loop, command dispatch, and the seams to the
/// player, the transport, and the clock.
pub mod application;

/// Infrastructure layer: osascript player adapter, serial port discovery and
/// transport, config file, and in-memory fakes.
pub mod infrastructure;
