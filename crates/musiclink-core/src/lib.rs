//! # musiclink-core
//!
//! Shared library for MusicLink containing the serial line protocol, the
//! now-playing data model, and the decisions behind keeping a display device
//! in sync with a desktop media player.
//!
//! It has zero dependencies on OS APIs, serial ports, or child processes.
//!
//! # Architecture overview
//!
//! MusicLink mirrors what a desktop media player is doing onto a small
//! microcontroller with a screen and a few buttons, connected over USB serial.
//! The host announces the current track and play state; the device sends back
//! short commands (play/pause, skip, pick a playlist, seek).
//!
//! - **`protocol`** – How lines travel over the serial link.  Outgoing status
//!   lines and incoming command lines are both `"<CODE> <payload>\n"` text.
//!
//! - **`domain`** – Pure logic with no I/O: the [`PlayerStatus`] snapshot, the
//!   fixed-point "tenths" encoding used for timing, the per-session
//!   [`SyncState`], and the display abbreviation helper.

pub mod domain;
pub mod protocol;

pub use domain::abbreviate::{abbreviate, DEFAULT_ABBREVIATE_LEN};
pub use domain::status::{fixed_point_tenths, PlayerStatus, TrackTimes};
pub use domain::sync::{Drift, SessionPhase, SyncState};
pub use protocol::codec::{decode_line, encode_line, ProtocolError};
pub use protocol::messages::{Command, CommandRequest, OutboundMessage};
