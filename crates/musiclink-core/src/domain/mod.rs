//! Domain types and pure logic for MusicLink.
//!
//! Nothing in this module performs I/O.  Timestamps are passed in by the
//! caller so every decision can be exercised with a fake clock.
//!
//! # Sub-modules
//!
//! - **`status`** – [`status::PlayerStatus`], the snapshot of what the player
//!   is doing, and the fixed-point tenths encoding used for timing values.
//! - **`sync`** – [`sync::SyncState`], what the device currently believes, and
//!   the drift rules that decide which corrective lines to send.
//! - **`abbreviate`** – shortening of long album and track names so they fit
//!   the device display.

pub mod abbreviate;
pub mod status;
pub mod sync;
