//! Player Status Adapter implementations.
//!
//! `osascript` is how the host talks to the Music app; it is only present on
//! macOS, but the adapter is plain process spawning and compiles everywhere.

pub mod mock;
pub mod osascript;

pub use osascript::OsaScriptPlayer;
