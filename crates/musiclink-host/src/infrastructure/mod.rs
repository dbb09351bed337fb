//! Infrastructure layer for the host application.
//!
//! Contains OS-facing adapters: player automation, serial port discovery and
//! I/O, and the config file.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `musiclink_core`, but MUST NOT be imported by the `application` layer
//! outside of tests.
//!
//! # Sub-modules
//!
//! - **`player`** – `PlayerStatusAdapter` implementations.  On macOS the real
//!   one drives the Music app through `osascript`; a `ScriptedPlayer` fake is
//!   always compiled for tests.
//!
//! - **`serial`** – Finds the device among the serial ports by its USB
//!   product string, opens it, and frames reads/writes as text lines.  In-memory
//!   `MockTransport`/`MockConnector` fakes live alongside.
//!
//! - **`storage`** – TOML configuration file loading.

pub mod player;
pub mod serial;
pub mod storage;
