//! Storage infrastructure: the configuration file.
//!
//! The host never writes anything back; the `config` sub-module only reads
//! the TOML file from the platform-appropriate directory and falls back to
//! built-in defaults when it does not exist.

pub mod config;
