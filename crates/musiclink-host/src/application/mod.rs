//! Application layer use cases for the host.
//!
//! - **`sync_session`** – one serial session: handshake, then the
//!   read → dispatch → reconcile loop until the transport fails.
//! - **`dispatch_command`** – maps each device command to player actions and
//!   outgoing lines.
//! - **`supervise_connection`** – discovery, backoff, and session restarts.
//!
//! The seams the use cases depend on are traits defined here and implemented
//! in `infrastructure`: [`player::PlayerStatusAdapter`],
//! [`transport::LineTransport`], [`supervise_connection::Connector`], and
//! [`clock::Clock`].

pub mod clock;
pub mod dispatch_command;
pub mod player;
pub mod scripts;
pub mod supervise_connection;
pub mod sync_session;
pub mod transport;
