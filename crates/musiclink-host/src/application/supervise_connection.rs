//! Connection supervisor: discover → open → run session → repeat.
//!
//! ```text
//! loop {
//!     connector.connect()
//!     ├─ Ok(transport) → SyncSession::run() until TransportError
//!     │                  (transport dropped, straight back to discovery)
//!     └─ Err(_)        → sleep(backoff), retry
//! }
//! ```
//!
//! Nothing in here ends the process.  Each session gets a fresh
//! [`SyncSession`], so no sync state survives a reconnect.

use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::application::clock::Clock;
use crate::application::player::PlayerStatusAdapter;
use crate::application::sync_session::{SessionSettings, SyncSession};
use crate::application::transport::{LineTransport, TransportError};

/// Errors while finding and opening the device.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// No serial endpoint matched the descriptor.
    #[error("no serial device matching {descriptor:?}")]
    NotFound { descriptor: String },

    /// Listing serial endpoints failed.
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(String),

    /// A matching endpoint was found but could not be opened.
    #[error("failed to open {port}: {reason}")]
    Open { port: String, reason: String },
}

/// Finds the device and opens a transport to it.
pub trait Connector {
    fn connect(&mut self) -> Result<Box<dyn LineTransport>, DiscoveryError>;
}

/// What one supervisor iteration did.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// A session ran and ended with this transport failure.
    SessionEnded(TransportError),
    /// No transport could be opened; the backoff has been slept.
    NoDevice(DiscoveryError),
}

pub struct ConnectionSupervisor {
    connector: Box<dyn Connector>,
    player: Box<dyn PlayerStatusAdapter>,
    clock: Box<dyn Clock>,
    settings: SessionSettings,
    backoff: Duration,
}

impl ConnectionSupervisor {
    pub fn new(
        connector: Box<dyn Connector>,
        player: Box<dyn PlayerStatusAdapter>,
        clock: Box<dyn Clock>,
        settings: SessionSettings,
        backoff: Duration,
    ) -> Self {
        Self {
            connector,
            player,
            clock,
            settings,
            backoff,
        }
    }

    /// Runs discovery and session attempts forever.
    pub fn run_forever(&mut self) -> ! {
        loop {
            self.run_once();
        }
    }

    /// One discovery attempt, plus the full session if it succeeded.
    pub fn run_once(&mut self) -> AttemptOutcome {
        match self.connector.connect() {
            Ok(transport) => {
                info!("serial device connected");
                let session = SyncSession::new(
                    transport,
                    self.player.as_mut(),
                    self.clock.as_ref(),
                    self.settings.clone(),
                );
                let err = session.run();
                warn!("serial session ended: {err}");
                AttemptOutcome::SessionEnded(err)
            }
            Err(e) => {
                warn!("{e}; retrying in {:?}", self.backoff);
                self.clock.sleep(self.backoff);
                AttemptOutcome::NoDevice(e)
            }
        }
    }
}
