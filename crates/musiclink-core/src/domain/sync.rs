//! Per-session sync bookkeeping: what the device has been told so far.
//!
//! # Session phases
//!
//! ```text
//! Disconnected ──(transport opened)──▶ Handshaking ──(full broadcast + state sent)──▶ Active
//!       ▲                                                                           │
//!       └──────────────────────────(any transport read/write failure)───────────────┘
//! ```
//!
//! A [`SyncState`] exists only while a session does.  A reconnect always
//! starts from a fresh one, so the device gets a full handshake every time.

use std::time::{Duration, Instant};

/// Lifecycle phase of one serial session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Disconnected,
    Handshaking,
    Active,
}

/// Outcome of comparing the player against what the device was last told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drift {
    /// The title differs: send a full broadcast plus the play state.
    TrackChanged,
    /// Same title, different play state: send only `PL`/`PA`.
    PlayStateChanged,
    /// Nothing to correct.
    InSync,
}

/// What the device currently believes.
///
/// Fields are updated only after the corresponding lines were written
/// successfully, so they always mirror the wire and never a computed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncState {
    last_announced_title: Option<String>,
    last_announced_playing: bool,
    last_full_sync_at: Instant,
}

impl SyncState {
    /// Creates the state for a session that has not announced anything yet.
    pub fn new(now: Instant) -> Self {
        Self {
            last_announced_title: None,
            last_announced_playing: false,
            last_full_sync_at: now,
        }
    }

    pub fn last_announced_title(&self) -> Option<&str> {
        self.last_announced_title.as_deref()
    }

    pub fn last_announced_playing(&self) -> bool {
        self.last_announced_playing
    }

    pub fn last_full_sync_at(&self) -> Instant {
        self.last_full_sync_at
    }

    /// Compares the freshly queried `title` and `playing` flag against the
    /// last announcement.  A title change wins over a play-state change.
    pub fn drift(&self, title: &str, playing: bool) -> Drift {
        if self.last_announced_title.as_deref() != Some(title) {
            Drift::TrackChanged
        } else if self.last_announced_playing != playing {
            Drift::PlayStateChanged
        } else {
            Drift::InSync
        }
    }

    /// Records that a full status broadcast for `title` was written.
    pub fn record_track(&mut self, title: impl Into<String>) {
        self.last_announced_title = Some(title.into());
    }

    /// Records that a `PL`/`PA` line for `playing` was written.
    pub fn record_play_state(&mut self, playing: bool) {
        self.last_announced_playing = playing;
    }

    /// `true` once strictly more than `interval` has passed since the last
    /// full sync.
    pub fn interval_elapsed(&self, now: Instant, interval: Duration) -> bool {
        now.saturating_duration_since(self.last_full_sync_at) > interval
    }

    /// Restarts the full-sync interval at `now`.
    pub fn mark_synced(&mut self, now: Instant) {
        self.last_full_sync_at = now;
    }
}
