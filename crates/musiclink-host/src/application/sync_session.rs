//! SyncSession: one serial session from handshake to transport failure.
//!
//! # Loop body
//!
//! ```text
//! handshake: full broadcast + PL/PA                  (Handshaking → Active)
//! loop:
//!   read one line (bounded by the port read timeout)
//!   └─ if a line arrived: decode → dispatch          (dispatch_command.rs)
//!   reconcile:
//!   ├─ title changed?        → full broadcast + PL/PA
//!   ├─ else state changed?   → PL/PA only
//!   └─ interval elapsed?     → TP if playing, restart interval
//! any TransportError → return it                     (Active → Disconnected)
//! ```
//!
//! Player query failures never leave this module as errors; only transport
//! failures do.

use std::time::Duration;

use musiclink_core::protocol::codec::{encode_lines, status_broadcast};
use musiclink_core::{decode_line, Command, Drift, OutboundMessage, ProtocolError, SessionPhase, SyncState};
use tracing::{debug, info, warn};

use crate::application::clock::Clock;
use crate::application::player::{self, PlayerStatusAdapter};
use crate::application::transport::{LineTransport, TransportError};

/// Timing and display parameters for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Maximum staleness of the position shown on the device while playing.
    pub full_sync_interval: Duration,
    /// Pause between starting a playlist and reading back the new track.
    pub playlist_settle: Duration,
    /// Album/title length above which names are abbreviated.
    pub abbreviate_len: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            full_sync_interval: Duration::from_secs(10),
            playlist_settle: Duration::from_secs(1),
            abbreviate_len: musiclink_core::DEFAULT_ABBREVIATE_LEN,
        }
    }
}

/// One active serial session.
///
/// Owns the transport: dropping the session closes the link.
pub struct SyncSession<'a> {
    pub(crate) transport: Box<dyn LineTransport>,
    pub(crate) player: &'a mut dyn PlayerStatusAdapter,
    pub(crate) clock: &'a dyn Clock,
    pub(crate) settings: SessionSettings,
    pub(crate) sync: SyncState,
    phase: SessionPhase,
}

impl<'a> SyncSession<'a> {
    /// Creates a session over a freshly opened transport.
    pub fn new(
        transport: Box<dyn LineTransport>,
        player: &'a mut dyn PlayerStatusAdapter,
        clock: &'a dyn Clock,
        settings: SessionSettings,
    ) -> Self {
        let sync = SyncState::new(clock.now());
        Self {
            transport,
            player,
            clock,
            settings,
            sync,
            phase: SessionPhase::Disconnected,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn sync_state(&self) -> &SyncState {
        &self.sync
    }

    /// Runs the handshake and then loops until the transport fails.
    ///
    /// Always ends with the transport released; the returned error is what
    /// brought the session down.
    pub fn run(mut self) -> TransportError {
        match self.handshake() {
            Ok(()) => loop {
                if let Err(e) = self.tick() {
                    break e;
                }
            },
            Err(e) => e,
        }
    }

    /// Sends the full status and play state, then enters the active phase.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if a write fails.
    pub fn handshake(&mut self) -> Result<(), TransportError> {
        self.phase = SessionPhase::Handshaking;
        let playing = self.broadcast_full()?;
        self.broadcast_play_state(playing)?;
        self.sync.mark_synced(self.clock.now());
        self.phase = SessionPhase::Active;
        info!("device handshake complete");
        Ok(())
    }

    /// One loop iteration: read at most one line, dispatch it, reconcile.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if a read or write fails.
    pub fn tick(&mut self) -> Result<(), TransportError> {
        if let Some(line) = self.transport.read_line()? {
            self.handle_line(&line)?;
        }
        self.reconcile()
    }

    fn handle_line(&mut self, line: &str) -> Result<(), TransportError> {
        let command = match decode_line(line).and_then(Command::try_from) {
            Ok(command) => command,
            Err(ProtocolError::EmptyLine) => {
                debug!("ignoring empty line from device");
                return Ok(());
            }
            Err(e) => {
                warn!("ignoring device line {:?}: {e}", line.trim_end());
                return Ok(());
            }
        };
        debug!("device command: {command:?}");
        self.dispatch(command)
    }

    /// Compares the player against what the device was last told and sends
    /// whatever corrects the difference.
    fn reconcile(&mut self) -> Result<(), TransportError> {
        let now = self.clock.now();
        let title = player::current_title(self.player);
        let playing = player::playing_or_default(self.player);

        match self.sync.drift(&title, playing) {
            Drift::TrackChanged => {
                info!("track changed: {title:?}");
                let playing = self.broadcast_full()?;
                self.broadcast_play_state(playing)?;
            }
            Drift::PlayStateChanged => {
                info!("play state changed: playing={playing}");
                self.broadcast_play_state(playing)?;
            }
            Drift::InSync => {}
        }

        if self.sync.interval_elapsed(now, self.settings.full_sync_interval) {
            if playing {
                self.broadcast_position()?;
            }
            self.sync.mark_synced(now);
        }
        Ok(())
    }

    // ── Broadcasts ────────────────────────────────────────────────────────────

    /// Sends `BA`/`AL`/`TR`/`TL`/`TP` for the current track and records the
    /// title.  Returns the play state observed while gathering the status.
    pub(crate) fn broadcast_full(&mut self) -> Result<bool, TransportError> {
        let (status, raw_title) = player::now_playing(self.player, self.settings.abbreviate_len);
        debug!(
            "full broadcast: {} / {} / {}",
            status.artist, status.album, status.title
        );
        self.send(&status_broadcast(&status))?;
        self.sync.record_track(raw_title);
        Ok(status.playing)
    }

    /// Sends `PL` or `PA` and records it.
    pub(crate) fn broadcast_play_state(&mut self, playing: bool) -> Result<(), TransportError> {
        self.send(&[OutboundMessage::play_state(playing)])?;
        self.sync.record_play_state(playing);
        Ok(())
    }

    /// Sends `TP` alone.
    pub(crate) fn broadcast_position(&mut self) -> Result<(), TransportError> {
        let times = player::track_times(self.player);
        self.send(&[OutboundMessage::Position(times.position_tenths)])
    }

    pub(crate) fn send(&mut self, msgs: &[OutboundMessage]) -> Result<(), TransportError> {
        self.transport.write_text(&encode_lines(msgs))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::ManualClock;
    use crate::infrastructure::player::mock::ScriptedPlayer;
    use crate::infrastructure::serial::mock::{MockTransport, ScriptedRead};

    #[test]
    fn test_handshake_sends_full_status_then_state() {
        // Arrange
        let clock = ManualClock::new();
        let mut player = ScriptedPlayer::new();
        player.set_track("A", "B", "C", "180.5");
        player.set_position("62");
        player.set_playing(true);
        let (transport, wire) = MockTransport::new(vec![]);
        let mut session =
            SyncSession::new(Box::new(transport), &mut player, &clock, SessionSettings::default());

        // Act
        session.handshake().unwrap();

        // Assert
        assert_eq!(wire.written(), "BA A\nAL B\nTR C\nTL 1805\nTP 620\nPL\n");
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.sync_state().last_announced_title(), Some("C"));
        assert!(session.sync_state().last_announced_playing());
    }

    #[test]
    fn test_new_session_starts_disconnected() {
        let clock = ManualClock::new();
        let mut player = ScriptedPlayer::new();
        let (transport, _wire) = MockTransport::new(vec![]);
        let session =
            SyncSession::new(Box::new(transport), &mut player, &clock, SessionSettings::default());

        assert_eq!(session.phase(), SessionPhase::Disconnected);
    }

    #[test]
    fn test_play_state_change_sends_only_state_line() {
        // Arrange
        let clock = ManualClock::new();
        let mut player = ScriptedPlayer::new();
        player.set_track("A", "B", "C", "100");
        player.set_playing(true);
        let handle = player.clone();
        let (transport, wire) = MockTransport::new(vec![ScriptedRead::Timeout]);
        let mut session =
            SyncSession::new(Box::new(transport), &mut player, &clock, SessionSettings::default());
        session.handshake().unwrap();
        wire.clear();

        // Act
        handle.set_playing(false);
        session.tick().unwrap();

        // Assert
        assert_eq!(wire.written(), "PA\n");
        assert!(!session.sync_state().last_announced_playing());
    }

    #[test]
    fn test_title_change_sends_full_broadcast_and_state() {
        // Arrange
        let clock = ManualClock::new();
        let mut player = ScriptedPlayer::new();
        player.set_track("A", "B", "C", "100");
        player.set_playing(true);
        let handle = player.clone();
        let (transport, wire) = MockTransport::new(vec![ScriptedRead::Timeout]);
        let mut session =
            SyncSession::new(Box::new(transport), &mut player, &clock, SessionSettings::default());
        session.handshake().unwrap();
        wire.clear();

        // Act – new track and paused in the same tick
        handle.set_track("D", "E", "F", "200");
        handle.set_playing(false);
        session.tick().unwrap();

        // Assert – the full path runs once, the state line follows it
        assert_eq!(wire.written(), "BA D\nAL E\nTR F\nTL 2000\nTP 0\nPA\n");
        assert_eq!(session.sync_state().last_announced_title(), Some("F"));
    }

    #[test]
    fn test_long_title_does_not_trigger_repeated_broadcasts() {
        // Arrange: the device is shown the abbreviated title
        let clock = ManualClock::new();
        let mut player = ScriptedPlayer::new();
        player.set_track("A", "B", "Headhunter - 2011 Remastered Version", "100");
        let (transport, wire) =
            MockTransport::new(vec![ScriptedRead::Timeout, ScriptedRead::Timeout]);
        let mut session =
            SyncSession::new(Box::new(transport), &mut player, &clock, SessionSettings::default());
        session.handshake().unwrap();
        assert!(wire.written().contains("TR Headhunter\n"));
        wire.clear();

        // Act
        session.tick().unwrap();
        session.tick().unwrap();

        // Assert
        assert_eq!(wire.written(), "");
    }

    #[test]
    fn test_position_sent_after_interval_only_while_playing() {
        // Arrange
        let clock = ManualClock::new();
        let mut player = ScriptedPlayer::new();
        player.set_track("A", "B", "C", "100");
        player.set_playing(false);
        let handle = player.clone();
        let (transport, wire) =
            MockTransport::new(vec![ScriptedRead::Timeout, ScriptedRead::Timeout]);
        let mut session =
            SyncSession::new(Box::new(transport), &mut player, &clock, SessionSettings::default());
        session.handshake().unwrap();
        wire.clear();

        // Act – paused across the boundary: interval restarts silently
        clock.advance(Duration::from_secs(11));
        session.tick().unwrap();
        let after_paused = wire.written();
        let synced_at = session.sync_state().last_full_sync_at();

        // Assert
        assert_eq!(after_paused, "");
        assert_eq!(synced_at, clock.now());

        // Act – playing, but inside the restarted window: nothing
        handle.set_playing(true);
        handle.set_position("42");
        session.tick().unwrap();

        // Assert – only the state change
        assert_eq!(wire.written(), "PL\n");
    }

    #[test]
    fn test_unknown_and_malformed_lines_are_ignored() {
        // Arrange
        let clock = ManualClock::new();
        let mut player = ScriptedPlayer::new();
        player.set_track("A", "B", "C", "100");
        let handle = player.clone();
        let (transport, wire) = MockTransport::new(vec![
            ScriptedRead::line("ZZ nonsense"),
            ScriptedRead::line("X"),
            ScriptedRead::line(""),
            ScriptedRead::line("PL"),
        ]);
        let mut session =
            SyncSession::new(Box::new(transport), &mut player, &clock, SessionSettings::default());
        session.handshake().unwrap();
        wire.clear();

        // Act
        for _ in 0..4 {
            session.tick().unwrap();
        }

        // Assert – no lines, no player commands
        assert_eq!(wire.written(), "");
        assert!(handle.commands().is_empty());
    }

    #[test]
    fn test_run_returns_transport_error_and_releases_transport() {
        // Arrange
        let clock = ManualClock::new();
        let mut player = ScriptedPlayer::new();
        let (transport, wire) = MockTransport::new(vec![ScriptedRead::Timeout, ScriptedRead::Fail]);
        let session =
            SyncSession::new(Box::new(transport), &mut player, &clock, SessionSettings::default());

        // Act
        let err = session.run();

        // Assert
        assert!(matches!(err, TransportError::Io(_)));
        assert!(wire.is_closed());
    }

    #[test]
    fn test_handshake_write_failure_ends_session() {
        let clock = ManualClock::new();
        let mut player = ScriptedPlayer::new();
        let (transport, wire) = MockTransport::failing_writes(vec![ScriptedRead::Timeout]);
        let session =
            SyncSession::new(Box::new(transport), &mut player, &clock, SessionSettings::default());

        let err = session.run();

        assert!(matches!(err, TransportError::Io(_)));
        assert!(wire.is_closed());
        assert_eq!(wire.written(), "");
    }
}
