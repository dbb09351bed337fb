//! Command dispatch: one device command → player actions → outgoing lines.
//!
//! | Command            | Player action            | Lines sent                  |
//! |--------------------|--------------------------|-----------------------------|
//! | `PP`               | toggle play/pause        | `PL`/`PA` + full status     |
//! | `LL`               | read playlist names      | `OP a|b|c`                  |
//! | `FA`               | favourite current track  | none                        |
//! | `SK`               | next track               | full status + `PL`          |
//! | `PL <name>`        | play playlist in order   | `PL`, settle, full status   |
//! | `SH <name>`        | play playlist shuffled   | none                        |
//! | `JU <delta>`       | move position            | `TP`                        |
//! | `SY`               | none                     | full status + `PL`/`PA`     |
//! | `!! <text>`        | none (logged)            | none                        |
//!
//! Player failures are logged and the table row still completes with
//! whatever the safe defaults produce.  Only transport failures propagate.

use musiclink_core::{Command, OutboundMessage};
use tracing::{info, warn};

use crate::application::player;
use crate::application::scripts;
use crate::application::sync_session::SyncSession;
use crate::application::transport::TransportError;

impl SyncSession<'_> {
    /// Executes `command` against the player and sends its response lines.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if writing a response fails.
    pub fn dispatch(&mut self, command: Command) -> Result<(), TransportError> {
        match command {
            Command::TogglePlayPause => {
                player::run_command(self.player, scripts::PLAY_PAUSE);
                let playing = player::playing_or_default(self.player);
                self.broadcast_play_state(playing)?;
                self.broadcast_full()?;
                Ok(())
            }
            Command::ListPlaylists => {
                let names = player::list_or_default(self.player, scripts::PLAYLIST_NAMES);
                info!("sending {} playlist names", names.len());
                self.send(&[OutboundMessage::Playlists(names)])
            }
            Command::Favourite => {
                player::run_command(self.player, scripts::FAVOURITE);
                info!("marked current track as favourite");
                Ok(())
            }
            Command::SkipTrack => {
                player::run_command(self.player, scripts::NEXT_TRACK);
                self.broadcast_full()?;
                self.broadcast_play_state(true)
            }
            Command::PlayPlaylist { name } => {
                info!("playing playlist {name:?}");
                player::run_command(self.player, &scripts::play_playlist(&name));
                self.broadcast_play_state(true)?;
                self.clock.sleep(self.settings.playlist_settle);
                self.broadcast_full()?;
                Ok(())
            }
            Command::ShufflePlaylist { name } => {
                info!("shuffling playlist {name:?}");
                player::run_command(self.player, &scripts::shuffle_playlist(&name));
                Ok(())
            }
            Command::Jump { delta_seconds } => {
                player::run_command(self.player, &scripts::jump(delta_seconds));
                self.broadcast_position()
            }
            Command::Resync => {
                info!("device requested resync");
                let playing = self.broadcast_full()?;
                self.broadcast_play_state(playing)?;
                self.sync.mark_synced(self.clock.now());
                Ok(())
            }
            Command::DeviceLog(text) => {
                info!("device: {text}");
                Ok(())
            }
            Command::Unknown(code) => {
                warn!("unknown command: {code}");
                Ok(())
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
