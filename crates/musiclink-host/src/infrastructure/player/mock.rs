//! In-memory player for tests.
//!
//! `ScriptedPlayer` answers the queries in [`crate::application::scripts`]
//! from a small mutable state and records every command it receives.  Clones
//! share that state, so a test can keep a handle while the session owns (or
//! borrows) the player:
//!
//! ```ignore
//! let mut player = ScriptedPlayer::new();
//! let handle = player.clone();
//! let session = SyncSession::new(transport, &mut player, &clock, settings);
//!
//! handle.set_playing(false);   // visible to the session on its next tick
//! ```
//!
//! A few commands change the state the way the real player would:
//! `playpause` toggles, `play next track` and starting a playlist set
//! playing.

use std::cell::RefCell;
use std::rc::Rc;

use crate::application::player::{PlayerStatusAdapter, QueryError};
use crate::application::scripts;

#[derive(Debug, Clone)]
struct PlayerState {
    artist: String,
    album: String,
    title: String,
    duration: String,
    position: String,
    playing: bool,
    playlists: Vec<String>,
    fail_all: bool,
    fail_times: bool,
    commands: Vec<String>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            artist: String::new(),
            album: String::new(),
            title: String::new(),
            duration: "0".to_string(),
            position: "0".to_string(),
            playing: false,
            playlists: Vec::new(),
            fail_all: false,
            fail_times: false,
            commands: Vec::new(),
        }
    }
}

/// A fake player whose clones share one state.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPlayer {
    state: Rc<RefCell<PlayerState>>,
}

impl ScriptedPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current track; `duration` is in seconds as the player prints it.
    pub fn set_track(&self, artist: &str, album: &str, title: &str, duration: &str) {
        let mut s = self.state.borrow_mut();
        s.artist = artist.to_string();
        s.album = album.to_string();
        s.title = title.to_string();
        s.duration = duration.to_string();
        s.position = "0".to_string();
    }

    pub fn set_position(&self, seconds: &str) {
        self.state.borrow_mut().position = seconds.to_string();
    }

    pub fn set_playing(&self, playing: bool) {
        self.state.borrow_mut().playing = playing;
    }

    pub fn set_playlists(&self, names: &[&str]) {
        self.state.borrow_mut().playlists = names.iter().map(|n| n.to_string()).collect();
    }

    /// When set, every query and command fails.
    pub fn set_failing(&self, failing: bool) {
        self.state.borrow_mut().fail_all = failing;
    }

    /// When set, only the track position/duration query fails.
    pub fn set_track_times_failing(&self, failing: bool) {
        self.state.borrow_mut().fail_times = failing;
    }

    pub fn is_playing_now(&self) -> bool {
        self.state.borrow().playing
    }

    /// Every script passed to `send_command`, in order.
    pub fn commands(&self) -> Vec<String> {
        self.state.borrow().commands.clone()
    }

    fn check(&self) -> Result<(), QueryError> {
        if self.state.borrow().fail_all {
            Err(QueryError::Failed {
                status: Some(1),
                stderr: "Music got an error: Application isn't running.".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl PlayerStatusAdapter for ScriptedPlayer {
    fn query_scalar(&mut self, expression: &str) -> Result<String, QueryError> {
        self.check()?;
        let s = self.state.borrow();
        match expression {
            scripts::TRACK_ARTIST => Ok(s.artist.clone()),
            scripts::TRACK_ALBUM => Ok(s.album.clone()),
            scripts::TRACK_NAME => Ok(s.title.clone()),
            scripts::PLAYER_STATE => Ok(if s.playing {
                scripts::STATE_PLAYING.to_string()
            } else {
                "paused".to_string()
            }),
            other => Err(QueryError::UnexpectedOutput(other.to_string())),
        }
    }

    fn query_list(&mut self, expression: &str) -> Result<Vec<String>, QueryError> {
        self.check()?;
        let s = self.state.borrow();
        match expression {
            scripts::TRACK_TIMES if s.fail_times => Err(QueryError::Failed {
                status: Some(1),
                stderr: "Can't get player position.".to_string(),
            }),
            scripts::TRACK_TIMES => Ok(vec![s.position.clone(), s.duration.clone()]),
            scripts::PLAYLIST_NAMES => Ok(s.playlists.clone()),
            other => Err(QueryError::UnexpectedOutput(other.to_string())),
        }
    }

    fn is_playing(&mut self) -> Result<bool, QueryError> {
        self.check()?;
        Ok(self.state.borrow().playing)
    }

    fn send_command(&mut self, script: &str) -> Result<(), QueryError> {
        self.state.borrow_mut().commands.push(script.to_string());
        self.check()?;
        let mut s = self.state.borrow_mut();
        if script == scripts::PLAY_PAUSE {
            s.playing = !s.playing;
        } else if script == scripts::NEXT_TRACK || script.contains("play playlist") {
            s.playing = true;
        }
        Ok(())
    }
}
