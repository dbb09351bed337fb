//! Player Status Adapter seam and the safe-default query helpers.
//!
//! The adapter is a narrow synchronous interface to the desktop player's
//! automation surface.  That surface does not tolerate concurrent calls, so
//! every method takes `&mut self`: holding the only mutable borrow is what
//! serialises the calls.
//!
//! A [`QueryError`] never ends a session.  The helpers below log the raw
//! error text and substitute an empty string, an empty list, zero timing, or
//! `playing = false`.

use musiclink_core::{abbreviate, PlayerStatus, TrackTimes};
use thiserror::Error;
use tracing::warn;

use crate::application::scripts;

/// Error type for player automation calls.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The automation runner could not be started at all.
    #[error("failed to launch player automation: {0}")]
    Spawn(#[from] std::io::Error),

    /// The automation call ran and reported failure.
    #[error("player automation failed (exit {status:?}): {stderr}")]
    Failed { status: Option<i32>, stderr: String },

    /// The call succeeded but returned something unusable.
    #[error("unexpected player output: {0:?}")]
    UnexpectedOutput(String),
}

/// Synchronous query/command interface to the media player.
///
/// Implementations live in `infrastructure::player`.
#[cfg_attr(test, mockall::automock)]
pub trait PlayerStatusAdapter {
    /// Evaluates `expression` and returns its text result.
    fn query_scalar(&mut self, expression: &str) -> Result<String, QueryError>;

    /// Evaluates `expression` and returns its result as a list of strings.
    fn query_list(&mut self, expression: &str) -> Result<Vec<String>, QueryError>;

    /// Returns `true` while the player is playing.
    fn is_playing(&mut self) -> Result<bool, QueryError>;

    /// Runs `script` for its side effect.
    fn send_command(&mut self, script: &str) -> Result<(), QueryError>;
}

/// Queries `expression`, substituting `""` on failure.
pub fn scalar_or_default(player: &mut dyn PlayerStatusAdapter, expression: &str) -> String {
    player.query_scalar(expression).unwrap_or_else(|e| {
        warn!("player query {expression:?} failed: {e}");
        String::new()
    })
}

/// Queries `expression` as a list, substituting an empty list on failure.
pub fn list_or_default(player: &mut dyn PlayerStatusAdapter, expression: &str) -> Vec<String> {
    player.query_list(expression).unwrap_or_else(|e| {
        warn!("player list query {expression:?} failed: {e}");
        Vec::new()
    })
}

/// Current play state, `false` on failure.
pub fn playing_or_default(player: &mut dyn PlayerStatusAdapter) -> bool {
    player.is_playing().unwrap_or_else(|e| {
        warn!("player state query failed: {e}");
        false
    })
}

/// Position and length of the current track, zero on failure.
pub fn track_times(player: &mut dyn PlayerStatusAdapter) -> TrackTimes {
    match player.query_list(scripts::TRACK_TIMES) {
        Ok(values) => match values.as_slice() {
            [position, length] => TrackTimes::from_raw(position, length),
            other => {
                warn!("unexpected track times from player: {other:?}");
                TrackTimes::default()
            }
        },
        Err(e) => {
            warn!("track times query failed: {e}");
            TrackTimes::default()
        }
    }
}

/// Unabbreviated name of the current track (`""` on failure).
pub fn current_title(player: &mut dyn PlayerStatusAdapter) -> String {
    scalar_or_default(player, scripts::TRACK_NAME)
}

/// Runs `script`, logging instead of propagating a failure.
pub fn run_command(player: &mut dyn PlayerStatusAdapter, script: &str) {
    if let Err(e) = player.send_command(script) {
        warn!("player command {script:?} failed: {e}");
    }
}

/// A fresh [`PlayerStatus`] for the current track.
///
/// Album and title are shortened to `abbreviate_len`; the artist is sent as
/// is.  Also returns the unabbreviated title, which is what the session
/// compares against on later ticks.
pub fn now_playing(
    player: &mut dyn PlayerStatusAdapter,
    abbreviate_len: usize,
) -> (PlayerStatus, String) {
    let times = track_times(player);
    let artist = scalar_or_default(player, scripts::TRACK_ARTIST);
    let album = scalar_or_default(player, scripts::TRACK_ALBUM);
    let title = current_title(player);
    let playing = playing_or_default(player);
    let status = PlayerStatus {
        artist,
        album: abbreviate(&album, abbreviate_len),
        title: abbreviate(&title, abbreviate_len),
        times,
        playing,
    };
    (status, title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn failed() -> QueryError {
        QueryError::Failed {
            status: Some(1),
            stderr: "Music got an error: Can't get current track.".to_string(),
        }
    }

    #[test]
    fn test_track_times_encodes_position_and_length() {
        // Arrange
        let mut player = MockPlayerStatusAdapter::new();
        player
            .expect_query_list()
            .with(eq(scripts::TRACK_TIMES))
            .returning(|_| Ok(vec!["62.04".to_string(), "180.5".to_string()]));

        // Act
        let times = track_times(&mut player);

        // Assert
        assert_eq!(times.position_tenths, 620);
        assert_eq!(times.length_tenths, 1805);
    }

    #[test]
    fn test_track_times_failure_yields_zero() {
        let mut player = MockPlayerStatusAdapter::new();
        player.expect_query_list().returning(|_| Err(failed()));

        assert_eq!(track_times(&mut player), TrackTimes::default());
    }

    #[test]
    fn test_track_times_wrong_arity_yields_zero() {
        let mut player = MockPlayerStatusAdapter::new();
        player
            .expect_query_list()
            .returning(|_| Ok(vec!["12.0".to_string()]));

        assert_eq!(track_times(&mut player), TrackTimes::default());
    }

    #[test]
    fn test_playing_defaults_to_false_on_error() {
        let mut player = MockPlayerStatusAdapter::new();
        player.expect_is_playing().returning(|| Err(failed()));

        assert!(!playing_or_default(&mut player));
    }

    #[test]
    fn test_now_playing_abbreviates_album_and_title_only() {
        // Arrange
        let mut player = MockPlayerStatusAdapter::new();
        player
            .expect_query_list()
            .returning(|_| Ok(vec!["0".to_string(), "523".to_string()]));
        player.expect_query_scalar().returning(|expr| {
            Ok(match expr {
                scripts::TRACK_ARTIST => "Really long band name, lets see what happens to this!",
                scripts::TRACK_ALBUM => "Modern Angel (Deluxe Edition)",
                scripts::TRACK_NAME => "Headhunter - 2011 Remaster",
                _ => "",
            }
            .to_string())
        });
        player.expect_is_playing().returning(|| Ok(true));

        // Act
        let (status, raw_title) = now_playing(&mut player, 24);

        // Assert
        assert_eq!(
            status.artist,
            "Really long band name, lets see what happens to this!"
        );
        assert_eq!(status.album, "Modern Angel");
        assert_eq!(status.title, "Headhunter");
        assert_eq!(raw_title, "Headhunter - 2011 Remaster");
        assert_eq!(status.times.length_tenths, 5230);
        assert!(status.playing);
    }

    #[test]
    fn test_now_playing_failure_yields_empty_fields() {
        let mut player = MockPlayerStatusAdapter::new();
        player.expect_query_list().returning(|_| Err(failed()));
        player.expect_query_scalar().returning(|_| Err(failed()));
        player.expect_is_playing().returning(|| Err(failed()));

        let (status, raw_title) = now_playing(&mut player, 24);

        assert_eq!(status, PlayerStatus::default());
        assert!(raw_title.is_empty());
    }

    #[test]
    fn test_run_command_swallows_errors() {
        let mut player = MockPlayerStatusAdapter::new();
        player
            .expect_send_command()
            .with(eq(scripts::NEXT_TRACK))
            .times(1)
            .returning(|_| Err(failed()));

        run_command(&mut player, scripts::NEXT_TRACK);
    }
}
