//! Player automation statements sent through [`super::player::PlayerStatusAdapter`].
//!
//! Every statement runs inside a `tell application "<player>"` block, so none
//! of them name the application.  Device-provided text only ever reaches a
//! script as a quoted string literal.

pub const TRACK_ARTIST: &str = "get artist of current track";
pub const TRACK_ALBUM: &str = "get album of current track";
pub const TRACK_NAME: &str = "get name of current track";
/// Returns `"<position>, <duration>"` in seconds.
pub const TRACK_TIMES: &str = "get {player position} & {duration} of current track";
pub const PLAYER_STATE: &str = "player state";
/// Value of [`PLAYER_STATE`] while audio is playing.
pub const STATE_PLAYING: &str = "playing";

pub const PLAY_PAUSE: &str = "playpause";
pub const PLAYLIST_NAMES: &str = "get name of every playlist";
pub const FAVOURITE: &str = "get current track\nset favorited of current track to true";
pub const NEXT_TRACK: &str = "play next track";

/// Plays `name` in order, with shuffle switched off.
pub fn play_playlist(name: &str) -> String {
    format!(
        "set shuffle enabled to false\nplay playlist {}",
        quote(name)
    )
}

/// Plays `name` with album shuffle switched on.
pub fn shuffle_playlist(name: &str) -> String {
    format!(
        "set shuffle enabled to true\nset shuffle mode to albums\nplay playlist {}",
        quote(name)
    )
}

/// Moves the playback position by `delta_seconds` (negative rewinds).
pub fn jump(delta_seconds: f64) -> String {
    if delta_seconds < 0.0 {
        format!("set player position to (player position - {})", -delta_seconds)
    } else {
        format!("set player position to (player position + {delta_seconds})")
    }
}

/// Quotes `text` as a string literal.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
