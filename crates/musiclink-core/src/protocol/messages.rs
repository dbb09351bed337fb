//! All MusicLink protocol message types.
//!
//! Host → device lines are [`OutboundMessage`]s; device → host lines decode
//! into a raw [`CommandRequest`] and then into a typed [`Command`].


use crate::protocol::codec::ProtocolError;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Number of characters in every message code.
pub const CODE_LEN: usize = 2;

/// Character index at which a command argument starts (after `"XX "`).
pub const ARGUMENT_OFFSET: usize = 3;

/// Separator used inside the `OP` playlist list payload.
pub const PLAYLIST_SEPARATOR: &str = "|";

/// Outgoing message codes (host → device).
pub mod codes {
    pub const ARTIST: &str = "BA";
    pub const ALBUM: &str = "AL";
    pub const TITLE: &str = "TR";
    pub const LENGTH: &str = "TL";
    pub const POSITION: &str = "TP";
    pub const PLAYING: &str = "PL";
    pub const PAUSED: &str = "PA";
    pub const PLAYLISTS: &str = "OP";
}

/// Incoming command codes (device → host).
pub mod commands {
    pub const TOGGLE_PLAY_PAUSE: &str = "PP";
    pub const LIST_PLAYLISTS: &str = "LL";
    pub const FAVOURITE: &str = "FA";
    pub const SKIP: &str = "SK";
    pub const PLAY_PLAYLIST: &str = "PL";
    pub const SHUFFLE_PLAYLIST: &str = "SH";
    pub const JUMP: &str = "JU";
    pub const SYNC: &str = "SY";
    pub const DEVICE_LOG: &str = "!!";
}

// ── Outgoing messages ─────────────────────────────────────────────────────────

/// A status line sent from the host to the device.
///
/// Timing values use the tenths encoding: `1805` means 180.5 seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Artist(String),
    Album(String),
    Title(String),
    Length(u32),
    Position(u32),
    Playing,
    Paused,
    Playlists(Vec<String>),
}

impl OutboundMessage {
    /// Returns the two-character wire code for this message.
    pub fn code(&self) -> &'static str {
        match self {
            OutboundMessage::Artist(_) => codes::ARTIST,
            OutboundMessage::Album(_) => codes::ALBUM,
            OutboundMessage::Title(_) => codes::TITLE,
            OutboundMessage::Length(_) => codes::LENGTH,
            OutboundMessage::Position(_) => codes::POSITION,
            OutboundMessage::Playing => codes::PLAYING,
            OutboundMessage::Paused => codes::PAUSED,
            OutboundMessage::Playlists(_) => codes::PLAYLISTS,
        }
    }

    /// Returns the payload text, or `None` for the bare `PL`/`PA` lines.
    pub fn payload(&self) -> Option<String> {
        match self {
            OutboundMessage::Artist(s) | OutboundMessage::Album(s) | OutboundMessage::Title(s) => {
                Some(s.clone())
            }
            OutboundMessage::Length(t) | OutboundMessage::Position(t) => Some(t.to_string()),
            OutboundMessage::Playing | OutboundMessage::Paused => None,
            OutboundMessage::Playlists(names) => Some(names.join(PLAYLIST_SEPARATOR)),
        }
    }

    /// The playing/paused broadcast for `playing`.
    pub fn play_state(playing: bool) -> Self {
        if playing {
            OutboundMessage::Playing
        } else {
            OutboundMessage::Paused
        }
    }
}

// ── Incoming commands ─────────────────────────────────────────────────────────

/// One decoded line from the device, before interpretation.
///
/// `argument` is present only when the line is longer than three characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub code: String,
    pub argument: Option<String>,
}

/// A device command, interpreted from a [`CommandRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `PP` – toggle play/pause.
    TogglePlayPause,
    /// `LL` – request the list of playlist names.
    ListPlaylists,
    /// `FA` – mark the current track as a favourite.
    Favourite,
    /// `SK` – skip to the next track.
    SkipTrack,
    /// `PL <name>` – play the named playlist in order.
    PlayPlaylist { name: String },
    /// `SH <name>` – play the named playlist shuffled by album.
    ShufflePlaylist { name: String },
    /// `JU <delta>` – move the playback position by a signed number of seconds.
    Jump { delta_seconds: f64 },
    /// `SY` – force a full resync.
    Resync,
    /// `!! <text>` – diagnostic text from the device firmware.
    DeviceLog(String),
    /// Any other code.
    Unknown(String),
}

impl TryFrom<CommandRequest> for Command {
    type Error = ProtocolError;

    fn try_from(req: CommandRequest) -> Result<Self, Self::Error> {
        let CommandRequest { code, argument } = req;
        match code.as_str() {
            commands::TOGGLE_PLAY_PAUSE => Ok(Command::TogglePlayPause),
            commands::LIST_PLAYLISTS => Ok(Command::ListPlaylists),
            commands::FAVOURITE => Ok(Command::Favourite),
            commands::SKIP => Ok(Command::SkipTrack),
            commands::PLAY_PLAYLIST => Ok(Command::PlayPlaylist {
                name: require_argument(&code, argument)?,
            }),
            commands::SHUFFLE_PLAYLIST => Ok(Command::ShufflePlaylist {
                name: require_argument(&code, argument)?,
            }),
            commands::JUMP => {
                let raw = require_argument(&code, argument)?;
                let delta_seconds = parse_delta(&raw).ok_or(ProtocolError::InvalidArgument {
                    code: code.clone(),
                    value: raw,
                })?;
                Ok(Command::Jump { delta_seconds })
            }
            commands::SYNC => Ok(Command::Resync),
            commands::DEVICE_LOG => Ok(Command::DeviceLog(argument.unwrap_or_default())),
            _ => Ok(Command::Unknown(code)),
        }
    }
}

fn require_argument(code: &str, argument: Option<String>) -> Result<String, ProtocolError> {
    match argument {
        Some(arg) if !arg.trim().is_empty() => Ok(arg),
        _ => Err(ProtocolError::MissingArgument {
            code: code.to_string(),
        }),
    }
}

/// Parses a signed delta such as `+15`, `-30` or `7.5`.
fn parse_delta(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    unsigned.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
