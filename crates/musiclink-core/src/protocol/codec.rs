//! Line codec for encoding and decoding MusicLink protocol messages.
//!
//! Wire format:
//! ```text
//! <CODE:2>[ <payload>]\n
//! ```
//! UTF-8 text, one message per line.  Codes are always two characters; the
//! payload (if any) starts at character index 3, after a single space.

use thiserror::Error;

use crate::domain::status::PlayerStatus;
use crate::protocol::messages::{CommandRequest, OutboundMessage, ARGUMENT_OFFSET, CODE_LEN};

/// Errors that can occur while decoding or interpreting a received line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The line contained nothing but whitespace.
    #[error("empty line")]
    EmptyLine,

    /// The line is too short to carry a two-character code.
    #[error("malformed line: {0:?}")]
    Malformed(String),

    /// A command that needs an argument arrived without one.
    #[error("command {code} requires an argument")]
    MissingArgument { code: String },

    /// The argument could not be interpreted for this command.
    #[error("invalid argument for {code}: {value:?}")]
    InvalidArgument { code: String, value: String },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes one [`OutboundMessage`] as a newline-terminated line.
///
/// Carriage returns and newlines inside the payload are replaced with spaces
/// so a payload can never split a line on the wire.
///
/// # Examples
///
/// ```rust
/// use musiclink_core::protocol::{encode_line, OutboundMessage};
///
/// assert_eq!(encode_line(&OutboundMessage::Length(1805)), "TL 1805\n");
/// assert_eq!(encode_line(&OutboundMessage::Playing), "PL\n");
/// ```
pub fn encode_line(msg: &OutboundMessage) -> String {
    let code = msg.code();
    match msg.payload() {
        Some(payload) => {
            let mut line = String::with_capacity(code.len() + payload.len() + 2);
            line.push_str(code);
            line.push(' ');
            line.extend(
                payload
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c }),
            );
            line.push('\n');
            line
        }
        None => format!("{code}\n"),
    }
}

/// Encodes a group of messages into one contiguous block of lines.
pub fn encode_lines(msgs: &[OutboundMessage]) -> String {
    msgs.iter().map(encode_line).collect()
}

/// Decodes one received line into a [`CommandRequest`].
///
/// Trailing whitespace (including the newline) is trimmed first.  The first
/// two characters are the code; if the trimmed line is longer than three
/// characters, everything from index 3 onward is the argument.
///
/// # Errors
///
/// Returns [`ProtocolError::EmptyLine`] for blank lines and
/// [`ProtocolError::Malformed`] for lines shorter than one code.
///
/// # Examples
///
/// ```rust
/// use musiclink_core::protocol::decode_line;
///
/// let req = decode_line("PL Jazz Mix\n").unwrap();
/// assert_eq!(req.code, "PL");
/// assert_eq!(req.argument.as_deref(), Some("Jazz Mix"));
///
/// let req = decode_line("SY").unwrap();
/// assert_eq!(req.argument, None);
/// ```
pub fn decode_line(line: &str) -> Result<CommandRequest, ProtocolError> {
    let line = line.trim_end();
    if line.is_empty() {
        return Err(ProtocolError::EmptyLine);
    }

    let char_count = line.chars().count();
    if char_count < CODE_LEN {
        return Err(ProtocolError::Malformed(line.to_string()));
    }

    let code_end = byte_offset(line, CODE_LEN);
    let code = line[..code_end].to_string();

    let argument = if char_count > ARGUMENT_OFFSET {
        Some(line[byte_offset(line, ARGUMENT_OFFSET)..].to_string())
    } else {
        None
    };

    Ok(CommandRequest { code, argument })
}

/// Builds the five-line full status broadcast for `status`.
///
/// Order on the wire is artist, album, title, length, position.
pub fn status_broadcast(status: &PlayerStatus) -> [OutboundMessage; 5] {
    [
        OutboundMessage::Artist(status.artist.clone()),
        OutboundMessage::Album(status.album.clone()),
        OutboundMessage::Title(status.title.clone()),
        OutboundMessage::Length(status.times.length_tenths),
        OutboundMessage::Position(status.times.position_tenths),
    ]
}

/// Byte offset of the `n`th character of `s` (or `s.len()` past the end).
fn byte_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
