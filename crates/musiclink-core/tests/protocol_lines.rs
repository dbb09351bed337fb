//! Integration tests for the musiclink-core line protocol.
//!
//! These go through the public API only: raw device text is decoded, turned
//! into a [`Command`], and status lines are encoded the way the host writes
//! them to the wire.

use musiclink_core::{
    decode_line, encode_line,
    protocol::codec::{encode_lines, status_broadcast},
    Command, OutboundMessage, PlayerStatus, ProtocolError, TrackTimes,
};

fn command(line: &str) -> Result<Command, ProtocolError> {
    Command::try_from(decode_line(line)?)
}

#[test]
fn test_every_device_command_decodes() {
    assert_eq!(command("PP\n").unwrap(), Command::TogglePlayPause);
    assert_eq!(command("LL\n").unwrap(), Command::ListPlaylists);
    assert_eq!(command("FA\n").unwrap(), Command::Favourite);
    assert_eq!(command("SK\n").unwrap(), Command::SkipTrack);
    assert_eq!(
        command("PL Jazz Mix\n").unwrap(),
        Command::PlayPlaylist {
            name: "Jazz Mix".to_string()
        }
    );
    assert_eq!(
        command("SH Road Trip\n").unwrap(),
        Command::ShufflePlaylist {
            name: "Road Trip".to_string()
        }
    );
    assert_eq!(
        command("JU -10\n").unwrap(),
        Command::Jump {
            delta_seconds: -10.0
        }
    );
    assert_eq!(command("SY\n").unwrap(), Command::Resync);
    assert_eq!(
        command("!! button matrix ready\n").unwrap(),
        Command::DeviceLog("button matrix ready".to_string())
    );
}

#[test]
fn test_play_playlist_line_without_name_is_rejected() {
    // "PL " trims to "PL", which carries no argument.
    assert_eq!(
        command("PL \n"),
        Err(ProtocolError::MissingArgument {
            code: "PL".to_string()
        })
    );
}

#[test]
fn test_blank_line_is_a_decode_anomaly() {
    assert_eq!(command("\n"), Err(ProtocolError::EmptyLine));
}

#[test]
fn test_unrecognised_code_is_not_an_error() {
    assert_eq!(command("XY\n").unwrap(), Command::Unknown("XY".to_string()));
}

#[test]
fn test_handshake_block_matches_device_expectations() {
    // Arrange
    let status = PlayerStatus {
        artist: "Front 242".to_string(),
        album: "Front by Front".to_string(),
        title: "Headhunter v2.3".to_string(),
        times: TrackTimes {
            position_tenths: 0,
            length_tenths: 10 * (60 * 4 + 44),
        },
        playing: false,
    };

    // Act
    let mut text = encode_lines(&status_broadcast(&status));
    text.push_str(&encode_line(&OutboundMessage::play_state(status.playing)));

    // Assert
    assert_eq!(
        text,
        "BA Front 242\nAL Front by Front\nTR Headhunter v2.3\nTL 2840\nTP 0\nPA\n"
    );
}
