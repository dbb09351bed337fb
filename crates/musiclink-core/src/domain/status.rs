//! Now-playing snapshot and the tenths encoding.

/// Playback position and track length, in tenths of a second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackTimes {
    pub position_tenths: u32,
    pub length_tenths: u32,
}

impl TrackTimes {
    /// Encodes raw player-reported strings (seconds, possibly fractional).
    pub fn from_raw(position: &str, length: &str) -> Self {
        Self {
            position_tenths: fixed_point_tenths(position),
            length_tenths: fixed_point_tenths(length),
        }
    }
}

/// What the player is doing right now.
///
/// Built fresh on every query; never cached beyond one poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerStatus {
    pub artist: String,
    pub album: String,
    pub title: String,
    pub times: TrackTimes,
    pub playing: bool,
}

/// Converts a decimal number in text form to an integer count of tenths.
///
/// The result is `floor(value * 10)`.  Anything that does not parse as a
/// finite, non-negative number encodes as `0`.
///
/// # Examples
///
/// ```rust
/// use musiclink_core::fixed_point_tenths;
///
/// assert_eq!(fixed_point_tenths("3.45"), 34);
/// assert_eq!(fixed_point_tenths("5"), 50);
/// assert_eq!(fixed_point_tenths("not-a-number"), 0);
/// ```
pub fn fixed_point_tenths(raw: &str) -> u32 {
    let value = match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return 0,
    };
    let tenths = (value * 10.0).floor();
    if tenths <= 0.0 {
        0
    } else if tenths >= u32::MAX as f64 {
        u32::MAX
    } else {
        tenths as u32
    }
}
