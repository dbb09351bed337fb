//! Shortens long album and track names for the device display.

/// Length above which [`abbreviate`] starts cutting.
pub const DEFAULT_ABBREVIATE_LEN: usize = 24;

const ELLIPSIS: char = '…';

/// Shortens `text` if it is longer than `max_len` characters.
///
/// The first rule that applies wins:
/// 1. cut before the first `" - "` (`"Song - 2011 Remaster"` → `"Song"`),
/// 2. cut before the first `"("`,
/// 3. cut before the first `" / "`,
/// 4. if longer than `2 * max_len + 3`, keep `2 * max_len` characters and
///    append `…`.
///
/// Anything else is returned unchanged, including text of up to
/// `2 * max_len + 3` characters with no separator.
pub fn abbreviate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    for separator in [" - ", "(", " / "] {
        if let Some(idx) = text.find(separator) {
            return text[..idx].trim_end().to_string();
        }
    }

    if text.chars().count() > max_len * 2 + 3 {
        let mut cut: String = text.chars().take(max_len * 2).collect();
        cut.push(ELLIPSIS);
        return cut;
    }

    text.to_string()
}
