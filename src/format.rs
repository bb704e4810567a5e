//! "mm:ss" timestamps as shown on the progress bar and used as lyric keys.

use std::time::Duration;

/// Formats a playback position as zero-padded `mm:ss`, truncating to whole
/// seconds. There is no hours field; minutes past 59 are printed as is.
pub fn format_timestamp(position: Duration) -> String {
    let total = position.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Parses an `mm:ss` key back into whole seconds.
pub fn parse_timestamp(key: &str) -> Option<u64> {
    let (minutes, seconds) = key.split_once(':')?;
    if minutes.len() < 2 || seconds.len() != 2 {
        return None;
    }
    if !minutes.bytes().all(|b| b.is_ascii_digit()) || !seconds.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let minutes: u64 = minutes.parse().ok()?;
    let seconds: u64 = seconds.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    Some(minutes * 60 + seconds)
}
