//! Wall-clock time parsing and display formatting.
//!
//! Every time string in a schedule document passes through here. Accepted
//! inputs are 12-hour with an AM/PM marker (`"9:00 AM"`) or bare 24-hour
//! text (`"14:30"`). 12-hour input is validated strictly; 24-hour input is
//! trusted as-is and only fails once split into hour/minute pieces.

use crate::error::{CoreError, Result};

/// Normalize a wall-clock time to 24-hour `"HH:MM"` text.
///
/// Text containing a case-insensitive AM/PM marker must match `H:MM`
/// (1-2 digit hour, exactly 2-digit minute) followed by the marker.
/// 12 AM maps to hour 0, 12 PM stays 12, PM otherwise adds 12.
/// Text without a marker is returned verbatim.
pub fn normalize_to_24h(text: &str) -> Result<String> {
    let lower = text.to_ascii_lowercase();
    if !lower.contains("am") && !lower.contains("pm") {
        return Ok(text.to_string());
    }

    let (hour, minute, is_pm) = parse_twelve_hour(text)
        .ok_or_else(|| CoreError::parse(text, "invalid 12-hour time format"))?;

    let hour_24 = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    Ok(format!("{hour_24:02}:{minute:02}"))
}

/// Split a 12-hour time into (hour, minute, is_pm), or None if the text
/// does not match `H:MM` followed by an AM/PM marker.
fn parse_twelve_hour(text: &str) -> Option<(u32, u32, bool)> {
    let lower = text.trim().to_ascii_lowercase();
    let (body, is_pm) = if let Some(body) = lower.strip_suffix("pm") {
        (body, true)
    } else if let Some(body) = lower.strip_suffix("am") {
        (body, false)
    } else {
        return None;
    };

    let (hour, minute) = body.trim_end().split_once(':')?;
    if hour.is_empty() || hour.len() > 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if minute.len() != 2 || !minute.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((hour.parse().ok()?, minute.parse().ok()?, is_pm))
}

/// Minutes since midnight for any accepted time string.
pub fn minutes_of_day(text: &str) -> Result<u32> {
    let normalized = normalize_to_24h(text)?;
    let (hour, minute) = normalized
        .split_once(':')
        .ok_or_else(|| CoreError::parse(text, "expected HH:MM"))?;
    let hour: u32 = hour
        .trim()
        .parse()
        .map_err(|_| CoreError::parse(text, "non-numeric hour"))?;
    let minute: u32 = minute
        .trim()
        .parse()
        .map_err(|_| CoreError::parse(text, "non-numeric minute"))?;
    Ok(hour * 60 + minute)
}

/// Render 24-hour `"HH:MM"` text as `"H:MM AM/PM"`.
///
/// Hour 0 displays as 12 AM and hour 12 as 12 PM.
pub fn to_12h(text: &str) -> Result<String> {
    let (hour, minute) = text
        .trim()
        .split_once(':')
        .ok_or_else(|| CoreError::parse(text, "expected HH:MM"))?;
    let hour: u32 = hour
        .trim()
        .parse()
        .map_err(|_| CoreError::parse(text, "non-numeric hour"))?;
    let minute: u32 = minute
        .trim()
        .parse()
        .map_err(|_| CoreError::parse(text, "non-numeric minute"))?;

    let (display_hour, marker) = match hour {
        0 => (12, "AM"),
        12 => (12, "PM"),
        h if h > 12 => (h - 12, "PM"),
        h => (h, "AM"),
    };
    Ok(format!("{display_hour}:{minute:02} {marker}"))
}

/// Render any accepted time string as 12-hour display text.
pub fn display_12h(text: &str) -> Result<String> {
    to_12h(&normalize_to_24h(text)?)
}

/// Format a remaining-seconds count for display.
///
/// Expired (zero or negative) input collapses to `"0:00:00"`. Otherwise
/// `"H:MM:SS"` when at least an hour remains, else `"M:SS"` with minutes
/// unpadded and seconds zero-padded.
pub fn format_countdown(remaining_secs: i64) -> String {
    if remaining_secs <= 0 {
        return "0:00:00".to_string();
    }
    let hours = remaining_secs / 3600;
    let minutes = (remaining_secs % 3600) / 60;
    let seconds = remaining_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Format a block duration in minutes: `"H:MM"` past the hour mark, bare
/// minutes below it.
pub fn format_duration(total_minutes: i64) -> String {
    let hours = total_minutes / 60;
    if hours > 0 {
        format!("{}:{:02}", hours, total_minutes % 60)
    } else {
        total_minutes.to_string()
    }
}
