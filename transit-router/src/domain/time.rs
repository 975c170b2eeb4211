//! Clock and duration handling for timetable data.
//!
//! Timetable exports carry times either as plain `HH:MM` clock values or as
//! pandas-style timedeltas (`"0 days 14:29:00"`). Everything inside the
//! router works in minutes since midnight as an `f64`, so this module only
//! converts between text and that canonical form.

use chrono::{Local, Timelike};

/// Minutes in one service day.
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Error returned when parsing an invalid time or duration string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time {input:?}: {reason}")]
pub struct ParseError {
    input: String,
    reason: &'static str,
}

impl ParseError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }

    /// The text that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Parse a travel duration into minutes.
///
/// Accepts `H:MM:SS` or a day-prefixed timedelta such as
/// `"0 days 01:23:45"`. An empty string is a zero duration.
///
/// # Examples
///
/// ```
/// use transit_router::domain::parse_travel_time;
///
/// assert!((parse_travel_time("1:23:45").unwrap() - 83.75).abs() < 1e-9);
/// assert!((parse_travel_time("0 days 01:23:45").unwrap() - 83.75).abs() < 1e-9);
/// assert_eq!(parse_travel_time("").unwrap(), 0.0);
/// assert!(parse_travel_time("soon").is_err());
/// ```
pub fn parse_travel_time(text: &str) -> Result<f64, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let (days, clock) = split_day_prefix(trimmed)?;
    let fields: Vec<&str> = clock.split(':').collect();
    if fields.len() != 3 {
        return Err(ParseError::new(text, "expected H:MM:SS"));
    }

    let hours = parse_whole(fields[0]).ok_or_else(|| ParseError::new(text, "invalid hours"))?;
    let minutes =
        parse_whole(fields[1]).ok_or_else(|| ParseError::new(text, "invalid minutes"))?;
    let seconds =
        parse_seconds(fields[2]).ok_or_else(|| ParseError::new(text, "invalid seconds"))?;
    if minutes >= 60 {
        return Err(ParseError::new(text, "minutes must be 0-59"));
    }

    Ok(days as f64 * MINUTES_PER_DAY + hours as f64 * 60.0 + minutes as f64 + seconds / 60.0)
}

/// Parse a clock time into minutes since midnight.
///
/// Accepts `HH:MM`, `HH:MM:SS`, or the day-prefixed timedelta form. The
/// result is not wrapped: `"25:10"` and `"1 days 01:10:00"` both yield
/// minutes past the first midnight.
///
/// # Examples
///
/// ```
/// use transit_router::domain::parse_time_to_minutes;
///
/// assert_eq!(parse_time_to_minutes("14:29").unwrap(), 869.0);
/// assert_eq!(parse_time_to_minutes("0 days 00:02:00").unwrap(), 2.0);
/// assert!(parse_time_to_minutes("14h29").is_err());
/// ```
pub fn parse_time_to_minutes(text: &str) -> Result<f64, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::new(text, "empty time"));
    }

    let (days, clock) = split_day_prefix(trimmed)?;
    let fields: Vec<&str> = clock.split(':').collect();

    let (hours, minutes, seconds) = match fields.as_slice() {
        [h, m] => (parse_whole(h), parse_whole(m), Some(0.0)),
        [h, m, s] => (parse_whole(h), parse_whole(m), parse_seconds(s)),
        _ => return Err(ParseError::new(text, "expected HH:MM")),
    };

    let hours = hours.ok_or_else(|| ParseError::new(text, "invalid hours"))?;
    let minutes = minutes.ok_or_else(|| ParseError::new(text, "invalid minutes"))?;
    let seconds = seconds.ok_or_else(|| ParseError::new(text, "invalid seconds"))?;
    if minutes >= 60 {
        return Err(ParseError::new(text, "minutes must be 0-59"));
    }

    Ok(days as f64 * MINUTES_PER_DAY + hours as f64 * 60.0 + minutes as f64 + seconds / 60.0)
}

/// Format minutes since midnight as `HH:MM`, wrapping modulo one day.
///
/// # Examples
///
/// ```
/// use transit_router::domain::minutes_to_hhmm;
///
/// assert_eq!(minutes_to_hhmm(75.0), "01:15");
/// assert_eq!(minutes_to_hhmm(1445.0), "00:05");
/// assert_eq!(minutes_to_hhmm(-10.0), "23:50");
/// ```
pub fn minutes_to_hhmm(minutes: f64) -> String {
    let wrapped = minutes.rem_euclid(MINUTES_PER_DAY);
    let hours = (wrapped / 60.0).floor() as u32;
    let mins = (wrapped % 60.0).floor() as u32;
    format!("{:02}:{:02}", hours, mins)
}

/// Current local wall-clock time in minutes since midnight.
pub fn now_minutes() -> f64 {
    let now = Local::now().time();
    now.hour() as f64 * 60.0 + now.minute() as f64 + now.second() as f64 / 60.0
}

/// Split `"<d> days rest"` into its day count and clock part.
fn split_day_prefix(text: &str) -> Result<(u64, &str), ParseError> {
    let mut parts = text.split_whitespace();
    let first = parts.next().unwrap_or_default();

    match (parts.next(), parts.next(), parts.next()) {
        (None, _, _) => Ok((0, first)),
        (Some("days") | Some("day"), Some(clock), None) => {
            let days = parse_whole(first).ok_or_else(|| ParseError::new(text, "invalid day count"))?;
            Ok((days, clock))
        }
        _ => Err(ParseError::new(text, "expected '<d> days HH:MM:SS'")),
    }
}

fn parse_whole(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Seconds may carry a fractional part (`"05.500000"`).
fn parse_seconds(s: &str) -> Option<f64> {
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (s, None),
    };
    let whole = parse_whole(whole)?;
    if whole >= 60 {
        return None;
    }
    match frac {
        None => Some(whole as f64),
        Some(f) => {
            parse_whole(f)?;
            format!("{whole}.{f}").parse().ok()
        }
    }
}
