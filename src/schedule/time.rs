//! Clock-time tokens ("10:00 a.m.", "11 p.m.") and "open to close" ranges.

use chrono::NaiveTime;

/// Separator between the opening and closing token of an hours range.
const RANGE_SEPARATOR: &str = " to ";

/// Parse a single 12-hour clock token into a time of day.
///
/// Accepts `H` or `H:MM` followed by an `a`/`p` marker with optional
/// punctuation (`"a.m."`, `"pm"`, `"a"`), case-insensitive. Returns `None`
/// for anything else; `None` means unparseable, never midnight.
pub fn parse_time_token(token: &str) -> Option<NaiveTime> {
    let token = token.trim().to_lowercase();

    let digits_end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    if digits_end == 0 || digits_end > 2 {
        return None;
    }
    let mut hour: u32 = token[..digits_end].parse().ok()?;
    let mut rest = &token[digits_end..];

    let mut minute = 0;
    if let Some(after_colon) = rest.strip_prefix(':') {
        let minute_digits = after_colon.get(..2)?;
        if !minute_digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        minute = minute_digits.parse().ok()?;
        rest = &after_colon[2..];
    }

    let is_pm = parse_marker(rest.trim_start())? == 'p';

    if is_pm && hour != 12 {
        hour += 12;
    } else if !is_pm && hour == 12 {
        hour = 0;
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Match the meridiem marker: `a` or `p`, optionally followed by `.`, `m`, `.`.
fn parse_marker(marker: &str) -> Option<char> {
    let mut chars = marker.chars();
    let letter = chars.next().filter(|c| *c == 'a' || *c == 'p')?;
    let tail = chars.as_str();
    let tail = tail.strip_prefix('.').unwrap_or(tail);
    let tail = tail.strip_prefix('m').unwrap_or(tail);
    let tail = tail.strip_prefix('.').unwrap_or(tail);
    tail.is_empty().then_some(letter)
}

/// Opening and closing time parsed from an hours expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoursRange {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl HoursRange {
    /// Parse `"<open> to <close>"` (separator is case-insensitive).
    ///
    /// Returns `None` if the separator is missing, the split does not give
    /// exactly two segments, or either side fails [`parse_time_token`].
    pub fn parse(text: &str) -> Option<Self> {
        let lowered = text.to_lowercase();
        let mut segments = lowered.split(RANGE_SEPARATOR);

        let open = segments.next()?;
        let close = segments.next()?;
        if segments.next().is_some() {
            return None;
        }

        Some(Self {
            open: parse_time_token(open)?,
            close: parse_time_token(close)?,
        })
    }

    /// Inclusive on both ends. A close earlier than the open never matches
    /// anything past midnight; overnight windows are not rolled over.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.open <= time && time <= self.close
    }
}
