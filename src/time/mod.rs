//! Calendar time handling for timestamp attributes
//!
//! FIAP timestamps have the form `YYYY-MM-DDTHH:MM:SS` followed by an ISO
//! 8601 UTC offset such as `+09:00`. This module decomposes absolute
//! instants (seconds since the Unix epoch) into local calendar fields and
//! renders them in that fixed-width form. Everything before the offset is
//! exactly [`TIMESTAMP_BASE_LEN`] bytes, which is what lets the content
//! length of a request be computed before any field is rendered.

use core::fmt::{self, Write};

use heapless::String;

/// Byte length of the fixed-width `YYYY-MM-DDTHH:MM:SS` timestamp prefix.
pub const TIMESTAMP_BASE_LEN: usize = 19;

const SECONDS_PER_DAY: i64 = 86_400;

/// Broken-down local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarTime {
    /// Full Gregorian year, e.g. 2011
    pub year: u16,
    /// Month of the year, 1-12
    pub month: u8,
    /// Day of the month, 1-31
    pub day: u8,
    /// Hour of the day, 0-23
    pub hour: u8,
    /// Minute of the hour, 0-59
    pub minute: u8,
    /// Second of the minute, 0-59
    pub second: u8,
}

impl CalendarTime {
    /// Decomposes seconds since the Unix epoch into Gregorian calendar
    /// fields.
    ///
    /// The input is taken as-is; apply any UTC offset before calling. This
    /// is the boundary helper for callers that hold absolute instants rather
    /// than pre-decomposed fields.
    pub fn from_unix(seconds: i64) -> Self {
        let days = seconds.div_euclid(SECONDS_PER_DAY);
        let secs = seconds.rem_euclid(SECONDS_PER_DAY);

        // Gregorian date from day count, via 400-year era decomposition.
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + i64::from(month <= 2);

        Self {
            year: year as u16,
            month: month as u8,
            day: day as u8,
            hour: (secs / 3600) as u8,
            minute: (secs / 60 % 60) as u8,
            second: (secs % 60) as u8,
        }
    }
}

/// Produces local calendar fields and the UTC offset string for timestamps.
///
/// The upload client consumes this to turn each point's absolute instant
/// into the local-time attribute text. The offset string's length feeds into
/// the content-length estimate, so an implementation must return the same
/// string for the whole lifetime of an upload call.
pub trait Calendar {
    /// Local calendar fields for an absolute instant (Unix seconds).
    fn local_time(&self, unix_seconds: i64) -> CalendarTime;

    /// The ISO 8601 UTC offset appended to every timestamp, e.g. `+09:00`.
    fn utc_offset(&self) -> &str;
}

/// A timezone at a fixed offset from UTC, without daylight-saving rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedOffset {
    seconds: i32,
    iso: String<8>,
}

impl FixedOffset {
    /// Creates an offset of `hours` hours and `minutes` minutes east of UTC.
    ///
    /// Negative `hours` move west of UTC; `minutes` is the unsigned minute
    /// part in either direction.
    pub fn new(hours: i8, minutes: u8) -> Self {
        let magnitude = i32::from(hours.unsigned_abs()) * 3600 + i32::from(minutes) * 60;
        let mut iso = String::new();
        // "+HH:MM" always fits the backing buffer
        write!(
            iso,
            "{}{:02}:{:02}",
            if hours < 0 { '-' } else { '+' },
            hours.unsigned_abs(),
            minutes
        )
        .unwrap();
        Self {
            seconds: if hours < 0 { -magnitude } else { magnitude },
            iso,
        }
    }

    /// UTC itself, rendered as `+00:00`.
    pub fn utc() -> Self {
        Self::new(0, 0)
    }
}

impl Calendar for FixedOffset {
    fn local_time(&self, unix_seconds: i64) -> CalendarTime {
        CalendarTime::from_unix(unix_seconds + i64::from(self.seconds))
    }

    fn utc_offset(&self) -> &str {
        &self.iso
    }
}

/// Writes `YYYY-MM-DDTHH:MM:SS<offset>` for `t`.
///
/// The year is always four digits, every other field zero-padded to two.
/// The offset string is inserted verbatim and unvalidated, so the output is
/// always `TIMESTAMP_BASE_LEN + utc_offset.len()` bytes.
pub fn write_timestamp<W: fmt::Write>(
    out: &mut W,
    t: &CalendarTime,
    utc_offset: &str,
) -> fmt::Result {
    write!(
        out,
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}",
        t.year, t.month, t.day, t.hour, t.minute, t.second, utc_offset
    )
}
