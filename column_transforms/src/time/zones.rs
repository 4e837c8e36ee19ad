//! Wall-clock timestamp shifts between UTC and a named or fixed zone.
//!
//! Timestamps in a dataset carry no zone. Shifting from UTC renders the
//! instant in the target zone; shifting to UTC reads the value as wall
//! clock time in the source zone.

use chrono::{Duration, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use std::str::FromStr;

use crate::error::TransformError;

/// A timezone given either as an IANA name (`Europe/Madrid`, `UTC`) or as
/// a fixed offset (`+05:30`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl FromStr for Zone {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(tz) = trimmed.parse::<Tz>() {
            return Ok(Zone::Named(tz));
        }
        parse_offset(trimmed)
            .map(Zone::Fixed)
            .ok_or_else(|| TransformError::InvalidTimezone(s.to_string()))
    }
}

/// Parse `+HH:MM`, `+HHMM` or `+HH` (and the `-` forms).
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let sign = match s.chars().next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    let digits: String = s[1..].chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 18 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl Zone {
    /// Render a UTC timestamp as wall clock time in this zone.
    pub fn shift_from_utc(&self, ts: NaiveDateTime) -> NaiveDateTime {
        match self {
            Zone::Named(tz) => tz.from_utc_datetime(&ts).naive_local(),
            Zone::Fixed(offset) => offset.from_utc_datetime(&ts).naive_local(),
        }
    }

    /// Read a wall clock time in this zone and render it in UTC.
    pub fn shift_to_utc(&self, ts: NaiveDateTime) -> NaiveDateTime {
        match self {
            Zone::Named(tz) => local_to_utc_in(tz, ts),
            Zone::Fixed(offset) => local_to_utc_in(offset, ts),
        }
    }
}

/// Ambiguous wall clock times (clocks going back) resolve to the earlier
/// instant. Times skipped by a forward transition use the offset in force
/// before the gap, which moves them forward by the gap length.
fn local_to_utc_in<Z: TimeZone>(tz: &Z, ts: NaiveDateTime) -> NaiveDateTime {
    match tz.from_local_datetime(&ts) {
        LocalResult::Single(dt) => dt.naive_utc(),
        LocalResult::Ambiguous(earliest, _) => earliest.naive_utc(),
        LocalResult::None => {
            let before = ts.checked_sub_signed(Duration::days(1)).unwrap_or(ts);
            let offset = tz.offset_from_utc_datetime(&before).fix();
            ts.checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
                .unwrap_or(ts)
        }
    }
}

/// Parse a zone and convert a UTC timestamp into it.
pub fn utc_to_local(ts: NaiveDateTime, zone: &str) -> Result<NaiveDateTime, TransformError> {
    Ok(zone.parse::<Zone>()?.shift_from_utc(ts))
}

/// Parse a zone and convert a wall clock timestamp in it to UTC.
pub fn local_to_utc(ts: NaiveDateTime, zone: &str) -> Result<NaiveDateTime, TransformError> {
    Ok(zone.parse::<Zone>()?.shift_to_utc(ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_zones() {
        assert_eq!("UTC".parse::<Zone>().unwrap(), Zone::Named(Tz::UTC));
        assert!(matches!("Europe/Madrid".parse::<Zone>(), Ok(Zone::Named(_))));
        assert_eq!(
            "+05:30".parse::<Zone>().unwrap(),
            Zone::Fixed(FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap())
        );
        assert_eq!(
            "Mars/Olympus".parse::<Zone>(),
            Err(TransformError::InvalidTimezone("Mars/Olympus".to_string()))
        );
    }

    #[test]
    fn test_utc_to_local_and_back() {
        let utc = ts(2023, 7, 1, 12, 0);
        let madrid = utc_to_local(utc, "Europe/Madrid").unwrap();
        assert_eq!(madrid, ts(2023, 7, 1, 14, 0));
        assert_eq!(local_to_utc(madrid, "Europe/Madrid").unwrap(), utc);
    }

    #[test]
    fn test_parse_offset_forms() {
        assert_eq!(parse_offset("+0530"), FixedOffset::east_opt(19800));
        assert_eq!(parse_offset("-03"), FixedOffset::west_opt(3 * 3600));
        assert_eq!(parse_offset("05:30"), None);
        assert_eq!(parse_offset("+5:30"), None);
        assert_eq!(parse_offset("+25:00"), None);
    }

    #[test]
    fn test_fixed_offset() {
        let utc = ts(2023, 1, 1, 0, 0);
        assert_eq!(utc_to_local(utc, "-08:00").unwrap(), ts(2022, 12, 31, 16, 0));
    }

    #[test]
    fn test_ambiguous_local_time_takes_earlier_instant() {
        // 2023-10-29 02:30 happens twice in Madrid (CEST then CET).
        let local = ts(2023, 10, 29, 2, 30);
        assert_eq!(local_to_utc(local, "Europe/Madrid").unwrap(), ts(2023, 10, 29, 0, 30));
    }

    #[test]
    fn test_gap_local_time_uses_offset_before_transition() {
        // 2023-03-26 02:30 does not exist in Madrid; CET (+01:00) applies.
        let local = ts(2023, 3, 26, 2, 30);
        assert_eq!(local_to_utc(local, "Europe/Madrid").unwrap(), ts(2023, 3, 26, 1, 30));
    }
}
