//! Compact "Julian" date codes.
//!
//! A code is an unsigned integer made of a year fragment followed by a
//! three digit, 1-based day of year:
//!
//! * 5 digits, `YYDDD`: two digit year, resolved with [`resolve_century`]
//! * 7 digits, `YYYYDDD`: explicit four digit year
//!
//! These are ordinal dates, unrelated to the astronomical Julian Day Number.
//!
//! Decoding never fails. Codes of any other length decode to
//! [`sentinel_date`]. Encoding reproduces the compact form produced by the
//! upstream systems: the day of year is appended without zero padding, so
//! `encode(decode(code)) == code` only holds for day-of-year 100 and above.

use chrono::{Datelike, Duration, NaiveDate};

/// Two digit years up to and including this value belong to the 2000s.
pub const CENTURY_PIVOT: i32 = 50;

/// Decoded components of a code, before any date arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JulianParts {
    pub year: i32,
    pub day_of_year: i64,
}

/// Map a two digit year fragment to a full year.
///
/// ```
/// use column_transforms::time::julian::resolve_century;
/// assert_eq!(resolve_century(50), 2050);
/// assert_eq!(resolve_century(51), 1951);
/// ```
pub fn resolve_century(yy: i32) -> i32 {
    if yy <= CENTURY_PIVOT {
        2000 + yy
    } else {
        1900 + yy
    }
}

/// Date produced for codes of unsupported length: January 1st of year 0.
pub fn sentinel_date() -> NaiveDate {
    // Year 0 is inside chrono's proleptic Gregorian range.
    NaiveDate::from_ymd_opt(0, 1, 1).expect("year 0 is a valid chrono date")
}

/// Split a code into year and day of year.
///
/// Returns `None` when the code does not have exactly 5 or 7 digits.
/// Negative codes are never well formed.
pub fn split_code(code: i64) -> Option<JulianParts> {
    if code < 0 {
        return None;
    }
    let digits = code.to_string();

    let (year, day) = match digits.len() {
        5 => (resolve_century(digits[..2].parse().ok()?), &digits[2..]),
        7 => (digits[..4].parse().ok()?, &digits[4..]),
        _ => return None,
    };

    Some(JulianParts {
        year,
        day_of_year: day.parse().ok()?,
    })
}

/// Convert a code to a calendar date.
///
/// The result is January 1st of the decoded year plus `day_of_year - 1`
/// days. Day-of-year values outside `1..=366` are not rejected: `000`
/// lands on December 31st of the previous year and values past the end of
/// the year roll into the next one.
///
/// ```
/// use chrono::NaiveDate;
/// use column_transforms::time::julian::decode;
/// assert_eq!(decode(23100), NaiveDate::from_ymd_opt(2023, 4, 10).unwrap());
/// ```
pub fn decode(code: i64) -> NaiveDate {
    let Some(parts) = split_code(code) else {
        return sentinel_date();
    };

    NaiveDate::from_ymd_opt(parts.year, 1, 1)
        .and_then(|reference| reference.checked_add_signed(Duration::days(parts.day_of_year - 1)))
        .unwrap_or_else(sentinel_date)
}

/// Convert a calendar date to its compact code.
///
/// The year fragment is the third and fourth character of the year and
/// the day of year is appended unpadded, then the concatenation is read as
/// an integer:
///
/// ```
/// use chrono::NaiveDate;
/// use column_transforms::time::julian::encode;
/// let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
/// assert_eq!(encode(date(1999, 12, 31)), 99365);
/// assert_eq!(encode(date(2023, 1, 5)), 235);
/// assert_eq!(encode(date(2000, 1, 1)), 1);
/// ```
pub fn encode(date: NaiveDate) -> i64 {
    let year = date.year().to_string();
    let fragment: String = year.chars().skip(2).take(2).collect();
    let packed = format!("{}{}", fragment, date.ordinal());

    // Only digits reach this point: a sign can only sit at index 0.
    packed.parse().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_split_short_code() {
        assert_eq!(
            split_code(23100),
            Some(JulianParts {
                year: 2023,
                day_of_year: 100
            })
        );
    }

    #[test]
    fn test_split_long_code() {
        assert_eq!(
            split_code(1987032),
            Some(JulianParts {
                year: 1987,
                day_of_year: 32
            })
        );
    }

    #[test]
    fn test_split_rejects_other_lengths() {
        assert_eq!(split_code(123), None);
        assert_eq!(split_code(231000), None);
        assert_eq!(split_code(12345678), None);
        assert_eq!(split_code(-2310), None);
    }

    #[test]
    fn test_century_boundary() {
        assert_eq!(decode(50001), date(2050, 1, 1));
        assert_eq!(decode(51001), date(1951, 1, 1));
        assert_eq!(decode(10001), date(2010, 1, 1));
        assert_eq!(decode(99365), date(1999, 12, 31));
    }

    #[test]
    fn test_decode_known_values() {
        assert_eq!(decode(23100), date(2023, 4, 10));
        assert_eq!(decode(24060), date(2024, 2, 29));
        assert_eq!(decode(2024366), date(2024, 12, 31));
        assert_eq!(decode(1999001), date(1999, 1, 1));
    }

    #[test]
    fn test_decode_day_zero_and_overflow_follow_arithmetic() {
        assert_eq!(decode(23000), date(2022, 12, 31));
        assert_eq!(decode(23366), date(2024, 1, 1));
    }

    #[test]
    fn test_decode_malformed_is_sentinel() {
        assert_eq!(decode(123456), sentinel_date());
        assert_eq!(decode(235), sentinel_date());
        assert_eq!(decode(0), sentinel_date());
        assert_eq!(sentinel_date(), date(0, 1, 1));
    }

    #[test]
    fn test_encode_drops_padding() {
        assert_eq!(encode(date(2023, 1, 5)), 235);
        assert_eq!(encode(date(2023, 2, 14)), 2345);
        assert_eq!(encode(date(2000, 1, 1)), 1);
        assert_eq!(encode(date(2009, 12, 31)), 9365);
        assert_eq!(encode(date(1999, 12, 31)), 99365);
    }

    proptest! {
        #[test]
        fn prop_short_code_round_trip(yy in 10i64..100, doy in 100i64..=365) {
            let code = yy * 1000 + doy;
            prop_assert_eq!(encode(decode(code)), code);
        }

        #[test]
        fn prop_long_code_decodes_explicit_year(year in 1000i32..=9999, doy in 1u32..=365) {
            let code = i64::from(year) * 1000 + i64::from(doy);
            let decoded = decode(code);
            prop_assert_eq!(decoded.year(), year);
            prop_assert_eq!(decoded.ordinal(), doy);
        }
    }
}
