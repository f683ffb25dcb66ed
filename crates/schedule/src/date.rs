//! Date normalization at the schedule boundary.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

/// A local calendar day.
pub type CalendarDate = NaiveDate;

/// Local date-time layouts, tried in order after RFC 3339.
const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a raw event date into a local date-time.
///
/// Accepts RFC 3339 (with `Z` or an explicit offset, converted into `offset`), local date-times
/// with `T` or a space between date and time, and bare `YYYY-MM-DD` dates, which are read as
/// local midnight. Returns `None` for anything else.
pub fn normalize_date_time(raw: &str, offset: &FixedOffset) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(offset).naive_local());
    }

    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|day| day.and_time(NaiveTime::MIN))
        })
}

/// The local calendar day of a raw event date.
pub fn normalize_date(raw: &str, offset: &FixedOffset) -> Option<CalendarDate> {
    normalize_date_time(raw, offset).map(|at| at.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn brt() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_accepted_layouts() {
        let cases = [
            ("2024-03-10", at(2024, 3, 10, 0, 0)),
            ("2024-03-10T14:30", at(2024, 3, 10, 14, 30)),
            ("2024-03-10T14:30:00", at(2024, 3, 10, 14, 30)),
            ("2024-03-10T14:30:00.000", at(2024, 3, 10, 14, 30)),
            ("2024-03-10 14:30", at(2024, 3, 10, 14, 30)),
            ("  2024-03-10 14:30:00 ", at(2024, 3, 10, 14, 30)),
            ("2024-03-10T14:30:00Z", at(2024, 3, 10, 14, 30)),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize_date_time(raw, &utc()), Some(expected), "{raw}");
        }
    }

    #[test]
    fn test_offsets_are_converted_to_local_time() {
        assert_eq!(
            normalize_date_time("2024-03-11T01:30:00Z", &brt()),
            Some(at(2024, 3, 10, 22, 30))
        );
        assert_eq!(
            normalize_date("2024-03-11T01:30:00Z", &brt()),
            NaiveDate::from_ymd_opt(2024, 3, 10)
        );
        // Local layouts carry no offset and are taken as already local.
        assert_eq!(
            normalize_date_time("2024-03-11T01:30", &brt()),
            Some(at(2024, 3, 11, 1, 30))
        );
    }

    #[test]
    fn test_malformed_dates_are_none() {
        for raw in ["", "   ", "invalid", "2024-13-01", "2024-02-30", "10/03/2024", "2024-03-10T25:00"] {
            assert_eq!(normalize_date_time(raw, &utc()), None, "{raw}");
        }
    }
}
