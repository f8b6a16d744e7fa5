//! Turns raw cell values into typed ones: local timestamps and temperatures.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Local timestamp layouts seen across provider variants, in match order.
const DATETIME_FORMATS: [&str; 4] = [
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M h",
    "%Y-%m-%d %H:%M",
];

/// Markers the provider writes into cells with no reading.
const MISSING_MARKERS: [&str; 2] = ["-", "nd"];

/// Tries each known timestamp layout in turn.
pub fn parse_local_datetime(raw: &str) -> Option<NaiveDateTime> {
    let cleaned = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(cleaned, format).ok())
}

/// Floors a local wall-clock time to its hour and converts it to UTC.
///
/// When clocks fall back the earlier of the two candidate instants wins.
/// A wall-clock hour skipped by the spring-forward change names no instant
/// at all and yields `None`.
pub fn align_hour_utc(local: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    let aligned = local.with_minute(0)?.with_second(0)?.with_nanosecond(0)?;
    match tz.from_local_datetime(&aligned) {
        LocalResult::Single(instant) => Some(instant.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// Reads a temperature cell, accepting the decimal comma.
pub fn parse_temperature(raw: &str) -> Option<f64> {
    let cleaned = raw.trim();
    if cleaned.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| cleaned.eq_ignore_ascii_case(marker))
    {
        return None;
    }
    cleaned.replace(',', ".").parse().ok()
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::Europe::Madrid;

    fn utc(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn should_parse_the_provider_timestamp_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 37, 0)
            .unwrap();

        assert_eq!(parse_local_datetime("05/03/2024 14:37"), Some(expected));
        assert_eq!(parse_local_datetime("05/03/2024 14:37 h"), Some(expected));
        assert_eq!(parse_local_datetime("2024-03-05 14:37"), Some(expected));
        assert_eq!(
            parse_local_datetime(" 05/03/2024 14:37:05 "),
            Some(expected.with_second(5).unwrap())
        );
    }

    #[test]
    fn should_reject_unknown_timestamp_layouts() {
        assert!(parse_local_datetime("2024/03/05 14:37").is_none());
        assert!(parse_local_datetime("05-03-2024 14:37").is_none());
        assert!(parse_local_datetime("varias").is_none());
        assert!(parse_local_datetime("").is_none());
    }

    #[test]
    fn should_floor_to_the_hour_and_convert_to_utc() {
        let local = parse_local_datetime("05/03/2024 14:37").unwrap();
        let instant = align_hour_utc(local, Madrid).unwrap();

        // March 5th is still on CET (+01:00)
        assert_eq!(instant, utc(2024, 3, 5, 13));
    }

    #[test]
    fn should_convert_summer_time() {
        let local = parse_local_datetime("15/07/2024 12:15").unwrap();
        let instant = align_hour_utc(local, Madrid).unwrap();

        // July is on CEST (+02:00)
        assert_eq!(instant, utc(2024, 7, 15, 10));
    }

    #[test]
    fn should_pick_the_earlier_instant_when_clocks_fall_back() {
        // 02:xx on 2024-10-27 happens twice in Madrid
        let local = parse_local_datetime("27/10/2024 02:30").unwrap();
        let instant = align_hour_utc(local, Madrid).unwrap();

        assert_eq!(instant, utc(2024, 10, 27, 0));
    }

    #[test]
    fn should_drop_the_hour_skipped_by_spring_forward() {
        // 02:xx on 2024-03-31 never happens in Madrid
        let local = parse_local_datetime("31/03/2024 02:30").unwrap();

        assert_eq!(align_hour_utc(local, Madrid), None);
    }

    #[test]
    fn should_parse_temperatures_with_either_decimal_mark() {
        assert_eq!(parse_temperature("12,3"), Some(12.3));
        assert_eq!(parse_temperature("12.3"), Some(12.3));
        assert_eq!(parse_temperature(" -3,4 "), Some(-3.4));
        assert_eq!(parse_temperature("0"), Some(0.0));
    }

    #[test]
    fn should_reject_missing_value_markers() {
        assert_eq!(parse_temperature("-"), None);
        assert_eq!(parse_temperature("ND"), None);
        assert_eq!(parse_temperature("nd"), None);
        assert_eq!(parse_temperature(""), None);
        assert_eq!(parse_temperature("   "), None);
    }

    #[test]
    fn should_reject_garbage_temperatures() {
        assert_eq!(parse_temperature("12,3 °C"), None);
        assert_eq!(parse_temperature("varias"), None);
    }
}
