//! Display formatting for server timestamps

use jiff::{Timestamp, Zoned, civil::DateTime, tz::TimeZone};

/// `15 Jan 2024, 09:30 am`
const DATE_TIME_FORMAT: &str = "%-d %b %Y, %I:%M %P";

/// Parse an ISO-8601 timestamp, values without an offset are taken as UTC
pub fn parse_timestamp(timestamp: &str) -> Option<Timestamp> {
    if let Ok(timestamp) = timestamp.parse::<Timestamp>() {
        return Some(timestamp);
    }

    let civil = timestamp.parse::<DateTime>().ok()?;
    civil.to_zoned(TimeZone::UTC).ok().map(|zoned| zoned.timestamp())
}

fn zoned(timestamp: &str, time_zone: &TimeZone) -> Option<Zoned> {
    parse_timestamp(timestamp).map(|timestamp| timestamp.to_zoned(time_zone.clone()))
}

/// Date and time in `time_zone`, unparseable input is returned as is
pub fn format_date_time(timestamp: &str, time_zone: &TimeZone) -> String {
    match zoned(timestamp, time_zone) {
        Some(zoned) => zoned.strftime(DATE_TIME_FORMAT).to_string(),
        None => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::tz::Offset;

    #[test]
    fn naive_timestamps_are_utc() {
        let timestamp = parse_timestamp("2024-01-15T09:30:00.123456").unwrap();
        assert_eq!(timestamp, "2024-01-15T09:30:00.123456Z".parse::<Timestamp>().unwrap());
    }

    #[test]
    fn formats_like_a_short_locale_date() {
        let utc = TimeZone::UTC;
        assert_eq!(format_date_time("2024-01-05T09:30:00", &utc), "5 Jan 2024, 09:30 am");
        assert_eq!(format_date_time("2024-01-15T14:05:00+00:00", &utc), "15 Jan 2024, 02:05 pm");
    }

    #[test]
    fn converts_into_the_display_zone() {
        let ist = TimeZone::fixed(Offset::from_seconds(5 * 3600 + 30 * 60).unwrap());
        assert_eq!(format_date_time("2024-01-15T20:00:00", &ist), "16 Jan 2024, 01:30 am");
    }

    #[test]
    fn unparseable_input_passes_through() {
        assert_eq!(format_date_time("yesterday", &TimeZone::UTC), "yesterday");
    }
}
