use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::ApiError;

/// Format Weatherbit expects for `start_date` / `end_date`.
pub const WINDOW_FORMAT: &str = "%Y-%m-%d:%H";

/// UTC bounds of a historical lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// The `days` full days before today's midnight in `tz`, relative to `now`.
    pub fn days_before(now: DateTime<Utc>, tz: Tz, days: i64) -> Self {
        let end = local_midnight(now, tz);
        let start = end - Duration::days(days);

        Self { start, end }
    }

    /// Same as [`TimeWindow::days_before`] with the timezone given by name.
    pub fn days_before_in(now: DateTime<Utc>, tz_name: &str, days: i64) -> Result<Self, ApiError> {
        let tz = parse_timezone(tz_name)?;
        Ok(Self::days_before(now, tz, days))
    }

    /// `start_date` query value.
    pub fn start_param(&self) -> String {
        self.start.format(WINDOW_FORMAT).to_string()
    }

    /// `end_date` query value.
    pub fn end_param(&self) -> String {
        self.end.format(WINDOW_FORMAT).to_string()
    }
}

/// Resolve an IANA timezone name such as `Europe/London`.
pub fn parse_timezone(name: &str) -> Result<Tz, ApiError> {
    name.parse::<Tz>().map_err(|_| ApiError::InvalidTimezone(name.to_string()))
}

/// Start of the local day containing `now`, as UTC.
fn local_midnight(now: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let midnight = now.with_timezone(&tz).date_naive().and_time(chrono::NaiveTime::MIN);

    resolve_local(tz, midnight)
}

// Midnight may fall into a DST gap; the day then starts at the first
// existing local instant after it.
fn resolve_local(tz: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    (0..=96)
        .map(|step| local + Duration::minutes(15 * step))
        .find_map(|probe| tz.from_local_datetime(&probe).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| local.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn utc_city_window_is_previous_day() {
        let now = utc("2024-03-10T15:42:10Z");
        let w = TimeWindow::days_before_in(now, "UTC", 1).unwrap();

        assert_eq!(w.end, utc("2024-03-10T00:00:00Z"));
        assert_eq!(w.start, utc("2024-03-09T00:00:00Z"));
        assert_eq!(w.start_param(), "2024-03-09:00");
        assert_eq!(w.end_param(), "2024-03-10:00");
    }

    #[test]
    fn east_of_utc_uses_local_date() {
        // 20:30 UTC is already the next day in Tokyo (+09:00).
        let now = utc("2024-06-01T20:30:00Z");
        let w = TimeWindow::days_before_in(now, "Asia/Tokyo", 1).unwrap();

        assert_eq!(w.end, utc("2024-06-01T15:00:00Z"));
        assert_eq!(w.start, utc("2024-05-31T15:00:00Z"));
        assert_eq!(w.end_param(), "2024-06-01:15");
        assert_eq!(w.start_param(), "2024-05-31:15");
    }

    #[test]
    fn west_of_utc_uses_local_date() {
        // 02:00 UTC is still the previous evening in New York (-04:00 in June).
        let now = utc("2024-06-02T02:00:00Z");
        let w = TimeWindow::days_before_in(now, "America/New_York", 1).unwrap();

        assert_eq!(w.end, utc("2024-06-01T04:00:00Z"));
        assert_eq!(w.end - w.start, Duration::hours(24));
    }

    #[test]
    fn start_is_exactly_24h_before_end_across_dst() {
        // Europe/London springs forward on 2024-03-31.
        let now = utc("2024-04-01T12:00:00Z");
        let w = TimeWindow::days_before_in(now, "Europe/London", 1).unwrap();

        assert_eq!(w.end, utc("2024-03-31T23:00:00Z"));
        assert_eq!(w.start, utc("2024-03-30T23:00:00Z"));
    }

    #[test]
    fn midnight_in_dst_gap_moves_forward() {
        // America/Santiago skipped 00:00-01:00 local on 2024-09-08.
        let now = utc("2024-09-08T18:00:00Z");
        let w = TimeWindow::days_before_in(now, "America/Santiago", 1).unwrap();

        assert_eq!(w.end, utc("2024-09-08T04:00:00Z"));
        assert_eq!(w.end - w.start, Duration::hours(24));
    }

    #[test]
    fn params_match_format() {
        let w = TimeWindow::days_before_in(Utc::now(), "Australia/Adelaide", 1).unwrap();

        for param in [w.start_param(), w.end_param()] {
            assert_eq!(param.len(), 13, "{param}");
            assert_eq!(&param[4..5], "-");
            assert_eq!(&param[7..8], "-");
            assert_eq!(&param[10..11], ":");
            assert!(param.chars().filter(|c| c.is_ascii_digit()).count() == 10);
        }
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let err = TimeWindow::days_before_in(Utc::now(), "Mars/Olympus_Mons", 1).unwrap_err();
        assert!(matches!(err, ApiError::InvalidTimezone(ref name) if name == "Mars/Olympus_Mons"));
    }
}
