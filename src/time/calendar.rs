//! Calendar date and Julian date conversion functions
//!
//! Only used for reporting: the orientation core works purely in Julian and
//! Modified Julian dates.

use crate::constants::MJD_OFFSET;

/// Convert Julian day integer to calendar date (year, month, day)
///
/// Uses the proleptic Gregorian calendar.
pub fn compute_calendar_date(jd_integer: i32) -> (i32, i32, i32) {
    // See the Explanatory Supplement to the Astronomical Almanac 15.11.
    let f = jd_integer + 1401 + ((4 * jd_integer + 274277) / 146097 * 3 / 4 - 38);
    let e = 4 * f + 3;
    let g = (e % 1461) / 4;
    let h = 5 * g + 2;
    let day = (h % 153) / 5 + 1;
    let month = (h / 153 + 2) % 12 + 1;
    let year = e / 1461 - 4716 + (12 + 2 - month) / 12;

    (year, month, day)
}

/// Convert (year, month, day) to Julian day integer
///
/// Uses the proleptic Gregorian calendar.
pub fn compute_julian_day(year: i32, month: i32, day: i32) -> i32 {
    let janfeb = month < 3;

    1461 * (year + 4800 - if janfeb { 1 } else { 0 }) / 4
        + 367 * (month - 2 + if janfeb { 12 } else { 0 }) / 12
        - 3 * ((year + 4900 - if janfeb { 1 } else { 0 }) / 100) / 4
        - 32075
        + day
}

/// Format a Julian date as a calendar date string (YYYY-MM-DD)
pub fn format_date(jd: f64) -> String {
    let (year, month, day) = compute_calendar_date((jd + 0.5).floor() as i32);
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Format a Julian date as `YYYY-MM-DD HH:MM:SS.sss`
pub fn format_datetime(jd: f64) -> String {
    let shifted = jd + 0.5;
    let day_number = shifted.floor();
    let mut millis = ((shifted - day_number) * 86_400_000.0).round() as i64;
    let mut day_number = day_number as i32;
    if millis >= 86_400_000 {
        millis -= 86_400_000;
        day_number += 1;
    }
    let (year, month, day) = compute_calendar_date(day_number);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:03}",
        year,
        month,
        day,
        millis / 3_600_000,
        millis / 60_000 % 60,
        millis / 1000 % 60,
        millis % 1000
    )
}

/// Format a whole-day Modified Julian date as `YYYY-MM-DD`
pub fn format_mjd(mjd: i32) -> String {
    format_date(mjd as f64 + MJD_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_julian_day_conversion() {
        assert_eq!(compute_julian_day(2000, 1, 1), 2451545);
        assert_eq!(compute_julian_day(2016, 8, 1), 2457602);
        assert_eq!(compute_julian_day(1969, 7, 20), 2440423);
        assert_eq!(compute_julian_day(1900, 1, 1), 2415021);
    }

    #[test]
    fn test_calendar_date_conversion() {
        assert_eq!(compute_calendar_date(2451545), (2000, 1, 1));
        assert_eq!(compute_calendar_date(2458850), (2020, 1, 1));
        assert_eq!(compute_calendar_date(2440423), (1969, 7, 20));
    }

    #[test]
    fn test_format_dates() {
        // Midnight at the start of the day stays on that day
        assert_eq!(format_date(2457601.5), "2016-08-01");
        assert_eq!(format_date(2457601.75), "2016-08-01");
        assert_eq!(format_datetime(2457601.75), "2016-08-01 06:00:00.000");
        assert_eq!(format_mjd(59328), "2021-04-24");
        assert_eq!(format_mjd(58955), "2020-04-16");
    }
}
