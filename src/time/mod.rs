//! Time module for Earth orientation calculations
//!
//! This module provides the time-scale service the orientation core consumes:
//! epochs tagged with their scale, the TAI−UTC leap second table, TDT−UTC
//! conversions, and the "standard model" ΔT (TDT−UT1) used whenever measured
//! Earth orientation parameters are not available.

pub mod calendar;

use crate::constants::{
    DAY_S, J2000, J2000_YEAR, JULIAN_CENTURY_DAYS, JULIAN_YEAR_DAYS, MJD_OFFSET, TT_MINUS_TAI_S,
};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Time scale an [`Epoch`] is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scale {
    /// Coordinated Universal Time
    Utc,
    /// Universal Time tied to the actual rotation of the Earth
    Ut1,
    /// Terrestrial (Dynamical) Time
    Tdt,
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Utc => write!(f, "UTC"),
            Scale::Ut1 => write!(f, "UT1"),
            Scale::Tdt => write!(f, "TDT"),
        }
    }
}

/// A Julian date tagged with its time scale
///
/// Two epochs are never assumed to share a scale; use [`Timescale::to_tdt`]
/// and friends to convert explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Epoch {
    /// Julian date
    pub jd: f64,
    /// Scale the Julian date is expressed in
    pub scale: Scale,
}

impl Epoch {
    pub fn new(jd: f64, scale: Scale) -> Self {
        Self { jd, scale }
    }

    pub fn utc(jd: f64) -> Self {
        Self::new(jd, Scale::Utc)
    }

    pub fn ut1(jd: f64) -> Self {
        Self::new(jd, Scale::Ut1)
    }

    pub fn tdt(jd: f64) -> Self {
        Self::new(jd, Scale::Tdt)
    }

    /// TDT epoch from a Julian epoch year (2000.0 = J2000.0)
    pub fn from_julian_year(year: f64) -> Self {
        Self::tdt(J2000 + (year - J2000_YEAR) * JULIAN_YEAR_DAYS)
    }

    /// Modified Julian date in this epoch's scale
    pub fn mjd(&self) -> f64 {
        self.jd - MJD_OFFSET
    }

    /// Julian epoch year in this epoch's scale
    pub fn julian_year(&self) -> f64 {
        J2000_YEAR + (self.jd - J2000) / JULIAN_YEAR_DAYS
    }

    /// Julian centuries since J2000.0 in this epoch's scale
    pub fn julian_centuries(&self) -> f64 {
        (self.jd - J2000) / JULIAN_CENTURY_DAYS
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JD {:.6} {}", self.jd, self.scale)
    }
}

/// Time scale service: leap seconds, TDT−UTC and the default ΔT model
#[derive(Debug, Clone)]
pub struct Timescale {
    /// Optional ΔT table: (TDT Julian dates, TDT−UT1 in seconds)
    delta_t_table: Option<(Vec<f64>, Vec<f64>)>,
    /// UTC Julian dates at which each TAI−UTC offset takes effect
    leap_dates: Vec<f64>,
    /// TAI−UTC in seconds from the matching entry of `leap_dates` onward
    leap_offsets: Vec<i32>,
}

impl Default for Timescale {
    fn default() -> Self {
        let mut ts = Self {
            delta_t_table: None,
            leap_dates: Vec::new(),
            leap_offsets: Vec::new(),
        };
        ts.init_basic_leap_seconds();
        ts
    }
}

impl Timescale {
    /// Create a timescale from an explicit ΔT table and leap second list
    ///
    /// `leap_dates` must be ascending and the same length as `leap_offsets`.
    pub fn new(
        delta_t_table: Option<(Vec<f64>, Vec<f64>)>,
        leap_dates: Vec<f64>,
        leap_offsets: Vec<i32>,
    ) -> Self {
        Self {
            delta_t_table,
            leap_dates,
            leap_offsets,
        }
    }

    /// Replace the ΔT model with a tabulated series
    pub fn with_delta_t_table(mut self, tdt: Vec<f64>, delta_t: Vec<f64>) -> Self {
        self.delta_t_table = Some((tdt, delta_t));
        self
    }

    fn init_basic_leap_seconds(&mut self) {
        // (UTC Julian date, TAI−UTC)
        const LEAP_SECONDS: [(f64, i32); 28] = [
            (2441317.5, 10), // 1972-01-01
            (2441499.5, 11), // 1972-07-01
            (2441683.5, 12), // 1973-01-01
            (2442048.5, 13), // 1974-01-01
            (2442413.5, 14), // 1975-01-01
            (2442778.5, 15), // 1976-01-01
            (2443144.5, 16), // 1977-01-01
            (2443509.5, 17), // 1978-01-01
            (2443874.5, 18), // 1979-01-01
            (2444239.5, 19), // 1980-01-01
            (2444786.5, 20), // 1981-07-01
            (2445151.5, 21), // 1982-07-01
            (2445516.5, 22), // 1983-07-01
            (2446247.5, 23), // 1985-07-01
            (2447161.5, 24), // 1988-01-01
            (2447892.5, 25), // 1990-01-01
            (2448257.5, 26), // 1991-01-01
            (2448804.5, 27), // 1992-07-01
            (2449169.5, 28), // 1993-07-01
            (2449534.5, 29), // 1994-07-01
            (2450083.5, 30), // 1996-01-01
            (2450630.5, 31), // 1997-07-01
            (2451179.5, 32), // 1999-01-01
            (2453736.5, 33), // 2006-01-01
            (2454832.5, 34), // 2009-01-01
            (2456109.5, 35), // 2012-07-01
            (2457204.5, 36), // 2015-07-01
            (2457754.5, 37), // 2017-01-01
        ];

        for (date, offset) in LEAP_SECONDS {
            self.leap_dates.push(date);
            self.leap_offsets.push(offset);
        }
    }

    /// TAI−UTC in seconds, or `None` before the leap second era (1972)
    pub fn tai_minus_utc(&self, jd_utc: f64) -> Option<f64> {
        let index = self.leap_dates.partition_point(|&date| date <= jd_utc);
        if index == 0 {
            None
        } else {
            Some(self.leap_offsets[index - 1] as f64)
        }
    }

    /// TDT−UTC in seconds for a UTC Julian date
    ///
    /// Before 1972 UTC tracked UT1 closely, so ΔT stands in for it.
    pub fn tdt_minus_utc(&self, jd_utc: f64) -> f64 {
        match self.tai_minus_utc(jd_utc) {
            Some(tai_minus_utc) => tai_minus_utc + TT_MINUS_TAI_S,
            None => self.delta_t(jd_utc),
        }
    }

    /// Convert a UTC Julian date to TDT
    pub fn utc_to_tdt(&self, jd_utc: f64) -> f64 {
        jd_utc + self.tdt_minus_utc(jd_utc) / DAY_S
    }

    /// Convert a TDT Julian date to UTC
    pub fn tdt_to_utc(&self, jd_tdt: f64) -> f64 {
        // Two passes settle the offset except inside a leap second itself
        let mut jd_utc = jd_tdt - self.tdt_minus_utc(jd_tdt) / DAY_S;
        jd_utc = jd_tdt - self.tdt_minus_utc(jd_utc) / DAY_S;
        jd_utc
    }

    /// Express an epoch in TDT
    ///
    /// UT1 epochs are converted with the default ΔT model; callers holding
    /// measured TDT−UT1 should convert themselves.
    pub fn to_tdt(&self, epoch: Epoch) -> Epoch {
        match epoch.scale {
            Scale::Tdt => epoch,
            Scale::Utc => Epoch::tdt(self.utc_to_tdt(epoch.jd)),
            Scale::Ut1 => {
                let first = epoch.jd + self.delta_t(epoch.jd) / DAY_S;
                Epoch::tdt(epoch.jd + self.delta_t(first) / DAY_S)
            }
        }
    }

    /// Express an epoch in UTC
    ///
    /// UT1 is within 0.9 s of UTC and is taken as UTC directly.
    pub fn to_utc(&self, epoch: Epoch) -> Epoch {
        match epoch.scale {
            Scale::Utc => epoch,
            Scale::Ut1 => Epoch::utc(epoch.jd),
            Scale::Tdt => Epoch::utc(self.tdt_to_utc(epoch.jd)),
        }
    }

    /// Default ("standard model") TDT−UT1 in seconds for a TDT Julian date
    pub fn delta_t(&self, jd_tdt: f64) -> f64 {
        if let Some((table_tdt, table_delta_t)) = &self.delta_t_table {
            Self::interpolate(jd_tdt, table_tdt, table_delta_t)
        } else {
            let year = J2000_YEAR + (jd_tdt - J2000) / JULIAN_YEAR_DAYS;
            Self::delta_t_approx(year)
        }
    }

    /// Polynomial ΔT approximation by year (Espenak & Meeus)
    fn delta_t_approx(year: f64) -> f64 {
        if year < -500.0 {
            let u = (year - 1820.0) / 100.0;
            -20.0 + 32.0 * u * u
        } else if year < 500.0 {
            let t = year / 100.0;
            10583.6 - 1014.41 * t + 33.78311 * t * t - 5.952053 * t.powi(3) - 0.1798452 * t.powi(4)
                + 0.022174192 * t.powi(5)
                + 0.0090316521 * t.powi(6)
        } else if year < 1600.0 {
            let t = (year - 1000.0) / 100.0;
            1574.2 - 556.01 * t + 71.23472 * t * t + 0.319781 * t.powi(3)
                - 0.8503463 * t.powi(4)
                - 0.005050998 * t.powi(5)
                + 0.0083572073 * t.powi(6)
        } else if year < 1700.0 {
            let t = year - 1600.0;
            120.0 - 0.9808 * t - 0.01532 * t * t + t.powi(3) / 7129.0
        } else if year < 1800.0 {
            let t = year - 1700.0;
            8.83 + 0.1603 * t - 0.0059285 * t * t + 0.00013336 * t.powi(3) - t.powi(4) / 1174000.0
        } else if year < 1860.0 {
            let t = year - 1800.0;
            13.72 - 0.332447 * t + 0.0068612 * t * t + 0.0041116 * t.powi(3)
                - 0.00037436 * t.powi(4)
                + 0.0000121272 * t.powi(5)
                - 0.0000001699 * t.powi(6)
                + 0.000000000875 * t.powi(7)
        } else if year < 1900.0 {
            let t = year - 1860.0;
            7.62 + 0.5737 * t - 0.251754 * t * t + 0.01680668 * t.powi(3) - 0.0004473624 * t.powi(4)
                + t.powi(5) / 233174.0
        } else if year < 1920.0 {
            let t = year - 1900.0;
            -2.79 + 1.494119 * t - 0.0598939 * t * t + 0.0061966 * t.powi(3) - 0.000197 * t.powi(4)
        } else if year < 1941.0 {
            let t = year - 1920.0;
            21.20 + 0.84493 * t - 0.076100 * t * t + 0.0020936 * t.powi(3)
        } else if year < 1961.0 {
            let t = year - 1950.0;
            29.07 + 0.407 * t - t * t / 233.0 + t.powi(3) / 2547.0
        } else if year < 1986.0 {
            let t = year - 1975.0;
            45.45 + 1.067 * t - t * t / 260.0 - t.powi(3) / 718.0
        } else if year < 2005.0 {
            let t = year - 2000.0;
            63.86 + 0.3345 * t - 0.060374 * t * t
                + 0.0017275 * t.powi(3)
                + 0.000651814 * t.powi(4)
                + 0.00002373599 * t.powi(5)
        } else if year < 2050.0 {
            let t = year - 2000.0;
            62.92 + 0.32217 * t + 0.005589 * t * t
        } else if year < 2150.0 {
            let u = (year - 1820.0) / 100.0;
            -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - year)
        } else {
            let u = (year - 1820.0) / 100.0;
            -20.0 + 32.0 * u * u
        }
    }

    /// Linear interpolation, holding the end values outside the table
    pub fn interpolate(x: f64, x_values: &[f64], y_values: &[f64]) -> f64 {
        if x_values.is_empty() || x_values.len() != y_values.len() {
            return f64::NAN;
        }

        let i = x_values.partition_point(|&val| val < x);
        if i == 0 {
            y_values[0]
        } else if i >= x_values.len() {
            y_values[y_values.len() - 1]
        } else {
            let (x0, x1) = (x_values[i - 1], x_values[i]);
            let (y0, y1) = (y_values[i - 1], y_values[i]);
            y0 + (x - x0) / (x1 - x0) * (y1 - y0)
        }
    }

    /// UTC Julian date of a chrono timestamp
    pub fn jd_from_datetime(dt: DateTime<Utc>) -> f64 {
        let day = calendar::compute_julian_day(dt.year(), dt.month() as i32, dt.day() as i32);
        let seconds = dt.num_seconds_from_midnight() as f64 + dt.nanosecond() as f64 * 1e-9;
        day as f64 - 0.5 + seconds / DAY_S
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    #[test]
    fn test_tdt_minus_utc_2016() {
        let ts = Timescale::default();
        // 36 leap seconds were in effect in August 2016
        assert_relative_eq!(ts.tdt_minus_utc(2457601.75), 68.184, epsilon = 1e-12);
        assert_relative_eq!(ts.tdt_minus_utc(2457754.5), 69.184, epsilon = 1e-12);
        assert_relative_eq!(ts.tdt_minus_utc(2457754.499), 68.184, epsilon = 1e-12);
    }

    #[test]
    fn test_before_leap_seconds_uses_delta_t() {
        let ts = Timescale::default();
        assert!(ts.tai_minus_utc(2440000.5).is_none());
        assert_relative_eq!(
            ts.tdt_minus_utc(2440000.5),
            ts.delta_t(2440000.5),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_utc_tdt_roundtrip() {
        let ts = Timescale::default();
        let jd_utc = 2458000.25;
        let jd_tdt = ts.utc_to_tdt(jd_utc);
        // A JD near 2.46e6 resolves to about 40 µs, so the offset is checked loosely
        assert_relative_eq!((jd_tdt - jd_utc) * DAY_S, 69.184, epsilon = 1e-4);
        assert_relative_eq!(ts.tdt_minus_utc(jd_utc), 69.184, epsilon = 1e-12);
        assert_relative_eq!(ts.tdt_to_utc(jd_tdt), jd_utc, epsilon = 1e-8);
    }

    #[test]
    fn test_epoch_conversions_keep_scale_explicit() {
        let ts = Timescale::default();
        let utc = Epoch::utc(2457601.75);
        let tdt = ts.to_tdt(utc);
        assert_eq!(tdt.scale, Scale::Tdt);
        assert_eq!(ts.to_tdt(tdt), tdt);
        let back = ts.to_utc(tdt);
        assert_eq!(back.scale, Scale::Utc);
        assert_relative_eq!(back.jd, utc.jd, epsilon = 1e-8);
    }

    #[test]
    fn test_julian_year() {
        let epoch = Epoch::tdt(J2000);
        assert_relative_eq!(epoch.julian_year(), 2000.0, epsilon = 1e-12);
        let later = Epoch::from_julian_year(2016.5);
        assert_relative_eq!(later.julian_year(), 2016.5, epsilon = 1e-10);
        assert_relative_eq!(later.julian_centuries(), 0.165, epsilon = 1e-12);
    }

    #[test]
    fn test_delta_t_approximation() {
        let ts = Timescale::default();
        assert_relative_eq!(Timescale::delta_t_approx(2000.0), 63.86, epsilon = 0.1);
        // 2016: the model sits within a couple of seconds of the measured 68.4 s
        let delta_t = ts.delta_t(2457601.75);
        assert!((delta_t - 68.4).abs() < 2.0, "delta_t = {}", delta_t);
    }

    #[test]
    fn test_delta_t_table_overrides_model() {
        let ts = Timescale::default().with_delta_t_table(vec![J2000, J2000 + 10.0], vec![60.0, 70.0]);
        assert_relative_eq!(ts.delta_t(J2000 + 5.0), 65.0, epsilon = 1e-12);
        assert_relative_eq!(ts.delta_t(J2000 - 5.0), 60.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ut1_epoch_uses_model_delta_t() {
        let ts = Timescale::default();
        let ut1 = Epoch::ut1(2457601.75);
        let tdt = ts.to_tdt(ut1);
        assert_relative_eq!((tdt.jd - ut1.jd) * DAY_S, ts.delta_t(tdt.jd), epsilon = 1e-4);
        assert_eq!(ts.to_utc(ut1), Epoch::utc(2457601.75));
    }

    #[test]
    fn test_custom_leap_table() {
        let ts = Timescale::new(None, vec![2457000.5, 2458000.5], vec![10, 11]);
        assert!(ts.tai_minus_utc(2456000.0).is_none());
        assert_relative_eq!(ts.tdt_minus_utc(2457500.0), 42.184, epsilon = 1e-12);
        assert_relative_eq!(ts.tdt_minus_utc(2458000.5), 43.184, epsilon = 1e-12);
    }

    #[test]
    fn test_jd_from_datetime() {
        let dt = Utc.with_ymd_and_hms(2016, 8, 1, 6, 0, 0).unwrap();
        assert_relative_eq!(Timescale::jd_from_datetime(dt), 2457601.75, epsilon = 1e-9);
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_relative_eq!(Timescale::jd_from_datetime(j2000), J2000, epsilon = 1e-9);
    }
}
