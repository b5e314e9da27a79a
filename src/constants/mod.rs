//! Constants module for Earth orientation calculations

use std::f64::consts::PI;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// J2000.0 epoch as Julian date (TDT)
pub const J2000: f64 = 2_451_545.0;
/// Julian epoch year of J2000.0
pub const J2000_YEAR: f64 = 2000.0;
/// Days in a Julian year
pub const JULIAN_YEAR_DAYS: f64 = 365.25;
/// Days in a Julian century
pub const JULIAN_CENTURY_DAYS: f64 = 36_525.0;
/// Offset between Julian date and Modified Julian date
pub const MJD_OFFSET: f64 = 2_400_000.5;
/// TT minus TAI in seconds
pub const TT_MINUS_TAI_S: f64 = 32.184;

// Angles
/// Arcseconds to radians conversion factor
pub const ASEC2RAD: f64 = 4.848_136_811_095_36e-6;
/// Milliarcseconds to radians conversion factor
pub const MAS2RAD: f64 = ASEC2RAD / 1000.0;
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;
