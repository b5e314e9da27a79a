//! Earth rotation: sidereal time and polar motion
//!
//! Greenwich mean sidereal time follows the IAU 1982 expression in UT1; the
//! equation of the equinoxes adds the IAU 1994 complementary terms.

use crate::constants::{ASEC2RAD, DAY_S, J2000, JULIAN_CENTURY_DAYS, TAU};
use crate::nutationlib::fundamental_arguments;
use crate::rotation::{rot_x, rot_y, rot_z};
use nalgebra::Matrix3;

/// Greenwich mean sidereal time (IAU 1982) in radians, range [0, 2π)
pub fn gmst82(jd_ut1: f64) -> f64 {
    // Coefficients of the IAU 1982 expression, shifted by 12h since the
    // day fraction is counted from midnight
    const A: f64 = 24110.54841 - DAY_S / 2.0;
    const B: f64 = 8640184.812866;
    const C: f64 = 0.093104;
    const D: f64 = -6.2e-6;

    let t = (jd_ut1 - J2000) / JULIAN_CENTURY_DAYS;
    let f = DAY_S * (jd_ut1 % 1.0);
    (TAU * ((A + (B + (C + D * t) * t) * t + f) / DAY_S)).rem_euclid(TAU)
}

/// Equation of the equinoxes in radians
///
/// `dpsi` is the total nutation in longitude (model plus any observed
/// correction) and `mean_obliquity` the IAU 1980 mean obliquity, both at `t`
/// Julian centuries of TDT.
pub fn equation_of_equinoxes(t: f64, dpsi: f64, mean_obliquity: f64) -> f64 {
    let om = fundamental_arguments(t)[4];
    dpsi * mean_obliquity.cos() + ASEC2RAD * (0.00264 * om.sin() + 0.000063 * (2.0 * om).sin())
}

/// Greenwich apparent sidereal time in radians, range [0, 2π)
pub fn gast(jd_ut1: f64, t: f64, dpsi: f64, mean_obliquity: f64) -> f64 {
    (gmst82(jd_ut1) + equation_of_equinoxes(t, dpsi, mean_obliquity)).rem_euclid(TAU)
}

/// Rotation from the true equator and equinox of date to the rotating
/// (pseudo Earth-fixed) frame
pub fn earth_rotation_matrix(gast: f64) -> Matrix3<f64> {
    rot_z(gast)
}

/// Polar motion matrix `R2(-x) · R1(-y)` for pole offsets in radians
pub fn polar_motion_matrix(dx: f64, dy: f64) -> Matrix3<f64> {
    rot_y(-dx) * rot_x(-dy)
}
