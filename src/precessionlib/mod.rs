//! IAU 1976 (Lieske) precession
//!
//! The equatorial precession angles ζ, z and θ are cubic polynomials in
//! Julian centuries of TDT since J2000.0. The matrix from the J2000.0 mean
//! frame to the mean frame of date is `R3(-z) · R2(θ) · R3(-ζ)`.

use crate::constants::{ASEC2RAD, J2000_YEAR};
use crate::rotation::{rot_y, rot_z};
use nalgebra::Matrix3;

/// Precession angles (ζ, z, θ) in radians from J2000.0 to `t` centuries
pub fn precession_angles(t: f64) -> (f64, f64, f64) {
    let zeta = (2306.2181 + (0.30188 + 0.017998 * t) * t) * t * ASEC2RAD;
    let z = (2306.2181 + (1.09468 + 0.018203 * t) * t) * t * ASEC2RAD;
    let theta = (2004.3109 + (-0.42665 - 0.041833 * t) * t) * t * ASEC2RAD;
    (zeta, z, theta)
}

/// Precession from the J2000.0 mean equator and equinox to those of date
pub fn precession_from_j2000(t: f64) -> Matrix3<f64> {
    let (zeta, z, theta) = precession_angles(t);
    rot_z(-z) * rot_y(theta) * rot_z(-zeta)
}

/// Precession between two Julian epoch years (TDT)
///
/// Maps coordinates referred to the mean equator of `year_from` onto the mean
/// equator of `year_to`. Built through J2000.0, so swapping the epochs gives
/// the transpose and equal epochs give the identity.
pub fn precession_matrix(year_from: f64, year_to: f64) -> Matrix3<f64> {
    if year_from == year_to {
        return Matrix3::identity();
    }
    let to = precession_from_j2000((year_to - J2000_YEAR) / 100.0);
    if year_from == J2000_YEAR {
        return to;
    }
    let from = precession_from_j2000((year_from - J2000_YEAR) / 100.0);
    to * from.transpose()
}
