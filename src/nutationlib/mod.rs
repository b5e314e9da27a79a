//! IAU 1980 nutation
//!
//! Model nutation in longitude and obliquity from the 106-term IAU 1980
//! series, the IAU 1980 mean obliquity, and the nutation matrix that carries
//! the mean equator and equinox of date onto the true ones.
//!
//! All functions take `t`, Julian centuries of TDT since J2000.0.

use crate::constants::{ASEC2RAD, TAU};
use crate::rotation::{rot_x, rot_z};
use nalgebra::Matrix3;
use std::f64::consts::PI;

/// Series coefficients are in units of 0.1 milliarcsecond
const UNIT_TO_RAD: f64 = ASEC2RAD * 1e-4;

/// Multipliers of (l, l', F, D, Ω), then the sine coefficient of Δψ and its
/// rate per century, then the cosine coefficient of Δε and its rate
#[rustfmt::skip]
const NUTATION_TERMS: [([i8; 5], f64, f64, f64, f64); 106] = [
    ([0, 0, 0, 0, 1], -171996.0, -174.2, 92025.0, 8.9),
    ([0, 0, 0, 0, 2], 2062.0, 0.2, -895.0, 0.5),
    ([-2, 0, 2, 0, 1], 46.0, 0.0, -24.0, 0.0),
    ([2, 0, -2, 0, 0], 11.0, 0.0, 0.0, 0.0),
    ([-2, 0, 2, 0, 2], -3.0, 0.0, 1.0, 0.0),
    ([1, -1, 0, -1, 0], -3.0, 0.0, 0.0, 0.0),
    ([0, -2, 2, -2, 1], -2.0, 0.0, 1.0, 0.0),
    ([2, 0, -2, 0, 1], 1.0, 0.0, 0.0, 0.0),
    ([0, 0, 2, -2, 2], -13187.0, -1.6, 5736.0, -3.1),
    ([0, 1, 0, 0, 0], 1426.0, -3.4, 54.0, -0.1),
    ([0, 1, 2, -2, 2], -517.0, 1.2, 224.0, -0.6),
    ([0, -1, 2, -2, 2], 217.0, -0.5, -95.0, 0.3),
    ([0, 0, 2, -2, 1], 129.0, 0.1, -70.0, 0.0),
    ([2, 0, 0, -2, 0], 48.0, 0.0, 1.0, 0.0),
    ([0, 0, 2, -2, 0], -22.0, 0.0, 0.0, 0.0),
    ([0, 2, 0, 0, 0], 17.0, -0.1, 0.0, 0.0),
    ([0, 1, 0, 0, 1], -15.0, 0.0, 9.0, 0.0),
    ([0, 2, 2, -2, 2], -16.0, 0.1, 7.0, 0.0),
    ([0, -1, 0, 0, 1], -12.0, 0.0, 6.0, 0.0),
    ([-2, 0, 0, 2, 1], -6.0, 0.0, 3.0, 0.0),
    ([0, -1, 2, -2, 1], -5.0, 0.0, 3.0, 0.0),
    ([2, 0, 0, -2, 1], 4.0, 0.0, -2.0, 0.0),
    ([0, 1, 2, -2, 1], 4.0, 0.0, -2.0, 0.0),
    ([1, 0, 0, -1, 0], -4.0, 0.0, 0.0, 0.0),
    ([2, 1, 0, -2, 0], 1.0, 0.0, 0.0, 0.0),
    ([0, 0, -2, 2, 1], 1.0, 0.0, 0.0, 0.0),
    ([0, 1, -2, 2, 0], -1.0, 0.0, 0.0, 0.0),
    ([0, 1, 0, 0, 2], 1.0, 0.0, 0.0, 0.0),
    ([-1, 0, 0, 1, 1], 1.0, 0.0, 0.0, 0.0),
    ([0, 1, 2, -2, 0], -1.0, 0.0, 0.0, 0.0),
    ([0, 0, 2, 0, 2], -2274.0, -0.2, 977.0, -0.5),
    ([1, 0, 0, 0, 0], 712.0, 0.1, -7.0, 0.0),
    ([0, 0, 2, 0, 1], -386.0, -0.4, 200.0, 0.0),
    ([1, 0, 2, 0, 2], -301.0, 0.0, 129.0, -0.1),
    ([1, 0, 0, -2, 0], -158.0, 0.0, -1.0, 0.0),
    ([-1, 0, 2, 0, 2], 123.0, 0.0, -53.0, 0.0),
    ([0, 0, 0, 2, 0], 63.0, 0.0, -2.0, 0.0),
    ([1, 0, 0, 0, 1], 63.0, 0.1, -33.0, 0.0),
    ([-1, 0, 0, 0, 1], -58.0, -0.1, 32.0, 0.0),
    ([-1, 0, 2, 2, 2], -59.0, 0.0, 26.0, 0.0),
    ([1, 0, 2, 0, 1], -51.0, 0.0, 27.0, 0.0),
    ([0, 0, 2, 2, 2], -38.0, 0.0, 16.0, 0.0),
    ([2, 0, 0, 0, 0], 29.0, 0.0, -1.0, 0.0),
    ([1, 0, 2, -2, 2], 29.0, 0.0, -12.0, 0.0),
    ([2, 0, 2, 0, 2], -31.0, 0.0, 13.0, 0.0),
    ([0, 0, 2, 0, 0], 26.0, 0.0, -1.0, 0.0),
    ([-1, 0, 2, 0, 1], 21.0, 0.0, -10.0, 0.0),
    ([-1, 0, 0, 2, 1], 16.0, 0.0, -8.0, 0.0),
    ([1, 0, 0, -2, 1], -13.0, 0.0, 7.0, 0.0),
    ([-1, 0, 2, 2, 1], -10.0, 0.0, 5.0, 0.0),
    ([1, 1, 0, -2, 0], -7.0, 0.0, 0.0, 0.0),
    ([0, 1, 2, 0, 2], 7.0, 0.0, -3.0, 0.0),
    ([0, -1, 2, 0, 2], -7.0, 0.0, 3.0, 0.0),
    ([1, 0, 2, 2, 2], -8.0, 0.0, 3.0, 0.0),
    ([1, 0, 0, 2, 0], 6.0, 0.0, 0.0, 0.0),
    ([2, 0, 2, -2, 2], 6.0, 0.0, -3.0, 0.0),
    ([0, 0, 0, 2, 1], -6.0, 0.0, 3.0, 0.0),
    ([0, 0, 2, 2, 1], -7.0, 0.0, 3.0, 0.0),
    ([1, 0, 2, -2, 1], 6.0, 0.0, -3.0, 0.0),
    ([0, 0, 0, -2, 1], -5.0, 0.0, 3.0, 0.0),
    ([1, -1, 0, 0, 0], 5.0, 0.0, 0.0, 0.0),
    ([2, 0, 2, 0, 1], -5.0, 0.0, 3.0, 0.0),
    ([0, 1, 0, -2, 0], -4.0, 0.0, 0.0, 0.0),
    ([1, 0, -2, 0, 0], 4.0, 0.0, 0.0, 0.0),
    ([0, 0, 0, 1, 0], -4.0, 0.0, 0.0, 0.0),
    ([1, 1, 0, 0, 0], -3.0, 0.0, 0.0, 0.0),
    ([1, 0, 2, 0, 0], 3.0, 0.0, 0.0, 0.0),
    ([1, -1, 2, 0, 2], -3.0, 0.0, 1.0, 0.0),
    ([-1, -1, 2, 2, 2], -3.0, 0.0, 1.0, 0.0),
    ([-2, 0, 0, 0, 1], -2.0, 0.0, 1.0, 0.0),
    ([3, 0, 2, 0, 2], -3.0, 0.0, 1.0, 0.0),
    ([0, -1, 2, 2, 2], -3.0, 0.0, 1.0, 0.0),
    ([1, 1, 2, 0, 2], 2.0, 0.0, -1.0, 0.0),
    ([-1, 0, 2, -2, 1], -2.0, 0.0, 1.0, 0.0),
    ([2, 0, 0, 0, 1], 2.0, 0.0, -1.0, 0.0),
    ([1, 0, 0, 0, 2], -2.0, 0.0, 1.0, 0.0),
    ([3, 0, 0, 0, 0], 2.0, 0.0, 0.0, 0.0),
    ([0, 0, 2, 1, 2], 2.0, 0.0, -1.0, 0.0),
    ([-1, 0, 0, 0, 2], 1.0, 0.0, -1.0, 0.0),
    ([1, 0, 0, -4, 0], -1.0, 0.0, 0.0, 0.0),
    ([-2, 0, 2, 2, 2], 1.0, 0.0, -1.0, 0.0),
    ([-1, 0, 2, 4, 2], -2.0, 0.0, 1.0, 0.0),
    ([2, 0, 0, -4, 0], -1.0, 0.0, 0.0, 0.0),
    ([1, 1, 2, -2, 2], 1.0, 0.0, -1.0, 0.0),
    ([1, 0, 2, 2, 1], -1.0, 0.0, 1.0, 0.0),
    ([-2, 0, 2, 4, 2], -1.0, 0.0, 1.0, 0.0),
    ([-1, 0, 4, 0, 2], 1.0, 0.0, 0.0, 0.0),
    ([1, -1, 0, -2, 0], 1.0, 0.0, 0.0, 0.0),
    ([2, 0, 2, -2, 1], 1.0, 0.0, -1.0, 0.0),
    ([2, 0, 2, 2, 2], -1.0, 0.0, 0.0, 0.0),
    ([1, 0, 0, 2, 1], -1.0, 0.0, 0.0, 0.0),
    ([0, 0, 4, -2, 2], 1.0, 0.0, 0.0, 0.0),
    ([3, 0, 2, -2, 2], 1.0, 0.0, 0.0, 0.0),
    ([1, 0, 2, -2, 0], -1.0, 0.0, 0.0, 0.0),
    ([0, 1, 2, 0, 1], 1.0, 0.0, 0.0, 0.0),
    ([-1, -1, 0, 2, 1], 1.0, 0.0, 0.0, 0.0),
    ([0, 0, -2, 0, 1], -1.0, 0.0, 0.0, 0.0),
    ([0, 0, 2, -1, 2], -1.0, 0.0, 0.0, 0.0),
    ([0, 1, 0, 2, 0], -1.0, 0.0, 0.0, 0.0),
    ([1, 0, -2, -2, 0], -1.0, 0.0, 0.0, 0.0),
    ([0, -1, 2, 0, 1], -1.0, 0.0, 0.0, 0.0),
    ([1, 1, 0, -2, 1], -1.0, 0.0, 0.0, 0.0),
    ([1, 0, -2, 2, 0], -1.0, 0.0, 0.0, 0.0),
    ([2, 0, 0, 2, 0], 1.0, 0.0, 0.0, 0.0),
    ([0, 0, 2, 4, 2], -1.0, 0.0, 0.0, 0.0),
    ([0, 1, 0, 1, 0], 1.0, 0.0, 0.0, 0.0),
];

/// Normalize an angle into the range ±π
fn normalize_pm(angle: f64) -> f64 {
    let mut w = angle % TAU;
    if w.abs() >= PI {
        w -= TAU.copysign(angle);
    }
    w
}

/// Delaunay arguments (l, l', F, D, Ω) in radians
///
/// Each is a cubic in arcseconds plus a whole number of revolutions per
/// century, which is added separately to keep precision.
pub fn fundamental_arguments(t: f64) -> [f64; 5] {
    let arg = |poly: f64, revolutions: f64| {
        normalize_pm(poly * ASEC2RAD + (revolutions * t % 1.0) * TAU)
    };
    [
        // Mean anomaly of the Moon
        arg(485866.733 + (715922.633 + (31.310 + 0.064 * t) * t) * t, 1325.0),
        // Mean anomaly of the Sun
        arg(1287099.804 + (1292581.224 + (-0.577 - 0.012 * t) * t) * t, 99.0),
        // Mean argument of latitude of the Moon
        arg(335778.877 + (295263.137 + (-13.257 + 0.011 * t) * t) * t, 1342.0),
        // Mean elongation of the Moon from the Sun
        arg(1072261.307 + (1105601.328 + (-6.891 + 0.019 * t) * t) * t, 1236.0),
        // Longitude of the ascending node of the Moon
        arg(450160.280 + (-482890.539 + (7.455 + 0.008 * t) * t) * t, -5.0),
    ]
}

/// Model nutation (Δψ, Δε) in radians
pub fn nutation_angles(t: f64) -> (f64, f64) {
    let args = fundamental_arguments(t);
    let mut dpsi = 0.0;
    let mut deps = 0.0;

    // Smallest terms first
    for (multipliers, sp, spt, ce, cet) in NUTATION_TERMS.iter().rev() {
        let arg: f64 = multipliers
            .iter()
            .zip(args.iter())
            .map(|(&m, &a)| m as f64 * a)
            .sum();
        let (s, c) = arg.sin_cos();
        dpsi += (sp + spt * t) * s;
        deps += (ce + cet * t) * c;
    }

    (dpsi * UNIT_TO_RAD, deps * UNIT_TO_RAD)
}

/// Mean obliquity of the ecliptic (IAU 1980) in radians
pub fn mean_obliquity(t: f64) -> f64 {
    (84381.448 + (-46.8150 + (-0.00059 + 0.001813 * t) * t) * t) * ASEC2RAD
}

/// Nutation matrix for a mean obliquity and total nutation angles
///
/// `R1(-(ε + Δε)) · R3(-Δψ) · R1(ε)`. Callers holding observed corrections
/// add them to `dpsi` and `deps` before calling.
pub fn nutation_matrix_from_angles(mean_obliquity: f64, dpsi: f64, deps: f64) -> Matrix3<f64> {
    rot_x(-(mean_obliquity + deps)) * rot_z(-dpsi) * rot_x(mean_obliquity)
}

/// Model nutation matrix, mean of date to true of date
pub fn nutation_matrix(t: f64) -> Matrix3<f64> {
    let (dpsi, deps) = nutation_angles(t);
    nutation_matrix_from_angles(mean_obliquity(t), dpsi, deps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::orthogonality_error;
    use approx::assert_relative_eq;

    fn centuries(mjd: f64) -> f64 {
        (mjd + 2400000.5 - 2451545.0) / 36525.0
    }

    #[test]
    fn test_nutation_angles_sofa_case() {
        let (dpsi, deps) = nutation_angles(centuries(53736.0));
        assert_relative_eq!(dpsi, -0.9643658353226563966e-5, epsilon = 1e-13);
        assert_relative_eq!(deps, 0.4060051006879713322e-4, epsilon = 1e-13);
    }

    #[test]
    fn test_nutation_angles_2016() {
        let t = (2457601.75 + 68.184 / 86400.0 - 2451545.0) / 36525.0;
        let (dpsi, deps) = nutation_angles(t);
        assert_relative_eq!(dpsi / ASEC2RAD, -3.39384, epsilon = 1e-5);
        assert_relative_eq!(deps / ASEC2RAD, -9.11279, epsilon = 1e-5);
    }

    #[test]
    fn test_mean_obliquity() {
        assert_relative_eq!(mean_obliquity(centuries(54388.0)), 0.4090751347643816218, epsilon = 1e-14);
        assert_relative_eq!(mean_obliquity(0.0), 84381.448 * ASEC2RAD, epsilon = 1e-15);
    }

    #[test]
    fn test_fundamental_arguments_are_normalized() {
        for t in [-2.0, -0.3, 0.0, 0.17, 1.5] {
            for a in fundamental_arguments(t) {
                assert!(a.abs() <= PI, "argument {} out of range at t = {}", a, t);
            }
        }
    }

    #[test]
    fn test_nutation_matrix_is_small_rotation() {
        let m = nutation_matrix(0.1658);
        assert!(orthogonality_error(&m) < 1e-12);
        // Nutation never moves the pole by more than ~20 arcseconds
        assert!((m - Matrix3::identity()).amax() < 1e-4);
    }

    #[test]
    fn test_zero_angles_give_identity() {
        let m = nutation_matrix_from_angles(0.409, 0.0, 0.0);
        assert_relative_eq!(m, Matrix3::identity(), epsilon = 1e-15);
    }
}
