//! Elementary frame rotations
//!
//! All matrices act on column vectors, `v_new = M * v_old`, and rotate the
//! *frame* (not the vector) by a positive angle about the given axis.

use nalgebra::Matrix3;

/// Rotation of the frame about the x axis
pub fn rot_x(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(
        1.0, 0.0, 0.0, //
        0.0, c, s, //
        0.0, -s, c,
    )
}

/// Rotation of the frame about the y axis
pub fn rot_y(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(
        c, 0.0, -s, //
        0.0, 1.0, 0.0, //
        s, 0.0, c,
    )
}

/// Rotation of the frame about the z axis
pub fn rot_z(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(
        c, s, 0.0, //
        -s, c, 0.0, //
        0.0, 0.0, 1.0,
    )
}

/// The nine elements in row-major order
pub fn to_row_major(m: &Matrix3<f64>) -> [f64; 9] {
    [
        m[(0, 0)],
        m[(0, 1)],
        m[(0, 2)],
        m[(1, 0)],
        m[(1, 1)],
        m[(1, 2)],
        m[(2, 0)],
        m[(2, 1)],
        m[(2, 2)],
    ]
}

/// Largest deviation of `m` from a proper rotation
///
/// Checks `m * mᵀ = I` element-wise and `det(m) = +1`.
pub fn orthogonality_error(m: &Matrix3<f64>) -> f64 {
    let gram = m * m.transpose() - Matrix3::identity();
    gram.amax().max((m.determinant() - 1.0).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_frame_rotation_sense() {
        // Rotating the frame +90° about z moves the old x axis to -y
        let v = rot_z(FRAC_PI_2) * Vector3::x();
        assert_relative_eq!(v, -Vector3::y(), epsilon = 1e-15);

        let v = rot_x(FRAC_PI_2) * Vector3::y();
        assert_relative_eq!(v, -Vector3::z(), epsilon = 1e-15);

        let v = rot_y(FRAC_PI_2) * Vector3::z();
        assert_relative_eq!(v, -Vector3::x(), epsilon = 1e-15);
    }

    #[test]
    fn test_inverse_is_negative_angle() {
        for rot in [rot_x, rot_y, rot_z] {
            let m = rot(0.3) * rot(-0.3);
            assert_relative_eq!(m, Matrix3::identity(), epsilon = 1e-15);
            assert!(orthogonality_error(&rot(1.234)) < 1e-15);
        }
    }

    #[test]
    fn test_row_major_order() {
        let m = Matrix3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        assert_eq!(to_row_major(&m), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_orthogonality_error_detects_scaling() {
        assert!(orthogonality_error(&(rot_z(0.5) * 1.001)) > 1e-3);
    }
}
