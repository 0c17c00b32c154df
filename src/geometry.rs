//! Rotation and angle helpers shared by every drawing routine.
//!
//! Quaternions are kept unit-norm by construction ([`UnitQuaternion`]), so the inverse of a
//! rotation is its conjugate and repeated composition cannot drift off the unit sphere.

use crate::projection::Pixel;
use nalgebra::{Unit, UnitQuaternion, Vector3};

/// Degrees to radians.
pub const D2R: f64 = std::f64::consts::PI / 180.0;

/// Radians to degrees.
pub const R2D: f64 = 180.0 / std::f64::consts::PI;

pub type Quaternion = UnitQuaternion<f64>;

/// Unit quaternion rotating by `angle` radians about `axis`.
///
/// `axis` does not need to be normalized but must not be zero.
pub fn about_axis(angle: f64, axis: Vector3<f64>) -> Quaternion {
    UnitQuaternion::from_axis_angle(&Unit::new_normalize(axis), angle)
}

/// Yaw-only quaternion about the up axis (negative down).
///
/// Positive angles turn from north towards east, matching compass headings.
pub fn heading(angle: f64) -> Quaternion {
    about_axis(angle, Vector3::new(0.0, 0.0, -1.0))
}

/// Unit quaternion from intrinsic z-y-x (yaw, then pitch, then roll) Euler angles.
pub fn from_euler(yaw: f64, pitch: f64, roll: f64) -> Quaternion {
    UnitQuaternion::from_euler_angles(roll, pitch, yaw)
}

/// Hamilton product `q1 ⊗ q0`.
///
/// Applying `q1` after the frame of `q0` is `compose(q1, q0)`; the order matters.
pub fn compose(q1: &Quaternion, q0: &Quaternion) -> Quaternion {
    q1 * q0
}

pub fn inverse(q: &Quaternion) -> Quaternion {
    q.inverse()
}

/// Actively rotates `v` by `q`, computing `q v q⁻¹`.
pub fn rotate(q: &Quaternion, v: &Vector3<f64>) -> Vector3<f64> {
    q.transform_vector(v)
}

/// Expresses `v` in the frame that `q` rotates into, computing `q⁻¹ v q`.
pub fn transform(q: &Quaternion, v: &Vector3<f64>) -> Vector3<f64> {
    q.inverse_transform_vector(v)
}

/// Rotates pixel `p` about `center` by `angle` radians in image space.
///
/// The result is truncated towards zero, like every other pixel in the crate.
pub fn rotate_about(p: Pixel, center: Pixel, angle: f64) -> Pixel {
    let (sin, cos) = angle.sin_cos();
    let du = (p.u() - center.u()) as f64;
    let dv = (p.v() - center.v()) as f64;
    Pixel::new(
        (cos * du - sin * dv + center.u() as f64) as i32,
        (sin * du + cos * dv + center.v() as f64) as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use quickcheck_macros::quickcheck;
    use rstest::rstest;

    fn seeded_angle(seed: i16) -> f64 {
        seed as f64 / i16::MAX as f64 * std::f64::consts::PI
    }

    #[quickcheck]
    fn inverse_roundtrip(x: i8, y: i8, z: i8, angle_seed: i16) -> bool {
        let axis = Vector3::new(x as f64, y as f64, z as f64);
        if axis.norm() == 0.0 {
            return true;
        }

        let q = about_axis(seeded_angle(angle_seed), axis);
        let v = Vector3::new(0.3, -1.2, 4.0);
        let result = rotate(&compose(&inverse(&q), &q), &v);

        (result - v).norm() < 1e-9
    }

    #[quickcheck]
    fn compositions_stay_unit(yaw_seed: i16, pitch_seed: i16, roll_seed: i16) -> bool {
        let mut q = Quaternion::identity();
        for _ in 0..100 {
            q = compose(
                &from_euler(
                    seeded_angle(yaw_seed),
                    seeded_angle(pitch_seed),
                    seeded_angle(roll_seed),
                ),
                &q,
            );
        }

        (q.into_inner().norm() - 1.0).abs() < 1e-9
    }

    #[rstest]
    #[case(0.0, Vector3::new(1.0, 0.0, 0.0))]
    #[case(90.0, Vector3::new(0.0, 1.0, 0.0))]
    #[case(180.0, Vector3::new(-1.0, 0.0, 0.0))]
    #[case(270.0, Vector3::new(0.0, -1.0, 0.0))]
    fn heading_turns_north_towards_east(#[case] heading_deg: f64, #[case] expected: Vector3<f64>) {
        let north = Vector3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(
            transform(&heading(heading_deg * D2R), &north),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn transform_undoes_rotate() {
        let q = from_euler(0.4, -0.2, 1.1);
        let v = Vector3::new(2.0, 1.0, -3.0);
        assert_relative_eq!(transform(&q, &rotate(&q, &v)), v, epsilon = 1e-12);
        assert_relative_eq!(transform(&inverse(&q), &v), rotate(&q, &v), epsilon = 1e-12);
    }

    #[test]
    fn euler_pitch_raises_nose() {
        // Positive pitch points body x above the horizon (negative down).
        let nose = rotate(&from_euler(0.0, 30.0 * D2R, 0.0), &Vector3::x());
        assert_relative_eq!(nose, Vector3::new(0.866025403784, 0.0, -0.5), epsilon = 1e-9);
    }

    #[test]
    fn degree_constants_invert() {
        assert_relative_eq!(D2R * R2D, 1.0, epsilon = 1e-12);
        assert_relative_eq!(180.0 * D2R, std::f64::consts::PI);
    }

    #[rstest]
    #[case(Pixel::new(10, 0), Pixel::new(0, 0), 90.0, Pixel::new(0, 10))]
    #[case(Pixel::new(15, 5), Pixel::new(5, 5), 180.0, Pixel::new(-5, 5))]
    #[case(Pixel::new(7, 3), Pixel::new(7, 3), 45.0, Pixel::new(7, 3))]
    fn rotate_pixel_about_anchor(
        #[case] p: Pixel,
        #[case] center: Pixel,
        #[case] angle_deg: f64,
        #[case] expected: Pixel,
    ) {
        assert_eq!(rotate_about(p, center, angle_deg * D2R), expected);
    }
}
