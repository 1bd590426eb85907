//! Euler angles with an explicit axis order
//!
//! Angles are always stored as rotations about X, Y and Z; the order only
//! says in which sequence they are applied. The wire format carries the X
//! and Y angles and drops Z, so both peers must agree on the order.

use crate::Quat;

/// Gimbal-lock threshold on the pivot matrix element
const GIMBAL_LIMIT: f32 = 0.999_999_9;

/// Axis application order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EulerOrder {
    #[default]
    Xyz,
    Yxz,
    Zxy,
    Zyx,
    Yzx,
    Xzy,
}

impl EulerOrder {
    pub fn all() -> &'static [EulerOrder] {
        &[
            EulerOrder::Xyz,
            EulerOrder::Yxz,
            EulerOrder::Zxy,
            EulerOrder::Zyx,
            EulerOrder::Yzx,
            EulerOrder::Xzy,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            EulerOrder::Xyz => "XYZ",
            EulerOrder::Yxz => "YXZ",
            EulerOrder::Zxy => "ZXY",
            EulerOrder::Zyx => "ZYX",
            EulerOrder::Yzx => "YZX",
            EulerOrder::Xzy => "XZY",
        }
    }
}

/// Euler rotation in radians
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Euler {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub order: EulerOrder,
}

impl Euler {
    pub fn new(x: f32, y: f32, z: f32, order: EulerOrder) -> Self {
        Self { x, y, z, order }
    }

    /// Decompose a quaternion. The quaternion is normalized first.
    pub fn from_quat(q: Quat, order: EulerOrder) -> Self {
        let m = q.normalize().to_rotation_matrix();
        let (m11, m12, m13) = (m[0][0], m[0][1], m[0][2]);
        let (m21, m22, m23) = (m[1][0], m[1][1], m[1][2]);
        let (m31, m32, m33) = (m[2][0], m[2][1], m[2][2]);

        let (x, y, z) = match order {
            EulerOrder::Xyz => {
                let y = m13.clamp(-1.0, 1.0).asin();
                if m13.abs() < GIMBAL_LIMIT {
                    ((-m23).atan2(m33), y, (-m12).atan2(m11))
                } else {
                    (m32.atan2(m22), y, 0.0)
                }
            }
            EulerOrder::Yxz => {
                let x = (-m23.clamp(-1.0, 1.0)).asin();
                if m23.abs() < GIMBAL_LIMIT {
                    (x, m13.atan2(m33), m21.atan2(m22))
                } else {
                    (x, (-m31).atan2(m11), 0.0)
                }
            }
            EulerOrder::Zxy => {
                let x = m32.clamp(-1.0, 1.0).asin();
                if m32.abs() < GIMBAL_LIMIT {
                    (x, (-m31).atan2(m33), (-m12).atan2(m22))
                } else {
                    (x, 0.0, m21.atan2(m11))
                }
            }
            EulerOrder::Zyx => {
                let y = (-m31.clamp(-1.0, 1.0)).asin();
                if m31.abs() < GIMBAL_LIMIT {
                    (m32.atan2(m33), y, m21.atan2(m11))
                } else {
                    (0.0, y, (-m12).atan2(m22))
                }
            }
            EulerOrder::Yzx => {
                let z = m21.clamp(-1.0, 1.0).asin();
                if m21.abs() < GIMBAL_LIMIT {
                    ((-m23).atan2(m22), (-m31).atan2(m11), z)
                } else {
                    (0.0, m13.atan2(m33), z)
                }
            }
            EulerOrder::Xzy => {
                let z = (-m12.clamp(-1.0, 1.0)).asin();
                if m12.abs() < GIMBAL_LIMIT {
                    (m32.atan2(m22), m13.atan2(m11), z)
                } else {
                    ((-m23).atan2(m33), 0.0, z)
                }
            }
        };

        Euler { x, y, z, order }
    }

    /// Compose back into a unit quaternion
    pub fn to_quat(self) -> Quat {
        let (s1, c1) = (self.x * 0.5).sin_cos();
        let (s2, c2) = (self.y * 0.5).sin_cos();
        let (s3, c3) = (self.z * 0.5).sin_cos();

        let (a, b, c, d) = (s1 * c2 * c3, c1 * s2 * s3, c1 * s2 * c3, s1 * c2 * s3);
        let (e, f, g, h) = (c1 * c2 * s3, s1 * s2 * c3, c1 * c2 * c3, s1 * s2 * s3);

        match self.order {
            EulerOrder::Xyz => Quat::new(a + b, c - d, e + f, g - h),
            EulerOrder::Yxz => Quat::new(a + b, c - d, e - f, g + h),
            EulerOrder::Zxy => Quat::new(a - b, c + d, e + f, g - h),
            EulerOrder::Zyx => Quat::new(a - b, c + d, e - f, g + h),
            EulerOrder::Yzx => Quat::new(a + b, c + d, e - f, g - h),
            EulerOrder::Xzy => Quat::new(a - b, c - d, e + f, g + h),
        }
    }

    /// The two angles that go on the wire
    #[inline]
    pub fn truncated(self) -> [f32; 2] {
        [self.x, self.y]
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;
    use proptest::prelude::*;

    #[test]
    fn test_identity_is_zero() {
        for &order in EulerOrder::all() {
            let e = Euler::from_quat(Quat::IDENTITY, order);
            assert!(e.x.abs() < 1e-6 && e.y.abs() < 1e-6 && e.z.abs() < 1e-6);
        }
    }

    #[test]
    fn test_single_axis_xyz() {
        let q = Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), 0.5);
        let e = Euler::from_quat(q, EulerOrder::Xyz);
        assert!((e.x - 0.5).abs() < 1e-5);
        assert!(e.y.abs() < 1e-5);
        assert!(e.z.abs() < 1e-5);

        let q = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), -0.75);
        let e = Euler::from_quat(q, EulerOrder::Xyz);
        assert!((e.y + 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_unnormalized_input() {
        let q = Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), 0.3);
        let scaled = Quat::new(q.x * 3.0, q.y * 3.0, q.z * 3.0, q.w * 3.0);

        let a = Euler::from_quat(q, EulerOrder::Xyz);
        let b = Euler::from_quat(scaled, EulerOrder::Xyz);
        assert!((a.z - b.z).abs() < 1e-5);
    }

    #[test]
    fn test_gimbal_lock_xyz() {
        let q = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), std::f32::consts::FRAC_PI_2);
        let e = Euler::from_quat(q, EulerOrder::Xyz);
        assert!((e.y - std::f32::consts::FRAC_PI_2).abs() < 1e-3);
        assert_eq!(e.z, 0.0);
    }

    proptest! {
        #[test]
        fn euler_quat_roundtrip(
            x in -1.5f32..1.5,
            y in -1.4f32..1.4,
            z in -1.5f32..1.5,
            idx in 0usize..6,
        ) {
            let order = EulerOrder::all()[idx];
            let q = Euler::new(x, y, z, order).to_quat();
            let back = Euler::from_quat(q, order).to_quat();
            prop_assert!(q.angle_to(back) < 1e-2);
        }
    }
}
