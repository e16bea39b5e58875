//! Rotation values: quaternion and angle-axis are two representations of one
//! semantic type. Angle-axis converts to a quaternion for storage and
//! interpolation; NLERP uses shortest-arc correction.

use serde::{Deserialize, Serialize};

const ROTATION_EPSILON: f32 = 1e-5;

/// Unit quaternion (x, y, z, w).
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Quaternion(pub [f32; 4]);

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion([0.0, 0.0, 0.0, 1.0]);

    /// Build from a rotation axis and an angle in degrees. A zero axis yields
    /// the identity rotation.
    pub fn from_axis_angle(axis: [f32; 3], angle_degrees: f32) -> Self {
        let len2 = axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2];
        if len2 <= 0.0 {
            return Quaternion::IDENTITY;
        }
        let inv_len = len2.sqrt().recip();
        let half = angle_degrees.to_radians() * 0.5;
        let s = half.sin();
        Quaternion([
            axis[0] * inv_len * s,
            axis[1] * inv_len * s,
            axis[2] * inv_len * s,
            half.cos(),
        ])
    }

    #[inline]
    pub fn dot(self, other: Quaternion) -> f32 {
        let a = self.0;
        let b = other.0;
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
    }

    /// Normalized copy; a zero quaternion is returned unchanged.
    pub fn normalized(self) -> Quaternion {
        let mut q = self.0;
        let len2 = q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3];
        if len2 > 0.0 {
            let inv = len2.sqrt().recip();
            for c in q.iter_mut() {
                *c *= inv;
            }
        }
        Quaternion(q)
    }

    /// Hamilton product `self * other` (apply `other`, then `self`).
    pub fn multiply(self, other: Quaternion) -> Quaternion {
        let [ax, ay, az, aw] = self.0;
        let [bx, by, bz, bw] = other.0;
        Quaternion([
            aw * bx + ax * bw + ay * bz - az * by,
            aw * by - ax * bz + ay * bw + az * bx,
            aw * bz + ax * by - ay * bx + az * bw,
            aw * bw - ax * bx - ay * by - az * bz,
        ])
    }

    /// NLERP with shortest-arc correction: if dot < 0, negate the second
    /// quaternion so interpolation takes the shorter path. The result is
    /// normalized.
    pub fn nlerp(self, mut to: Quaternion, t: f32) -> Quaternion {
        if self.dot(to) < 0.0 {
            for c in to.0.iter_mut() {
                *c = -*c;
            }
        }
        let a = self.0;
        let b = to.0;
        Quaternion([
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
            a[3] + (b[3] - a[3]) * t,
        ])
        .normalized()
    }

    pub fn approx_eq(self, other: Quaternion) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= ROTATION_EPSILON)
    }
}

/// Axis + angle-in-degrees representation of a rotation.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct AngleAxis {
    pub axis: [f32; 3],
    pub angle_degrees: f32,
}

impl AngleAxis {
    pub fn new(axis: [f32; 3], angle_degrees: f32) -> Self {
        Self {
            axis,
            angle_degrees,
        }
    }

    pub fn to_quaternion(self) -> Quaternion {
        Quaternion::from_axis_angle(self.axis, self.angle_degrees)
    }
}

impl From<AngleAxis> for Quaternion {
    fn from(aa: AngleAxis) -> Self {
        aa.to_quaternion()
    }
}

/// A rotation value in either representation. Both interoperate through
/// `as_quaternion`; interpolation always happens in quaternion space.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub enum Rotation {
    Quaternion(Quaternion),
    AngleAxis(AngleAxis),
}

impl Rotation {
    /// Canonical quaternion form of this rotation.
    pub fn as_quaternion(self) -> Quaternion {
        match self {
            Rotation::Quaternion(q) => q,
            Rotation::AngleAxis(aa) => aa.to_quaternion(),
        }
    }
}

impl From<Quaternion> for Rotation {
    fn from(q: Quaternion) -> Self {
        Rotation::Quaternion(q)
    }
}

impl From<AngleAxis> for Rotation {
    fn from(aa: AngleAxis) -> Self {
        Rotation::AngleAxis(aa)
    }
}

impl PartialEq for Rotation {
    fn eq(&self, other: &Self) -> bool {
        self.as_quaternion().approx_eq(other.as_quaternion())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// it should treat an angle-axis and its quaternion form as equal rotations
    #[test]
    fn representations_interoperate() {
        let aa = AngleAxis::new([0.0, 1.0, 0.0], 90.0);
        let q = Quaternion::from_axis_angle([0.0, 1.0, 0.0], 90.0);
        assert_eq!(Rotation::AngleAxis(aa), Rotation::Quaternion(q));
    }

    /// it should keep unit norm at nlerp midpoints across a 180 degree arc
    #[test]
    fn nlerp_midpoint_normalized() {
        let a = Quaternion::IDENTITY;
        let b = Quaternion([0.0, 1.0, 0.0, 0.0]);
        let mid = a.nlerp(b, 0.5);
        let n = mid.dot(mid).sqrt();
        assert!((n - 1.0).abs() < 1e-4);
    }

    /// it should compose rotations so that two 45 degree turns equal one 90
    #[test]
    fn multiply_composes() {
        let half = Quaternion::from_axis_angle([0.0, 0.0, 1.0], 45.0);
        let full = Quaternion::from_axis_angle([0.0, 0.0, 1.0], 90.0);
        assert!(half.multiply(half).approx_eq(full));
    }
}
