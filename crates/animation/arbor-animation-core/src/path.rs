//! Spline paths for positional and rotational animation.
//!
//! A path is a sequence of interpolation points joined by cubic-bezier
//! segments. Control points may be supplied explicitly (two per segment) or
//! generated from a curvature factor. Orientation along the path is derived
//! by rotating a caller-supplied forward vector onto the tangent.

use serde::{Deserialize, Serialize};

use arbor_api_core::Quaternion;

type Vec3 = [f32; 3];

#[inline]
fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
fn scale(a: Vec3, s: f32) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
fn length(a: Vec3) -> f32 {
    dot(a, a).sqrt()
}

fn normalized(a: Vec3) -> Vec3 {
    let len = length(a);
    if len > 0.0 {
        scale(a, len.recip())
    } else {
        a
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Vec3>,
    /// Two control points per segment: indices 2i and 2i+1.
    control_points: Vec<Vec3>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, point: Vec3) {
        self.points.push(point);
    }

    pub fn add_control_point(&mut self, point: Vec3) {
        self.control_points.push(point);
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Whether enough control points exist for every segment.
    pub fn is_complete(&self) -> bool {
        self.segment_count() > 0 && self.control_points.len() >= self.segment_count() * 2
    }

    /// Generate control points from neighboring interpolation points.
    /// `curvature` in [0,1] scales how far the control points reach toward
    /// the neighbors; 0 yields straight segments. Replaces any existing
    /// control points.
    pub fn generate_control_points(&mut self, curvature: f32) {
        let curvature = curvature.clamp(0.0, 1.0);
        self.control_points.clear();
        let n = self.points.len();
        if n < 2 {
            return;
        }
        for i in 0..(n - 1) {
            let p1 = self.points[i];
            let p2 = self.points[i + 1];
            let before = self.points[i.saturating_sub(1)];
            let after = self.points[(i + 2).min(n - 1)];

            let segment_len = length(sub(p2, p1));
            let out_dir = normalized(sub(p2, before));
            let in_dir = normalized(sub(p1, after));
            self.control_points
                .push(add(p1, scale(out_dir, segment_len * curvature)));
            self.control_points
                .push(add(p2, scale(in_dir, segment_len * curvature)));
        }
    }

    fn segment_at(&self, t: f32) -> Option<(usize, f32)> {
        let segments = self.segment_count();
        if segments == 0 || !self.is_complete() {
            return None;
        }
        let t = t.clamp(0.0, 1.0);
        let scaled = t * segments as f32;
        let segment = (scaled as usize).min(segments - 1);
        Some((segment, scaled - segment as f32))
    }

    /// Position at normalized progress `t` over the whole path.
    pub fn sample_position(&self, t: f32) -> Option<Vec3> {
        let (segment, local) = self.segment_at(t)?;
        let p0 = self.points[segment];
        let p3 = self.points[segment + 1];
        let c0 = self.control_points[segment * 2];
        let c1 = self.control_points[segment * 2 + 1];

        let u = 1.0 - local;
        let mut out = [0.0; 3];
        for i in 0..3 {
            out[i] = u * u * u * p0[i]
                + 3.0 * u * u * local * c0[i]
                + 3.0 * u * local * local * c1[i]
                + local * local * local * p3[i];
        }
        Some(out)
    }

    /// Unit tangent at normalized progress `t`.
    pub fn sample_tangent(&self, t: f32) -> Option<Vec3> {
        let (segment, local) = self.segment_at(t)?;
        let p0 = self.points[segment];
        let p3 = self.points[segment + 1];
        let c0 = self.control_points[segment * 2];
        let c1 = self.control_points[segment * 2 + 1];

        let u = 1.0 - local;
        let mut out = [0.0; 3];
        for i in 0..3 {
            out[i] = 3.0 * u * u * (c0[i] - p0[i])
                + 6.0 * u * local * (c1[i] - c0[i])
                + 3.0 * local * local * (p3[i] - c1[i]);
        }
        Some(normalized(out))
    }

    /// Rotation carrying `forward` onto the tangent at `t`. A zero forward
    /// vector always yields the identity rotation.
    pub fn sample_orientation(&self, forward: Vec3, t: f32) -> Option<Quaternion> {
        if length(forward) <= 0.0 {
            return Some(Quaternion::IDENTITY);
        }
        let tangent = self.sample_tangent(t)?;
        let from = normalized(forward);
        let cos = dot(from, tangent).clamp(-1.0, 1.0);
        let axis = cross(from, tangent);
        if length(axis) <= 1e-6 {
            // Parallel or anti-parallel; pick any perpendicular axis for the
            // half-turn case.
            if cos > 0.0 {
                return Some(Quaternion::IDENTITY);
            }
            let perp = if from[0].abs() < 0.9 {
                cross(from, [1.0, 0.0, 0.0])
            } else {
                cross(from, [0.0, 1.0, 0.0])
            };
            return Some(Quaternion::from_axis_angle(perp, 180.0));
        }
        Some(Quaternion::from_axis_angle(
            axis,
            cos.acos().to_degrees(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// it should pass through the interpolation points at segment boundaries
    #[test]
    fn position_hits_points() {
        let mut path = Path::new();
        path.add_point([0.0, 0.0, 0.0]);
        path.add_point([10.0, 0.0, 0.0]);
        path.add_point([10.0, 10.0, 0.0]);
        path.generate_control_points(0.25);
        assert!(path.is_complete());

        let start = path.sample_position(0.0).unwrap();
        let mid = path.sample_position(0.5).unwrap();
        let end = path.sample_position(1.0).unwrap();
        assert!(length(sub(start, [0.0, 0.0, 0.0])) < 1e-4);
        assert!(length(sub(mid, [10.0, 0.0, 0.0])) < 1e-4);
        assert!(length(sub(end, [10.0, 10.0, 0.0])) < 1e-4);
    }

    /// it should derive an orientation aligning forward with the tangent
    #[test]
    fn orientation_faces_tangent() {
        let mut path = Path::new();
        path.add_point([0.0, 0.0, 0.0]);
        path.add_point([10.0, 0.0, 0.0]);
        path.generate_control_points(0.0);

        // Forward already along +x: identity.
        let q = path.sample_orientation([1.0, 0.0, 0.0], 0.5).unwrap();
        assert!(q.approx_eq(Quaternion::IDENTITY));

        // Forward along +y must rotate -90 degrees about z to face +x.
        let q = path.sample_orientation([0.0, 1.0, 0.0], 0.5).unwrap();
        let expected = Quaternion::from_axis_angle([0.0, 0.0, 1.0], -90.0);
        assert!(q.approx_eq(expected));
    }

    /// it should report incomplete until control points cover every segment
    #[test]
    fn completeness() {
        let mut path = Path::new();
        path.add_point([0.0, 0.0, 0.0]);
        path.add_point([1.0, 0.0, 0.0]);
        assert!(!path.is_complete());
        path.add_control_point([0.25, 0.0, 0.0]);
        path.add_control_point([0.75, 0.0, 0.0]);
        assert!(path.is_complete());
        assert!(path.sample_position(0.5).is_some());
    }
}
