//! Keyframe tracks: ordered (progress, value) pairs sampled at an eased
//! progress with linear or cubic interpolation.
//!
//! Bool and Text keyframes step-hold the left key regardless of the declared
//! interpolation; rotations always NLERP (there is no meaningful cubic in
//! quaternion space here).

use serde::{Deserialize, Serialize};

use arbor_api_core::{PropertyType, PropertyValue};

use crate::interp::{catmull_rom, lerp_value, nlerp_rotation};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Interpolation {
    Linear,
    Cubic,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct KeyFrames {
    frames: Vec<(f32, PropertyValue)>,
}

impl KeyFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a keyframe. Progress is clamped to [0,1]; frames are kept ordered
    /// by progress, insertion order preserved among equal stamps.
    pub fn add(&mut self, progress: f32, value: PropertyValue) {
        let progress = progress.clamp(0.0, 1.0);
        let at = self
            .frames
            .iter()
            .position(|(p, _)| *p > progress)
            .unwrap_or(self.frames.len());
        self.frames.insert(at, (progress, value));
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Declared type: the type of the first keyframe's value.
    pub fn value_type(&self) -> PropertyType {
        self.frames
            .first()
            .map(|(_, v)| v.value_type())
            .unwrap_or(PropertyType::None)
    }

    /// Find the segment containing `t` and its local parameter.
    fn segment(&self, t: f32) -> Option<(usize, usize, f32)> {
        let n = self.frames.len();
        if n == 0 {
            return None;
        }
        if n == 1 || t <= self.frames[0].0 {
            return Some((0, 0, 0.0));
        }
        if t >= self.frames[n - 1].0 {
            return Some((n - 1, n - 1, 0.0));
        }
        for i in 0..(n - 1) {
            let t0 = self.frames[i].0;
            let t1 = self.frames[i + 1].0;
            if t >= t0 && t <= t1 {
                let denom = (t1 - t0).max(f32::EPSILON);
                return Some((i, i + 1, ((t - t0) / denom).clamp(0.0, 1.0)));
            }
        }
        Some((n - 1, n - 1, 0.0))
    }

    /// Sample the track at eased progress `t` in [0,1]. An empty track yields
    /// `PropertyValue::None` (fail-soft; callers validate before binding).
    pub fn sample(&self, t: f32, interpolation: Interpolation) -> PropertyValue {
        let Some((i0, i1, local)) = self.segment(t.clamp(0.0, 1.0)) else {
            return PropertyValue::None;
        };
        if i0 == i1 {
            return self.frames[i0].1.clone();
        }
        let left = &self.frames[i0].1;
        let right = &self.frames[i1].1;

        match interpolation {
            Interpolation::Linear => lerp_value(left, right, local),
            Interpolation::Cubic => self.sample_cubic(i0, i1, local),
        }
    }

    fn sample_cubic(&self, i0: usize, i1: usize, local: f32) -> PropertyValue {
        let left = &self.frames[i0].1;
        let right = &self.frames[i1].1;
        // Clamp neighbors at the track ends.
        let before = &self.frames[i0.saturating_sub(1)].1;
        let after = &self.frames[(i1 + 1).min(self.frames.len() - 1)].1;

        match (before, left, right, after) {
            (PropertyValue::Float(p0), PropertyValue::Float(p1), PropertyValue::Float(p2), PropertyValue::Float(p3)) => {
                PropertyValue::Float(catmull_rom(*p0, *p1, *p2, *p3, local))
            }
            (PropertyValue::Integer(p0), PropertyValue::Integer(p1), PropertyValue::Integer(p2), PropertyValue::Integer(p3)) => {
                PropertyValue::Integer(
                    catmull_rom(*p0 as f32, *p1 as f32, *p2 as f32, *p3 as f32, local).round()
                        as i32,
                )
            }
            (PropertyValue::Vec2(p0), PropertyValue::Vec2(p1), PropertyValue::Vec2(p2), PropertyValue::Vec2(p3)) => {
                PropertyValue::Vec2(cubic_lanes(p0, p1, p2, p3, local))
            }
            (PropertyValue::Vec3(p0), PropertyValue::Vec3(p1), PropertyValue::Vec3(p2), PropertyValue::Vec3(p3)) => {
                PropertyValue::Vec3(cubic_lanes(p0, p1, p2, p3, local))
            }
            (PropertyValue::Vec4(p0), PropertyValue::Vec4(p1), PropertyValue::Vec4(p2), PropertyValue::Vec4(p3)) => {
                PropertyValue::Vec4(cubic_lanes(p0, p1, p2, p3, local))
            }
            (_, PropertyValue::Rotation(a), PropertyValue::Rotation(b), _) => {
                PropertyValue::Rotation(nlerp_rotation(*a, *b, local))
            }
            _ => lerp_value(left, right, local),
        }
    }
}

fn cubic_lanes<const N: usize>(
    p0: &[f32; N],
    p1: &[f32; N],
    p2: &[f32; N],
    p3: &[f32; N],
    t: f32,
) -> [f32; N] {
    let mut out = [0.0; N];
    for i in 0..N {
        out[i] = catmull_rom(p0[i], p1[i], p2[i], p3[i], t);
    }
    out
}
