//! Interpolation helpers:
//! - lerp_value (component-wise + rotation NLERP; bool/text step to the left)
//! - cubic-bezier easing with x-inversion by bisection
//! - Catmull-Rom tangents for cubic keyframe interpolation

use arbor_api_core::{PropertyValue, Rotation};

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn lerp_array<const N: usize>(a: [f32; N], b: [f32; N], t: f32) -> [f32; N] {
    let mut out = a;
    for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *o = lerp_f32(*x, *y, t);
    }
    out
}

/// Linear interpolation across value kinds. Bool and Text step-hold the left
/// value; mismatched kinds fall back to the left value (fail-soft).
pub fn lerp_value(a: &PropertyValue, b: &PropertyValue, t: f32) -> PropertyValue {
    use PropertyValue::*;
    match (a, b) {
        (Float(x), Float(y)) => Float(lerp_f32(*x, *y, t)),
        (Integer(x), Integer(y)) => Integer((lerp_f32(*x as f32, *y as f32, t)).round() as i32),
        (Vec2(x), Vec2(y)) => Vec2(lerp_array(*x, *y, t)),
        (Vec3(x), Vec3(y)) => Vec3(lerp_array(*x, *y, t)),
        (Vec4(x), Vec4(y)) => Vec4(lerp_array(*x, *y, t)),
        (Rotation(x), Rotation(y)) => Rotation(crate::interp::nlerp_rotation(*x, *y, t)),
        _ => a.clone(),
    }
}

#[inline]
pub fn nlerp_rotation(a: Rotation, b: Rotation, t: f32) -> Rotation {
    Rotation::Quaternion(a.as_quaternion().nlerp(b.as_quaternion(), t))
}

/// Cubic Bezier basis function.
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1], compute the
/// eased y by inverting the x bezier via binary search.
pub fn bezier_ease(t: f32, ctrl: [f32; 4]) -> f32 {
    let [x1, y1, x2, y2] = ctrl;
    let t = t.clamp(0.0, 1.0);
    // Fast path: Bezier(0,0,1,1) is exactly linear.
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

/// Catmull-Rom interpolation of one scalar lane with neighbor samples p0..p3;
/// the curve passes through p1 at t=0 and p2 at t=1.
#[inline]
pub fn catmull_rom(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}
