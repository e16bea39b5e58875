//! PropertyValue: the closed union every property read and write travels
//! through.
//!
//! - `value_type()` always reflects the held variant.
//! - Typed getters return `Option`; a getter on the wrong variant is a miss,
//!   never a panic.
//! - `take()` moves the value out and leaves `None` behind; this is an
//!   explicit, tested contract.
//! - Equality uses an epsilon for float-bearing variants. `Array` and `Map`
//!   values are **always unequal**: deep structural equality is a known
//!   semantic gap carried over deliberately, not a bug.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::map::PropertyMap;
use crate::rotation::Rotation;

const VALUE_EPSILON: f32 = 1e-5;

#[inline]
fn feq(a: f32, b: f32) -> bool {
    (a - b).abs() <= VALUE_EPSILON
}

#[inline]
fn slice_eq(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| feq(*x, *y))
}

/// Axis-aligned rectangle (x, y, width, height).
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl PartialEq for Rect {
    fn eq(&self, other: &Self) -> bool {
        feq(self.x, other.x)
            && feq(self.y, other.y)
            && feq(self.width, other.width)
            && feq(self.height, other.height)
    }
}

/// Four small-integer edge distances (start/end/top/bottom).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Extents {
    pub start: u16,
    pub end: u16,
    pub top: u16,
    pub bottom: u16,
}

impl Extents {
    pub fn new(start: u16, end: u16, top: u16, bottom: u16) -> Self {
        Self {
            start,
            end,
            top,
            bottom,
        }
    }
}

/// Declared type of a property value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    None,
    Bool,
    Integer,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat3,
    Mat4,
    Rotation,
    Rect,
    Text,
    Array,
    Map,
    Extents,
}

impl PropertyType {
    /// Whether a scene-graph mirror can be created for values of this type.
    pub fn is_animatable(self) -> bool {
        matches!(
            self,
            PropertyType::Bool
                | PropertyType::Integer
                | PropertyType::Float
                | PropertyType::Vec2
                | PropertyType::Vec3
                | PropertyType::Vec4
                | PropertyType::Mat3
                | PropertyType::Mat4
                | PropertyType::Rotation
        )
    }

    /// Number of scalar lanes addressable by a component index, 0 when the
    /// type has none.
    pub fn component_count(self) -> u8 {
        match self {
            PropertyType::Vec2 => 2,
            PropertyType::Vec3 => 3,
            PropertyType::Vec4 => 4,
            _ => 0,
        }
    }
}

/// Errors surfaced when a value is used against the wrong declared type.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ValueError {
    #[error("expected a {expected:?} value, got {actual:?}")]
    TypeMismatch {
        expected: PropertyType,
        actual: PropertyType,
    },
    #[error("{0:?} values cannot be animated")]
    NotAnimatable(PropertyType),
    #[error("cannot convert a {from:?} value to {to:?}")]
    BadConversion { from: PropertyType, to: PropertyType },
}

/// Runtime property value. See the module docs for the equality and move
/// contracts.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum PropertyValue {
    #[default]
    None,
    Bool(bool),
    Integer(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Row-major 3x3 matrix.
    Mat3([f32; 9]),
    /// Row-major 4x4 matrix.
    Mat4([f32; 16]),
    Rotation(Rotation),
    Rect(Rect),
    Text(String),
    Array(Vec<PropertyValue>),
    Map(PropertyMap),
    Extents(Extents),
}

impl PropertyValue {
    /// The declared type of the currently held variant.
    pub fn value_type(&self) -> PropertyType {
        match self {
            PropertyValue::None => PropertyType::None,
            PropertyValue::Bool(_) => PropertyType::Bool,
            PropertyValue::Integer(_) => PropertyType::Integer,
            PropertyValue::Float(_) => PropertyType::Float,
            PropertyValue::Vec2(_) => PropertyType::Vec2,
            PropertyValue::Vec3(_) => PropertyType::Vec3,
            PropertyValue::Vec4(_) => PropertyType::Vec4,
            PropertyValue::Mat3(_) => PropertyType::Mat3,
            PropertyValue::Mat4(_) => PropertyType::Mat4,
            PropertyValue::Rotation(_) => PropertyType::Rotation,
            PropertyValue::Rect(_) => PropertyType::Rect,
            PropertyValue::Text(_) => PropertyType::Text,
            PropertyValue::Array(_) => PropertyType::Array,
            PropertyValue::Map(_) => PropertyType::Map,
            PropertyValue::Extents(_) => PropertyType::Extents,
        }
    }

    /// Move the value out, leaving `None` behind.
    pub fn take(&mut self) -> PropertyValue {
        std::mem::take(self)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<[f32; 2]> {
        match self {
            PropertyValue::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        match self {
            PropertyValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec4(&self) -> Option<[f32; 4]> {
        match self {
            PropertyValue::Vec4(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_mat3(&self) -> Option<[f32; 9]> {
        match self {
            PropertyValue::Mat3(m) => Some(*m),
            _ => None,
        }
    }

    pub fn as_mat4(&self) -> Option<[f32; 16]> {
        match self {
            PropertyValue::Mat4(m) => Some(*m),
            _ => None,
        }
    }

    /// Accepts either rotation representation.
    pub fn as_rotation(&self) -> Option<Rotation> {
        match self {
            PropertyValue::Rotation(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<Rect> {
        match self {
            PropertyValue::Rect(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::Array(a) => Some(a.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&PropertyMap> {
        match self {
            PropertyValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_extents(&self) -> Option<Extents> {
        match self {
            PropertyValue::Extents(e) => Some(*e),
            _ => None,
        }
    }

    /// Read one scalar lane of a composite value. `None` for out-of-range
    /// lanes or non-composite types.
    pub fn component(&self, component: u8) -> Option<f32> {
        match self {
            PropertyValue::Vec2(v) => v.get(component as usize).copied(),
            PropertyValue::Vec3(v) => v.get(component as usize).copied(),
            PropertyValue::Vec4(v) => v.get(component as usize).copied(),
            _ => None,
        }
    }

    /// Apply a relative delta of the same type: component-wise addition for
    /// numeric values, composition for rotations, OR for booleans. `None`
    /// when the types differ or the type has no relative semantics.
    pub fn combined(&self, delta: &PropertyValue) -> Option<PropertyValue> {
        use PropertyValue::*;
        match (self, delta) {
            (Bool(a), Bool(b)) => Some(Bool(*a || *b)),
            (Integer(a), Integer(b)) => Some(Integer(a + b)),
            (Float(a), Float(b)) => Some(Float(a + b)),
            (Vec2(a), Vec2(b)) => Some(Vec2([a[0] + b[0], a[1] + b[1]])),
            (Vec3(a), Vec3(b)) => Some(Vec3([a[0] + b[0], a[1] + b[1], a[2] + b[2]])),
            (Vec4(a), Vec4(b)) => Some(Vec4([
                a[0] + b[0],
                a[1] + b[1],
                a[2] + b[2],
                a[3] + b[3],
            ])),
            (Rotation(a), Rotation(b)) => Some(Rotation(crate::rotation::Rotation::Quaternion(
                a.as_quaternion().multiply(b.as_quaternion()),
            ))),
            _ => Option::None,
        }
    }

    /// Scale a delta by a progress factor: numeric values multiply, rotations
    /// interpolate from identity. Used to apply a partial relative change.
    pub fn scaled(&self, factor: f32) -> Option<PropertyValue> {
        use PropertyValue::*;
        match self {
            Bool(b) => Some(Bool(*b && factor > 0.0)),
            Integer(i) => Some(Integer((*i as f32 * factor) as i32)),
            Float(f) => Some(Float(f * factor)),
            Vec2(v) => Some(Vec2([v[0] * factor, v[1] * factor])),
            Vec3(v) => Some(Vec3([v[0] * factor, v[1] * factor, v[2] * factor])),
            Vec4(v) => Some(Vec4([
                v[0] * factor,
                v[1] * factor,
                v[2] * factor,
                v[3] * factor,
            ])),
            Rotation(r) => Some(Rotation(crate::rotation::Rotation::Quaternion(
                crate::rotation::Quaternion::IDENTITY.nlerp(r.as_quaternion(), factor),
            ))),
            _ => Option::None,
        }
    }

    /// Check that this value may drive an animation of a property declared as
    /// `expected`. Component-addressed targets are validated as `Float` by the
    /// caller before reaching here.
    pub fn ensure_animates(&self, expected: PropertyType) -> Result<(), ValueError> {
        if !expected.is_animatable() {
            return Err(ValueError::NotAnimatable(expected));
        }
        let actual = self.value_type();
        if actual != expected {
            return Err(ValueError::TypeMismatch { expected, actual });
        }
        Ok(())
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        use PropertyValue::*;
        match (self, other) {
            (None, None) => true,
            (Bool(a), Bool(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => feq(*a, *b),
            (Vec2(a), Vec2(b)) => slice_eq(a, b),
            (Vec3(a), Vec3(b)) => slice_eq(a, b),
            (Vec4(a), Vec4(b)) => slice_eq(a, b),
            (Mat3(a), Mat3(b)) => slice_eq(a, b),
            (Mat4(a), Mat4(b)) => slice_eq(a, b),
            (Rotation(a), Rotation(b)) => a == b,
            (Rect(a), Rect(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (Extents(a), Extents(b)) => a == b,
            // Array and Map equality is not defined; distinct values never
            // compare equal, even when structurally identical.
            (Array(_), Array(_)) | (Map(_), Map(_)) => false,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::{AngleAxis, Quaternion};

    /// it should report the held variant from value_type for every arm
    #[test]
    fn value_type_tracks_variant() {
        assert_eq!(PropertyValue::None.value_type(), PropertyType::None);
        assert_eq!(
            PropertyValue::Float(1.0).value_type(),
            PropertyType::Float
        );
        assert_eq!(
            PropertyValue::Rotation(Rotation::Quaternion(Quaternion::IDENTITY)).value_type(),
            PropertyType::Rotation
        );
        assert_eq!(
            PropertyValue::Map(PropertyMap::new()).value_type(),
            PropertyType::Map
        );
    }

    /// it should leave None behind after take and fail typed getters on it
    #[test]
    fn take_leaves_source_empty() {
        let mut source = PropertyValue::Vec3([1.0, 2.0, 3.0]);
        let moved = source.take();
        assert_eq!(moved.as_vec3(), Some([1.0, 2.0, 3.0]));
        assert_eq!(source.value_type(), PropertyType::None);
        assert_eq!(source.as_vec3(), None);
        assert_eq!(source.as_float(), None);

        let mut text = PropertyValue::Text("hello".into());
        let _ = text.take();
        assert_eq!(text.value_type(), PropertyType::None);
        assert_eq!(text.as_text(), None);
    }

    /// it should compare floats with an epsilon and rotations across representations
    #[test]
    fn epsilon_and_rotation_equality() {
        assert_eq!(
            PropertyValue::Float(1.0),
            PropertyValue::Float(1.0 + 1e-6)
        );
        let q = PropertyValue::Rotation(Rotation::Quaternion(Quaternion::from_axis_angle(
            [0.0, 1.0, 0.0],
            45.0,
        )));
        let aa = PropertyValue::Rotation(Rotation::AngleAxis(AngleAxis::new(
            [0.0, 1.0, 0.0],
            45.0,
        )));
        assert_eq!(q, aa);
    }

    /// it should never equate arrays or maps, even when structurally identical
    #[test]
    fn array_and_map_always_unequal() {
        let a = PropertyValue::Array(vec![PropertyValue::Integer(1)]);
        let b = PropertyValue::Array(vec![PropertyValue::Integer(1)]);
        assert_ne!(a, b);

        let mut m1 = PropertyMap::new();
        m1.insert("k", PropertyValue::Bool(true));
        let m2 = m1.clone();
        assert_ne!(PropertyValue::Map(m1), PropertyValue::Map(m2));
    }

    /// it should reject animating non-animatable or mismatched types
    #[test]
    fn animate_validation() {
        assert_eq!(
            PropertyValue::Text("x".into()).ensure_animates(PropertyType::Text),
            Err(ValueError::NotAnimatable(PropertyType::Text))
        );
        assert_eq!(
            PropertyValue::Float(1.0).ensure_animates(PropertyType::Vec3),
            Err(ValueError::TypeMismatch {
                expected: PropertyType::Vec3,
                actual: PropertyType::Float
            })
        );
        assert!(PropertyValue::Vec3([0.0; 3])
            .ensure_animates(PropertyType::Vec3)
            .is_ok());
    }
}
