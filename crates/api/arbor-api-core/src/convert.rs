//! Type-directed reinterpretation of `PropertyValue`s.
//!
//! Supported conversions:
//! - identity (any type to itself, unchanged)
//! - Float <-> Integer (truncation toward zero when narrowing)
//! - vector widening (zero-padded) and narrowing (truncated) among
//!   Vec2/Vec3/Vec4
//! - Rotation to Rotation covers the representation switch: both
//!   representations share the declared type, so the value is returned as-is
//!
//! Everything else fails with `None`. Conversion never mutates the source.

use crate::value::{PropertyType, PropertyValue};

/// Reinterpret `value` as `target`. Returns `None` when the conversion is not
/// defined; the source is left untouched either way.
pub fn convert(value: &PropertyValue, target: PropertyType) -> Option<PropertyValue> {
    if value.value_type() == target {
        return Some(value.clone());
    }

    match (value, target) {
        (PropertyValue::Float(f), PropertyType::Integer) => {
            Some(PropertyValue::Integer(*f as i32))
        }
        (PropertyValue::Integer(i), PropertyType::Float) => {
            Some(PropertyValue::Float(*i as f32))
        }

        (PropertyValue::Vec2(v), PropertyType::Vec3) => {
            Some(PropertyValue::Vec3([v[0], v[1], 0.0]))
        }
        (PropertyValue::Vec2(v), PropertyType::Vec4) => {
            Some(PropertyValue::Vec4([v[0], v[1], 0.0, 0.0]))
        }
        (PropertyValue::Vec3(v), PropertyType::Vec2) => Some(PropertyValue::Vec2([v[0], v[1]])),
        (PropertyValue::Vec3(v), PropertyType::Vec4) => {
            Some(PropertyValue::Vec4([v[0], v[1], v[2], 0.0]))
        }
        (PropertyValue::Vec4(v), PropertyType::Vec2) => Some(PropertyValue::Vec2([v[0], v[1]])),
        (PropertyValue::Vec4(v), PropertyType::Vec3) => {
            Some(PropertyValue::Vec3([v[0], v[1], v[2]]))
        }

        _ => None,
    }
}

impl PropertyValue {
    /// See [`convert`].
    pub fn convert_to(&self, target: PropertyType) -> Option<PropertyValue> {
        convert(self, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::{AngleAxis, Rotation};

    /// it should return the unchanged value when converting to the same type
    #[test]
    fn identity_is_noop() {
        let v = PropertyValue::Vec3([1.0, 2.0, 3.0]);
        assert_eq!(v.convert_to(PropertyType::Vec3), Some(v.clone()));

        let r = PropertyValue::Rotation(Rotation::AngleAxis(AngleAxis::new(
            [1.0, 0.0, 0.0],
            30.0,
        )));
        assert_eq!(r.convert_to(PropertyType::Rotation), Some(r.clone()));
    }

    /// it should truncate toward zero on float-to-integer narrowing
    #[test]
    fn float_integer_roundtrip() {
        assert_eq!(
            PropertyValue::Float(-2.9).convert_to(PropertyType::Integer),
            Some(PropertyValue::Integer(-2))
        );
        assert_eq!(
            PropertyValue::Integer(5).convert_to(PropertyType::Float),
            Some(PropertyValue::Float(5.0))
        );
    }

    /// it should zero-pad widening and truncate narrowing vector conversions
    #[test]
    fn vector_resize() {
        assert_eq!(
            PropertyValue::Vec2([1.0, 2.0]).convert_to(PropertyType::Vec4),
            Some(PropertyValue::Vec4([1.0, 2.0, 0.0, 0.0]))
        );
        assert_eq!(
            PropertyValue::Vec4([1.0, 2.0, 3.0, 4.0]).convert_to(PropertyType::Vec3),
            Some(PropertyValue::Vec3([1.0, 2.0, 3.0]))
        );
    }

    /// it should fail conversions that are not defined
    #[test]
    fn undefined_conversions_fail() {
        assert_eq!(
            PropertyValue::Text("x".into()).convert_to(PropertyType::Float),
            None
        );
        assert_eq!(
            PropertyValue::Bool(true).convert_to(PropertyType::Vec2),
            None
        );
    }
}
