//! Scene-graph side property storage: one `PropertyOwner` per event-side
//! object, holding the double-buffered cells its animatable properties
//! materialized into.
//!
//! Owners are created and destroyed only by update-side message application;
//! a lookup that misses means the owner was destroyed and the caller backs
//! off (the weak-reference registry pattern; no dangling access is
//! possible).

use hashbrown::HashMap;
use log::warn;

use arbor_api_core::{ComponentIndex, PropertyType, PropertyValue, Rotation};

use crate::animatable::AnimatableProperty;
use crate::double_buffered::BufferIndex;
use crate::ids::ScenePropertyId;

/// A typed double-buffered cell, one variant per animatable type.
#[derive(Clone, Debug)]
pub enum SceneProperty {
    Bool(AnimatableProperty<bool>),
    Integer(AnimatableProperty<i32>),
    Float(AnimatableProperty<f32>),
    Vec2(AnimatableProperty<[f32; 2]>),
    Vec3(AnimatableProperty<[f32; 3]>),
    Vec4(AnimatableProperty<[f32; 4]>),
    Mat3(AnimatableProperty<[f32; 9]>),
    Mat4(AnimatableProperty<[f32; 16]>),
    Rotation(AnimatableProperty<arbor_api_core::Quaternion>),
}

impl SceneProperty {
    /// Allocate a cell sized and default-initialized by the value's declared
    /// type. `None` for non-animatable types.
    pub fn from_value(initial: &PropertyValue) -> Option<SceneProperty> {
        Some(match initial {
            PropertyValue::Bool(v) => SceneProperty::Bool(AnimatableProperty::new(*v)),
            PropertyValue::Integer(v) => SceneProperty::Integer(AnimatableProperty::new(*v)),
            PropertyValue::Float(v) => SceneProperty::Float(AnimatableProperty::new(*v)),
            PropertyValue::Vec2(v) => SceneProperty::Vec2(AnimatableProperty::new(*v)),
            PropertyValue::Vec3(v) => SceneProperty::Vec3(AnimatableProperty::new(*v)),
            PropertyValue::Vec4(v) => SceneProperty::Vec4(AnimatableProperty::new(*v)),
            PropertyValue::Mat3(v) => SceneProperty::Mat3(AnimatableProperty::new(*v)),
            PropertyValue::Mat4(v) => SceneProperty::Mat4(AnimatableProperty::new(*v)),
            PropertyValue::Rotation(r) => {
                SceneProperty::Rotation(AnimatableProperty::new(r.as_quaternion()))
            }
            _ => return None,
        })
    }

    pub fn value_type(&self) -> PropertyType {
        match self {
            SceneProperty::Bool(_) => PropertyType::Bool,
            SceneProperty::Integer(_) => PropertyType::Integer,
            SceneProperty::Float(_) => PropertyType::Float,
            SceneProperty::Vec2(_) => PropertyType::Vec2,
            SceneProperty::Vec3(_) => PropertyType::Vec3,
            SceneProperty::Vec4(_) => PropertyType::Vec4,
            SceneProperty::Mat3(_) => PropertyType::Mat3,
            SceneProperty::Mat4(_) => PropertyType::Mat4,
            SceneProperty::Rotation(_) => PropertyType::Rotation,
        }
    }

    /// Read the whole buffered value.
    pub fn value(&self, buffer: BufferIndex) -> PropertyValue {
        match self {
            SceneProperty::Bool(p) => PropertyValue::Bool(p.get(buffer)),
            SceneProperty::Integer(p) => PropertyValue::Integer(p.get(buffer)),
            SceneProperty::Float(p) => PropertyValue::Float(p.get(buffer)),
            SceneProperty::Vec2(p) => PropertyValue::Vec2(p.get(buffer)),
            SceneProperty::Vec3(p) => PropertyValue::Vec3(p.get(buffer)),
            SceneProperty::Vec4(p) => PropertyValue::Vec4(p.get(buffer)),
            SceneProperty::Mat3(p) => PropertyValue::Mat3(p.get(buffer)),
            SceneProperty::Mat4(p) => PropertyValue::Mat4(p.get(buffer)),
            SceneProperty::Rotation(p) => {
                PropertyValue::Rotation(Rotation::Quaternion(p.get(buffer)))
            }
        }
    }

    /// Read one lane of a composite cell, or the whole value when no lane is
    /// addressed.
    pub fn read(&self, buffer: BufferIndex, component: ComponentIndex) -> PropertyValue {
        match (self, component) {
            (SceneProperty::Vec2(p), Some(lane)) if lane < 2 => {
                PropertyValue::Float(p.get(buffer)[lane as usize])
            }
            (SceneProperty::Vec3(p), Some(lane)) if lane < 3 => {
                PropertyValue::Float(p.get(buffer)[lane as usize])
            }
            (SceneProperty::Vec4(p), Some(lane)) if lane < 4 => {
                PropertyValue::Float(p.get(buffer)[lane as usize])
            }
            _ => self.value(buffer),
        }
    }

    pub fn is_clean(&self) -> bool {
        match self {
            SceneProperty::Bool(p) => p.is_clean(),
            SceneProperty::Integer(p) => p.is_clean(),
            SceneProperty::Float(p) => p.is_clean(),
            SceneProperty::Vec2(p) => p.is_clean(),
            SceneProperty::Vec3(p) => p.is_clean(),
            SceneProperty::Vec4(p) => p.is_clean(),
            SceneProperty::Mat3(p) => p.is_clean(),
            SceneProperty::Mat4(p) => p.is_clean(),
            SceneProperty::Rotation(p) => p.is_clean(),
        }
    }

    pub fn reset_to_base_value(&mut self, buffer: BufferIndex) {
        match self {
            SceneProperty::Bool(p) => p.reset_to_base_value(buffer),
            SceneProperty::Integer(p) => p.reset_to_base_value(buffer),
            SceneProperty::Float(p) => p.reset_to_base_value(buffer),
            SceneProperty::Vec2(p) => p.reset_to_base_value(buffer),
            SceneProperty::Vec3(p) => p.reset_to_base_value(buffer),
            SceneProperty::Vec4(p) => p.reset_to_base_value(buffer),
            SceneProperty::Mat3(p) => p.reset_to_base_value(buffer),
            SceneProperty::Mat4(p) => p.reset_to_base_value(buffer),
            SceneProperty::Rotation(p) => p.reset_to_base_value(buffer),
        }
    }

    /// Transient write; `component` addresses one lane of a composite cell
    /// (the value must then be a Float). A kind mismatch is logged and
    /// skipped. The event side validated, so this only fires on internal
    /// misuse.
    pub fn set(&mut self, buffer: BufferIndex, component: ComponentIndex, value: &PropertyValue) {
        self.write(buffer, component, value, WriteKind::Set);
    }

    /// Write value and base; survives the reset pass.
    pub fn bake(&mut self, buffer: BufferIndex, component: ComponentIndex, value: &PropertyValue) {
        self.write(buffer, component, value, WriteKind::Bake);
    }

    pub fn set_relative(
        &mut self,
        buffer: BufferIndex,
        component: ComponentIndex,
        delta: &PropertyValue,
    ) {
        self.write(buffer, component, delta, WriteKind::SetRelative);
    }

    pub fn bake_relative(
        &mut self,
        buffer: BufferIndex,
        component: ComponentIndex,
        delta: &PropertyValue,
    ) {
        self.write(buffer, component, delta, WriteKind::BakeRelative);
    }

    fn write(
        &mut self,
        buffer: BufferIndex,
        component: ComponentIndex,
        value: &PropertyValue,
        kind: WriteKind,
    ) {
        // Lane-addressed writes on composite cells.
        if let Some(lane) = component {
            let Some(lane_value) = value.as_float() else {
                warn!(
                    "component write needs a Float value, got {:?}",
                    value.value_type()
                );
                return;
            };
            match self {
                SceneProperty::Vec2(p) => write_lane(p, buffer, lane, lane_value, kind),
                SceneProperty::Vec3(p) => write_lane(p, buffer, lane, lane_value, kind),
                SceneProperty::Vec4(p) => write_lane(p, buffer, lane, lane_value, kind),
                other => warn!(
                    "component write on non-composite {:?} property",
                    other.value_type()
                ),
            }
            return;
        }

        match (self, value) {
            (SceneProperty::Bool(p), PropertyValue::Bool(v)) => write_cell(p, buffer, *v, kind),
            (SceneProperty::Integer(p), PropertyValue::Integer(v)) => {
                write_cell(p, buffer, *v, kind)
            }
            (SceneProperty::Float(p), PropertyValue::Float(v)) => write_cell(p, buffer, *v, kind),
            (SceneProperty::Vec2(p), PropertyValue::Vec2(v)) => write_cell(p, buffer, *v, kind),
            (SceneProperty::Vec3(p), PropertyValue::Vec3(v)) => write_cell(p, buffer, *v, kind),
            (SceneProperty::Vec4(p), PropertyValue::Vec4(v)) => write_cell(p, buffer, *v, kind),
            (SceneProperty::Mat3(p), PropertyValue::Mat3(v)) => write_cell(p, buffer, *v, kind),
            (SceneProperty::Mat4(p), PropertyValue::Mat4(v)) => write_cell(p, buffer, *v, kind),
            (SceneProperty::Rotation(p), PropertyValue::Rotation(r)) => {
                write_cell(p, buffer, r.as_quaternion(), kind)
            }
            (cell, other) => warn!(
                "scene property write with mismatched kind: cell {:?}, value {:?}",
                cell.value_type(),
                other.value_type()
            ),
        }
    }
}

#[derive(Copy, Clone)]
enum WriteKind {
    Set,
    Bake,
    SetRelative,
    BakeRelative,
}

fn write_cell<T: crate::animatable::AnimatableValue>(
    cell: &mut AnimatableProperty<T>,
    buffer: BufferIndex,
    value: T,
    kind: WriteKind,
) {
    match kind {
        WriteKind::Set => cell.set(buffer, value),
        WriteKind::Bake => cell.bake(buffer, value),
        WriteKind::SetRelative => cell.set_relative(buffer, value),
        WriteKind::BakeRelative => cell.bake_relative(buffer, value),
    }
}

fn write_lane<T: crate::animatable::VectorLanes>(
    cell: &mut AnimatableProperty<T>,
    buffer: BufferIndex,
    lane: u8,
    value: f32,
    kind: WriteKind,
) {
    if lane >= T::LANES {
        warn!("component lane {lane} out of range");
        return;
    }
    match kind {
        WriteKind::Set => cell.set_component(buffer, lane, value),
        WriteKind::Bake => cell.bake_component(buffer, lane, value),
        WriteKind::SetRelative => cell.set_component_relative(buffer, lane, value),
        WriteKind::BakeRelative => cell.bake_component_relative(buffer, lane, value),
    }
}

/// All scene properties installed for one owner.
#[derive(Debug, Default)]
pub struct PropertyOwner {
    properties: HashMap<ScenePropertyId, SceneProperty>,
}

impl PropertyOwner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self, id: ScenePropertyId, property: SceneProperty) {
        self.properties.insert(id, property);
    }

    pub fn property(&self, id: ScenePropertyId) -> Option<&SceneProperty> {
        self.properties.get(&id)
    }

    pub fn property_mut(&mut self, id: ScenePropertyId) -> Option<&mut SceneProperty> {
        self.properties.get_mut(&id)
    }

    /// Start-of-frame pass: revert every dirty cell toward its base value.
    pub fn reset_to_base_values(&mut self, buffer: BufferIndex) {
        for property in self.properties.values_mut() {
            property.reset_to_base_value(buffer);
        }
    }
}
