//! Double-buffered animatable property cells and their dirty-flag state
//! machine.
//!
//! Dirty state records whether a property changed in this or the previous
//! frame. In the frame following a change the property is reset to its base
//! value:
//!
//! - after a `bake` the base matches the buffered value, so one reset leaves
//!   the cell clean;
//! - after a transient `set` the base and buffered value typically differ, so
//!   the reset re-applies the base and the cell stays non-clean for one more
//!   frame. Both slots therefore converge to the base within two frames
//!   without the writer knowing which slot the reader currently consumes.
//!
//! The decay is an explicit three-state transition rather than flag
//! arithmetic: `SetPending -> BakedPending -> Clean`, `BakedPending -> Clean`.

use arbor_api_core::Quaternion;

use crate::double_buffered::{BufferIndex, DoubleBuffered};

/// Dirty state of one animatable property.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DirtyFlag {
    /// The value did not change in this or the previous frame.
    Clean,
    /// The value was baked; one more reset pass and the cell is clean.
    BakedPending,
    /// The value was set transiently; it must revert to base and stays
    /// non-clean for one extra frame.
    SetPending,
}

impl DirtyFlag {
    /// One reset pass worth of decay.
    #[inline]
    pub fn decay(self) -> DirtyFlag {
        match self {
            DirtyFlag::SetPending => DirtyFlag::BakedPending,
            DirtyFlag::BakedPending | DirtyFlag::Clean => DirtyFlag::Clean,
        }
    }

    #[inline]
    pub fn is_clean(self) -> bool {
        self == DirtyFlag::Clean
    }
}

const LANE_EPSILON: f32 = 1e-6;

#[inline]
fn lane_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= LANE_EPSILON
}

/// A value storable in an [`AnimatableProperty`].
///
/// `combine` applies a relative delta: component-wise addition for numeric
/// types, composition for rotations and matrices, and OR-dominance for
/// booleans (a boolean cannot be incremented; a `true` delta saturates, a
/// `false` delta never changes anything. This quirk is load-bearing
/// and pinned by tests).
pub trait AnimatableValue: Copy {
    fn combine(self, delta: Self) -> Self;
    fn approx_eq(self, other: Self) -> bool;
}

impl AnimatableValue for bool {
    #[inline]
    fn combine(self, delta: Self) -> Self {
        self || delta
    }

    #[inline]
    fn approx_eq(self, other: Self) -> bool {
        self == other
    }
}

impl AnimatableValue for i32 {
    #[inline]
    fn combine(self, delta: Self) -> Self {
        self + delta
    }

    #[inline]
    fn approx_eq(self, other: Self) -> bool {
        self == other
    }
}

impl AnimatableValue for f32 {
    #[inline]
    fn combine(self, delta: Self) -> Self {
        self + delta
    }

    #[inline]
    fn approx_eq(self, other: Self) -> bool {
        lane_eq(self, other)
    }
}

macro_rules! additive_array {
    ($($n:literal),+) => {$(
        impl AnimatableValue for [f32; $n] {
            #[inline]
            fn combine(mut self, delta: Self) -> Self {
                for (v, d) in self.iter_mut().zip(delta.iter()) {
                    *v += d;
                }
                self
            }

            #[inline]
            fn approx_eq(self, other: Self) -> bool {
                self.iter().zip(other.iter()).all(|(a, b)| lane_eq(*a, *b))
            }
        }
    )+};
}

additive_array!(2, 3, 4);

/// Row-major 3x3 matrix: relative application is composition.
impl AnimatableValue for [f32; 9] {
    fn combine(self, delta: Self) -> Self {
        let mut out = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                let mut acc = 0.0;
                for k in 0..3 {
                    acc += self[row * 3 + k] * delta[k * 3 + col];
                }
                out[row * 3 + col] = acc;
            }
        }
        out
    }

    fn approx_eq(self, other: Self) -> bool {
        self.iter().zip(other.iter()).all(|(a, b)| lane_eq(*a, *b))
    }
}

/// Row-major 4x4 matrix: relative application is composition.
impl AnimatableValue for [f32; 16] {
    fn combine(self, delta: Self) -> Self {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                let mut acc = 0.0;
                for k in 0..4 {
                    acc += self[row * 4 + k] * delta[k * 4 + col];
                }
                out[row * 4 + col] = acc;
            }
        }
        out
    }

    fn approx_eq(self, other: Self) -> bool {
        self.iter().zip(other.iter()).all(|(a, b)| lane_eq(*a, *b))
    }
}

impl AnimatableValue for Quaternion {
    #[inline]
    fn combine(self, delta: Self) -> Self {
        self.multiply(delta)
    }

    #[inline]
    fn approx_eq(self, other: Self) -> bool {
        Quaternion::approx_eq(self, other)
    }
}

/// One animatable property of a scene-graph object: two buffered slots, a
/// persisted base value, and the dirty flag governing the reset pass.
#[derive(Clone, Debug)]
pub struct AnimatableProperty<T: AnimatableValue> {
    value: DoubleBuffered<T>,
    base_value: T,
    dirty: DirtyFlag,
}

impl<T: AnimatableValue> AnimatableProperty<T> {
    /// A new property starts baked: its initial value must publish for one
    /// frame.
    pub fn new(initial: T) -> Self {
        Self {
            value: DoubleBuffered::new(initial),
            base_value: initial,
            dirty: DirtyFlag::BakedPending,
        }
    }

    #[inline]
    pub fn get(&self, buffer: BufferIndex) -> T {
        self.value[buffer]
    }

    /// Direct slot access; no dirty-flag side effect.
    #[inline]
    pub fn get_mut(&mut self, buffer: BufferIndex) -> &mut T {
        &mut self.value[buffer]
    }

    #[inline]
    pub fn base_value(&self) -> T {
        self.base_value
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.dirty.is_clean()
    }

    #[inline]
    fn on_set(&mut self) {
        self.dirty = DirtyFlag::SetPending;
    }

    /// A bake never shortens a pending two-frame reset.
    #[inline]
    fn on_bake(&mut self) {
        if self.dirty != DirtyFlag::SetPending {
            self.dirty = DirtyFlag::BakedPending;
        }
    }

    /// Write the slot transiently; the value reverts to the base at the start
    /// of the next frame's reset pass unless baked or set again beforehand.
    /// An unchanged value is skipped so the cell is not dirtied needlessly.
    pub fn set(&mut self, buffer: BufferIndex, value: T) {
        if !self.value[buffer].approx_eq(value) {
            self.value[buffer] = value;
            self.on_set();
        }
    }

    /// Transient relative change; see [`AnimatableValue::combine`] for the
    /// per-type delta semantics (including the boolean OR quirk).
    pub fn set_relative(&mut self, buffer: BufferIndex, delta: T) {
        let combined = self.value[buffer].combine(delta);
        if !self.value[buffer].approx_eq(combined) {
            self.value[buffer] = combined;
            self.on_set();
        }
    }

    /// Write the slot and the base value; the value survives the reset pass.
    /// Both slots are written so the render side converges immediately.
    pub fn bake(&mut self, buffer: BufferIndex, value: T) {
        if !self.base_value.approx_eq(value) {
            self.value[buffer] = value;
            self.value[buffer.other()] = value;
            self.base_value = value;
            self.on_bake();
        }
    }

    /// Relative change to value and base; the other slot converges via the
    /// reset pass.
    pub fn bake_relative(&mut self, buffer: BufferIndex, delta: T) {
        let combined = self.value[buffer].combine(delta);
        self.value[buffer] = combined;
        self.base_value = combined;
        self.on_bake();
    }

    /// Start-of-frame reset: copy the base into the slot and decay the dirty
    /// flag. A clean property is untouched.
    pub fn reset_to_base_value(&mut self, buffer: BufferIndex) {
        if !self.dirty.is_clean() {
            self.value[buffer] = self.base_value;
            self.dirty = self.dirty.decay();
        }
    }

    /// Force a reset of the slot value over the next two frames.
    pub fn mark_as_dirty(&mut self) {
        self.dirty = DirtyFlag::SetPending;
    }

    /// Set both slots and the base without touching the dirty flag. Only for
    /// owners not yet connected to the scene graph.
    pub fn set_initial(&mut self, value: T) {
        self.value[BufferIndex::A] = value;
        self.value[BufferIndex::B] = value;
        self.base_value = value;
    }
}

/// Scalar-lane access for the vector storages. The dirty flag stays
/// per-property: touching one lane dirties the whole cell.
pub trait VectorLanes: AnimatableValue {
    const LANES: u8;
    fn lane(&self, lane: u8) -> f32;
    fn lane_mut(&mut self, lane: u8) -> &mut f32;
}

macro_rules! vector_lanes {
    ($($n:literal),+) => {$(
        impl VectorLanes for [f32; $n] {
            const LANES: u8 = $n;

            #[inline]
            fn lane(&self, lane: u8) -> f32 {
                self[lane as usize]
            }

            #[inline]
            fn lane_mut(&mut self, lane: u8) -> &mut f32 {
                &mut self[lane as usize]
            }
        }
    )+};
}

vector_lanes!(2, 3, 4);

impl<T: VectorLanes> AnimatableProperty<T> {
    /// Transient write of one lane; same revert semantics as the whole-value
    /// `set`.
    pub fn set_component(&mut self, buffer: BufferIndex, lane: u8, value: f32) {
        debug_assert!(lane < T::LANES, "component lane out of range");
        if !lane_eq(self.value[buffer].lane(lane), value) {
            *self.value[buffer].lane_mut(lane) = value;
            self.on_set();
        }
    }

    pub fn set_component_relative(&mut self, buffer: BufferIndex, lane: u8, delta: f32) {
        debug_assert!(lane < T::LANES, "component lane out of range");
        if !lane_eq(delta, 0.0) {
            *self.value[buffer].lane_mut(lane) += delta;
            self.on_set();
        }
    }

    /// Bake one lane in the slot, the opposite slot, and the base.
    pub fn bake_component(&mut self, buffer: BufferIndex, lane: u8, value: f32) {
        debug_assert!(lane < T::LANES, "component lane out of range");
        if !lane_eq(self.base_value.lane(lane), value) {
            *self.value[buffer].lane_mut(lane) = value;
            *self.value[buffer.other()].lane_mut(lane) = value;
            *self.base_value.lane_mut(lane) = value;
            self.on_bake();
        }
    }

    pub fn bake_component_relative(&mut self, buffer: BufferIndex, lane: u8, delta: f32) {
        debug_assert!(lane < T::LANES, "component lane out of range");
        let combined = self.value[buffer].lane(lane) + delta;
        *self.value[buffer].lane_mut(lane) = combined;
        *self.base_value.lane_mut(lane) = combined;
        self.on_bake();
    }
}

macro_rules! named_lane_accessors {
    ($ty:ty { $(($lane:expr, $set:ident, $set_rel:ident, $bake:ident, $bake_rel:ident)),+ $(,)? }) => {
        impl AnimatableProperty<$ty> {
            $(
                pub fn $set(&mut self, buffer: BufferIndex, value: f32) {
                    self.set_component(buffer, $lane, value);
                }

                pub fn $set_rel(&mut self, buffer: BufferIndex, delta: f32) {
                    self.set_component_relative(buffer, $lane, delta);
                }

                pub fn $bake(&mut self, buffer: BufferIndex, value: f32) {
                    self.bake_component(buffer, $lane, value);
                }

                pub fn $bake_rel(&mut self, buffer: BufferIndex, delta: f32) {
                    self.bake_component_relative(buffer, $lane, delta);
                }
            )+
        }
    };
}

named_lane_accessors!([f32; 2] {
    (0, set_x, set_x_relative, bake_x, bake_x_relative),
    (1, set_y, set_y_relative, bake_y, bake_y_relative),
});

named_lane_accessors!([f32; 3] {
    (0, set_x, set_x_relative, bake_x, bake_x_relative),
    (1, set_y, set_y_relative, bake_y, bake_y_relative),
    (2, set_z, set_z_relative, bake_z, bake_z_relative),
});

named_lane_accessors!([f32; 4] {
    (0, set_x, set_x_relative, bake_x, bake_x_relative),
    (1, set_y, set_y_relative, bake_y, bake_y_relative),
    (2, set_z, set_z_relative, bake_z, bake_z_relative),
    (3, set_w, set_w_relative, bake_w, bake_w_relative),
});

#[cfg(test)]
mod tests {
    use super::*;

    /// it should decay SetPending over two passes and BakedPending over one
    #[test]
    fn dirty_flag_decay() {
        assert_eq!(DirtyFlag::SetPending.decay(), DirtyFlag::BakedPending);
        assert_eq!(DirtyFlag::BakedPending.decay(), DirtyFlag::Clean);
        assert_eq!(DirtyFlag::Clean.decay(), DirtyFlag::Clean);
    }

    /// it should not dirty the cell when set writes an unchanged value
    #[test]
    fn unchanged_set_is_skipped() {
        let mut prop = AnimatableProperty::new(5.0f32);
        prop.reset_to_base_value(BufferIndex::A);
        assert!(prop.is_clean());
        prop.set(BufferIndex::A, 5.0);
        assert!(prop.is_clean());
        prop.set(BufferIndex::A, 6.0);
        assert!(!prop.is_clean());
    }

    /// it should compose quaternion deltas rather than add them
    #[test]
    fn quaternion_relative_composes() {
        let half = Quaternion::from_axis_angle([0.0, 0.0, 1.0], 45.0);
        let full = Quaternion::from_axis_angle([0.0, 0.0, 1.0], 90.0);
        let mut prop = AnimatableProperty::new(half);
        prop.set_relative(BufferIndex::A, half);
        assert!(prop.get(BufferIndex::A).approx_eq(full));
    }
}
