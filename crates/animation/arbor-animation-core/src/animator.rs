//! Scene-side animators: one bound property driven by one time-parameterized
//! value function.
//!
//! An animator never owns its target. The owner table is the weak-reference
//! registry: a missing owner means the target was destroyed, and the animator
//! silently disables itself for the rest of the animation's life.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use arbor_api_core::{ComponentIndex, PropertyValue, Rotation};

use crate::alpha::AlphaFunction;
use crate::double_buffered::BufferIndex;
use crate::ids::{ObjectId, ScenePropertyId};
use crate::interp::lerp_value;
use crate::keyframes::{Interpolation, KeyFrames};
use crate::path::Path;
use crate::property_owner::PropertyOwner;

/// Delay before the animator starts plus its active duration, in seconds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub delay: f32,
    pub duration: f32,
}

impl TimePeriod {
    pub fn new(duration: f32) -> Self {
        Self {
            delay: 0.0,
            duration,
        }
    }

    pub fn with_delay(delay: f32, duration: f32) -> Self {
        Self { delay, duration }
    }

    #[inline]
    pub fn end_time(&self) -> f32 {
        self.delay + self.duration
    }
}

/// The value-producing function of one animator.
#[derive(Clone, Debug)]
pub enum AnimatorFunction {
    /// Current value plus a progress-scaled relative delta.
    By { relative: PropertyValue },
    /// Interpolate from the value found when the animator first runs toward
    /// a fixed target.
    To { target: PropertyValue },
    /// Keyframe interpolation.
    Between {
        key_frames: KeyFrames,
        interpolation: Interpolation,
    },
    /// Position along a spline.
    PathPosition { path: Path },
    /// Orientation along a spline, derived from a forward vector.
    PathOrientation { path: Path, forward: [f32; 3] },
}

#[derive(Clone, Debug)]
pub struct Animator {
    pub owner: ObjectId,
    pub property: ScenePropertyId,
    pub component: ComponentIndex,
    pub function: AnimatorFunction,
    pub alpha: AlphaFunction,
    pub time_period: TimePeriod,
    enabled: bool,
    start: Option<PropertyValue>,
    completed: bool,
}

impl Animator {
    pub fn new(
        owner: ObjectId,
        property: ScenePropertyId,
        component: ComponentIndex,
        function: AnimatorFunction,
        alpha: AlphaFunction,
        time_period: TimePeriod,
    ) -> Self {
        Self {
            owner,
            property,
            component,
            function,
            alpha,
            time_period,
            enabled: true,
            start: None,
            completed: false,
        }
    }

    #[inline]
    pub fn end_time(&self) -> f32 {
        self.time_period.end_time()
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Permanently disable (orphaned target or disconnect).
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Activation clears the captured start value and the completion latch so
    /// a replay re-captures from the current state.
    pub fn set_active(&mut self, active: bool) {
        if active {
            self.start = None;
            self.completed = false;
        }
    }

    /// Evaluate at clamped, window-relative `progress` and write the target.
    ///
    /// A non-baking evaluation at progress 1 fires exactly once: the final
    /// in-window frame still writes so the target value is reached, then the
    /// animator goes quiet until reactivated. Baking evaluations (finish,
    /// stop, pause) always apply.
    pub fn update(
        &mut self,
        owners: &mut HashMap<ObjectId, PropertyOwner>,
        buffer: BufferIndex,
        progress: f32,
        bake: bool,
    ) {
        if !self.enabled {
            return;
        }
        let Some(owner) = owners.get_mut(&self.owner) else {
            // Target destroyed: become a no-op for the remainder.
            self.enabled = false;
            return;
        };
        let Some(cell) = owner.property_mut(self.property) else {
            self.enabled = false;
            return;
        };

        if !bake {
            if progress >= 1.0 {
                if self.completed {
                    return;
                }
                self.completed = true;
            } else {
                self.completed = false;
            }
        }

        let eased = self.alpha.apply(progress);
        let current = cell.read(buffer, self.component);
        let start = self.start.get_or_insert_with(|| current.clone()).clone();

        let value = match &self.function {
            AnimatorFunction::By { relative } => {
                match relative.scaled(eased).and_then(|d| current.combined(&d)) {
                    Some(v) => v,
                    None => return,
                }
            }
            AnimatorFunction::To { target } => lerp_value(&start, target, eased),
            AnimatorFunction::Between {
                key_frames,
                interpolation,
            } => key_frames.sample(eased, *interpolation),
            AnimatorFunction::PathPosition { path } => match path.sample_position(eased) {
                Some(p) => PropertyValue::Vec3(p),
                None => return,
            },
            AnimatorFunction::PathOrientation { path, forward } => {
                match path.sample_orientation(*forward, eased) {
                    Some(q) => PropertyValue::Rotation(Rotation::Quaternion(q)),
                    None => return,
                }
            }
        };

        if bake {
            cell.bake(buffer, self.component, &value);
        } else {
            cell.set(buffer, self.component, &value);
        }
    }
}
