//! Update-role state: the property-owner and scene-animation tables, message
//! application, the per-frame reset pass, and the deferred discard queue.

use hashbrown::HashMap;
use log::warn;

use crate::double_buffered::BufferIndex;
use crate::ids::{AnimationId, ObjectId};
use crate::messages::UpdateMessage;
use crate::property_owner::{PropertyOwner, SceneProperty};
use crate::scene_animation::{AnimationTick, SceneAnimation};

#[derive(Default)]
pub struct UpdateManager {
    owners: HashMap<ObjectId, PropertyOwner>,
    animations: HashMap<AnimationId, SceneAnimation>,
    /// Owners retired this frame; kept one frame so nothing observes a
    /// mid-frame disappearance.
    discard: Vec<PropertyOwner>,
}

impl UpdateManager {
    pub fn with_capacity(objects: usize, animations: usize) -> Self {
        Self {
            owners: HashMap::with_capacity(objects),
            animations: HashMap::with_capacity(animations),
            discard: Vec::new(),
        }
    }

    pub fn owners(&self) -> &HashMap<ObjectId, PropertyOwner> {
        &self.owners
    }

    pub fn owner(&self, id: ObjectId) -> Option<&PropertyOwner> {
        self.owners.get(&id)
    }

    pub fn scene_animation(&self, id: AnimationId) -> Option<&SceneAnimation> {
        self.animations.get(&id)
    }

    /// Played counter the event role polls for finish notification.
    pub fn played_count(&self, id: AnimationId) -> Option<i32> {
        self.animations.get(&id).map(|a| a.played_count())
    }

    pub fn current_loop(&self, id: AnimationId) -> Option<i32> {
        self.animations.get(&id).map(|a| a.current_loop())
    }

    /// Drop owners retired in the previous frame.
    pub fn begin_frame(&mut self) {
        self.discard.clear();
    }

    /// Apply one deferred mutation. Messages for entities that have already
    /// been destroyed are skipped silently; destruction is deferred exactly
    /// so stale messages resolve to misses instead of dangling access.
    pub fn apply(&mut self, message: UpdateMessage, buffer: BufferIndex) {
        match message {
            UpdateMessage::CreatePropertyOwner { owner } => {
                self.owners.insert(owner, PropertyOwner::new());
            }
            UpdateMessage::DestroyPropertyOwner { owner } => {
                for animation in self.animations.values_mut() {
                    animation.disconnect_owner(owner, &mut self.owners, buffer);
                }
                if let Some(retired) = self.owners.remove(&owner) {
                    self.discard.push(retired);
                }
            }
            UpdateMessage::InstallSceneProperty {
                owner,
                property,
                initial,
            } => match SceneProperty::from_value(&initial) {
                Some(cell) => {
                    if let Some(entry) = self.owners.get_mut(&owner) {
                        entry.install(property, cell);
                    }
                }
                None => warn!(
                    "cannot install a scene property of type {:?}",
                    initial.value_type()
                ),
            },
            UpdateMessage::SetSceneProperty {
                owner,
                property,
                component,
                value,
            } => {
                if let Some(cell) = self
                    .owners
                    .get_mut(&owner)
                    .and_then(|o| o.property_mut(property))
                {
                    cell.set(buffer, component, &value);
                }
            }
            UpdateMessage::BakeSceneProperty {
                owner,
                property,
                component,
                value,
            } => {
                if let Some(cell) = self
                    .owners
                    .get_mut(&owner)
                    .and_then(|o| o.property_mut(property))
                {
                    cell.bake(buffer, component, &value);
                }
            }
            UpdateMessage::SetScenePropertyRelative {
                owner,
                property,
                component,
                delta,
            } => {
                if let Some(cell) = self
                    .owners
                    .get_mut(&owner)
                    .and_then(|o| o.property_mut(property))
                {
                    cell.set_relative(buffer, component, &delta);
                }
            }
            UpdateMessage::BakeScenePropertyRelative {
                owner,
                property,
                component,
                delta,
            } => {
                if let Some(cell) = self
                    .owners
                    .get_mut(&owner)
                    .and_then(|o| o.property_mut(property))
                {
                    cell.bake_relative(buffer, component, &delta);
                }
            }
            UpdateMessage::CreateAnimation { animation, spec } => {
                self.animations.insert(animation, SceneAnimation::new(spec));
            }
            UpdateMessage::DestroyAnimation { animation } => {
                if let Some(mut scene) = self.animations.remove(&animation) {
                    // Settle in-flight values before the animation disappears.
                    let _ = scene.stop(&mut self.owners, buffer);
                }
            }
            UpdateMessage::AddAnimator {
                animation,
                animator,
            } => {
                if let Some(scene) = self.animations.get_mut(&animation) {
                    scene.add_animator(animator);
                }
            }
            UpdateMessage::PlayAnimation { animation } => {
                if let Some(scene) = self.animations.get_mut(&animation) {
                    scene.play();
                }
            }
            UpdateMessage::PlayAnimationFrom {
                animation,
                progress,
            } => {
                if let Some(scene) = self.animations.get_mut(&animation) {
                    scene.play_from(progress);
                }
            }
            UpdateMessage::PlayAnimationAfter { animation, delay } => {
                if let Some(scene) = self.animations.get_mut(&animation) {
                    scene.play_after(delay);
                }
            }
            UpdateMessage::PauseAnimation { animation } => {
                if let Some(scene) = self.animations.get_mut(&animation) {
                    scene.pause(&mut self.owners, buffer);
                }
            }
            UpdateMessage::StopAnimation { animation } => {
                if let Some(scene) = self.animations.get_mut(&animation) {
                    let _ = scene.stop(&mut self.owners, buffer);
                }
            }
            UpdateMessage::SetDuration { animation, seconds } => {
                if let Some(scene) = self.animations.get_mut(&animation) {
                    scene.set_duration(seconds);
                }
            }
            UpdateMessage::SetLoopCount { animation, count } => {
                if let Some(scene) = self.animations.get_mut(&animation) {
                    scene.set_loop_count(count);
                }
            }
            UpdateMessage::SetPlayRange { animation, range } => {
                if let Some(scene) = self.animations.get_mut(&animation) {
                    scene.set_play_range(range);
                }
            }
            UpdateMessage::SetSpeedFactor { animation, factor } => {
                if let Some(scene) = self.animations.get_mut(&animation) {
                    scene.set_speed_factor(factor);
                }
            }
            UpdateMessage::SetEndAction { animation, action } => {
                if let Some(scene) = self.animations.get_mut(&animation) {
                    scene.set_end_action(action);
                }
            }
            UpdateMessage::SetDisconnectAction { animation, action } => {
                if let Some(scene) = self.animations.get_mut(&animation) {
                    scene.set_disconnect_action(action);
                }
            }
            UpdateMessage::SetLoopingMode {
                animation,
                auto_reverse,
            } => {
                if let Some(scene) = self.animations.get_mut(&animation) {
                    scene.set_looping_mode(auto_reverse);
                }
            }
            UpdateMessage::SetProgressMarker { animation, seconds } => {
                if let Some(scene) = self.animations.get_mut(&animation) {
                    scene.set_progress_marker(seconds);
                }
            }
            UpdateMessage::SetCurrentProgress { animation, seconds } => {
                if let Some(scene) = self.animations.get_mut(&animation) {
                    scene.set_current_progress(seconds);
                }
            }
        }
    }

    /// Start-of-traversal pass: revert every dirty property toward its base.
    pub fn reset_properties(&mut self, buffer: BufferIndex) {
        for owner in self.owners.values_mut() {
            owner.reset_to_base_values(buffer);
        }
    }

    /// Advance every scene animation; returns the per-animation tick edges.
    pub fn update_animations(
        &mut self,
        buffer: BufferIndex,
        dt: f32,
    ) -> Vec<(AnimationId, AnimationTick)> {
        let mut ticks = Vec::new();
        for (id, animation) in self.animations.iter_mut() {
            let tick = animation.update(&mut self.owners, buffer, dt);
            if tick.looped || tick.finished || tick.progress_reached {
                ticks.push((*id, tick));
            }
        }
        ticks
    }
}
