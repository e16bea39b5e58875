//! Core facade: owns the event-role entities (objects, animations,
//! playlist), the update-role state, and the command channel between them.
//!
//! All public API runs on the event role. `update(dt)` performs one
//! update-role traversal: drain messages, reset dirty properties, advance
//! animations, poll the playlist, flip the buffers. The render role's entire
//! interface is [`Core::render_value`].

use hashbrown::HashMap;
use log::warn;

use arbor_api_core::{
    AccessMode, ComponentIndex, PropertyIndex, PropertyKey, PropertyType, PropertyValue,
};

use crate::alpha::AlphaFunction;
use crate::animation::{Animation, AnimationState, AnimatorKind, Connector};
use crate::animator::{Animator, AnimatorFunction, TimePeriod};
use crate::config::Config;
use crate::double_buffered::SceneBuffers;
use crate::ids::{AnimationId, IdAllocator, ObjectId};
use crate::keyframes::{Interpolation, KeyFrames};
use crate::messages::{MessageQueue, UpdateMessage};
use crate::object::{EventServices, Object, TypeSchema};
use crate::outputs::{CoreEvent, Outputs};
use crate::path::Path;
use crate::playlist::AnimationPlaylist;
use crate::scene_animation::{EndAction, SceneAnimationSpec};
use crate::update_manager::UpdateManager;

/// One animatable property slot on one object, as addressed by an animate
/// call. `component` selects a single lane of a composite property.
#[derive(Copy, Clone, Debug)]
pub struct PropertyTarget {
    pub object: ObjectId,
    pub index: PropertyIndex,
    pub component: ComponentIndex,
}

impl PropertyTarget {
    pub fn whole(object: ObjectId, index: PropertyIndex) -> Self {
        Self {
            object,
            index,
            component: None,
        }
    }

    pub fn component(object: ObjectId, index: PropertyIndex, lane: u8) -> Self {
        Self {
            object,
            index,
            component: Some(lane),
        }
    }
}

/// Optional per-connector overrides; defaults fall back to the animation's
/// default alpha and full duration.
#[derive(Clone, Debug, Default)]
pub struct AnimateOptions {
    pub alpha: Option<AlphaFunction>,
    pub time_period: Option<TimePeriod>,
}

enum PlayKind {
    Play,
    PlayFrom(f32),
    PlayAfter(f32),
}

pub struct Core {
    ids: IdAllocator,
    objects: HashMap<ObjectId, Object>,
    animations: HashMap<AnimationId, Animation>,
    playlist: AnimationPlaylist,
    queue: MessageQueue,
    update: UpdateManager,
    buffers: SceneBuffers,
    outputs: Outputs,
    /// Events raised by event-side calls between traversals; folded into the
    /// next tick's outputs.
    pending_events: Vec<CoreEvent>,
}

impl Core {
    pub fn new(cfg: Config) -> Self {
        Self {
            ids: IdAllocator::new(),
            objects: HashMap::with_capacity(cfg.object_capacity),
            animations: HashMap::with_capacity(cfg.animation_capacity),
            playlist: AnimationPlaylist::new(),
            queue: MessageQueue::with_capacity(cfg.message_capacity),
            update: UpdateManager::with_capacity(cfg.object_capacity, cfg.animation_capacity),
            buffers: SceneBuffers::new(),
            outputs: Outputs::default(),
            pending_events: Vec::new(),
        }
    }

    // ----- objects & properties -------------------------------------------

    pub fn create_object(&mut self, schema: TypeSchema) -> ObjectId {
        let id = self.ids.alloc_object();
        let mut services = EventServices {
            ids: &mut self.ids,
            queue: &mut self.queue,
        };
        let object = Object::new(id, schema, &mut services);
        self.objects.insert(id, object);
        id
    }

    /// Enqueue deferred destruction; animators targeting the object observe
    /// it at the next traversal and become no-ops.
    pub fn destroy_object(&mut self, id: ObjectId) {
        if self.objects.remove(&id).is_some() {
            self.queue
                .push(UpdateMessage::DestroyPropertyOwner { owner: id });
        }
    }

    /// Register an animatable per-instance property (the common case).
    pub fn register_property(
        &mut self,
        object: ObjectId,
        name: &str,
        value: PropertyValue,
    ) -> Option<PropertyIndex> {
        self.register_property_with(object, name, None, value, AccessMode::Animatable)
    }

    /// Full registration form: optional integer key and explicit access mode.
    /// Idempotent: re-registering an existing name/key sets the value
    /// instead.
    pub fn register_property_with(
        &mut self,
        object: ObjectId,
        name: &str,
        key: Option<i32>,
        value: PropertyValue,
        access: AccessMode,
    ) -> Option<PropertyIndex> {
        let entry = self.objects.get_mut(&object)?;
        let mut services = EventServices {
            ids: &mut self.ids,
            queue: &mut self.queue,
        };
        let (index, set) = entry.register_property(name, key, value, access, &mut services);
        if set {
            self.pending_events
                .push(CoreEvent::PropertySet { object, index });
        }
        Some(index)
    }

    pub fn set_property(&mut self, object: ObjectId, index: PropertyIndex, value: PropertyValue) {
        let Some(entry) = self.objects.get_mut(&object) else {
            warn!("set_property: unknown object {object:?}");
            return;
        };
        let mut services = EventServices {
            ids: &mut self.ids,
            queue: &mut self.queue,
        };
        if entry.set_property(index, value, &mut services) {
            self.pending_events
                .push(CoreEvent::PropertySet { object, index });
        }
    }

    /// Event-side cached value; lags the live value while animating.
    pub fn get_property(&self, object: ObjectId, index: PropertyIndex) -> PropertyValue {
        self.objects
            .get(&object)
            .map(|o| o.get_property(index))
            .unwrap_or(PropertyValue::None)
    }

    /// Live double-buffered value at the event buffer index.
    pub fn get_current_property(&self, object: ObjectId, index: PropertyIndex) -> PropertyValue {
        self.objects
            .get(&object)
            .map(|o| o.get_current_property(index, &self.update, self.buffers.event_index()))
            .unwrap_or(PropertyValue::None)
    }

    /// Render-role read: the most recently published slot, fixed for the
    /// whole render pass.
    pub fn render_value(&self, object: ObjectId, index: PropertyIndex) -> PropertyValue {
        self.objects
            .get(&object)
            .map(|o| o.get_current_property(index, &self.update, self.buffers.render_index()))
            .unwrap_or(PropertyValue::None)
    }

    pub fn property_type(&self, object: ObjectId, index: PropertyIndex) -> PropertyType {
        self.objects
            .get(&object)
            .map(|o| o.property_type(index))
            .unwrap_or(PropertyType::None)
    }

    pub fn is_property_writable(&self, object: ObjectId, index: PropertyIndex) -> bool {
        self.objects
            .get(&object)
            .map(|o| o.is_property_writable(index))
            .unwrap_or(false)
    }

    pub fn is_property_animatable(&self, object: ObjectId, index: PropertyIndex) -> bool {
        self.objects
            .get(&object)
            .map(|o| o.is_property_animatable(index))
            .unwrap_or(false)
    }

    pub fn is_property_a_constraint_input(&self, object: ObjectId, index: PropertyIndex) -> bool {
        self.objects
            .get(&object)
            .map(|o| o.is_property_a_constraint_input(index))
            .unwrap_or(false)
    }

    pub fn property_index(&self, object: ObjectId, key: &PropertyKey) -> Option<PropertyIndex> {
        self.objects.get(&object)?.property_index(key)
    }

    pub fn property_name(&self, object: ObjectId, index: PropertyIndex) -> Option<String> {
        self.objects
            .get(&object)?
            .property_name(index)
            .map(str::to_string)
    }

    pub fn property_indices(&self, object: ObjectId) -> Vec<PropertyIndex> {
        self.objects
            .get(&object)
            .map(|o| o.property_indices())
            .unwrap_or_default()
    }

    // ----- animations ------------------------------------------------------

    pub fn create_animation(&mut self, duration_seconds: f32) -> AnimationId {
        let id = self.ids.alloc_animation();
        let animation = Animation::new(id, duration_seconds);
        self.queue.push(UpdateMessage::CreateAnimation {
            animation: id,
            spec: scene_spec(&animation),
        });
        self.playlist.animation_created(id);
        self.animations.insert(id, animation);
        id
    }

    /// Disconnect from the playlist, then enqueue scene-side destruction.
    pub fn destroy_animation(&mut self, id: AnimationId) {
        if self.animations.remove(&id).is_some() {
            self.playlist.animation_destroyed(id);
            self.queue.push(UpdateMessage::DestroyAnimation { animation: id });
        }
    }

    pub fn animation_state(&self, id: AnimationId) -> Option<AnimationState> {
        self.animations.get(&id).map(|a| a.state())
    }

    pub fn animation_duration(&self, id: AnimationId) -> Option<f32> {
        self.animations.get(&id).map(|a| a.duration())
    }

    pub fn set_duration(&mut self, id: AnimationId, seconds: f32) {
        if let Some(animation) = self.animations.get_mut(&id) {
            let actual = animation.set_duration(seconds);
            self.queue.push(UpdateMessage::SetDuration {
                animation: id,
                seconds: actual,
            });
        }
    }

    pub fn set_loop_count(&mut self, id: AnimationId, count: i32) {
        if let Some(animation) = self.animations.get_mut(&id) {
            animation.set_loop_count(count);
            self.queue.push(UpdateMessage::SetLoopCount {
                animation: id,
                count: animation.loop_count(),
            });
        }
    }

    pub fn set_looping(&mut self, id: AnimationId, on: bool) {
        self.set_loop_count(id, if on { 0 } else { 1 });
    }

    pub fn set_play_range(&mut self, id: AnimationId, range: [f32; 2]) {
        if let Some(animation) = self.animations.get_mut(&id) {
            if let Some(ordered) = animation.set_play_range(range) {
                self.queue.push(UpdateMessage::SetPlayRange {
                    animation: id,
                    range: ordered,
                });
            }
        }
    }

    pub fn set_speed_factor(&mut self, id: AnimationId, factor: f32) {
        if let Some(animation) = self.animations.get_mut(&id) {
            animation.set_speed_factor(factor);
            self.queue.push(UpdateMessage::SetSpeedFactor {
                animation: id,
                factor,
            });
        }
    }

    pub fn set_end_action(&mut self, id: AnimationId, action: EndAction) {
        if let Some(animation) = self.animations.get_mut(&id) {
            animation.set_end_action(action);
            self.queue.push(UpdateMessage::SetEndAction {
                animation: id,
                action,
            });
        }
    }

    pub fn set_disconnect_action(&mut self, id: AnimationId, action: EndAction) {
        if let Some(animation) = self.animations.get_mut(&id) {
            animation.set_disconnect_action(action);
            self.queue.push(UpdateMessage::SetDisconnectAction {
                animation: id,
                action,
            });
        }
    }

    /// Auto-reverse alternates direction on every loop iteration.
    pub fn set_looping_mode(&mut self, id: AnimationId, auto_reverse: bool) {
        if let Some(animation) = self.animations.get_mut(&id) {
            animation.set_auto_reverse(auto_reverse);
            self.queue.push(UpdateMessage::SetLoopingMode {
                animation: id,
                auto_reverse,
            });
        }
    }

    pub fn set_default_alpha(&mut self, id: AnimationId, alpha: AlphaFunction) {
        if let Some(animation) = self.animations.get_mut(&id) {
            animation.set_default_alpha(alpha);
        }
    }

    /// One progress-reached signal per play cycle once normalized progress
    /// crosses `progress`.
    pub fn set_progress_notification(&mut self, id: AnimationId, progress: f32) {
        if let Some(animation) = self.animations.get_mut(&id) {
            animation.set_progress_notification(progress);
        }
    }

    pub fn set_current_progress(&mut self, id: AnimationId, progress: f32) {
        if let Some(animation) = self.animations.get(&id) {
            let range = animation.play_range();
            if progress >= range[0] && progress <= range[1] {
                self.queue.push(UpdateMessage::SetCurrentProgress {
                    animation: id,
                    seconds: progress * animation.duration(),
                });
            }
        }
    }

    /// Normalized scene-side progress.
    pub fn current_progress(&self, id: AnimationId) -> f32 {
        let Some(animation) = self.animations.get(&id) else {
            return 0.0;
        };
        let duration = animation.duration();
        if duration <= 0.0 {
            return 0.0;
        }
        self.update
            .scene_animation(id)
            .map(|s| s.elapsed() / duration)
            .unwrap_or(0.0)
    }

    pub fn current_loop(&self, id: AnimationId) -> i32 {
        self.update.current_loop(id).unwrap_or(0)
    }

    // ----- animate calls ---------------------------------------------------

    /// Animate a property toward a fixed target value.
    pub fn animate_to(
        &mut self,
        id: AnimationId,
        target: PropertyTarget,
        value: PropertyValue,
        options: AnimateOptions,
    ) -> bool {
        self.connect(
            id,
            target,
            value.clone(),
            AnimatorKind::To,
            options,
            AnimatorFunction::To { target: value },
        )
    }

    /// Animate a property by a relative amount.
    pub fn animate_by(
        &mut self,
        id: AnimationId,
        target: PropertyTarget,
        delta: PropertyValue,
        options: AnimateOptions,
    ) -> bool {
        self.connect(
            id,
            target,
            delta.clone(),
            AnimatorKind::By,
            options,
            AnimatorFunction::By { relative: delta },
        )
    }

    /// Animate a property between keyframes.
    pub fn animate_between(
        &mut self,
        id: AnimationId,
        target: PropertyTarget,
        key_frames: KeyFrames,
        interpolation: Interpolation,
        options: AnimateOptions,
    ) -> bool {
        if key_frames.is_empty() {
            warn!("animate_between: empty keyframe track; ignored");
            return false;
        }
        let settle = key_frames.sample(1.0, interpolation);
        self.connect(
            id,
            target,
            settle,
            AnimatorKind::Between,
            options,
            AnimatorFunction::Between {
                key_frames,
                interpolation,
            },
        )
    }

    /// Animate a Vec3 position property (and optionally a rotation property)
    /// along a path. `forward` derives the orientation; a zero forward vector
    /// skips the rotation animator.
    pub fn animate_along_path(
        &mut self,
        id: AnimationId,
        object: ObjectId,
        position_index: PropertyIndex,
        orientation_index: Option<PropertyIndex>,
        path: Path,
        forward: [f32; 3],
        options: AnimateOptions,
    ) -> bool {
        if !path.is_complete() {
            warn!("animate_along_path: path is missing control points; ignored");
            return false;
        }

        let position_ok = self.connect_function(
            id,
            PropertyTarget::whole(object, position_index),
            PropertyType::Vec3,
            AnimatorFunction::PathPosition { path: path.clone() },
            options.clone(),
        );

        let rotate = forward != [0.0, 0.0, 0.0];
        if let (true, Some(orientation_index)) = (rotate, orientation_index) {
            let _ = self.connect_function(
                id,
                PropertyTarget::whole(object, orientation_index),
                PropertyType::Rotation,
                AnimatorFunction::PathOrientation { path, forward },
                options,
            );
        }
        position_ok
    }

    /// Common validation and wiring for To/By/Between.
    fn connect(
        &mut self,
        id: AnimationId,
        target: PropertyTarget,
        target_value: PropertyValue,
        kind: AnimatorKind,
        options: AnimateOptions,
        function: AnimatorFunction,
    ) -> bool {
        let Some(declared) = self.declared_type(target) else {
            return false;
        };
        if let Err(error) = target_value.ensure_animates(declared) {
            warn!("animate call rejected: {error}");
            return false;
        }
        let Some((alpha, period)) = self.resolve_alpha_period(id, &options) else {
            return false;
        };
        if !self.install_animator(id, target, function, alpha, period) {
            return false;
        }
        if let Some(animation) = self.animations.get_mut(&id) {
            animation.add_connector(
                Connector {
                    object: target.object,
                    index: target.index,
                    component: target.component,
                },
                target_value,
                period,
                kind,
            );
        }
        true
    }

    /// Wiring for path animators: expected type comes from the functor, and
    /// no ledger entry is recorded (paths have no single settle value).
    fn connect_function(
        &mut self,
        id: AnimationId,
        target: PropertyTarget,
        expected: PropertyType,
        function: AnimatorFunction,
        options: AnimateOptions,
    ) -> bool {
        let Some(declared) = self.declared_type(target) else {
            return false;
        };
        if declared != expected {
            warn!("animate call rejected: property is {declared:?}, expected {expected:?}");
            return false;
        }
        let Some((alpha, period)) = self.resolve_alpha_period(id, &options) else {
            return false;
        };
        self.install_animator(id, target, function, alpha, period)
    }

    /// Declared type of the animate target: `Float` when a component lane is
    /// addressed, the property's type otherwise.
    fn declared_type(&self, target: PropertyTarget) -> Option<PropertyType> {
        let property_type = self.property_type(target.object, target.index);
        match target.component {
            Some(lane) => {
                if lane >= property_type.component_count() {
                    warn!(
                        "animate call rejected: {property_type:?} has no component {lane}"
                    );
                    return None;
                }
                Some(PropertyType::Float)
            }
            None => {
                if property_type == PropertyType::None {
                    warn!(
                        "animate call rejected: unknown property index {}",
                        target.index.0
                    );
                    return None;
                }
                Some(property_type)
            }
        }
    }

    /// Resolve the per-connector overrides against the animation's defaults;
    /// negative window values are clamped to zero with a warning.
    fn resolve_alpha_period(
        &self,
        id: AnimationId,
        options: &AnimateOptions,
    ) -> Option<(AlphaFunction, TimePeriod)> {
        let Some(animation) = self.animations.get(&id) else {
            warn!("animate call on unknown animation {id:?}");
            return None;
        };
        let alpha = options.alpha.unwrap_or(animation.default_alpha());
        let mut period = options
            .time_period
            .unwrap_or_else(|| TimePeriod::new(animation.duration()));
        if period.duration < 0.0 {
            warn!(
                "animator duration {} is negative; clamping to 0",
                period.duration
            );
            period.duration = 0.0;
        }
        if period.delay < 0.0 {
            warn!("animator delay {} is negative; clamping to 0", period.delay);
            period.delay = 0.0;
        }
        Some((alpha, period))
    }

    fn install_animator(
        &mut self,
        id: AnimationId,
        target: PropertyTarget,
        function: AnimatorFunction,
        alpha: AlphaFunction,
        period: TimePeriod,
    ) -> bool {
        let Some(object) = self.objects.get_mut(&target.object) else {
            warn!("animate call on unknown object {:?}", target.object);
            return false;
        };
        let mut services = EventServices {
            ids: &mut self.ids,
            queue: &mut self.queue,
        };
        let Some(scene_ref) = object.ensure_animatable_registered(target.index, &mut services)
        else {
            warn!(
                "animate call rejected: property {} is not animatable",
                target.index.0
            );
            return false;
        };

        // A component request on a whole property narrows the write; a
        // component-view registration already carries its lane.
        let component = target.component.or(scene_ref.component);

        if let Some(animation) = self.animations.get_mut(&id) {
            if let Some(extended) = animation.extend_duration(period) {
                self.queue.push(UpdateMessage::SetDuration {
                    animation: id,
                    seconds: extended,
                });
            }
        }

        self.queue.push(UpdateMessage::AddAnimator {
            animation: id,
            animator: Animator::new(
                target.object,
                scene_ref.scene_property,
                component,
                function,
                alpha,
                period,
            ),
        });
        true
    }

    // ----- playback --------------------------------------------------------

    pub fn play(&mut self, id: AnimationId) {
        self.play_internal(id, PlayKind::Play);
    }

    /// Start from a normalized progress inside the play range; out-of-range
    /// requests are ignored.
    pub fn play_from(&mut self, id: AnimationId, progress: f32) {
        let Some(animation) = self.animations.get(&id) else {
            return;
        };
        let range = animation.play_range();
        if progress < range[0] || progress > range[1] {
            warn!("play_from: progress {progress} outside play range {range:?}");
            return;
        }
        self.play_internal(id, PlayKind::PlayFrom(progress));
    }

    /// Start after a delay; a negative delay plays immediately.
    pub fn play_after(&mut self, id: AnimationId, delay_seconds: f32) {
        self.play_internal(id, PlayKind::PlayAfter(delay_seconds.max(0.0)));
    }

    fn play_internal(&mut self, id: AnimationId, kind: PlayKind) {
        let Some(animation) = self.animations.get_mut(&id) else {
            warn!("play: unknown animation {id:?}");
            return;
        };
        if !animation.request_play() {
            return;
        }

        // Notify targets of their settled values in end-time order, unless
        // the animation discards on finish.
        let _ = animation.sorted_targets();
        let notifications: Vec<(ObjectId, PropertyIndex, PropertyValue, AnimatorKind)> =
            if animation.end_action() != EndAction::Discard {
                animation
                    .targets()
                    .iter()
                    .map(|entry| {
                        let connector = &animation.connectors()[entry.connector];
                        (
                            connector.object,
                            connector.index,
                            entry.target_value.clone(),
                            entry.kind,
                        )
                    })
                    .collect()
            } else {
                Vec::new()
            };
        let marker = animation.progress_marker();
        let marker_seconds = animation.duration() * marker;

        for (object, index, value, kind) in notifications {
            if let Some(entry) = self.objects.get_mut(&object) {
                entry.notify_property_animation(index, &value, kind);
            }
        }

        self.playlist.on_play(id);
        if marker > 0.0 {
            self.queue.push(UpdateMessage::SetProgressMarker {
                animation: id,
                seconds: marker_seconds,
            });
        }
        self.queue.push(match kind {
            PlayKind::Play => UpdateMessage::PlayAnimation { animation: id },
            PlayKind::PlayFrom(progress) => UpdateMessage::PlayAnimationFrom {
                animation: id,
                progress,
            },
            PlayKind::PlayAfter(delay) => UpdateMessage::PlayAnimationAfter {
                animation: id,
                delay,
            },
        });
    }

    pub fn pause(&mut self, id: AnimationId) {
        if let Some(animation) = self.animations.get_mut(&id) {
            if animation.request_pause() {
                self.queue
                    .push(UpdateMessage::PauseAnimation { animation: id });
            }
        }
    }

    pub fn stop(&mut self, id: AnimationId) {
        if let Some(animation) = self.animations.get_mut(&id) {
            if animation.request_stop() {
                self.queue
                    .push(UpdateMessage::StopAnimation { animation: id });
            }
        }
    }

    /// Drop all connectors and replace the scene-side object with a fresh
    /// one that has never been played.
    pub fn clear(&mut self, id: AnimationId) {
        if let Some(animation) = self.animations.get_mut(&id) {
            animation.clear();
            self.queue
                .push(UpdateMessage::DestroyAnimation { animation: id });
            self.queue.push(UpdateMessage::CreateAnimation {
                animation: id,
                spec: scene_spec(animation),
            });
            self.playlist.on_clear(id);
        }
    }

    /// Notification order of the ledger, for tooling and tests.
    pub fn notification_order(&mut self, id: AnimationId) -> Vec<PropertyIndex> {
        let Some(animation) = self.animations.get_mut(&id) else {
            return Vec::new();
        };
        let _ = animation.sorted_targets();
        animation
            .targets()
            .iter()
            .map(|entry| animation.connectors()[entry.connector].index)
            .collect()
    }

    // ----- the frame loop --------------------------------------------------

    /// One update-role traversal. Messages enqueued since the previous call
    /// are applied, in order, before any property reset or animator advance,
    /// so a write issued this frame is visible to this frame's evaluation.
    pub fn update(&mut self, dt: f32) -> &Outputs {
        self.outputs.clear();
        self.outputs.events.append(&mut self.pending_events);

        self.update.begin_frame();
        let buffer = self.buffers.update_index();

        for message in self.queue.drain() {
            self.update.apply(message, buffer);
        }

        self.update.reset_properties(buffer);

        let ticks = self.update.update_animations(buffer, dt);
        for (id, tick) in ticks {
            if tick.progress_reached {
                self.outputs
                    .push_event(CoreEvent::ProgressReached { animation: id });
            }
        }

        // Finish sweep: poll the played counter of every unresolved play
        // cycle; each increment owes exactly one finished signal.
        for id in self.playlist.playing() {
            let Some(count) = self.update.played_count(id) else {
                continue;
            };
            let Some(animation) = self.animations.get_mut(&id) else {
                self.playlist.on_stopped(id);
                continue;
            };
            if animation.has_finished(count) {
                self.outputs.push_event(CoreEvent::Finished { animation: id });
                if animation.state() != AnimationState::Playing {
                    self.playlist.on_stopped(id);
                }
            }
        }

        self.buffers.swap();
        &self.outputs
    }
}

fn scene_spec(animation: &Animation) -> SceneAnimationSpec {
    SceneAnimationSpec {
        duration: animation.duration(),
        speed_factor: animation.speed_factor(),
        play_range: animation.play_range(),
        loop_count: animation.loop_count(),
        end_action: animation.end_action(),
        disconnect_action: animation.disconnect_action(),
    }
}
