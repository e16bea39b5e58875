//! Update-role animation: advances elapsed time under speed factor, play
//! range and loop count, drives its animators, and reports loop/finish/
//! progress edges back to the event role through the played counter.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::animator::Animator;
use crate::double_buffered::BufferIndex;
use crate::ids::ObjectId;
use crate::property_owner::PropertyOwner;

/// What value each connected property keeps when the animation finishes
/// naturally (`Bake`/`Discard`) or when its target leaves the scene
/// mid-animation (`BakeFinal`).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum EndAction {
    /// Keep the value the animation reached.
    Bake,
    /// Revert to the pre-animation base value.
    Discard,
    /// Force evaluation to the final target, then bake.
    BakeFinal,
}

/// Construction-time parameters mirrored from the event side.
#[derive(Clone, Debug)]
pub struct SceneAnimationSpec {
    pub duration: f32,
    pub speed_factor: f32,
    pub play_range: [f32; 2],
    pub loop_count: i32,
    pub end_action: EndAction,
    pub disconnect_action: EndAction,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum State {
    Stopped,
    Playing,
    Paused,
}

/// Per-tick edges reported to the caller.
#[derive(Copy, Clone, Debug, Default)]
pub struct AnimationTick {
    pub looped: bool,
    pub finished: bool,
    pub progress_reached: bool,
}

#[derive(Debug)]
pub struct SceneAnimation {
    duration: f32,
    speed_factor: f32,
    play_range: [f32; 2],
    loop_count: i32,
    current_loop: i32,
    end_action: EndAction,
    disconnect_action: EndAction,
    auto_reverse: bool,
    elapsed: f32,
    delay: f32,
    progress_marker: f32,
    progress_signal_required: bool,
    played_count: i32,
    state: State,
    animators: Vec<Animator>,
}

const FORCE_PAST_END: f32 = 1e-4;

impl SceneAnimation {
    pub fn new(spec: SceneAnimationSpec) -> Self {
        Self {
            duration: spec.duration,
            speed_factor: spec.speed_factor,
            play_range: spec.play_range,
            loop_count: spec.loop_count,
            current_loop: 0,
            end_action: spec.end_action,
            disconnect_action: spec.disconnect_action,
            auto_reverse: false,
            elapsed: spec.play_range[0] * spec.duration,
            delay: 0.0,
            progress_marker: 0.0,
            progress_signal_required: false,
            played_count: 0,
            state: State::Stopped,
            animators: Vec::new(),
        }
    }

    pub fn played_count(&self) -> i32 {
        self.played_count
    }

    pub fn current_loop(&self) -> i32 {
        self.current_loop
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_active(&self) -> bool {
        self.state == State::Playing
    }

    pub fn add_animator(&mut self, animator: Animator) {
        self.animators.push(animator);
    }

    pub fn set_duration(&mut self, seconds: f32) {
        self.duration = seconds;
    }

    pub fn set_loop_count(&mut self, count: i32) {
        self.loop_count = count;
        self.current_loop = 0;
    }

    pub fn set_speed_factor(&mut self, factor: f32) {
        self.speed_factor = factor;
    }

    pub fn set_end_action(&mut self, action: EndAction) {
        self.end_action = action;
    }

    pub fn set_disconnect_action(&mut self, action: EndAction) {
        self.disconnect_action = action;
    }

    pub fn set_looping_mode(&mut self, auto_reverse: bool) {
        self.auto_reverse = auto_reverse;
    }

    pub fn set_progress_marker(&mut self, seconds: f32) {
        self.progress_marker = seconds;
        self.progress_signal_required = seconds > 0.0;
    }

    pub fn set_current_progress(&mut self, seconds: f32) {
        self.elapsed = seconds;
    }

    /// While stopped the cursor jumps to the range start; while playing it is
    /// clamped into the new range so the next update settles naturally.
    pub fn set_play_range(&mut self, range: [f32; 2]) {
        self.play_range = range;
        if self.state != State::Playing {
            self.elapsed = range[0] * self.duration;
        } else {
            self.elapsed = self
                .elapsed
                .clamp(range[0] * self.duration, range[1] * self.duration);
        }
    }

    pub fn play(&mut self) {
        // Earlier end times notify first; equal end times keep insertion order.
        self.animators.sort_by(|a, b| {
            a.end_time()
                .partial_cmp(&b.end_time())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        self.state = State::Playing;
        if self.speed_factor < 0.0 && self.elapsed <= self.play_range[0] * self.duration {
            self.elapsed = self.play_range[1] * self.duration;
        }
        self.set_animators_active(true);
        self.current_loop = 0;
        self.progress_signal_required = self.progress_marker > 0.0;
    }

    /// No effect while already playing; progress is guaranteed in range by
    /// the event side.
    pub fn play_from(&mut self, progress: f32) {
        if self.state != State::Playing {
            self.elapsed = progress * self.duration;
            self.state = State::Playing;
            self.set_animators_active(true);
        }
    }

    pub fn play_after(&mut self, delay: f32) {
        if self.state != State::Playing {
            self.delay = delay;
            self.state = State::Playing;
            if self.speed_factor < 0.0 && self.elapsed <= self.play_range[0] * self.duration {
                self.elapsed = self.play_range[1] * self.duration;
            }
            self.set_animators_active(true);
            self.current_loop = 0;
            self.progress_signal_required = self.progress_marker > 0.0;
        }
    }

    /// Pausing force-bakes every animator at its current point so a pause is
    /// never silently discarded, whatever the end action.
    pub fn pause(&mut self, owners: &mut HashMap<ObjectId, PropertyOwner>, buffer: BufferIndex) {
        if self.state == State::Playing {
            self.state = State::Paused;
            self.update_animators(owners, buffer, true, false);
        }
    }

    /// Returns true when a finish notification is owed to the event side.
    pub fn stop(
        &mut self,
        owners: &mut HashMap<ObjectId, PropertyOwner>,
        buffer: BufferIndex,
    ) -> bool {
        let mut finished = false;

        if self.state == State::Playing || self.state == State::Paused {
            finished = true;

            if self.end_action != EndAction::Discard {
                self.bake(owners, buffer, self.end_action);
            } else {
                self.set_animators_active(false);
            }

            // The animation has now been played to completion.
            self.played_count += 1;
            self.current_loop = 0;
        }

        self.elapsed = self.play_range[0] * self.duration;
        self.state = State::Stopped;

        finished
    }

    /// Apply the end action and evaluate. `BakeFinal` forces the cursor past
    /// the range end so every animator lands exactly on its target.
    pub fn bake(
        &mut self,
        owners: &mut HashMap<ObjectId, PropertyOwner>,
        buffer: BufferIndex,
        action: EndAction,
    ) {
        if action == EndAction::BakeFinal {
            if self.speed_factor > 0.0 {
                self.elapsed = self.play_range[1] * self.duration + FORCE_PAST_END;
            } else {
                self.elapsed = self.play_range[0] * self.duration - FORCE_PAST_END;
            }
        }
        self.update_animators(owners, buffer, true, true);
    }

    /// The animation's target owner is about to be destroyed: settle the
    /// animators bound to it per the disconnect action, then orphan them.
    pub fn disconnect_owner(
        &mut self,
        owner: ObjectId,
        owners: &mut HashMap<ObjectId, PropertyOwner>,
        buffer: BufferIndex,
    ) {
        let range = [
            self.play_range[0] * self.duration,
            self.play_range[1] * self.duration,
        ];
        let in_flight = self.state == State::Playing || self.state == State::Paused;
        for animator in &mut self.animators {
            if animator.owner != owner {
                continue;
            }
            if in_flight && self.disconnect_action != EndAction::Discard {
                let progress = animator_progress(
                    animator,
                    if self.disconnect_action == EndAction::BakeFinal {
                        range[1] + FORCE_PAST_END
                    } else {
                        self.elapsed.clamp(range[0], range[1])
                    },
                );
                animator.update(owners, buffer, progress, true);
            }
            animator.disable();
        }
    }

    /// Advance by `dt` seconds and drive the animators.
    pub fn update(
        &mut self,
        owners: &mut HashMap<ObjectId, PropertyOwner>,
        buffer: BufferIndex,
        dt: f32,
    ) -> AnimationTick {
        let mut tick = AnimationTick::default();

        if self.state == State::Stopped {
            return tick;
        }

        // The animation must still be applied while paused.
        if self.state == State::Playing {
            if self.delay > 0.0 {
                let reduce = (dt * self.speed_factor).abs();
                if reduce > self.delay {
                    let overshoot = reduce - self.delay;
                    if self.speed_factor < 0.0 {
                        self.elapsed -= overshoot;
                    } else {
                        self.elapsed += overshoot;
                    }
                    self.delay = 0.0;
                } else {
                    self.delay -= reduce;
                }
            } else {
                self.elapsed += dt * self.speed_factor;
            }

            if self.progress_signal_required && self.elapsed >= self.progress_marker {
                tick.progress_reached = true;
                self.progress_signal_required = false;
            }
        }

        let range = [
            self.play_range[0] * self.duration,
            self.play_range[1] * self.duration,
        ];
        let overran = (self.speed_factor > 0.0 && self.elapsed > range[1])
            || (self.speed_factor < 0.0 && self.elapsed < range[0]);

        if self.loop_count == 0 || self.current_loop < self.loop_count - 1 {
            // Looping iterations.
            tick.looped = self.state == State::Playing && overran;

            self.wrap_in_play_range(range);
            self.update_animators(owners, buffer, false, false);

            if tick.looped {
                if self.loop_count != 0 {
                    self.current_loop += 1;
                }
                self.progress_signal_required = self.progress_marker > 0.0;
                // The played counter waits for the final loop.
            }
        } else {
            // Final (or only) iteration.
            tick.finished = self.state == State::Playing && overran;

            self.update_animators(
                owners,
                buffer,
                tick.finished && self.end_action != EndAction::Discard,
                tick.finished,
            );

            if tick.finished {
                self.played_count += 1;
                if self.current_loop < self.loop_count {
                    self.current_loop += 1;
                }
                self.progress_signal_required = self.progress_marker > 0.0;
                self.elapsed = range[0];
                self.state = State::Stopped;
            }
        }

        tick
    }

    fn wrap_in_play_range(&mut self, range: [f32; 2]) {
        let span = range[1] - range[0];
        if span <= 0.0 {
            self.elapsed = range[0];
            return;
        }
        if self.elapsed > range[1] {
            self.elapsed = range[0] + (self.elapsed - range[1]) % span;
        } else if self.elapsed < range[0] {
            self.elapsed = range[1] - (range[0] - self.elapsed) % span;
        }
    }

    fn set_animators_active(&mut self, active: bool) {
        for animator in &mut self.animators {
            animator.set_active(active);
        }
    }

    fn update_animators(
        &mut self,
        owners: &mut HashMap<ObjectId, PropertyOwner>,
        buffer: BufferIndex,
        bake: bool,
        finished: bool,
    ) {
        let range = [
            self.play_range[0] * self.duration,
            self.play_range[1] * self.duration,
        ];
        let clamped = self.elapsed.clamp(range[0], range[1]);
        let reverse = self.auto_reverse && self.current_loop % 2 == 1;

        for animator in &mut self.animators {
            if !animator.is_enabled() {
                continue;
            }
            if clamped >= animator.time_period.delay || bake {
                let mut progress = animator_progress(animator, clamped);
                if reverse {
                    progress = 1.0 - progress;
                }
                animator.update(owners, buffer, progress, bake);
            }
            if finished {
                animator.set_active(false);
            }
        }
    }
}

/// Progress local to one animator's time window; immediate (zero-duration)
/// animators jump straight to 1.
fn animator_progress(animator: &Animator, elapsed: f32) -> f32 {
    let period = animator.time_period;
    if period.duration > 0.0 {
        ((elapsed - period.delay) / period.duration).clamp(0.0, 1.0)
    } else {
        1.0
    }
}
