//! Event-side animation record: the play/pause/stop state machine, the
//! connector ledger, and finish-notification bookkeeping.
//!
//! A stop is not instantaneous, since the scene side must let the in-flight
//! frame settle. A play or pause arriving while a stop is pending is remembered
//! in a `*DuringStopping` state and re-applied once the scene confirms the
//! stop through its played counter.

use log::warn;
use serde::{Deserialize, Serialize};

use arbor_api_core::{ComponentIndex, PropertyIndex, PropertyValue};

use crate::alpha::AlphaFunction;
use crate::animator::TimePeriod;
use crate::ids::{AnimationId, ObjectId};
use crate::scene_animation::EndAction;

/// How a connector drives its target; decides how a settled value is pushed
/// into the owner's cache.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AnimatorKind {
    To,
    By,
    Between,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AnimationState {
    /// Initial, or after `clear`.
    Cleared,
    Stopped,
    Playing,
    Paused,
    /// Stop requested; awaiting scene confirmation.
    Stopping,
    /// Play arrived while a stop was pending.
    PlayingDuringStopping,
    /// Pause arrived while a stop was pending.
    PausedDuringStopping,
}

/// Event-side record of one animator binding.
#[derive(Clone, Debug)]
pub struct Connector {
    pub object: ObjectId,
    pub index: PropertyIndex,
    pub component: ComponentIndex,
}

/// Ledger entry paired with a connector: the value the target settles on and
/// the window deciding notification order.
#[derive(Clone, Debug)]
pub struct TargetEntry {
    pub connector: usize,
    pub target_value: PropertyValue,
    pub time_period: TimePeriod,
    pub kind: AnimatorKind,
}

#[derive(Debug)]
pub struct Animation {
    id: AnimationId,
    duration: f32,
    default_alpha: AlphaFunction,
    loop_count: i32,
    play_range: [f32; 2],
    speed_factor: f32,
    end_action: EndAction,
    disconnect_action: EndAction,
    auto_reverse: bool,
    /// Normalized progress at which one progress-reached signal fires per
    /// play cycle; 0 disables it.
    progress_marker: f32,
    state: AnimationState,
    notification_count: i32,
    connectors: Vec<Connector>,
    target_values: Vec<TargetEntry>,
    /// Cleared when an entry with an earlier-or-equal end time is appended
    /// after a later one; the notify pass then re-sorts lazily.
    targets_sorted: bool,
}

impl Animation {
    pub fn new(id: AnimationId, duration_seconds: f32) -> Self {
        let duration = if duration_seconds < 0.0 {
            warn!("animation duration {duration_seconds} is negative; clamping to 0");
            0.0
        } else {
            duration_seconds
        };
        Self {
            id,
            duration,
            default_alpha: AlphaFunction::Default,
            loop_count: 1,
            play_range: [0.0, 1.0],
            speed_factor: 1.0,
            end_action: EndAction::Bake,
            disconnect_action: EndAction::BakeFinal,
            auto_reverse: false,
            progress_marker: 0.0,
            state: AnimationState::Cleared,
            notification_count: 0,
            connectors: Vec::new(),
            target_values: Vec::new(),
            targets_sorted: true,
        }
    }

    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Clamps negative durations to zero with a warning.
    pub fn set_duration(&mut self, seconds: f32) -> f32 {
        if seconds < 0.0 {
            warn!("animation duration {seconds} is negative; clamping to 0");
            self.duration = 0.0;
        } else {
            self.duration = seconds;
        }
        self.duration
    }

    /// Grow the duration to cover a connector's full window.
    pub fn extend_duration(&mut self, period: TimePeriod) -> Option<f32> {
        let end = period.end_time();
        if end > self.duration {
            self.duration = end;
            return Some(end);
        }
        None
    }

    pub fn default_alpha(&self) -> AlphaFunction {
        self.default_alpha
    }

    pub fn set_default_alpha(&mut self, alpha: AlphaFunction) {
        self.default_alpha = alpha;
    }

    pub fn loop_count(&self) -> i32 {
        self.loop_count
    }

    /// 0 means loop forever.
    pub fn set_loop_count(&mut self, count: i32) {
        self.loop_count = count.max(0);
    }

    pub fn is_looping(&self) -> bool {
        self.loop_count != 1
    }

    pub fn play_range(&self) -> [f32; 2] {
        self.play_range
    }

    /// Accepts only values inside [0,1]; a reversed pair is re-ordered.
    /// Returns the range actually stored, `None` when rejected.
    pub fn set_play_range(&mut self, range: [f32; 2]) -> Option<[f32; 2]> {
        if !(0.0..=1.0).contains(&range[0]) || !(0.0..=1.0).contains(&range[1]) {
            warn!("play range {range:?} outside [0,1]; ignored");
            return None;
        }
        let ordered = if range[0] > range[1] {
            [range[1], range[0]]
        } else {
            range
        };
        self.play_range = ordered;
        Some(ordered)
    }

    pub fn speed_factor(&self) -> f32 {
        self.speed_factor
    }

    pub fn set_speed_factor(&mut self, factor: f32) {
        self.speed_factor = factor;
    }

    pub fn end_action(&self) -> EndAction {
        self.end_action
    }

    pub fn set_end_action(&mut self, action: EndAction) {
        self.end_action = action;
    }

    pub fn disconnect_action(&self) -> EndAction {
        self.disconnect_action
    }

    pub fn set_disconnect_action(&mut self, action: EndAction) {
        self.disconnect_action = action;
    }

    pub fn auto_reverse(&self) -> bool {
        self.auto_reverse
    }

    pub fn set_auto_reverse(&mut self, on: bool) {
        self.auto_reverse = on;
    }

    pub fn progress_marker(&self) -> f32 {
        self.progress_marker
    }

    /// Progress in (0,1] at which the progress-reached signal fires; values
    /// outside that window disable the marker.
    pub fn set_progress_notification(&mut self, progress: f32) {
        self.progress_marker = if (0.0..=1.0).contains(&progress) {
            progress
        } else {
            0.0
        };
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Ledger entries in their current order; call [`Self::sorted_targets`]
    /// first when notification order matters.
    pub fn targets(&self) -> &[TargetEntry] {
        &self.target_values
    }

    /// Record one connector and its ledger entry.
    pub fn add_connector(
        &mut self,
        connector: Connector,
        target_value: PropertyValue,
        time_period: TimePeriod,
        kind: AnimatorKind,
    ) {
        if let Some(last) = self.target_values.last() {
            if time_period.end_time() <= last.time_period.end_time() {
                self.targets_sorted = false;
            }
        }
        self.target_values.push(TargetEntry {
            connector: self.connectors.len(),
            target_value,
            time_period,
            kind,
        });
        self.connectors.push(connector);
    }

    /// Ledger entries in notification order: increasing end time, stable.
    /// Re-sorted only when an out-of-order append happened.
    pub fn sorted_targets(&mut self) -> &[TargetEntry] {
        if !self.targets_sorted {
            self.target_values.sort_by(|a, b| {
                a.time_period
                    .end_time()
                    .partial_cmp(&b.time_period.end_time())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            self.targets_sorted = true;
        }
        &self.target_values
    }

    /// Apply a play request. Returns true when the request takes effect and
    /// the caller should notify targets and message the scene.
    pub fn request_play(&mut self) -> bool {
        match self.state {
            AnimationState::Cleared | AnimationState::Stopped | AnimationState::Paused => {
                self.state = AnimationState::Playing;
                true
            }
            AnimationState::Stopping | AnimationState::PausedDuringStopping => {
                self.state = AnimationState::PlayingDuringStopping;
                true
            }
            AnimationState::Playing | AnimationState::PlayingDuringStopping => false,
        }
    }

    /// Apply a pause request; true when the scene should be messaged.
    pub fn request_pause(&mut self) -> bool {
        match self.state {
            AnimationState::Cleared
            | AnimationState::Stopped
            | AnimationState::Paused
            | AnimationState::Playing => {
                self.state = AnimationState::Paused;
                true
            }
            AnimationState::Stopping
            | AnimationState::PausedDuringStopping
            | AnimationState::PlayingDuringStopping => {
                self.state = AnimationState::PausedDuringStopping;
                true
            }
        }
    }

    /// Apply a stop request; true when a stop message is owed. A stop that is
    /// already pending queues nothing further.
    pub fn request_stop(&mut self) -> bool {
        match self.state {
            AnimationState::Playing | AnimationState::PlayingDuringStopping => {
                self.state = AnimationState::Stopping;
                true
            }
            _ => false,
        }
    }

    /// Compare the scene's played counter with the last seen notification
    /// count. On increment, resolve any pending stop and report that exactly
    /// one finished signal is owed, even if the animation looped several
    /// times within the cycle.
    pub fn has_finished(&mut self, scene_played_count: i32) -> bool {
        if scene_played_count > self.notification_count {
            self.notification_count = scene_played_count;
            self.state = match self.state {
                // A superseding play is still running.
                AnimationState::PlayingDuringStopping => AnimationState::Playing,
                AnimationState::PausedDuringStopping => AnimationState::Paused,
                _ => AnimationState::Stopped,
            };
            return true;
        }
        false
    }

    /// Drop connectors and ledger; the caller replaces the scene-side object
    /// and re-registers with the playlist.
    pub fn clear(&mut self) {
        self.connectors.clear();
        self.target_values.clear();
        self.targets_sorted = true;
        self.notification_count = 0;
        self.state = AnimationState::Cleared;
    }
}
