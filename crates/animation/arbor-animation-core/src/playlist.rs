//! Process-wide registry of live animations, used to drive per-frame
//! finish-notification polling without per-animation timers.

use crate::ids::AnimationId;

#[derive(Debug, Default)]
pub struct AnimationPlaylist {
    live: Vec<AnimationId>,
    /// Animations with an unresolved play cycle; only these are polled.
    playing: Vec<AnimationId>,
}

impl AnimationPlaylist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn animation_created(&mut self, id: AnimationId) {
        if !self.live.contains(&id) {
            self.live.push(id);
        }
    }

    pub fn animation_destroyed(&mut self, id: AnimationId) {
        self.live.retain(|a| *a != id);
        self.playing.retain(|a| *a != id);
    }

    /// Retain the animation for polling while its play cycle runs.
    pub fn on_play(&mut self, id: AnimationId) {
        if !self.playing.contains(&id) {
            self.playing.push(id);
        }
    }

    /// A cleared animation owes no further notifications.
    pub fn on_clear(&mut self, id: AnimationId) {
        self.playing.retain(|a| *a != id);
    }

    /// The play cycle resolved and the animation is not running on.
    pub fn on_stopped(&mut self, id: AnimationId) {
        self.playing.retain(|a| *a != id);
    }

    pub fn playing(&self) -> Vec<AnimationId> {
        self.playing.clone()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
