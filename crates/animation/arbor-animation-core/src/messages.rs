//! The event-to-update command channel.
//!
//! The event role enqueues deferred mutations; the update role drains the
//! queue fully, in enqueue order, before starting its traversal. This is the
//! only path by which event-side calls touch scene-graph state; property
//! cells are never mutated synchronously across roles.

use arbor_api_core::{ComponentIndex, PropertyValue};

use crate::animator::Animator;
use crate::ids::{AnimationId, ObjectId, ScenePropertyId};
use crate::scene_animation::{EndAction, SceneAnimationSpec};

/// One deferred mutation applied on the update role.
#[derive(Debug)]
pub enum UpdateMessage {
    CreatePropertyOwner {
        owner: ObjectId,
    },
    /// Deferred destruction: the owner is retired at the start of the next
    /// traversal, never synchronously with the event-side handle.
    DestroyPropertyOwner {
        owner: ObjectId,
    },
    InstallSceneProperty {
        owner: ObjectId,
        property: ScenePropertyId,
        initial: PropertyValue,
    },
    SetSceneProperty {
        owner: ObjectId,
        property: ScenePropertyId,
        component: ComponentIndex,
        value: PropertyValue,
    },
    BakeSceneProperty {
        owner: ObjectId,
        property: ScenePropertyId,
        component: ComponentIndex,
        value: PropertyValue,
    },
    SetScenePropertyRelative {
        owner: ObjectId,
        property: ScenePropertyId,
        component: ComponentIndex,
        delta: PropertyValue,
    },
    BakeScenePropertyRelative {
        owner: ObjectId,
        property: ScenePropertyId,
        component: ComponentIndex,
        delta: PropertyValue,
    },
    CreateAnimation {
        animation: AnimationId,
        spec: SceneAnimationSpec,
    },
    DestroyAnimation {
        animation: AnimationId,
    },
    AddAnimator {
        animation: AnimationId,
        animator: Animator,
    },
    PlayAnimation {
        animation: AnimationId,
    },
    PlayAnimationFrom {
        animation: AnimationId,
        progress: f32,
    },
    PlayAnimationAfter {
        animation: AnimationId,
        delay: f32,
    },
    PauseAnimation {
        animation: AnimationId,
    },
    StopAnimation {
        animation: AnimationId,
    },
    SetDuration {
        animation: AnimationId,
        seconds: f32,
    },
    SetLoopCount {
        animation: AnimationId,
        count: i32,
    },
    SetPlayRange {
        animation: AnimationId,
        range: [f32; 2],
    },
    SetSpeedFactor {
        animation: AnimationId,
        factor: f32,
    },
    SetEndAction {
        animation: AnimationId,
        action: EndAction,
    },
    SetDisconnectAction {
        animation: AnimationId,
        action: EndAction,
    },
    SetLoopingMode {
        animation: AnimationId,
        auto_reverse: bool,
    },
    SetProgressMarker {
        animation: AnimationId,
        seconds: f32,
    },
    SetCurrentProgress {
        animation: AnimationId,
        seconds: f32,
    },
}

/// Single-producer / single-consumer command queue with whole-queue handoff.
#[derive(Debug, Default)]
pub struct MessageQueue {
    pending: Vec<UpdateMessage>,
}

impl MessageQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, message: UpdateMessage) {
        self.pending.push(message);
    }

    /// Hand the whole batch to the update role, preserving enqueue order.
    pub fn drain(&mut self) -> Vec<UpdateMessage> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// it should hand over messages in enqueue order and leave the queue empty
    #[test]
    fn drain_preserves_order() {
        let mut queue = MessageQueue::with_capacity(4);
        queue.push(UpdateMessage::CreatePropertyOwner { owner: ObjectId(0) });
        queue.push(UpdateMessage::DestroyPropertyOwner { owner: ObjectId(0) });
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert!(queue.is_empty());
        assert!(matches!(
            drained[0],
            UpdateMessage::CreatePropertyOwner { .. }
        ));
        assert!(matches!(
            drained[1],
            UpdateMessage::DestroyPropertyOwner { .. }
        ));
    }
}
