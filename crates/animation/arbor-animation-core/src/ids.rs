//! Identifiers and simple allocators for core entities.

use serde::{Deserialize, Serialize};

/// Event-side object and its scene-graph property owner share one id.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u32);

/// Identifies one scene-graph property cell, unique across all owners.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ScenePropertyId(pub u32);

/// Monotonic allocator for ObjectId, AnimationId, and ScenePropertyId.
/// Dense indices improve cache locality; ids are opaque externally.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_object: u32,
    next_animation: u32,
    next_scene_property: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_object(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object = self.next_object.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_animation(&mut self) -> AnimationId {
        let id = AnimationId(self.next_animation);
        self.next_animation = self.next_animation.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_scene_property(&mut self) -> ScenePropertyId {
        let id = ScenePropertyId(self.next_scene_property);
        self.next_scene_property = self.next_scene_property.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
