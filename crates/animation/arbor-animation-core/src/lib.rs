//! Arbor animation core (engine-agnostic)
//!
//! The update/render heart of a retained-mode scene graph: typed, indexable
//! object properties with double-buffered scene-graph mirrors, an animation
//! engine driving them over time, and the ordered command channel that keeps
//! the event and update roles decoupled. Rendering, windowing, and the actor
//! tree live in the embedding host; this crate only produces values and
//! events.

pub mod alpha;
pub mod animatable;
pub mod animation;
pub mod animator;
pub mod config;
pub mod core;
pub mod double_buffered;
pub mod ids;
pub mod interp;
pub mod keyframes;
pub mod messages;
pub mod metadata;
pub mod object;
pub mod outputs;
pub mod path;
pub mod playlist;
pub mod property_owner;
pub mod scene_animation;
pub mod update_manager;

// Re-exports for consumers (adapters)
pub use crate::core::{AnimateOptions, Core, PropertyTarget};
pub use alpha::AlphaFunction;
pub use animatable::{AnimatableProperty, AnimatableValue, DirtyFlag};
pub use animation::{Animation, AnimationState, AnimatorKind};
pub use animator::{Animator, AnimatorFunction, TimePeriod};
pub use config::Config;
pub use double_buffered::{BufferIndex, DoubleBuffered, SceneBuffers};
pub use ids::{AnimationId, IdAllocator, ObjectId, ScenePropertyId};
pub use keyframes::{Interpolation, KeyFrames};
pub use messages::{MessageQueue, UpdateMessage};
pub use object::{
    AnimatablePropertySpec, ChildPropertySpec, DefaultPropertySpec, EventServices, Object,
    RegisteredPropertySpec, TypeSchema,
};
pub use outputs::{CoreEvent, Outputs};
pub use path::Path;
pub use playlist::AnimationPlaylist;
pub use property_owner::{PropertyOwner, SceneProperty};
pub use scene_animation::{AnimationTick, EndAction, SceneAnimation, SceneAnimationSpec};
pub use update_manager::UpdateManager;

pub use arbor_api_core::{
    AccessMode, ComponentIndex, PropertyIndex, PropertyKey, PropertyMap, PropertyRange,
    PropertyType, PropertyValue, Quaternion, Rotation,
};
