//! Event-side property metadata: the per-object registration record behind
//! each property index.
//!
//! `cached` is the event-visible "last set" value; a live animated value is
//! read through the scene link instead. The scene link is non-owning: the
//! cell itself lives with the update role and dies through the deferred
//! destruction queue.

use arbor_api_core::{AccessMode, ComponentIndex, PropertyIndex, PropertyType, PropertyValue};

use crate::ids::ScenePropertyId;

#[derive(Clone, Debug)]
pub struct PropertyMetadata {
    pub index: PropertyIndex,
    pub name: String,
    pub key: Option<i32>,
    pub access: AccessMode,
    pub value_type: PropertyType,
    /// Event-side cached value; lags the live value while animating.
    pub cached: PropertyValue,
    /// Scene-graph mirror, if one has been materialized.
    pub scene_property: Option<ScenePropertyId>,
    /// Set when this entry is a component view sharing a base property's
    /// storage.
    pub component_index: ComponentIndex,
    /// Set when a custom entry fulfills a child-property slot assigned by a
    /// parent.
    pub child_index: Option<PropertyIndex>,
}

impl PropertyMetadata {
    pub fn new(
        index: PropertyIndex,
        name: impl Into<String>,
        access: AccessMode,
        value: PropertyValue,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            key: None,
            access,
            value_type: value.value_type(),
            cached: value,
            scene_property: None,
            component_index: None,
            child_index: None,
        }
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.access.is_writable()
    }

    #[inline]
    pub fn is_animatable(&self) -> bool {
        self.access.is_animatable()
    }

    pub fn set_cached(&mut self, value: PropertyValue) {
        self.cached = value;
    }

    /// Adjust the cache by a relative amount (used when an animate-by settles).
    pub fn adjust_cached_by(&mut self, delta: &PropertyValue) {
        if let Some(combined) = self.cached.combined(delta) {
            self.cached = combined;
        }
    }
}
