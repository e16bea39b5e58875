//! Property addressing: stable integer indices partitioned into disjoint
//! ranges, registration keys, and access modes.
//!
//! An index, once assigned to an instance, is stable for that instance's
//! lifetime. The ranges never overlap; which range an index falls into decides
//! how the owning object dispatches reads and writes.

use serde::{Deserialize, Serialize};

/// Stable integer handle identifying one property slot on an object instance.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct PropertyIndex(pub u32);

/// Built-in properties of the owning type: `[0, DEFAULT_PROPERTY_MAX)`.
pub const DEFAULT_PROPERTY_MAX: u32 = 10_000_000;
/// Per-class registered, event-side-only properties.
pub const REGISTERED_PROPERTY_START: u32 = 10_000_000;
pub const REGISTERED_PROPERTY_MAX: u32 = 20_000_000;
/// Per-class registered properties with a scene-graph mirror (animatable).
pub const ANIMATABLE_REGISTERED_START: u32 = 20_000_000;
pub const ANIMATABLE_REGISTERED_MAX: u32 = 30_000_000;
/// Properties a parent assigns meaning to for values stored on a child.
pub const CHILD_REGISTERED_START: u32 = 45_000_000;
pub const CHILD_REGISTERED_MAX: u32 = 50_000_000;
/// Dynamically registered per-instance custom properties.
pub const CUSTOM_PROPERTY_START: u32 = 50_000_000;
pub const CUSTOM_PROPERTY_MAX: u32 = 60_000_000;

/// Classification of a property index by the range partition.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PropertyRange {
    Default,
    Registered,
    AnimatableRegistered,
    ChildRegistered,
    Custom,
    Invalid,
}

impl PropertyRange {
    /// Classify an index. Indices in the gaps between declared ranges are
    /// `Invalid`; callers treat those as lookup misses, not errors.
    pub fn of(index: PropertyIndex) -> Self {
        let i = index.0;
        if i < DEFAULT_PROPERTY_MAX {
            PropertyRange::Default
        } else if (REGISTERED_PROPERTY_START..REGISTERED_PROPERTY_MAX).contains(&i) {
            PropertyRange::Registered
        } else if (ANIMATABLE_REGISTERED_START..ANIMATABLE_REGISTERED_MAX).contains(&i) {
            PropertyRange::AnimatableRegistered
        } else if (CHILD_REGISTERED_START..CHILD_REGISTERED_MAX).contains(&i) {
            PropertyRange::ChildRegistered
        } else if (CUSTOM_PROPERTY_START..CUSTOM_PROPERTY_MAX).contains(&i) {
            PropertyRange::Custom
        } else {
            PropertyRange::Invalid
        }
    }
}

/// Key used when registering or looking up a property: a display name, or an
/// optional integer token for cheap repeated lookups.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PropertyKey {
    Name(String),
    Token(i32),
}

/// Access mode of a registered property. `Animatable` implies read-write.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
    Animatable,
}

impl AccessMode {
    #[inline]
    pub fn is_writable(self) -> bool {
        !matches!(self, AccessMode::ReadOnly)
    }

    #[inline]
    pub fn is_animatable(self) -> bool {
        matches!(self, AccessMode::Animatable)
    }
}

/// Sub-selector identifying one scalar lane (x/y/z/w) of a composite
/// property. `None` addresses the whole value.
pub type ComponentIndex = Option<u8>;

#[cfg(test)]
mod tests {
    use super::*;

    /// it should classify every declared range and reject the gaps
    #[test]
    fn range_partition() {
        assert_eq!(PropertyRange::of(PropertyIndex(0)), PropertyRange::Default);
        assert_eq!(
            PropertyRange::of(PropertyIndex(DEFAULT_PROPERTY_MAX - 1)),
            PropertyRange::Default
        );
        assert_eq!(
            PropertyRange::of(PropertyIndex(REGISTERED_PROPERTY_START)),
            PropertyRange::Registered
        );
        assert_eq!(
            PropertyRange::of(PropertyIndex(ANIMATABLE_REGISTERED_START)),
            PropertyRange::AnimatableRegistered
        );
        assert_eq!(
            PropertyRange::of(PropertyIndex(CHILD_REGISTERED_START)),
            PropertyRange::ChildRegistered
        );
        assert_eq!(
            PropertyRange::of(PropertyIndex(CUSTOM_PROPERTY_START)),
            PropertyRange::Custom
        );
        // Gap between animatable-registered and child ranges.
        assert_eq!(
            PropertyRange::of(PropertyIndex(35_000_000)),
            PropertyRange::Invalid
        );
        assert_eq!(
            PropertyRange::of(PropertyIndex(CUSTOM_PROPERTY_MAX)),
            PropertyRange::Invalid
        );
    }
}
