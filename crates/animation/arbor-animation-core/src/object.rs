//! Event-side objects and their index-addressed property directory.
//!
//! Which integer range an index falls into decides the dispatch: built-in
//! slots declared by the type schema, event-only registered properties,
//! animatable registrations with a lazily materialized scene mirror, child
//! slots a parent assigns meaning to, and per-instance custom properties.
//! Each resolution is cached in a flat directory so range arithmetic happens
//! once per index.
//!
//! Failure policy: an index registered nowhere logs and degrades to a no-op
//! write or a `None` read; internal invariants are debug assertions.

use hashbrown::HashMap;
use log::warn;

use arbor_api_core::{
    index::CUSTOM_PROPERTY_START, AccessMode, ComponentIndex, PropertyIndex, PropertyKey,
    PropertyRange, PropertyType, PropertyValue,
};

use crate::animation::AnimatorKind;
use crate::double_buffered::BufferIndex;
use crate::ids::{IdAllocator, ObjectId, ScenePropertyId};
use crate::messages::{MessageQueue, UpdateMessage};
use crate::metadata::PropertyMetadata;
use crate::update_manager::UpdateManager;

/// Event-role services handed into object operations: the id allocator and
/// the command channel toward the update role.
pub struct EventServices<'a> {
    pub ids: &'a mut IdAllocator,
    pub queue: &'a mut MessageQueue,
}

/// Declaration of one built-in property slot.
#[derive(Clone, Debug)]
pub struct DefaultPropertySpec {
    pub index: PropertyIndex,
    pub name: String,
    pub default_value: PropertyValue,
    pub access: AccessMode,
    pub constraint_input: bool,
}

/// Per-class, event-side-only registered property.
#[derive(Clone, Debug)]
pub struct RegisteredPropertySpec {
    pub index: PropertyIndex,
    pub name: String,
    pub default_value: PropertyValue,
    pub writable: bool,
}

/// Per-class registered property with a scene-graph mirror. A component
/// entry addresses one lane of a base property's storage.
#[derive(Clone, Debug)]
pub struct AnimatablePropertySpec {
    pub index: PropertyIndex,
    pub name: String,
    pub default_value: PropertyValue,
    pub component_of: Option<(PropertyIndex, u8)>,
}

/// Child slot a parent gives meaning to for values stored on this object.
#[derive(Clone, Debug)]
pub struct ChildPropertySpec {
    pub index: PropertyIndex,
    pub name: String,
    pub value_type: PropertyType,
}

/// The narrow interface to the (external) type registry: static tables the
/// directory dispatches through.
#[derive(Clone, Debug, Default)]
pub struct TypeSchema {
    pub name: String,
    pub defaults: Vec<DefaultPropertySpec>,
    pub registered: Vec<RegisteredPropertySpec>,
    pub animatable: Vec<AnimatablePropertySpec>,
    pub children: Vec<ChildPropertySpec>,
}

impl TypeSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Where a resolved index lives, cached per index after first resolution.
#[derive(Copy, Clone, Debug)]
enum PropertyLocation {
    BuiltIn(usize),
    Registered(usize),
    AnimatableRegistered(usize),
    Custom(usize),
}

/// Resolved scene target of an animatable property, as needed by an animator.
#[derive(Copy, Clone, Debug)]
pub struct AnimatableRef {
    pub scene_property: ScenePropertyId,
    pub component: ComponentIndex,
    pub value_type: PropertyType,
}

pub struct Object {
    id: ObjectId,
    schema: TypeSchema,
    defaults: Vec<PropertyMetadata>,
    registered: Vec<PropertyMetadata>,
    animatable: Vec<PropertyMetadata>,
    custom: Vec<PropertyMetadata>,
    next_custom: u32,
    directory: HashMap<u32, PropertyLocation>,
}

impl Object {
    /// Create the object and its scene-graph counterpart. Built-in animatable
    /// slots materialize their mirrors eagerly; animatable registrations wait
    /// for first use.
    pub fn new(id: ObjectId, schema: TypeSchema, services: &mut EventServices) -> Self {
        services
            .queue
            .push(UpdateMessage::CreatePropertyOwner { owner: id });

        let mut object = Self {
            id,
            schema,
            defaults: Vec::new(),
            registered: Vec::new(),
            animatable: Vec::new(),
            custom: Vec::new(),
            next_custom: 0,
            directory: HashMap::new(),
        };

        let defaults = object.schema.defaults.clone();
        for (slot, spec) in defaults.iter().enumerate() {
            debug_assert_eq!(
                PropertyRange::of(spec.index),
                PropertyRange::Default,
                "built-in property declared outside the default range"
            );
            let mut metadata = PropertyMetadata::new(
                spec.index,
                spec.name.clone(),
                spec.access,
                spec.default_value.clone(),
            );
            if spec.access.is_animatable() {
                let scene_property = services.ids.alloc_scene_property();
                services.queue.push(UpdateMessage::InstallSceneProperty {
                    owner: id,
                    property: scene_property,
                    initial: spec.default_value.clone(),
                });
                metadata.scene_property = Some(scene_property);
            }
            object
                .directory
                .insert(spec.index.0, PropertyLocation::BuiltIn(slot));
            object.defaults.push(metadata);
        }

        let registered = object.schema.registered.clone();
        for (slot, spec) in registered.iter().enumerate() {
            let access = if spec.writable {
                AccessMode::ReadWrite
            } else {
                AccessMode::ReadOnly
            };
            object.directory.insert(
                spec.index.0,
                PropertyLocation::Registered(slot),
            );
            object.registered.push(PropertyMetadata::new(
                spec.index,
                spec.name.clone(),
                access,
                spec.default_value.clone(),
            ));
        }

        object
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn type_name(&self) -> &str {
        &self.schema.name
    }

    fn location(&self, index: PropertyIndex) -> Option<PropertyLocation> {
        self.directory.get(&index.0).copied()
    }

    fn metadata(&self, location: PropertyLocation) -> &PropertyMetadata {
        match location {
            PropertyLocation::BuiltIn(slot) => &self.defaults[slot],
            PropertyLocation::Registered(slot) => &self.registered[slot],
            PropertyLocation::AnimatableRegistered(slot) => &self.animatable[slot],
            PropertyLocation::Custom(slot) => &self.custom[slot],
        }
    }

    fn metadata_mut(&mut self, location: PropertyLocation) -> &mut PropertyMetadata {
        match location {
            PropertyLocation::BuiltIn(slot) => &mut self.defaults[slot],
            PropertyLocation::Registered(slot) => &mut self.registered[slot],
            PropertyLocation::AnimatableRegistered(slot) => &mut self.animatable[slot],
            PropertyLocation::Custom(slot) => &mut self.custom[slot],
        }
    }

    fn animatable_spec(&self, index: PropertyIndex) -> Option<&AnimatablePropertySpec> {
        self.schema.animatable.iter().find(|s| s.index == index)
    }

    /// Declared type of the property, or `None` for an unknown index.
    pub fn property_type(&self, index: PropertyIndex) -> PropertyType {
        if let Some(location) = self.location(index) {
            return self.metadata(location).value_type;
        }
        match PropertyRange::of(index) {
            PropertyRange::AnimatableRegistered => self
                .animatable_spec(index)
                .map(|s| {
                    if s.component_of.is_some() {
                        PropertyType::Float
                    } else {
                        s.default_value.value_type()
                    }
                })
                .unwrap_or(PropertyType::None),
            PropertyRange::ChildRegistered => self
                .schema
                .children
                .iter()
                .find(|c| c.index == index)
                .map(|c| c.value_type)
                .unwrap_or(PropertyType::None),
            _ => PropertyType::None,
        }
    }

    pub fn is_property_writable(&self, index: PropertyIndex) -> bool {
        match PropertyRange::of(index) {
            // Scene-graph registrations are always writable.
            PropertyRange::AnimatableRegistered => self.animatable_spec(index).is_some(),
            _ => self
                .location(index)
                .map(|l| self.metadata(l).is_writable())
                .unwrap_or(false),
        }
    }

    pub fn is_property_animatable(&self, index: PropertyIndex) -> bool {
        match PropertyRange::of(index) {
            PropertyRange::Registered => false,
            PropertyRange::AnimatableRegistered => self.animatable_spec(index).is_some(),
            _ => self
                .location(index)
                .map(|l| self.metadata(l).is_animatable())
                .unwrap_or(false),
        }
    }

    pub fn is_property_a_constraint_input(&self, index: PropertyIndex) -> bool {
        match PropertyRange::of(index) {
            PropertyRange::Default => self
                .schema
                .defaults
                .iter()
                .find(|s| s.index == index)
                .map(|s| s.constraint_input)
                .unwrap_or(false),
            PropertyRange::Registered => false,
            PropertyRange::AnimatableRegistered => self.animatable_spec(index).is_some(),
            PropertyRange::ChildRegistered | PropertyRange::Custom => {
                self.location(index).is_some()
            }
            PropertyRange::Invalid => false,
        }
    }

    /// Index lookup by name or integer token.
    pub fn property_index(&self, key: &PropertyKey) -> Option<PropertyIndex> {
        match key {
            PropertyKey::Name(name) => {
                if let Some(spec) = self.schema.defaults.iter().find(|s| &s.name == name) {
                    return Some(spec.index);
                }
                if let Some(spec) = self.schema.registered.iter().find(|s| &s.name == name) {
                    return Some(spec.index);
                }
                if let Some(spec) = self.schema.animatable.iter().find(|s| &s.name == name) {
                    return Some(spec.index);
                }
                self.custom.iter().find(|m| &m.name == name).map(|m| {
                    // A custom entry serving a child slot answers to the
                    // child's index.
                    m.child_index.unwrap_or(m.index)
                })
            }
            PropertyKey::Token(token) => self
                .custom
                .iter()
                .find(|m| m.key == Some(*token))
                .map(|m| m.child_index.unwrap_or(m.index)),
        }
    }

    pub fn property_name(&self, index: PropertyIndex) -> Option<&str> {
        if let Some(location) = self.location(index) {
            return Some(self.metadata(location).name.as_str());
        }
        self.animatable_spec(index).map(|s| s.name.as_str())
    }

    /// Every index answerable on this instance, including not-yet-materialized
    /// animatable registrations.
    pub fn property_indices(&self) -> Vec<PropertyIndex> {
        let mut indices: Vec<PropertyIndex> = self
            .schema
            .defaults
            .iter()
            .map(|s| s.index)
            .chain(self.schema.registered.iter().map(|s| s.index))
            .chain(self.schema.animatable.iter().map(|s| s.index))
            .collect();
        for metadata in &self.custom {
            indices.push(metadata.child_index.unwrap_or(metadata.index));
        }
        indices
    }

    /// Materialize (if needed) and return the scene target behind an
    /// animatable index: built-in animatable slots, animatable registrations
    /// (including component views), and animatable custom properties.
    pub fn ensure_animatable_registered(
        &mut self,
        index: PropertyIndex,
        services: &mut EventServices,
    ) -> Option<AnimatableRef> {
        if let Some(location) = self.location(index) {
            let metadata = self.metadata(location);
            if let Some(scene_property) = metadata.scene_property {
                return Some(AnimatableRef {
                    scene_property,
                    component: metadata.component_index,
                    value_type: metadata.value_type,
                });
            }
            if !matches!(location, PropertyLocation::AnimatableRegistered(_)) {
                return None;
            }
        }

        if PropertyRange::of(index) != PropertyRange::AnimatableRegistered {
            return None;
        }
        let spec = self.animatable_spec(index)?.clone();

        if let Some((base_index, lane)) = spec.component_of {
            // Materialize the whole property first, then add a component view
            // sharing its storage.
            let base = self.ensure_animatable_registered(base_index, services)?;
            let cached = self
                .schema
                .animatable
                .iter()
                .find(|s| s.index == base_index)
                .and_then(|s| s.default_value.component(lane))
                .map(PropertyValue::Float)
                .unwrap_or(PropertyValue::Float(0.0));

            let mut metadata =
                PropertyMetadata::new(index, spec.name.clone(), AccessMode::Animatable, cached);
            metadata.scene_property = Some(base.scene_property);
            metadata.component_index = Some(lane);
            let slot = self.animatable.len();
            self.animatable.push(metadata);
            self.directory
                .insert(index.0, PropertyLocation::AnimatableRegistered(slot));
            return Some(AnimatableRef {
                scene_property: base.scene_property,
                component: Some(lane),
                value_type: PropertyType::Float,
            });
        }

        let scene_property = services.ids.alloc_scene_property();
        services.queue.push(UpdateMessage::InstallSceneProperty {
            owner: self.id,
            property: scene_property,
            initial: spec.default_value.clone(),
        });
        let mut metadata = PropertyMetadata::new(
            index,
            spec.name.clone(),
            AccessMode::Animatable,
            spec.default_value.clone(),
        );
        metadata.scene_property = Some(scene_property);
        let slot = self.animatable.len();
        self.animatable.push(metadata);
        self.directory
            .insert(index.0, PropertyLocation::AnimatableRegistered(slot));
        Some(AnimatableRef {
            scene_property,
            component: None,
            value_type: spec.default_value.value_type(),
        })
    }

    /// Write a property. Returns true when the write took effect; the caller
    /// then emits exactly one property-set notification.
    pub fn set_property(
        &mut self,
        index: PropertyIndex,
        value: PropertyValue,
        services: &mut EventServices,
    ) -> bool {
        match PropertyRange::of(index) {
            PropertyRange::Invalid => {
                warn!("set_property: index {} is in no declared range", index.0);
                false
            }
            PropertyRange::Default | PropertyRange::Registered => {
                let Some(location) = self.location(index) else {
                    warn!("set_property: unknown property index {}", index.0);
                    return false;
                };
                let metadata = self.metadata(location);
                if !metadata.is_writable() {
                    warn!("set_property: property {} is read-only", index.0);
                    return false;
                }
                let Some(coerced) = value.convert_to(metadata.value_type) else {
                    warn!(
                        "set_property: cannot convert {:?} to {:?} for index {}",
                        value.value_type(),
                        metadata.value_type,
                        index.0
                    );
                    return false;
                };
                let scene_property = metadata.scene_property;
                let component = metadata.component_index;
                self.metadata_mut(location).set_cached(coerced.clone());
                if let Some(property) = scene_property {
                    services.queue.push(UpdateMessage::BakeSceneProperty {
                        owner: self.id,
                        property,
                        component,
                        value: coerced,
                    });
                }
                true
            }
            PropertyRange::AnimatableRegistered => {
                let Some(target) = self.ensure_animatable_registered(index, services) else {
                    warn!("set_property: unknown animatable index {}", index.0);
                    return false;
                };
                let Some(coerced) = value.convert_to(target.value_type) else {
                    warn!(
                        "set_property: cannot convert {:?} to {:?} for index {}",
                        value.value_type(),
                        target.value_type,
                        index.0
                    );
                    return false;
                };
                if let Some(location) = self.location(index) {
                    self.metadata_mut(location).set_cached(coerced.clone());
                }
                services.queue.push(UpdateMessage::BakeSceneProperty {
                    owner: self.id,
                    property: target.scene_property,
                    component: target.component,
                    value: coerced,
                });
                true
            }
            PropertyRange::ChildRegistered => {
                if self.location(index).is_none() {
                    // First write to an unregistered child slot registers it.
                    let name = self
                        .schema
                        .children
                        .iter()
                        .find(|c| c.index == index)
                        .map(|c| c.name.clone())
                        .unwrap_or_default();
                    let mut metadata = PropertyMetadata::new(
                        PropertyIndex(CUSTOM_PROPERTY_START + self.next_custom),
                        name,
                        AccessMode::ReadWrite,
                        value.clone(),
                    );
                    self.next_custom += 1;
                    metadata.child_index = Some(index);
                    let slot = self.custom.len();
                    self.custom.push(metadata);
                    self.directory.insert(index.0, PropertyLocation::Custom(slot));
                    return true;
                }
                self.set_custom(index, value, services)
            }
            PropertyRange::Custom => self.set_custom(index, value, services),
        }
    }

    fn set_custom(
        &mut self,
        index: PropertyIndex,
        value: PropertyValue,
        services: &mut EventServices,
    ) -> bool {
        let Some(location) = self.location(index) else {
            warn!("set_property: unknown custom index {}", index.0);
            return false;
        };
        let metadata = self.metadata(location);
        if metadata.is_animatable() {
            let Some(coerced) = value.convert_to(metadata.value_type) else {
                warn!(
                    "set_property: cannot convert {:?} to {:?} for index {}",
                    value.value_type(),
                    metadata.value_type,
                    index.0
                );
                return false;
            };
            let scene_property = metadata.scene_property;
            let component = metadata.component_index;
            self.metadata_mut(location).set_cached(coerced.clone());
            if let Some(property) = scene_property {
                services.queue.push(UpdateMessage::BakeSceneProperty {
                    owner: self.id,
                    property,
                    component,
                    value: coerced,
                });
            }
            true
        } else if metadata.is_writable() {
            self.metadata_mut(location).set_cached(value);
            true
        } else {
            // Writing a read-only property is a no-op.
            false
        }
    }

    /// The event-side cached value (not necessarily the live animated value).
    pub fn get_property(&self, index: PropertyIndex) -> PropertyValue {
        if let Some(location) = self.location(index) {
            return self.metadata(location).cached.clone();
        }
        match PropertyRange::of(index) {
            PropertyRange::AnimatableRegistered => self
                .animatable_spec(index)
                .map(|s| match s.component_of {
                    Some((base, lane)) => self
                        .animatable_spec(base)
                        .and_then(|b| b.default_value.component(lane))
                        .map(PropertyValue::Float)
                        .unwrap_or(PropertyValue::None),
                    None => s.default_value.clone(),
                })
                .unwrap_or_else(|| {
                    warn!("get_property: unknown animatable index {}", index.0);
                    PropertyValue::None
                }),
            _ => {
                warn!("get_property: unknown property index {}", index.0);
                PropertyValue::None
            }
        }
    }

    /// The live double-buffered value at the event buffer index, the correct
    /// way to read a value that may be mid-animation. Falls back to the
    /// cached value for properties with no materialized mirror.
    pub fn get_current_property(
        &self,
        index: PropertyIndex,
        update: &UpdateManager,
        buffer: BufferIndex,
    ) -> PropertyValue {
        if let Some(location) = self.location(index) {
            let metadata = self.metadata(location);
            if metadata.is_animatable() {
                if let Some(scene_property) = metadata.scene_property {
                    if let Some(cell) = update
                        .owner(self.id)
                        .and_then(|o| o.property(scene_property))
                    {
                        return cell.read(buffer, metadata.component_index);
                    }
                }
            }
            return metadata.cached.clone();
        }
        self.get_property(index)
    }

    /// Register (or re-register) a per-instance property. Idempotent by
    /// token, then by name: an existing registration behaves as a
    /// `set_property` and reports `set = true`.
    pub fn register_property(
        &mut self,
        name: &str,
        key: Option<i32>,
        value: PropertyValue,
        access: AccessMode,
        services: &mut EventServices,
    ) -> (PropertyIndex, bool) {
        let existing = key
            .and_then(|k| self.property_index(&PropertyKey::Token(k)))
            .or_else(|| self.property_index(&PropertyKey::Name(name.to_string())));
        if let Some(index) = existing {
            let set = self.set_property(index, value, services);
            return (index, set);
        }

        let index = PropertyIndex(CUSTOM_PROPERTY_START + self.next_custom);
        self.next_custom += 1;

        if access.is_animatable() {
            let mut metadata = PropertyMetadata::new(index, name, access, value.clone());
            metadata.key = key;
            match crate::property_owner::SceneProperty::from_value(&value) {
                Some(_) => {
                    let scene_property = services.ids.alloc_scene_property();
                    services.queue.push(UpdateMessage::InstallSceneProperty {
                        owner: self.id,
                        property: scene_property,
                        initial: value,
                    });
                    metadata.scene_property = Some(scene_property);
                }
                None => {
                    // Non-animatable value type: keep the registration
                    // event-side only rather than failing the call.
                    warn!(
                        "register_property: {:?} values cannot be animated; \
                         '{name}' registered without a scene mirror",
                        metadata.value_type
                    );
                    metadata.access = AccessMode::ReadWrite;
                }
            }
            let slot = self.custom.len();
            self.custom.push(metadata);
            self.directory.insert(index.0, PropertyLocation::Custom(slot));
            return (index, false);
        }

        let mut metadata = PropertyMetadata::new(index, name, access, value);
        metadata.key = key;
        // A name the parent declared as a child slot answers to the child
        // index instead of a fresh custom index.
        let mut public_index = index;
        if let Some(child) = self.schema.children.iter().find(|c| c.name == name) {
            metadata.child_index = Some(child.index);
            public_index = child.index;
        }
        let slot = self.custom.len();
        self.custom.push(metadata);
        self.directory
            .insert(public_index.0, PropertyLocation::Custom(slot));
        (public_index, false)
    }

    /// Called back by an animation at play/finish/pause to push a settled
    /// value into the cache: To/Between overwrite, By adjusts.
    pub fn notify_property_animation(
        &mut self,
        index: PropertyIndex,
        value: &PropertyValue,
        kind: AnimatorKind,
    ) {
        let Some(location) = self.location(index) else {
            return;
        };
        if !self.metadata(location).is_animatable() {
            return;
        }
        match kind {
            AnimatorKind::To | AnimatorKind::Between => {
                self.metadata_mut(location).set_cached(value.clone());
            }
            AnimatorKind::By => {
                self.metadata_mut(location).adjust_cached_by(value);
            }
        }
    }
}
