use arbor_animation_core::{
    AnimatablePropertySpec, AnimateOptions, BufferIndex, Config, Core, MessageQueue, ObjectId,
    PropertyIndex, PropertyTarget, PropertyValue, ScenePropertyId, SceneProperty, UpdateManager,
    UpdateMessage, TypeSchema,
};
use arbor_api_core::index::ANIMATABLE_REGISTERED_START;

const VALUE: PropertyIndex = PropertyIndex(ANIMATABLE_REGISTERED_START);

fn schema() -> TypeSchema {
    let mut schema = TypeSchema::new("TestNode");
    schema.animatable = vec![AnimatablePropertySpec {
        index: VALUE,
        name: "value".into(),
        default_value: PropertyValue::Float(0.0),
        component_of: None,
    }];
    schema
}

/// it should apply same-frame writes in enqueue order, last one winning
#[test]
fn same_frame_writes_apply_in_order() {
    let mut core = Core::new(Config::default());
    let object = core.create_object(schema());

    core.set_property(object, VALUE, PropertyValue::Float(3.0));
    core.set_property(object, VALUE, PropertyValue::Float(7.0));
    core.update(0.0);

    assert_eq!(
        core.get_current_property(object, VALUE),
        PropertyValue::Float(7.0)
    );
}

/// it should make a write issued this frame visible to this frame's
/// animation evaluation
#[test]
fn write_visible_to_same_frame_evaluation() {
    let mut core = Core::new(Config::default());
    let object = core.create_object(schema());
    let animation = core.create_animation(1.0);

    // Base 6 and a relative +4 arrive in the same flush as the play.
    core.set_property(object, VALUE, PropertyValue::Float(6.0));
    core.animate_by(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(4.0),
        AnimateOptions::default(),
    );
    core.play(animation);

    core.update(1.1); // runs to completion in one tick
    assert_eq!(
        core.get_current_property(object, VALUE),
        PropertyValue::Float(10.0)
    );
}

/// it should drive transient set and relative messages through the update
/// manager with reset semantics intact
#[test]
fn transient_messages_revert_after_two_frames() {
    let mut update = UpdateManager::with_capacity(4, 4);
    let mut queue = MessageQueue::with_capacity(8);
    let owner = ObjectId(0);
    let cell = ScenePropertyId(0);

    queue.push(UpdateMessage::CreatePropertyOwner { owner });
    queue.push(UpdateMessage::InstallSceneProperty {
        owner,
        property: cell,
        initial: PropertyValue::Float(1.0),
    });
    queue.push(UpdateMessage::SetSceneProperty {
        owner,
        property: cell,
        component: None,
        value: PropertyValue::Float(5.0),
    });
    queue.push(UpdateMessage::SetScenePropertyRelative {
        owner,
        property: cell,
        component: None,
        delta: PropertyValue::Float(2.0),
    });
    for message in queue.drain() {
        update.apply(message, BufferIndex::A);
    }

    let read = |update: &UpdateManager, buffer: BufferIndex| -> PropertyValue {
        update
            .owner(owner)
            .and_then(|o| o.property(cell))
            .map(|p| p.value(buffer))
            .expect("cell installed")
    };
    assert_eq!(read(&update, BufferIndex::A), PropertyValue::Float(7.0));

    // Two frame boundaries on alternating buffers restore the base.
    update.reset_properties(BufferIndex::B);
    update.reset_properties(BufferIndex::A);
    assert_eq!(read(&update, BufferIndex::A), PropertyValue::Float(1.0));
    assert_eq!(read(&update, BufferIndex::B), PropertyValue::Float(1.0));
}

/// it should persist bake-relative messages through the reset pass
#[test]
fn bake_relative_message_persists() {
    let mut update = UpdateManager::with_capacity(4, 4);
    let owner = ObjectId(0);
    let cell = ScenePropertyId(0);

    update.apply(UpdateMessage::CreatePropertyOwner { owner }, BufferIndex::A);
    update.apply(
        UpdateMessage::InstallSceneProperty {
            owner,
            property: cell,
            initial: PropertyValue::Vec2([1.0, 1.0]),
        },
        BufferIndex::A,
    );
    update.apply(
        UpdateMessage::BakeScenePropertyRelative {
            owner,
            property: cell,
            component: Some(1),
            delta: PropertyValue::Float(3.0),
        },
        BufferIndex::A,
    );

    update.reset_properties(BufferIndex::B);
    update.reset_properties(BufferIndex::A);

    let value = update
        .owner(owner)
        .and_then(|o| o.property(cell))
        .map(|p| p.value(BufferIndex::A))
        .expect("cell installed");
    assert_eq!(value, PropertyValue::Vec2([1.0, 4.0]));
}

/// it should ignore messages addressed to destroyed entities
#[test]
fn stale_messages_are_skipped() {
    let mut update = UpdateManager::with_capacity(4, 4);
    let owner = ObjectId(3);

    update.apply(UpdateMessage::CreatePropertyOwner { owner }, BufferIndex::A);
    update.apply(UpdateMessage::DestroyPropertyOwner { owner }, BufferIndex::A);
    // Arrives after destruction: resolves to a miss, not a dangling access.
    update.apply(
        UpdateMessage::BakeSceneProperty {
            owner,
            property: ScenePropertyId(0),
            component: None,
            value: PropertyValue::Float(1.0),
        },
        BufferIndex::A,
    );
    assert!(update.owner(owner).is_none());
}

/// it should install only animatable value types as scene properties
#[test]
fn install_rejects_non_animatable_types() {
    assert!(SceneProperty::from_value(&PropertyValue::Text("x".into())).is_none());
    assert!(SceneProperty::from_value(&PropertyValue::Float(1.0)).is_some());
}
