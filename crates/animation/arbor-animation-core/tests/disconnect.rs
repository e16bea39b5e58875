use arbor_animation_core::{
    AnimatablePropertySpec, AnimateOptions, Config, Core, CoreEvent, PropertyIndex,
    PropertyTarget, PropertyValue, TypeSchema,
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

/// it should survive the target being destroyed mid-animation and still fire
/// finished exactly once
#[test]
fn destroy_target_mid_animation() {
    let mut core = Core::new(Config::default());
    let object = core.create_object(schema());
    let animation = core.create_animation(1.0);
    assert!(core.animate_to(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(10.0),
        AnimateOptions::default(),
    ));
    core.play(animation);
    core.update(0.4);

    // Deferred destroy: the owner disappears at the next traversal and the
    // animator silently becomes a no-op.
    core.destroy_object(object);

    let mut finished = 0;
    for _ in 0..4 {
        finished += core
            .update(0.4)
            .events
            .iter()
            .filter(|e| matches!(e, CoreEvent::Finished { .. }))
            .count();
    }
    assert_eq!(finished, 1);

    // Reads against the destroyed object degrade to None, never crash.
    assert_eq!(core.get_current_property(object, VALUE), PropertyValue::None);
    assert_eq!(core.render_value(object, VALUE), PropertyValue::None);
}

/// it should keep driving other targets after one target is destroyed
#[test]
fn surviving_targets_keep_animating() {
    let mut core = Core::new(Config::default());
    let doomed = core.create_object(schema());
    let survivor = core.create_object(schema());

    let animation = core.create_animation(1.0);
    core.animate_to(
        animation,
        PropertyTarget::whole(doomed, VALUE),
        PropertyValue::Float(10.0),
        AnimateOptions::default(),
    );
    core.animate_to(
        animation,
        PropertyTarget::whole(survivor, VALUE),
        PropertyValue::Float(20.0),
        AnimateOptions::default(),
    );
    core.play(animation);
    core.update(0.4);

    core.destroy_object(doomed);
    core.update(0.4);
    core.update(0.4); // finishes and bakes

    assert_eq!(
        core.get_current_property(survivor, VALUE),
        PropertyValue::Float(20.0)
    );
}
