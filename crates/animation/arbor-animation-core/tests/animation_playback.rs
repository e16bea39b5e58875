use arbor_animation_core::{
    AnimatablePropertySpec, AnimateOptions, AnimationState, Config, Core, CoreEvent, EndAction,
    Interpolation, KeyFrames, ObjectId, PropertyIndex, PropertyTarget, PropertyValue, TimePeriod,
    TypeSchema,
};
use arbor_api_core::index::ANIMATABLE_REGISTERED_START;

const VALUE: PropertyIndex = PropertyIndex(ANIMATABLE_REGISTERED_START);
const OTHER: PropertyIndex = PropertyIndex(ANIMATABLE_REGISTERED_START + 1);
const THIRD: PropertyIndex = PropertyIndex(ANIMATABLE_REGISTERED_START + 2);
const POSITION: PropertyIndex = PropertyIndex(ANIMATABLE_REGISTERED_START + 3);

fn scalar_spec(index: PropertyIndex, name: &str) -> AnimatablePropertySpec {
    AnimatablePropertySpec {
        index,
        name: name.into(),
        default_value: PropertyValue::Float(0.0),
        component_of: None,
    }
}

fn test_schema() -> TypeSchema {
    let mut schema = TypeSchema::new("TestNode");
    schema.animatable = vec![
        scalar_spec(VALUE, "value"),
        scalar_spec(OTHER, "other"),
        scalar_spec(THIRD, "third"),
        AnimatablePropertySpec {
            index: POSITION,
            name: "position".into(),
            default_value: PropertyValue::Vec3([0.0, 0.0, 0.0]),
            component_of: None,
        },
    ];
    schema
}

fn setup() -> (Core, ObjectId) {
    let mut core = Core::new(Config::default());
    let object = core.create_object(test_schema());
    (core, object)
}

fn finished_events(core: &mut Core, dt: f32) -> usize {
    core.update(dt)
        .events
        .iter()
        .filter(|e| matches!(e, CoreEvent::Finished { .. }))
        .count()
}

fn current_float(core: &Core, object: ObjectId, index: PropertyIndex) -> f32 {
    core.get_current_property(object, index)
        .as_float()
        .expect("float property")
}

/// it should bake the target value on natural completion and fire finished
/// exactly once
#[test]
fn bake_end_action_settles_on_target() {
    let (mut core, object) = setup();
    let animation = core.create_animation(1.0);
    assert!(core.animate_to(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(10.0),
        AnimateOptions::default(),
    ));
    core.play(animation);

    assert_eq!(finished_events(&mut core, 0.5), 0);
    assert_eq!(finished_events(&mut core, 0.6), 1);

    // A stop after natural completion queues nothing further and no second
    // finished signal appears.
    core.stop(animation);
    assert_eq!(finished_events(&mut core, 0.1), 0);

    assert_eq!(core.get_property(object, VALUE), PropertyValue::Float(10.0));
    assert_eq!(current_float(&core, object, VALUE), 10.0);
    assert_eq!(
        core.render_value(object, VALUE),
        PropertyValue::Float(10.0)
    );
    assert_eq!(core.animation_state(animation), Some(AnimationState::Stopped));
}

/// it should revert to the pre-animation value when the end action discards
#[test]
fn discard_end_action_reverts() {
    let (mut core, object) = setup();
    let animation = core.create_animation(1.0);
    core.set_end_action(animation, EndAction::Discard);
    assert!(core.animate_to(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(10.0),
        AnimateOptions::default(),
    ));
    core.play(animation);

    assert_eq!(finished_events(&mut core, 0.5), 0);
    // Mid-animation the cache still reads the pre-animation value while the
    // live value has progressed.
    assert_eq!(core.get_property(object, VALUE), PropertyValue::Float(0.0));

    assert_eq!(finished_events(&mut core, 0.6), 1);

    // Two more reset passes drain the transient writes from both slots.
    core.update(0.0);
    core.update(0.0);
    assert_eq!(core.get_property(object, VALUE), PropertyValue::Float(0.0));
    assert_eq!(current_float(&core, object, VALUE), 0.0);
    assert_eq!(core.render_value(object, VALUE), PropertyValue::Float(0.0));
}

/// it should read a live mid-animation value through get_current_property
#[test]
fn current_property_reads_live_value() {
    let (mut core, object) = setup();
    let animation = core.create_animation(1.0);
    core.set_end_action(animation, EndAction::Discard);
    core.animate_to(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(10.0),
        AnimateOptions::default(),
    );
    core.play(animation);

    core.update(0.5);
    core.update(0.0);
    let live = current_float(&core, object, VALUE);
    assert!((live - 5.0).abs() < 1e-4, "expected ~5.0, got {live}");
    assert_eq!(core.get_property(object, VALUE), PropertyValue::Float(0.0));
}

/// it should notify targets ordered by increasing connector end time
#[test]
fn notification_order_by_end_time() {
    let (mut core, object) = setup();
    let animation = core.create_animation(5.0);

    for (index, end) in [(VALUE, 5.0f32), (OTHER, 1.0), (THIRD, 3.0)] {
        assert!(core.animate_to(
            animation,
            PropertyTarget::whole(object, index),
            PropertyValue::Float(end),
            AnimateOptions {
                time_period: Some(TimePeriod::new(end)),
                ..Default::default()
            },
        ));
    }

    assert_eq!(core.notification_order(animation), vec![OTHER, THIRD, VALUE]);

    // Observable effect: two connectors on one property settle on the value
    // of the later-ending connector.
    let (mut core, object) = setup();
    let animation = core.create_animation(5.0);
    core.animate_to(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(100.0),
        AnimateOptions {
            time_period: Some(TimePeriod::new(5.0)),
            ..Default::default()
        },
    );
    core.animate_to(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(7.0),
        AnimateOptions {
            time_period: Some(TimePeriod::new(1.0)),
            ..Default::default()
        },
    );
    core.play(animation);
    assert_eq!(core.get_property(object, VALUE), PropertyValue::Float(100.0));
}

/// it should loop the requested number of times before finishing once
#[test]
fn loop_count_finishes_once() {
    let (mut core, object) = setup();
    let animation = core.create_animation(1.0);
    core.set_loop_count(animation, 2);
    core.animate_to(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(10.0),
        AnimateOptions::default(),
    );
    core.play(animation);

    let mut finished = 0;
    for _ in 0..4 {
        finished += finished_events(&mut core, 0.6);
    }
    assert_eq!(finished, 1);
    assert_eq!(core.current_loop(animation), 2);
}

/// it should clamp and order the play range and respect it when playing from
/// a progress
#[test]
fn play_range_validation() {
    let (mut core, object) = setup();
    let animation = core.create_animation(1.0);
    core.animate_to(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(10.0),
        AnimateOptions::default(),
    );

    // Reversed range is re-ordered; out-of-range values are rejected.
    core.set_play_range(animation, [0.8, 0.2]);
    core.set_play_range(animation, [-0.5, 2.0]);

    // 0.9 is outside [0.2, 0.8]: the play request is ignored.
    core.play_from(animation, 0.9);
    assert_eq!(core.animation_state(animation), Some(AnimationState::Cleared));

    core.play_from(animation, 0.5);
    assert_eq!(core.animation_state(animation), Some(AnimationState::Playing));
}

/// it should play in reverse with a negative speed factor and finish at the
/// range start
#[test]
fn negative_speed_factor_reverses() {
    let (mut core, object) = setup();
    let animation = core.create_animation(1.0);
    core.set_speed_factor(animation, -1.0);
    core.animate_to(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(10.0),
        AnimateOptions::default(),
    );
    core.play(animation);

    let mut finished = 0;
    for _ in 0..3 {
        finished += finished_events(&mut core, 0.4);
    }
    assert_eq!(finished, 1);
    // Two settle frames drain the transient forward writes, leaving the
    // window-start value reverse playback finished on.
    core.update(0.0);
    core.update(0.0);
    assert_eq!(current_float(&core, object, VALUE), 0.0);
}

/// it should fire the progress marker exactly once per play cycle
#[test]
fn progress_marker_fires_once() {
    let (mut core, object) = setup();
    let animation = core.create_animation(1.0);
    core.set_progress_notification(animation, 0.5);
    core.animate_to(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(10.0),
        AnimateOptions::default(),
    );
    core.play(animation);

    let progress_events = |core: &mut Core, dt: f32| {
        core.update(dt)
            .events
            .iter()
            .filter(|e| matches!(e, CoreEvent::ProgressReached { .. }))
            .count()
    };

    assert_eq!(progress_events(&mut core, 0.3), 0);
    assert_eq!(progress_events(&mut core, 0.3), 1);
    assert_eq!(progress_events(&mut core, 0.2), 0);
}

/// it should force-bake current values on pause, whatever the end action
#[test]
fn pause_bakes_current_values() {
    let (mut core, object) = setup();
    let animation = core.create_animation(1.0);
    core.set_end_action(animation, EndAction::Discard);
    core.animate_to(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(10.0),
        AnimateOptions::default(),
    );
    core.play(animation);
    core.update(0.5);

    core.pause(animation);
    assert_eq!(core.animation_state(animation), Some(AnimationState::Paused));
    core.update(0.0);
    core.update(0.0);

    // The paused value persists across reset passes even though the end
    // action discards.
    let paused = current_float(&core, object, VALUE);
    assert!((paused - 5.0).abs() < 1e-4, "expected ~5.0, got {paused}");
}

/// it should animate by a relative delta on top of the base value
#[test]
fn animate_by_adds_relative() {
    let (mut core, object) = setup();
    core.set_property(object, VALUE, PropertyValue::Float(3.0));

    let animation = core.create_animation(1.0);
    core.animate_by(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(4.0),
        AnimateOptions::default(),
    );
    core.play(animation);
    // The cache settles on base + delta at play time.
    assert_eq!(core.get_property(object, VALUE), PropertyValue::Float(7.0));

    assert_eq!(finished_events(&mut core, 1.1), 1);
    assert_eq!(current_float(&core, object, VALUE), 7.0);
}

/// it should interpolate keyframes and settle on the last key
#[test]
fn animate_between_keyframes() {
    let (mut core, object) = setup();
    let animation = core.create_animation(1.0);
    let mut frames = KeyFrames::new();
    frames.add(0.0, PropertyValue::Float(0.0));
    frames.add(0.5, PropertyValue::Float(8.0));
    frames.add(1.0, PropertyValue::Float(2.0));
    assert!(core.animate_between(
        animation,
        PropertyTarget::whole(object, VALUE),
        frames,
        Interpolation::Linear,
        AnimateOptions::default(),
    ));
    core.play(animation);

    assert_eq!(finished_events(&mut core, 1.1), 1);
    assert_eq!(current_float(&core, object, VALUE), 2.0);
    assert_eq!(core.get_property(object, VALUE), PropertyValue::Float(2.0));
}

/// it should animate one component lane and leave the others at base
#[test]
fn animate_component_lane() {
    let (mut core, object) = setup();
    let animation = core.create_animation(1.0);
    assert!(core.animate_to(
        animation,
        PropertyTarget::component(object, POSITION, 1),
        PropertyValue::Float(5.0),
        AnimateOptions::default(),
    ));
    core.play(animation);
    assert_eq!(finished_events(&mut core, 1.1), 1);
    assert_eq!(
        core.get_current_property(object, POSITION),
        PropertyValue::Vec3([0.0, 5.0, 0.0])
    );
}

/// it should reject type-mismatched and non-animatable animate calls
#[test]
fn animate_validation_rejects() {
    let (mut core, object) = setup();
    let animation = core.create_animation(1.0);

    // Wrong value type for the property.
    assert!(!core.animate_to(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Vec3([1.0, 2.0, 3.0]),
        AnimateOptions::default(),
    ));
    // No such component lane on a scalar.
    assert!(!core.animate_to(
        animation,
        PropertyTarget::component(object, VALUE, 2),
        PropertyValue::Float(1.0),
        AnimateOptions::default(),
    ));
    // Unknown object.
    assert!(!core.animate_to(
        animation,
        PropertyTarget::whole(ObjectId(999), VALUE),
        PropertyValue::Float(1.0),
        AnimateOptions::default(),
    ));
}

/// it should auto-extend the duration to cover the latest-ending connector
#[test]
fn duration_extends_to_cover_connectors() {
    let (mut core, object) = setup();
    let animation = core.create_animation(1.0);
    core.animate_to(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(10.0),
        AnimateOptions {
            time_period: Some(TimePeriod::with_delay(1.0, 2.0)),
            ..Default::default()
        },
    );
    assert_eq!(core.animation_duration(animation), Some(3.0));
}

/// it should resolve a play issued during a pending stop once the stop
/// confirms
#[test]
fn play_during_stopping_resumes() {
    let (mut core, object) = setup();
    let animation = core.create_animation(1.0);
    core.animate_to(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(10.0),
        AnimateOptions::default(),
    );
    core.play(animation);
    core.update(0.2);

    core.stop(animation);
    assert_eq!(
        core.animation_state(animation),
        Some(AnimationState::Stopping)
    );
    core.play(animation);
    assert_eq!(
        core.animation_state(animation),
        Some(AnimationState::PlayingDuringStopping)
    );

    // The stop confirms; the superseding play keeps the animation running.
    let events = core.update(0.1).events.clone();
    assert!(events
        .iter()
        .any(|e| matches!(e, CoreEvent::Finished { .. })));
    assert_eq!(core.animation_state(animation), Some(AnimationState::Playing));

    // The re-play eventually finishes on its own, exactly once more.
    let mut finished = 0;
    for _ in 0..4 {
        finished += finished_events(&mut core, 0.5);
    }
    assert_eq!(finished, 1);
}

/// it should clear connectors and reset the scene object so a cleared
/// animation owes no notifications
#[test]
fn clear_resets_everything() {
    let (mut core, object) = setup();
    let animation = core.create_animation(1.0);
    core.animate_to(
        animation,
        PropertyTarget::whole(object, VALUE),
        PropertyValue::Float(10.0),
        AnimateOptions::default(),
    );
    core.play(animation);
    core.update(0.2);

    core.clear(animation);
    assert_eq!(core.animation_state(animation), Some(AnimationState::Cleared));

    // No finished signal arrives for the cleared cycle.
    let mut finished = 0;
    for _ in 0..4 {
        finished += finished_events(&mut core, 0.5);
    }
    assert_eq!(finished, 0);
    assert_eq!(core.notification_order(animation), Vec::<PropertyIndex>::new());
}
