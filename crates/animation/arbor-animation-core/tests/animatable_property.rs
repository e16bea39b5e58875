use arbor_animation_core::{AnimatableProperty, BufferIndex};

const A: BufferIndex = BufferIndex::A;
const B: BufferIndex = BufferIndex::B;

/// it should converge both slots to the base after a transient set and two
/// reset passes on alternating buffers
#[test]
fn double_buffer_convergence_after_set() {
    let mut prop = AnimatableProperty::new(1.0f32);
    prop.set(A, 9.0);
    assert_eq!(prop.get(A), 9.0);
    assert_eq!(prop.get(B), 1.0);

    // Two frame boundaries on alternating buffer indices.
    prop.reset_to_base_value(B);
    prop.reset_to_base_value(A);
    assert_eq!(prop.get(A), 1.0);
    assert_eq!(prop.get(B), 1.0);
}

/// it should leave both slots at the baked value after one reset
#[test]
fn double_buffer_convergence_after_bake() {
    let mut prop = AnimatableProperty::new(1.0f32);
    prop.bake(A, 4.0);
    assert_eq!(prop.get(A), 4.0);
    assert_eq!(prop.get(B), 4.0);

    prop.reset_to_base_value(B);
    assert_eq!(prop.get(A), 4.0);
    assert_eq!(prop.get(B), 4.0);
    assert_eq!(prop.base_value(), 4.0);
}

/// it should keep a set dirty for two resets and a bake for only one
#[test]
fn dirty_flag_decay_timing() {
    let mut prop = AnimatableProperty::new(0.0f32);
    // Settle the initial baked flag first.
    prop.reset_to_base_value(A);
    assert!(prop.is_clean());

    prop.set(A, 2.0);
    assert!(!prop.is_clean());
    prop.reset_to_base_value(B);
    assert!(!prop.is_clean());
    prop.reset_to_base_value(A);
    assert!(prop.is_clean());

    prop.bake(A, 3.0);
    assert!(!prop.is_clean());
    prop.reset_to_base_value(B);
    assert!(prop.is_clean());
}

/// it should treat a boolean relative set as OR-dominance: true saturates,
/// false never changes anything
#[test]
fn boolean_relative_set_is_saturating_or() {
    let mut prop = AnimatableProperty::new(false);
    prop.set_relative(A, true);
    assert!(prop.get(A));

    // Already true: another true delta is a no-op.
    prop.set_relative(A, true);
    assert!(prop.get(A));

    // A false delta is a no-op by the documented rule, not a toggle.
    prop.set_relative(A, false);
    assert!(prop.get(A));

    let mut untouched = AnimatableProperty::new(false);
    untouched.reset_to_base_value(A);
    assert!(untouched.is_clean());
    untouched.set_relative(A, false);
    // No value change, no dirty transition.
    assert!(!untouched.get(A));
    assert!(untouched.is_clean());
}

/// it should dirty the whole property when one component is set
#[test]
fn component_set_dirties_whole_property() {
    let mut prop = AnimatableProperty::new([1.0f32, 2.0, 3.0]);
    prop.reset_to_base_value(A);
    assert!(prop.is_clean());

    prop.set_y(A, 9.0);
    assert!(!prop.is_clean());
    assert_eq!(prop.get(A), [1.0, 9.0, 3.0]);

    // Transient: both resets restore the base.
    prop.reset_to_base_value(B);
    prop.reset_to_base_value(A);
    assert_eq!(prop.get(A), [1.0, 2.0, 3.0]);
    assert!(prop.is_clean());
}

/// it should bake one lane into both slots and the base
#[test]
fn component_bake_persists() {
    let mut prop = AnimatableProperty::new([0.0f32, 0.0, 0.0, 1.0]);
    prop.bake_w(A, 0.5);
    assert_eq!(prop.get(A), [0.0, 0.0, 0.0, 0.5]);
    assert_eq!(prop.get(B), [0.0, 0.0, 0.0, 0.5]);
    prop.reset_to_base_value(B);
    assert_eq!(prop.get(B), [0.0, 0.0, 0.0, 0.5]);
}

/// it should not shorten a pending two-frame reset when a component bake
/// lands in the same frame as a transient set
#[test]
fn component_bake_keeps_pending_decay() {
    let mut prop = AnimatableProperty::new([0.0f32, 0.0]);
    prop.reset_to_base_value(A);
    assert!(prop.is_clean());

    prop.set_x(A, 5.0);
    prop.bake_y(A, 1.0);
    assert!(!prop.is_clean());

    prop.reset_to_base_value(B);
    // A plain bake would be clean by now; the set keeps it dirty one more
    // frame.
    assert!(!prop.is_clean());
    prop.reset_to_base_value(A);
    assert!(prop.is_clean());

    // The baked lane survived, the set lane reverted.
    assert_eq!(prop.get(A), [0.0, 1.0]);
    assert_eq!(prop.get(B), [0.0, 1.0]);
}

/// it should apply integer relative deltas additively
#[test]
fn integer_relative_adds() {
    let mut prop = AnimatableProperty::new(10i32);
    prop.set_relative(A, 5);
    assert_eq!(prop.get(A), 15);
    prop.bake_relative(A, -3);
    assert_eq!(prop.get(A), 12);
    assert_eq!(prop.base_value(), 12);
}

/// it should initialize both slots and the base without dirtying
#[test]
fn set_initial_touches_everything_silently() {
    let mut prop = AnimatableProperty::new(0.0f32);
    prop.reset_to_base_value(A);
    assert!(prop.is_clean());
    prop.set_initial(7.0);
    assert!(prop.is_clean());
    assert_eq!(prop.get(A), 7.0);
    assert_eq!(prop.get(B), 7.0);
    assert_eq!(prop.base_value(), 7.0);
}

/// it should force a two-frame reset with mark_as_dirty
#[test]
fn mark_as_dirty_forces_reset() {
    let mut prop = AnimatableProperty::new(1.0f32);
    prop.reset_to_base_value(A);
    *prop.get_mut(A) = 42.0; // direct slot write, no flag side effect
    assert!(prop.is_clean());

    prop.mark_as_dirty();
    prop.reset_to_base_value(A);
    assert_eq!(prop.get(A), 1.0);
    assert!(!prop.is_clean());
    prop.reset_to_base_value(B);
    assert!(prop.is_clean());
}
