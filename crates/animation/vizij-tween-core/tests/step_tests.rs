use std::cell::{Cell, RefCell};
use std::rc::Rc;

use vizij_tween_core::{
    props, Animation, AnimationConfig, Clock, Easing, FrameClock, KeyframeSpec, PropertyBag,
    PropertyMap, Strategy, Subject, SubjectAdapter, SubjectRef, Value,
};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn bag(pairs: &[(&str, f32)]) -> (Rc<RefCell<PropertyBag>>, SubjectRef) {
    let b = Rc::new(RefCell::new(PropertyBag::new(props(pairs.iter().copied()))));
    let s: SubjectRef = b.clone();
    (b, s)
}

fn scalar(b: &Rc<RefCell<PropertyBag>>, name: &str) -> f32 {
    b.borrow()
        .scalar(name)
        .unwrap_or_else(|| panic!("{name} is not a scalar"))
}

fn three_keys() -> Vec<KeyframeSpec> {
    vec![
        KeyframeSpec::new(0, props([("x", 0.0)])),
        KeyframeSpec::new(5, props([("x", 50.0)])),
        KeyframeSpec::new(10, props([("x", 100.0)])),
    ]
}

/// it should interpolate linearly across keyframes while ticking
#[test]
fn ticking_interpolates_between_keyframes() {
    let clock = Rc::new(FrameClock::new(30.0));
    let (b, s) = bag(&[("x", 0.0)]);
    let mut anim = Animation::new(
        10,
        three_keys(),
        AnimationConfig::new().with_subject(s).timeline_bound(false),
        clock.clone(),
    )
    .unwrap();

    anim.play();
    let mut seen = Vec::new();
    for _ in 0..7 {
        clock.tick(&mut [&mut anim]);
        seen.push(scalar(&b, "x"));
    }
    assert!(approx(seen[1], 20.0, 1e-4), "frame 2: {}", seen[1]);
    assert!(approx(seen[4], 50.0, 1e-4), "frame 5: {}", seen[4]);
    assert!(approx(seen[6], 70.0, 1e-4), "frame 7: {}", seen[6]);
    assert_eq!(anim.frame(), 7);
    assert_eq!(anim.state().current_tween, 1);
}

/// it should fill a property that only appears at a later keyframe
#[test]
fn gap_filled_property_blends_from_subject() {
    let (b, s) = bag(&[("x", 0.0), ("y", 0.0)]);
    let mut anim = Animation::new(
        10,
        vec![
            KeyframeSpec::new(5, props([("x", 10.0)])),
            KeyframeSpec::new(10, props([("x", 10.0), ("y", 10.0)])),
        ],
        AnimationConfig::new().with_subject(s),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();

    anim.step(0.5);
    let subject = b.borrow();
    assert_eq!(subject.values["x"], Value::Scalar(10.0));
    assert_eq!(subject.values["y"], Value::Scalar(5.0));
}

/// it should write the same values when stepped twice at the same progress
#[test]
fn stepping_is_idempotent() {
    let (b, s) = bag(&[("x", 0.0)]);
    let mut anim = Animation::new(
        10,
        three_keys(),
        AnimationConfig::new().with_subject(s),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();

    anim.step(0.3);
    let first = b.borrow().values.clone();
    anim.step(0.3);
    assert_eq!(b.borrow().values, first);
    assert_eq!(b.borrow().writes, 2);
}

/// it should apply the configured easing to whole-timeline progress
#[test]
fn config_easing_remaps_progress() {
    let (b, s) = bag(&[("x", 0.0)]);
    let mut anim = Animation::new(
        10,
        vec![KeyframeSpec::new(10, props([("x", 100.0)]))],
        AnimationConfig::new()
            .with_subject(s)
            .with_easing_name("in-quad"),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();

    anim.step(0.5);
    assert!(approx(scalar(&b, "x"), 25.0, 1e-4));
}

/// it should degrade an unknown easing name to linear
#[test]
fn unknown_easing_is_linear() {
    let (b, s) = bag(&[("x", 0.0)]);
    let mut anim = Animation::new(
        10,
        vec![KeyframeSpec::new(10, props([("x", 100.0)]))],
        AnimationConfig::new()
            .with_subject(s)
            .with_easing_name("wobble-wobble"),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();

    anim.step(0.5);
    assert!(approx(scalar(&b, "x"), 50.0, 1e-4));
}

/// it should ease only the segment arriving at a keyframe that declares an easing
#[test]
fn per_keyframe_easing_applies_to_its_segment() {
    let (b, s) = bag(&[("x", 0.0)]);
    let mut anim = Animation::new(
        20,
        vec![
            KeyframeSpec::new(10, props([("x", 100.0)])).with_easing(Easing::InQuad),
            KeyframeSpec::new(20, props([("x", 200.0)])),
        ],
        AnimationConfig::new().with_subject(s),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();

    anim.step(0.25);
    assert!(approx(scalar(&b, "x"), 25.0, 1e-4));
    anim.step(0.75);
    assert!(approx(scalar(&b, "x"), 150.0, 1e-4));
}

/// it should accept a caller-supplied easing function
#[test]
fn custom_easing_function() {
    let (b, s) = bag(&[("x", 0.0)]);
    let mut anim = Animation::new(
        10,
        vec![KeyframeSpec::new(10, props([("x", 100.0)]))],
        AnimationConfig::new()
            .with_subject(s)
            .with_easing(Easing::custom(|_| 1.0)),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();

    anim.step(0.1);
    assert!(approx(scalar(&b, "x"), 100.0, 1e-6));
}

/// it should skip several short segments in a single step
#[test]
fn step_skips_over_short_segments() {
    let (b, s) = bag(&[("x", 0.0)]);
    let mut anim = Animation::new(
        100,
        vec![
            KeyframeSpec::new(1, props([("x", 1.0)])),
            KeyframeSpec::new(2, props([("x", 2.0)])),
            KeyframeSpec::new(3, props([("x", 3.0)])),
            KeyframeSpec::new(100, props([("x", 100.0)])),
        ],
        AnimationConfig::new().with_subject(s),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();

    anim.step(0.5);
    assert_eq!(anim.state().current_tween, 3);
    assert!(approx(scalar(&b, "x"), 50.0, 1e-3), "x={}", scalar(&b, "x"));
}

/// it should move back to an earlier segment when progress decreases
#[test]
fn step_walks_backward() {
    let (b, s) = bag(&[("x", 0.0)]);
    let mut anim = Animation::new(
        10,
        three_keys(),
        AnimationConfig::new().with_subject(s),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();

    anim.step(0.9);
    assert_eq!(anim.state().current_tween, 1);
    assert!(approx(scalar(&b, "x"), 90.0, 1e-4));

    anim.step(0.1);
    assert_eq!(anim.state().current_tween, 0);
    assert!(approx(scalar(&b, "x"), 10.0, 1e-4));
}

/// it should animate every bound subject from its own starting values
#[test]
fn subjects_keep_their_own_anchors() {
    let (a, sa) = bag(&[("x", 0.0)]);
    let (b, sb) = bag(&[("x", 5.0)]);
    let mut anim = Animation::new(
        10,
        vec![KeyframeSpec::new(10, props([("x", 10.0)]))],
        AnimationConfig::new().with_subjects([sa, sb]),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();

    anim.step(0.5);
    assert!(approx(scalar(&a, "x"), 5.0, 1e-5));
    assert!(approx(scalar(&b, "x"), 7.5, 1e-5));
}

/// it should stop writing to a subject once it has been removed
#[test]
fn removed_subject_is_left_alone() {
    let (a, sa) = bag(&[("x", 0.0)]);
    let (b, sb) = bag(&[("x", 0.0)]);
    let mut anim = Animation::new(
        10,
        vec![KeyframeSpec::new(10, props([("x", 10.0)]))],
        AnimationConfig::new().with_subjects([sa.clone(), sb]),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();

    assert!(anim.remove_subject(&sa));
    assert!(!anim.remove_subject(&sa));
    assert_eq!(anim.subject_count(), 1);

    anim.step(0.5);
    assert_eq!(a.borrow().writes, 0);
    assert!(approx(scalar(&b, "x"), 5.0, 1e-5));
}

/// it should do nothing when stepped without subjects
#[test]
fn step_without_subjects_is_a_noop() {
    let mut anim = Animation::new(
        10,
        three_keys(),
        AnimationConfig::new(),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();
    anim.step(0.5);
    assert_eq!(anim.state().current_tween, 0);
    assert!(!anim.schedule().is_filled());
}

/// it should write one property at a time with the discrete property strategy
#[test]
fn discrete_property_strategy() {
    let (b, s) = bag(&[("x", 0.0), ("y", 0.0)]);
    let mut anim = Animation::new(
        10,
        vec![KeyframeSpec::new(10, props([("x", 10.0), ("y", 20.0)]))],
        AnimationConfig::new()
            .with_subject(s)
            .with_strategy(Strategy::DiscreteProperty),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();

    anim.step(0.5);
    let subject = b.borrow();
    assert_eq!(subject.writes, 2);
    assert_eq!(subject.values["y"], Value::Scalar(10.0));
}

struct Scaled {
    factor: f32,
    sets: Cell<usize>,
}

impl SubjectAdapter for Scaled {
    fn get(&self, subject: &dyn Subject, names: &[String]) -> PropertyMap {
        let mut out = subject.attr();
        out.retain(|k, _| names.contains(k));
        out
    }

    fn set(&self, subject: &mut dyn Subject, values: &PropertyMap) {
        self.sets.set(self.sets.get() + 1);
        let scaled: PropertyMap = values
            .iter()
            .map(|(k, v)| match v {
                Value::Scalar(x) => (k.clone(), Value::Scalar(x * self.factor)),
                other => (k.clone(), other.clone()),
            })
            .collect();
        subject.set_attr(&scaled);
    }
}

/// it should route reads and writes through a caller-supplied adapter
#[test]
fn custom_adapter_strategy() {
    let adapter = Rc::new(Scaled {
        factor: 2.0,
        sets: Cell::new(0),
    });
    let (b, s) = bag(&[("x", 0.0)]);
    let mut anim = Animation::new(
        10,
        vec![KeyframeSpec::new(10, props([("x", 10.0)]))],
        AnimationConfig::new(),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();
    anim.add_subject_with(s, Strategy::Custom(adapter.clone()))
        .unwrap();

    anim.step(0.5);
    assert_eq!(adapter.sets.get(), 1);
    assert!(approx(scalar(&b, "x"), 10.0, 1e-5));
}

/// it should hold step-only values until their segment completes
#[test]
fn text_values_step_at_segment_end() {
    let b = Rc::new(RefCell::new(PropertyBag::new(props([("label", "idle")]))));
    let s: SubjectRef = b.clone();
    let mut anim = Animation::new(
        10,
        vec![KeyframeSpec::new(10, props([("label", "done")]))],
        AnimationConfig::new().with_subject(s),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();

    anim.step(0.9);
    assert_eq!(b.borrow().values["label"], Value::from("idle"));
    anim.step(1.0);
    assert_eq!(b.borrow().values["label"], Value::from("done"));
}

/// it should keep the schedule untouched when binding would fail
#[test]
fn failed_binding_does_not_mark_schedule_filled() {
    let (_b, s) = bag(&[("x", 0.0)]);
    let clock: Rc<dyn Clock> = Rc::new(FrameClock::new(30.0));
    let mut anim = Animation::new(
        10,
        vec![
            KeyframeSpec::new(5, props([("x", 5.0)])),
            KeyframeSpec::new(10, props([("y", 1.0)])),
        ],
        AnimationConfig::new(),
        clock,
    )
    .unwrap();

    assert!(anim.add_subject(s).is_err());
    assert!(!anim.schedule().is_filled());
    assert_eq!(anim.subject_count(), 0);
    assert!(!anim.keyframe(10).unwrap().values.contains_key("x"));
}

/// it should hold a property declared only at frame 0 through later keyframes
#[test]
fn frame_zero_only_property_is_held() {
    let (b, s) = bag(&[("x", 3.0)]);
    let mut anim = Animation::new(
        10,
        vec![
            KeyframeSpec::new(0, props([("x", 0.0), ("y", 0.0)])),
            KeyframeSpec::new(10, props([("x", 10.0)])),
        ],
        AnimationConfig::new().with_subject(s),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();
    assert_eq!(anim.keyframe(10).unwrap().values["y"], Value::Scalar(0.0));

    anim.step(1.0);
    assert_eq!(b.borrow().values, props([("x", 10.0), ("y", 0.0)]));
}

/// it should hold at the keyframe values when a custom easing overshoots
#[test]
fn overshooting_easing_is_clamped_to_segment() {
    let (b, s) = bag(&[("x", 0.0)]);
    let mut anim = Animation::new(
        10,
        vec![KeyframeSpec::new(10, props([("x", 100.0)]))],
        AnimationConfig::new()
            .with_subject(s)
            .with_easing(Easing::custom(|t| t * 1.5 - 0.25)),
        Rc::new(FrameClock::new(30.0)),
    )
    .unwrap();

    anim.step(0.9);
    assert!(approx(scalar(&b, "x"), 100.0, 1e-6));
    anim.step(0.1);
    assert!(approx(scalar(&b, "x"), 0.0, 1e-6));
}
