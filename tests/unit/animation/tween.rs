use super::*;
use crate::animation::props::Prop;

fn slide() -> TweenSpec {
    TweenSpec::from_to(
        Targets::Nodes(vec![]),
        Props::new().with(Prop::Y, 50.0).with(Prop::Opacity, 0.0),
        Props::new().with(Prop::Y, 0.0).with(Prop::Opacity, 1.0),
    )
    .duration(0.8)
    .ease(Ease::Linear)
}

#[test]
fn sample_holds_from_before_start_and_to_after_end() {
    let t = slide();
    assert_eq!(t.sample(-0.1), t.from);
    assert_eq!(t.sample(0.8), t.to);
    assert_eq!(t.sample(5.0), t.to);
    let mid = t.sample(0.4);
    assert!((mid.get(Prop::Y).unwrap() - 25.0).abs() < 1e-9);
}

#[test]
fn zero_duration_jumps_to_target() {
    let t = slide().duration(0.0);
    assert_eq!(t.sample(0.0), t.to);
}

#[test]
fn span_accounts_for_stagger() {
    let t = slide().stagger(0.08);
    assert_eq!(t.span(0), 0.8);
    assert_eq!(t.span(1), 0.8);
    assert!((t.span(2) - 0.88).abs() < 1e-12);
}

#[test]
fn validate_rejects_bad_timing() {
    assert!(slide().duration(-1.0).validate().is_err());
    assert!(slide().stagger(f64::NAN).validate().is_err());
    assert!(slide().validate().is_ok());
}
