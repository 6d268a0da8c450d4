use super::*;

#[test]
fn reaches_target_exactly_after_duration() {
    let mut nav = ScrollTo::new(0.0, 1200.0, DEFAULT_NAV_DURATION).unwrap();
    let mut last = 0.0;
    for _ in 0..10 {
        let pos = nav.advance(0.05);
        assert!(pos >= last);
        last = pos;
    }
    assert!(!nav.is_done());
    assert_eq!(nav.advance(1.0), 1200.0);
    assert!(nav.is_done());
}

#[test]
fn in_out_curve_is_symmetric_at_midpoint() {
    let mut nav = ScrollTo::new(100.0, 300.0, 0.8).unwrap();
    let mid = nav.advance(0.4);
    assert!((mid - 200.0).abs() < 1e-9);
}

#[test]
fn zero_duration_jumps() {
    let mut nav = ScrollTo::new(50.0, 10.0, 0.0).unwrap();
    assert!(nav.is_done());
    assert_eq!(nav.advance(0.0), 10.0);
}

#[test]
fn rejects_bad_input() {
    assert!(ScrollTo::new(0.0, f64::NAN, 0.8).is_err());
    assert!(ScrollTo::new(0.0, 10.0, -1.0).is_err());
}
