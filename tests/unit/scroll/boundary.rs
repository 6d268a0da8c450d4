use super::*;

fn vp() -> Viewport {
    Viewport::new(1280.0, 800.0).unwrap()
}

#[test]
fn parses_keyword_and_percent_forms() {
    let b: Boundary = "top 80%".parse().unwrap();
    assert_eq!(b.element, Anchor::Top);
    assert_eq!(b.viewport, Anchor::Percent(80.0));

    let b: Boundary = "center 120px".parse().unwrap();
    assert_eq!(b.element, Anchor::Center);
    assert_eq!(b.viewport, Anchor::Px(120.0));

    assert!("top".parse::<Boundary>().is_err());
    assert!("top 80% extra".parse::<Boundary>().is_err());
    assert!("middle top".parse::<Boundary>().is_err());
}

#[test]
fn element_top_at_80_percent_of_viewport() {
    let b: Boundary = "top 80%".parse().unwrap();
    // Element at 2000px: its top reaches 80% of an 800px viewport at scroll 1360.
    assert_eq!(b.resolve(2000.0, 600.0, vp()), 1360.0);

    let top_top: Boundary = "top top".parse().unwrap();
    assert_eq!(top_top.resolve(0.0, 800.0, vp()), 0.0);
}

#[test]
fn relative_end_uses_viewport_height() {
    let end: EndBoundary = "+=130%".parse().unwrap();
    assert_eq!(end, EndBoundary::After(Length::Percent(130.0)));
    assert_eq!(end.resolve(0.0, 0.0, 800.0, vp()), 1040.0);

    let px: EndBoundary = "+=400".parse().unwrap();
    assert_eq!(px.resolve(100.0, 0.0, 800.0, vp()), 500.0);
}

#[test]
fn default_end_is_bottom_top() {
    let end = EndBoundary::default();
    assert_eq!(end.resolve(0.0, 2000.0, 600.0, vp()), 2600.0);
}

#[test]
fn boundaries_round_trip_through_strings() {
    let b: Boundary = serde_json::from_str("\"top 50%\"").unwrap();
    assert_eq!(serde_json::to_string(&b).unwrap(), "\"top 50%\"");
    let e: EndBoundary = serde_json::from_str("\"+=130%\"").unwrap();
    assert_eq!(serde_json::to_string(&e).unwrap(), "\"+=130%\"");
}
