use super::*;

#[test]
fn viewport_rejects_degenerate_sizes() {
    assert!(Viewport::new(0.0, 800.0).is_err());
    assert!(Viewport::new(1280.0, -1.0).is_err());
    assert!(Viewport::new(f64::NAN, 800.0).is_err());
    assert!(Viewport::new(1280.0, 800.0).is_ok());
}

#[test]
fn length_parses_units() {
    assert_eq!("24px".parse::<Length>().unwrap(), Length::Px(24.0));
    assert_eq!("100vh".parse::<Length>().unwrap(), Length::Vh(100.0));
    assert_eq!("-18vw".parse::<Length>().unwrap(), Length::Vw(-18.0));
    assert_eq!("130%".parse::<Length>().unwrap(), Length::Percent(130.0));
    assert_eq!("12".parse::<Length>().unwrap(), Length::Px(12.0));
    assert!("twelve".parse::<Length>().is_err());
}

#[test]
fn length_resolves_against_viewport() {
    let vp = Viewport::new(1000.0, 800.0).unwrap();
    assert_eq!(Length::Vw(10.0).resolve(vp, 0.0), 100.0);
    assert_eq!(Length::Vh(50.0).resolve(vp, 0.0), 400.0);
    assert_eq!(Length::Percent(25.0).resolve(vp, 200.0), 50.0);
    assert_eq!(Length::Px(7.0).resolve(vp, 200.0), 7.0);
}

#[test]
fn length_serializes_as_compact_string() {
    let json = serde_json::to_string(&Length::Vh(130.0)).unwrap();
    assert_eq!(json, "\"130vh\"");
    let back: Length = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Length::Vh(130.0));
}

#[test]
fn visual_state_identity_maps_to_identity_affine() {
    let s = VisualState::default();
    assert!(s.is_identity());
    assert_eq!(s.to_affine(), kurbo::Affine::IDENTITY);

    let moved = VisualState {
        translate: Vec2::new(10.0, -2.5),
        ..VisualState::default()
    };
    assert_eq!(
        moved.to_affine(),
        kurbo::Affine::translate(Vec2::new(10.0, -2.5))
    );
}
