use super::*;

#[test]
fn endpoints_are_stable() {
    for ease in Ease::ALL {
        assert!(ease.apply(0.0).abs() < 1e-12, "{ease} at 0");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease} at 1");
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in Ease::ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease}");
        assert!(b < c, "{ease}");
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::OutCubic.apply(-1.0), 0.0);
    assert_eq!(Ease::OutCubic.apply(2.0), 1.0);
}

#[test]
fn power_names_map_to_polynomial_degree() {
    assert_eq!("power2.out".parse::<Ease>().unwrap(), Ease::OutCubic);
    assert_eq!("power3.out".parse::<Ease>().unwrap(), Ease::OutQuart);
    assert_eq!("power1.inOut".parse::<Ease>().unwrap(), Ease::InOutQuad);
    assert_eq!("none".parse::<Ease>().unwrap(), Ease::Linear);
    assert_eq!("power2".parse::<Ease>().unwrap(), Ease::OutCubic);
    assert!("bounce.out".parse::<Ease>().is_err());
}

#[test]
fn default_is_power1_out() {
    assert_eq!(Ease::default(), Ease::OutQuad);
    assert_eq!(Ease::OutQuad.to_string(), "power1.out");
}

#[test]
fn serde_uses_names() {
    let json = serde_json::to_string(&Ease::InOutCubic).unwrap();
    assert_eq!(json, "\"power2.inOut\"");
    let back: Ease = serde_json::from_str("\"power3.out\"").unwrap();
    assert_eq!(back, Ease::OutQuart);
}
