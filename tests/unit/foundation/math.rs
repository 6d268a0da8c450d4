use super::*;

#[test]
fn fnv_seeded_hash_is_stable() {
    let mut a = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    a.write_bytes(b"scrollstage");
    let mut b = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    b.write_bytes(b"scroll");
    b.write_bytes(b"stage");
    assert_eq!(a.finish(), b.finish());
    assert_ne!(a.finish(), Fnv1a64::OFFSET_BASIS);
}

#[test]
fn stable_hash_separates_keys_and_seeds() {
    assert_eq!(stable_hash64(1, "hero"), stable_hash64(1, "hero"));
    assert_ne!(stable_hash64(1, "hero"), stable_hash64(1, "work"));
    assert_ne!(stable_hash64(1, "hero"), stable_hash64(2, "hero"));
}

#[test]
fn clamp01_handles_nan_and_bounds() {
    assert_eq!(clamp01(f64::NAN), 0.0);
    assert_eq!(clamp01(-3.0), 0.0);
    assert_eq!(clamp01(3.0), 1.0);
    assert_eq!(clamp01(0.25), 0.25);
    assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    assert!(near(0.1 + 0.2, 0.3, 1e-12));
}
