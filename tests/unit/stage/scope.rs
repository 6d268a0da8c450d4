use super::*;
use crate::{
    foundation::core::{Length, Viewport},
    scene::tree::NodeSpec,
};

fn stage_with_two_sections() -> (Stage, NodeId, NodeId) {
    let mut stage = Stage::new(Viewport::new(1000.0, 800.0).unwrap()).unwrap();
    let root = stage.scene().root();
    let a = stage
        .append(root, NodeSpec::tagged("section", "a", Length::Px(800.0)))
        .unwrap();
    let b = stage
        .append(root, NodeSpec::tagged("section", "b", Length::Px(800.0)))
        .unwrap();
    for s in [a, b] {
        stage
            .append(s, NodeSpec::div("item", Length::Px(10.0)))
            .unwrap();
    }
    (stage, a, b)
}

#[test]
fn selection_is_confined_to_scope_root() {
    let (mut stage, a, _) = stage_with_two_sections();
    let mut seen = Vec::new();
    stage
        .create_scope(a, |cx| {
            seen = cx.select(".item")?;
            assert_eq!(cx.root(), a);
            Ok(())
        })
        .unwrap();
    assert_eq!(seen.len(), 1);
    assert!(stage.scene().is_within(seen[0], a));
}

#[test]
fn select_one_names_the_missing_selector() {
    let (mut stage, a, _) = stage_with_two_sections();
    let err = stage
        .create_scope(a, |cx| cx.select_one(".missing").map(|_| ()))
        .unwrap_err();
    assert!(err.to_string().contains(".missing"));
}

#[test]
fn failed_build_leaves_nothing_behind() {
    let (mut stage, a, _) = stage_with_two_sections();
    let result = stage.create_scope(a, |cx| {
        cx.particles(a, &ParticleDistribution::default(), 1)?;
        Err(StageError::validation("boom"))
    });
    assert!(result.is_err());
    assert_eq!(stage.field_count(), 0);
    assert!(stage.live_scopes().is_empty());
    assert_eq!(stage.scene().node(a).unwrap().children.len(), 1);
}

#[test]
fn extending_a_disposed_scope_is_a_scope_error() {
    let (mut stage, a, _) = stage_with_two_sections();
    let id = stage.create_scope(a, |_| Ok(())).unwrap();
    assert_eq!(stage.scope_state(id), Some(ScopeState::Active));

    stage
        .extend_scope(id, |cx| cx.particles(a, &ParticleDistribution::default(), 2))
        .unwrap();
    assert_eq!(stage.field_count(), 1);

    assert!(stage.dispose(id));
    assert!(!stage.dispose(id));
    let err = stage
        .extend_scope(id, |cx| cx.particles(a, &ParticleDistribution::default(), 3))
        .unwrap_err();
    assert!(matches!(err, StageError::Scope(_)));
    assert_eq!(stage.field_count(), 0);
}
