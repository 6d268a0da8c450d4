use super::*;

fn vp() -> Viewport {
    Viewport::new(1000.0, 800.0).unwrap()
}

fn two_sections() -> (Scene, NodeId, NodeId, NodeId) {
    let mut scene = Scene::new(vp()).unwrap();
    let root = scene.root();
    let hero = scene
        .append(root, NodeSpec::tagged("section", "hero", Length::Vh(100.0)))
        .unwrap();
    let card = scene
        .append(
            hero,
            NodeSpec::div("hero-card", Length::Px(200.0)).at(Length::Vh(18.0)),
        )
        .unwrap();
    let work = scene
        .append(root, NodeSpec::tagged("section", "work", Length::Px(1200.0)))
        .unwrap();
    scene.layout();
    (scene, hero, card, work)
}

#[test]
fn sections_stack_in_order() {
    let (scene, hero, card, work) = two_sections();
    assert_eq!(scene.layout_top(hero), Some(0.0));
    assert_eq!(scene.layout_height(hero), Some(800.0));
    assert_eq!(scene.layout_top(card), Some(144.0));
    assert_eq!(scene.layout_top(work), Some(800.0));
    assert_eq!(scene.document_height(), 2000.0);
    assert_eq!(scene.max_scroll(), 1200.0);
}

#[test]
fn children_resolve_left_against_parent_width() {
    let (mut scene, hero, card, _work) = two_sections();
    let badge = scene
        .append(
            card,
            NodeSpec::div("badge", Length::Px(20.0)).left(Length::Percent(25.0)),
        )
        .unwrap();
    scene.layout();
    assert_eq!(scene.layout_width(hero), Some(1000.0));
    assert_eq!(scene.layout_left(card), Some(0.0));
    assert_eq!(scene.layout_left(badge), Some(250.0));

    scene.set_viewport(Viewport::new(1600.0, 800.0).unwrap()).unwrap();
    scene.layout();
    assert_eq!(scene.layout_left(badge), Some(400.0));
    assert_eq!(scene.layout_width(badge), Some(1600.0));
}

#[test]
fn pin_spacer_shifts_later_sections_only() {
    let (mut scene, hero, _card, work) = two_sections();
    scene.set_pin_spacer(hero, 1040.0);
    assert!(scene.needs_layout());
    scene.layout();
    assert_eq!(scene.layout_top(hero), Some(0.0));
    assert_eq!(scene.layout_top(work), Some(1840.0));
    assert_eq!(scene.document_height(), 3040.0);

    scene.clear_pin_spacer(hero);
    scene.layout();
    assert_eq!(scene.document_height(), 2000.0);
}

#[test]
fn resize_relayouts_viewport_units() {
    let (mut scene, hero, _card, work) = two_sections();
    scene.set_viewport(Viewport::new(1000.0, 600.0).unwrap()).unwrap();
    assert!(scene.needs_layout());
    scene.layout();
    assert_eq!(scene.layout_height(hero), Some(600.0));
    assert_eq!(scene.layout_top(work), Some(600.0));
}

#[test]
fn visual_top_includes_ancestor_pin_offsets() {
    let (mut scene, hero, card, _work) = two_sections();
    scene.set_pin_offset(hero, 250.0);
    assert_eq!(scene.visual_top(hero), Some(250.0));
    assert_eq!(scene.visual_top(card), Some(394.0));
    assert_eq!(scene.layout_top(card), Some(144.0));
}

#[test]
fn query_is_scoped_and_in_document_order() {
    let (mut scene, hero, card, work) = two_sections();
    let a = scene
        .append(work, NodeSpec::div("project-card", Length::Px(10.0)))
        .unwrap();
    let b = scene
        .append(work, NodeSpec::div("project-card", Length::Px(10.0)))
        .unwrap();
    let sel = Selector::parse(".project-card").unwrap();
    assert_eq!(scene.query(work, &sel), vec![a, b]);
    assert!(scene.query(hero, &sel).is_empty());
    assert_eq!(
        scene.query_all(&Selector::parse(".hero-card").unwrap()),
        vec![card]
    );
}

#[test]
fn remove_drops_subtree_and_never_reuses_ids() {
    let (mut scene, hero, card, _work) = two_sections();
    let before = scene.len();
    assert_eq!(scene.remove(hero), 2);
    assert!(!scene.contains(card));
    assert_eq!(scene.len(), before - 2);
    assert_eq!(scene.remove(hero), 0);

    let root = scene.root();
    let fresh = scene
        .append(root, NodeSpec::div("again", Length::Px(1.0)))
        .unwrap();
    assert!(fresh.0 > card.0);
}

#[test]
fn append_rejects_missing_parent() {
    let (mut scene, ..) = two_sections();
    assert!(
        scene
            .append(NodeId(999), NodeSpec::div("x", Length::Px(1.0)))
            .is_err()
    );
}

#[test]
fn snapshot_lists_nodes_in_document_order() {
    let (scene, hero, card, work) = two_sections();
    let snap = scene.snapshot();
    let ids: Vec<NodeId> = snap.nodes.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![hero, card, work]);
    assert_eq!(snap.document_height, 2000.0);
}

#[test]
fn fixed_overlay_takes_no_flow_space() {
    let (mut scene, _hero, _card, work) = two_sections();
    let overlay = scene
        .append(
            scene.root(),
            NodeSpec::div("glitter", Length::Vh(100.0)).fixed(),
        )
        .unwrap();
    let dot = scene
        .append(overlay, NodeSpec::div("dot", Length::Px(2.0)).at(Length::Percent(25.0)))
        .unwrap();
    scene.layout();
    assert_eq!(scene.document_height(), 2000.0);
    assert_eq!(scene.layout_top(work), Some(800.0));
    assert_eq!(scene.layout_top(overlay), Some(0.0));
    assert_eq!(scene.layout_top(dot), Some(200.0));
}
