use super::*;
use crate::{foundation::core::Length, scene::selector::Selector};

fn page() -> PageDef {
    PageDef::from_json_str(
        r#"{
        "viewport": { "width": 1000, "height": 800 },
        "sections": [
            { "id": "hero", "tag": "section", "class": "hero", "height": "100vh",
              "start": "top top",
              "children": [
                  { "class": "hero-headline", "height": "100px",
                    "children": [ { "tag": "span", "height": "40px", "repeat": 4 } ] }
              ] },
            { "id": "work", "tag": "section", "class": "work", "height": "1200px" }
        ],
        "overlay": { "class": "glitter", "height": "100vh",
                     "children": [ { "class": "sparkle", "repeat": 2 } ] }
    }"#,
    )
    .unwrap()
}

#[test]
fn builds_sections_in_document_order() {
    let page = page();
    let mut stage = Stage::new(page.viewport).unwrap();
    let reg = SectionRegistry::build(&mut stage, &page).unwrap();

    let ids: Vec<_> = reg.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["hero", "work"]);
    assert_eq!(reg.len(), 2);

    stage.ensure_layout();
    let scene = stage.scene();
    assert_eq!(scene.layout_top(reg.root("hero").unwrap()), Some(0.0));
    assert_eq!(scene.layout_top(reg.root("work").unwrap()), Some(800.0));
    assert_eq!(scene.document_height(), 2000.0);
}

#[test]
fn keeps_per_section_thresholds() {
    let page = page();
    let mut stage = Stage::new(page.viewport).unwrap();
    let reg = SectionRegistry::build(&mut stage, &page).unwrap();
    assert_eq!(reg.get("hero").unwrap().start.to_string(), "top top");
    assert_eq!(reg.get("work").unwrap().start.to_string(), "top 80%");
    assert_eq!(String::from(reg.get("work").unwrap().end), "top 50%");
}

#[test]
fn repeat_stamps_out_children() {
    let page = page();
    let mut stage = Stage::new(page.viewport).unwrap();
    let reg = SectionRegistry::build(&mut stage, &page).unwrap();
    let spans = stage.scene().query(
        reg.root("hero").unwrap(),
        &Selector::parse(".hero-headline span").unwrap(),
    );
    assert_eq!(spans.len(), 4);
}

#[test]
fn overlay_is_fixed_and_outside_the_flow() {
    let page = page();
    let mut stage = Stage::new(page.viewport).unwrap();
    let reg = SectionRegistry::build(&mut stage, &page).unwrap();
    let overlay = reg.overlay().unwrap();
    assert!(stage.scene().node(overlay).unwrap().fixed);
    assert_eq!(stage.scene().node(overlay).unwrap().children.len(), 2);

    stage.ensure_layout();
    assert_eq!(stage.scene().document_height(), 2000.0);
}

#[test]
fn unknown_section_is_a_validation_error() {
    let reg = SectionRegistry::default();
    assert!(reg.is_empty());
    let err = reg.root("nowhere").unwrap_err();
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn register_rejects_duplicates() {
    let mut stage = Stage::new(crate::Viewport::new(100.0, 100.0).unwrap()).unwrap();
    let root = stage.scene().root();
    let a = stage
        .append(root, crate::NodeSpec::div("a", Length::Px(10.0)))
        .unwrap();
    let mut reg = SectionRegistry::default();
    reg.register("a", a, Boundary::ENTER, EndBoundary::default())
        .unwrap();
    assert!(
        reg.register("a", a, Boundary::ENTER, EndBoundary::default())
            .is_err()
    );
}
