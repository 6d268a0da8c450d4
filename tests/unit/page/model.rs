use super::*;

const MINIMAL: &str = r#"{
    "viewport": { "width": 1440, "height": 900 },
    "sections": [
        { "id": "hero", "tag": "section", "class": "hero", "height": "100vh",
          "children": [
              { "class": "hero-headline", "top": "30vh", "height": "20vh",
                "children": [ { "tag": "span", "height": "6vh", "repeat": 3 } ] }
          ] },
        { "id": "work", "tag": "section", "class": "work", "height": "2400px",
          "start": "top 85%", "end": "+=300" }
    ]
}"#;

#[test]
fn minimal_document_fills_in_defaults() {
    let page: PageDef = MINIMAL.parse().unwrap();
    assert_eq!(page.seed, 0);
    assert!(page.overlay.is_none());
    assert_eq!(page.particles, ParticleDistribution::default());
    assert_eq!(page.hero_exit, HeroExitConfig::default());
    assert_eq!(page.motion, MotionConfig::default());

    let hero = &page.sections[0];
    assert_eq!(hero.start.to_string(), "top 80%");
    assert_eq!(String::from(hero.end), "top 50%");
    assert_eq!(hero.node.height, Length::Vh(100.0));
    let span = &hero.node.children[0].children[0];
    assert_eq!(span.tag, "span");
    assert_eq!(span.repeat, 3);
    assert_eq!(hero.node.children[0].tag, "div");

    let work = &page.sections[1];
    assert_eq!(work.start.to_string(), "top 85%");
    assert_eq!(work.end, EndBoundary::After(Length::Px(300.0)));
}

#[test]
fn node_spec_splits_classes() {
    let def = NodeDef {
        tag: "div".into(),
        class: "  project-card  featured ".into(),
        top: Length::Px(10.0),
        left: Length::Percent(25.0),
        height: Length::Px(20.0),
        repeat: 1,
        children: Vec::new(),
    };
    let spec = def.spec();
    assert_eq!(spec.classes, vec!["project-card", "featured"]);
    assert_eq!(spec.top, Length::Px(10.0));
    assert_eq!(spec.left, Length::Percent(25.0));
    assert!(!spec.fixed);
}

#[test]
fn json_round_trip_preserves_the_page() {
    let page: PageDef = MINIMAL.parse().unwrap();
    let back = PageDef::from_json_str(&page.to_json_string().unwrap()).unwrap();
    assert_eq!(back, page);
}

#[test]
fn rejects_duplicate_section_ids() {
    let doc = MINIMAL.replace("\"id\": \"work\"", "\"id\": \"hero\"");
    let err = PageDef::from_json_str(&doc).unwrap_err();
    assert!(matches!(err, StageError::Validation(_)));
    assert!(err.to_string().contains("duplicate section id 'hero'"));
}

#[test]
fn rejects_zero_repeat_with_path() {
    let doc = MINIMAL.replace("\"repeat\": 3", "\"repeat\": 0");
    let err = PageDef::from_json_str(&doc).unwrap_err();
    assert!(err.to_string().contains("hero/0/0"), "{err}");
}

#[test]
fn rejects_repeated_section() {
    let doc = MINIMAL.replace(
        "\"height\": \"2400px\",",
        "\"height\": \"2400px\", \"repeat\": 2,",
    );
    assert!(PageDef::from_json_str(&doc).is_err());
}

#[test]
fn rejects_bad_viewport_and_empty_page() {
    let doc = MINIMAL.replace("\"width\": 1440", "\"width\": 0");
    assert!(PageDef::from_json_str(&doc).is_err());

    let empty = r#"{ "viewport": { "width": 10, "height": 10 }, "sections": [] }"#;
    let err = PageDef::from_json_str(empty).unwrap_err();
    assert!(err.to_string().contains("at least one section"));
}

#[test]
fn rejects_negative_motion() {
    let mut page: PageDef = MINIMAL.parse().unwrap();
    page.motion.scrub_lag = -0.1;
    let err = page.validate().unwrap_err();
    assert!(err.to_string().contains("motion.scrub_lag"));
}

#[test]
fn syntax_errors_are_serde_errors() {
    let err = PageDef::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, StageError::Serde(_)));

    let bad_boundary = MINIMAL.replace("top 85%", "middle nowhere");
    assert!(PageDef::from_json_str(&bad_boundary).is_err());
}

#[test]
fn content_is_plain_data() {
    let doc = MINIMAL.replacen(
        "\"sections\"",
        r#""content": {
            "projects": [ { "title": "Atlas", "tags": ["rust"], "github": "https://example.com/atlas" } ],
            "metrics": [ { "value": "12+", "label": "years" } ],
            "contact": { "email": "hello@example.com" }
        },
        "sections""#,
        1,
    );
    let page = PageDef::from_json_str(&doc).unwrap();
    assert_eq!(page.content.projects[0].title, "Atlas");
    assert_eq!(page.content.projects[0].live, None);
    assert_eq!(page.content.metrics[0].value, "12+");
    assert_eq!(page.content.contact.email, "hello@example.com");
    assert!(page.content.testimonials.is_empty());
}

#[test]
fn missing_file_reports_the_path() {
    let err = PageDef::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.json"), "{err}");
}
