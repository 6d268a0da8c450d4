use super::*;
use crate::{
    animation::{
        ease::Ease,
        props::Prop,
        tween::{Targets, TweenSpec},
    },
    effects::hero_exit::HeroExit,
    foundation::core::Length,
    scene::tree::NodeSpec,
};

struct Page {
    scene: Scene,
    hero: NodeId,
    about: NodeId,
    quote: NodeId,
}

fn page() -> Page {
    let mut scene = Scene::new(Viewport::new(1000.0, 800.0).unwrap()).unwrap();
    let root = scene.root();
    let hero = scene
        .append(root, NodeSpec::tagged("section", "hero", Length::Px(800.0)))
        .unwrap();
    for class in ["hero-bg", "hero-headline", "hero-card", "hero-cta"] {
        scene
            .append(hero, NodeSpec::div(class, Length::Px(100.0)))
            .unwrap();
    }
    let about = scene
        .append(root, NodeSpec::tagged("section", "about", Length::Px(1000.0)))
        .unwrap();
    let quote = scene
        .append(
            about,
            NodeSpec::div("quote", Length::Px(50.0)).at(Length::Px(100.0)),
        )
        .unwrap();
    scene.layout();
    Page {
        scene,
        hero,
        about,
        quote,
    }
}

fn fade_quote(p: &Page, duration: f64) -> Timeline {
    Timeline::single(
        &p.scene,
        p.about,
        TweenSpec::from_to(
            Targets::select(".quote").unwrap(),
            Props::new().with(Prop::Opacity, 0.0),
            Props::new().with(Prop::Opacity, 1.0),
        )
        .duration(duration)
        .ease(Ease::Linear),
    )
    .unwrap()
}

fn bind(p: &Page, spec: TriggerSpec) -> TriggerBinding {
    let mut b = TriggerBinding::new(spec, &p.scene).unwrap();
    b.resolve(&p.scene);
    b
}

fn opacity_written(update: &BindingUpdate, node: NodeId) -> Option<f64> {
    update.writes.iter().rev().find_map(|w| match w {
        StyleWrite::Nodes(map) => map.get(&node).and_then(|p| p.get(Prop::Opacity)),
        StyleWrite::Selected(_) => None,
    })
}

#[test]
fn toggle_actions_parse_and_print() {
    let a: ToggleActions = "play none none reverse".parse().unwrap();
    assert_eq!(a.on_enter, ToggleAction::Play);
    assert_eq!(a.on_leave_back, ToggleAction::Reverse);
    assert_eq!(a.to_string(), "play none none reverse");
    assert!("play none".parse::<ToggleActions>().is_err());
    assert!("play none none rewind".parse::<ToggleActions>().is_err());
    assert_eq!(ToggleActions::default().to_string(), "play none none none");
}

#[test]
fn range_progress_is_clamped_and_linear() {
    let r = ScrollRange {
        start: 160.0,
        end: 400.0,
    };
    assert_eq!(r.progress(0.0), 0.0);
    assert_eq!(r.progress(280.0), 0.5);
    assert_eq!(r.progress(10_000.0), 1.0);
    assert_eq!(r.phase(160.0), Phase::Before);
    assert_eq!(r.phase(161.0), Phase::Active);
    assert_eq!(r.phase(400.0), Phase::After);
}

#[test]
fn empty_range_is_an_instant_toggle() {
    let r = ScrollRange {
        start: 800.0,
        end: 800.0,
    };
    assert_eq!(r.progress(799.0), 0.0);
    assert_eq!(r.progress(800.0), 1.0);
    assert_eq!(r.phase(799.9), Phase::Before);
    assert_eq!(r.phase(800.0), Phase::After);
}

#[test]
fn boundaries_resolve_against_trigger_layout() {
    let p = page();
    let spec = TriggerSpec::scrub(p.about, fade_quote(&p, 1.0), 0.0)
        .start("top 80%")
        .unwrap()
        .end("top 50%")
        .unwrap();
    let b = bind(&p, spec);
    assert_eq!(
        b.range(),
        Some(ScrollRange {
            start: 160.0,
            end: 400.0
        })
    );
}

#[test]
fn scrub_without_lag_tracks_scroll_exactly() {
    let p = page();
    let spec = TriggerSpec::scrub(p.about, fade_quote(&p, 1.0), 0.0)
        .start("top 80%")
        .unwrap()
        .end("top 50%")
        .unwrap();
    let mut b = bind(&p, spec);
    let vp = p.scene.viewport();

    let up = b.update(280.0, true, 0.016, vp);
    assert_eq!(up.events, vec![TriggerEvent::Enter]);
    assert_eq!(opacity_written(&up, p.quote), Some(0.5));

    // Nothing moved: nothing written.
    let idle = b.update(280.0, false, 0.016, vp);
    assert!(idle.writes.is_empty());
}

#[test]
fn scrub_lag_converges_without_further_input() {
    let p = page();
    let spec = TriggerSpec::scrub(p.about, fade_quote(&p, 1.0), 0.6)
        .start("top 80%")
        .unwrap()
        .end("top 50%")
        .unwrap();
    let mut b = bind(&p, spec);
    let vp = p.scene.viewport();

    b.update(400.0, true, 0.1, vp);
    let first = b.smoothed_progress();
    assert!(first > 0.0 && first < 1.0);
    assert_eq!(b.progress(), 1.0);

    let mut last = first;
    for _ in 0..100 {
        b.update(400.0, false, 0.1, vp);
        assert!(b.smoothed_progress() >= last);
        last = b.smoothed_progress();
    }
    assert_eq!(b.smoothed_progress(), 1.0);
}

#[test]
fn toggle_plays_on_enter_and_reverses_on_leave_back() {
    let p = page();
    let actions = "play none none reverse".parse().unwrap();
    let spec = TriggerSpec::toggle(p.about, fade_quote(&p, 0.6), actions)
        .start("top 60%")
        .unwrap();
    let mut b = bind(&p, spec);
    let vp = p.scene.viewport();

    let init = b.update(0.0, true, 0.0, vp);
    assert!(init.events.is_empty());
    assert_eq!(opacity_written(&init, p.quote), Some(0.0));

    let enter = b.update(400.0, true, 0.1, vp);
    assert_eq!(enter.events, vec![TriggerEvent::Enter]);
    assert!(b.playhead().unwrap().is_running());

    b.update(400.0, false, 1.0, vp);
    assert_eq!(b.playhead().unwrap().time(), 0.6);

    let back = b.update(0.0, true, 0.1, vp);
    assert_eq!(back.events, vec![TriggerEvent::LeaveBack]);
    assert!((b.playhead().unwrap().time() - 0.5).abs() < 1e-12);
}

#[test]
fn jumping_across_the_range_fires_both_events() {
    let p = page();
    let spec = TriggerSpec::scrub(p.about, fade_quote(&p, 1.0), 0.0)
        .start("top 80%")
        .unwrap()
        .end("top 50%")
        .unwrap();
    let mut b = bind(&p, spec);
    let vp = p.scene.viewport();

    let down = b.update(5000.0, true, 0.016, vp);
    assert_eq!(down.events, vec![TriggerEvent::Enter, TriggerEvent::Leave]);
    assert_eq!(b.phase(), Phase::After);

    let up = b.update(0.0, true, 0.016, vp);
    assert_eq!(
        up.events,
        vec![TriggerEvent::EnterBack, TriggerEvent::LeaveBack]
    );
    assert_eq!(opacity_written(&up, p.quote), Some(0.0));
}

#[test]
fn pinned_derive_parks_and_restores() {
    let p = page();
    let spec = TriggerSpec::derive(p.hero, HeroExit::default())
        .start("top top")
        .unwrap()
        .end("+=130%")
        .unwrap()
        .pinned(true);
    let mut b = bind(&p, spec);
    let vp = p.scene.viewport();

    assert_eq!(b.pin_spacer(&p.scene), Some(1040.0));

    let mid = b.update(520.0, true, 0.016, vp);
    assert_eq!(mid.pin_offset, Some(520.0));
    assert!(mid.writes.is_empty(), "below the exit threshold");

    let late = b.update(1040.0 * 0.85, true, 0.016, vp);
    assert_eq!(late.writes.len(), 1);

    let past = b.update(3000.0, true, 0.016, vp);
    assert_eq!(past.events, vec![TriggerEvent::Leave]);
    assert_eq!(past.pin_offset, Some(1040.0));

    let top = b.update(0.0, true, 0.016, vp);
    assert_eq!(
        top.events,
        vec![TriggerEvent::EnterBack, TriggerEvent::LeaveBack]
    );
    assert_eq!(top.pin_offset, Some(0.0));
    let Some(StyleWrite::Selected(rest)) = top.writes.last() else {
        panic!("leave-back must end with the rest state");
    };
    let headline = rest
        .iter()
        .find(|d| d.target.as_str() == ".hero-headline")
        .unwrap();
    assert_eq!(headline.props.get(Prop::X), Some(0.0));
    assert_eq!(headline.props.get(Prop::Opacity), Some(1.0));
}

#[test]
fn unresolved_binding_does_nothing() {
    let p = page();
    let spec = TriggerSpec::scrub(p.about, fade_quote(&p, 1.0), 0.0);
    let mut b = TriggerBinding::new(spec, &p.scene).unwrap();
    let up = b.update(300.0, true, 0.016, p.scene.viewport());
    assert_eq!(up, BindingUpdate::default());
}

#[test]
fn negative_lag_is_rejected() {
    let p = page();
    let spec = TriggerSpec::scrub(p.about, fade_quote(&p, 1.0), -1.0);
    assert!(TriggerBinding::new(spec, &p.scene).is_err());
}
