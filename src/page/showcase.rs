//! The portfolio page's choreography: one scope per section plus the glitter field.

use crate::{
    animation::{
        ease::Ease,
        props::{Prop, Props},
        timeline::{RelativeOffset, Step},
        tween::{Targets, TweenSpec},
    },
    effects::hero_exit::HeroExit,
    foundation::{error::StageResult, math::stable_hash64},
    interact::clipboard::{Clipboard, CopyIndicator},
    page::{
        model::PageDef,
        registry::{SectionEntry, SectionRegistry},
    },
    scroll::{boundary::EndBoundary, trigger::TriggerSpec},
    stage::{
        core::Stage,
        scope::{ScopeCx, ScopeId},
    },
};

const REVERSE_ON_LEAVE_BACK: &str = "play none none reverse";

type Build = fn(&mut ScopeCx<'_>, &SectionEntry, &PageDef) -> StageResult<()>;

const SECTIONS: [(&str, Build); 7] = [
    ("hero", hero),
    ("work", work),
    ("about", about),
    ("process", process),
    ("metrics", metrics),
    ("testimonials", testimonials),
    ("contact", contact),
];

/// A mounted page: its registry, the scope of every animated section and the
/// copy-button state.
#[derive(Debug)]
pub struct Showcase {
    registry: SectionRegistry,
    scopes: Vec<(String, ScopeId)>,
    copy: CopyIndicator,
    email: String,
    nav_duration: f64,
}

/// Build the page's node trees into `stage` and mount its choreography.
pub fn load(stage: &mut Stage, page: &PageDef) -> StageResult<Showcase> {
    let registry = SectionRegistry::build(stage, page)?;
    mount(stage, registry, page)
}

/// Mount every section's animations over an already-built registry. Sections the page
/// does not have are skipped. On error, scopes mounted so far are disposed.
#[tracing::instrument(level = "debug", skip_all, fields(sections = registry.len()))]
pub fn mount(stage: &mut Stage, registry: SectionRegistry, page: &PageDef) -> StageResult<Showcase> {
    let mut show = Showcase {
        registry,
        scopes: Vec::new(),
        copy: CopyIndicator::default(),
        email: page.content.contact.email.clone(),
        nav_duration: page.motion.nav_duration,
    };
    if let Err(err) = show.mount_all(stage, page) {
        show.unmount(stage);
        return Err(err);
    }
    Ok(show)
}

impl Showcase {
    fn mount_all(&mut self, stage: &mut Stage, page: &PageDef) -> StageResult<()> {
        for (id, build) in SECTIONS {
            let Some(entry) = self.registry.get(id).cloned() else {
                tracing::debug!(section = id, "section not on page, skipped");
                continue;
            };
            let scope = stage.create_scope(entry.root, |cx| build(cx, &entry, page))?;
            self.scopes.push((id.to_string(), scope));
        }
        if let Some(overlay) = self.registry.overlay() {
            let seed = stable_hash64(page.seed, "glitter");
            let scope =
                stage.create_scope(overlay, |cx| cx.particles(overlay, &page.particles, seed))?;
            self.scopes.push(("glitter".to_string(), scope));
        }
        Ok(())
    }

    /// Dispose every scope this page mounted. Returns how many were live.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn unmount(&mut self, stage: &mut Stage) -> usize {
        self.scopes
            .drain(..)
            .filter(|(_, id)| stage.dispose(*id))
            .count()
    }

    /// Section roots.
    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    /// Scope mounted for a section (or `glitter` for the particle overlay).
    pub fn scope(&self, section: &str) -> Option<ScopeId> {
        self.scopes
            .iter()
            .find(|(id, _)| id == section)
            .map(|(_, scope)| *scope)
    }

    /// Mounted scopes in mount order.
    pub fn scopes(&self) -> impl Iterator<Item = (&str, ScopeId)> + '_ {
        self.scopes.iter().map(|(id, s)| (id.as_str(), *s))
    }

    /// Smooth-scroll to a section's top.
    pub fn navigate(&self, stage: &mut Stage, section: &str) -> StageResult<()> {
        let root = self.registry.root(section)?;
        stage.navigate_to(root, self.nav_duration)
    }

    /// Copy the contact address and raise the "copied" flag.
    pub fn copy_email(&mut self, clipboard: &mut dyn Clipboard) -> anyhow::Result<()> {
        if self.email.is_empty() {
            anyhow::bail!("page has no contact email");
        }
        self.copy.copy(clipboard, &self.email)
    }

    /// Whether the "copied" flag is raised.
    pub fn copied(&self) -> bool {
        self.copy.copied()
    }

    /// Advance host-side timers by `dt` seconds of frame time.
    pub fn tick(&mut self, dt: f64) {
        self.copy.tick(dt);
    }
}

/// fromTo tween from `from` to the rest value of every listed property.
fn fade_in(targets: Targets, from: &[(Prop, f64)], secs: f64) -> TweenSpec {
    let to: Props = from.iter().map(|(p, _)| (*p, p.rest_value())).collect();
    TweenSpec::from_to(targets, from.iter().copied().collect(), to).duration(secs)
}

fn scrub_range(
    cx: &mut ScopeCx<'_>,
    tween: TweenSpec,
    entry: &SectionEntry,
    lag: f64,
) -> StageResult<()> {
    let timeline = cx.sequence(vec![Step::new(tween)])?;
    let mut spec = TriggerSpec::scrub(entry.root, timeline, lag);
    spec.start = entry.start;
    spec.end = entry.end;
    cx.trigger(spec)
}

fn scrub_each(
    cx: &mut ScopeCx<'_>,
    selector: &str,
    from: &[(Prop, f64)],
    secs: f64,
    range: (&str, &str),
    lag: f64,
) -> StageResult<()> {
    for node in cx.select(selector)? {
        let tween = fade_in(Targets::node(node), from, secs);
        cx.scrub(tween, node, range.0, range.1, lag)?;
    }
    Ok(())
}

fn select(s: &str) -> StageResult<Targets> {
    Targets::select(s)
}

fn hero(cx: &mut ScopeCx<'_>, entry: &SectionEntry, page: &PageDef) -> StageResult<()> {
    use Prop::*;
    let steps = vec![
        Step::new(
            fade_in(select(".hero-bg")?, &[(Scale, 1.08), (Opacity, 0.0)], 1.2)
                .ease(Ease::OutCubic),
        ),
        Step::new(
            fade_in(select(".hero-headline span")?, &[(Y, 50.0), (Opacity, 0.0)], 0.8)
                .stagger(0.08)
                .ease(Ease::OutQuart),
        )
        .offset(RelativeOffset::overlap(0.6)),
        Step::new(
            fade_in(
                select(".hero-card")?,
                &[(X, 100.0), (Opacity, 0.0), (Rotate, 2.0)],
                0.9,
            )
            .ease(Ease::OutQuart),
        )
        .offset(RelativeOffset::overlap(0.5)),
        Step::new(
            fade_in(select(".hero-cta")?, &[(Y, 30.0), (Opacity, 0.0)], 0.6)
                .ease(Ease::OutCubic),
        )
        .offset(RelativeOffset::overlap(0.3)),
        Step::new(fade_in(select(".hero-microcopy")?, &[(Opacity, 0.0)], 0.5))
            .offset(RelativeOffset::overlap(0.2)),
        Step::new(fade_in(select(".scroll-cue")?, &[(Opacity, 0.0)], 0.4))
            .offset(RelativeOffset::overlap(0.1)),
    ];
    cx.entrance(steps, page.motion.entrance_delay)?;

    let exit = HeroExit::new(page.hero_exit.clone())?;
    let mut spec = TriggerSpec::derive(entry.root, exit)
        .start("top top")?
        .pinned(true);
    spec.end = EndBoundary::After(page.hero_exit.range);
    cx.trigger(spec)
}

fn work(cx: &mut ScopeCx<'_>, entry: &SectionEntry, page: &PageDef) -> StageResult<()> {
    use Prop::*;
    let lag = page.motion.scrub_lag;
    let title = fade_in(select(".work-title")?, &[(X, -80.0), (Opacity, 0.0)], 0.8);
    scrub_range(cx, title, entry, lag)?;
    scrub_each(
        cx,
        ".project-card",
        &[(X, 100.0), (Opacity, 0.0), (Rotate, 1.0)],
        0.8,
        ("top 85%", "top 60%"),
        lag,
    )
}

fn about(cx: &mut ScopeCx<'_>, entry: &SectionEntry, page: &PageDef) -> StageResult<()> {
    use Prop::*;
    let lag = page.motion.scrub_lag;
    let image = fade_in(
        select(".about-image")?,
        &[(X, -100.0), (Opacity, 0.0), (Scale, 0.98)],
        1.0,
    );
    scrub_range(cx, image, entry, lag)?;
    let content = fade_in(select(".about-content")?, &[(X, 100.0), (Opacity, 0.0)], 1.0);
    cx.scrub(content, entry.root, "top 70%", "top 35%", lag)?;
    let quote = fade_in(select(".quote-mark-anim")?, &[(Y, -20.0), (Opacity, 0.0)], 0.6);
    cx.toggle(quote, entry.root, "top 60%", REVERSE_ON_LEAVE_BACK)
}

fn process(cx: &mut ScopeCx<'_>, entry: &SectionEntry, page: &PageDef) -> StageResult<()> {
    use Prop::*;
    let lag = page.motion.scrub_lag;
    let heading = fade_in(select(".process-heading")?, &[(Y, -50.0), (Opacity, 0.0)], 0.8);
    scrub_range(cx, heading, entry, lag)?;
    scrub_each(
        cx,
        ".process-card-anim",
        &[(Y, 80.0), (Opacity, 0.0), (Rotate, -1.0)],
        0.8,
        ("top 90%", "top 65%"),
        lag,
    )
}

fn metrics(cx: &mut ScopeCx<'_>, entry: &SectionEntry, page: &PageDef) -> StageResult<()> {
    use Prop::*;
    let lag = page.motion.scrub_lag;
    let left = fade_in(select(".metric-left")?, &[(X, -80.0), (Opacity, 0.0)], 0.8);
    scrub_range(cx, left, entry, lag)?;
    scrub_each(
        cx,
        ".metric-right-item",
        &[(X, 80.0), (Opacity, 0.0)],
        0.6,
        ("top 85%", "top 60%"),
        lag,
    )?;
    let divider = fade_in(select(".divider-anim")?, &[(ScaleY, 0.0)], 1.0);
    cx.scrub(divider, entry.root, "top 70%", "top 30%", lag)
}

fn testimonials(cx: &mut ScopeCx<'_>, entry: &SectionEntry, page: &PageDef) -> StageResult<()> {
    use Prop::*;
    let lag = page.motion.scrub_lag;
    let quote = fade_in(
        select(".testimonial-quote")?,
        &[(X, -100.0), (Opacity, 0.0)],
        1.0,
    );
    scrub_range(cx, quote, entry, lag)?;
    let image = fade_in(
        select(".testimonial-image")?,
        &[(X, 100.0), (Opacity, 0.0), (Scale, 1.02)],
        1.0,
    );
    cx.scrub(image, entry.root, "top 70%", "top 35%", lag)?;
    let bar = fade_in(select(".attribution-bar")?, &[(ScaleX, 0.0)], 0.8);
    cx.toggle(bar, entry.root, "top 55%", REVERSE_ON_LEAVE_BACK)
}

fn contact(cx: &mut ScopeCx<'_>, entry: &SectionEntry, page: &PageDef) -> StageResult<()> {
    use Prop::*;
    let lag = page.motion.scrub_lag;
    let left = fade_in(select(".contact-left")?, &[(Y, 60.0), (Opacity, 0.0)], 0.8);
    scrub_range(cx, left, entry, lag)?;
    let right = fade_in(select(".contact-right")?, &[(Y, 60.0), (Opacity, 0.0)], 0.8);
    cx.scrub(right, entry.root, "top 75%", "top 45%", lag)?;
    footer(cx)
}

fn footer(cx: &mut ScopeCx<'_>) -> StageResult<()> {
    let Some(footer) = cx.select(".footer-bottom")?.into_iter().next() else {
        return Ok(());
    };
    let tween = fade_in(Targets::node(footer), &[(Prop::Opacity, 0.0)], 0.6);
    cx.toggle(tween, footer, "top 95%", REVERSE_ON_LEAVE_BACK)
}

#[cfg(test)]
#[path = "../../tests/unit/page/showcase.rs"]
mod tests;
