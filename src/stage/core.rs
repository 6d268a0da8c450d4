use std::collections::BTreeMap;

use crate::{
    animation::{
        playhead::Playhead,
        props::Props,
        timeline::{ScheduleEntry, Timeline},
    },
    effects::progress::DerivedProps,
    foundation::{
        core::{NodeId, Viewport},
        error::{StageError, StageResult},
    },
    interact::nav::ScrollTo,
    particles::field::{ParticleDistribution, ParticleField},
    scene::tree::{NodeSpec, Scene, SceneSnapshot},
    scroll::trigger::{StyleWrite, TriggerBinding, TriggerSpec},
    stage::scope::{Scope, ScopeCx, ScopeId, ScopeState},
};

#[derive(Debug)]
struct PlayedTimeline {
    scope: ScopeId,
    timeline: Timeline,
    playhead: Playhead,
}

#[derive(Debug)]
struct BoundTrigger {
    scope: ScopeId,
    binding: TriggerBinding,
}

#[derive(Debug)]
struct OwnedField {
    scope: ScopeId,
    field: ParticleField,
}

/// Counters for one [`Stage::frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct FrameReport {
    /// Whether layout and boundaries were recomputed.
    pub layout: bool,
    /// Scroll position the frame was evaluated at.
    pub scroll: f64,
    /// Bindings stepped.
    pub bindings: usize,
    /// Boundary crossings fired.
    pub events: usize,
    /// Played timelines that wrote this frame.
    pub timelines: usize,
    /// Particles written.
    pub particles: usize,
    /// Node writes from timelines, scrubs and derived effects.
    pub writes: usize,
}

/// Owner of the scene and everything that animates it.
///
/// The host records input with [`Stage::scroll_to`] and [`Stage::resize`] and drives
/// time with [`Stage::frame`]. Visual state is only ever written from here.
#[derive(Debug)]
pub struct Stage {
    scene: Scene,
    scopes: Vec<Scope>,
    played: Vec<PlayedTimeline>,
    bindings: Vec<BoundTrigger>,
    fields: Vec<OwnedField>,
    scroll: f64,
    scrolled: bool,
    bindings_dirty: bool,
    nav: Option<ScrollTo>,
}

impl Stage {
    /// Empty stage for `viewport`.
    pub fn new(viewport: Viewport) -> StageResult<Self> {
        Ok(Self::with_scene(Scene::new(viewport)?))
    }

    /// Stage over an existing scene.
    pub fn with_scene(scene: Scene) -> Self {
        Self {
            scene,
            scopes: Vec::new(),
            played: Vec::new(),
            bindings: Vec::new(),
            fields: Vec::new(),
            scroll: 0.0,
            scrolled: true,
            bindings_dirty: true,
            nav: None,
        }
    }

    /// Read-only scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Serializable copy of the scene.
    pub fn snapshot(&self) -> SceneSnapshot {
        self.scene.snapshot()
    }

    /// Add a node to the document.
    pub fn append(&mut self, parent: NodeId, spec: NodeSpec) -> StageResult<NodeId> {
        self.scene.append(parent, spec)
    }

    /// Remove a node and its subtree from the document.
    pub fn remove(&mut self, id: NodeId) -> usize {
        self.scene.remove(id)
    }

    /// Current scroll position.
    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    /// Jump to `px`; the next frame clamps it to the document and recomputes progress.
    /// Cancels a pending navigation.
    pub fn scroll_to(&mut self, px: f64) {
        self.nav = None;
        self.set_scroll(px);
    }

    fn set_scroll(&mut self, px: f64) {
        if px.is_finite() && px != self.scroll {
            self.scroll = px;
            self.scrolled = true;
        }
    }

    /// Smooth-scroll to `px` over `duration` seconds, replacing any pending navigation.
    pub fn navigate(&mut self, px: f64, duration: f64) -> StageResult<()> {
        self.nav = Some(ScrollTo::new(self.scroll, px, duration)?);
        Ok(())
    }

    /// Smooth-scroll so `node`'s layout top meets the viewport top.
    pub fn navigate_to(&mut self, node: NodeId, duration: f64) -> StageResult<()> {
        self.ensure_layout();
        let top = self.scene.layout_top(node).ok_or_else(|| {
            StageError::validation(format!("navigation target {} does not exist", node.0))
        })?;
        self.navigate(top, duration)
    }

    /// Pending navigation, if any.
    pub fn navigation(&self) -> Option<&ScrollTo> {
        self.nav.as_ref()
    }

    /// Change the viewport; layout and boundaries are recomputed on the next frame.
    pub fn resize(&mut self, viewport: Viewport) -> StageResult<()> {
        self.scene.set_viewport(viewport)
    }

    /// Lay out the scene and reserve pin spacers if anything changed.
    pub fn ensure_layout(&mut self) -> bool {
        if !(self.scene.needs_layout() || self.bindings_dirty) {
            return false;
        }
        self.scene.layout();
        for b in &self.bindings {
            if let Some(px) = b.binding.pin_spacer(&self.scene) {
                self.scene.set_pin_spacer(b.binding.trigger(), px);
            }
        }
        if self.scene.needs_layout() {
            self.scene.layout();
        }
        for b in &mut self.bindings {
            b.binding.resolve(&self.scene);
        }
        self.bindings_dirty = false;
        true
    }

    // ---- scopes ----

    /// Build a scope under `root`. A scope still active on the same root is disposed
    /// first. If `build` fails, everything it created is torn down and the error is
    /// returned.
    #[tracing::instrument(level = "debug", skip(self, build))]
    pub fn create_scope<F>(&mut self, root: NodeId, build: F) -> StageResult<ScopeId>
    where
        F: FnOnce(&mut ScopeCx<'_>) -> StageResult<()>,
    {
        if !self.scene.contains(root) {
            return Err(StageError::validation(format!(
                "scope root {} does not exist",
                root.0
            )));
        }
        let stale: Vec<ScopeId> = self
            .scope_ids()
            .filter(|id| {
                self.scopes[id.0 as usize].root == root
                    && self.scopes[id.0 as usize].state != ScopeState::Disposed
            })
            .collect();
        for id in stale {
            tracing::debug!(scope = id.0, "replacing scope on same root");
            self.dispose(id);
        }

        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(root));
        tracing::debug!(scope = id.0, root = root.0, "scope constructing");

        let built = build(&mut ScopeCx::new(self, id));
        if let Err(err) = built {
            self.dispose(id);
            return Err(err);
        }
        self.scopes[id.0 as usize].state = ScopeState::Active;
        tracing::debug!(scope = id.0, "scope active");
        Ok(id)
    }

    /// Add members to an active scope.
    pub fn extend_scope<F>(&mut self, id: ScopeId, build: F) -> StageResult<()>
    where
        F: FnOnce(&mut ScopeCx<'_>) -> StageResult<()>,
    {
        match self.scope_state(id) {
            Some(ScopeState::Active) => build(&mut ScopeCx::new(self, id)),
            Some(state) => Err(StageError::scope(format!(
                "scope {} is {state:?} and cannot be extended",
                id.0
            ))),
            None => Err(StageError::scope(format!("unknown scope {}", id.0))),
        }
    }

    /// Tear a scope down: stop and drop its timelines and bindings, remove its particle
    /// fields and restore every node it wrote. Disposing twice is a no-op. Returns
    /// whether anything was disposed.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn dispose(&mut self, id: ScopeId) -> bool {
        let Some(scope) = self.scopes.get_mut(id.0 as usize) else {
            return false;
        };
        if scope.state == ScopeState::Disposed {
            return false;
        }
        scope.state = ScopeState::Disposed;
        let snapshots = std::mem::take(&mut scope.snapshots);

        self.played.retain(|p| p.scope != id);

        let (gone, kept): (Vec<_>, Vec<_>) =
            self.bindings.drain(..).partition(|b| b.scope == id);
        self.bindings = kept;
        for b in &gone {
            if b.binding.is_pinned() {
                self.scene.clear_pin_spacer(b.binding.trigger());
                self.scene.set_pin_offset(b.binding.trigger(), 0.0);
            }
        }
        if !gone.is_empty() {
            self.bindings_dirty = true;
        }

        let (fields, kept): (Vec<_>, Vec<_>) = self.fields.drain(..).partition(|f| f.scope == id);
        self.fields = kept;
        for mut f in fields {
            f.field.dispose(&mut self.scene);
        }

        let restored = snapshots.len();
        for (node, state) in snapshots {
            if let Some(style) = self.scene.style_mut(node) {
                *style = state;
            }
        }
        tracing::debug!(scope = id.0, bindings = gone.len(), restored, "scope disposed");
        true
    }

    /// Lifecycle state of a scope.
    pub fn scope_state(&self, id: ScopeId) -> Option<ScopeState> {
        self.scopes.get(id.0 as usize).map(|s| s.state)
    }

    /// Root node of a scope.
    pub fn scope_root(&self, id: ScopeId) -> Option<NodeId> {
        self.scopes.get(id.0 as usize).map(|s| s.root)
    }

    fn scope_ids(&self) -> impl Iterator<Item = ScopeId> + use<> {
        (0..self.scopes.len() as u32).map(ScopeId)
    }

    /// Scopes that are not disposed.
    pub fn live_scopes(&self) -> Vec<ScopeId> {
        self.scope_ids()
            .filter(|id| self.scope_state(*id) != Some(ScopeState::Disposed))
            .collect()
    }

    /// Number of bindings in the frame loop.
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Number of played timelines in the frame loop.
    pub fn played_count(&self) -> usize {
        self.played.len()
    }

    /// Number of live particle fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Resolved schedules of the played timelines owned by `scope`, in creation order.
    pub fn schedules(&self, scope: ScopeId) -> Vec<Vec<ScheduleEntry>> {
        self.played
            .iter()
            .filter(|p| p.scope == scope)
            .map(|p| p.timeline.schedule())
            .collect()
    }

    /// Bindings owned by `scope`, in creation order.
    pub fn bindings(&self, scope: ScopeId) -> impl Iterator<Item = &TriggerBinding> + '_ {
        self.bindings
            .iter()
            .filter(move |b| b.scope == scope)
            .map(|b| &b.binding)
    }

    /// Particle fields owned by `scope`.
    pub fn fields(&self, scope: ScopeId) -> impl Iterator<Item = &ParticleField> + '_ {
        self.fields
            .iter()
            .filter(move |f| f.scope == scope)
            .map(|f| &f.field)
    }

    // ---- members (through ScopeCx) ----

    fn check_open(&self, scope: ScopeId) -> StageResult<()> {
        match self.scope_state(scope) {
            Some(ScopeState::Constructing | ScopeState::Active) => Ok(()),
            _ => Err(StageError::scope(format!(
                "scope {} is disposed or unknown",
                scope.0
            ))),
        }
    }

    pub(crate) fn add_played(
        &mut self,
        scope: ScopeId,
        timeline: Timeline,
        delay: f64,
    ) -> StageResult<()> {
        self.check_open(scope)?;
        if !(delay.is_finite() && delay >= 0.0) {
            return Err(StageError::animation("timeline delay must be >= 0"));
        }
        self.write_nodes(scope, timeline.sample(0.0));
        let playhead = Playhead::autoplay(timeline.duration(), delay);
        self.played.push(PlayedTimeline {
            scope,
            timeline,
            playhead,
        });
        Ok(())
    }

    pub(crate) fn add_binding(&mut self, scope: ScopeId, spec: TriggerSpec) -> StageResult<()> {
        self.check_open(scope)?;
        let binding = TriggerBinding::new(spec, &self.scene)?;
        self.write_nodes(scope, binding.initial_writes());
        self.bindings.push(BoundTrigger { scope, binding });
        self.bindings_dirty = true;
        Ok(())
    }

    pub(crate) fn add_field(
        &mut self,
        scope: ScopeId,
        container: NodeId,
        dist: &ParticleDistribution,
        seed: u64,
    ) -> StageResult<()> {
        self.check_open(scope)?;
        let field = ParticleField::spawn(&mut self.scene, container, dist, seed)?;
        self.fields.push(OwnedField { scope, field });
        Ok(())
    }

    // ---- the single write path ----

    fn write_style(&mut self, scope: ScopeId, node: NodeId, props: &Props) -> bool {
        let Some(current) = self.scene.style(node) else {
            return false;
        };
        if let Some(s) = self.scopes.get_mut(scope.0 as usize) {
            s.snapshots.entry(node).or_insert(current);
        }
        match self.scene.style_mut(node) {
            Some(style) => {
                props.apply_to(style);
                true
            }
            None => false,
        }
    }

    fn write_nodes(&mut self, scope: ScopeId, values: BTreeMap<NodeId, Props>) -> usize {
        let mut n = 0;
        for (node, props) in &values {
            n += usize::from(self.write_style(scope, *node, props));
        }
        n
    }

    fn write_selected(&mut self, scope: ScopeId, derived: Vec<DerivedProps>) -> usize {
        let Some(root) = self.scope_root(scope) else {
            return 0;
        };
        let mut n = 0;
        for d in derived {
            for node in self.scene.query(root, &d.target) {
                n += usize::from(self.write_style(scope, node, &d.props));
            }
        }
        n
    }

    // ---- frame loop ----

    /// Advance the stage by `dt` seconds: layout if needed, scroll bindings in creation
    /// order, played timelines, then particle fields.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn frame(&mut self, dt: f64) -> FrameReport {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let mut report = FrameReport::default();

        if let Some(nav) = self.nav.as_mut() {
            let pos = nav.advance(dt);
            if nav.is_done() {
                self.nav = None;
            }
            self.set_scroll(pos);
        }

        report.layout = self.ensure_layout();
        let clamped = self.scroll.clamp(0.0, self.scene.max_scroll());
        if clamped != self.scroll {
            self.scroll = clamped;
            self.scrolled = true;
        }
        let scrolled = std::mem::take(&mut self.scrolled) || report.layout;
        report.scroll = self.scroll;

        let vp = self.scene.viewport();
        for i in 0..self.bindings.len() {
            let scope = self.bindings[i].scope;
            let trigger = self.bindings[i].binding.trigger();
            let up = self.bindings[i]
                .binding
                .update(self.scroll, scrolled, dt, vp);
            report.bindings += 1;
            report.events += up.events.len();
            if let Some(offset) = up.pin_offset {
                self.scene.set_pin_offset(trigger, offset);
            }
            for w in up.writes {
                report.writes += match w {
                    StyleWrite::Nodes(values) => self.write_nodes(scope, values),
                    StyleWrite::Selected(derived) => self.write_selected(scope, derived),
                };
            }
        }

        for i in 0..self.played.len() {
            let p = &mut self.played[i];
            if !p.playhead.advance(dt) {
                continue;
            }
            let (scope, values) = (p.scope, p.timeline.sample(p.playhead.time()));
            report.timelines += 1;
            report.writes += self.write_nodes(scope, values);
        }

        for f in &mut self.fields {
            report.particles += f.field.step(&mut self.scene, dt);
        }

        report
    }

    /// Run frames of `dt` until nothing is moving or `max_frames` ran. Returns the
    /// number of frames stepped.
    pub fn settle(&mut self, dt: f64, max_frames: usize) -> usize {
        for n in 0..max_frames {
            let report = self.frame(dt);
            let moving = self.nav.is_some()
                || self.played.iter().any(|p| p.playhead.is_running())
                || report.writes > 0;
            if !moving {
                return n + 1;
            }
        }
        max_frames
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/core.rs"]
mod tests;
