use std::collections::BTreeMap;

use crate::{
    animation::{
        timeline::{Step, Timeline},
        tween::TweenSpec,
    },
    foundation::{
        core::{NodeId, VisualState},
        error::{StageError, StageResult},
    },
    particles::field::ParticleDistribution,
    scene::{selector::Selector, tree::Scene},
    scroll::trigger::{ToggleActions, TriggerSpec},
    stage::core::Stage,
};

/// Handle to an animation scope. Handles are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct ScopeId(pub u32);

/// Lifecycle of a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ScopeState {
    /// Its builder closure is running.
    Constructing,
    /// Built; members are stepped by the frame loop.
    Active,
    /// Torn down; nothing it owned is stepped again.
    Disposed,
}

#[derive(Clone, Debug)]
pub(crate) struct Scope {
    pub(crate) root: NodeId,
    pub(crate) state: ScopeState,
    /// Pre-animation state of every node this scope wrote, captured on first write.
    pub(crate) snapshots: BTreeMap<NodeId, VisualState>,
}

impl Scope {
    pub(crate) fn new(root: NodeId) -> Self {
        Self {
            root,
            state: ScopeState::Constructing,
            snapshots: BTreeMap::new(),
        }
    }
}

/// Builder handed to [`Stage::create_scope`] and [`Stage::extend_scope`]. Everything
/// created through it belongs to the scope and is torn down with it.
pub struct ScopeCx<'a> {
    stage: &'a mut Stage,
    scope: ScopeId,
}

impl<'a> ScopeCx<'a> {
    pub(crate) fn new(stage: &'a mut Stage, scope: ScopeId) -> Self {
        Self { stage, scope }
    }

    /// The scope being built.
    pub fn id(&self) -> ScopeId {
        self.scope
    }

    /// Root node selectors resolve under.
    pub fn root(&self) -> NodeId {
        self.stage
            .scope_root(self.scope)
            .unwrap_or_else(|| self.stage.scene().root())
    }

    /// Read-only scene access.
    pub fn scene(&self) -> &Scene {
        self.stage.scene()
    }

    /// Nodes below the scope root matching `selector`, in document order.
    pub fn select(&self, selector: &str) -> StageResult<Vec<NodeId>> {
        let sel = Selector::parse(selector)?;
        Ok(self.scene().query(self.root(), &sel))
    }

    /// First match of `selector`, or a validation error naming it.
    pub fn select_one(&self, selector: &str) -> StageResult<NodeId> {
        self.select(selector)?.into_iter().next().ok_or_else(|| {
            StageError::validation(format!("selector '{selector}' matched nothing"))
        })
    }

    /// Resolve `steps` in this scope without registering anything.
    pub fn sequence(&self, steps: Vec<Step>) -> StageResult<Timeline> {
        Timeline::sequence(self.scene(), self.root(), steps)
    }

    /// Entrance timeline: renders its from-states now and plays once after `delay`.
    pub fn entrance(&mut self, steps: Vec<Step>, delay: f64) -> StageResult<()> {
        let timeline = self.sequence(steps)?;
        self.stage.add_played(self.scope, timeline, delay)
    }

    /// Register a scroll binding.
    pub fn trigger(&mut self, spec: TriggerSpec) -> StageResult<()> {
        self.stage.add_binding(self.scope, spec)
    }

    /// Single tween scrubbed by `trigger`'s range.
    pub fn scrub(
        &mut self,
        tween: TweenSpec,
        trigger: NodeId,
        start: &str,
        end: &str,
        lag: f64,
    ) -> StageResult<()> {
        let timeline = self.sequence(vec![Step::new(tween)])?;
        let spec = TriggerSpec::scrub(trigger, timeline, lag)
            .start(start)?
            .end(end)?;
        self.trigger(spec)
    }

    /// Single tween played by boundary crossings of `trigger`'s default-end range.
    pub fn toggle(
        &mut self,
        tween: TweenSpec,
        trigger: NodeId,
        start: &str,
        actions: &str,
    ) -> StageResult<()> {
        let actions: ToggleActions = actions.parse()?;
        let timeline = self.sequence(vec![Step::new(tween)])?;
        let spec = TriggerSpec::toggle(trigger, timeline, actions).start(start)?;
        self.trigger(spec)
    }

    /// Spawn a particle field under `container`.
    pub fn particles(
        &mut self,
        container: NodeId,
        dist: &ParticleDistribution,
        seed: u64,
    ) -> StageResult<()> {
        self.stage.add_field(self.scope, container, dist, seed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/scope.rs"]
mod tests;
