use std::{collections::BTreeMap, fmt, str::FromStr};

use smallvec::SmallVec;

use crate::{
    animation::{playhead::Playhead, props::Props, timeline::Timeline},
    effects::progress::{DerivedProps, ProgressEffect},
    foundation::{
        core::{NodeId, Viewport},
        error::{StageError, StageResult},
        math::{clamp01, near},
    },
    scene::tree::Scene,
    scroll::boundary::{Boundary, EndBoundary},
};

/// Distance under which a smoothed scrub snaps onto its target.
const SCRUB_SNAP: f64 = 1e-4;

/// What a scrub's exponential approach covers in `lag` seconds (about 95%).
const SCRUB_RATE: f64 = 3.0;

/// Where the scroll position sits relative to a binding's range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Phase {
    /// Above the start boundary.
    Before,
    /// Inside the range.
    Active,
    /// Past the end boundary.
    After,
}

/// Boundary crossings, named the way scroll-trigger callbacks usually are.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum TriggerEvent {
    /// Crossed the start going down.
    Enter,
    /// Crossed the end going down.
    Leave,
    /// Crossed the end going up.
    EnterBack,
    /// Crossed the start going up.
    LeaveBack,
}

fn transition(from: Phase, to: Phase) -> SmallVec<[TriggerEvent; 2]> {
    use Phase::*;
    use TriggerEvent::*;
    match (from, to) {
        (Before, Active) => SmallVec::from_slice(&[Enter]),
        (Before, After) => SmallVec::from_slice(&[Enter, Leave]),
        (Active, After) => SmallVec::from_slice(&[Leave]),
        (After, Active) => SmallVec::from_slice(&[EnterBack]),
        (After, Before) => SmallVec::from_slice(&[EnterBack, LeaveBack]),
        (Active, Before) => SmallVec::from_slice(&[LeaveBack]),
        _ => SmallVec::new(),
    }
}

/// Playback command issued on a boundary crossing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToggleAction {
    /// Play forward from the current time.
    Play,
    /// Halt.
    Pause,
    /// Continue in the last direction.
    Resume,
    /// Play backward from the current time.
    Reverse,
    /// Jump to the start and play.
    Restart,
    /// Jump to the start and halt.
    Reset,
    /// Jump to the end.
    Complete,
    /// Do nothing.
    #[default]
    None,
}

impl ToggleAction {
    fn apply(self, playhead: &mut Playhead) {
        match self {
            Self::Play => playhead.play(),
            Self::Pause => playhead.pause(),
            Self::Resume => playhead.resume(),
            Self::Reverse => playhead.reverse(),
            Self::Restart => playhead.restart(),
            Self::Reset => playhead.reset(),
            Self::Complete => playhead.complete(),
            Self::None => {}
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Reverse => "reverse",
            Self::Restart => "restart",
            Self::Reset => "reset",
            Self::Complete => "complete",
            Self::None => "none",
        }
    }
}

impl FromStr for ToggleAction {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "play" => Self::Play,
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "reverse" => Self::Reverse,
            "restart" => Self::Restart,
            "reset" => Self::Reset,
            "complete" => Self::Complete,
            "none" => Self::None,
            _ => {
                return Err(StageError::validation(format!(
                    "unknown toggle action '{s}'"
                )));
            }
        })
    }
}

/// Actions for enter / leave / enter-back / leave-back, e.g. `"play none none reverse"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToggleActions {
    /// On [`TriggerEvent::Enter`].
    pub on_enter: ToggleAction,
    /// On [`TriggerEvent::Leave`].
    pub on_leave: ToggleAction,
    /// On [`TriggerEvent::EnterBack`].
    pub on_enter_back: ToggleAction,
    /// On [`TriggerEvent::LeaveBack`].
    pub on_leave_back: ToggleAction,
}

impl Default for ToggleActions {
    /// `play none none none`.
    fn default() -> Self {
        Self {
            on_enter: ToggleAction::Play,
            on_leave: ToggleAction::None,
            on_enter_back: ToggleAction::None,
            on_leave_back: ToggleAction::None,
        }
    }
}

impl ToggleActions {
    /// Action bound to `event`.
    pub fn for_event(&self, event: TriggerEvent) -> ToggleAction {
        match event {
            TriggerEvent::Enter => self.on_enter,
            TriggerEvent::Leave => self.on_leave,
            TriggerEvent::EnterBack => self.on_enter_back,
            TriggerEvent::LeaveBack => self.on_leave_back,
        }
    }
}

impl FromStr for ToggleActions {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        let [enter, leave, enter_back, leave_back] = words.as_slice() else {
            return Err(StageError::validation(format!(
                "toggle actions '{s}' must name exactly four actions"
            )));
        };
        Ok(Self {
            on_enter: enter.parse()?,
            on_leave: leave.parse()?,
            on_enter_back: enter_back.parse()?,
            on_leave_back: leave_back.parse()?,
        })
    }
}

impl fmt::Display for ToggleActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.on_enter.name(),
            self.on_leave.name(),
            self.on_enter_back.name(),
            self.on_leave_back.name()
        )
    }
}

impl TryFrom<String> for ToggleActions {
    type Error = StageError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ToggleActions> for String {
    fn from(a: ToggleActions) -> Self {
        a.to_string()
    }
}

/// What a binding drives.
pub enum TriggerEffect {
    /// Timeline progress follows scroll progress, smoothed over `lag` seconds.
    Scrub {
        /// Scrubbed timeline.
        timeline: Timeline,
        /// Catch-up time; 0 follows scroll exactly.
        lag: f64,
    },
    /// Timeline plays on its own clock, commanded by boundary crossings.
    Toggle {
        /// Played timeline.
        timeline: Timeline,
        /// Commands per crossing.
        actions: ToggleActions,
    },
    /// Pure progress mapping, called with the raw progress whenever it changes.
    Derive(Box<dyn ProgressEffect>),
}

impl fmt::Debug for TriggerEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scrub { timeline, lag } => f
                .debug_struct("Scrub")
                .field("duration", &timeline.duration())
                .field("lag", lag)
                .finish(),
            Self::Toggle { timeline, actions } => f
                .debug_struct("Toggle")
                .field("duration", &timeline.duration())
                .field("actions", &actions.to_string())
                .finish(),
            Self::Derive(_) => f.write_str("Derive(..)"),
        }
    }
}

/// Declarative binding of a scroll range to an effect.
#[derive(Debug)]
pub struct TriggerSpec {
    /// Node whose layout box the boundaries refer to.
    pub trigger: NodeId,
    /// Range start.
    pub start: Boundary,
    /// Range end.
    pub end: EndBoundary,
    /// Fix the trigger node in the viewport for the whole range.
    pub pin: bool,
    /// What the range drives.
    pub effect: TriggerEffect,
}

impl TriggerSpec {
    /// Binding over the default range (`top bottom` to `bottom top`).
    pub fn new(trigger: NodeId, effect: TriggerEffect) -> Self {
        Self {
            trigger,
            start: Boundary::ENTER,
            end: EndBoundary::default(),
            pin: false,
            effect,
        }
    }

    /// Scrubbed timeline.
    pub fn scrub(trigger: NodeId, timeline: Timeline, lag: f64) -> Self {
        Self::new(trigger, TriggerEffect::Scrub { timeline, lag })
    }

    /// Toggled timeline.
    pub fn toggle(trigger: NodeId, timeline: Timeline, actions: ToggleActions) -> Self {
        Self::new(trigger, TriggerEffect::Toggle { timeline, actions })
    }

    /// Derived progress effect.
    pub fn derive(trigger: NodeId, effect: impl ProgressEffect + 'static) -> Self {
        Self::new(trigger, TriggerEffect::Derive(Box::new(effect)))
    }

    /// Parse and set the start boundary.
    pub fn start(mut self, start: &str) -> StageResult<Self> {
        self.start = start.parse()?;
        Ok(self)
    }

    /// Parse and set the end boundary.
    pub fn end(mut self, end: &str) -> StageResult<Self> {
        self.end = end.parse()?;
        Ok(self)
    }

    /// Builder-style pin flag.
    pub fn pinned(mut self, pin: bool) -> Self {
        self.pin = pin;
        self
    }

    fn validate(&self, scene: &Scene) -> StageResult<()> {
        if !scene.contains(self.trigger) {
            return Err(StageError::validation(format!(
                "trigger node {} does not exist",
                self.trigger.0
            )));
        }
        if let TriggerEffect::Scrub { lag, .. } = &self.effect
            && !(lag.is_finite() && *lag >= 0.0)
        {
            return Err(StageError::validation("scrub lag must be >= 0"));
        }
        Ok(())
    }
}

/// Absolute scroll positions of a binding's boundaries.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScrollRange {
    /// Scroll position of the start boundary.
    pub start: f64,
    /// Scroll position of the end boundary, never below `start`.
    pub end: f64,
}

impl ScrollRange {
    /// Range length in px.
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    /// `true` for an instantaneous toggle point.
    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }

    /// Clamped progress at `scroll`. An empty range jumps from 0 to 1 at its start.
    pub fn progress(&self, scroll: f64) -> f64 {
        if self.is_empty() {
            return if scroll < self.start { 0.0 } else { 1.0 };
        }
        clamp01((scroll - self.start) / self.len())
    }

    /// Phase at `scroll`. The range is active strictly between its boundaries, so a
    /// range starting at 0 is left backwards by returning to the top.
    pub fn phase(&self, scroll: f64) -> Phase {
        if self.is_empty() {
            return if scroll < self.start {
                Phase::Before
            } else {
                Phase::After
            };
        }
        if scroll <= self.start {
            Phase::Before
        } else if scroll >= self.end {
            Phase::After
        } else {
            Phase::Active
        }
    }

    /// Displacement keeping a pinned node fixed in the viewport.
    pub fn pin_offset(&self, scroll: f64) -> f64 {
        (scroll - self.start).clamp(0.0, self.len().max(0.0))
    }
}

/// Visual writes a binding asks the owner to perform.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleWrite {
    /// Values for already-resolved nodes.
    Nodes(BTreeMap<NodeId, Props>),
    /// Values for selectors, resolved inside the owning scope.
    Selected(Vec<DerivedProps>),
}

/// Result of one [`TriggerBinding::update`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BindingUpdate {
    /// Boundary crossings, in order.
    pub events: Vec<TriggerEvent>,
    /// Writes, in the order they must be applied.
    pub writes: Vec<StyleWrite>,
    /// New pin displacement for the trigger node, for pinned bindings.
    pub pin_offset: Option<f64>,
}

/// Runtime state of one scroll binding.
#[derive(Debug)]
pub struct TriggerBinding {
    spec: TriggerSpec,
    range: Option<ScrollRange>,
    phase: Phase,
    progress: f64,
    smoothed: f64,
    written: Option<f64>,
    derived: Option<f64>,
    playhead: Option<Playhead>,
    stale: bool,
}

impl TriggerBinding {
    /// Validate `spec` against `scene`. Boundaries resolve on the next layout pass.
    pub fn new(spec: TriggerSpec, scene: &Scene) -> StageResult<Self> {
        spec.validate(scene)?;
        let playhead = match &spec.effect {
            TriggerEffect::Toggle { timeline, .. } => Some(Playhead::paused(timeline.duration())),
            _ => None,
        };
        Ok(Self {
            spec,
            range: None,
            phase: Phase::Before,
            progress: 0.0,
            smoothed: 0.0,
            written: None,
            derived: None,
            playhead,
            stale: true,
        })
    }

    /// Trigger node.
    pub fn trigger(&self) -> NodeId {
        self.spec.trigger
    }

    /// Whether the trigger node is pinned over the range.
    pub fn is_pinned(&self) -> bool {
        self.spec.pin
    }

    /// Resolved range, once a layout pass has run.
    pub fn range(&self) -> Option<ScrollRange> {
        self.range
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Raw clamped progress from the last recomputation.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Progress a scrubbed timeline currently shows.
    pub fn smoothed_progress(&self) -> f64 {
        self.smoothed
    }

    /// Playhead of a toggled timeline.
    pub fn playhead(&self) -> Option<&Playhead> {
        self.playhead.as_ref()
    }

    /// Nodes the bound timeline writes (empty for derived effects).
    pub fn timeline_targets(&self) -> Vec<NodeId> {
        match &self.spec.effect {
            TriggerEffect::Scrub { timeline, .. } | TriggerEffect::Toggle { timeline, .. } => {
                timeline.targets()
            }
            TriggerEffect::Derive(_) => Vec::new(),
        }
    }

    /// From-state of the bound timeline, rendered as soon as the binding exists.
    pub fn initial_writes(&self) -> BTreeMap<NodeId, Props> {
        match &self.spec.effect {
            TriggerEffect::Scrub { timeline, .. } | TriggerEffect::Toggle { timeline, .. } => {
                timeline.sample(0.0)
            }
            TriggerEffect::Derive(_) => BTreeMap::new(),
        }
    }

    /// Flow space to reserve after a pinned trigger: the range length, which does not
    /// depend on where the trigger sits.
    pub fn pin_spacer(&self, scene: &Scene) -> Option<f64> {
        if !self.spec.pin {
            return None;
        }
        let h = scene.layout_height(self.spec.trigger)?;
        let vp = scene.viewport();
        let start = self.spec.start.resolve(0.0, h, vp);
        let end = self.spec.end.resolve(start, 0.0, h, vp);
        Some((end - start).max(0.0))
    }

    /// Resolve boundaries against the current layout. Progress is recomputed on the
    /// next update, and a derived effect runs again even if progress is unchanged,
    /// since its values may depend on the viewport.
    pub fn resolve(&mut self, scene: &Scene) {
        self.derived = None;
        let (Some(top), Some(h)) = (
            scene.layout_top(self.spec.trigger),
            scene.layout_height(self.spec.trigger),
        ) else {
            self.range = None;
            return;
        };
        let vp = scene.viewport();
        let start = self.spec.start.resolve(top, h, vp);
        let end = self.spec.end.resolve(start, top, h, vp).max(start);
        self.range = Some(ScrollRange { start, end });
        self.stale = true;
    }

    /// Step the binding. Progress is recomputed only when `scrolled` is set or the
    /// range was re-resolved; smoothing and toggled playback advance every call.
    pub fn update(&mut self, scroll: f64, scrolled: bool, dt: f64, vp: Viewport) -> BindingUpdate {
        let mut out = BindingUpdate::default();
        let Some(range) = self.range else {
            return out;
        };

        if scrolled || self.stale {
            self.stale = false;
            self.recompute(range, scroll, vp, &mut out);
        }

        match &self.spec.effect {
            TriggerEffect::Scrub { timeline, lag } => {
                self.smoothed = approach(self.smoothed, self.progress, *lag, dt);
                if self.written != Some(self.smoothed) {
                    self.written = Some(self.smoothed);
                    out.writes
                        .push(StyleWrite::Nodes(timeline.sample_progress(self.smoothed)));
                }
            }
            TriggerEffect::Toggle { timeline, .. } => {
                if let Some(ph) = self.playhead.as_mut()
                    && ph.advance(dt)
                {
                    out.writes.push(StyleWrite::Nodes(timeline.sample(ph.time())));
                }
            }
            TriggerEffect::Derive(_) => {}
        }
        out
    }

    fn recompute(&mut self, range: ScrollRange, scroll: f64, vp: Viewport, out: &mut BindingUpdate) {
        let progress = range.progress(scroll);
        let phase = range.phase(scroll);
        let events = transition(self.phase, phase);
        if self.phase != phase {
            tracing::trace!(
                trigger = self.spec.trigger.0,
                from = ?self.phase,
                to = ?phase,
                "binding phase"
            );
        }
        self.phase = phase;
        self.progress = progress;

        if self.spec.pin {
            out.pin_offset = Some(range.pin_offset(scroll));
        }

        if let TriggerEffect::Derive(fx) = &self.spec.effect
            && self.derived != Some(progress)
        {
            self.derived = Some(progress);
            if let Some(d) = fx.derive(progress, vp) {
                out.writes.push(StyleWrite::Selected(d));
            }
        }

        for &ev in &events {
            match &self.spec.effect {
                TriggerEffect::Toggle { actions, .. } => {
                    if let Some(ph) = self.playhead.as_mut() {
                        actions.for_event(ev).apply(ph);
                    }
                }
                TriggerEffect::Derive(fx) if ev == TriggerEvent::LeaveBack => {
                    out.writes.push(StyleWrite::Selected(fx.rest()));
                }
                _ => {}
            }
        }
        out.events.extend(events);
    }
}

/// Exponential approach of `current` toward `target` with time constant `lag / 3`.
fn approach(current: f64, target: f64, lag: f64, dt: f64) -> f64 {
    if lag <= 0.0 || near(current, target, SCRUB_SNAP) {
        return target;
    }
    if !(dt.is_finite() && dt > 0.0) {
        return current;
    }
    let alpha = 1.0 - (-SCRUB_RATE * dt / lag).exp();
    let next = current + (target - current) * alpha;
    if near(next, target, SCRUB_SNAP) { target } else { next }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/trigger.rs"]
mod tests;
