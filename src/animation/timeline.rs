use std::collections::BTreeMap;

use crate::{
    animation::{
        props::Props,
        tween::{Targets, TweenSpec},
    },
    foundation::{
        core::NodeId,
        error::{StageError, StageResult},
    },
    scene::tree::Scene,
};

/// Offset of a step's start relative to the end of the step declared before it.
///
/// Negative values overlap the previous step (`"-=0.6"`), positive ones leave a gap.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RelativeOffset {
    /// Signed delta, in seconds, added to the preceding step's end.
    pub preceding_step_end_delta: f64,
}

impl RelativeOffset {
    /// Start right when the previous step ends.
    pub const SEQUENTIAL: Self = Self {
        preceding_step_end_delta: 0.0,
    };

    /// Start `secs` before the previous step ends.
    pub fn overlap(secs: f64) -> Self {
        Self {
            preceding_step_end_delta: -secs,
        }
    }

    /// Start `secs` after the previous step ends.
    pub fn gap(secs: f64) -> Self {
        Self {
            preceding_step_end_delta: secs,
        }
    }

    /// Parse the `"-=X"` / `"+=X"` shorthand.
    pub fn parse(s: &str) -> StageResult<Self> {
        let s = s.trim();
        let (sign, rest) = if let Some(r) = s.strip_prefix("-=") {
            (-1.0, r)
        } else if let Some(r) = s.strip_prefix("+=") {
            (1.0, r)
        } else {
            return Err(StageError::validation(format!(
                "relative offset '{s}' must start with '-=' or '+='"
            )));
        };
        let v: f64 = rest
            .trim()
            .parse()
            .map_err(|_| StageError::validation(format!("invalid relative offset '{s}'")))?;
        if !v.is_finite() {
            return Err(StageError::validation(format!(
                "relative offset '{s}' is not finite"
            )));
        }
        Ok(Self {
            preceding_step_end_delta: sign * v,
        })
    }
}

/// One declared timeline step.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Step {
    /// The tween this step plays.
    pub tween: TweenSpec,
    /// Placement relative to the previous step.
    #[serde(default)]
    pub offset: RelativeOffset,
}

impl Step {
    /// Step that starts when the previous one ends.
    pub fn new(tween: TweenSpec) -> Self {
        Self {
            tween,
            offset: RelativeOffset::SEQUENTIAL,
        }
    }

    /// Builder-style offset.
    pub fn offset(mut self, offset: RelativeOffset) -> Self {
        self.offset = offset;
        self
    }
}

#[derive(Clone, Debug)]
struct ResolvedStep {
    tween: TweenSpec,
    targets: Vec<NodeId>,
    start: f64,
}

impl ResolvedStep {
    fn end(&self) -> f64 {
        self.start + self.tween.span(self.targets.len())
    }
}

/// Resolved start and end of one target inside a timeline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScheduleEntry {
    /// Index of the declared step.
    pub step: usize,
    /// Animated node.
    pub target: NodeId,
    /// Absolute start, seconds from timeline time 0.
    pub start: f64,
    /// Absolute end.
    pub end: f64,
}

/// An ordered sequence of resolved tween steps with absolute start times.
///
/// The timeline itself is a pure function of time; playback position lives in
/// [`crate::Playhead`] or is derived from scroll progress.
#[derive(Clone, Debug)]
pub struct Timeline {
    steps: Vec<ResolvedStep>,
    duration: f64,
}

impl Timeline {
    /// Resolve `steps` inside `scope` and place them back to back.
    ///
    /// Step `k` starts at `start(k-1) + span(k-1) + offset(k)`; the first step starts at
    /// `max(0, offset)`. Steps whose selector matches nothing keep their slot in time
    /// but animate nothing.
    pub fn sequence(scene: &Scene, scope: NodeId, steps: Vec<Step>) -> StageResult<Self> {
        let mut resolved: Vec<ResolvedStep> = Vec::with_capacity(steps.len());
        for (i, step) in steps.into_iter().enumerate() {
            step.tween.validate()?;
            let targets = step.tween.targets.resolve(scene, scope);
            if targets.is_empty() {
                tracing::debug!(step = i, targets = ?step.tween.targets, "step matched no nodes");
            }
            let start = match resolved.last() {
                Some(prev) => prev.end() + step.offset.preceding_step_end_delta,
                None => step.offset.preceding_step_end_delta,
            }
            .max(0.0);
            resolved.push(ResolvedStep {
                tween: step.tween,
                targets,
                start,
            });
        }
        let duration = resolved.iter().map(ResolvedStep::end).fold(0.0, f64::max);
        Ok(Self {
            steps: resolved,
            duration,
        })
    }

    /// Single-tween timeline (the shape scroll-bound tweens use).
    pub fn single(scene: &Scene, scope: NodeId, tween: TweenSpec) -> StageResult<Self> {
        Self::sequence(scene, scope, vec![Step::new(tween)])
    }

    /// Time at which every step has settled.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Number of declared steps.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// `(start, end)` of each declared step.
    pub fn step_windows(&self) -> Vec<(f64, f64)> {
        self.steps.iter().map(|s| (s.start, s.end())).collect()
    }

    /// Every node this timeline writes, deduplicated, in first-use order.
    pub fn targets(&self) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::new();
        for id in self.steps.iter().flat_map(|s| s.targets.iter()) {
            if !out.contains(id) {
                out.push(*id);
            }
        }
        out
    }

    /// Per-target schedule in declaration (and stagger) order.
    pub fn schedule(&self) -> Vec<ScheduleEntry> {
        let mut out = Vec::new();
        for (step, s) in self.steps.iter().enumerate() {
            for (i, target) in s.targets.iter().enumerate() {
                let start = s.start + s.tween.stagger * i as f64;
                out.push(ScheduleEntry {
                    step,
                    target: *target,
                    start,
                    end: start + s.tween.duration,
                });
            }
        }
        out
    }

    /// Property values every target should show at `time`.
    ///
    /// When several steps write the same property of the same node, the
    /// latest-declared step that has started wins; otherwise the earliest-declared
    /// step's from-state holds.
    pub fn sample(&self, time: f64) -> BTreeMap<NodeId, Props> {
        let mut out: BTreeMap<NodeId, Props> = BTreeMap::new();
        for s in &self.steps {
            for (i, target) in s.targets.iter().enumerate() {
                let local = time - (s.start + s.tween.stagger * i as f64);
                let values = s.tween.sample(local);
                let entry = out.entry(*target).or_default();
                if local >= 0.0 {
                    for (p, v) in values.iter() {
                        entry.insert(p, v);
                    }
                } else {
                    for (p, v) in values.iter() {
                        if entry.get(p).is_none() {
                            entry.insert(p, v);
                        }
                    }
                }
            }
        }
        out
    }

    /// Sample at `progress * duration`, for scroll scrubbing.
    pub fn sample_progress(&self, progress: f64) -> BTreeMap<NodeId, Props> {
        self.sample(progress.clamp(0.0, 1.0) * self.duration)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
