use crate::{
    animation::{
        ease::Ease,
        props::{Lerp, Props},
    },
    foundation::{
        core::NodeId,
        error::{StageError, StageResult},
    },
    scene::{selector::Selector, tree::Scene},
};

/// Clock slack under which a tween counts as settled, absorbing float drift in
/// accumulated start times.
const SETTLE_EPS: f64 = 1e-9;

/// What a tween animates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Targets {
    /// Every node matching the selector inside the owning scope, in document order.
    Select(Selector),
    /// Explicit nodes, in the given order.
    Nodes(Vec<NodeId>),
}

impl Targets {
    /// Parse a selector target.
    pub fn select(s: &str) -> StageResult<Self> {
        Ok(Self::Select(Selector::parse(s)?))
    }

    /// A single explicit node.
    pub fn node(id: NodeId) -> Self {
        Self::Nodes(vec![id])
    }

    /// Resolve against `scene` below `scope`. Dead explicit nodes are dropped.
    pub fn resolve(&self, scene: &Scene, scope: NodeId) -> Vec<NodeId> {
        match self {
            Self::Select(sel) => scene.query(scope, sel),
            Self::Nodes(ids) => ids.iter().copied().filter(|id| scene.contains(*id)).collect(),
        }
    }
}

/// A from/to tween over one or more targets.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TweenSpec {
    /// Animated nodes.
    pub targets: Targets,
    /// Start values, rendered as soon as the owning timeline exists.
    pub from: Props,
    /// End values.
    pub to: Props,
    /// Duration per target, in seconds.
    pub duration: f64,
    /// Curve applied to each target's local progress.
    #[serde(default)]
    pub ease: Ease,
    /// Delay between consecutive targets' starts, in seconds.
    #[serde(default)]
    pub stagger: f64,
}

impl TweenSpec {
    /// `fromTo` tween with a 0.5 s default duration and the default ease.
    pub fn from_to(targets: Targets, from: Props, to: Props) -> Self {
        Self {
            targets,
            from,
            to,
            duration: 0.5,
            ease: Ease::default(),
            stagger: 0.0,
        }
    }

    /// Builder-style duration.
    pub fn duration(mut self, secs: f64) -> Self {
        self.duration = secs;
        self
    }

    /// Builder-style ease.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Builder-style stagger.
    pub fn stagger(mut self, secs: f64) -> Self {
        self.stagger = secs;
        self
    }

    /// Reject negative or non-finite timing and non-finite values.
    pub fn validate(&self) -> StageResult<()> {
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(StageError::animation("tween duration must be >= 0"));
        }
        if !(self.stagger.is_finite() && self.stagger >= 0.0) {
            return Err(StageError::animation("tween stagger must be >= 0"));
        }
        self.from.validate()?;
        self.to.validate()
    }

    /// Time from the first target's start to the last target's end.
    pub fn span(&self, target_count: usize) -> f64 {
        self.duration + self.stagger * target_count.saturating_sub(1) as f64
    }

    /// Values for a target whose local clock reads `local` seconds.
    ///
    /// Before 0 the from-state holds; from `duration` on the to-state holds exactly.
    pub fn sample(&self, local: f64) -> Props {
        if local < 0.0 {
            return self.from.clone();
        }
        if self.duration <= 0.0 || local >= self.duration - SETTLE_EPS {
            return Props::lerp(&self.from, &self.to, 1.0);
        }
        Props::lerp(&self.from, &self.to, self.ease.apply(local / self.duration))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
