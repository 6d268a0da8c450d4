use crate::{animation::props::Props, foundation::core::Viewport, scene::selector::Selector};

/// Property values one derived update writes to the nodes matching `target`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DerivedProps {
    /// Nodes to write, resolved inside the owning scope.
    pub target: Selector,
    /// Values to write.
    pub props: Props,
}

/// A pure mapping from scroll progress to visual state, driven by a trigger binding.
///
/// Implementations hold no mutable state: the binder calls [`ProgressEffect::derive`]
/// with the clamped progress whenever it changes, and writes [`ProgressEffect::rest`]
/// verbatim when scrolling back above the range start.
pub trait ProgressEffect {
    /// Values for `progress`, or `None` when this progress leaves the nodes untouched.
    fn derive(&self, progress: f64, viewport: Viewport) -> Option<Vec<DerivedProps>>;

    /// Exact pre-animation values of every property [`ProgressEffect::derive`] writes.
    fn rest(&self) -> Vec<DerivedProps>;
}

impl<F> ProgressEffect for F
where
    F: Fn(f64, Viewport) -> Option<Vec<DerivedProps>>,
{
    fn derive(&self, progress: f64, viewport: Viewport) -> Option<Vec<DerivedProps>> {
        self(progress, viewport)
    }

    fn rest(&self) -> Vec<DerivedProps> {
        Vec::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/progress.rs"]
mod tests;
