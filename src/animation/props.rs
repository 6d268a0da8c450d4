use std::collections::BTreeMap;

use crate::foundation::{
    core::{Vec2, VisualState},
    error::{StageError, StageResult},
};

/// One animatable property of a [`VisualState`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Prop {
    /// Horizontal translation, px.
    X,
    /// Vertical translation, px.
    Y,
    /// Uniform scale (writes both axes).
    Scale,
    /// Horizontal scale.
    ScaleX,
    /// Vertical scale.
    ScaleY,
    /// Rotation, degrees.
    Rotate,
    /// Opacity.
    Opacity,
}

impl Prop {
    /// Read this property from a visual state.
    pub fn get(self, s: &VisualState) -> f64 {
        match self {
            Self::X => s.translate.x,
            Self::Y => s.translate.y,
            Self::Scale | Self::ScaleX => s.scale.x,
            Self::ScaleY => s.scale.y,
            Self::Rotate => s.rotation_deg,
            Self::Opacity => s.opacity,
        }
    }

    /// Write this property into a visual state.
    pub fn set(self, s: &mut VisualState, v: f64) {
        match self {
            Self::X => s.translate.x = v,
            Self::Y => s.translate.y = v,
            Self::Scale => s.scale = Vec2::new(v, v),
            Self::ScaleX => s.scale.x = v,
            Self::ScaleY => s.scale.y = v,
            Self::Rotate => s.rotation_deg = v,
            Self::Opacity => s.opacity = v.clamp(0.0, 1.0),
        }
    }

    /// Value of this property in the identity state.
    pub fn rest_value(self) -> f64 {
        Self::get(self, &VisualState::default())
    }
}

/// A sparse set of property values, iterated in a stable order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Props(BTreeMap<Prop, f64>);

impl Props {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, prop: Prop, v: f64) -> Self {
        self.0.insert(prop, v);
        self
    }

    /// Insert or replace one value.
    pub fn insert(&mut self, prop: Prop, v: f64) {
        self.0.insert(prop, v);
    }

    /// Value for `prop`, if present.
    pub fn get(&self, prop: Prop) -> Option<f64> {
        self.0.get(&prop).copied()
    }

    /// Iterate `(prop, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Prop, f64)> + '_ {
        self.0.iter().map(|(p, v)| (*p, *v))
    }

    /// Properties present in this set.
    pub fn keys(&self) -> impl Iterator<Item = Prop> + '_ {
        self.0.keys().copied()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if no property is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Write every property into `state`.
    pub fn apply_to(&self, state: &mut VisualState) {
        for (p, v) in self.iter() {
            p.set(state, v);
        }
    }

    /// Capture the current values of `keys` from `state`.
    pub fn capture(state: &VisualState, keys: impl IntoIterator<Item = Prop>) -> Self {
        Self(keys.into_iter().map(|p| (p, p.get(state))).collect())
    }

    /// Reject non-finite values.
    pub fn validate(&self) -> StageResult<()> {
        for (p, v) in self.iter() {
            if !v.is_finite() {
                return Err(StageError::validation(format!(
                    "property {p:?} must be finite"
                )));
            }
        }
        Ok(())
    }
}

impl FromIterator<(Prop, f64)> for Props {
    fn from_iter<I: IntoIterator<Item = (Prop, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Linear interpolation between two values of the same type.
pub trait Lerp: Sized {
    /// Value at `t` between `a` (0) and `b` (1).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for VisualState {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            translate: <Vec2 as Lerp>::lerp(&a.translate, &b.translate, t),
            scale: <Vec2 as Lerp>::lerp(&a.scale, &b.scale, t),
            rotation_deg: a.rotation_deg + (b.rotation_deg - a.rotation_deg) * t,
            opacity: a.opacity + (b.opacity - a.opacity) * t,
        }
    }
}

impl Lerp for Props {
    /// Interpolates the union of both key sets; a key missing on one side holds the
    /// other side's value. `t == 1` returns `b`'s values exactly.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let mut out = BTreeMap::new();
        for (p, av) in a.iter() {
            let bv = b.get(p).unwrap_or(av);
            out.insert(p, if t >= 1.0 { bv } else { av + (bv - av) * t });
        }
        for (p, bv) in b.iter() {
            out.entry(p).or_insert(bv);
        }
        Self(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/props.rs"]
mod tests;
