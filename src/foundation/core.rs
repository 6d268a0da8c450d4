use std::{fmt, str::FromStr};

use crate::foundation::error::{StageError, StageResult};

pub use kurbo::Vec2;

/// Stable handle to a node in a [`crate::Scene`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u32);

/// Size of the single active viewport, in px.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Viewport width in px.
    pub width: f64,
    /// Viewport height in px.
    pub height: f64,
}

impl Viewport {
    /// Build a viewport, rejecting non-positive or non-finite sizes.
    pub fn new(width: f64, height: f64) -> StageResult<Self> {
        let vp = Self { width, height };
        vp.validate()?;
        Ok(vp)
    }

    /// Check that both dimensions are finite and > 0.
    pub fn validate(self) -> StageResult<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(StageError::validation("viewport width must be > 0"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(StageError::validation("viewport height must be > 0"));
        }
        Ok(())
    }

    /// `v` percent of the viewport width, in px.
    pub fn vw(self, v: f64) -> f64 {
        v * self.width / 100.0
    }

    /// `v` percent of the viewport height, in px.
    pub fn vh(self, v: f64) -> f64 {
        v * self.height / 100.0
    }
}

/// A length in one of the units the page layout uses.
///
/// Serialized as a compact string (`"24px"`, `"100vh"`, `"6vw"`, `"50%"`); a
/// unitless string is read as px.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Length {
    /// Absolute pixels.
    Px(f64),
    /// Percent of viewport width.
    Vw(f64),
    /// Percent of viewport height.
    Vh(f64),
    /// Percent of a caller-supplied reference size (the parent box height for layout).
    Percent(f64),
}

impl Default for Length {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

impl Length {
    /// Resolve to px. `reference` is the size a `Percent` length refers to.
    pub fn resolve(self, vp: Viewport, reference: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Vw(v) => vp.vw(v),
            Self::Vh(v) => vp.vh(v),
            Self::Percent(v) => v * reference / 100.0,
        }
    }

    /// Raw magnitude regardless of unit.
    pub fn magnitude(self) -> f64 {
        match self {
            Self::Px(v) | Self::Vw(v) | Self::Vh(v) | Self::Percent(v) => v,
        }
    }
}

impl FromStr for Length {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (num, ctor): (&str, fn(f64) -> Length) = if let Some(n) = s.strip_suffix("px") {
            (n, Length::Px)
        } else if let Some(n) = s.strip_suffix("vw") {
            (n, Length::Vw)
        } else if let Some(n) = s.strip_suffix("vh") {
            (n, Length::Vh)
        } else if let Some(n) = s.strip_suffix('%') {
            (n, Length::Percent)
        } else {
            (s, Length::Px)
        };
        let v: f64 = num
            .trim()
            .parse()
            .map_err(|_| StageError::validation(format!("invalid length '{s}'")))?;
        if !v.is_finite() {
            return Err(StageError::validation(format!("length '{s}' is not finite")));
        }
        Ok(ctor(v))
    }
}

impl TryFrom<String> for Length {
    type Error = StageError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Length> for String {
    fn from(l: Length) -> Self {
        l.to_string()
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Vw(v) => write!(f, "{v}vw"),
            Self::Vh(v) => write!(f, "{v}vh"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// Visual properties an animation may write on a node.
///
/// Translation is in px relative to the node's layout position; rotation is in
/// degrees around the node's center.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualState {
    /// Translation in px.
    pub translate: Vec2,
    /// Non-uniform scale, `(1, 1)` at rest.
    pub scale: Vec2,
    /// Rotation in degrees.
    pub rotation_deg: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            rotation_deg: 0.0,
            opacity: 1.0,
        }
    }
}

impl VisualState {
    /// Equivalent affine transform (rotation and scale about the origin, then translation).
    pub fn to_affine(self) -> kurbo::Affine {
        kurbo::Affine::translate(self.translate)
            * kurbo::Affine::rotate(self.rotation_deg.to_radians())
            * kurbo::Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }

    /// True when no property differs from the identity state.
    pub fn is_identity(self) -> bool {
        self == Self::default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
