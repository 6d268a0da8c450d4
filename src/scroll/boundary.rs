use std::{fmt, str::FromStr};

use crate::foundation::{
    core::{Length, Viewport},
    error::{StageError, StageResult},
};

/// A point along an element's box or along the viewport.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Anchor {
    /// Top edge.
    Top,
    /// Vertical center.
    Center,
    /// Bottom edge.
    Bottom,
    /// Percent of the box height from its top.
    Percent(f64),
    /// Pixels from the box top.
    Px(f64),
}

impl Anchor {
    /// Offset in px from the top of a box of height `extent`.
    pub fn offset(self, extent: f64) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => extent / 2.0,
            Self::Bottom => extent,
            Self::Percent(p) => p * extent / 100.0,
            Self::Px(v) => v,
        }
    }

    fn parse(s: &str) -> StageResult<Self> {
        match s {
            "top" => Ok(Self::Top),
            "center" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            _ => {
                let (num, pct) = match s.strip_suffix('%') {
                    Some(n) => (n, true),
                    None => (s.strip_suffix("px").unwrap_or(s), false),
                };
                let v: f64 = num
                    .parse()
                    .map_err(|_| StageError::validation(format!("invalid anchor '{s}'")))?;
                if !v.is_finite() {
                    return Err(StageError::validation(format!("anchor '{s}' is not finite")));
                }
                Ok(if pct { Self::Percent(v) } else { Self::Px(v) })
            }
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Center => f.write_str("center"),
            Self::Bottom => f.write_str("bottom"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Px(v) => write!(f, "{v}px"),
        }
    }
}

/// "When `element` anchor meets `viewport` anchor", e.g. `top 80%`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Boundary {
    /// Anchor on the trigger element.
    pub element: Anchor,
    /// Anchor on the viewport.
    pub viewport: Anchor,
}

impl Boundary {
    /// Default start: element top reaches viewport bottom.
    pub const ENTER: Self = Self {
        element: Anchor::Top,
        viewport: Anchor::Bottom,
    };

    /// Default end: element bottom reaches viewport top.
    pub const EXIT: Self = Self {
        element: Anchor::Bottom,
        viewport: Anchor::Top,
    };

    /// Scroll position at which the boundary is crossed.
    pub fn resolve(self, element_top: f64, element_height: f64, vp: Viewport) -> f64 {
        element_top + self.element.offset(element_height) - self.viewport.offset(vp.height)
    }
}

impl FromStr for Boundary {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(el), Some(view), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(StageError::validation(format!(
                "boundary '{s}' must be '<element> <viewport>'"
            )));
        };
        Ok(Self {
            element: Anchor::parse(el)?,
            viewport: Anchor::parse(view)?,
        })
    }
}

impl TryFrom<String> for Boundary {
    type Error = StageError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Boundary> for String {
    fn from(b: Boundary) -> Self {
        b.to_string()
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

/// End of a trigger range: an absolute boundary or a distance past the start.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EndBoundary {
    /// Same form as a start boundary.
    At(Boundary),
    /// `+=` distance from the start; `Percent` is relative to the viewport height.
    After(Length),
}

impl Default for EndBoundary {
    fn default() -> Self {
        Self::At(Boundary::EXIT)
    }
}

impl EndBoundary {
    /// Scroll position of the end, given the resolved start.
    pub fn resolve(self, start: f64, element_top: f64, element_height: f64, vp: Viewport) -> f64 {
        match self {
            Self::At(b) => b.resolve(element_top, element_height, vp),
            Self::After(len) => start + len.resolve(vp, vp.height),
        }
    }
}

impl FromStr for EndBoundary {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().strip_prefix("+=") {
            Some(rest) => Ok(Self::After(rest.parse()?)),
            None => Ok(Self::At(s.parse()?)),
        }
    }
}

impl TryFrom<String> for EndBoundary {
    type Error = StageError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EndBoundary> for String {
    fn from(b: EndBoundary) -> Self {
        match b {
            EndBoundary::At(b) => b.to_string(),
            EndBoundary::After(len) => format!("+={len}"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/boundary.rs"]
mod tests;
