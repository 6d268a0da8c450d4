use std::{f64::consts::PI, fmt, str::FromStr};

use crate::foundation::error::StageError;

/// Easing curves available to tweens.
///
/// Names follow the `powerN.dir` convention used by page authors: `power1` is quadratic,
/// `power2` cubic, `power3` quartic, `power4` quintic. `none` is linear.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    /// `none`.
    Linear,
    /// `power1.in`.
    InQuad,
    /// `power1.out`, the default tween ease.
    #[default]
    OutQuad,
    /// `power1.inOut`.
    InOutQuad,
    /// `power2.in`.
    InCubic,
    /// `power2.out`.
    OutCubic,
    /// `power2.inOut`.
    InOutCubic,
    /// `power3.in`.
    InQuart,
    /// `power3.out`.
    OutQuart,
    /// `power3.inOut`.
    InOutQuart,
    /// `power4.in`.
    InQuint,
    /// `power4.out`.
    OutQuint,
    /// `power4.inOut`.
    InOutQuint,
    /// `sine.in`.
    InSine,
    /// `sine.out`.
    OutSine,
    /// `sine.inOut`.
    InOutSine,
}

impl Ease {
    /// Every curve, in declaration order.
    pub const ALL: [Ease; 16] = [
        Self::Linear,
        Self::InQuad,
        Self::OutQuad,
        Self::InOutQuad,
        Self::InCubic,
        Self::OutCubic,
        Self::InOutCubic,
        Self::InQuart,
        Self::OutQuart,
        Self::InOutQuart,
        Self::InQuint,
        Self::OutQuint,
        Self::InOutQuint,
        Self::InSine,
        Self::OutSine,
        Self::InOutSine,
    ];

    /// Map linear progress `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => power_in(t, 2),
            Self::OutQuad => power_out(t, 2),
            Self::InOutQuad => power_in_out(t, 2),
            Self::InCubic => power_in(t, 3),
            Self::OutCubic => power_out(t, 3),
            Self::InOutCubic => power_in_out(t, 3),
            Self::InQuart => power_in(t, 4),
            Self::OutQuart => power_out(t, 4),
            Self::InOutQuart => power_in_out(t, 4),
            Self::InQuint => power_in(t, 5),
            Self::OutQuint => power_out(t, 5),
            Self::InOutQuint => power_in_out(t, 5),
            Self::InSine => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - (t * PI / 2.0).cos()
                }
            }
            Self::OutSine => (t * PI / 2.0).sin().min(1.0),
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Linear => "none",
            Self::InQuad => "power1.in",
            Self::OutQuad => "power1.out",
            Self::InOutQuad => "power1.inOut",
            Self::InCubic => "power2.in",
            Self::OutCubic => "power2.out",
            Self::InOutCubic => "power2.inOut",
            Self::InQuart => "power3.in",
            Self::OutQuart => "power3.out",
            Self::InOutQuart => "power3.inOut",
            Self::InQuint => "power4.in",
            Self::OutQuint => "power4.out",
            Self::InOutQuint => "power4.inOut",
            Self::InSine => "sine.in",
            Self::OutSine => "sine.out",
            Self::InOutSine => "sine.inOut",
        }
    }
}

fn power_in(t: f64, p: i32) -> f64 {
    t.powi(p)
}

fn power_out(t: f64, p: i32) -> f64 {
    1.0 - (1.0 - t).powi(p)
}

fn power_in_out(t: f64, p: i32) -> f64 {
    if t < 0.5 {
        2f64.powi(p - 1) * t.powi(p)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(p) / 2.0
    }
}

impl FromStr for Ease {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // A bare family name means its `.out` flavor.
        let canonical = match s {
            "linear" | "none" => return Ok(Self::Linear),
            "power0" | "power0.in" | "power0.out" | "power0.inOut" => return Ok(Self::Linear),
            "power1" | "quad" => "power1.out",
            "power2" | "cubic" => "power2.out",
            "power3" | "quart" => "power3.out",
            "power4" | "quint" | "strong" => "power4.out",
            "sine" => "sine.out",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|e| e.name() == canonical)
            .ok_or_else(|| StageError::validation(format!("unknown ease '{s}'")))
    }
}

impl TryFrom<String> for Ease {
    type Error = StageError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Ease> for String {
    fn from(e: Ease) -> Self {
        e.name().to_string()
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
