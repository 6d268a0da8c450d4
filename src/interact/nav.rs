use crate::{
    animation::ease::Ease,
    foundation::{
        error::{StageError, StageResult},
        math::lerp,
    },
};

/// Default navigation duration, seconds.
pub const DEFAULT_NAV_DURATION: f64 = 0.8;

/// Smooth scroll from one position to another, stepped by the frame loop.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScrollTo {
    from: f64,
    to: f64,
    duration: f64,
    ease: Ease,
    elapsed: f64,
}

impl ScrollTo {
    /// Scroll from `from` to `to` over `duration` seconds with `power2.inOut`.
    pub fn new(from: f64, to: f64, duration: f64) -> StageResult<Self> {
        if !(from.is_finite() && to.is_finite()) {
            return Err(StageError::validation("scroll positions must be finite"));
        }
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(StageError::validation("scroll duration must be >= 0"));
        }
        Ok(Self {
            from,
            to,
            duration,
            ease: Ease::InOutCubic,
            elapsed: 0.0,
        })
    }

    /// Builder-style ease.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Destination.
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Whether the destination has been reached.
    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Scroll position after `dt` more seconds.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
        if self.is_done() {
            return self.to;
        }
        lerp(self.from, self.to, self.ease.apply(self.elapsed / self.duration))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/nav.rs"]
mod tests;
