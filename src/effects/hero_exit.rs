use crate::{
    animation::props::{Prop, Props},
    effects::progress::{DerivedProps, ProgressEffect},
    foundation::{
        core::{Length, Viewport},
        error::{StageError, StageResult},
    },
    scene::selector::Selector,
};

/// How one element leaves the first section as `exit` goes from 0 to 1.
///
/// Every field is a linear coefficient on `exit`; `None` leaves the property alone.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExitTrack {
    /// Nodes this track moves.
    pub target: Selector,
    /// Horizontal travel at `exit = 1`.
    #[serde(default)]
    pub x: Option<Length>,
    /// Vertical travel at `exit = 1`.
    #[serde(default)]
    pub y: Option<Length>,
    /// Opacity lost at `exit = 1` (`opacity = 1 - fade * exit`).
    #[serde(default)]
    pub fade: Option<f64>,
    /// Scale gained at `exit = 1` (`scale = 1 + scale_gain * exit`).
    #[serde(default)]
    pub scale_gain: Option<f64>,
}

impl ExitTrack {
    fn new(class: &str) -> Self {
        Self {
            target: Selector::class(class),
            x: None,
            y: None,
            fade: None,
            scale_gain: None,
        }
    }

    fn props_at(&self, exit: f64, vp: Viewport) -> Props {
        let mut p = Props::new();
        if let Some(x) = self.x {
            p.insert(Prop::X, x.resolve(vp, vp.height) * exit);
        }
        if let Some(y) = self.y {
            p.insert(Prop::Y, y.resolve(vp, vp.height) * exit);
        }
        if let Some(fade) = self.fade {
            p.insert(Prop::Opacity, 1.0 - fade * exit);
        }
        if let Some(gain) = self.scale_gain {
            p.insert(Prop::Scale, 1.0 + gain * exit);
        }
        p
    }

    fn rest(&self) -> Props {
        let mut p = Props::new();
        if self.x.is_some() {
            p.insert(Prop::X, 0.0);
        }
        if self.y.is_some() {
            p.insert(Prop::Y, 0.0);
        }
        if self.fade.is_some() {
            p.insert(Prop::Opacity, 1.0);
        }
        if self.scale_gain.is_some() {
            p.insert(Prop::Scale, 1.0);
        }
        p
    }
}

/// Coefficients of the first section's scroll-out. The defaults are the brand's
/// hand-tuned values.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HeroExitConfig {
    /// Progress below which the exit does nothing.
    pub threshold: f64,
    /// Per-element tracks.
    pub tracks: Vec<ExitTrack>,
    /// Length of the pinned range past `top top`; `Percent` is of the viewport height.
    pub range: Length,
}

impl Default for HeroExitConfig {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            tracks: vec![
                ExitTrack {
                    x: Some(Length::Vw(-18.0)),
                    fade: Some(0.75),
                    ..ExitTrack::new("hero-headline")
                },
                ExitTrack {
                    x: Some(Length::Vw(10.0)),
                    y: Some(Length::Vh(-6.0)),
                    fade: Some(0.75),
                    ..ExitTrack::new("hero-card")
                },
                ExitTrack {
                    y: Some(Length::Vh(10.0)),
                    fade: Some(0.8),
                    ..ExitTrack::new("hero-cta")
                },
                ExitTrack {
                    y: Some(Length::Vh(-6.0)),
                    scale_gain: Some(0.06),
                    ..ExitTrack::new("hero-bg")
                },
            ],
            range: Length::Percent(130.0),
        }
    }
}

impl HeroExitConfig {
    /// Reject thresholds outside `[0, 1)` and non-finite coefficients.
    pub fn validate(&self) -> StageResult<()> {
        if !(self.threshold.is_finite() && (0.0..1.0).contains(&self.threshold)) {
            return Err(StageError::validation(
                "hero exit threshold must be in [0, 1)",
            ));
        }
        if !(self.range.magnitude().is_finite() && self.range.magnitude() >= 0.0) {
            return Err(StageError::validation("hero exit range must be >= 0"));
        }
        for t in &self.tracks {
            let coeffs = [t.fade, t.scale_gain]
                .into_iter()
                .flatten()
                .chain(t.x.map(Length::magnitude))
                .chain(t.y.map(Length::magnitude));
            for c in coeffs {
                if !c.is_finite() {
                    return Err(StageError::validation(format!(
                        "hero exit track '{}' has a non-finite coefficient",
                        t.target
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Derived scroll-out of the first section: silent up to the threshold, then every
/// track interpolates linearly in `exit = (p - threshold) / (1 - threshold)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeroExit {
    config: HeroExitConfig,
}

impl HeroExit {
    /// Build from validated configuration.
    pub fn new(config: HeroExitConfig) -> StageResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &HeroExitConfig {
        &self.config
    }

    /// Exit fraction for scroll progress `p`, or `None` at or below the threshold.
    pub fn exit_progress(&self, p: f64) -> Option<f64> {
        let t = self.config.threshold;
        if p.is_nan() || p <= t {
            return None;
        }
        Some(((p - t) / (1.0 - t)).min(1.0))
    }
}

impl ProgressEffect for HeroExit {
    fn derive(&self, progress: f64, viewport: Viewport) -> Option<Vec<DerivedProps>> {
        let exit = self.exit_progress(progress)?;
        Some(
            self.config
                .tracks
                .iter()
                .map(|t| DerivedProps {
                    target: t.target.clone(),
                    props: t.props_at(exit, viewport),
                })
                .collect(),
        )
    }

    fn rest(&self) -> Vec<DerivedProps> {
        self.config
            .tracks
            .iter()
            .map(|t| DerivedProps {
                target: t.target.clone(),
                props: t.rest(),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/hero_exit.rs"]
mod tests;
