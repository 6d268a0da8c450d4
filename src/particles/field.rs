use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    animation::props::{Prop, Props},
    foundation::{
        core::{Length, NodeId},
        error::{StageError, StageResult},
    },
    scene::tree::{NodeSpec, Scene},
};

/// Class given to every spawned particle node.
pub const PARTICLE_CLASS: &str = "glitter-particle";

/// Inclusive uniform range `[lo, hi]`, serialized as a two-element array.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UniformRange(pub f64, pub f64);

impl UniformRange {
    /// Lower bound.
    pub fn lo(self) -> f64 {
        self.0
    }

    /// Upper bound.
    pub fn hi(self) -> f64 {
        self.1
    }

    /// Whether `v` lies inside the range.
    pub fn contains(self, v: f64) -> bool {
        (self.0..=self.1).contains(&v)
    }

    fn validate(self, name: &str) -> StageResult<()> {
        if !(self.0.is_finite() && self.1.is_finite()) || self.0 > self.1 {
            return Err(StageError::validation(format!(
                "particle range '{name}' must be finite with lo <= hi"
            )));
        }
        Ok(())
    }

    fn sample(self, rng: &mut impl Rng) -> f64 {
        if self.0 == self.1 {
            self.0
        } else {
            rng.random_range(self.0..=self.1)
        }
    }
}

/// Uniform distribution every particle parameter is drawn from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ParticleDistribution {
    /// Number of particles.
    pub count: usize,
    /// Horizontal position, percent of the container width.
    pub left: UniformRange,
    /// Vertical position, percent of the container height.
    pub top: UniformRange,
    /// Opacity at the start of each cycle.
    pub opacity: UniformRange,
    /// Fixed scale.
    pub scale: UniformRange,
    /// Upward travel per cycle, px.
    pub drift: UniformRange,
    /// Cycle length, seconds.
    pub duration: UniformRange,
    /// Wait before the first cycle, seconds.
    pub delay: UniformRange,
}

impl Default for ParticleDistribution {
    fn default() -> Self {
        Self {
            count: 50,
            left: UniformRange(0.0, 100.0),
            top: UniformRange(0.0, 100.0),
            opacity: UniformRange(0.2, 0.7),
            scale: UniformRange(0.5, 1.0),
            drift: UniformRange(50.0, 150.0),
            duration: UniformRange(2.0, 5.0),
            delay: UniformRange(0.0, 3.0),
        }
    }
}

impl ParticleDistribution {
    /// Reject inverted or non-finite ranges and non-positive durations.
    pub fn validate(&self) -> StageResult<()> {
        for (name, r) in [
            ("left", self.left),
            ("top", self.top),
            ("opacity", self.opacity),
            ("scale", self.scale),
            ("drift", self.drift),
            ("duration", self.duration),
            ("delay", self.delay),
        ] {
            r.validate(name)?;
        }
        if self.duration.lo() <= 0.0 {
            return Err(StageError::validation("particle duration must be > 0"));
        }
        if self.delay.lo() < 0.0 {
            return Err(StageError::validation("particle delay must be >= 0"));
        }
        Ok(())
    }

    /// Draw one particle; `node` is left unset.
    fn draw(&self, rng: &mut impl Rng) -> Particle {
        Particle {
            node: NodeId(0),
            left: self.left.sample(rng),
            top: self.top.sample(rng),
            opacity: self.opacity.sample(rng),
            scale: self.scale.sample(rng),
            drift: self.drift.sample(rng),
            duration: self.duration.sample(rng),
            delay: self.delay.sample(rng),
        }
    }
}

/// Parameters of one particle, fixed at spawn.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Particle {
    /// Scene node showing the particle.
    pub node: NodeId,
    /// Percent of container width.
    pub left: f64,
    /// Percent of container height.
    pub top: f64,
    /// Initial opacity.
    pub opacity: f64,
    /// Scale.
    pub scale: f64,
    /// Upward travel per cycle, px.
    pub drift: f64,
    /// Cycle length, seconds.
    pub duration: f64,
    /// Start delay, seconds.
    pub delay: f64,
}

impl Particle {
    /// Visual state at field time `t`: held at rest during the delay, then each cycle
    /// rises by `drift` and fades linearly to 0 before restarting.
    pub fn props_at(&self, t: f64) -> Props {
        let phase = if t < self.delay {
            0.0
        } else {
            ((t - self.delay) % self.duration) / self.duration
        };
        Props::new()
            .with(Prop::Y, -self.drift * phase)
            .with(Prop::Opacity, self.opacity * (1.0 - phase))
            .with(Prop::Scale, self.scale)
    }
}

/// A set of independently looping particles under one container.
#[derive(Clone, Debug)]
pub struct ParticleField {
    container: NodeId,
    particles: Vec<Particle>,
    clock: f64,
    disposed: bool,
}

impl ParticleField {
    /// Create `dist.count` particle nodes under `container`, drawn from `seed`.
    #[tracing::instrument(level = "debug", skip(scene, dist))]
    pub fn spawn(
        scene: &mut Scene,
        container: NodeId,
        dist: &ParticleDistribution,
        seed: u64,
    ) -> StageResult<Self> {
        dist.validate()?;
        if !scene.contains(container) {
            return Err(StageError::validation(format!(
                "particle container {} does not exist",
                container.0
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut particles = Vec::with_capacity(dist.count);
        for _ in 0..dist.count {
            let mut p = dist.draw(&mut rng);
            p.node = scene.append(
                container,
                NodeSpec::div(PARTICLE_CLASS, Length::Px(0.0))
                    .at(Length::Percent(p.top))
                    .left(Length::Percent(p.left)),
            )?;
            particles.push(p);
        }

        let field = Self {
            container,
            particles,
            clock: 0.0,
            disposed: false,
        };
        field.write(scene);
        tracing::debug!(count = dist.count, "particles spawned");
        Ok(field)
    }

    /// Container node.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Spawned particles (empty after dispose).
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Elapsed field time, seconds.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Whether [`ParticleField::dispose`] ran.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Per-node values at field time `t`.
    pub fn sample(&self, t: f64) -> Vec<(NodeId, Props)> {
        self.particles.iter().map(|p| (p.node, p.props_at(t))).collect()
    }

    /// Advance by `dt` and write every particle. Returns the number written.
    pub fn step(&mut self, scene: &mut Scene, dt: f64) -> usize {
        if self.disposed {
            return 0;
        }
        if dt.is_finite() && dt > 0.0 {
            self.clock += dt;
        }
        self.write(scene)
    }

    fn write(&self, scene: &mut Scene) -> usize {
        let mut n = 0;
        for p in &self.particles {
            if let Some(style) = scene.style_mut(p.node) {
                p.props_at(self.clock).apply_to(style);
                n += 1;
            }
        }
        n
    }

    /// Remove every particle node and stop stepping. Returns the nodes removed.
    pub fn dispose(&mut self, scene: &mut Scene) -> usize {
        if self.disposed {
            return 0;
        }
        self.disposed = true;
        let removed = self
            .particles
            .drain(..)
            .map(|p| scene.remove(p.node))
            .sum();
        tracing::debug!(removed, "particles disposed");
        removed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/field.rs"]
mod tests;
