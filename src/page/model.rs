use std::{collections::BTreeSet, io::Read, path::Path};

use crate::{
    effects::hero_exit::HeroExitConfig,
    foundation::{
        core::{Length, Viewport},
        error::{StageError, StageResult},
    },
    interact::nav::DEFAULT_NAV_DURATION,
    particles::field::ParticleDistribution,
    scene::tree::NodeSpec,
    scroll::boundary::{Anchor, Boundary, EndBoundary},
};

/// A whole page: layout, content and the tunables of its choreography.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageDef {
    /// Viewport the page is mounted in.
    pub viewport: Viewport,
    /// Root seed for everything random (particle fields).
    #[serde(default)]
    pub seed: u64,
    /// Sections in document order.
    pub sections: Vec<SectionDef>,
    /// Fixed full-viewport container for the particle field.
    #[serde(default)]
    pub overlay: Option<NodeDef>,
    /// Text and links shown by the sections.
    #[serde(default)]
    pub content: Content,
    /// Particle field distribution.
    #[serde(default)]
    pub particles: ParticleDistribution,
    /// First-section scroll-out.
    #[serde(default)]
    pub hero_exit: HeroExitConfig,
    /// Timing shared by the section choreography.
    #[serde(default)]
    pub motion: MotionConfig,
}

/// Timing constants shared across sections.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Wait before the first-section entrance plays, seconds.
    pub entrance_delay: f64,
    /// Scrub lag of the per-section reveal tweens, seconds.
    pub scrub_lag: f64,
    /// Smooth-scroll duration of navigation, seconds.
    pub nav_duration: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            entrance_delay: 0.3,
            scrub_lag: 0.4,
            nav_duration: DEFAULT_NAV_DURATION,
        }
    }
}

/// A top-level section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SectionDef {
    /// Stable id (`hero`, `work`, `about`...).
    pub id: String,
    /// Start of the section's primary reveal range.
    #[serde(default = "default_section_start")]
    pub start: Boundary,
    /// End of the section's primary reveal range.
    #[serde(default = "default_section_end")]
    pub end: EndBoundary,
    /// Section root node.
    #[serde(flatten)]
    pub node: NodeDef,
}

fn default_section_start() -> Boundary {
    Boundary {
        element: Anchor::Top,
        viewport: Anchor::Percent(80.0),
    }
}

fn default_section_end() -> EndBoundary {
    EndBoundary::At(Boundary {
        element: Anchor::Top,
        viewport: Anchor::Percent(50.0),
    })
}

/// A node and its subtree.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeDef {
    /// Element tag.
    #[serde(default = "default_tag")]
    pub tag: String,
    /// Space-separated classes.
    #[serde(default)]
    pub class: String,
    /// Offset from the parent top.
    #[serde(default)]
    pub top: Length,
    /// Offset from the parent's left edge.
    #[serde(default)]
    pub left: Length,
    /// Box height.
    #[serde(default)]
    pub height: Length,
    /// Stamp this node out `repeat` times (list items, headline words).
    #[serde(default = "one")]
    pub repeat: usize,
    /// Children in order.
    #[serde(default)]
    pub children: Vec<NodeDef>,
}

fn default_tag() -> String {
    "div".to_string()
}

fn one() -> usize {
    1
}

impl NodeDef {
    /// Scene insertion spec for one copy of this node.
    pub fn spec(&self) -> NodeSpec {
        NodeSpec {
            tag: self.tag.clone(),
            classes: self.class.split_whitespace().map(str::to_string).collect(),
            top: self.top,
            left: self.left,
            height: self.height,
            fixed: false,
        }
    }

    fn validate(&self, path: &str) -> StageResult<()> {
        if self.tag.trim().is_empty() {
            return Err(StageError::validation(format!("{path}: empty tag")));
        }
        if self.repeat == 0 {
            return Err(StageError::validation(format!("{path}: repeat must be >= 1")));
        }
        for (i, child) in self.children.iter().enumerate() {
            child.validate(&format!("{path}/{i}"))?;
        }
        Ok(())
    }
}

/// Text and links rendered by the page. Pure data.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Content {
    /// Project cards.
    pub projects: Vec<Project>,
    /// Process cards.
    pub process_steps: Vec<ProcessStep>,
    /// Metric rows.
    pub metrics: Vec<Metric>,
    /// Testimonials.
    pub testimonials: Vec<Testimonial>,
    /// Contact details.
    pub contact: Contact,
}

/// One portfolio project.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Project {
    /// Title.
    pub title: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Technology tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Cover image path.
    #[serde(default)]
    pub image: Option<String>,
    /// Source repository.
    #[serde(default)]
    pub github: Option<String>,
    /// Live deployment.
    #[serde(default)]
    pub live: Option<String>,
}

/// One step of the working process.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProcessStep {
    /// Display number, e.g. `01`.
    pub number: String,
    /// Title.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub description: String,
}

/// A headline number.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Metric {
    /// Value as displayed (`12+`).
    pub value: String,
    /// Caption.
    pub label: String,
}

/// A quoted recommendation.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Testimonial {
    /// Quote text.
    pub quote: String,
    /// Who said it.
    pub author: String,
    /// Their role.
    #[serde(default)]
    pub role: String,
}

/// Contact block.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Contact {
    /// Address the copy button writes to the clipboard.
    pub email: String,
    /// Location line.
    #[serde(default)]
    pub location: String,
    /// Social and resume links.
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Labelled link.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Link {
    /// Label.
    pub label: String,
    /// Target URL.
    pub url: String,
}

impl PageDef {
    /// Read and validate a page document from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> StageResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            StageError::Other(anyhow::Error::new(e).context(format!(
                "open page document '{}'",
                path.display()
            )))
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Read and validate a page document.
    pub fn from_reader(reader: impl Read) -> StageResult<Self> {
        let page: Self =
            serde_json::from_reader(reader).map_err(|e| StageError::serde(e.to_string()))?;
        page.validate()?;
        Ok(page)
    }

    /// Parse and validate a page document.
    pub fn from_json_str(s: &str) -> StageResult<Self> {
        let page: Self = serde_json::from_str(s).map_err(|e| StageError::serde(e.to_string()))?;
        page.validate()?;
        Ok(page)
    }

    /// Pretty JSON.
    pub fn to_json_string(&self) -> StageResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StageError::serde(e.to_string()))
    }

    /// Check the viewport, section ids, node trees and tunables.
    pub fn validate(&self) -> StageResult<()> {
        self.viewport.validate()?;
        if self.sections.is_empty() {
            return Err(StageError::validation("page must have at least one section"));
        }
        let mut seen = BTreeSet::new();
        for s in &self.sections {
            if s.id.trim().is_empty() {
                return Err(StageError::validation("section id must be non-empty"));
            }
            if !seen.insert(s.id.as_str()) {
                return Err(StageError::validation(format!(
                    "duplicate section id '{}'",
                    s.id
                )));
            }
            if s.node.repeat != 1 {
                return Err(StageError::validation(format!(
                    "section '{}' cannot repeat",
                    s.id
                )));
            }
            s.node.validate(&s.id)?;
        }
        if let Some(overlay) = &self.overlay {
            overlay.validate("overlay")?;
        }
        self.particles.validate()?;
        self.hero_exit.validate()?;
        let m = &self.motion;
        for (name, v) in [
            ("entrance_delay", m.entrance_delay),
            ("scrub_lag", m.scrub_lag),
            ("nav_duration", m.nav_duration),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(StageError::validation(format!("motion.{name} must be >= 0")));
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for PageDef {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json_str(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/model.rs"]
mod tests;
