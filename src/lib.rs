//! scrollstage is a headless, scroll-synchronized animation orchestrator.
//!
//! Pages are an in-memory scene of sections and nodes. A [`Stage`] owns that scene and
//! everything that animates it:
//!
//! - entrance [`Timeline`]s sequenced from fromTo tweens with relative offsets
//! - scroll triggers that scrub, toggle or derive styles from a range, optionally pinned
//! - ambient [`ParticleField`]s looping independently
//!
//! Everything is created inside a scope ([`Stage::create_scope`]) and torn down with it,
//! restoring every node it touched. Scroll, resize and time are fed in explicitly, one
//! [`Stage::frame`] at a time.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Shared value types, errors and numeric helpers.
pub mod foundation {
    /// Ids, viewport, lengths and visual state.
    pub mod core;
    /// Error taxonomy.
    pub mod error;
    pub(crate) mod math;
}

/// Easing, animatable properties, tweens and timelines.
pub mod animation {
    /// Easing curves.
    pub mod ease;
    /// Play/reverse state of a played timeline.
    pub mod playhead;
    /// Animatable properties.
    pub mod props;
    /// Sequenced steps with relative offsets.
    pub mod timeline;
    /// fromTo tweens.
    pub mod tween;
}

/// Node tree, layout and selectors.
pub mod scene {
    /// Descendant selectors.
    pub mod selector;
    /// Node arena and vertical layout.
    pub mod tree;
}

/// Scroll ranges and the bindings they drive.
pub mod scroll {
    /// Start and end boundaries.
    pub mod boundary;
    /// Bindings: phase machine, scrub, toggle, derive and pin.
    pub mod trigger;
}

/// Progress-derived style effects.
pub mod effects {
    /// First-section scroll-out.
    pub mod hero_exit;
    /// The progress effect trait.
    pub mod progress;
}

/// Ambient particle fields.
pub mod particles {
    /// Seeded particle spawning and looping.
    pub mod field;
}

/// Scopes and the frame loop.
pub mod stage {
    /// The stage and its frame loop.
    pub mod core;
    /// Scope handles and the scope builder.
    pub mod scope;
}

/// Host-side interaction glue: smooth navigation and clipboard feedback.
pub mod interact {
    /// Clipboard seam and copy feedback.
    pub mod clipboard;
    /// Smooth scroll-to.
    pub mod nav;
}

/// Page documents and the portfolio choreography.
pub mod page {
    /// Serde page document.
    pub mod model;
    /// Section id to root node.
    pub mod registry;
    pub mod showcase;
}

pub use crate::animation::{
    ease::Ease,
    playhead::{Direction, Playhead},
    props::{Lerp, Prop, Props},
    timeline::{RelativeOffset, ScheduleEntry, Step, Timeline},
    tween::{Targets, TweenSpec},
};
pub use crate::effects::{
    hero_exit::{ExitTrack, HeroExit, HeroExitConfig},
    progress::{DerivedProps, ProgressEffect},
};
pub use crate::foundation::core::{Length, NodeId, Vec2, Viewport, VisualState};
pub use crate::foundation::error::{StageError, StageResult};
pub use crate::interact::{
    clipboard::{Clipboard, CopyIndicator, MemoryClipboard},
    nav::ScrollTo,
};
pub use crate::page::{
    model::{Content, MotionConfig, NodeDef, PageDef, SectionDef},
    registry::{SectionEntry, SectionRegistry},
    showcase::Showcase,
};
pub use crate::particles::field::{Particle, ParticleDistribution, ParticleField, UniformRange};
pub use crate::scene::{
    selector::Selector,
    tree::{Node, NodeSnapshot, NodeSpec, Scene, SceneSnapshot},
};
pub use crate::scroll::{
    boundary::{Anchor, Boundary, EndBoundary},
    trigger::{
        BindingUpdate, Phase, ScrollRange, StyleWrite, ToggleAction, ToggleActions,
        TriggerBinding, TriggerEffect, TriggerEvent, TriggerSpec,
    },
};
pub use crate::stage::{
    core::{FrameReport, Stage},
    scope::{ScopeCx, ScopeId, ScopeState},
};
