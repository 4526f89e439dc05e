//! Device capability resolution and per-module mount decisions.

use crate::config::EffectsConfig;

/// Media queries the effects react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaQuery {
    FinePointer,
    CoarsePointer,
    ReducedMotion,
}

impl MediaQuery {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaQuery::FinePointer => "(pointer: fine)",
            MediaQuery::CoarsePointer => "(pointer: coarse)",
            MediaQuery::ReducedMotion => "(prefers-reduced-motion: reduce)",
        }
    }

    /// Value assumed when the query mechanism is missing: whatever keeps
    /// effects off.
    pub fn fail_safe(self) -> bool {
        match self {
            MediaQuery::FinePointer => false,
            MediaQuery::CoarsePointer => true,
            MediaQuery::ReducedMotion => true,
        }
    }
}

/// Answers capability questions for the current runtime.
pub trait CapabilityProbe {
    /// `None` when media queries cannot be evaluated at all.
    fn matches(&self, query: MediaQuery) -> Option<bool>;
    /// Whether an accelerated rendering context can be created. Must not
    /// panic; probing failures count as `false`.
    fn accelerated_rendering(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub fine_pointer: bool,
    pub coarse_pointer: bool,
    pub reduced_motion: bool,
    pub accelerated: bool,
}

impl Capabilities {
    pub fn detect(probe: &dyn CapabilityProbe) -> Self {
        let query = |q: MediaQuery| probe.matches(q).unwrap_or_else(|| q.fail_safe());
        let caps = Self {
            fine_pointer: query(MediaQuery::FinePointer),
            coarse_pointer: query(MediaQuery::CoarsePointer),
            reduced_motion: query(MediaQuery::ReducedMotion),
            accelerated: probe.accelerated_rendering(),
        };
        log::info!(
            "[caps] fine={} coarse={} reduced={} accelerated={}",
            caps.fine_pointer,
            caps.coarse_pointer,
            caps.reduced_motion,
            caps.accelerated
        );
        caps
    }

    /// Everything off; what a non-browser runtime resolves to.
    pub fn fail_safe() -> Self {
        Self {
            fine_pointer: MediaQuery::FinePointer.fail_safe(),
            coarse_pointer: MediaQuery::CoarsePointer.fail_safe(),
            reduced_motion: MediaQuery::ReducedMotion.fail_safe(),
            accelerated: false,
        }
    }

    /// Apply a live media-query change.
    pub fn apply(&mut self, query: MediaQuery, matches: bool) {
        match query {
            MediaQuery::FinePointer => self.fine_pointer = matches,
            MediaQuery::CoarsePointer => self.coarse_pointer = matches,
            MediaQuery::ReducedMotion => self.reduced_motion = matches,
        }
    }

    /// Static, single-frame rendering is used for the particle field.
    #[inline]
    pub fn static_field(&self) -> bool {
        self.reduced_motion || self.coarse_pointer
    }

    /// The 3D scene runs only on capable, motion-friendly, fine-pointer devices.
    #[inline]
    pub fn scene_allowed(&self) -> bool {
        !self.reduced_motion && !self.coarse_pointer && self.accelerated
    }
}

/// One "should this module run" answer per module, resolved once at startup.
/// Scroll smoothing is not part of it: the broadcaster follows reduced motion
/// live and can turn smoothing back on after a flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MountPlan {
    pub particles: bool,
    pub scene: bool,
    pub cursor: bool,
    pub scroll: bool,
}

impl MountPlan {
    pub fn resolve(caps: &Capabilities, config: &EffectsConfig) -> Self {
        Self {
            particles: config.particles,
            scene: config.scene && caps.scene_allowed(),
            cursor: config.cursor && caps.fine_pointer,
            scroll: true,
        }
    }
}
