//! Drifting particle mesh: population, physics and connection search.

use crate::capability::Capabilities;
use crate::constants::*;
use crate::host::Viewport;
use crate::math::{lerp, wrap_for_render, wrap_for_space};
use crate::pointer::PointerState;
use fnv::FnvHashMap;
use glam::Vec2;
use rand::prelude::*;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorIndex {
    Neutral,
    Muted,
    Accent,
}

impl ColorIndex {
    /// Map a uniform roll in `[0, 1)` to a color: 8% accent, 30% muted,
    /// the rest neutral.
    pub fn from_roll(roll: f32) -> Self {
        if roll < ACCENT_CHANCE {
            ColorIndex::Accent
        } else if roll < ACCENT_CHANCE + MUTED_CHANCE {
            ColorIndex::Muted
        } else {
            ColorIndex::Neutral
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

pub const ACCENT: Rgba = Rgba::rgb(198, 255, 0);
pub const MUTED: Rgba = Rgba::rgb(160, 160, 168);
pub const NEUTRAL: Rgba = Rgba::rgb(245, 245, 245);
pub const SHADOW: Rgba = Rgba::rgb(58, 58, 64);

/// Device class deciding how many particles to spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Coarse,
    ReducedMotion,
    Full,
}

impl DeviceClass {
    pub fn from_capabilities(caps: &Capabilities) -> Self {
        if caps.coarse_pointer {
            DeviceClass::Coarse
        } else if caps.reduced_motion {
            DeviceClass::ReducedMotion
        } else {
            DeviceClass::Full
        }
    }

    /// `(area per particle, min, max)`
    fn density(self) -> (f32, usize, usize) {
        match self {
            DeviceClass::Coarse => (
                COARSE_AREA_PER_PARTICLE,
                COARSE_MIN_PARTICLES,
                COARSE_MAX_PARTICLES,
            ),
            DeviceClass::ReducedMotion => (
                REDUCED_AREA_PER_PARTICLE,
                REDUCED_MIN_PARTICLES,
                REDUCED_MAX_PARTICLES,
            ),
            DeviceClass::Full => (
                FULL_AREA_PER_PARTICLE,
                FULL_MIN_PARTICLES,
                FULL_MAX_PARTICLES,
            ),
        }
    }
}

pub fn particle_count(width: f32, height: f32, class: DeviceClass) -> usize {
    let (per_particle, min, max) = class.density();
    let area = width.max(0.0) * height.max(0.0);
    let raw = (area / per_particle).round();
    if raw.is_finite() {
        (raw as usize).clamp(min, max)
    } else {
        min
    }
}

/// Maximum distance at which two particles get a connecting line.
pub fn link_distance(width: f32, height: f32) -> f32 {
    (width.min(height) * LINK_DISTANCE_FACTOR)
        .round()
        .clamp(LINK_DISTANCE_MIN, LINK_DISTANCE_MAX)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub drift: Vec2,
    pub radius: f32,
    pub opacity: f32,
    pub depth: f32,
    pub color: ColorIndex,
}

impl Particle {
    pub fn random(rng: &mut impl Rng, width: f32, height: f32) -> Self {
        let drift = Vec2::new(
            (rng.gen::<f32>() - 0.5) * DRIFT_SPAN,
            (rng.gen::<f32>() - 0.5) * DRIFT_SPAN,
        );
        Self {
            position: Vec2::new(rng.gen::<f32>() * width, rng.gen::<f32>() * height),
            velocity: drift,
            drift,
            radius: RADIUS_MIN + rng.gen::<f32>() * RADIUS_SPAN,
            opacity: OPACITY_MIN + rng.gen::<f32>() * OPACITY_SPAN,
            depth: DEPTH_MIN + rng.gen::<f32>() * DEPTH_SPAN,
            color: ColorIndex::from_roll(rng.gen::<f32>()),
        }
    }

    /// One physics tick: relax toward drift, apply pointer repulsion, clamp
    /// speed, integrate and wrap.
    pub fn step(&mut self, pointer: &PointerState, width: f32, height: f32) {
        self.velocity.x = lerp(self.velocity.x, self.drift.x, DRIFT_RELAX_LERP);
        self.velocity.y = lerp(self.velocity.y, self.drift.y, DRIFT_RELAX_LERP);

        if pointer.influence > INFLUENCE_MIN {
            let delta = self.position - pointer.position;
            let dist_sq = delta.length_squared();
            if dist_sq > 1.0 && dist_sq < REPULSE_RADIUS * REPULSE_RADIUS {
                let dist = dist_sq.sqrt();
                let strength = (1.0 - dist / REPULSE_RADIUS)
                    * REPULSE_FORCE
                    * pointer.influence
                    * (REPULSE_DEPTH_BIAS + self.depth);
                self.velocity += delta / dist * strength;
            }
        }

        self.velocity = self.velocity.clamp(Vec2::splat(-MAX_SPEED), Vec2::splat(MAX_SPEED));
        self.position.x = wrap_for_space(self.position.x + self.velocity.x, width, WRAP_MARGIN);
        self.position.y = wrap_for_space(self.position.y + self.velocity.y, height, WRAP_MARGIN);
    }
}

/// Render-space copy of a particle with its grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawPoint {
    pub position: Vec2,
    pub radius: f32,
    pub opacity: f32,
    pub color: ColorIndex,
    pub cell: (i32, i32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub from: Vec2,
    pub to: Vec2,
    pub width: f32,
    pub color: Rgba,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dot {
    pub center: Vec2,
    pub radius: f32,
    pub color: Rgba,
}

/// Line styling for a pair at `dist` with link threshold `max_dist`;
/// `None` when too faint to draw.
pub fn link_style(a: &DrawPoint, b: &DrawPoint, dist: f32, max_dist: f32) -> Option<(f32, Rgba)> {
    let strength = 1.0 - dist / max_dist;
    let alpha = strength * LINK_ALPHA_SCALE * ((a.opacity + b.opacity) * 0.5);
    if alpha < LINK_ALPHA_MIN {
        return None;
    }
    let accent_pair = a.color == ColorIndex::Accent || b.color == ColorIndex::Accent;
    let muted_pair = a.color == ColorIndex::Muted && b.color == ColorIndex::Muted;
    let line_alpha = if accent_pair {
        (alpha * 0.5).min(ACCENT_LINK_ALPHA_MAX)
    } else {
        alpha.min(LINK_ALPHA_MAX)
    };
    let color = if accent_pair {
        ACCENT.with_alpha(line_alpha)
    } else if muted_pair {
        SHADOW.with_alpha(line_alpha * MUTED_LINK_TINT)
    } else {
        MUTED.with_alpha(line_alpha)
    };
    Some((LINK_WIDTH_BASE + strength * LINK_WIDTH_SPAN, color))
}

pub struct ParticleField {
    particles: Vec<Particle>,
    points: Vec<DrawPoint>,
    grid: FnvHashMap<(i32, i32), SmallVec<[u32; 8]>>,
    viewport: Viewport,
    class: DeviceClass,
    link_distance: f32,
    rng: StdRng,
    pub pointer: PointerState,
    target_scroll: f32,
    smooth_scroll: f32,
}

impl ParticleField {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            points: Vec::new(),
            grid: FnvHashMap::default(),
            viewport: Viewport::new(0.0, 0.0),
            class: DeviceClass::Full,
            link_distance: LINK_DISTANCE_MIN,
            rng: StdRng::seed_from_u64(seed),
            pointer: PointerState::default(),
            target_scroll: 0.0,
            smooth_scroll: 0.0,
        }
    }

    /// Full repopulation for a new viewport; smoothed scroll snaps to target.
    pub fn populate(&mut self, viewport: Viewport, class: DeviceClass, scroll_progress: f32) {
        self.viewport = viewport;
        self.class = class;
        self.particles.clear();
        self.points.clear();
        self.target_scroll = scroll_progress;
        self.smooth_scroll = scroll_progress;
        if viewport.is_empty() {
            return;
        }
        self.link_distance = link_distance(viewport.width, viewport.height);
        let count = particle_count(viewport.width, viewport.height, class);
        let (w, h) = (viewport.width, viewport.height);
        let rng = &mut self.rng;
        self.particles
            .extend((0..count).map(|_| Particle::random(rng, w, h)));
        log::debug!(
            "[field] populated {} particles for {}x{} ({:?}), link distance {}",
            count,
            w,
            h,
            class,
            self.link_distance
        );
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn points(&self) -> &[DrawPoint] {
        &self.points
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn link_distance(&self) -> f32 {
        self.link_distance
    }

    pub fn smooth_scroll(&self) -> f32 {
        self.smooth_scroll
    }

    pub fn set_scroll_target(&mut self, progress: f32) {
        self.target_scroll = progress.clamp(0.0, 1.0);
    }

    /// Advance smoothing and integrate every particle once.
    pub fn step(&mut self) {
        self.smooth_scroll = lerp(self.smooth_scroll, self.target_scroll, SCROLL_LERP);
        self.pointer.advance();
        let (w, h) = (self.viewport.width, self.viewport.height);
        let pointer = self.pointer;
        for p in self.particles.iter_mut() {
            p.step(&pointer, w, h);
        }
    }

    /// Compute render positions; `parallax = false` draws particles where
    /// they are.
    pub fn layout(&mut self, parallax: bool) {
        let (w, h) = (self.viewport.width, self.viewport.height);
        let offset = if parallax {
            let centered = self.smooth_scroll * 2.0 - 1.0;
            Vec2::new(
                centered * SCROLL_AMPLITUDE_X,
                centered * SCROLL_AMPLITUDE_Y,
            ) + self.pointer.smoothed * MOUSE_AMPLITUDE
        } else {
            Vec2::ZERO
        };
        let cell = self.link_distance;
        self.points.clear();
        self.points.extend(self.particles.iter().map(|p| {
            let shifted = p.position + offset * p.depth;
            let position = Vec2::new(wrap_for_render(shifted.x, w), wrap_for_render(shifted.y, h));
            DrawPoint {
                position,
                radius: p.radius,
                opacity: p.opacity,
                color: p.color,
                cell: (
                    (position.x / cell).floor() as i32,
                    (position.y / cell).floor() as i32,
                ),
            }
        }));
    }

    /// Collect connection lines, examining only the 3x3 block of grid cells
    /// around each point.
    pub fn links(&mut self, out: &mut Vec<Link>) {
        for bucket in self.grid.values_mut() {
            bucket.clear();
        }
        for (i, p) in self.points.iter().enumerate() {
            self.grid.entry(p.cell).or_default().push(i as u32);
        }

        let max_dist = self.link_distance;
        let max_dist_sq = max_dist * max_dist;
        for (i, a) in self.points.iter().enumerate() {
            for ox in -1..=1 {
                for oy in -1..=1 {
                    let Some(nearby) = self.grid.get(&(a.cell.0 + ox, a.cell.1 + oy)) else {
                        continue;
                    };
                    for &j in nearby.iter() {
                        let j = j as usize;
                        if j <= i {
                            continue;
                        }
                        let b = &self.points[j];
                        let dist_sq = a.position.distance_squared(b.position);
                        if dist_sq > max_dist_sq {
                            continue;
                        }
                        if let Some((width, color)) = link_style(a, b, dist_sq.sqrt(), max_dist) {
                            out.push(Link {
                                from: a.position,
                                to: b.position,
                                width,
                                color,
                            });
                        }
                    }
                }
            }
        }
    }

    /// Filled circles, plus halos for accent and muted particles when `glow`.
    pub fn dots(&self, glow: bool, out: &mut Vec<Dot>) {
        let coarse = self.class == DeviceClass::Coarse;
        for p in &self.points {
            let base = if coarse { p.opacity * 0.8 } else { p.opacity * 0.9 };
            let fill = match p.color {
                ColorIndex::Accent => ACCENT.with_alpha((base * 0.92).min(0.84)),
                ColorIndex::Muted => MUTED.with_alpha((base * 0.88).min(0.72)),
                ColorIndex::Neutral => NEUTRAL.with_alpha(base),
            };
            out.push(Dot {
                center: p.position,
                radius: p.radius,
                color: fill,
            });
            if !glow {
                continue;
            }
            match p.color {
                ColorIndex::Accent => out.push(Dot {
                    center: p.position,
                    radius: p.radius * ACCENT_GLOW_SCALE,
                    color: ACCENT.with_alpha((base * 0.35).min(0.18)),
                }),
                ColorIndex::Muted => out.push(Dot {
                    center: p.position,
                    radius: p.radius * MUTED_GLOW_SCALE,
                    color: SHADOW.with_alpha((base * 0.16).min(0.1)),
                }),
                ColorIndex::Neutral => {}
            }
        }
    }
}
