//! Scroll-driven parallax scene: a glass sculpture and a small ship that
//! travels a closed path as the page scrolls.

use crate::capability::{Capabilities, MediaQuery};
use crate::constants::*;
use crate::error::EffectError;
use crate::host::{
    Disposition, Effect, FrameSlot, Host, HostEvent, Signal, Subscriptions, Viewport,
};
use crate::math::damp;
use crate::mesh::MeshKind;
use crate::state::Camera;
use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

/// A value easing toward its target at a fixed rate, independent of frame
/// rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Damped {
    pub current: f32,
    pub target: f32,
    pub rate: f32,
}

impl Damped {
    pub fn new(value: f32, rate: f32) -> Self {
        Self {
            current: value,
            target: value,
            rate,
        }
    }

    pub fn step(&mut self, dt: f32) -> f32 {
        self.current = damp(self.current, self.target, self.rate, dt);
        self.current
    }

    pub fn approach(&mut self, target: f32, dt: f32) -> f32 {
        self.target = target;
        self.step(dt)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shading {
    /// Lit translucent material with an environment/fresnel term.
    Glass { env_intensity: f32 },
    /// Flat color; `back_side` draws inner faces only.
    Unlit { back_side: bool },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshInstance {
    pub mesh: MeshKind,
    pub model: Mat4,
    pub color: [f32; 4],
    pub shading: Shading,
}

#[derive(Clone, Debug)]
pub struct SceneFrame {
    pub camera: Camera,
    pub elapsed: f32,
    pub instances: Vec<MeshInstance>,
}

fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        alpha,
    ]
}

fn euler(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_quat(Quat::from_euler(EulerRot::XYZ, x, y, z))
}

// Glass alpha before the fresnel term; the shader adds the rim.
const GLASS_ALPHA: f32 = 0.32;

/// Object A: core sphere with two free-spinning rings and a soft rim.
#[derive(Clone, Debug)]
pub struct Sculpture {
    pub progress: Damped,
    pub rotation_y: Damped,
    pub rotation_x: Damped,
    pub position_x: Damped,
    pub position_y: Damped,
    pub ring_primary_spin: f32,
    pub ring_secondary_spin: f32,
    pub core_env_intensity: f32,
    pub rim_opacity: f32,
}

impl Default for Sculpture {
    fn default() -> Self {
        Self {
            progress: Damped::new(0.0, SCULPTURE_PROGRESS_RATE),
            rotation_y: Damped::new(0.0, SCULPTURE_ROT_Y_RATE),
            rotation_x: Damped::new(0.0, SCULPTURE_ROT_X_RATE),
            position_x: Damped::new(SCULPTURE_REST[0], SCULPTURE_POS_RATE),
            position_y: Damped::new(SCULPTURE_REST[1], SCULPTURE_POS_RATE),
            ring_primary_spin: 0.0,
            ring_secondary_spin: 0.0,
            core_env_intensity: 0.52,
            rim_opacity: 0.065,
        }
    }
}

impl Sculpture {
    pub fn update(&mut self, target_progress: f32, elapsed: f32, dt: f32) {
        let progress = self.progress.approach(target_progress, dt);
        let centered = progress * 2.0 - 1.0;
        let breathing = (elapsed * BREATHING_FREQ).sin() * BREATHING_AMPLITUDE;

        self.rotation_y.approach(centered * 0.5 + breathing * 0.24, dt);
        self.rotation_x
            .approach(SCULPTURE_TILT_X + centered * 0.14, dt);
        self.position_x
            .approach(SCULPTURE_REST[0] + centered * 0.16, dt);
        self.position_y
            .approach(SCULPTURE_REST[1] - centered * 0.16 + breathing * 0.2, dt);

        self.ring_primary_spin += dt * RING_PRIMARY_SPIN;
        self.ring_secondary_spin += dt * RING_SECONDARY_SPIN;

        self.core_env_intensity = 0.52 + (elapsed * 0.31).sin() * 0.04;
        self.rim_opacity = 0.065 + (elapsed * 0.34).sin() * 0.006;
    }

    pub fn group_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(
            self.position_x.current,
            self.position_y.current,
            0.0,
        )) * euler(self.rotation_x.current, self.rotation_y.current, 0.0)
    }

    pub fn instances(&self, out: &mut Vec<MeshInstance>) {
        let group = self.group_matrix();
        out.push(MeshInstance {
            mesh: MeshKind::Core,
            model: group,
            color: hex(0xdbe3ff, GLASS_ALPHA),
            shading: Shading::Glass {
                env_intensity: self.core_env_intensity,
            },
        });
        out.push(MeshInstance {
            mesh: MeshKind::PrimaryRing,
            model: group * euler(1.08, 0.14, 0.34 + self.ring_primary_spin),
            color: hex(0x8b9dff, GLASS_ALPHA),
            shading: Shading::Glass { env_intensity: 0.48 },
        });
        out.push(MeshInstance {
            mesh: MeshKind::SecondaryRing,
            model: group * euler(0.52, 1.08, 0.62 + self.ring_secondary_spin),
            color: hex(0xf1b3dc, GLASS_ALPHA),
            shading: Shading::Glass { env_intensity: 0.42 },
        });
        out.push(MeshInstance {
            mesh: MeshKind::RimRing,
            model: group * euler(1.08, 0.14, 0.34) * Mat4::from_scale(Vec3::splat(1.015)),
            color: hex(0xff8bd5, self.rim_opacity),
            shading: Shading::Unlit { back_side: true },
        });
    }
}

/// Point on the ship's closed path at `phase` (radians of scroll progress).
pub fn ship_path(phase: f32, time: f32) -> Vec3 {
    Vec3::new(
        phase.sin() * 2.35,
        (phase * 1.4).cos() * 0.78 + (phase * 0.45 + time * 0.25).sin() * 0.18,
        -0.62 + (phase * 2.1 + 0.4).sin() * 0.28,
    )
}

/// Rotation turning local +Z toward `target`.
fn look_rotation(from: Vec3, target: Vec3) -> Option<Quat> {
    let forward = (target - from).try_normalize()?;
    let right = Vec3::Y.cross(forward).try_normalize()?;
    let up = forward.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, forward)))
}

/// Object B: follows [`ship_path`], facing its direction of travel and
/// banking into vertical turns.
#[derive(Clone, Debug)]
pub struct Ship {
    pub progress: Damped,
    pub position: [Damped; 3],
    pub bank: Damped,
    pub pitch: Damped,
    pub orientation: Quat,
    pub phase: f32,
    pub glow_opacity: f32,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            progress: Damped::new(0.0, SHIP_PROGRESS_RATE),
            position: [Damped::new(0.0, SHIP_POSITION_RATE); 3],
            bank: Damped::new(0.0, SHIP_BANK_RATE),
            pitch: Damped::new(0.0, SHIP_PITCH_RATE),
            orientation: Quat::IDENTITY,
            phase: 0.0,
            glow_opacity: 0.1,
        }
    }
}

impl Ship {
    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.position[0].current,
            self.position[1].current,
            self.position[2].current,
        )
    }

    pub fn update(&mut self, target_progress: f32, elapsed: f32, dt: f32) {
        let progress = self.progress.approach(target_progress, dt);
        self.phase = progress * TAU;
        let now = ship_path(self.phase, elapsed);
        let ahead = ship_path(self.phase + SHIP_LOOK_AHEAD, elapsed);

        for (axis, target) in self.position.iter_mut().zip(now.to_array()) {
            axis.approach(target, dt);
        }

        if let Some(look) = look_rotation(self.position(), ahead) {
            self.orientation = look * Quat::from_rotation_y(FRAC_PI_2);
        }

        let tangent = (ahead - now).normalize_or_zero();
        let bank = (-tangent.y * SHIP_BANK_GAIN).clamp(-SHIP_BANK_LIMIT, SHIP_BANK_LIMIT);
        self.bank.approach(bank, dt);
        self.pitch.approach((elapsed * 1.1).sin() * 0.04, dt);

        self.glow_opacity = 0.1 + (elapsed * 2.6 + self.phase).sin() * 0.03;
    }

    pub fn instances(&self, out: &mut Vec<MeshInstance>) {
        let ship = Mat4::from_scale_rotation_translation(
            Vec3::splat(SHIP_SCALE),
            self.orientation,
            self.position(),
        );
        let body = ship * euler(self.pitch.current, 0.0, self.bank.current);
        let at = |x: f32, y: f32, z: f32| Mat4::from_translation(Vec3::new(x, y, z));

        out.push(MeshInstance {
            mesh: MeshKind::ShipHull,
            model: body * at(0.0, 0.01, 0.0) * Mat4::from_scale(Vec3::new(1.0, 0.28, 1.0)),
            color: hex(0x79dfc9, GLASS_ALPHA),
            shading: Shading::Glass { env_intensity: 0.45 },
        });
        out.push(MeshInstance {
            mesh: MeshKind::ShipKeel,
            model: body * at(0.0, -0.12, 0.0) * Mat4::from_scale(Vec3::new(0.76, 0.32, 0.76)),
            color: hex(0x6dcfba, GLASS_ALPHA),
            shading: Shading::Glass { env_intensity: 0.4 },
        });
        out.push(MeshInstance {
            mesh: MeshKind::ShipDome,
            model: body * at(0.0, 0.2, 0.0),
            color: hex(0xffd59f, GLASS_ALPHA),
            shading: Shading::Glass { env_intensity: 0.42 },
        });
        out.push(MeshInstance {
            mesh: MeshKind::ShipGlowRing,
            model: body * at(0.0, -0.06, 0.0) * Mat4::from_rotation_x(FRAC_PI_2),
            color: hex(0x8df0d5, self.glow_opacity),
            shading: Shading::Unlit { back_side: false },
        });
        out.push(MeshInstance {
            mesh: MeshKind::ShipBeam,
            model: body * at(0.0, -0.25, 0.0),
            color: hex(0xffd9a6, 0.045),
            shading: Shading::Unlit { back_side: true },
        });
    }
}

/// Everything the scene animates; independent of any rendering surface.
#[derive(Clone, Debug, Default)]
pub struct SceneState {
    pub sculpture: Sculpture,
    pub ship: Ship,
    pub target_progress: f32,
    pub elapsed: f32,
}

impl SceneState {
    pub fn set_target(&mut self, progress: f64) {
        self.target_progress = progress.clamp(0.0, 1.0) as f32;
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        self.sculpture
            .update(self.target_progress, self.elapsed, dt);
        self.ship.update(self.target_progress, self.elapsed, dt);
    }

    pub fn build_frame(&self, aspect: f32, out: &mut SceneFrame) {
        out.camera = Camera::scene(aspect);
        out.elapsed = self.elapsed;
        out.instances.clear();
        self.sculpture.instances(&mut out.instances);
        self.ship.instances(&mut out.instances);
    }
}

/// Accelerated 3D drawing target.
pub trait SceneSurface {
    fn resize(&mut self, viewport: &Viewport, dpr: f32);
    fn set_visible(&mut self, visible: bool);
    fn render(&mut self, frame: &SceneFrame) -> Result<(), EffectError>;
}

const SCENE_EVENTS: [HostEvent; 5] = [
    HostEvent::Scroll,
    HostEvent::ScrollProgress,
    HostEvent::Resize,
    HostEvent::MediaChange(MediaQuery::ReducedMotion),
    HostEvent::MediaChange(MediaQuery::CoarsePointer),
];

// Consecutive render failures before the loop gives up.
const MAX_RENDER_FAILURES: u32 = 3;

pub struct SceneEffect<S: SceneSurface> {
    surface: S,
    state: SceneState,
    caps: Capabilities,
    viewport: Viewport,
    last_frame_ms: Option<f64>,
    render_failures: u32,
    scene_frame: SceneFrame,
    frame: FrameSlot,
    subs: Subscriptions,
}

impl<S: SceneSurface> SceneEffect<S> {
    /// `Ok(None)` when the device should not run the scene at all; nothing is
    /// registered in that case.
    pub fn mount(
        host: &mut dyn Host,
        mut surface: S,
        caps: Capabilities,
        viewport: Viewport,
        scroll_progress: f64,
    ) -> Result<Option<Self>, EffectError> {
        if !caps.scene_allowed() {
            log::info!("[scene] skipped (capability)");
            return Ok(None);
        }
        let subs = Subscriptions::install(host, &SCENE_EVENTS)?;
        surface.resize(&viewport, viewport.capped_dpr(SCENE_DPR_CAP));
        surface.set_visible(true);
        let mut state = SceneState::default();
        state.set_target(scroll_progress);
        let mut effect = Self {
            surface,
            state,
            caps,
            viewport,
            last_frame_ms: None,
            render_failures: 0,
            scene_frame: SceneFrame {
                camera: Camera::scene(1.0),
                elapsed: 0.0,
                instances: Vec::with_capacity(MeshKind::ALL.len()),
            },
            frame: FrameSlot::default(),
            subs,
        };
        effect.frame.schedule(host);
        log::debug!("[scene] mounted");
        Ok(Some(effect))
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_running(&self) -> bool {
        self.frame.is_pending()
    }

    fn aspect(&self) -> f32 {
        self.viewport.width / self.viewport.height.max(1.0)
    }

    fn on_frame(&mut self, host: &mut dyn Host, timestamp_ms: f64) {
        self.frame.fired();
        let dt = match self.last_frame_ms {
            Some(last) => (((timestamp_ms - last) / 1000.0) as f32).clamp(0.0, SCENE_MAX_DT_SEC),
            None => 0.0,
        };
        self.last_frame_ms = Some(timestamp_ms);
        self.state.advance(dt);
        let aspect = self.aspect();
        self.state.build_frame(aspect, &mut self.scene_frame);
        match self.surface.render(&self.scene_frame) {
            Ok(()) => self.render_failures = 0,
            Err(e) => {
                self.render_failures += 1;
                log::warn!("[scene] render failed ({}): {}", self.render_failures, e);
                if self.render_failures >= MAX_RENDER_FAILURES {
                    log::error!("[scene] giving up after repeated render failures");
                    self.surface.set_visible(false);
                    return;
                }
            }
        }
        self.frame.schedule(host);
    }

    fn set_allowed(&mut self, host: &mut dyn Host, allowed: bool) {
        if allowed {
            self.surface.set_visible(true);
            self.last_frame_ms = None;
            self.render_failures = 0;
            self.frame.schedule(host);
        } else {
            self.frame.cancel(host);
            self.surface.set_visible(false);
        }
    }
}

impl<S: SceneSurface> Effect for SceneEffect<S> {
    fn on_signal(&mut self, host: &mut dyn Host, signal: &Signal) -> Disposition {
        match signal {
            Signal::Frame { timestamp_ms } => self.on_frame(host, *timestamp_ms),
            Signal::Scroll(metrics) => self.state.set_target(metrics.progress()),
            Signal::ScrollProgress(signal) => self.state.set_target(signal.progress),
            Signal::Resize { viewport, scroll } => {
                self.viewport = *viewport;
                self.surface
                    .resize(viewport, viewport.capped_dpr(SCENE_DPR_CAP));
                self.state.set_target(scroll.progress());
            }
            Signal::MediaChange { query, matches } => {
                let was_allowed = self.caps.scene_allowed();
                self.caps.apply(*query, *matches);
                let allowed = self.caps.scene_allowed();
                if was_allowed != allowed {
                    log::info!("[scene] capability change, running={}", allowed);
                    self.set_allowed(host, allowed);
                }
            }
            _ => {}
        }
        Disposition::Ignored
    }

    fn unmount(&mut self, host: &mut dyn Host) {
        self.frame.cancel(host);
        self.subs.release(host);
        self.surface.set_visible(false);
    }
}
