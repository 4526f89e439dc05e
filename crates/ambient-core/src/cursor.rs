//! Custom cursor: a fast orb and a slow trail following the pointer.
//!
//! Only ever mounted on fine-pointer devices. If the fine pointer goes away
//! at runtime the global style override is removed and the loop parked until
//! it comes back.

use crate::capability::{Capabilities, MediaQuery};
use crate::error::EffectError;
use crate::host::{
    Disposition, Effect, FrameSlot, Host, HostEvent, HoverTarget, Signal, Subscriptions,
};
use glam::Vec2;

pub const ORB_LERP: f32 = 0.15;
pub const TRAIL_LERP: f32 = 0.08;
/// Where both layers sit before the first pointer move.
pub const OFFSCREEN: Vec2 = Vec2::new(-100.0, -100.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Orb,
    Trail,
}

/// DOM side of the cursor: the style sheet and the two layer nodes.
pub trait CursorSurface {
    /// Insert the cursor-hiding style sheet and the layer nodes.
    fn install(&mut self) -> Result<(), EffectError>;
    /// Remove everything `install` added. Safe to call when not installed.
    fn uninstall(&mut self);
    fn place(&mut self, layer: Layer, position: Vec2);
    fn set_visible(&mut self, layer: Layer, visible: bool);
    fn set_hover(&mut self, hovering: bool);
}

const CAPABILITY_EVENTS: [HostEvent; 2] = [
    HostEvent::MediaChange(MediaQuery::FinePointer),
    HostEvent::MediaChange(MediaQuery::ReducedMotion),
];

const POINTER_EVENTS: [HostEvent; 5] = [
    HostEvent::PointerMove,
    HostEvent::PointerEnter,
    HostEvent::PointerLeave,
    HostEvent::PointerOver,
    HostEvent::PointerOut,
];

pub struct CursorOverlay<S: CursorSurface> {
    surface: S,
    reduced_motion: bool,
    active: bool,
    target: Vec2,
    orb: Vec2,
    trail: Vec2,
    has_moved: bool,
    inside: bool,
    over_text: bool,
    hovering: bool,
    frame: FrameSlot,
    capability_subs: Subscriptions,
    pointer_subs: Subscriptions,
}

impl<S: CursorSurface> CursorOverlay<S> {
    /// `Ok(None)` without touching the host or the surface when there is no
    /// fine pointer.
    pub fn mount(
        host: &mut dyn Host,
        surface: S,
        caps: Capabilities,
    ) -> Result<Option<Self>, EffectError> {
        if !caps.fine_pointer {
            log::info!("[cursor] skipped (no fine pointer)");
            return Ok(None);
        }
        let capability_subs = Subscriptions::install(host, &CAPABILITY_EVENTS)?;
        let mut overlay = Self {
            surface,
            reduced_motion: caps.reduced_motion,
            active: false,
            target: OFFSCREEN,
            orb: OFFSCREEN,
            trail: OFFSCREEN,
            has_moved: false,
            inside: true,
            over_text: false,
            hovering: false,
            frame: FrameSlot::default(),
            capability_subs,
            pointer_subs: Subscriptions::default(),
        };
        if let Err(e) = overlay.activate(host) {
            overlay.capability_subs.release(host);
            return Err(e);
        }
        log::debug!("[cursor] mounted");
        Ok(Some(overlay))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn position(&self, layer: Layer) -> Vec2 {
        match layer {
            Layer::Orb => self.orb,
            Layer::Trail => self.trail,
        }
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn listener_count(&self) -> usize {
        self.capability_subs.len() + self.pointer_subs.len()
    }

    fn orb_lerp(&self) -> f32 {
        if self.reduced_motion {
            1.0
        } else {
            ORB_LERP
        }
    }

    fn activate(&mut self, host: &mut dyn Host) -> Result<(), EffectError> {
        self.pointer_subs.extend(host, &POINTER_EVENTS)?;
        if let Err(e) = self.surface.install() {
            self.surface.uninstall();
            self.pointer_subs.release(host);
            return Err(e);
        }
        self.active = true;
        self.place_layers();
        self.sync_visibility();
        self.frame.schedule(host);
        Ok(())
    }

    fn deactivate(&mut self, host: &mut dyn Host) {
        self.frame.cancel(host);
        self.pointer_subs.release(host);
        if self.active {
            self.surface.uninstall();
        }
        self.active = false;
        self.hovering = false;
    }

    fn place_layers(&mut self) {
        self.surface.place(Layer::Orb, self.orb);
        self.surface.place(Layer::Trail, self.trail);
    }

    fn sync_visibility(&mut self) {
        let visible = self.active && self.has_moved && self.inside && !self.over_text;
        self.surface.set_visible(Layer::Orb, visible);
        self.surface
            .set_visible(Layer::Trail, visible && !self.reduced_motion);
    }

    fn on_frame(&mut self, host: &mut dyn Host) {
        self.frame.fired();
        if !self.active {
            return;
        }
        self.orb = self.orb.lerp(self.target, self.orb_lerp());
        self.trail = self.trail.lerp(self.target, TRAIL_LERP);
        self.place_layers();
        self.frame.schedule(host);
    }

    fn on_hover(&mut self, target: HoverTarget, entering: bool) {
        match target {
            HoverTarget::TextInput => {
                self.over_text = entering;
                self.sync_visibility();
            }
            HoverTarget::Interactive => {
                if self.hovering != entering {
                    self.hovering = entering;
                    self.surface.set_hover(entering);
                }
            }
            HoverTarget::Other => {}
        }
    }
}

impl<S: CursorSurface> Effect for CursorOverlay<S> {
    fn on_signal(&mut self, host: &mut dyn Host, signal: &Signal) -> Disposition {
        match signal {
            Signal::Frame { .. } => self.on_frame(host),
            Signal::PointerMove { x, y } if self.active => {
                self.target = Vec2::new(*x, *y);
                if !self.has_moved {
                    self.has_moved = true;
                    self.sync_visibility();
                }
            }
            Signal::PointerEnter if self.active => {
                self.inside = true;
                self.sync_visibility();
            }
            Signal::PointerLeave if self.active => {
                self.inside = false;
                self.sync_visibility();
            }
            Signal::PointerOver(target) if self.active => self.on_hover(*target, true),
            Signal::PointerOut(target) if self.active => self.on_hover(*target, false),
            Signal::MediaChange {
                query: MediaQuery::FinePointer,
                matches,
            } => {
                if *matches && !self.active {
                    log::info!("[cursor] fine pointer available, resuming");
                    if let Err(e) = self.activate(host) {
                        log::warn!("[cursor] could not resume: {}", e);
                    }
                } else if !*matches && self.active {
                    log::info!("[cursor] fine pointer lost, uninstalling");
                    self.deactivate(host);
                }
            }
            Signal::MediaChange {
                query: MediaQuery::ReducedMotion,
                matches,
            } => {
                self.reduced_motion = *matches;
                if self.active {
                    self.sync_visibility();
                }
            }
            _ => {}
        }
        Disposition::Ignored
    }

    fn unmount(&mut self, host: &mut dyn Host) {
        self.deactivate(host);
        self.capability_subs.release(host);
    }
}
