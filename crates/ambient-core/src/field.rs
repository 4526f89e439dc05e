//! Particle field as a mounted effect: lifecycle, frame loop and static mode.

use crate::capability::{Capabilities, MediaQuery};
use crate::constants::FIELD_DPR_CAP;
use crate::error::EffectError;
use crate::host::{
    Disposition, Effect, FrameSlot, Host, HostEvent, Signal, Subscriptions, Viewport,
};
use crate::particles::{DeviceClass, Dot, Link, ParticleField};
use crate::scroll::ScrollMetrics;

/// 2D drawing target for the field.
pub trait Surface2d {
    /// Size the backing store for `viewport` at `dpr` and reset the transform
    /// so drawing happens in CSS pixels.
    fn resize(&mut self, viewport: &Viewport, dpr: f32);
    fn clear(&mut self, width: f32, height: f32);
    fn stroke_line(&mut self, link: &Link);
    fn fill_circle(&mut self, dot: &Dot);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldPhase {
    Uninitialized,
    Populated,
    Destroyed,
}

/// Always-on listeners. Native scroll stays on in static mode so a restart
/// populates from the live position. Pointer and progress tracking are added
/// only when animating.
const BASE_EVENTS: [HostEvent; 5] = [
    HostEvent::Resize,
    HostEvent::Scroll,
    HostEvent::Visibility,
    HostEvent::MediaChange(MediaQuery::CoarsePointer),
    HostEvent::MediaChange(MediaQuery::ReducedMotion),
];

const TRACKING_EVENTS: [HostEvent; 3] = [
    HostEvent::PointerMove,
    HostEvent::PointerLeave,
    HostEvent::ScrollProgress,
];

pub struct FieldEffect<S: Surface2d> {
    surface: S,
    field: ParticleField,
    caps: Capabilities,
    viewport: Viewport,
    scroll: ScrollMetrics,
    page_visible: bool,
    phase: FieldPhase,
    frame: FrameSlot,
    base_subs: Subscriptions,
    tracking_subs: Subscriptions,
    links: Vec<Link>,
    dots: Vec<Dot>,
}

impl<S: Surface2d> FieldEffect<S> {
    pub fn mount(
        host: &mut dyn Host,
        surface: S,
        caps: Capabilities,
        viewport: Viewport,
        scroll: ScrollMetrics,
        page_visible: bool,
        seed: u64,
    ) -> Result<Self, EffectError> {
        let base_subs = Subscriptions::install(host, &BASE_EVENTS)?;
        let mut effect = Self {
            surface,
            field: ParticleField::new(seed),
            caps,
            viewport,
            scroll,
            page_visible,
            phase: FieldPhase::Uninitialized,
            frame: FrameSlot::default(),
            base_subs,
            tracking_subs: Subscriptions::default(),
            links: Vec::new(),
            dots: Vec::new(),
        };
        if let Err(e) = effect.start(host) {
            effect.base_subs.release(host);
            return Err(e);
        }
        Ok(effect)
    }

    pub fn is_static(&self) -> bool {
        self.caps.static_field()
    }

    pub fn phase(&self) -> FieldPhase {
        self.phase
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn listener_count(&self) -> usize {
        self.base_subs.len() + self.tracking_subs.len()
    }

    /// Populate for the current mode and kick off drawing.
    fn start(&mut self, host: &mut dyn Host) -> Result<(), EffectError> {
        if !self.is_static() {
            self.tracking_subs.extend(host, &TRACKING_EVENTS)?;
        }
        self.repopulate();
        self.frame.schedule(host);
        log::debug!(
            "[field] started static={} particles={}",
            self.is_static(),
            self.field.particles().len()
        );
        Ok(())
    }

    fn repopulate(&mut self) {
        let dpr = self.viewport.capped_dpr(FIELD_DPR_CAP);
        self.surface.resize(&self.viewport, dpr);
        let class = DeviceClass::from_capabilities(&self.caps);
        self.field
            .populate(self.viewport, class, self.scroll.progress() as f32);
        self.phase = FieldPhase::Populated;
    }

    fn draw(&mut self, animated: bool) {
        if self.viewport.is_empty() {
            return;
        }
        self.field.layout(animated);
        self.surface.clear(self.viewport.width, self.viewport.height);

        self.links.clear();
        if animated {
            self.field.links(&mut self.links);
        }
        for link in &self.links {
            self.surface.stroke_line(link);
        }

        self.dots.clear();
        self.field.dots(animated, &mut self.dots);
        for dot in &self.dots {
            self.surface.fill_circle(dot);
        }
    }

    fn on_frame(&mut self, host: &mut dyn Host) {
        self.frame.fired();
        if self.is_static() {
            // one frame per request, nothing rescheduled
            self.draw(false);
            return;
        }
        if self.page_visible {
            self.field.step();
            self.draw(true);
        }
        self.frame.schedule(host);
    }

    /// Capability flip: tear down tracking and rebuild from scratch.
    fn reconfigure(&mut self, host: &mut dyn Host) {
        self.frame.cancel(host);
        self.tracking_subs.release(host);
        if let Err(e) = self.start(host) {
            log::warn!("[field] could not restart after capability change: {}", e);
            self.teardown(host);
        }
    }

    fn teardown(&mut self, host: &mut dyn Host) {
        self.frame.cancel(host);
        self.tracking_subs.release(host);
        self.base_subs.release(host);
        self.phase = FieldPhase::Destroyed;
    }
}

impl<S: Surface2d> Effect for FieldEffect<S> {
    fn on_signal(&mut self, host: &mut dyn Host, signal: &Signal) -> Disposition {
        if self.phase == FieldPhase::Destroyed {
            return Disposition::Ignored;
        }
        match signal {
            Signal::Frame { .. } => self.on_frame(host),
            Signal::Resize { viewport, scroll } => {
                self.viewport = *viewport;
                self.scroll = *scroll;
                self.repopulate();
                if self.is_static() {
                    self.frame.schedule(host);
                }
            }
            Signal::Scroll(metrics) => {
                self.scroll = *metrics;
                self.field.set_scroll_target(metrics.progress() as f32);
            }
            Signal::ScrollProgress(signal) => {
                self.scroll = ScrollMetrics::new(signal.scroll_offset, signal.scroll_limit);
                self.field.set_scroll_target(signal.progress as f32);
            }
            Signal::PointerMove { x, y } => {
                let viewport = self.viewport;
                self.field.pointer.moved(*x, *y, &viewport);
            }
            Signal::PointerLeave => self.field.pointer.left(),
            Signal::Visibility(visible) => self.page_visible = *visible,
            Signal::MediaChange { query, matches } => {
                let was_static = self.is_static();
                let old_class = DeviceClass::from_capabilities(&self.caps);
                self.caps.apply(*query, *matches);
                if was_static != self.is_static()
                    || old_class != DeviceClass::from_capabilities(&self.caps)
                {
                    self.reconfigure(host);
                }
            }
            _ => {}
        }
        Disposition::Ignored
    }

    fn unmount(&mut self, host: &mut dyn Host) {
        if self.phase != FieldPhase::Destroyed {
            log::debug!("[field] unmounted");
        }
        self.teardown(host);
    }
}
