// Shared mocks for the host-side tests: a counting Host plus recording
// surfaces for every effect.

#![allow(dead_code)]

use ambient_core::cursor::{CursorSurface, Layer};
use ambient_core::field::Surface2d;
use ambient_core::particles::{Dot, Link};
use ambient_core::scene::{SceneFrame, SceneSurface};
use ambient_core::scroll::ScrollPort;
use ambient_core::*;
use glam::Vec2;
use std::collections::HashMap;

#[derive(Default)]
pub struct MockHost {
    next_frame: u32,
    next_listener: u32,
    pending: Option<FrameId>,
    pub frame_requests: usize,
    pub frame_cancels: usize,
    pub active: Vec<(ListenerId, HostEvent)>,
    pub registrations: usize,
    pub removals: usize,
    /// Fail the registration attempt with this zero-based index.
    pub fail_on: Option<usize>,
    attempts: usize,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(attempt: usize) -> Self {
        Self {
            fail_on: Some(attempt),
            ..Self::default()
        }
    }

    pub fn listener_count(&self) -> usize {
        self.active.len()
    }

    pub fn listening(&self, event: HostEvent) -> bool {
        self.active.iter().any(|(_, e)| *e == event)
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    /// Deliver the pending frame, if any, at `timestamp_ms`.
    pub fn run_frame(&mut self, effect: &mut dyn Effect, timestamp_ms: f64) -> bool {
        if self.pending.take().is_none() {
            return false;
        }
        effect.on_signal(self, &Signal::Frame { timestamp_ms });
        true
    }

    /// Run frames at a fixed interval until none is pending or `max` ran.
    pub fn run_frames(&mut self, effect: &mut dyn Effect, start_ms: f64, step_ms: f64, max: usize) -> usize {
        let mut ran = 0;
        while ran < max && self.run_frame(effect, start_ms + step_ms * ran as f64) {
            ran += 1;
        }
        ran
    }

    pub fn send(&mut self, effect: &mut dyn Effect, signal: Signal) -> Disposition {
        effect.on_signal(self, &signal)
    }
}

impl Host for MockHost {
    fn request_frame(&mut self) -> FrameId {
        self.frame_requests += 1;
        let id = FrameId(self.next_frame);
        self.next_frame += 1;
        self.pending = Some(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.frame_cancels += 1;
        if self.pending == Some(id) {
            self.pending = None;
        }
    }

    fn add_listener(&mut self, event: HostEvent) -> Result<ListenerId, EffectError> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_on == Some(attempt) {
            return Err(EffectError::ListenerRegistration {
                event,
                reason: "mock failure".into(),
            });
        }
        self.registrations += 1;
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.active.push((id, event));
        Ok(id)
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.removals += 1;
        self.active.retain(|(l, _)| *l != id);
    }
}

#[derive(Default)]
pub struct RecordingCanvas {
    pub resizes: Vec<(Viewport, f32)>,
    pub clears: usize,
    pub lines: Vec<Link>,
    pub circles: Vec<Dot>,
}

impl RecordingCanvas {
    pub fn reset(&mut self) {
        self.clears = 0;
        self.lines.clear();
        self.circles.clear();
    }
}

impl Surface2d for RecordingCanvas {
    fn resize(&mut self, viewport: &Viewport, dpr: f32) {
        self.resizes.push((*viewport, dpr));
    }

    fn clear(&mut self, _width: f32, _height: f32) {
        self.clears += 1;
    }

    fn stroke_line(&mut self, link: &Link) {
        self.lines.push(*link);
    }

    fn fill_circle(&mut self, dot: &Dot) {
        self.circles.push(*dot);
    }
}

#[derive(Default)]
pub struct RecordingCursor {
    pub installed: bool,
    pub installs: usize,
    pub uninstalls: usize,
    pub fail_install: bool,
    pub positions: HashMap<Layer, Vec2>,
    pub visible: HashMap<Layer, bool>,
    pub hover: bool,
}

impl RecordingCursor {
    pub fn is_visible(&self, layer: Layer) -> bool {
        self.visible.get(&layer).copied().unwrap_or(false)
    }
}

impl CursorSurface for RecordingCursor {
    fn install(&mut self) -> Result<(), EffectError> {
        if self.fail_install {
            return Err(EffectError::SurfaceUnavailable("mock"));
        }
        self.installs += 1;
        self.installed = true;
        Ok(())
    }

    fn uninstall(&mut self) {
        self.uninstalls += 1;
        self.installed = false;
    }

    fn place(&mut self, layer: Layer, position: Vec2) {
        self.positions.insert(layer, position);
    }

    fn set_visible(&mut self, layer: Layer, visible: bool) {
        self.visible.insert(layer, visible);
    }

    fn set_hover(&mut self, hovering: bool) {
        self.hover = hovering;
    }
}

#[derive(Default)]
pub struct RecordingScene {
    pub resizes: Vec<(Viewport, f32)>,
    pub visible: bool,
    pub renders: usize,
    pub last_instances: usize,
    pub fail_renders: bool,
}

impl SceneSurface for RecordingScene {
    fn resize(&mut self, viewport: &Viewport, dpr: f32) {
        self.resizes.push((*viewport, dpr));
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn render(&mut self, frame: &SceneFrame) -> Result<(), EffectError> {
        if self.fail_renders {
            return Err(EffectError::Render("mock".into()));
        }
        self.renders += 1;
        self.last_instances = frame.instances.len();
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeScrollPort {
    pub offset: f64,
    pub limit: f64,
    pub elements: HashMap<String, f64>,
    pub published: Vec<ScrollSignal>,
    pub offsets_set: Vec<f64>,
}

impl FakeScrollPort {
    pub fn new(offset: f64, limit: f64) -> Self {
        Self {
            offset,
            limit,
            ..Self::default()
        }
    }

    pub fn with_element(mut self, id: &str, top: f64) -> Self {
        self.elements.insert(id.to_string(), top);
        self
    }
}

impl ScrollPort for FakeScrollPort {
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(self.offset, self.limit)
    }

    fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
        self.offsets_set.push(offset);
    }

    fn element_offset(&self, id: &str) -> Option<f64> {
        self.elements.get(id).copied()
    }

    fn publish(&mut self, signal: &ScrollSignal) {
        self.published.push(*signal);
    }
}

/// Probe answering from fixed values; `None` simulates a missing
/// media-query mechanism.
pub struct FakeProbe {
    pub fine: Option<bool>,
    pub coarse: Option<bool>,
    pub reduced: Option<bool>,
    pub accelerated: bool,
}

impl FakeProbe {
    pub fn desktop() -> Self {
        Self {
            fine: Some(true),
            coarse: Some(false),
            reduced: Some(false),
            accelerated: true,
        }
    }

    pub fn touch() -> Self {
        Self {
            fine: Some(false),
            coarse: Some(true),
            reduced: Some(false),
            accelerated: true,
        }
    }

    pub fn no_media() -> Self {
        Self {
            fine: None,
            coarse: None,
            reduced: None,
            accelerated: true,
        }
    }
}

impl CapabilityProbe for FakeProbe {
    fn matches(&self, query: MediaQuery) -> Option<bool> {
        match query {
            MediaQuery::FinePointer => self.fine,
            MediaQuery::CoarsePointer => self.coarse,
            MediaQuery::ReducedMotion => self.reduced,
        }
    }

    fn accelerated_rendering(&self) -> bool {
        self.accelerated
    }
}

pub fn desktop_caps() -> Capabilities {
    Capabilities {
        fine_pointer: true,
        coarse_pointer: false,
        reduced_motion: false,
        accelerated: true,
    }
}

pub fn viewport(width: f32, height: f32) -> Viewport {
    Viewport::new(width, height)
}
