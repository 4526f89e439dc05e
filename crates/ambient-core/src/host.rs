//! The seam between effect state machines and whatever drives them.
//!
//! A [`Host`] hands out animation frames and event subscriptions; it later
//! delivers the matching [`Signal`]s to the owning [`Effect`]. In the browser
//! this is requestAnimationFrame plus DOM listeners, in tests a mock that
//! counts calls.

use crate::capability::MediaQuery;
use crate::error::EffectError;
use crate::scroll::{ScrollMetrics, ScrollSignal};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// Subscription kinds an effect can ask its host for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostEvent {
    Resize,
    Scroll,
    ScrollProgress,
    PointerMove,
    PointerEnter,
    PointerLeave,
    PointerOver,
    PointerOut,
    Visibility,
    AnchorClick,
    /// Vertical wheel input; registered non-passive so it can be consumed.
    Wheel,
    MediaChange(MediaQuery),
}

/// Viewport size in CSS pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Device pixel ratio clamped into `[1, cap]`.
    #[inline]
    pub fn capped_dpr(&self, cap: f32) -> f32 {
        let dpr = if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        };
        dpr.min(cap)
    }
}

/// What the element under the pointer is, as far as the cursor cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverTarget {
    TextInput,
    Interactive,
    Other,
}

/// Payloads delivered by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    Frame { timestamp_ms: f64 },
    Resize { viewport: Viewport, scroll: ScrollMetrics },
    Scroll(ScrollMetrics),
    ScrollProgress(ScrollSignal),
    PointerMove { x: f32, y: f32 },
    PointerEnter,
    PointerLeave,
    PointerOver(HoverTarget),
    PointerOut(HoverTarget),
    Visibility(bool),
    AnchorClick { target_id: String },
    /// Wheel delta already converted to CSS pixels.
    Wheel { delta_y: f64 },
    MediaChange { query: MediaQuery, matches: bool },
}

/// Whether the host should suppress the browser default for a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    Ignored,
    Consumed,
}

pub trait Host {
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, id: FrameId);
    fn add_listener(&mut self, event: HostEvent) -> Result<ListenerId, EffectError>;
    fn remove_listener(&mut self, id: ListenerId);
}

/// A mounted visual module.
pub trait Effect {
    fn on_signal(&mut self, host: &mut dyn Host, signal: &Signal) -> Disposition;
    /// Cancel frames and drop listeners. Calling it twice is harmless.
    fn unmount(&mut self, host: &mut dyn Host);
}

/// Listeners installed by one module; released together.
#[derive(Debug, Default)]
pub struct Subscriptions {
    ids: SmallVec<[ListenerId; 8]>,
}

impl Subscriptions {
    /// Register every event or none of them.
    pub fn install(host: &mut dyn Host, events: &[HostEvent]) -> Result<Self, EffectError> {
        let mut subs = Self::default();
        subs.extend(host, events)?;
        Ok(subs)
    }

    /// Add more listeners; on failure only the ones added by this call are
    /// rolled back.
    pub fn extend(&mut self, host: &mut dyn Host, events: &[HostEvent]) -> Result<(), EffectError> {
        let mark = self.ids.len();
        for &event in events {
            match host.add_listener(event) {
                Ok(id) => self.ids.push(id),
                Err(e) => {
                    for id in self.ids.drain(mark..) {
                        host.remove_listener(id);
                    }
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    pub fn release(&mut self, host: &mut dyn Host) {
        for id in self.ids.drain(..) {
            host.remove_listener(id);
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// At most one outstanding frame request per module.
#[derive(Debug, Default)]
pub struct FrameSlot(Option<FrameId>);

impl FrameSlot {
    pub fn schedule(&mut self, host: &mut dyn Host) {
        if self.0.is_none() {
            self.0 = Some(host.request_frame());
        }
    }

    /// Mark the pending request as delivered.
    pub fn fired(&mut self) {
        self.0 = None;
    }

    pub fn cancel(&mut self, host: &mut dyn Host) {
        if let Some(id) = self.0.take() {
            host.cancel_frame(id);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }
}
