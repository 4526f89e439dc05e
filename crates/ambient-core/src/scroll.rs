//! Scroll progress signal and the broadcaster that publishes it.

use crate::capability::MediaQuery;
use crate::constants::{SCROLL_ANIMATION_SEC, USER_SCROLL_TOLERANCE_PX, WHEEL_LINE_HEIGHT_PX};
use crate::error::EffectError;
use crate::host::{Disposition, Effect, FrameSlot, Host, HostEvent, Signal, Subscriptions};
use serde::{Deserialize, Serialize};

/// Raw scroll position of the page.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub offset: f64,
    /// Scrollable distance, `scrollHeight - innerHeight`. May be below 1 on
    /// short pages; [`ScrollMetrics::progress`] guards the division.
    pub limit: f64,
}

impl ScrollMetrics {
    pub fn new(offset: f64, limit: f64) -> Self {
        Self { offset, limit }
    }

    #[inline]
    pub fn clamped_limit(&self) -> f64 {
        if self.limit.is_finite() {
            self.limit.max(1.0)
        } else {
            1.0
        }
    }

    /// Normalized progress in `[0, 1]`.
    #[inline]
    pub fn progress(&self) -> f64 {
        let p = self.offset / self.clamped_limit();
        if p.is_nan() {
            0.0
        } else {
            p.clamp(0.0, 1.0)
        }
    }
}

/// Broadcast payload; field names match the DOM event detail.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollSignal {
    pub scroll_offset: f64,
    pub scroll_limit: f64,
    pub progress: f64,
}

impl ScrollSignal {
    pub fn from_metrics(metrics: ScrollMetrics) -> Self {
        Self {
            scroll_offset: metrics.offset,
            scroll_limit: metrics.clamped_limit(),
            progress: metrics.progress(),
        }
    }
}

/// Ease-out used for programmatic scrolls: `min(1, 1.001 - 2^(-10t))`.
#[inline]
pub fn ease_out_expo(t: f64) -> f64 {
    (1.001 - 2f64.powf(-10.0 * t)).min(1.0)
}

/// Units of a DOM `WheelEvent.deltaMode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelUnit {
    Pixel,
    Line,
    Page,
}

impl WheelUnit {
    pub fn from_delta_mode(mode: u32) -> Self {
        match mode {
            1 => Self::Line,
            2 => Self::Page,
            _ => Self::Pixel,
        }
    }
}

/// Wheel delta in CSS pixels; a page is one viewport height.
pub fn wheel_delta_px(delta: f64, unit: WheelUnit, viewport_height: f64) -> f64 {
    let px = match unit {
        WheelUnit::Pixel => delta,
        WheelUnit::Line => delta * WHEEL_LINE_HEIGHT_PX,
        WheelUnit::Page => delta * viewport_height,
    };
    if px.is_finite() {
        px
    } else {
        0.0
    }
}

/// Page access the broadcaster needs.
pub trait ScrollPort {
    fn metrics(&self) -> ScrollMetrics;
    fn set_offset(&mut self, offset: f64);
    /// Document-space top of the element with this id.
    fn element_offset(&self, id: &str) -> Option<f64>;
    /// Emit the namespaced progress event for native listeners.
    fn publish(&mut self, signal: &ScrollSignal);
}

/// Minimal scroll interface the rest of the page talks to.
pub trait ProgressSource {
    fn on_progress(&mut self, callback: Box<dyn FnMut(&ScrollSignal)>) -> ProgressToken;
    fn off_progress(&mut self, token: ProgressToken);
    /// Scroll so the element with `id` sits at `offset_px` from the top.
    /// Returns `false` when no such element exists.
    fn scroll_to_element(&mut self, host: &mut dyn Host, id: &str, offset_px: f64) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressToken(u32);

#[derive(Clone, Copy, Debug, PartialEq)]
struct ScrollAnimation {
    from: f64,
    to: f64,
    started_ms: Option<f64>,
}

impl ScrollAnimation {
    /// Offset at `now_ms` and whether the animation has finished.
    fn sample(&mut self, now_ms: f64) -> (f64, bool) {
        let start = *self.started_ms.get_or_insert(now_ms);
        let t = ((now_ms - start) / (SCROLL_ANIMATION_SEC * 1000.0)).clamp(0.0, 1.0);
        let eased = ease_out_expo(t);
        let offset = self.from + (self.to - self.from) * eased;
        if t >= 1.0 {
            (self.to, true)
        } else {
            (offset, false)
        }
    }
}

const BROADCASTER_EVENTS: [HostEvent; 5] = [
    HostEvent::Scroll,
    HostEvent::Resize,
    HostEvent::AnchorClick,
    HostEvent::Wheel,
    HostEvent::MediaChange(MediaQuery::ReducedMotion),
];

/// Converts scroll position to progress and pushes it to every consumer.
pub struct ScrollBroadcaster<P: ScrollPort> {
    port: P,
    smoothing: bool,
    reduced_motion: bool,
    header_offset_px: f64,
    animation: Option<ScrollAnimation>,
    /// Last offset written through the port while animating.
    expected_offset: f64,
    callbacks: Vec<(ProgressToken, Box<dyn FnMut(&ScrollSignal)>)>,
    next_token: u32,
    latest: ScrollSignal,
    frame: FrameSlot,
    subs: Subscriptions,
}

impl<P: ScrollPort> ScrollBroadcaster<P> {
    pub fn mount(
        host: &mut dyn Host,
        port: P,
        smoothing: bool,
        reduced_motion: bool,
        header_offset_px: f64,
    ) -> Result<Self, EffectError> {
        let subs = Subscriptions::install(host, &BROADCASTER_EVENTS)?;
        let latest = ScrollSignal::from_metrics(port.metrics());
        log::debug!(
            "[scroll] mounted smoothing={} reduced={} progress={:.3}",
            smoothing,
            reduced_motion,
            latest.progress
        );
        Ok(Self {
            port,
            smoothing,
            reduced_motion,
            header_offset_px,
            animation: None,
            expected_offset: latest.scroll_offset,
            callbacks: Vec::new(),
            next_token: 0,
            latest,
            frame: FrameSlot::default(),
            subs,
        })
    }

    pub fn latest(&self) -> ScrollSignal {
        self.latest
    }

    /// Wheel input and programmatic scrolls animate unless smoothing is off
    /// or the user prefers reduced motion.
    pub fn is_smooth(&self) -> bool {
        self.smoothing && !self.reduced_motion
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    fn broadcast(&mut self, metrics: ScrollMetrics) {
        let signal = ScrollSignal::from_metrics(metrics);
        self.latest = signal;
        self.port.publish(&signal);
        for (_, cb) in self.callbacks.iter_mut() {
            cb(&signal);
        }
    }

    fn animate(&mut self, host: &mut dyn Host, from: f64, to: f64) {
        self.animation = Some(ScrollAnimation {
            from,
            to,
            started_ms: None,
        });
        self.expected_offset = from;
        self.frame.schedule(host);
    }

    fn step_animation(&mut self, host: &mut dyn Host, now_ms: f64) {
        let Some(anim) = self.animation.as_mut() else {
            return;
        };
        let (offset, done) = anim.sample(now_ms);
        self.port.set_offset(offset);
        self.expected_offset = offset;
        let limit = self.port.metrics().limit;
        self.broadcast(ScrollMetrics::new(offset, limit));
        if done {
            self.animation = None;
        } else {
            self.frame.schedule(host);
        }
    }

    /// Native scroll report. One that disagrees with the animated offset
    /// came from the user (scrollbar, keyboard, touch) and takes over.
    fn native_scroll(&mut self, host: &mut dyn Host, metrics: ScrollMetrics) {
        if self.animation.is_some()
            && (metrics.offset - self.expected_offset).abs() > USER_SCROLL_TOLERANCE_PX
        {
            self.animation = None;
            self.frame.cancel(host);
            log::debug!("[scroll] user scroll interrupted animation at {:.0}", metrics.offset);
        }
        self.broadcast(metrics);
    }

    /// Smoothed wheel: accumulate onto the running target and ease there.
    fn wheel(&mut self, host: &mut dyn Host, delta_y: f64) -> Disposition {
        if !self.is_smooth() || delta_y == 0.0 || !delta_y.is_finite() {
            return Disposition::Ignored;
        }
        let metrics = self.port.metrics();
        let base = self.animation.map_or(metrics.offset, |anim| anim.to);
        let to = (base + delta_y).clamp(0.0, metrics.clamped_limit());
        if self.animation.is_some() || (to - metrics.offset).abs() > f64::EPSILON {
            self.animate(host, metrics.offset, to);
        }
        Disposition::Consumed
    }
}

impl<P: ScrollPort> ProgressSource for ScrollBroadcaster<P> {
    fn on_progress(&mut self, callback: Box<dyn FnMut(&ScrollSignal)>) -> ProgressToken {
        let token = ProgressToken(self.next_token);
        self.next_token += 1;
        self.callbacks.push((token, callback));
        token
    }

    fn off_progress(&mut self, token: ProgressToken) {
        self.callbacks.retain(|(t, _)| *t != token);
    }

    fn scroll_to_element(&mut self, host: &mut dyn Host, id: &str, offset_px: f64) -> bool {
        let Some(top) = self.port.element_offset(id) else {
            return false;
        };
        let metrics = self.port.metrics();
        let to = (top + offset_px).clamp(0.0, metrics.clamped_limit());
        if self.is_smooth() {
            self.animate(host, metrics.offset, to);
        } else {
            self.animation = None;
            self.frame.cancel(host);
            self.port.set_offset(to);
            self.broadcast(ScrollMetrics::new(to, metrics.limit));
        }
        true
    }
}

impl<P: ScrollPort> Effect for ScrollBroadcaster<P> {
    fn on_signal(&mut self, host: &mut dyn Host, signal: &Signal) -> Disposition {
        match signal {
            Signal::Frame { timestamp_ms } => {
                self.frame.fired();
                self.step_animation(host, *timestamp_ms);
            }
            Signal::Scroll(metrics) => self.native_scroll(host, *metrics),
            Signal::Resize { scroll, .. } => self.broadcast(*scroll),
            Signal::AnchorClick { target_id } => {
                let offset = self.header_offset_px;
                if self.scroll_to_element(host, target_id, offset) {
                    return Disposition::Consumed;
                }
            }
            Signal::Wheel { delta_y } => return self.wheel(host, *delta_y),
            Signal::MediaChange {
                query: MediaQuery::ReducedMotion,
                matches,
            } => {
                self.reduced_motion = *matches;
                if !self.is_smooth() {
                    // land any running animation immediately
                    if let Some(anim) = self.animation.take() {
                        self.frame.cancel(host);
                        self.port.set_offset(anim.to);
                        let limit = self.port.metrics().limit;
                        self.broadcast(ScrollMetrics::new(anim.to, limit));
                    }
                }
            }
            _ => {}
        }
        Disposition::Ignored
    }

    fn unmount(&mut self, host: &mut dyn Host) {
        self.frame.cancel(host);
        self.subs.release(host);
        self.animation = None;
        self.callbacks.clear();
    }
}
