use crate::css::{anchor_target, ANCHOR_SELECTOR};
use crate::dom;
use ambient_core::scroll::{wheel_delta_px, ScrollPort, WheelUnit};
use ambient_core::{ScrollMetrics, ScrollSignal, Signal};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Window-backed scroll access for the broadcaster.
pub struct WebScrollPort {
    window: web::Window,
    document: web::Document,
    event_name: String,
}

impl WebScrollPort {
    pub fn new(window: web::Window, document: web::Document, event_name: String) -> Self {
        Self {
            window,
            document,
            event_name,
        }
    }
}

impl ScrollPort for WebScrollPort {
    fn metrics(&self) -> ScrollMetrics {
        dom::scroll_metrics(&self.window, &self.document)
    }

    fn set_offset(&mut self, offset: f64) {
        let options = web::ScrollToOptions::new();
        options.set_top(offset);
        options.set_behavior(web::ScrollBehavior::Instant);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn element_offset(&self, id: &str) -> Option<f64> {
        let el = self.document.get_element_by_id(id)?;
        let top = el.get_bounding_client_rect().top();
        Some(top + self.window.scroll_y().unwrap_or(0.0))
    }

    fn publish(&mut self, signal: &ScrollSignal) {
        #[allow(deprecated)]
        let detail = match JsValue::from_serde(signal) {
            Ok(detail) => detail,
            Err(e) => {
                log::warn!("[scroll] could not encode progress: {}", e);
                return;
            }
        };
        let init = web::CustomEventInit::new();
        init.set_detail(&detail);
        match web::CustomEvent::new_with_event_init_dict(&self.event_name, &init) {
            Ok(ev) => {
                _ = self.window.dispatch_event(&ev);
            }
            Err(e) => log::warn!("[scroll] could not create event: {:?}", e),
        }
    }
}

/// Decode the broadcaster's custom event back into a signal.
pub fn progress_signal(ev: &web::Event) -> Option<Signal> {
    let ev = ev.dyn_ref::<web::CustomEvent>()?;
    #[allow(deprecated)]
    let signal: ScrollSignal = ev.detail().into_serde().ok()?;
    Some(Signal::ScrollProgress(signal))
}

/// Plain primary-button clicks on `#id` links.
pub fn anchor_click(ev: &web::Event) -> Option<Signal> {
    let mouse = ev.dyn_ref::<web::MouseEvent>()?;
    let modified = mouse.ctrl_key() || mouse.meta_key() || mouse.shift_key() || mouse.alt_key();
    if mouse.button() != 0 || modified {
        return None;
    }
    let el = ev.target()?.dyn_into::<web::Element>().ok()?;
    let link = el.closest(ANCHOR_SELECTOR).ok()??;
    let href = link.get_attribute("href")?;
    let target_id = anchor_target(&href)?;
    Some(Signal::AnchorClick {
        target_id: target_id.to_string(),
    })
}

/// Vertical wheel input in CSS pixels. Ctrl+wheel is pinch zoom and stays
/// with the browser.
pub fn wheel_signal(ev: &web::Event, viewport_height: f64) -> Option<Signal> {
    let wheel = ev.dyn_ref::<web::WheelEvent>()?;
    if wheel.ctrl_key() {
        return None;
    }
    let unit = WheelUnit::from_delta_mode(wheel.delta_mode());
    Some(Signal::Wheel {
        delta_y: wheel_delta_px(wheel.delta_y(), unit, viewport_height),
    })
}
