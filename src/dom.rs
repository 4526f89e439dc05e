use ambient_core::{ScrollMetrics, Viewport};
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<(web::Window, web::Document)> {
    let window = web::window()?;
    let document = window.document()?;
    Some((window, document))
}

pub fn viewport(window: &web::Window) -> Viewport {
    let read = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    Viewport {
        width: read(window.inner_width()),
        height: read(window.inner_height()),
        device_pixel_ratio: window.device_pixel_ratio() as f32,
    }
}

pub fn scroll_metrics(window: &web::Window, document: &web::Document) -> ScrollMetrics {
    let offset = window.scroll_y().unwrap_or(0.0);
    let inner = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let scroll_height = document
        .document_element()
        .map(|el| el.scroll_height() as f64)
        .unwrap_or(0.0);
    ScrollMetrics::new(offset, scroll_height - inner)
}

pub fn page_visible(document: &web::Document) -> bool {
    document.visibility_state() == web::VisibilityState::Visible
}

/// Append a full-viewport, pointer-transparent canvas behind page content.
pub fn create_fixed_canvas(
    document: &web::Document,
    id: &str,
    z_index: i32,
    opacity: f32,
) -> anyhow::Result<web::HtmlCanvasElement> {
    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("no body"))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    canvas.set_id(id);
    _ = canvas.set_attribute("aria-hidden", "true");
    _ = canvas.set_attribute("style", &crate::css::fixed_layer_style(z_index, opacity));
    body.append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(canvas)
}

pub fn remove_element_by_id(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.remove();
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, viewport: &Viewport, dpr: f32) {
    let w_px = (viewport.width * dpr).floor() as u32;
    let h_px = (viewport.height * dpr).floor() as u32;
    canvas.set_width(w_px.max(1));
    canvas.set_height(h_px.max(1));
}
