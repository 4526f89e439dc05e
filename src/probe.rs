use crate::constants::GL_CONTEXT_NAMES;
use ambient_core::{CapabilityProbe, MediaQuery};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub struct WebProbe {
    window: web::Window,
    document: web::Document,
}

impl WebProbe {
    pub fn new(window: web::Window, document: web::Document) -> Self {
        Self { window, document }
    }
}

impl CapabilityProbe for WebProbe {
    fn matches(&self, query: MediaQuery) -> Option<bool> {
        match self.window.match_media(query.as_str()) {
            Ok(Some(list)) => Some(list.matches()),
            _ => None,
        }
    }

    /// Try each GL context on a throwaway canvas that never joins the page.
    fn accelerated_rendering(&self) -> bool {
        let Some(canvas) = self
            .document
            .create_element("canvas")
            .ok()
            .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
        else {
            return false;
        };
        let options = js_sys::Object::new();
        _ = js_sys::Reflect::set(
            &options,
            &JsValue::from_str("powerPreference"),
            &JsValue::from_str("high-performance"),
        );
        GL_CONTEXT_NAMES.iter().any(|name| {
            matches!(
                canvas.get_context_with_context_options(name, &options),
                Ok(Some(_))
            )
        })
    }
}
