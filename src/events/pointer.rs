use crate::css::{INTERACTIVE_SELECTOR, TEXT_INPUT_SELECTOR};
use ambient_core::HoverTarget;
use wasm_bindgen::JsCast;
use web_sys as web;

fn matches_closest(el: &web::Element, selector: &str) -> bool {
    matches!(el.closest(selector), Ok(Some(_)))
}

/// Classify the element a pointerover/pointerout event fired on.
pub fn hover_target(ev: &web::Event) -> HoverTarget {
    let Some(el) = ev.target().and_then(|t| t.dyn_into::<web::Element>().ok()) else {
        return HoverTarget::Other;
    };
    if matches_closest(&el, TEXT_INPUT_SELECTOR) {
        HoverTarget::TextInput
    } else if matches_closest(&el, INTERACTIVE_SELECTOR) {
        HoverTarget::Interactive
    } else {
        HoverTarget::Other
    }
}
