use crate::constants::{
    CURSOR_ORB_ID, CURSOR_STYLE_ID, CURSOR_TRAIL_ID, CURSOR_TRAIL_Z_INDEX, CURSOR_Z_INDEX,
};
use crate::css;
use crate::dom;
use ambient_core::cursor::{CursorSurface, Layer};
use ambient_core::EffectError;
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Cursor layers as two fixed divs plus a `<style>` in the head.
pub struct DomCursor {
    document: web::Document,
    orb: Option<web::HtmlElement>,
    trail: Option<web::HtmlElement>,
}

impl DomCursor {
    pub fn new(document: web::Document) -> Self {
        Self {
            document,
            orb: None,
            trail: None,
        }
    }

    fn layer(&self, layer: Layer) -> Option<&web::HtmlElement> {
        match layer {
            Layer::Orb => self.orb.as_ref(),
            Layer::Trail => self.trail.as_ref(),
        }
    }

    fn create_layer(&self, id: &str, style: &str) -> Result<web::HtmlElement, EffectError> {
        let body = self
            .document
            .body()
            .ok_or(EffectError::SurfaceUnavailable("document body"))?;
        let el: web::HtmlElement = self
            .document
            .create_element("div")
            .ok()
            .and_then(|el| el.dyn_into().ok())
            .ok_or(EffectError::SurfaceUnavailable("cursor layer"))?;
        el.set_id(id);
        _ = el.set_attribute("aria-hidden", "true");
        _ = el.set_attribute("style", style);
        body.append_child(&el)
            .map_err(|_| EffectError::SurfaceUnavailable("cursor layer"))?;
        Ok(el)
    }

    fn install_style(&self) -> Result<(), EffectError> {
        if self.document.get_element_by_id(CURSOR_STYLE_ID).is_some() {
            return Ok(());
        }
        let head = self
            .document
            .head()
            .ok_or(EffectError::SurfaceUnavailable("document head"))?;
        let style = self
            .document
            .create_element("style")
            .map_err(|_| EffectError::SurfaceUnavailable("style element"))?;
        style.set_id(CURSOR_STYLE_ID);
        style.set_text_content(Some(&css::cursor_stylesheet(CURSOR_ORB_ID)));
        head.append_child(&style)
            .map_err(|_| EffectError::SurfaceUnavailable("style element"))?;
        Ok(())
    }
}

impl CursorSurface for DomCursor {
    fn install(&mut self) -> Result<(), EffectError> {
        self.install_style()?;
        if self.orb.is_none() {
            self.orb = Some(self.create_layer(CURSOR_ORB_ID, &css::orb_style(CURSOR_Z_INDEX))?);
        }
        if self.trail.is_none() {
            self.trail = Some(
                self.create_layer(CURSOR_TRAIL_ID, &css::trail_style(CURSOR_TRAIL_Z_INDEX))?,
            );
        }
        Ok(())
    }

    fn uninstall(&mut self) {
        dom::remove_element_by_id(&self.document, CURSOR_STYLE_ID);
        for el in [self.orb.take(), self.trail.take()].into_iter().flatten() {
            el.remove();
        }
    }

    fn place(&mut self, layer: Layer, position: Vec2) {
        if let Some(el) = self.layer(layer) {
            _ = el
                .style()
                .set_property("transform", &css::translate(position.x, position.y));
        }
    }

    fn set_visible(&mut self, layer: Layer, visible: bool) {
        if let Some(el) = self.layer(layer) {
            _ = el
                .style()
                .set_property("opacity", if visible { "1" } else { "0" });
        }
    }

    fn set_hover(&mut self, hovering: bool) {
        if let Some(el) = &self.orb {
            let cl = el.class_list();
            if hovering {
                _ = cl.add_1(css::CURSOR_HOVER_CLASS);
            } else {
                _ = cl.remove_1(css::CURSOR_HOVER_CLASS);
            }
        }
    }
}

impl Drop for DomCursor {
    fn drop(&mut self) {
        self.uninstall();
    }
}
