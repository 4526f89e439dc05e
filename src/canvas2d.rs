use crate::css;
use crate::dom;
use ambient_core::field::Surface2d;
use ambient_core::particles::{Dot, Link};
use ambient_core::{EffectError, Viewport};
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Particle field drawn through a 2D canvas context.
pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: web::HtmlCanvasElement) -> Result<Self, EffectError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<web::CanvasRenderingContext2d>().ok())
            .ok_or(EffectError::SurfaceUnavailable("2d context"))?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface2d for CanvasSurface {
    fn resize(&mut self, viewport: &Viewport, dpr: f32) {
        dom::sync_canvas_backing_size(&self.canvas, viewport, dpr);
        let dpr = dpr as f64;
        _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn stroke_line(&mut self, link: &Link) {
        self.ctx.set_stroke_style_str(&css::rgba(&link.color));
        self.ctx.set_line_width(link.width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(link.from.x as f64, link.from.y as f64);
        self.ctx.line_to(link.to.x as f64, link.to.y as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, dot: &Dot) {
        self.ctx.set_fill_style_str(&css::rgba(&dot.color));
        self.ctx.begin_path();
        _ = self.ctx.arc(
            dot.center.x as f64,
            dot.center.y as f64,
            dot.radius.max(0.0) as f64,
            0.0,
            TAU,
        );
        self.ctx.fill();
    }
}
