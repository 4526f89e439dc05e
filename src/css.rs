// Style text and selectors for the injected DOM nodes. Pure string building,
// no web-sys, so it is exercised by host-side tests.

use ambient_core::particles::Rgba;

pub const TEXT_INPUT_SELECTOR: &str = "input:not([type=\"submit\"]):not([type=\"button\"]):not([type=\"reset\"]):not([type=\"checkbox\"]):not([type=\"radio\"]):not([type=\"range\"]), textarea, [contenteditable=\"true\"]";

pub const INTERACTIVE_SELECTOR: &str = "a, button, [role=\"button\"], [data-cursor=\"link\"], input[type=\"submit\"], input[type=\"button\"], input[type=\"reset\"], summary";

/// In-page anchors the scroll broadcaster may take over.
pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

pub const CURSOR_HOVER_CLASS: &str = "cursor-hover";

pub const ORB_SIZE_PX: f32 = 32.0;
pub const ORB_HOVER_SIZE_PX: f32 = 56.0;
pub const TRAIL_SIZE_PX: f32 = 52.0;

/// Global sheet hiding the native cursor on fine pointers, while keeping the
/// text caret over editable fields.
pub fn cursor_stylesheet(orb_id: &str) -> String {
    format!(
        "@media (pointer: fine) {{\n\
         \x20 *, *::before, *::after {{ cursor: none !important; }}\n\
         \x20 input, textarea, select, [contenteditable=\"true\"] {{ cursor: text !important; }}\n\
         \x20 input[type=\"submit\"], input[type=\"button\"], input[type=\"reset\"] {{ cursor: none !important; }}\n\
         }}\n\
         #{orb_id}.{hover} {{ width: {size}px; height: {size}px; margin-left: -{half}px; margin-top: -{half}px; }}\n",
        orb_id = orb_id,
        hover = CURSOR_HOVER_CLASS,
        size = ORB_HOVER_SIZE_PX,
        half = ORB_HOVER_SIZE_PX / 2.0,
    )
}

pub fn orb_style(z_index: i32) -> String {
    format!(
        "position:fixed;top:0;left:0;width:{s}px;height:{s}px;margin-left:-{h}px;margin-top:-{h}px;\
         pointer-events:none;z-index:{z};opacity:0;will-change:transform;border-radius:50%;\
         transition:width .3s cubic-bezier(.23,1,.32,1),height .3s cubic-bezier(.23,1,.32,1),margin .3s cubic-bezier(.23,1,.32,1),opacity .25s ease;\
         background:radial-gradient(circle at 35% 35%,rgba(198,255,0,.18),rgba(198,255,0,.06) 50%,rgba(255,255,255,.03) 80%,transparent);\
         border:1px solid rgba(198,255,0,.15);box-shadow:0 0 20px rgba(198,255,0,.08),inset 0 0 12px rgba(255,255,255,.04);\
         transform:translate3d(-100px,-100px,0)",
        s = ORB_SIZE_PX,
        h = ORB_SIZE_PX / 2.0,
        z = z_index,
    )
}

pub fn trail_style(z_index: i32) -> String {
    format!(
        "position:fixed;top:0;left:0;width:{s}px;height:{s}px;margin-left:-{h}px;margin-top:-{h}px;\
         pointer-events:none;z-index:{z};opacity:0;will-change:transform;border-radius:50%;\
         transition:opacity .4s ease;filter:blur(1px);\
         background:radial-gradient(circle at 40% 40%,rgba(198,255,0,.06),rgba(198,255,0,.02) 60%,transparent);\
         border:1px solid rgba(198,255,0,.05);transform:translate3d(-100px,-100px,0)",
        s = TRAIL_SIZE_PX,
        h = TRAIL_SIZE_PX / 2.0,
        z = z_index,
    )
}

/// Inline style for a full-viewport canvas layer.
pub fn fixed_layer_style(z_index: i32, opacity: f32) -> String {
    format!(
        "position:fixed;inset:0;width:100vw;height:100vh;pointer-events:none;z-index:{};opacity:{}",
        z_index, opacity
    )
}

#[inline]
pub fn translate(x: f32, y: f32) -> String {
    format!("translate3d({:.2}px, {:.2}px, 0)", x, y)
}

pub fn rgba(color: &Rgba) -> String {
    format!(
        "rgba({}, {}, {}, {:.3})",
        color.r,
        color.g,
        color.b,
        color.a.clamp(0.0, 1.0)
    )
}

/// Target id of an in-page link, `None` for a bare `#` or a non-fragment href.
pub fn anchor_target(href: &str) -> Option<&str> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
