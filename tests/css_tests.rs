// Host-side tests for the injected style text and selectors.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod css {
    include!("../src/css.rs");
}

use ambient_core::particles::{Rgba, ACCENT};
use css::*;

#[test]
fn stylesheet_hides_native_cursor_on_fine_pointers_only() {
    let sheet = cursor_stylesheet("ambient-cursor");
    assert!(sheet.starts_with("@media (pointer: fine)"));
    assert!(sheet.contains("cursor: none !important"));
    assert!(sheet.contains("#ambient-cursor.cursor-hover"));
    assert!(sheet.contains("width: 56px"));
}

#[test]
fn editable_fields_keep_the_text_caret() {
    let sheet = cursor_stylesheet("x");
    assert!(sheet.contains(
        "input, textarea, select, [contenteditable=\"true\"] { cursor: text !important; }"
    ));
}

#[test]
fn layers_start_hidden_offscreen() {
    for style in [orb_style(9999), trail_style(9998)] {
        assert!(style.contains("opacity:0"));
        assert!(style.contains("pointer-events:none"));
        assert!(style.ends_with("transform:translate3d(-100px,-100px,0)"));
    }
    assert!(orb_style(9999).contains("z-index:9999"));
    assert!(trail_style(9998).contains("width:52px"));
}

#[test]
fn canvas_layers_never_take_pointer_events() {
    assert_eq!(
        fixed_layer_style(-2, 1.0),
        "position:fixed;inset:0;width:100vw;height:100vh;pointer-events:none;z-index:-2;opacity:1"
    );
    assert!(fixed_layer_style(-1, 0.56).ends_with("opacity:0.56"));
}

#[test]
fn translate_uses_two_decimals() {
    assert_eq!(translate(12.345, -7.0), "translate3d(12.35px, -7.00px, 0)");
}

#[test]
fn rgba_clamps_alpha() {
    assert_eq!(rgba(&Rgba { a: 0.5, ..ACCENT }), format!("rgba({}, {}, {}, 0.500)", ACCENT.r, ACCENT.g, ACCENT.b));
    assert!(rgba(&Rgba { r: 1, g: 2, b: 3, a: 4.0 }).ends_with("1.000)"));
    assert!(rgba(&Rgba { r: 1, g: 2, b: 3, a: -1.0 }).ends_with("0.000)"));
}

#[test]
fn anchor_targets() {
    assert_eq!(anchor_target("#work"), Some("work"));
    assert_eq!(anchor_target("#"), None);
    assert_eq!(anchor_target("/about"), None);
    assert_eq!(anchor_target("https://example.com/#x"), None);
}

#[test]
fn selectors_cover_the_expected_elements() {
    assert!(TEXT_INPUT_SELECTOR.contains("textarea"));
    assert!(!TEXT_INPUT_SELECTOR.starts_with("input,"));
    assert!(INTERACTIVE_SELECTOR.contains("button"));
    assert_eq!(ANCHOR_SELECTOR, "a[href^=\"#\"]");
}
