// Host-side tests for capability detection and mount planning.

mod common;

use ambient_core::*;
use common::*;

#[test]
fn desktop_probe_enables_everything() {
    let caps = Capabilities::detect(&FakeProbe::desktop());
    assert_eq!(caps, desktop_caps());
    let plan = MountPlan::resolve(&caps, &EffectsConfig::default());
    assert!(plan.particles && plan.scene && plan.cursor && plan.scroll);
    assert!(!caps.static_field());
}

#[test]
fn touch_devices_get_a_static_field_only() {
    let caps = Capabilities::detect(&FakeProbe::touch());
    assert!(caps.coarse_pointer);
    assert!(caps.static_field());
    assert!(!caps.scene_allowed());
    let plan = MountPlan::resolve(&caps, &EffectsConfig::default());
    assert!(plan.particles);
    assert!(!plan.scene);
    assert!(!plan.cursor);
}

#[test]
fn missing_media_queries_fail_safe() {
    let caps = Capabilities::detect(&FakeProbe::no_media());
    assert!(!caps.fine_pointer);
    assert!(caps.coarse_pointer);
    assert!(caps.reduced_motion);
    let plan = MountPlan::resolve(&caps, &EffectsConfig::default());
    assert!(!plan.scene);
    assert!(!plan.cursor);
}

#[test]
fn fail_safe_caps_turn_effects_off() {
    let caps = Capabilities::fail_safe();
    assert!(!caps.accelerated);
    assert!(!caps.scene_allowed());
    assert!(caps.static_field());
}

#[test]
fn scene_needs_acceleration() {
    let probe = FakeProbe {
        accelerated: false,
        ..FakeProbe::desktop()
    };
    let caps = Capabilities::detect(&probe);
    assert!(caps.fine_pointer);
    assert!(!caps.scene_allowed());
    let plan = MountPlan::resolve(&caps, &EffectsConfig::default());
    assert!(!plan.scene);
    assert!(plan.cursor);
}

#[test]
fn reduced_motion_keeps_cursor_but_not_scene() {
    let probe = FakeProbe {
        reduced: Some(true),
        ..FakeProbe::desktop()
    };
    let caps = Capabilities::detect(&probe);
    let plan = MountPlan::resolve(&caps, &EffectsConfig::default());
    assert!(plan.cursor);
    assert!(!plan.scene);
    assert!(caps.static_field());
}

#[test]
fn config_switches_override_capabilities() {
    let config = EffectsConfig {
        particles: false,
        scene: false,
        cursor: false,
        ..EffectsConfig::default()
    };
    let plan = MountPlan::resolve(&desktop_caps(), &config);
    assert!(!plan.particles && !plan.scene && !plan.cursor);
    assert!(plan.scroll, "progress is always broadcast");
}

#[test]
fn live_changes_update_caps() {
    let mut caps = desktop_caps();
    caps.apply(MediaQuery::CoarsePointer, true);
    assert!(caps.static_field());
    caps.apply(MediaQuery::CoarsePointer, false);
    caps.apply(MediaQuery::FinePointer, false);
    assert!(!caps.fine_pointer);
    assert!(caps.scene_allowed());
}

#[test]
fn query_strings_match_css_media_features() {
    assert_eq!(MediaQuery::FinePointer.as_str(), "(pointer: fine)");
    assert_eq!(MediaQuery::CoarsePointer.as_str(), "(pointer: coarse)");
    assert_eq!(
        MediaQuery::ReducedMotion.as_str(),
        "(prefers-reduced-motion: reduce)"
    );
}

#[test]
fn config_defaults() {
    let config = EffectsConfig::default();
    assert_eq!(config.scroll_event, "ambient:scroll");
    assert_eq!(config.header_offset_px, -80.0);
    assert!(config.seed.is_none());
}
