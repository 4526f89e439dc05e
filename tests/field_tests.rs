// Host-side tests for the particle field lifecycle against a mock host.

mod common;

use ambient_core::field::{FieldEffect, FieldPhase};
use ambient_core::*;
use common::*;

fn reduced_caps() -> Capabilities {
    Capabilities {
        reduced_motion: true,
        ..desktop_caps()
    }
}

fn touch_caps() -> Capabilities {
    Capabilities {
        fine_pointer: false,
        coarse_pointer: true,
        reduced_motion: false,
        accelerated: true,
    }
}

fn mount(host: &mut MockHost, caps: Capabilities) -> FieldEffect<RecordingCanvas> {
    FieldEffect::mount(
        host,
        RecordingCanvas::default(),
        caps,
        viewport(1280.0, 800.0),
        ScrollMetrics::new(0.0, 2000.0),
        true,
        42,
    )
    .expect("mount")
}

#[test]
fn animated_mount_subscribes_and_loops() {
    let mut host = MockHost::new();
    let mut field = mount(&mut host, desktop_caps());
    assert!(!field.is_static());
    assert_eq!(field.phase(), FieldPhase::Populated);
    assert_eq!(host.listener_count(), 8);
    assert!(host.listening(HostEvent::PointerMove));
    assert!(host.listening(HostEvent::ScrollProgress));

    assert!(host.run_frame(&mut field, 16.0));
    assert!(host.has_pending_frame(), "animated mode reschedules");
    assert_eq!(field.surface().clears, 1);
    assert!(!field.surface().lines.is_empty());
    assert!(field.surface().circles.len() >= field.field().particles().len());
}

#[test]
fn static_mode_draws_one_frame_per_resize() {
    let mut host = MockHost::new();
    let mut field = FieldEffect::mount(
        &mut host,
        RecordingCanvas::default(),
        reduced_caps(),
        viewport(1280.0, 800.0),
        ScrollMetrics::new(2000.0, 2000.0),
        true,
        42,
    )
    .expect("mount");
    assert!(field.is_static());
    assert_eq!(host.listener_count(), 5);
    assert!(!host.listening(HostEvent::PointerMove));
    assert_eq!(host.frame_requests, 1);

    host.send(&mut field, Signal::PointerMove { x: 1200.0, y: 700.0 });
    assert!(host.run_frame(&mut field, 16.0));
    assert!(!host.has_pending_frame(), "static frame must not reschedule");
    let drawn = field.field().particles().len();
    assert!(field.surface().lines.is_empty());
    assert_eq!(field.surface().circles.len(), drawn, "no glow halos");

    // bottom of the page with the pointer in a corner, yet no parallax shift
    let points = field.field().points();
    assert_eq!(points.len(), drawn);
    for (point, particle) in points.iter().zip(field.field().particles()) {
        assert_eq!(point.position, particle.position);
    }

    for i in 0..3 {
        host.send(
            &mut field,
            Signal::Resize {
                viewport: viewport(1024.0 + i as f32, 768.0),
                scroll: ScrollMetrics::new(0.0, 2000.0),
            },
        );
        assert_eq!(host.frame_requests, 2 + i);
        assert!(host.run_frame(&mut field, 32.0 + i as f64));
        assert!(!host.has_pending_frame());
    }
    assert!(field.surface().lines.is_empty());
}

#[test]
fn coarse_pointer_is_static_with_few_particles() {
    let mut host = MockHost::new();
    let field = mount(&mut host, touch_caps());
    assert!(field.is_static());
    assert!(field.field().particles().len() <= 40);
}

#[test]
fn hidden_page_skips_work_but_keeps_loop() {
    let mut host = MockHost::new();
    let mut field = mount(&mut host, desktop_caps());
    host.send(&mut field, Signal::Visibility(false));
    let before = field.field().particles().to_vec();
    assert!(host.run_frame(&mut field, 16.0));
    assert_eq!(field.surface().clears, 0);
    assert_eq!(field.field().particles(), &before[..]);
    assert!(host.has_pending_frame());

    host.send(&mut field, Signal::Visibility(true));
    assert!(host.run_frame(&mut field, 32.0));
    assert_eq!(field.surface().clears, 1);
}

#[test]
fn resize_repopulates_for_the_new_viewport() {
    let mut host = MockHost::new();
    let mut field = mount(&mut host, desktop_caps());
    host.send(
        &mut field,
        Signal::Resize {
            viewport: viewport(3840.0, 2160.0),
            scroll: ScrollMetrics::new(0.0, 2000.0),
        },
    );
    assert_eq!(field.field().particles().len(), 220);
    assert_eq!(field.field().viewport().width, 3840.0);
}

#[test]
fn dpr_is_capped() {
    let mut host = MockHost::new();
    let mut vp = viewport(800.0, 600.0);
    vp.device_pixel_ratio = 3.0;
    let field = FieldEffect::mount(
        &mut host,
        RecordingCanvas::default(),
        desktop_caps(),
        vp,
        ScrollMetrics::default(),
        true,
        1,
    )
    .expect("mount");
    assert_eq!(field.surface().resizes.last().map(|r| r.1), Some(1.25));
}

#[test]
fn unmount_releases_everything() {
    let mut host = MockHost::new();
    let mut field = mount(&mut host, desktop_caps());
    field.unmount(&mut host);
    assert_eq!(host.listener_count(), 0);
    assert!(!host.has_pending_frame());
    assert_eq!(field.phase(), FieldPhase::Destroyed);

    let requests = host.frame_requests;
    host.send(
        &mut field,
        Signal::Resize {
            viewport: viewport(640.0, 480.0),
            scroll: ScrollMetrics::default(),
        },
    );
    assert_eq!(host.frame_requests, requests);

    // second unmount is harmless
    field.unmount(&mut host);
    assert_eq!(host.listener_count(), 0);
}

#[test]
fn reduced_motion_flip_restarts_in_static_mode() {
    let mut host = MockHost::new();
    let mut field = mount(&mut host, desktop_caps());
    host.send(
        &mut field,
        Signal::MediaChange {
            query: MediaQuery::ReducedMotion,
            matches: true,
        },
    );
    assert!(field.is_static());
    assert_eq!(host.listener_count(), 5);
    assert!(host.listening(HostEvent::Scroll));
    assert!(!host.listening(HostEvent::PointerMove));
    assert_eq!(field.field().particles().len(), 45);
    assert!(host.run_frame(&mut field, 16.0));
    assert!(!host.has_pending_frame());

    host.send(
        &mut field,
        Signal::MediaChange {
            query: MediaQuery::ReducedMotion,
            matches: false,
        },
    );
    assert!(!field.is_static());
    assert_eq!(host.listener_count(), 8);
    assert_eq!(field.field().particles().len(), 90);
    assert!(host.has_pending_frame());
}

#[test]
fn static_field_tracks_scroll_for_the_next_restart() {
    let mut host = MockHost::new();
    let mut field = mount(&mut host, reduced_caps());
    assert!(host.listening(HostEvent::Scroll));
    assert!(!host.listening(HostEvent::ScrollProgress));

    host.send(&mut field, Signal::Scroll(ScrollMetrics::new(2000.0, 2000.0)));
    host.send(
        &mut field,
        Signal::MediaChange {
            query: MediaQuery::ReducedMotion,
            matches: false,
        },
    );
    assert!(!field.is_static());
    assert_eq!(field.field().smooth_scroll(), 1.0);

    host.run_frames(&mut field, 0.0, 16.0, 60);
    assert_eq!(field.field().smooth_scroll(), 1.0);
}

#[test]
fn broadcast_progress_updates_the_restart_position() {
    let mut host = MockHost::new();
    let mut field = mount(&mut host, desktop_caps());
    host.send(
        &mut field,
        Signal::ScrollProgress(ScrollSignal {
            scroll_offset: 500.0,
            scroll_limit: 2000.0,
            progress: 0.25,
        }),
    );
    host.send(
        &mut field,
        Signal::MediaChange {
            query: MediaQuery::ReducedMotion,
            matches: true,
        },
    );
    assert_eq!(field.field().smooth_scroll(), 0.25);
}

#[test]
fn failed_registration_leaves_no_listeners() {
    for attempt in 0..8 {
        let mut host = MockHost::failing_on(attempt);
        let result = FieldEffect::mount(
            &mut host,
            RecordingCanvas::default(),
            desktop_caps(),
            viewport(1280.0, 800.0),
            ScrollMetrics::default(),
            true,
            1,
        );
        assert!(result.is_err(), "attempt {}", attempt);
        assert_eq!(host.listener_count(), 0, "attempt {}", attempt);
    }
}

#[test]
fn pointer_move_sets_full_influence() {
    let mut host = MockHost::new();
    let mut field = mount(&mut host, desktop_caps());
    host.send(&mut field, Signal::PointerMove { x: 640.0, y: 400.0 });
    assert_eq!(field.field().pointer.influence, 1.0);
    host.send(&mut field, Signal::PointerLeave);
    assert_eq!(field.field().pointer.influence, 0.0);
}
