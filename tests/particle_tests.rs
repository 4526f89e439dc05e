// Host-side tests for particle population, physics and link search.

use ambient_core::constants::{LINK_DISTANCE_MAX, LINK_DISTANCE_MIN, MAX_SPEED, WRAP_MARGIN};
use ambient_core::particles::*;
use ambient_core::pointer::PointerState;
use ambient_core::Viewport;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn populated(width: f32, height: f32, class: DeviceClass, seed: u64) -> ParticleField {
    let mut field = ParticleField::new(seed);
    field.populate(Viewport::new(width, height), class, 0.0);
    field
}

#[test]
fn laptop_viewport_uses_the_full_minimum() {
    // 1280x800 / 18000 rounds to 57, below the floor of 90
    assert_eq!(particle_count(1280.0, 800.0, DeviceClass::Full), 90);
}

#[test]
fn counts_stay_within_class_bounds() {
    for &(w, h) in &[(0.0, 0.0), (320.0, 480.0), (1920.0, 1080.0), (7680.0, 4320.0)] {
        let full = particle_count(w, h, DeviceClass::Full);
        assert!((90..=220).contains(&full), "full {} at {}x{}", full, w, h);
        let reduced = particle_count(w, h, DeviceClass::ReducedMotion);
        assert!((45..=100).contains(&reduced), "reduced {} at {}x{}", reduced, w, h);
        let coarse = particle_count(w, h, DeviceClass::Coarse);
        assert!((25..=40).contains(&coarse), "coarse {} at {}x{}", coarse, w, h);
    }
    assert_eq!(particle_count(7680.0, 4320.0, DeviceClass::Full), 220);
}

#[test]
fn link_distance_is_clamped() {
    assert_eq!(link_distance(320.0, 480.0), LINK_DISTANCE_MIN);
    assert_eq!(link_distance(3840.0, 2160.0), LINK_DISTANCE_MAX);
    // 800 * 0.17 = 136
    assert_eq!(link_distance(1280.0, 800.0), 136.0);
}

#[test]
fn coarse_pointer_takes_precedence_over_reduced_motion() {
    let caps = ambient_core::Capabilities {
        fine_pointer: false,
        coarse_pointer: true,
        reduced_motion: true,
        accelerated: false,
    };
    assert_eq!(DeviceClass::from_capabilities(&caps), DeviceClass::Coarse);
}

#[test]
fn spawned_particles_respect_ranges() {
    let field = populated(1280.0, 800.0, DeviceClass::Full, 7);
    assert_eq!(field.particles().len(), 90);
    for p in field.particles() {
        assert!(p.position.x >= 0.0 && p.position.x <= 1280.0);
        assert!(p.position.y >= 0.0 && p.position.y <= 800.0);
        assert!(p.radius >= 1.25 && p.radius <= 2.8);
        assert!(p.opacity >= 0.45 && p.opacity <= 0.9);
        assert!(p.depth >= 0.2 && p.depth <= 1.0);
        assert!(p.drift.x.abs() <= 0.05 && p.drift.y.abs() <= 0.05);
    }
}

#[test]
fn color_distribution_follows_weights() {
    let mut rng = StdRng::seed_from_u64(42);
    let n = 20_000;
    let mut accent = 0;
    let mut muted = 0;
    for _ in 0..n {
        match Particle::random(&mut rng, 100.0, 100.0).color {
            ColorIndex::Accent => accent += 1,
            ColorIndex::Muted => muted += 1,
            ColorIndex::Neutral => {}
        }
    }
    let accent = accent as f32 / n as f32;
    let muted = muted as f32 / n as f32;
    assert!((accent - 0.08).abs() < 0.015, "accent share {}", accent);
    assert!((muted - 0.30).abs() < 0.02, "muted share {}", muted);
}

#[test]
fn positions_stay_inside_wrap_margin() {
    let mut field = populated(640.0, 480.0, DeviceClass::Full, 3);
    // keep the pointer busy in the middle for a while
    for i in 0..5_000 {
        if i % 10 == 0 {
            let vp = field.viewport();
            field.pointer.moved(320.0 + (i % 50) as f32, 240.0, &vp);
        }
        field.step();
        for p in field.particles() {
            assert!(p.position.x >= -WRAP_MARGIN && p.position.x <= 640.0 + WRAP_MARGIN);
            assert!(p.position.y >= -WRAP_MARGIN && p.position.y <= 480.0 + WRAP_MARGIN);
            assert!(p.velocity.x.abs() <= MAX_SPEED + 1e-6);
            assert!(p.velocity.y.abs() <= MAX_SPEED + 1e-6);
        }
    }
}

#[test]
fn particle_leaving_an_edge_reenters_on_the_other_side() {
    let mut field = populated(100.0, 100.0, DeviceClass::Full, 1);
    let p = &mut field.particles_mut()[0];
    p.position = Vec2::new(100.0 + WRAP_MARGIN, 50.0);
    p.velocity = Vec2::new(MAX_SPEED, 0.0);
    p.drift = Vec2::new(MAX_SPEED, 0.0);
    let mut p = *p;
    p.step(&PointerState::default(), 100.0, 100.0);
    assert_eq!(p.position.x, -WRAP_MARGIN);
}

#[test]
fn pointer_repels_nearby_particles() {
    let mut p = Particle {
        position: Vec2::new(110.0, 100.0),
        velocity: Vec2::ZERO,
        drift: Vec2::ZERO,
        radius: 2.0,
        opacity: 0.6,
        depth: 0.5,
        color: ColorIndex::Neutral,
    };
    let mut pointer = PointerState::default();
    pointer.moved(100.0, 100.0, &Viewport::new(400.0, 400.0));
    p.step(&pointer, 400.0, 400.0);
    assert!(p.velocity.x > 0.0);
    assert_eq!(p.velocity.y, 0.0);
}

#[test]
fn render_layout_wraps_into_viewport() {
    let mut field = populated(800.0, 600.0, DeviceClass::Full, 11);
    field.set_scroll_target(1.0);
    for _ in 0..200 {
        field.step();
    }
    field.layout(true);
    for p in field.points() {
        assert!(p.position.x >= 0.0 && p.position.x <= 800.0);
        assert!(p.position.y >= 0.0 && p.position.y <= 600.0);
    }
}

fn brute_force_links(field: &ParticleField) -> Vec<(Vec2, Vec2)> {
    let points = field.points();
    let max = field.link_distance();
    let mut out = Vec::new();
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let (a, b) = (&points[i], &points[j]);
            let d = a.position.distance(b.position);
            if d <= max && link_style(a, b, d, max).is_some() {
                out.push((a.position, b.position));
            }
        }
    }
    out
}

fn key(v: Vec2) -> (i64, i64) {
    ((v.x * 1000.0) as i64, (v.y * 1000.0) as i64)
}

#[test]
fn grid_search_matches_brute_force() {
    for seed in 0..5 {
        let mut field = populated(1280.0, 800.0, DeviceClass::Full, seed);
        for _ in 0..30 {
            field.step();
        }
        field.layout(true);
        let mut grid = Vec::new();
        field.links(&mut grid);

        let mut expected: Vec<_> = brute_force_links(&field)
            .into_iter()
            .map(|(a, b)| (key(a), key(b)))
            .collect();
        let mut found: Vec<_> = grid.iter().map(|l| (key(l.from), key(l.to))).collect();
        // pair order within a link does not matter
        for pair in expected.iter_mut().chain(found.iter_mut()) {
            if pair.1 < pair.0 {
                *pair = (pair.1, pair.0);
            }
        }
        expected.sort();
        found.sort();
        assert_eq!(found, expected, "seed {}", seed);
    }
}

#[test]
fn accent_pairs_use_accent_color_with_capped_alpha() {
    let a = DrawPoint {
        position: Vec2::ZERO,
        radius: 2.0,
        opacity: 0.9,
        color: ColorIndex::Accent,
        cell: (0, 0),
    };
    let b = DrawPoint {
        color: ColorIndex::Neutral,
        ..a
    };
    let (width, color) = link_style(&a, &b, 1.0, 120.0).expect("close pair links");
    assert_eq!((color.r, color.g, color.b), (ACCENT.r, ACCENT.g, ACCENT.b));
    assert!(color.a <= 0.13);
    assert!(width > 0.45 && width <= 0.8);
}

#[test]
fn faint_pairs_are_skipped() {
    let a = DrawPoint {
        position: Vec2::ZERO,
        radius: 2.0,
        opacity: 0.45,
        color: ColorIndex::Neutral,
        cell: (0, 0),
    };
    assert!(link_style(&a, &a, 119.0, 120.0).is_none());
}

#[test]
fn glow_adds_halos_only_for_accent_and_muted() {
    let mut field = populated(1280.0, 800.0, DeviceClass::Full, 5);
    field.layout(false);
    let halos = field
        .points()
        .iter()
        .filter(|p| p.color != ColorIndex::Neutral)
        .count();
    let mut plain = Vec::new();
    field.dots(false, &mut plain);
    let mut glowing = Vec::new();
    field.dots(true, &mut glowing);
    assert_eq!(plain.len(), field.points().len());
    assert_eq!(glowing.len(), plain.len() + halos);
}

#[test]
fn same_seed_gives_same_field() {
    let a = populated(1024.0, 768.0, DeviceClass::Full, 99);
    let b = populated(1024.0, 768.0, DeviceClass::Full, 99);
    assert_eq!(a.particles(), b.particles());
}

#[test]
fn empty_viewport_spawns_nothing() {
    let field = populated(0.0, 0.0, DeviceClass::Full, 1);
    assert!(field.particles().is_empty());
}
