//! Procedural geometry for the parallax scene.
//!
//! Parameterization follows the usual sphere/torus/cylinder conventions
//! (counter-clockwise front faces, +Y up) so the shapes line up with the
//! rotations the scene applies.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Unit normal; degenerate vectors (sphere poles at radius 0) point up.
#[inline]
fn normalized(v: [f32; 3]) -> [f32; 3] {
    Vec3::from(v).try_normalize().unwrap_or(Vec3::Y).to_array()
}

/// Sphere, or a slice of one when `theta_length < PI`.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32, theta_length: f32) -> Mesh {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let mut mesh = Mesh::default();
    for iy in 0..=h {
        let theta = iy as f32 / h as f32 * theta_length;
        for ix in 0..=w {
            let phi = ix as f32 / w as f32 * TAU;
            let position = [
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ];
            mesh.vertices.push(Vertex {
                position,
                normal: normalized(position),
            });
        }
    }
    let row = w + 1;
    let theta_end = theta_length;
    for iy in 0..h {
        for ix in 0..w {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h - 1 || theta_end < PI {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Mesh {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);
    let mut mesh = Mesh::default();
    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let position = [
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            ];
            let center = [radius * u.cos(), radius * u.sin(), 0.0];
            mesh.vertices.push(Vertex {
                position,
                normal: normalized([
                    position[0] - center[0],
                    position[1] - center[1],
                    position[2] - center[2],
                ]),
            });
        }
    }
    let row = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    mesh
}

/// Open-ended cone with its apex at `+height/2`.
pub fn open_cone(radius: f32, height: f32, radial_segments: u32) -> Mesh {
    let radial = radial_segments.max(3);
    let slope = radius / height.max(f32::EPSILON);
    let mut mesh = Mesh::default();
    for y in 0..=1u32 {
        let v = y as f32;
        let ring_radius = v * radius;
        for x in 0..=radial {
            let theta = x as f32 / radial as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            mesh.vertices.push(Vertex {
                position: [ring_radius * sin, -v * height + height / 2.0, ring_radius * cos],
                normal: normalized([sin, slope, cos]),
            });
        }
    }
    let row = radial + 1;
    for x in 0..radial {
        let a = x;
        let b = row + x;
        let c = row + x + 1;
        let d = x + 1;
        mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }
    mesh
}

/// Every mesh the scene draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Core,
    PrimaryRing,
    SecondaryRing,
    RimRing,
    ShipHull,
    ShipKeel,
    ShipDome,
    ShipGlowRing,
    ShipBeam,
}

impl MeshKind {
    pub const ALL: [MeshKind; 9] = [
        MeshKind::Core,
        MeshKind::PrimaryRing,
        MeshKind::SecondaryRing,
        MeshKind::RimRing,
        MeshKind::ShipHull,
        MeshKind::ShipKeel,
        MeshKind::ShipDome,
        MeshKind::ShipGlowRing,
        MeshKind::ShipBeam,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn build(self) -> Mesh {
        match self {
            MeshKind::Core => sphere(0.72, 64, 64, PI),
            MeshKind::PrimaryRing => torus(1.14, 0.082, 28, 140),
            MeshKind::SecondaryRing => torus(0.92, 0.052, 24, 120),
            MeshKind::RimRing => torus(1.14, 0.098, 16, 120),
            MeshKind::ShipHull => sphere(1.24, 48, 36, PI),
            MeshKind::ShipKeel => sphere(1.08, 42, 30, PI),
            MeshKind::ShipDome => sphere(0.43, 34, 26, PI / 2.0),
            MeshKind::ShipGlowRing => torus(1.19, 0.05, 14, 80),
            MeshKind::ShipBeam => open_cone(0.4, 0.95, 22),
        }
    }
}
