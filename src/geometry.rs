//! Procedural geometry for the three scene primitives.
//!
//! | Primitive | Shape |
//! |-----------|-------|
//! | plane     | 2×2 quad on the XZ plane, normal +Y |
//! | cylinder  | capped, radius 0.5, height 1, centred at the origin, axis Y |
//! | torus     | ring in the XY plane around Z, major radius 1 |
//!
//! All triangles wind counter-clockwise seen from outside.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::mesh::Vertex3d;

pub const CYLINDER_SEGMENTS: u32 = 36;
pub const TORUS_MAJOR_SEGMENTS: u32 = 48;
pub const TORUS_MINOR_SEGMENTS: u32 = 24;
pub const TORUS_MINOR_RADIUS: f32 = 0.25;

/// Geometry data before GPU upload.
#[derive(Clone, Debug)]
pub struct RawGeometry {
    pub vertices: Vec<Vertex3d>,
    pub indices: Vec<u32>,
}

impl RawGeometry {
    pub fn new(vertices: Vec<Vertex3d>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `(min, max)` corners of the axis-aligned bounding box.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), v| {
                let p = Vec3::from(v.position);
                (min.min(p), max.max(p))
            },
        )
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append `other`, rebasing its indices.
    fn append(&mut self, other: RawGeometry) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }
}

/// 2×2 quad in the XZ plane, normal +Y.
pub fn plane() -> RawGeometry {
    let n = [0.0, 1.0, 0.0];
    let vertices = vec![
        Vertex3d::new([-1.0, 0.0, 1.0], n, [0.0, 0.0]),
        Vertex3d::new([1.0, 0.0, 1.0], n, [1.0, 0.0]),
        Vertex3d::new([1.0, 0.0, -1.0], n, [1.0, 1.0]),
        Vertex3d::new([-1.0, 0.0, -1.0], n, [0.0, 1.0]),
    ];
    RawGeometry::new(vertices, vec![0, 1, 2, 0, 2, 3])
}

/// Capped cylinder of radius 0.5 and height 1, centred on the origin along Y.
pub fn cylinder(segments: u32) -> RawGeometry {
    let radius = 0.5;
    let half = 0.5;

    let mut side = RawGeometry::new(Vec::new(), Vec::new());
    for i in 0..=segments {
        let u = i as f32 / segments as f32;
        let (sin, cos) = (u * TAU).sin_cos();
        let normal = [cos, 0.0, sin];
        side.vertices.push(Vertex3d::new(
            [radius * cos, -half, radius * sin],
            normal,
            [u, 0.0],
        ));
        side.vertices.push(Vertex3d::new(
            [radius * cos, half, radius * sin],
            normal,
            [u, 1.0],
        ));
    }
    for i in 0..segments {
        let (b0, t0, b1, t1) = (2 * i, 2 * i + 1, 2 * i + 2, 2 * i + 3);
        side.indices.extend([b0, t0, b1, b1, t0, t1]);
    }

    let mut geometry = side;
    geometry.append(cap(segments, radius, half, true));
    geometry.append(cap(segments, radius, -half, false));
    geometry
}

fn cap(segments: u32, radius: f32, y: f32, facing_up: bool) -> RawGeometry {
    let normal = if facing_up { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
    let mut vertices = vec![Vertex3d::new([0.0, y, 0.0], normal, [0.5, 0.5])];
    for i in 0..=segments {
        let (sin, cos) = (i as f32 / segments as f32 * TAU).sin_cos();
        vertices.push(Vertex3d::new(
            [radius * cos, y, radius * sin],
            normal,
            [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
        ));
    }

    let mut indices = Vec::with_capacity(segments as usize * 3);
    for i in 1..=segments {
        if facing_up {
            indices.extend([0, i + 1, i]);
        } else {
            indices.extend([0, i, i + 1]);
        }
    }
    RawGeometry::new(vertices, indices)
}

/// Torus of major radius 1 lying in the XY plane.
pub fn torus(major_segments: u32, minor_segments: u32, minor_radius: f32) -> RawGeometry {
    let major_radius = 1.0;
    let ring = minor_segments + 1;

    let mut vertices = Vec::with_capacity(((major_segments + 1) * ring) as usize);
    for i in 0..=major_segments {
        let u = i as f32 / major_segments as f32;
        let (sin_phi, cos_phi) = (u * TAU).sin_cos();
        let radial = Vec3::new(cos_phi, sin_phi, 0.0);
        let center = radial * major_radius;

        for j in 0..=minor_segments {
            let v = j as f32 / minor_segments as f32;
            let (sin_theta, cos_theta) = (v * TAU).sin_cos();
            let normal = radial * cos_theta + Vec3::Z * sin_theta;
            vertices.push(Vertex3d::new(
                (center + normal * minor_radius).to_array(),
                normal.to_array(),
                [u, v],
            ));
        }
    }

    let mut indices = Vec::with_capacity((major_segments * minor_segments * 6) as usize);
    for i in 0..major_segments {
        for j in 0..minor_segments {
            let a = i * ring + j;
            let b = (i + 1) * ring + j;
            let c = b + 1;
            let d = a + 1;
            indices.extend([a, b, d, b, c, d]);
        }
    }

    RawGeometry::new(vertices, indices)
}
