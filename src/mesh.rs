//! Meshes, placement transforms and the primitive mesh provider.
//!
//! - [`Vertex3d`]: vertex format shared by every mesh
//! - [`Mesh`]: GPU-resident vertex and index buffers
//! - [`Transform`]: scale, Euler rotation in degrees, and position
//! - [`MeshProvider`]: loads and draws the three scene primitives
//!
//! # Vertex Layout
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | normal    | Float32x3 | 12     | 1               |
//! | uv        | Float32x2 | 24     | 2               |

use glam::{Mat4, Vec3};

use crate::geometry::{self, RawGeometry};
use crate::shader_params::UniformStore;
use crate::uniforms::ObjectUniforms;

/// A vertex with position, normal, and texture coordinates. 32 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex3d {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// GPU-resident geometry. Immutable after creation.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    pub fn new(device: &wgpu::Device, label: &str, geometry: &RawGeometry) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        }
    }
}

/// Placement of one object: scale, then rotate about X, Y, Z (degrees), then
/// translate.
///
/// ```
/// use deskscene::Transform;
/// use glam::Vec3;
///
/// let mug = Transform::new()
///     .scale(Vec3::new(0.75, 1.125, 0.75))
///     .position(Vec3::new(8.0, 0.5625, 0.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: Vec3,
    /// Euler angles in degrees about X, Y and Z.
    pub rotation_degrees: Vec3,
    pub position: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            rotation_degrees: Vec3::ZERO,
            position: Vec3::ZERO,
        }
    }
}

impl Transform {
    /// Identity transform: unit scale, no rotation, at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Translation applied last.
    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Euler angles in degrees, applied Z first, then Y, then X.
    pub fn rotation_degrees(mut self, degrees: Vec3) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    /// Per-axis scale, applied first.
    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// `T · Rx · Ry · Rz · S`
    pub fn matrix(&self) -> Mat4 {
        let r = self.rotation_degrees;
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(r.x.to_radians())
            * Mat4::from_rotation_y(r.y.to_radians())
            * Mat4::from_rotation_z(r.z.to_radians())
            * Mat4::from_scale(self.scale)
    }
}

/// The three primitive meshes the scene is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Plane,
    Cylinder,
    Torus,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 3] = [Self::Plane, Self::Cylinder, Self::Torus];

    fn index(self) -> usize {
        self as usize
    }

    pub fn geometry(self) -> RawGeometry {
        match self {
            Self::Plane => geometry::plane(),
            Self::Cylinder => geometry::cylinder(geometry::CYLINDER_SEGMENTS),
            Self::Torus => geometry::torus(
                geometry::TORUS_MAJOR_SEGMENTS,
                geometry::TORUS_MINOR_SEGMENTS,
                geometry::TORUS_MINOR_RADIUS,
            ),
        }
    }
}

/// Source of the primitive meshes.
///
/// `draw` issues the primitive with whatever parameter values are current in
/// `params`; the provider captures them at call time.
pub trait MeshProvider {
    fn load(&mut self, kind: PrimitiveKind);
    fn draw(&mut self, kind: PrimitiveKind, params: &UniformStore);
}

/// One recorded draw: which mesh and the object uniforms it was issued with.
#[derive(Clone, Copy, Debug)]
pub struct DrawCommand {
    pub kind: PrimitiveKind,
    pub object: ObjectUniforms,
}

/// wgpu-backed [`MeshProvider`]. Draws are queued and replayed by
/// [`ScenePass`](crate::ScenePass) at the end of the frame.
pub struct ShapeMeshes {
    device: wgpu::Device,
    meshes: [Option<Mesh>; 3],
    queued: Vec<DrawCommand>,
}

impl ShapeMeshes {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            device: device.clone(),
            meshes: [None, None, None],
            queued: Vec::new(),
        }
    }

    pub fn mesh(&self, kind: PrimitiveKind) -> Option<&Mesh> {
        self.meshes[kind.index()].as_ref()
    }

    /// Hand over this frame's draws and start a new frame.
    pub fn take_draws(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.queued)
    }
}

impl MeshProvider for ShapeMeshes {
    fn load(&mut self, kind: PrimitiveKind) {
        let slot = &mut self.meshes[kind.index()];
        if slot.is_none() {
            let geometry = kind.geometry();
            log::debug!(
                "uploading {kind:?} mesh: {} vertices, {} triangles",
                geometry.vertices.len(),
                geometry.triangle_count()
            );
            *slot = Some(Mesh::new(&self.device, &format!("{kind:?}"), &geometry));
        }
    }

    fn draw(&mut self, kind: PrimitiveKind, params: &UniformStore) {
        if self.mesh(kind).is_none() {
            log::warn!("draw of {kind:?} skipped, mesh was never loaded");
            return;
        }
        self.queued.push(DrawCommand {
            kind,
            object: ObjectUniforms::from_store(params),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn scale_applies_before_translation() {
        let t = Transform::new()
            .scale(Vec3::new(2.0, 1.0, 1.0))
            .position(Vec3::new(5.0, 0.0, 0.0));
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(7.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn z_rotation_applies_before_x_rotation() {
        let t = Transform::new().rotation_degrees(Vec3::new(90.0, 0.0, 90.0));
        // Rz takes +X to +Y, then Rx takes +Y to +Z.
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::Z).length() < EPS);
    }

    #[test]
    fn default_transform_is_identity() {
        assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn every_primitive_has_geometry() {
        for kind in PrimitiveKind::ALL {
            let geometry = kind.geometry();
            assert!(!geometry.indices.is_empty(), "{kind:?} is empty");
        }
    }
}
