//! # Desk Scene
//!
//! A Phong-lit still life rendered with wgpu: a wooden table, a mug, a
//! notebook with a pen and a laptop, explored with a fly camera.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> anyhow::Result<()> {
//!     deskscene::run(deskscene::AppConfig::new().asset_dir("assets"))
//! }
//! ```
//!
//! ## Drawing objects
//!
//! Objects are drawn through a [`SceneComposer`], which stages named shader
//! parameters and captures them on each draw:
//!
//! ```ignore
//! composer.submit(
//!     &DrawDescriptor::new(PrimitiveKind::Cylinder)
//!         .transform(Transform::new().position(Vec3::new(8.0, 0.5625, 0.0)))
//!         .color(Vec4::ONE)
//!         .material("whiteMaterial"),
//! )?;
//! ```
//!
//! ## Controls
//!
//! | Input | Action |
//! |-------|--------|
//! | Mouse | Look around |
//! | W/A/S/D | Move and strafe |
//! | Q/E | Up/down |
//! | Scroll | Dolly forward/back |
//! | P/O | Perspective/orthographic |

mod app;
mod camera;
mod composer;
pub mod desk_scene;
mod error;
mod fly_camera;
pub mod geometry;
mod gpu;
mod image_decoder;
mod input;
mod lighting;
mod material;
mod mesh;
mod scene_pass;
pub mod shader_params;
mod texture;
mod texture_registry;
pub mod uniforms;

pub use app::{AppConfig, run};
pub use camera::{CameraConfig, CameraState, ProjectionMode, front_from_angles};
pub use composer::{DrawDescriptor, MISSING_TEXTURE_COLOR, SceneComposer, Surface};
pub use error::{SceneError, TextureError};
pub use fly_camera::{FlyCameraController, PITCH_LIMIT};
pub use geometry::RawGeometry;
pub use gpu::GpuContext;
pub use image_decoder::{DecodedImage, FileImageDecoder, ImageDecoder};
pub use input::{Input, scroll_lines};
pub use lighting::{
    Attenuation, DirectionalLight, Fragment, PointLight, SceneLights, SpotLight, base_color, shade,
};
pub use material::{Material, MaterialRegistry};
pub use mesh::{DrawCommand, Mesh, MeshProvider, PrimitiveKind, ShapeMeshes, Transform, Vertex3d};
pub use scene_pass::ScenePass;
pub use shader_params::{ShaderParams, UniformStore, UniformValue};
pub use texture::{GpuTextures, Texture};
pub use texture_registry::{MAX_TEXTURE_SLOTS, TextureBackend, TextureRegistry};

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::keyboard::KeyCode;
