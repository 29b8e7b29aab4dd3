//! Per-draw state binding.
//!
//! [`SceneComposer`] owns the texture and material registries, the staged
//! shader parameters and the mesh provider. Drawing an object is a sequence of
//! pushes into the parameter store followed by a draw call that captures them:
//!
//! ```ignore
//! composer.apply_transform(&Transform::new().scale(Vec3::new(20.0, 1.0, 10.0)));
//! composer.apply_uv_scale(4.0, 2.0);
//! composer.apply_texture("wood")?;
//! composer.apply_material("woodMaterial");
//! composer.draw(PrimitiveKind::Plane);
//! ```
//!
//! Parameters persist across draws. Anything a draw does not push is inherited
//! from the previous one, which is why [`DrawDescriptor`] exists: it names the
//! full per-draw state and [`SceneComposer::submit`] applies it in a fixed
//! order.

use std::collections::HashSet;

use glam::{Vec2, Vec4};

use crate::error::{SceneError, TextureError};
use crate::image_decoder::ImageDecoder;
use crate::material::{Material, MaterialRegistry};
use crate::mesh::{MeshProvider, PrimitiveKind, Transform};
use crate::shader_params::{self as names, ShaderParams, UniformStore};
use crate::texture_registry::{TextureBackend, TextureRegistry};

/// Flat color a draw falls back to when its texture tag is not registered.
pub const MISSING_TEXTURE_COLOR: Vec4 = Vec4::ONE;

/// How an object's surface color is sourced.
#[derive(Clone, Debug, PartialEq)]
pub enum Surface {
    /// Flat RGBA color, texturing off.
    Color(Vec4),
    /// Registered texture, tiled `uv_scale` times.
    Texture { tag: String, uv_scale: Vec2 },
}

/// Complete description of one draw.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawDescriptor {
    pub primitive: PrimitiveKind,
    pub transform: Transform,
    pub surface: Surface,
    /// `None` keeps whatever material the previous draw left bound.
    pub material: Option<String>,
}

impl DrawDescriptor {
    /// Untransformed, flat white, keeping the current material.
    pub fn new(primitive: PrimitiveKind) -> Self {
        Self {
            primitive,
            transform: Transform::default(),
            surface: Surface::Color(Vec4::ONE),
            material: None,
        }
    }

    /// Scale, rotation and position of the object.
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Draw with a flat RGBA color.
    pub fn color(mut self, color: Vec4) -> Self {
        self.surface = Surface::Color(color);
        self
    }

    /// Draw with the texture registered under `tag`, tiled `uv_scale` times.
    pub fn texture(mut self, tag: impl Into<String>, uv_scale: Vec2) -> Self {
        self.surface = Surface::Texture {
            tag: tag.into(),
            uv_scale,
        };
        self
    }

    /// Bind the material registered under `tag` before drawing.
    pub fn material(mut self, tag: impl Into<String>) -> Self {
        self.material = Some(tag.into());
        self
    }
}

/// Registries, staged shader parameters and the mesh provider behind every
/// draw.
pub struct SceneComposer<T: TextureBackend, M: MeshProvider> {
    textures: TextureRegistry<T>,
    materials: MaterialRegistry,
    params: UniformStore,
    meshes: M,
    /// Tags already reported missing, so a per-frame miss warns once.
    missing_textures: HashSet<String>,
}

impl<T: TextureBackend, M: MeshProvider> SceneComposer<T, M> {
    /// Empty registries and parameter store.
    pub fn new(texture_backend: T, meshes: M) -> Self {
        Self {
            textures: TextureRegistry::new(texture_backend),
            materials: MaterialRegistry::default(),
            params: UniformStore::new(),
            meshes,
            missing_textures: HashSet::new(),
        }
    }

    /// Decode `path` into the next texture slot under `tag`.
    pub fn load_texture(
        &mut self,
        decoder: &impl ImageDecoder,
        path: &str,
        tag: &str,
    ) -> Result<usize, TextureError> {
        self.textures.load(decoder, path, tag)
    }

    /// Make every loaded texture resident in its slot.
    pub fn bind_textures(&mut self) {
        self.textures.bind_all();
    }

    /// Add `material` to the registry.
    pub fn register_material(&mut self, material: Material) {
        self.materials.register(material);
    }

    /// Build the mesh for `kind` so it can be drawn.
    pub fn load_mesh(&mut self, kind: PrimitiveKind) {
        self.meshes.load(kind);
    }

    /// Push the model matrix for `transform`.
    pub fn apply_transform(&mut self, transform: &Transform) {
        self.params.set_mat4(names::MODEL, transform.matrix());
    }

    /// Turn texturing off and push a flat color.
    pub fn apply_flat_color(&mut self, color: Vec4) {
        self.params.set_bool(names::USE_TEXTURE, false);
        self.params.set_vec4(names::OBJECT_COLOR, color);
    }

    /// Turn texturing on and point the sampler at the slot registered under
    /// `tag`.
    ///
    /// An unknown tag draws flat [`MISSING_TEXTURE_COLOR`] instead, leaves the
    /// sampler where it was and reports [`SceneError::TextureNotFound`].
    pub fn apply_texture(&mut self, tag: &str) -> Result<usize, SceneError> {
        match self.textures.find_slot(tag) {
            Some(slot) => {
                self.params.set_bool(names::USE_TEXTURE, true);
                self.params.set_sampler(names::OBJECT_TEXTURE, slot as i32);
                Ok(slot)
            }
            None => {
                if self.missing_textures.insert(tag.to_string()) {
                    log::warn!("texture '{tag}' is not registered, drawing untextured");
                }
                self.apply_flat_color(MISSING_TEXTURE_COLOR);
                Err(SceneError::TextureNotFound(tag.to_string()))
            }
        }
    }

    /// Push the texture coordinate tiling factors.
    pub fn apply_uv_scale(&mut self, u: f32, v: f32) {
        self.params.set_vec2(names::UV_SCALE, Vec2::new(u, v));
    }

    /// Push the five material parameters for `tag`.
    ///
    /// Returns false and pushes nothing when no material has that tag; the
    /// previously bound material stays in effect.
    pub fn apply_material(&mut self, tag: &str) -> bool {
        let Some(material) = self.materials.lookup(tag) else {
            log::debug!("material '{tag}' not found, keeping current material");
            return false;
        };
        self.params
            .set_vec3(names::MATERIAL_AMBIENT_COLOR, material.ambient_color);
        self.params
            .set_float(names::MATERIAL_AMBIENT_STRENGTH, material.ambient_strength);
        self.params
            .set_vec3(names::MATERIAL_DIFFUSE_COLOR, material.diffuse_color);
        self.params
            .set_vec3(names::MATERIAL_SPECULAR_COLOR, material.specular_color);
        self.params
            .set_float(names::MATERIAL_SHININESS, material.shininess);
        true
    }

    /// Issue `kind` with the current parameters.
    pub fn draw(&mut self, kind: PrimitiveKind) {
        self.meshes.draw(kind, &self.params);
    }

    /// Apply transform, surface and material in that order, then draw.
    ///
    /// The draw always happens. A missing texture is drawn untextured and
    /// reported afterwards.
    pub fn submit(&mut self, draw: &DrawDescriptor) -> Result<(), SceneError> {
        self.apply_transform(&draw.transform);
        let surface = match &draw.surface {
            Surface::Color(color) => {
                self.apply_flat_color(*color);
                Ok(())
            }
            Surface::Texture { tag, uv_scale } => {
                self.apply_uv_scale(uv_scale.x, uv_scale.y);
                self.apply_texture(tag).map(|_| ())
            }
        };
        if let Some(tag) = &draw.material {
            self.apply_material(tag);
        }
        self.draw(draw.primitive);
        surface
    }

    /// Free every texture.
    pub fn release(&mut self) {
        self.textures.release_all();
    }

    /// Currently staged shader parameters.
    pub fn params(&self) -> &UniformStore {
        &self.params
    }

    /// Direct access for per-frame values outside the per-draw set: camera
    /// matrices, view position, lights.
    pub fn params_mut(&mut self) -> &mut UniformStore {
        &mut self.params
    }

    pub fn textures(&self) -> &TextureRegistry<T> {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    pub fn meshes(&self) -> &M {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut M {
        &mut self.meshes
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::texture_registry::tests::{FakeBackend, FakeDecoder};
    use glam::{Mat4, Vec3};

    /// Mesh provider recording loads and a snapshot of parameters per draw.
    #[derive(Default)]
    pub(crate) struct RecordingMeshes {
        pub(crate) loaded: Vec<PrimitiveKind>,
        pub(crate) draws: Vec<(PrimitiveKind, UniformStore)>,
    }

    impl MeshProvider for RecordingMeshes {
        fn load(&mut self, kind: PrimitiveKind) {
            self.loaded.push(kind);
        }

        fn draw(&mut self, kind: PrimitiveKind, params: &UniformStore) {
            self.draws.push((kind, params.clone()));
        }
    }

    pub(crate) type TestComposer = SceneComposer<FakeBackend, RecordingMeshes>;

    fn composer() -> TestComposer {
        SceneComposer::new(FakeBackend::default(), RecordingMeshes::default())
    }

    fn composer_with_wood() -> TestComposer {
        let mut composer = composer();
        let decoder = FakeDecoder::default().with("wood.jpg", 3);
        composer.load_texture(&decoder, "wood.jpg", "wood").unwrap();
        composer
    }

    fn shiny() -> Material {
        Material::new("m1")
            .ambient([0.1, 0.2, 0.3], 0.5)
            .diffuse([0.7, 0.6, 0.5])
            .specular([1.0, 1.0, 1.0])
            .shininess(64.0)
    }

    #[test]
    fn transform_pushes_model_matrix() {
        let mut composer = composer();
        let transform = Transform::new()
            .scale(Vec3::new(2.0, 1.0, 1.0))
            .position(Vec3::new(5.0, 0.0, 0.0));
        composer.apply_transform(&transform);

        let model = composer.params().mat4(names::MODEL).unwrap();
        assert_eq!(model, transform.matrix());
        assert!((model.transform_point3(Vec3::X) - Vec3::new(7.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn flat_color_disables_texturing() {
        let mut composer = composer_with_wood();
        composer.apply_texture("wood").unwrap();
        composer.apply_flat_color(Vec4::new(0.1, 0.1, 0.4, 1.0));

        assert_eq!(composer.params().bool(names::USE_TEXTURE), Some(false));
        assert_eq!(
            composer.params().vec4(names::OBJECT_COLOR),
            Some(Vec4::new(0.1, 0.1, 0.4, 1.0))
        );
    }

    #[test]
    fn texture_binds_registered_slot() {
        let mut composer = composer_with_wood();
        assert_eq!(composer.apply_texture("wood"), Ok(0));
        assert_eq!(composer.params().bool(names::USE_TEXTURE), Some(true));
        assert_eq!(composer.params().int(names::OBJECT_TEXTURE), Some(0));
    }

    #[test]
    fn missing_texture_draws_untextured() {
        let mut composer = composer_with_wood();
        composer.apply_texture("wood").unwrap();

        let err = composer.apply_texture("marble").unwrap_err();
        assert_eq!(err, SceneError::TextureNotFound("marble".into()));
        assert_eq!(composer.params().bool(names::USE_TEXTURE), Some(false));
        // The sampler is left on the last valid slot, never a sentinel.
        assert_eq!(composer.params().int(names::OBJECT_TEXTURE), Some(0));
    }

    #[test]
    fn missing_texture_color_ignores_previous_draw() {
        let mut composer = composer();
        composer.apply_flat_color(Vec4::new(0.2, 0.2, 0.2, 1.0));
        composer.draw(PrimitiveKind::Plane);

        assert!(composer.apply_texture("wood").is_err());
        assert_eq!(
            composer.params().vec4(names::OBJECT_COLOR),
            Some(MISSING_TEXTURE_COLOR)
        );
    }

    #[test]
    fn material_pushes_all_five_parameters() {
        let mut composer = composer();
        composer.register_material(shiny());
        assert!(composer.apply_material("m1"));

        let p = composer.params();
        assert_eq!(p.vec3(names::MATERIAL_AMBIENT_COLOR), Some(Vec3::new(0.1, 0.2, 0.3)));
        assert_eq!(p.float(names::MATERIAL_AMBIENT_STRENGTH), Some(0.5));
        assert_eq!(p.vec3(names::MATERIAL_DIFFUSE_COLOR), Some(Vec3::new(0.7, 0.6, 0.5)));
        assert_eq!(p.vec3(names::MATERIAL_SPECULAR_COLOR), Some(Vec3::ONE));
        assert_eq!(p.float(names::MATERIAL_SHININESS), Some(64.0));
    }

    #[test]
    fn missing_material_pushes_nothing() {
        let mut composer = composer();
        composer.register_material(shiny());
        composer.apply_material("m1");
        let before = composer.params().clone();

        assert!(!composer.apply_material("glass"));
        for key in [
            names::MATERIAL_AMBIENT_COLOR,
            names::MATERIAL_AMBIENT_STRENGTH,
            names::MATERIAL_DIFFUSE_COLOR,
            names::MATERIAL_SPECULAR_COLOR,
            names::MATERIAL_SHININESS,
        ] {
            assert_eq!(composer.params().get(key), before.get(key));
        }
    }

    #[test]
    fn uv_scale_persists_until_overwritten() {
        let mut composer = composer();
        composer.apply_uv_scale(8.0, 4.0);
        composer.draw(PrimitiveKind::Plane);
        composer.draw(PrimitiveKind::Torus);
        composer.apply_uv_scale(4.0, 2.0);
        composer.draw(PrimitiveKind::Plane);

        let scales: Vec<_> = composer
            .meshes()
            .draws
            .iter()
            .map(|(_, p)| p.vec2(names::UV_SCALE).unwrap())
            .collect();
        assert_eq!(
            scales,
            vec![Vec2::new(8.0, 4.0), Vec2::new(8.0, 4.0), Vec2::new(4.0, 2.0)]
        );
    }

    #[test]
    fn flat_color_then_material_stays_untextured() {
        let mut composer = composer_with_wood();
        composer.register_material(
            Material::new("m1")
                .diffuse([1.0, 0.0, 0.0])
                .shininess(32.0),
        );
        composer.apply_texture("wood").unwrap();

        composer.apply_flat_color(Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert!(composer.apply_material("m1"));
        composer.draw(PrimitiveKind::Cylinder);

        let (kind, params) = &composer.meshes().draws[0];
        assert_eq!(*kind, PrimitiveKind::Cylinder);
        assert_eq!(params.bool(names::USE_TEXTURE), Some(false));
        assert_eq!(params.vec4(names::OBJECT_COLOR), Some(Vec4::new(0.0, 1.0, 0.0, 1.0)));
        assert_eq!(params.vec3(names::MATERIAL_DIFFUSE_COLOR), Some(Vec3::X));
        assert_eq!(params.float(names::MATERIAL_SHININESS), Some(32.0));
    }

    #[test]
    fn submit_applies_state_then_draws() {
        let mut composer = composer_with_wood();
        composer.register_material(shiny());

        let floor = DrawDescriptor::new(PrimitiveKind::Plane)
            .transform(Transform::new().scale(Vec3::new(20.0, 1.0, 10.0)))
            .texture("wood", Vec2::new(4.0, 2.0))
            .material("m1");
        composer.submit(&floor).unwrap();

        let (kind, params) = &composer.meshes().draws[0];
        assert_eq!(*kind, PrimitiveKind::Plane);
        assert_eq!(params.bool(names::USE_TEXTURE), Some(true));
        assert_eq!(params.vec2(names::UV_SCALE), Some(Vec2::new(4.0, 2.0)));
        assert_eq!(
            params.mat4(names::MODEL),
            Some(Mat4::from_scale(Vec3::new(20.0, 1.0, 10.0)))
        );
        assert_eq!(params.float(names::MATERIAL_SHININESS), Some(64.0));
    }

    #[test]
    fn submit_carries_material_over_on_miss() {
        let mut composer = composer();
        composer.register_material(shiny());
        composer
            .submit(&DrawDescriptor::new(PrimitiveKind::Cylinder).material("m1"))
            .unwrap();
        composer
            .submit(&DrawDescriptor::new(PrimitiveKind::Torus).material("unknown"))
            .unwrap();
        composer
            .submit(&DrawDescriptor::new(PrimitiveKind::Torus))
            .unwrap();

        for (_, params) in &composer.meshes().draws {
            assert_eq!(params.float(names::MATERIAL_SHININESS), Some(64.0));
        }
    }

    #[test]
    fn submit_with_missing_texture_still_draws() {
        let mut composer = composer();
        let draw = DrawDescriptor::new(PrimitiveKind::Plane).texture("wood", Vec2::ONE);

        assert_eq!(
            composer.submit(&draw),
            Err(SceneError::TextureNotFound("wood".into()))
        );
        let (_, params) = &composer.meshes().draws[0];
        assert_eq!(params.bool(names::USE_TEXTURE), Some(false));
    }

    #[test]
    fn release_frees_every_texture() {
        let mut composer = composer_with_wood();
        composer.release();
        assert!(composer.textures().is_empty());
        assert_eq!(composer.textures().backend().released, vec![1]);
        assert!(composer.textures().backend().bound.is_empty());
    }
}
