//! The desk still life: a wooden table with a mug, a notebook and pen, and
//! a laptop.

use std::path::Path;

use glam::{Vec2, Vec3, Vec4};

use crate::composer::{DrawDescriptor, SceneComposer};
use crate::image_decoder::ImageDecoder;
use crate::material::Material;
use crate::mesh::{MeshProvider, PrimitiveKind, Transform};
use crate::texture_registry::TextureBackend;

pub const WOOD_TEXTURE: &str = "wood";
pub const WOOD_MATERIAL: &str = "woodMaterial";
pub const WHITE_MATERIAL: &str = "whiteMaterial";

/// Background behind the scene.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.1,
    a: 1.0,
};

/// Table wood and the shiny white shared by everything else.
pub fn materials() -> [Material; 2] {
    [
        Material::new(WOOD_MATERIAL)
            .ambient([0.15, 0.08, 0.03], 0.25)
            .diffuse([0.5, 0.3, 0.1])
            .specular(Vec3::splat(0.5))
            .shininess(48.0),
        Material::new(WHITE_MATERIAL)
            .ambient(Vec3::splat(0.4), 0.5)
            .diffuse(Vec3::ONE)
            .specular(Vec3::splat(1.2))
            .shininess(96.0),
    ]
}

/// Draw list in submission order. Objects without a material inherit the
/// one bound by the draw before them.
pub fn objects() -> Vec<DrawDescriptor> {
    let white = Vec4::ONE;
    vec![
        // table top
        DrawDescriptor::new(PrimitiveKind::Plane)
            .transform(Transform::new().scale(Vec3::new(20.0, 1.0, 10.0)))
            .texture(WOOD_TEXTURE, Vec2::new(4.0, 2.0))
            .material(WOOD_MATERIAL),
        // mug body
        DrawDescriptor::new(PrimitiveKind::Cylinder)
            .transform(
                Transform::new()
                    .scale(Vec3::new(0.75, 1.125, 0.75))
                    .position(Vec3::new(8.0, 0.5625, 0.0)),
            )
            .color(white)
            .material(WHITE_MATERIAL),
        // mug rim
        DrawDescriptor::new(PrimitiveKind::Torus)
            .transform(
                Transform::new()
                    .scale(Vec3::new(0.375, 0.375, 0.0375))
                    .rotation_degrees(Vec3::new(90.0, 0.0, 0.0))
                    .position(Vec3::new(8.0, 1.125, 0.0)),
            )
            .color(white),
        // mug handle
        DrawDescriptor::new(PrimitiveKind::Torus)
            .transform(
                Transform::new()
                    .scale(Vec3::new(0.3, 0.3, 0.075))
                    .rotation_degrees(Vec3::new(0.0, 0.0, 90.0))
                    .position(Vec3::new(8.75, 0.85, 0.0)),
            )
            .color(white),
        // notebook
        DrawDescriptor::new(PrimitiveKind::Plane)
            .transform(
                Transform::new()
                    .scale(Vec3::new(3.0, 0.2, 2.0))
                    .rotation_degrees(Vec3::new(0.0, 15.0, 0.0))
                    .position(Vec3::new(-3.0, 0.2, 1.0)),
            )
            .color(Vec4::new(0.1, 0.1, 0.4, 1.0)),
        // pen
        DrawDescriptor::new(PrimitiveKind::Cylinder)
            .transform(
                Transform::new()
                    .scale(Vec3::new(0.1, 2.0, 0.1))
                    .rotation_degrees(Vec3::new(90.0, 15.0, 0.0))
                    .position(Vec3::new(-2.8, 0.5, 1.7)),
            )
            .color(Vec4::new(1.0, 0.0, 0.0, 1.0)),
        // laptop base
        DrawDescriptor::new(PrimitiveKind::Plane)
            .transform(
                Transform::new()
                    .scale(Vec3::new(3.0, 0.05, 2.0))
                    .rotation_degrees(Vec3::new(0.0, -10.0, 0.0))
                    .position(Vec3::new(3.0, 0.075, -2.0)),
            )
            .color(Vec4::new(0.75, 0.75, 0.75, 1.0)),
        // laptop screen
        DrawDescriptor::new(PrimitiveKind::Plane)
            .transform(
                Transform::new()
                    .scale(Vec3::new(3.0, 2.0, 1.0))
                    .rotation_degrees(Vec3::new(-100.0, 0.0, 0.0))
                    .position(Vec3::new(3.0, 1.15, -2.95)),
            )
            .color(Vec4::new(0.2, 0.2, 0.2, 1.0)),
    ]
}

/// One-time setup: meshes, the wood texture from `asset_dir`, materials.
///
/// A wood texture that fails to load is logged and the table is drawn
/// untextured.
pub fn prepare<T, M>(
    composer: &mut SceneComposer<T, M>,
    decoder: &impl ImageDecoder,
    asset_dir: &Path,
) where
    T: TextureBackend,
    M: MeshProvider,
{
    for kind in PrimitiveKind::ALL {
        composer.load_mesh(kind);
    }

    let wood = asset_dir.join("wood.jpg");
    if composer
        .load_texture(decoder, &wood.to_string_lossy(), WOOD_TEXTURE)
        .is_err()
    {
        log::error!("table texture unavailable, drawing it untextured");
    }
    composer.bind_textures();
    composer.apply_uv_scale(8.0, 4.0);

    for material in materials() {
        composer.register_material(material);
    }
}

/// Submit every object for this frame.
pub fn render<T, M>(composer: &mut SceneComposer<T, M>, objects: &[DrawDescriptor])
where
    T: TextureBackend,
    M: MeshProvider,
{
    for object in objects {
        if let Err(err) = composer.submit(object) {
            log::trace!("{err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::MISSING_TEXTURE_COLOR;
    use crate::composer::tests::{RecordingMeshes, TestComposer};
    use crate::shader_params as names;
    use crate::texture_registry::tests::{FakeBackend, FakeDecoder};

    fn composer() -> TestComposer {
        SceneComposer::new(FakeBackend::default(), RecordingMeshes::default())
    }

    #[test]
    fn prepare_registers_resources() {
        let mut composer = composer();
        let decoder = FakeDecoder::default().with("assets/wood.jpg", 3);
        prepare(&mut composer, &decoder, Path::new("assets"));

        assert_eq!(composer.meshes().loaded, PrimitiveKind::ALL.to_vec());
        assert_eq!(composer.textures().find_slot(WOOD_TEXTURE), Some(0));
        assert_eq!(composer.textures().backend().bound, vec![1]);
        assert!(composer.materials().lookup(WOOD_MATERIAL).is_some());
        assert!(composer.materials().lookup(WHITE_MATERIAL).is_some());
        assert_eq!(composer.params().vec2(names::UV_SCALE), Some(Vec2::new(8.0, 4.0)));
    }

    #[test]
    fn frame_draws_every_object_in_order() {
        let mut composer = composer();
        let decoder = FakeDecoder::default().with("assets/wood.jpg", 3);
        prepare(&mut composer, &decoder, Path::new("assets"));
        render(&mut composer, &objects());

        let draws = &composer.meshes().draws;
        let kinds: Vec<_> = draws.iter().map(|(kind, _)| *kind).collect();
        use PrimitiveKind::*;
        assert_eq!(
            kinds,
            vec![Plane, Cylinder, Torus, Torus, Plane, Cylinder, Plane, Plane]
        );

        let (_, table) = &draws[0];
        assert_eq!(table.bool(names::USE_TEXTURE), Some(true));
        assert_eq!(table.vec2(names::UV_SCALE), Some(Vec2::new(4.0, 2.0)));
        assert_eq!(table.float(names::MATERIAL_SHININESS), Some(48.0));

        // Everything after the table is flat colored and keeps whiteMaterial.
        for (_, params) in &draws[1..] {
            assert_eq!(params.bool(names::USE_TEXTURE), Some(false));
            assert_eq!(params.float(names::MATERIAL_SHININESS), Some(96.0));
        }
        let (_, pen) = &draws[5];
        assert_eq!(pen.vec4(names::OBJECT_COLOR), Some(Vec4::new(1.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn missing_wood_texture_still_draws_the_table() {
        let mut composer = composer();
        prepare(&mut composer, &FakeDecoder::default(), Path::new("assets"));
        render(&mut composer, &objects());

        let draws = &composer.meshes().draws;
        assert_eq!(draws.len(), 8);
        assert_eq!(draws[0].1.bool(names::USE_TEXTURE), Some(false));
    }

    #[test]
    fn missing_wood_texture_keeps_the_same_fallback_every_frame() {
        let mut composer = composer();
        prepare(&mut composer, &FakeDecoder::default(), Path::new("assets"));
        render(&mut composer, &objects());
        render(&mut composer, &objects());

        let draws = &composer.meshes().draws;
        let first = draws[0].1.vec4(names::OBJECT_COLOR);
        let second = draws[objects().len()].1.vec4(names::OBJECT_COLOR);
        assert_eq!(first, Some(MISSING_TEXTURE_COLOR));
        assert_eq!(second, first);
    }
}
